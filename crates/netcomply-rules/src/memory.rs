//! In-memory rule store

use async_trait::async_trait;
use netcomply_core::{GatewayError, Result, Rule, RuleId, RulePayload};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

use crate::gateway::RulePersistenceGateway;

/// Rule gateway backed by a map, with the same contract as the rules API:
/// sequential ids, unique names, `NotFound` for unknown ids.
pub struct InMemoryRuleGateway {
    rules: RwLock<BTreeMap<RuleId, Rule>>,
    next_id: RwLock<RuleId>,
}

impl InMemoryRuleGateway {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Seed the store with existing rules; ids continue after the highest one
    pub fn with_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let rules: BTreeMap<RuleId, Rule> = rules.into_iter().map(|r| (r.id, r)).collect();
        let next_id = rules.keys().next_back().map_or(1, |id| id + 1);

        Self {
            rules: RwLock::new(rules),
            next_id: RwLock::new(next_id),
        }
    }

    /// Snapshot of a stored rule
    pub fn get(&self, id: RuleId) -> Option<Rule> {
        self.rules.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    fn ensure_unique_name(
        rules: &BTreeMap<RuleId, Rule>,
        name: &str,
        except: Option<RuleId>,
    ) -> Result<()> {
        let taken = rules
            .values()
            .any(|rule| rule.name == name && Some(rule.id) != except);

        if taken {
            Err(GatewayError::Rejected(format!("a rule named '{}' already exists", name)).into())
        } else {
            Ok(())
        }
    }

    fn ensure_name_present(payload: &RulePayload) -> Result<()> {
        if payload.name.trim().is_empty() {
            Err(GatewayError::Rejected("name must not be empty".to_string()).into())
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryRuleGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RulePersistenceGateway for InMemoryRuleGateway {
    async fn list(&self) -> Result<Vec<Rule>> {
        Ok(self.rules.read().values().cloned().collect())
    }

    async fn create(&self, payload: RulePayload) -> Result<Rule> {
        Self::ensure_name_present(&payload)?;

        let mut rules = self.rules.write();
        Self::ensure_unique_name(&rules, &payload.name, None)?;

        let id = {
            let mut next_id = self.next_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let rule = Rule::from_payload(id, payload);
        rules.insert(id, rule.clone());
        debug!(id, rule = %rule.name, "Stored new rule");

        Ok(rule)
    }

    async fn update(&self, id: RuleId, payload: RulePayload) -> Result<Rule> {
        Self::ensure_name_present(&payload)?;

        let mut rules = self.rules.write();
        if !rules.contains_key(&id) {
            return Err(GatewayError::NotFound(id).into());
        }
        Self::ensure_unique_name(&rules, &payload.name, Some(id))?;

        let rule = Rule::from_payload(id, payload);
        rules.insert(id, rule.clone());
        debug!(id, rule = %rule.name, "Updated rule");

        Ok(rule)
    }

    async fn delete(&self, id: RuleId) -> Result<()> {
        self.rules
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(id).into())
    }

    async fn toggle(&self, id: RuleId) -> Result<Rule> {
        let mut rules = self.rules.write();
        let rule = rules.get_mut(&id).ok_or(GatewayError::NotFound(id))?;

        rule.enabled = !rule.enabled;
        Ok(rule.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
