//! Rule persistence contract

use async_trait::async_trait;
use netcomply_core::{Result, Rule, RuleId, RulePayload};

/// Backend that stores rules.
///
/// Failures are reported as [`netcomply_core::Error::Gateway`]; callers keep
/// their draft and may retry.
#[async_trait]
pub trait RulePersistenceGateway: Send + Sync {
    /// All rules
    async fn list(&self) -> Result<Vec<Rule>>;

    /// Store a new rule; rejected if the name is already taken
    async fn create(&self, payload: RulePayload) -> Result<Rule>;

    /// Overwrite an existing rule
    async fn update(&self, id: RuleId, payload: RulePayload) -> Result<Rule>;

    /// Delete a rule
    async fn delete(&self, id: RuleId) -> Result<()>;

    /// Flip a rule's `enabled` flag
    async fn toggle(&self, id: RuleId) -> Result<Rule>;

    /// Name of this gateway, for logs
    fn name(&self) -> &str;
}
