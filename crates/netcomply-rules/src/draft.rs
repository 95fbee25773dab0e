//! In-progress rule record

use netcomply_core::{
    Check, Error, Result, Rule, RuleId, RulePayload, Severity, ValidationError, VendorTag,
};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::collection::CheckCollection;
use crate::form::CheckForm;
use crate::gateway::RulePersistenceGateway;
use crate::schema::FieldVisibility;
use crate::session::{CheckEditingSession, CommitOutcome};

/// A rule being authored.
///
/// Checks are only reachable through the editing operations below, which
/// route every change through the draft's [`CheckEditingSession`] with the
/// field visibility of the current vendor selection.
#[derive(Debug, Clone)]
pub struct RuleDraft {
    id: Option<RuleId>,

    pub name: String,

    pub description: Option<String>,

    pub severity: Severity,

    pub category: Option<String>,

    pub enabled: bool,

    vendors: BTreeSet<VendorTag>,

    checks: CheckCollection,

    session: CheckEditingSession,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleDraft {
    /// Empty draft for a new rule
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            severity: Severity::default(),
            category: None,
            enabled: true,
            vendors: BTreeSet::new(),
            checks: CheckCollection::new(),
            session: CheckEditingSession::new(),
        }
    }

    /// Draft hydrated from a persisted rule; saving it updates that rule
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            id: Some(rule.id),
            name: rule.name.clone(),
            description: rule.description.clone(),
            severity: rule.severity,
            category: rule.category.clone(),
            enabled: rule.enabled,
            vendors: rule.vendors.clone(),
            checks: CheckCollection::from(rule.checks.clone()),
            session: CheckEditingSession::new(),
        }
    }

    /// Id of the rule this draft edits, `None` for a new rule
    pub fn id(&self) -> Option<RuleId> {
        self.id
    }

    /// Point the draft at an existing rule so that saving updates it
    pub fn set_id(&mut self, id: Option<RuleId>) {
        self.id = id;
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn vendors(&self) -> &BTreeSet<VendorTag> {
        &self.vendors
    }

    /// Replace the vendor selection. Applies to checks committed afterwards.
    pub fn set_vendors(&mut self, vendors: impl IntoIterator<Item = VendorTag>) {
        self.vendors = vendors.into_iter().collect();
    }

    /// Check fields exposed by the current vendor selection
    pub fn field_visibility(&self) -> FieldVisibility {
        FieldVisibility::for_vendors(&self.vendors)
    }

    pub fn checks(&self) -> &CheckCollection {
        &self.checks
    }

    pub fn session(&self) -> &CheckEditingSession {
        &self.session
    }

    pub fn begin_create_check(&mut self) {
        self.session.begin_create();
    }

    pub fn begin_edit_check(&mut self, index: usize) -> Result<()> {
        self.session.begin_edit(&self.checks, index)
    }

    pub fn check_form_mut(&mut self) -> &mut CheckForm {
        self.session.form_mut()
    }

    pub fn commit_check(&mut self) -> Result<CommitOutcome> {
        let visibility = self.field_visibility();
        self.session.commit(&mut self.checks, visibility)
    }

    pub fn cancel_check(&mut self) {
        self.session.cancel();
    }

    pub fn remove_check(&mut self, index: usize) -> Result<Check> {
        self.session.remove(&mut self.checks, index)
    }

    /// Shallow validation: checks were already validated when committed
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::NameRequired);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Wire payload for the persistence gateway
    pub fn to_payload(&self) -> RulePayload {
        RulePayload {
            name: self.name.trim().to_string(),
            description: non_blank(self.description.as_deref()),
            severity: self.severity,
            category: non_blank(self.category.as_deref()),
            enabled: self.enabled,
            vendors: self.vendors.clone(),
            checks: self.checks.as_slice().to_vec(),
        }
    }

    /// Validate and hand the draft to the gateway.
    ///
    /// Creates a new rule or updates the hydrated one. Gateway failures are
    /// returned unchanged and the draft is left intact for a retry.
    pub async fn save(&self, gateway: &dyn RulePersistenceGateway) -> Result<Rule> {
        self.validate().map_err(Error::Validation)?;

        if let Some(index) = self.session.editing_index() {
            warn!(
                rule = %self.name,
                index,
                "Saving rule while a check edit is open; uncommitted changes are not included"
            );
        }

        let payload = self.to_payload();
        let check_count = payload.checks.len();

        let rule = match self.id {
            Some(id) => {
                info!(
                    rule = %payload.name,
                    id,
                    checks = check_count,
                    gateway = gateway.name(),
                    "Updating rule"
                );
                gateway.update(id, payload).await?
            }
            None => {
                info!(
                    rule = %payload.name,
                    checks = check_count,
                    gateway = gateway.name(),
                    "Creating rule"
                );
                gateway.create(payload).await?
            }
        };

        Ok(rule)
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EditState;
    use serde_json::json;

    #[test]
    fn test_new_draft_defaults() {
        let draft = RuleDraft::new();

        assert!(draft.is_new());
        assert!(draft.enabled);
        assert_eq!(draft.severity, Severity::Medium);
        assert!(draft.vendors().is_empty());
        assert!(draft.checks().is_empty());
        assert_eq!(draft.validate(), Err(vec![ValidationError::NameRequired]));
    }

    #[test]
    fn test_nokia_check_keeps_xpath_fields() {
        let mut draft = RuleDraft::new();
        draft.set_vendors([VendorTag::NokiaSros]);

        draft.begin_create_check();
        let form = draft.check_form_mut();
        form.name = "check1".into();
        form.xpath = "/config".into();
        form.filter = r#"{"a":1}"#.into();
        form.filter_xml = "<ignored/>".into();
        draft.commit_check().unwrap();

        let check = draft.checks().get(0).unwrap();
        assert_eq!(draft.checks().len(), 1);
        assert_eq!(check.xpath.as_deref(), Some("/config"));
        assert_eq!(check.filter, Some(json!({"a": 1})));
        assert!(check.filter_xml.is_none());
    }

    #[test]
    fn test_vendor_switch_applies_to_next_commit() {
        let mut draft = RuleDraft::new();
        draft.set_vendors([VendorTag::NokiaSros]);
        assert!(!draft.field_visibility().shows_filter_xml);

        draft.set_vendors([VendorTag::CiscoXr, VendorTag::NokiaSros]);
        let form = draft.check_form_mut();
        form.name = "dual".into();
        form.xpath = "/configure".into();
        form.filter_xml = "<configure/>".into();
        draft.commit_check().unwrap();

        let check = draft.checks().get(0).unwrap();
        assert_eq!(check.xpath.as_deref(), Some("/configure"));
        assert_eq!(check.filter_xml.as_deref(), Some("<configure/>"));
    }

    #[test]
    fn test_from_rule_hydrates_and_edits() {
        let rule = Rule {
            id: 42,
            name: "ntp".into(),
            description: Some("NTP servers".into()),
            severity: Severity::High,
            category: None,
            enabled: false,
            vendors: BTreeSet::from([VendorTag::CiscoXr]),
            checks: vec![Check::new("server-a"), Check::new("server-b")],
        };

        let mut draft = RuleDraft::from_rule(&rule);
        assert_eq!(draft.id(), Some(42));

        draft.begin_edit_check(1).unwrap();
        assert_eq!(draft.session().state(), EditState::Editing(1));
        draft.check_form_mut().filter_xml = "<ntp/>".into();
        draft.commit_check().unwrap();

        let payload = draft.to_payload();
        assert_eq!(payload.checks.len(), 2);
        assert_eq!(payload.checks[1].filter_xml.as_deref(), Some("<ntp/>"));
        assert_eq!(payload.checks[0], rule.checks[0]);
        assert!(!payload.enabled);
    }

    #[test]
    fn test_payload_trims_optional_text() {
        let mut draft = RuleDraft::new();
        draft.name = "  snmp  ".into();
        draft.description = Some("   ".into());
        draft.category = Some(" security ".into());

        let payload = draft.to_payload();

        assert_eq!(payload.name, "snmp");
        assert_eq!(payload.description, None);
        assert_eq!(payload.category.as_deref(), Some("security"));
    }

    #[test]
    fn test_remove_check_through_draft() {
        let mut draft = RuleDraft::new();
        for name in ["a", "b"] {
            draft.check_form_mut().name = name.into();
            draft.commit_check().unwrap();
        }

        draft.begin_edit_check(0).unwrap();
        draft.remove_check(0).unwrap();

        assert_eq!(draft.session().state(), EditState::Idle);
        assert_eq!(draft.checks().get(0).unwrap().name, "b");
    }

    fn rule_with(vendors: BTreeSet<VendorTag>, check: Check) -> Rule {
        Rule {
            id: 9,
            name: "port-admin".into(),
            description: None,
            severity: Severity::Medium,
            category: None,
            enabled: true,
            vendors,
            checks: vec![check],
        }
    }

    #[test]
    fn test_unchanged_edit_keeps_hidden_xpath_fields() {
        let mut check = Check::new("admin");
        check.xpath = Some("/configure/port".into());
        check.filter = Some(json!({"admin-state": {}}));
        let rule = rule_with(BTreeSet::new(), check.clone());

        let mut draft = RuleDraft::from_rule(&rule);
        draft.begin_edit_check(0).unwrap();
        draft.commit_check().unwrap();

        assert_eq!(draft.checks().get(0), Some(&check));
        assert_eq!(draft.to_payload().checks, vec![check]);
    }

    #[test]
    fn test_unchanged_edit_keeps_reference_config_verbatim() {
        let mut check = Check::new("gi0-shutdown");
        check.filter_xml = Some("<interface-configurations/>".into());
        check.reference_config = Some("  interface Gi0/0\n   shutdown\n".into());
        check.success_message = "Gi0/0 is shut".into();
        let rule = rule_with(BTreeSet::from([VendorTag::CiscoXr]), check.clone());

        let mut draft = RuleDraft::from_rule(&rule);
        draft.begin_edit_check(0).unwrap();
        draft.commit_check().unwrap();

        assert_eq!(draft.checks().get(0), Some(&check));
    }
}
