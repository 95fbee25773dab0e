//! YAML rule bundles
//!
//! A bundle lists rules to author in bulk. Every check in a bundle is
//! admitted through the same editing session as an interactive edit, so
//! bundle checks pass the same schema gate.

use netcomply_core::{Error, Result, Severity, VendorTag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::draft::RuleDraft;
use crate::form::CheckForm;
use crate::schema::{FieldVisibility, FilterCodec};

/// A set of rules loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBundle {
    pub rules: Vec<RuleSpec>,
}

impl RuleBundle {
    /// Load a bundle from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid rule bundle: {}", e)))
    }

    /// Load a bundle from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Build a draft for every rule, failing on the first invalid one
    pub fn into_drafts(self) -> Result<Vec<RuleDraft>> {
        let mut seen = HashSet::new();

        self.rules
            .into_iter()
            .map(|rule| {
                if !seen.insert(rule.name.trim().to_string()) {
                    return Err(Error::bundle(
                        format!("rule `{}`", rule.name),
                        Error::config("duplicate rule name in bundle"),
                    ));
                }
                rule.into_draft()
            })
            .collect()
    }
}

/// One rule in a bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub vendors: Vec<VendorTag>,

    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

impl RuleSpec {
    /// Author a draft from this bundle entry
    pub fn into_draft(self) -> Result<RuleDraft> {
        let mut draft = RuleDraft::new();
        draft.name = self.name;
        draft.description = self.description;
        draft.severity = self.severity;
        draft.category = self.category;
        draft.enabled = self.enabled;
        draft.set_vendors(self.vendors);

        let visibility = draft.field_visibility();
        let rule_name = draft.name.clone();

        for check in &self.checks {
            warn_hidden_fields(&rule_name, check, visibility);

            draft.begin_create_check();
            *draft.check_form_mut() = check.to_form();
            draft.commit_check().map_err(|e| {
                Error::bundle(format!("rule `{}`, check `{}`", rule_name, check.name), e)
            })?;
        }

        draft
            .validate()
            .map_err(|errors| Error::bundle(format!("rule `{}`", rule_name), Error::Validation(errors)))?;

        Ok(draft)
    }
}

/// One check in a bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSpec {
    pub name: String,

    #[serde(default)]
    pub filter_xml: Option<String>,

    #[serde(default)]
    pub xpath: Option<String>,

    #[serde(default)]
    pub filter: Option<FilterSpec>,

    #[serde(default)]
    pub reference_value: Option<String>,

    #[serde(default)]
    pub reference_config: Option<String>,
}

/// Filter as written in a bundle: JSON text, or an inline YAML mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    Text(String),
    Structured(serde_json::Value),
}

impl CheckSpec {
    /// Fill an editor form with this check
    pub fn to_form(&self) -> CheckForm {
        let filter = match &self.filter {
            Some(FilterSpec::Text(text)) => text.clone(),
            Some(FilterSpec::Structured(value)) => FilterCodec::serialize(Some(value)),
            None => String::new(),
        };

        CheckForm {
            name: self.name.clone(),
            filter_xml: self.filter_xml.clone().unwrap_or_default(),
            xpath: self.xpath.clone().unwrap_or_default(),
            filter,
            reference_value: self.reference_value.clone().unwrap_or_default(),
            reference_config: self.reference_config.clone().unwrap_or_default(),
        }
    }
}

fn warn_hidden_fields(rule: &str, check: &CheckSpec, visibility: FieldVisibility) {
    if !visibility.shows_xpath && (check.xpath.is_some() || check.filter.is_some()) {
        warn!(rule, check = %check.name, "xpath/filter ignored: no vendor uses them");
    }
    if !visibility.shows_filter_xml && check.filter_xml.is_some() {
        warn!(rule, check = %check.name, "filter_xml ignored: no vendor uses it");
    }
}

fn default_true() -> bool {
    true
}
