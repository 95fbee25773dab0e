//! Rule and check types shared by the editor, the gateways and the CLI

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVendorTag;

/// Identifier assigned to a rule by the persistence backend
pub type RuleId = u64;

/// Message stored on every check when it fails
pub const DEFAULT_ERROR_MESSAGE: &str = "Configuration does not match the reference";

/// Message stored on every check when it passes
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Configuration matches the reference";

/// Device family whose configuration query language decides which check fields apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorTag {
    /// Cisco IOS-XR, queried with NETCONF subtree filters
    CiscoXr,
    /// Nokia SR OS, queried with an XPath and a structured filter
    NokiaSros,
}

impl VendorTag {
    /// Every known vendor tag
    pub const ALL: [VendorTag; 2] = [VendorTag::CiscoXr, VendorTag::NokiaSros];

    /// Wire name of the tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CiscoXr => "cisco_xr",
            Self::NokiaSros => "nokia_sros",
        }
    }
}

impl fmt::Display for VendorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorTag {
    type Err = UnknownVendorTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownVendorTag(s.to_string()))
    }
}

/// Rule severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a check compares retrieved configuration with its reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    #[default]
    Exact,
}

/// A single verifiable condition against a device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Check name, never empty once admitted by the editor
    pub name: String,

    /// NETCONF subtree filter
    pub filter_xml: Option<String>,

    /// Path queried on XPath-style devices
    pub xpath: Option<String>,

    /// Structured filter; always parsed JSON, never raw text
    pub filter: Option<serde_json::Value>,

    /// Expected value for the queried path
    pub reference_value: Option<String>,

    /// Expected configuration snippet
    pub reference_config: Option<String>,

    #[serde(default)]
    pub comparison: Comparison,

    #[serde(default = "default_error_message")]
    pub error_message: String,

    #[serde(default = "default_success_message")]
    pub success_message: String,
}

impl Check {
    /// Create a check with no payload and the default messages
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter_xml: None,
            xpath: None,
            filter: None,
            reference_value: None,
            reference_config: None,
            comparison: Comparison::Exact,
            error_message: default_error_message(),
            success_message: default_success_message(),
        }
    }
}

/// Wire shape sent to the rule persistence backend on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePayload {
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
    pub vendors: BTreeSet<VendorTag>,

    #[serde(default)]
    pub checks: Vec<Check>,
}

/// A persisted rule as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,

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
    pub vendors: BTreeSet<VendorTag>,

    #[serde(default)]
    pub checks: Vec<Check>,
}

impl Rule {
    /// Materialize a payload under the given id
    pub fn from_payload(id: RuleId, payload: RulePayload) -> Self {
        Self {
            id,
            name: payload.name,
            description: payload.description,
            severity: payload.severity,
            category: payload.category,
            enabled: payload.enabled,
            vendors: payload.vendors,
            checks: payload.checks,
        }
    }

    /// Project back to the wire payload
    pub fn to_payload(&self) -> RulePayload {
        RulePayload {
            name: self.name.clone(),
            description: self.description.clone(),
            severity: self.severity,
            category: self.category.clone(),
            enabled: self.enabled,
            vendors: self.vendors.clone(),
            checks: self.checks.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_error_message() -> String {
    DEFAULT_ERROR_MESSAGE.to_string()
}

fn default_success_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vendor_tag_wire_names() {
        assert_eq!(serde_json::to_value(VendorTag::CiscoXr).unwrap(), json!("cisco_xr"));
        assert_eq!(serde_json::to_value(VendorTag::NokiaSros).unwrap(), json!("nokia_sros"));
        assert_eq!("nokia_sros".parse::<VendorTag>().unwrap(), VendorTag::NokiaSros);
        assert_eq!(
            "juniper".parse::<VendorTag>(),
            Err(UnknownVendorTag("juniper".into()))
        );
        assert_eq!(
            UnknownVendorTag("juniper".into()).to_string(),
            "unknown vendor tag `juniper`"
        );
    }

    #[test]
    fn test_check_serializes_every_field() {
        let mut check = Check::new("ntp-server");
        check.xpath = Some("/configure/system/time".into());
        check.filter = Some(json!({"ntp": {"server": {}}}));

        let value = serde_json::to_value(&check).unwrap();

        assert_eq!(value["name"], "ntp-server");
        assert_eq!(value["comparison"], "exact");
        assert_eq!(value["filter"], json!({"ntp": {"server": {}}}));
        assert!(value["filter_xml"].is_null());
        assert_eq!(value["error_message"], DEFAULT_ERROR_MESSAGE);
        assert_eq!(value["success_message"], DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_rule_defaults_from_sparse_json() {
        let rule: Rule = serde_json::from_str(r#"{"id": 3, "name": "ssh-v2"}"#).unwrap();

        assert_eq!(rule.severity, Severity::Medium);
        assert!(rule.enabled);
        assert!(rule.vendors.is_empty());
        assert!(rule.checks.is_empty());
    }

    #[test]
    fn test_rule_payload_round_trip_through_rule() {
        let payload = RulePayload {
            name: "aaa".into(),
            description: Some("AAA must be configured".into()),
            severity: Severity::High,
            category: Some("security".into()),
            enabled: false,
            vendors: BTreeSet::from([VendorTag::CiscoXr]),
            checks: vec![Check::new("aaa-auth")],
        };

        let rule = Rule::from_payload(11, payload.clone());

        assert_eq!(rule.id, 11);
        assert_eq!(rule.to_payload(), payload);
    }

    #[test]
    fn test_check_from_yaml_uses_default_messages() {
        let check: Check = serde_yaml::from_str("name: banner\nfilter_xml: <banner/>\n").unwrap();

        assert_eq!(check.filter_xml.as_deref(), Some("<banner/>"));
        assert_eq!(check.comparison, Comparison::Exact);
        assert_eq!(check.error_message, DEFAULT_ERROR_MESSAGE);
    }
}
