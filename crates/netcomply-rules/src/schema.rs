//! Vendor-aware check schema
//!
//! Decides which check fields a vendor selection exposes, and converts the
//! structured `filter` to and from the JSON text the author edits.

use netcomply_core::{ValidationError, VendorTag};
use serde_json::Value;
use std::collections::BTreeSet;

/// Which vendor-specific check fields are shown and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldVisibility {
    /// `xpath` and the structured `filter`
    pub shows_xpath: bool,

    /// NETCONF `filter_xml`
    pub shows_filter_xml: bool,
}

impl FieldVisibility {
    /// Compute field visibility for a vendor selection.
    ///
    /// Nokia exposes the XPath group. Cisco, or any selection without Nokia
    /// (the empty set included), exposes `filter_xml`. Both groups are shown
    /// when both vendors are selected.
    pub fn for_vendors(vendors: &BTreeSet<VendorTag>) -> Self {
        let nokia = vendors.contains(&VendorTag::NokiaSros);
        let cisco = vendors.contains(&VendorTag::CiscoXr);

        Self {
            shows_xpath: nokia,
            shows_filter_xml: cisco || !nokia,
        }
    }

    /// Every field visible
    pub fn all() -> Self {
        Self {
            shows_xpath: true,
            shows_filter_xml: true,
        }
    }
}

/// Two-way codec between a structured filter and its editable JSON text
pub struct FilterCodec;

impl FilterCodec {
    /// Parse filter text into a structured value.
    ///
    /// Blank text and a literal `null` mean "no filter".
    pub fn parse(text: &str) -> Result<Option<Value>, ValidationError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(ValidationError::InvalidFilterSyntax(e.to_string())),
        }
    }

    /// Render a structured filter as indented JSON text, or empty text for none
    pub fn serialize(filter: Option<&Value>) -> String {
        match filter {
            // Serializing a Value cannot fail: its map keys are always strings
            Some(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vendors(tags: &[VendorTag]) -> BTreeSet<VendorTag> {
        tags.iter().copied().collect()
    }

    #[test]
    fn test_empty_vendor_set_shows_filter_xml_only() {
        let visibility = FieldVisibility::for_vendors(&vendors(&[]));
        assert!(visibility.shows_filter_xml);
        assert!(!visibility.shows_xpath);
    }

    #[test]
    fn test_nokia_shows_xpath_only() {
        let visibility = FieldVisibility::for_vendors(&vendors(&[VendorTag::NokiaSros]));
        assert!(visibility.shows_xpath);
        assert!(!visibility.shows_filter_xml);
    }

    #[test]
    fn test_cisco_shows_filter_xml_only() {
        let visibility = FieldVisibility::for_vendors(&vendors(&[VendorTag::CiscoXr]));
        assert!(!visibility.shows_xpath);
        assert!(visibility.shows_filter_xml);
    }

    #[test]
    fn test_both_vendors_show_both_groups() {
        let visibility =
            FieldVisibility::for_vendors(&vendors(&[VendorTag::CiscoXr, VendorTag::NokiaSros]));
        assert_eq!(visibility, FieldVisibility::all());
    }

    #[test]
    fn test_parse_blank_text_is_no_filter() {
        assert_eq!(FilterCodec::parse("").unwrap(), None);
        assert_eq!(FilterCodec::parse("   ").unwrap(), None);
        assert_eq!(FilterCodec::parse("\n\t").unwrap(), None);
        assert_eq!(FilterCodec::parse("null").unwrap(), None);
    }

    #[test]
    fn test_parse_nested_object() {
        let parsed = FilterCodec::parse(r#"{"port": {"ethernet": {"mtu": 9212}}}"#).unwrap();
        assert_eq!(parsed, Some(json!({"port": {"ethernet": {"mtu": 9212}}})));
    }

    #[test]
    fn test_parse_invalid_json_reports_parser_message() {
        let err = FilterCodec::parse("{invalid json").unwrap_err();

        match err {
            ValidationError::InvalidFilterSyntax(message) => {
                assert!(message.contains("line 1"), "unexpected message: {}", message);
            }
            other => panic!("Wrong error: {:?}", other),
        }
    }

    #[test]
    fn test_serialize_is_indented_and_reparses() {
        let filter = json!({"admin-state": {}});
        let text = FilterCodec::serialize(Some(&filter));

        assert!(text.contains('\n'));
        assert_eq!(FilterCodec::parse(&text).unwrap(), Some(filter));
        assert_eq!(FilterCodec::serialize(None), "");
    }
}
