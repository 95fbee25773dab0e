//! Transient check-form buffer
//!
//! Mirrors the text inputs of the check editor. Every field is plain text;
//! blank inputs become absent fields when the form is turned into a check.

use netcomply_core::{Check, Result, ValidationError};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldVisibility, FilterCodec};

/// Editable copy of a check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckForm {
    pub name: String,
    pub filter_xml: String,
    pub xpath: String,
    /// Filter as JSON text
    pub filter: String,
    pub reference_value: String,
    pub reference_config: String,
}

impl CheckForm {
    /// Load a stored check into the form, rendering its filter as text
    pub fn from_check(check: &Check) -> Self {
        Self {
            name: check.name.clone(),
            filter_xml: check.filter_xml.clone().unwrap_or_default(),
            xpath: check.xpath.clone().unwrap_or_default(),
            filter: FilterCodec::serialize(check.filter.as_ref()),
            reference_value: check.reference_value.clone().unwrap_or_default(),
            reference_config: check.reference_config.clone().unwrap_or_default(),
        }
    }

    /// True when every input is blank
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Build a check from the form on top of `base`, the stored check under
    /// edit (`None` when composing a new one).
    ///
    /// Visible fields come from the form. Hidden fields, and the fields the
    /// form does not carry, keep the values from `base`. Fails without side
    /// effects when the name is blank or the filter text does not parse.
    pub fn to_check(&self, base: Option<&Check>, visibility: FieldVisibility) -> Result<Check> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired.into());
        }

        let mut check = match base {
            Some(stored) => stored.clone(),
            None => Check::new(name),
        };
        check.name = name.to_string();
        check.reference_value = non_blank(&self.reference_value);
        check.reference_config = non_blank(&self.reference_config);

        if visibility.shows_xpath {
            check.filter = FilterCodec::parse(&self.filter)?;
            check.xpath = non_blank(&self.xpath);
        }
        if visibility.shows_filter_xml {
            check.filter_xml = non_blank(&self.filter_xml);
        }

        Ok(check)
    }
}

/// Blank input means absent; anything else is stored verbatim
fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
