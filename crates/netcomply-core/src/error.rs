//! Error types for netcomply

use crate::types::RuleId;

/// Result type alias using netcomply's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Field-level validation failure, surfaced inline next to the offending input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Rule or check name is empty
    #[error("name is required")]
    NameRequired,

    /// Filter text is not valid JSON; carries the parser message
    #[error("invalid filter syntax: {0}")]
    InvalidFilterSyntax(String),
}

impl ValidationError {
    /// Form field this error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired => "name",
            Self::InvalidFilterSyntax(_) => "filter",
        }
    }
}

/// Text that names no known vendor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vendor tag `{0}`")]
pub struct UnknownVendorTag(pub String);

/// Failure reported by a rule persistence gateway
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// No rule with this id exists
    #[error("rule {0} not found")]
    NotFound(RuleId),

    /// Server-side validation rejected the payload (name collision, malformed body)
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Any other non-success response
    #[error("unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

/// Core error type for netcomply operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Local validation errors; nothing was mutated
    #[error("validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Check index does not exist in the collection
    #[error("check index {index} out of range (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Another check is already being edited
    #[error("check {active} is already being edited, cannot edit check {requested}")]
    EditInProgress { active: usize, requested: usize },

    /// Persistence gateway failure
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Error raised while building a rule from a bundle entry
    #[error("{context}: {source}")]
    Bundle {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an error with the bundle entry it came from
    pub fn bundle(context: impl Into<String>, source: Error) -> Self {
        Self::Bundle {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Validation errors carried by this error, looking through bundle context
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            Self::Bundle { source, .. } => source.validation_errors(),
            _ => &[],
        }
    }

    /// Gateway error carried by this error, if any
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::Bundle { source, .. } => source.gateway_error(),
            _ => None,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_messages() {
        let err = Error::Validation(vec![
            ValidationError::NameRequired,
            ValidationError::InvalidFilterSyntax("EOF while parsing".into()),
        ]);

        assert_eq!(
            err.to_string(),
            "validation failed: name is required; invalid filter syntax: EOF while parsing"
        );
    }

    #[test]
    fn test_validation_error_fields() {
        assert_eq!(ValidationError::NameRequired.field(), "name");
        assert_eq!(ValidationError::InvalidFilterSyntax(String::new()).field(), "filter");
    }

    #[test]
    fn test_bundle_context_is_transparent_to_accessors() {
        let err = Error::bundle("rule `ntp`", ValidationError::NameRequired.into());

        assert_eq!(err.validation_errors(), &[ValidationError::NameRequired]);
        assert!(err.gateway_error().is_none());
        assert_eq!(err.to_string(), "rule `ntp`: validation failed: name is required");
    }

    #[test]
    fn test_gateway_error_conversion() {
        let err: Error = GatewayError::NotFound(7).into();

        assert_eq!(err.gateway_error(), Some(&GatewayError::NotFound(7)));
        assert_eq!(err.to_string(), "gateway error: rule 7 not found");
    }
}
