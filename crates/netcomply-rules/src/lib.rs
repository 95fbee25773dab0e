//! netcomply rule authoring
//!
//! Editing core for compliance rules and their vendor-specific checks.
//!
//! A rule is authored as a [`RuleDraft`]:
//! - [`FieldVisibility`] decides which check fields the vendor selection exposes
//! - [`FilterCodec`] converts structured filters to and from editable JSON text
//! - [`CheckEditingSession`] admits checks into the draft's [`CheckCollection`]
//!   one at a time
//! - [`RulePersistenceGateway`] stores the finished rule

pub mod bundle;
pub mod collection;
pub mod draft;
pub mod form;
pub mod gateway;
pub mod memory;
pub mod schema;
pub mod session;

pub use bundle::{CheckSpec, FilterSpec, RuleBundle, RuleSpec};
pub use collection::CheckCollection;
pub use draft::RuleDraft;
pub use form::CheckForm;
pub use gateway::RulePersistenceGateway;
pub use memory::InMemoryRuleGateway;
pub use schema::{FieldVisibility, FilterCodec};
pub use session::{CheckEditingSession, CommitOutcome, EditState};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::collection::CheckCollection;
    pub use crate::draft::RuleDraft;
    pub use crate::gateway::RulePersistenceGateway;
    pub use crate::schema::{FieldVisibility, FilterCodec};
    pub use crate::session::{CheckEditingSession, CommitOutcome, EditState};
}
