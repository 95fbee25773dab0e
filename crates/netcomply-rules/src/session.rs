//! Single-slot check editing session
//!
//! The session owns the check-form buffer and knows whether the next commit
//! appends a new check or overwrites the one under edit. Only one check can
//! be under edit at a time: starting a second edit is refused with
//! [`Error::EditInProgress`] rather than discarding the first.

use netcomply_core::{Check, Error, Result};
use tracing::debug;

use crate::collection::CheckCollection;
use crate::form::CheckForm;
use crate::schema::FieldVisibility;

/// What the next commit does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    /// Compose a new check; commit appends
    #[default]
    Idle,
    /// Edit the check at this index; commit replaces it in place
    Editing(usize),
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// New check appended at this index
    Appended(usize),
    /// Check at this index replaced
    Replaced(usize),
}

impl CommitOutcome {
    pub fn index(self) -> usize {
        match self {
            Self::Appended(index) | Self::Replaced(index) => index,
        }
    }
}

/// Editing state machine between a [`CheckForm`] and a [`CheckCollection`]
#[derive(Debug, Clone, Default)]
pub struct CheckEditingSession {
    state: EditState,
    form: CheckForm,
}

impl CheckEditingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Index under edit, if any
    pub fn editing_index(&self) -> Option<usize> {
        match self.state {
            EditState::Editing(index) => Some(index),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_index().is_some()
    }

    pub fn form(&self) -> &CheckForm {
        &self.form
    }

    /// Mutable access to the buffer for field-by-field input
    pub fn form_mut(&mut self) -> &mut CheckForm {
        &mut self.form
    }

    /// Whether `begin_edit(index)` would currently be accepted
    pub fn can_edit(&self, collection: &CheckCollection, index: usize) -> bool {
        !self.is_editing() && index < collection.len()
    }

    /// Start composing a new check with a blank buffer
    pub fn begin_create(&mut self) {
        self.reset();
    }

    /// Load `collection[index]` into the buffer for editing
    pub fn begin_edit(&mut self, collection: &CheckCollection, index: usize) -> Result<()> {
        if let EditState::Editing(active) = self.state {
            return Err(Error::EditInProgress {
                active,
                requested: index,
            });
        }

        let check = collection.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: collection.len(),
        })?;

        self.form = CheckForm::from_check(check);
        self.state = EditState::Editing(index);
        debug!(index, check = %check.name, "Editing check");

        Ok(())
    }

    /// Admit the buffer into the collection.
    ///
    /// On any error the collection, the state and the buffer are left as
    /// they were so the author can correct the input.
    pub fn commit(
        &mut self,
        collection: &mut CheckCollection,
        visibility: FieldVisibility,
    ) -> Result<CommitOutcome> {
        let base = match self.state {
            EditState::Editing(index) => {
                collection.ensure_index(index)?;
                collection.get(index)
            }
            EditState::Idle => None,
        };

        let check = self.form.to_check(base, visibility)?;
        let outcome = self.store(collection, check)?;

        debug!(?outcome, "Committed check");
        self.reset();
        Ok(outcome)
    }

    /// Abandon the current buffer without touching the collection
    pub fn cancel(&mut self) {
        if let EditState::Editing(index) = self.state {
            debug!(index, "Cancelled check edit");
        }
        self.reset();
    }

    /// Remove `collection[index]`, keeping the edit target consistent.
    ///
    /// Removing the check under edit ends the edit. Removing an earlier check
    /// moves the edit target down so it still refers to the same check.
    pub fn remove(&mut self, collection: &mut CheckCollection, index: usize) -> Result<Check> {
        let removed = collection.remove(index)?;

        match self.state {
            EditState::Editing(active) if active == index => {
                debug!(index, "Removed check under edit");
                self.reset();
            }
            EditState::Editing(active) if active > index => {
                self.state = EditState::Editing(active - 1);
            }
            _ => {}
        }

        Ok(removed)
    }

    fn store(&self, collection: &mut CheckCollection, check: Check) -> Result<CommitOutcome> {
        match self.state {
            EditState::Idle => Ok(CommitOutcome::Appended(collection.push(check))),
            EditState::Editing(index) => {
                collection.replace(index, check)?;
                Ok(CommitOutcome::Replaced(index))
            }
        }
    }

    fn reset(&mut self) {
        self.state = EditState::Idle;
        self.form = CheckForm::default();
    }
}
