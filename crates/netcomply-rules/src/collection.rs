//! Ordered check container owned by a rule draft

use netcomply_core::{Check, Error, Result};
use serde::{Deserialize, Serialize};

/// Ordered sequence of checks.
///
/// Order is execution order. Mutations never reorder entries apart from the
/// shift caused by a removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckCollection {
    checks: Vec<Check>,
}

impl CheckCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check, returning its index
    pub fn push(&mut self, check: Check) -> usize {
        self.checks.push(check);
        self.checks.len() - 1
    }

    /// Replace the check at `index`, returning the previous entry
    pub fn replace(&mut self, index: usize, check: Check) -> Result<Check> {
        let len = self.checks.len();
        let slot = self
            .checks
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        Ok(std::mem::replace(slot, check))
    }

    /// Remove the check at `index`, shifting later entries down
    pub fn remove(&mut self, index: usize) -> Result<Check> {
        self.ensure_index(index)?;
        Ok(self.checks.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Check> {
        self.checks.get(index)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Check> {
        self.checks.iter()
    }

    pub fn as_slice(&self) -> &[Check] {
        &self.checks
    }

    /// Fail with `IndexOutOfRange` unless `index` addresses an entry
    pub fn ensure_index(&self, index: usize) -> Result<()> {
        if index < self.checks.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.checks.len(),
            })
        }
    }
}

impl From<Vec<Check>> for CheckCollection {
    fn from(checks: Vec<Check>) -> Self {
        Self { checks }
    }
}

impl<'a> IntoIterator for &'a CheckCollection {
    type Item = &'a Check;
    type IntoIter = std::slice::Iter<'a, Check>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.iter()
    }
}
