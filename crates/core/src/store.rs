//! In-memory patient store.
//!
//! Records are kept in insertion order. Identifiers come from a monotonic
//! counter and are never handed out twice, even after the newest record is
//! deleted.

use crate::constants::FIRST_PATIENT_ID;
use crate::patient::{PatientFields, PatientId, PatientRecord};
use crate::{PatientError, PatientResult};

/// Owns every patient record for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct PatientStore {
    records: Vec<PatientRecord>,
    next_id: PatientId,
}

impl Default for PatientStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientStore {
    /// Creates an empty store whose first identifier is 1.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: FIRST_PATIENT_ID,
        }
    }

    /// Seeds a store from previously loaded records.
    ///
    /// Records keep their identifiers and order. When an identifier repeats,
    /// the first occurrence wins and later ones are dropped with a warning.
    /// The counter starts one past the highest identifier seen.
    pub fn from_records(records: impl IntoIterator<Item = PatientRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            if store.position(record.id).is_some() {
                tracing::warn!("dropping duplicate patient id {}", record.id);
                continue;
            }
            store.next_id = store.next_id.max(record.id.saturating_add(1));
            store.records.push(record);
        }
        store
    }

    /// Inserts a new record and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if the fields are out of range and
    /// `PatientError::IdsExhausted` once the counter reaches `PatientId::MAX`.
    /// The store and its counter are unchanged in both cases.
    pub fn add(&mut self, fields: PatientFields) -> PatientResult<PatientId> {
        fields.validate()?;

        let id = self.next_id;
        // The last value is never handed out so the counter cannot wrap.
        self.next_id = id.checked_add(1).ok_or(PatientError::IdsExhausted)?;
        self.records.push(PatientRecord { id, fields });

        tracing::debug!("added patient {}", id);
        Ok(id)
    }

    pub fn get(&self, id: PatientId) -> PatientResult<&PatientRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(PatientError::NotFound(id))
    }

    /// Replaces the fields of an existing record in place.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown identifier and
    /// `PatientError::Validation` for out-of-range fields. Neither modifies
    /// the store.
    pub fn update(&mut self, id: PatientId, fields: PatientFields) -> PatientResult<&PatientRecord> {
        let idx = self.position(id).ok_or(PatientError::NotFound(id))?;
        fields.validate()?;

        self.records[idx].fields = fields;

        tracing::debug!("updated patient {}", id);
        Ok(&self.records[idx])
    }

    /// Removes a record and hands it back.
    ///
    /// Deleting an identifier twice yields `NotFound` the second time.
    pub fn delete(&mut self, id: PatientId) -> PatientResult<PatientRecord> {
        let idx = self.position(id).ok_or(PatientError::NotFound(id))?;
        let record = self.records.remove(idx);

        tracing::debug!("deleted patient {}", id);
        Ok(record)
    }

    /// Iterates records in insertion order. Each call starts from the beginning.
    pub fn list(&self) -> impl Iterator<Item = &PatientRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The identifier the next `add` will assign.
    pub fn next_id(&self) -> PatientId {
        self.next_id
    }

    fn position(&self, id: PatientId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}
