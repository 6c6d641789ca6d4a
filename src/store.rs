//! In-memory record store. The collection is always sorted by date, most
//! recent first, and holds at most one record per calendar day. The edit
//! cursor remembers the edited record by its date, so re-sorting after a
//! mutation can never make it point at a different record.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Record;

/// Errors raised by the record store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A row position past the end of the collection.
    #[error("Record {index} does not exist ({len} records logged).")]
    IndexOutOfRange { index: usize, len: usize },

    /// A date with no logged record.
    #[error("No distance logged for {0}.")]
    UnknownDate(NaiveDate),
}

/// Owns the session's records and the edit cursor.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    editing: Option<NaiveDate>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `distance` for `date`. A day that already has a record accumulates
    /// the new distance instead of gaining a second row. Clears the edit
    /// cursor and returns the record's position in the sorted view.
    pub fn add_or_merge(&mut self, date: NaiveDate, distance: f64) -> usize {
        match self.records.iter_mut().find(|record| record.date == date) {
            Some(existing) => {
                existing.distance += distance;
                debug!(%date, added = distance, total = existing.distance, "merged distance");
            }
            None => {
                self.records.push(Record::new(date, distance));
                debug!(%date, distance, "added record");
            }
        }
        self.sort();
        self.editing = None;
        self.expect_position(date)
    }

    /// Point the edit cursor at the record in row `index` and hand back a copy
    /// for pre-filling the caller's form. Re-invoking while already editing
    /// simply retargets the cursor.
    pub fn begin_edit(&mut self, index: usize) -> Result<Record, StoreError> {
        let record = self.get(index).cloned().ok_or_else(|| {
            warn!(index, len = self.records.len(), "edit requested for missing row");
            StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            }
        })?;
        self.editing = Some(record.date);
        debug!(date = %record.date, index, "editing record");
        Ok(record)
    }

    /// Date-keyed form of [`RecordStore::begin_edit`].
    pub fn begin_edit_date(&mut self, date: NaiveDate) -> Result<Record, StoreError> {
        let index = self
            .position_of(date)
            .ok_or(StoreError::UnknownDate(date))?;
        self.begin_edit(index)
    }

    /// Replace the record under the edit cursor with `{date, distance}` and
    /// clear the cursor. Returns the saved record's position, or `None` when no
    /// edit was in progress.
    ///
    /// Moving a record onto the date of another record folds the new distance
    /// into that other record so no two rows ever share a date.
    pub fn save_edit(&mut self, date: NaiveDate, distance: f64) -> Option<usize> {
        let target = self.editing.take()?;
        let index = self.position_of(target)?;

        if date != target {
            if let Some(other) = self.position_of(date) {
                self.records.remove(index);
                let other = if other > index { other - 1 } else { other };
                self.records[other].distance += distance;
                debug!(from = %target, to = %date, total = self.records[other].distance, "edit merged into existing record");
                return Some(other);
            }
        }

        self.records[index] = Record::new(date, distance);
        self.sort();
        debug!(from = %target, to = %date, distance, "saved edit");
        Some(self.expect_position(date))
    }

    /// Drop the edit cursor without touching any record.
    pub fn cancel_edit(&mut self) {
        if let Some(date) = self.editing.take() {
            debug!(%date, "edit cancelled");
        }
    }

    /// Delete the record in row `index`. The remaining rows keep their order.
    /// Removing the record under the edit cursor also clears the cursor.
    pub fn remove(&mut self, index: usize) -> Result<Record, StoreError> {
        if index >= self.records.len() {
            warn!(index, len = self.records.len(), "removal requested for missing row");
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }

        let removed = self.records.remove(index);
        if self.editing == Some(removed.date) {
            self.editing = None;
        }
        debug!(date = %removed.date, index, "removed record");
        Ok(removed)
    }

    /// Date-keyed form of [`RecordStore::remove`].
    pub fn remove_date(&mut self, date: NaiveDate) -> Result<Record, StoreError> {
        let index = self
            .position_of(date)
            .ok_or(StoreError::UnknownDate(date))?;
        self.remove(index)
    }

    /// The records, most recent first.
    pub fn view(&self) -> &[Record] {
        &self.records
    }

    /// Row of the record under the edit cursor, if an edit is in progress.
    pub fn edit_cursor(&self) -> Option<usize> {
        self.editing.and_then(|date| self.position_of(date))
    }

    /// Date of the record under the edit cursor.
    pub fn editing(&self) -> Option<NaiveDate> {
        self.editing
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.records.iter().position(|record| record.date == date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of every logged distance.
    pub fn total_distance(&self) -> f64 {
        self.records.iter().map(|record| record.distance).sum()
    }

    fn sort(&mut self) {
        self.records.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn expect_position(&self, date: NaiveDate) -> usize {
        // Only called right after `date` was written into the collection.
        self.position_of(date).unwrap_or(0)
    }
}
