use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Record, ISO_DATE_FORMAT};

/// Pending input for the add/edit form. The text stays raw until submission
/// so half-typed dates can sit in the field.
#[derive(Default, Clone)]
pub(crate) struct EntryForm {
    pub(crate) date: String,
    pub(crate) distance: String,
    pub(crate) active: EntryField,
    pub(crate) error: Option<String>,
}

/// Fields available within the entry form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum EntryField {
    #[default]
    Date,
    Distance,
}

impl EntryForm {
    /// Seed the date field with `today` and leave the distance blank.
    pub(crate) fn for_day(today: NaiveDate) -> Self {
        Self {
            date: today.format(ISO_DATE_FORMAT).to_string(),
            active: EntryField::Distance,
            ..Self::default()
        }
    }

    /// Populate the form from the record being edited.
    pub(crate) fn from_record(record: &Record) -> Self {
        Self {
            date: record.iso_date(),
            distance: record.distance.to_string(),
            active: EntryField::Distance,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            EntryField::Date => EntryField::Distance,
            EntryField::Distance => EntryField::Date,
        };
    }

    /// Append a character to the active field, rejecting anything that can
    /// never belong to it.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            EntryField::Date => {
                if ch.is_ascii_digit() || ch == '-' {
                    self.date.push(ch);
                    true
                } else {
                    false
                }
            }
            EntryField::Distance => {
                if ch.is_ascii_digit() {
                    self.distance.push(ch);
                    true
                } else if (ch == '.' || ch == ',') && !self.distance.contains('.') {
                    self.distance.push('.');
                    true
                } else {
                    false
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            EntryField::Date => {
                self.date.pop();
            }
            EntryField::Distance => {
                self.distance.pop();
            }
        }
    }

    /// Validate the inputs and return typed values ready for the store.
    pub(crate) fn parse_inputs(&self) -> Result<(NaiveDate, f64)> {
        let date_raw = self.date.trim();
        if date_raw.is_empty() {
            return Err(anyhow!("Date is required."));
        }
        let distance_raw = self.distance.trim();
        if distance_raw.is_empty() {
            return Err(anyhow!("Distance is required."));
        }

        let date = Record::parse_date(date_raw)
            .map_err(|_| anyhow!("Date must be a calendar day in YYYY-MM-DD form."))?;
        let distance = distance_raw
            .parse::<f64>()
            .map_err(|_| anyhow!("Distance must be a number of kilometres."))?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(anyhow!("Distance cannot be negative."));
        }
        Ok((date, distance))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: EntryField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: EntryField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: EntryField) -> &str {
        match field {
            EntryField::Date => &self.date,
            EntryField::Distance => &self.distance,
        }
    }
}

/// Row awaiting a Y/N before it is removed.
#[derive(Clone)]
pub(crate) struct ConfirmRemove {
    pub(crate) index: usize,
    pub(crate) record: Record,
}
