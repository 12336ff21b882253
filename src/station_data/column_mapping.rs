//! Which CSV headers feed which field of a [`DailyRecord`](crate::DailyRecord).

use crate::types::daily_record::Channel;

/// A field of a daily station record, as read from a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationField {
    Date,
    Temperature(Channel),
}

impl StationField {
    pub const ALL: [StationField; 4] = [
        StationField::Date,
        StationField::Temperature(Channel::Max),
        StationField::Temperature(Channel::Min),
        StationField::Temperature(Channel::Mean),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StationField::Date => "date",
            StationField::Temperature(channel) => channel.column_name(),
        }
    }
}

/// Header aliases per field. Matching ignores case and surrounding whitespace; the first
/// alias present in the file wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    date: Vec<String>,
    tmax: Vec<String>,
    tmin: Vec<String>,
    tmean: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            date: owned(&["time", "date"]),
            tmax: owned(&["tlmax", "tmax"]),
            tmin: owned(&["tlmin", "tmin"]),
            tmean: owned(&["tl_mittel", "tmean"]),
        }
    }
}

impl ColumnMapping {
    pub fn candidates(&self, field: StationField) -> &[String] {
        match field {
            StationField::Date => &self.date,
            StationField::Temperature(Channel::Max) => &self.tmax,
            StationField::Temperature(Channel::Min) => &self.tmin,
            StationField::Temperature(Channel::Mean) => &self.tmean,
        }
    }

    /// Adds `alias` with the highest priority for `field`.
    pub fn with_alias(mut self, field: StationField, alias: impl Into<String>) -> Self {
        let slot = match field {
            StationField::Date => &mut self.date,
            StationField::Temperature(Channel::Max) => &mut self.tmax,
            StationField::Temperature(Channel::Min) => &mut self.tmin,
            StationField::Temperature(Channel::Mean) => &mut self.tmean,
        };
        slot.insert(0, alias.into());
        self
    }

    /// Finds the header in `columns` that supplies `field`.
    pub fn resolve<'a>(&self, field: StationField, columns: &[&'a str]) -> Option<&'a str> {
        self.candidates(field).iter().find_map(|candidate| {
            columns
                .iter()
                .find(|column| column.trim().eq_ignore_ascii_case(candidate.trim()))
                .copied()
        })
    }
}
