use crate::types::daily_record::Channel;
use serde::Serialize;
use std::collections::BTreeMap;

/// One optional value per temperature channel. `None` means no qualifying observations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TemperatureStats {
    pub tmax: Option<f64>,
    pub tmin: Option<f64>,
    pub tmean: Option<f64>,
}

impl TemperatureStats {
    pub fn get(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Max => self.tmax,
            Channel::Min => self.tmin,
            Channel::Mean => self.tmean,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tmax.is_none() && self.tmin.is_none() && self.tmean.is_none()
    }
}

/// Values keyed by year, ascending. Years without qualifying data are absent rather than
/// zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearlyAggregate<V> {
    values: BTreeMap<i32, V>,
}

impl<V> YearlyAggregate<V> {
    pub fn get(&self, year: i32) -> Option<&V> {
        self.values.get(&year)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.values.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &V)> + '_ {
        self.values.iter().map(|(year, v)| (*year, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<i32, V> {
        self.values
    }
}

impl<V> Default for YearlyAggregate<V> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<V> FromIterator<(i32, V)> for YearlyAggregate<V> {
    fn from_iter<I: IntoIterator<Item = (i32, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
