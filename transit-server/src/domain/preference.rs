//! User preferences and the weighted scoring model.
//!
//! A route's four metrics are collapsed into one comparable number:
//! `Σ weight × value`, with the transfer count amplified first because a
//! single change of line is far more unpleasant than its raw count of 1
//! suggests. Lower scores are better.

use std::fmt;

use tracing::debug;

use super::{DomainError, Metrics};

/// Multiplier applied to the transfer count before weighting.
pub const TRANSFER_AMPLIFICATION: f64 = 10.0;

/// A metric a user can express a preference about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Time,
    Distance,
    Transfers,
    Cost,
}

impl Criterion {
    /// Parse a criterion name (English or Spanish), case-insensitively.
    ///
    /// Returns `None` for names the model doesn't know.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "time" | "tiempo" => Some(Criterion::Time),
            "distance" | "distancia" => Some(Criterion::Distance),
            "transfers" | "transbordos" => Some(Criterion::Transfers),
            "cost" | "costo" => Some(Criterion::Cost),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Time => "time",
            Criterion::Distance => "distance",
            Criterion::Transfers => "transfers",
            Criterion::Cost => "cost",
        }
    }

    /// The raw value this criterion scores, before weighting.
    fn value(&self, metrics: &Metrics) -> f64 {
        match self {
            Criterion::Time => f64::from(metrics.time_mins),
            Criterion::Distance => metrics.distance_km,
            Criterion::Transfers => f64::from(metrics.transfers) * TRANSFER_AMPLIFICATION,
            Criterion::Cost => f64::from(metrics.cost),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A weight in `[0, 1]` attached to one criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preference {
    criterion: Criterion,
    weight: f64,
}

impl Preference {
    pub fn new(criterion: Criterion, weight: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(DomainError::InvalidWeight {
                criterion: criterion.as_str().to_string(),
                weight,
            });
        }
        Ok(Self { criterion, weight })
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// An ordered list of preferences. Weights need not sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    items: Vec<Preference>,
}

impl Preferences {
    pub fn new(items: Vec<Preference>) -> Self {
        Self { items }
    }

    /// Build preferences from `(name, weight)` pairs.
    ///
    /// Unknown names are skipped; weights outside `[0, 1]` are an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::Preferences;
    ///
    /// let prefs = Preferences::from_named([("time", 0.3), ("transbordos", 0.5), ("comfort", 0.9)])
    ///     .unwrap();
    /// assert_eq!(prefs.len(), 2);
    ///
    /// assert!(Preferences::from_named([("time", 1.5)]).is_err());
    /// ```
    pub fn from_named<'a, I>(pairs: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut items = Vec::new();
        for (name, weight) in pairs {
            match Criterion::parse(name) {
                Some(criterion) => items.push(Preference::new(criterion, weight)?),
                None => debug!(name, "ignoring unknown preference"),
            }
        }
        Ok(Self { items })
    }

    /// Collapse metrics into a single score. Lower is better.
    pub fn score(&self, metrics: &Metrics) -> f64 {
        self.items
            .iter()
            .map(|p| p.weight * p.criterion.value(metrics))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preference> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stable textual form, e.g. `time=0.5;transfers=0.3`.
    pub fn cache_key(&self) -> String {
        self.items
            .iter()
            .map(|p| format!("{}={}", p.criterion, p.weight))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            items: vec![
                Preference {
                    criterion: Criterion::Time,
                    weight: 0.5,
                },
                Preference {
                    criterion: Criterion::Transfers,
                    weight: 0.3,
                },
                Preference {
                    criterion: Criterion::Distance,
                    weight: 0.1,
                },
                Preference {
                    criterion: Criterion::Cost,
                    weight: 0.1,
                },
            ],
        }
    }
}
