//! Data models for the exoplanet census.
//!
//! This module contains the catalog record type, the size classification
//! used by the discovery timeline, and the report structures produced
//! at the end of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// `TypeFlag` value marking a planet with no host star.
pub const ORPHAN_TYPE_FLAG: i64 = 3;

/// Upper bound (exclusive, Jupiter radii) of a small planet.
pub const SMALL_RADIUS_LIMIT: f64 = 1.0;

/// Upper bound (exclusive, Jupiter radii) of a medium planet.
pub const MEDIUM_RADIUS_LIMIT: f64 = 2.0;

/// Discovery year of a catalog entry.
///
/// Every distinct raw value is its own group. The empty string, `null`
/// and a missing key are kept apart because the timeline only drops the
/// empty-string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DiscoveryYear {
    /// A recorded year.
    Year(i64),
    /// The empty-string marker (`""`).
    Blank,
    /// Field was `null`.
    Null,
    /// Any other value, kept as its text.
    Other(String),
    /// Field was absent.
    #[default]
    Absent,
}

impl DiscoveryYear {
    /// True for the empty-string marker only.
    pub fn is_blank(&self) -> bool {
        matches!(self, DiscoveryYear::Blank)
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => DiscoveryYear::Null,
            Value::Number(n) => match number_as_integer(n) {
                Some(y) => DiscoveryYear::Year(y),
                None => DiscoveryYear::Other(n.to_string()),
            },
            Value::String(s) if s.is_empty() => DiscoveryYear::Blank,
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(DiscoveryYear::Year)
                .unwrap_or_else(|_| DiscoveryYear::Other(s.clone())),
            other => DiscoveryYear::Other(other.to_string()),
        }
    }

    /// Text used for ordering; `None` for an absent value.
    fn sort_text(&self) -> Option<Cow<'_, str>> {
        match self {
            DiscoveryYear::Year(y) => Some(Cow::Owned(y.to_string())),
            DiscoveryYear::Blank => Some(Cow::Borrowed("")),
            DiscoveryYear::Null => Some(Cow::Borrowed("null")),
            DiscoveryYear::Other(s) => Some(Cow::Borrowed(s.as_str())),
            DiscoveryYear::Absent => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            DiscoveryYear::Year(_) => 0,
            DiscoveryYear::Blank => 1,
            DiscoveryYear::Null => 2,
            DiscoveryYear::Other(_) => 3,
            DiscoveryYear::Absent => 4,
        }
    }
}

/// Values order by their text, absent values last.
///
/// For the catalog's four-digit years this is the same as numeric order.
impl Ord for DiscoveryYear {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.sort_text(), other.sort_text()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.rank().cmp(&other.rank())),
        }
    }
}

impl PartialOrd for DiscoveryYear {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DiscoveryYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryYear::Year(y) => write!(f, "{}", y),
            DiscoveryYear::Blank => write!(f, "(blank)"),
            DiscoveryYear::Null => write!(f, "null"),
            DiscoveryYear::Other(s) => write!(f, "{}", s),
            DiscoveryYear::Absent => write!(f, "unknown"),
        }
    }
}

impl Serialize for DiscoveryYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DiscoveryYear::Year(y) => serializer.serialize_i64(*y),
            DiscoveryYear::Blank => serializer.serialize_str(""),
            DiscoveryYear::Other(s) => serializer.serialize_str(s),
            DiscoveryYear::Null | DiscoveryYear::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DiscoveryYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(DiscoveryYear::from_json(&value))
    }
}

/// A single entry of the exoplanet catalog.
///
/// Field decoding is lenient: a value of an unexpected JSON type is read
/// as "unknown" for that field instead of rejecting the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlanetRecord {
    /// Display name of the planet. Not guaranteed unique.
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub planet_identifier: String,
    /// Planet classification; `3` marks an orphan planet.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub type_flag: Option<i64>,
    /// Planet radius in Jupiter radii.
    #[serde(default, deserialize_with = "lenient_number")]
    pub radius_jpt: Option<f64>,
    /// Year of discovery.
    #[serde(default)]
    pub discovery_year: DiscoveryYear,
    /// Host star effective temperature in Kelvin.
    #[serde(default, deserialize_with = "lenient_number")]
    pub host_star_temp_k: Option<f64>,
}

impl PlanetRecord {
    /// Creates a record with only an identifier set.
    #[cfg(test)]
    pub fn named(identifier: &str) -> Self {
        Self {
            planet_identifier: identifier.to_string(),
            ..Self::default()
        }
    }

    /// Whether this planet has no host star.
    ///
    /// A flag of `0` is treated the same as a missing flag.
    pub fn is_orphan(&self) -> bool {
        match self.type_flag {
            Some(0) | None => false,
            Some(flag) => flag == ORPHAN_TYPE_FLAG,
        }
    }

    /// Size class derived from the radius, if the radius is known.
    pub fn size_class(&self) -> Option<SizeClass> {
        self.radius_jpt.and_then(SizeClass::from_radius)
    }
}

fn number_as_integer(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn lenient_identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => number_as_integer(&n),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

/// Radius-based size class of a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Radius below 1 Jupiter radius.
    Small,
    /// Radius in [1, 2) Jupiter radii.
    Medium,
    /// Radius of 2 Jupiter radii or more.
    Large,
}

impl SizeClass {
    /// Classify a radius given in Jupiter radii. NaN has no class.
    pub fn from_radius(radius_jpt: f64) -> Option<Self> {
        if radius_jpt.is_nan() {
            None
        } else if radius_jpt < SMALL_RADIUS_LIMIT {
            Some(SizeClass::Small)
        } else if radius_jpt < MEDIUM_RADIUS_LIMIT {
            Some(SizeClass::Medium)
        } else {
            Some(SizeClass::Large)
        }
    }
}

/// Planet counts by size class for one discovery year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTally {
    /// The discovery year group.
    pub year: DiscoveryYear,
    /// Planets with radius < 1 Rj.
    pub small: usize,
    /// Planets with radius in [1, 2) Rj.
    pub medium: usize,
    /// Planets with radius >= 2 Rj.
    pub large: usize,
}

impl YearTally {
    /// Creates an empty tally for a year.
    pub fn new(year: DiscoveryYear) -> Self {
        Self {
            year,
            small: 0,
            medium: 0,
            large: 0,
        }
    }

    /// Adds one planet of the given class.
    pub fn record(&mut self, class: SizeClass) {
        match class {
            SizeClass::Small => self.small += 1,
            SizeClass::Medium => self.medium += 1,
            SizeClass::Large => self.large += 1,
        }
    }

    /// Number of planets with a known radius in this year.
    pub fn total(&self) -> usize {
        self.small + self.medium + self.large
    }
}

/// Year-ordered breakdown of discoveries by size class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    /// One tally per distinct year, ascending.
    pub entries: Vec<YearTally>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up the tally for a recorded year.
    #[cfg(test)]
    pub fn get(&self, year: i64) -> Option<&YearTally> {
        self.entries
            .iter()
            .find(|t| t.year == DiscoveryYear::Year(year))
    }

    /// Flat `year, small, medium, large, ...` sequence.
    ///
    /// `null` and absent year groups both render as `null`.
    pub fn flatten(&self) -> Vec<Value> {
        let mut flat = Vec::with_capacity(self.entries.len() * 4);
        for tally in &self.entries {
            flat.push(match &tally.year {
                DiscoveryYear::Year(y) => Value::from(*y),
                DiscoveryYear::Blank => Value::from(""),
                DiscoveryYear::Other(s) => Value::from(s.as_str()),
                DiscoveryYear::Null | DiscoveryYear::Absent => Value::Null,
            });
            flat.push(Value::from(tally.small));
            flat.push(Value::from(tally.medium));
            flat.push(Value::from(tally.large));
        }
        flat
    }
}

/// Metadata about a census run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// URL or file path the records came from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records analyzed.
    pub records_analyzed: usize,
    /// Wall time of fetch plus aggregation, in seconds.
    pub duration_seconds: f64,
}

/// The complete census report.
#[derive(Debug, Clone, Serialize)]
pub struct CensusReport {
    pub metadata: ReportMetadata,
    /// Number of planets without a host star.
    pub orphan_count: usize,
    /// Identifier of the planet orbiting the hottest star, or empty.
    pub hottest_star_planet: String,
    /// Discovery timeline grouped by size.
    pub timeline: Timeline,
}
