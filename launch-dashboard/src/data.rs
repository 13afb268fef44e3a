// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Core data types shared by the loader, the chart functions and the HTTP server.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wire value of the "all sites" sentinel.
pub const ALL_SITES: &str = "ALL";

/// Binary launch outcome, stored as the `class` column (1 = success, 0 = failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    pub fn class(&self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }

    /// Fixed slice color, independent of which outcome is more frequent.
    pub fn color(&self) -> &'static str {
        match self {
            Outcome::Failure => "#f54242",
            Outcome::Success => "#42f56c",
        }
    }
}

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
    pub flight_number: Option<i64>,
    pub booster_version: Option<String>,
}

// ============================================================================
// Control values
// ============================================================================

/// Value of the site selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn as_str(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(name) => name,
        }
    }

    /// True when `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => name == site,
        }
    }
}

impl From<&str> for SiteSelection {
    /// `"ALL"` and the cleared (empty) selector both mean every site.
    /// Any other value is kept verbatim so it compares equal to the stored site name.
    fn from(value: &str) -> Self {
        let sentinel = value.trim();
        if sentinel.is_empty() || sentinel == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SiteSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SiteSelection::from(s.as_str()))
    }
}

impl Serialize for SiteSelection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Inclusive payload mass interval in kilograms.
///
/// An inverted interval (`low > high`) is representable and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        payload_mass_kg >= self.low && payload_mass_kg <= self.high
    }

    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRangeError {
    #[error("payload range must be 'low,high', got '{0}'")]
    Shape(String),

    #[error("invalid payload bound '{0}'")]
    Bound(String),
}

/// Parses the slider wire format `"low,high"`.
impl FromStr for PayloadRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once(',')
            .ok_or_else(|| ParseRangeError::Shape(s.to_string()))?;

        let parse_bound = |raw: &str| -> Result<f64, ParseRangeError> {
            let raw = raw.trim();
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(ParseRangeError::Bound(raw.to_string())),
            }
        };

        Ok(PayloadRange::new(parse_bound(low)?, parse_bound(high)?))
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

/// Serialized as `[low, high]`, matching the slider's value shape.
impl Serialize for PayloadRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.low, self.high].serialize(serializer)
    }
}
