//! Category definitions and drawable values
//!
//! A category is a named, weighted, finite pool of numbers `1..=count`.
//! Values may carry a suffix tag (`12T`) when the category is configured
//! with the suffixed format.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::selector::TICKET_RESOLUTION;

/// Suffix used by the suffixed format when none is configured
pub const DEFAULT_SUFFIX: &str = "T";

/// Largest number of values a single category may hold
pub const MAX_COUNT: i64 = 1_000_000;

/// Largest accepted weight. At `TICKET_RESOLUTION` this is a billion
/// tickets per category, so ticket totals stay far from `u64::MAX`.
pub const MAX_WEIGHT: f64 = 1_000_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("No categories configured")]
    NoCategories,

    #[error("Category ID must not be empty")]
    EmptyId,

    #[error("Duplicate category ID: {0}")]
    DuplicateCategory(CategoryId),

    #[error("Category {0} must have a positive count, got {1}")]
    NonPositiveCount(CategoryId, i64),

    #[error("Category {0} count {1} is too large (at most {max})", max = MAX_COUNT)]
    CountTooLarge(CategoryId, i64),

    #[error("Category {0} has invalid weight {1}: weights must be finite and non-negative")]
    InvalidWeight(CategoryId, f64),

    #[error("Category {0} weight {1} is below the smallest selectable weight (1/{res})", res = TICKET_RESOLUTION)]
    WeightTooSmall(CategoryId, f64),

    #[error("Category {0} weight {1} is too large (at most {max})", max = MAX_WEIGHT)]
    WeightTooLarge(CategoryId, f64),
}

/// Category identifier (e.g. `yellow`, `red`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How values of a category are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Bare numbers: `1`, `2`, ...
    #[default]
    Plain,
    /// Numbers followed by the category suffix: `1T`, `2T`, ...
    Suffixed,
}

fn default_weight() -> f64 {
    1.0
}

/// A category as written in configuration, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub id: String,

    /// Number of values; the pool holds `1..=count`
    pub count: i64,

    /// Relative selection weight
    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub format: ValueFormat,

    /// Suffix tag for the suffixed format (defaults to `T`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Display colour, only meaningful to the presentation layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategorySpec {
    /// Creates a plain category with weight 1
    pub fn new(id: impl Into<String>, count: i64) -> Self {
        Self {
            id: id.into(),
            count,
            weight: default_weight(),
            format: ValueFormat::Plain,
            suffix: None,
            color: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn suffixed(mut self, suffix: impl Into<String>) -> Self {
        self.format = ValueFormat::Suffixed;
        self.suffix = Some(suffix.into());
        self
    }
}

/// A validated category
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    id: CategoryId,
    count: u32,
    weight: f64,
    suffix: Option<String>,
    color: Option<String>,
}

impl Category {
    /// Validates a single category definition
    pub fn from_spec(spec: &CategorySpec) -> Result<Self, ConfigError> {
        let id = spec.id.trim();
        if id.is_empty() {
            return Err(ConfigError::EmptyId);
        }
        let id = CategoryId::new(id);

        if spec.count <= 0 {
            return Err(ConfigError::NonPositiveCount(id, spec.count));
        }
        if spec.count > MAX_COUNT {
            return Err(ConfigError::CountTooLarge(id, spec.count));
        }
        let count =
            u32::try_from(spec.count).map_err(|_| ConfigError::CountTooLarge(id.clone(), spec.count))?;

        if !spec.weight.is_finite() || spec.weight < 0.0 {
            return Err(ConfigError::InvalidWeight(id, spec.weight));
        }
        // A positive weight that floors to zero tickets would silently never be drawn
        if spec.weight > 0.0 && (spec.weight * f64::from(TICKET_RESOLUTION)).floor() < 1.0 {
            return Err(ConfigError::WeightTooSmall(id, spec.weight));
        }
        if spec.weight > MAX_WEIGHT {
            return Err(ConfigError::WeightTooLarge(id, spec.weight));
        }

        let suffix = match spec.format {
            ValueFormat::Plain => None,
            ValueFormat::Suffixed => Some(
                spec.suffix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
            ),
        };

        Ok(Self {
            id,
            count,
            weight: spec.weight,
            suffix,
            color: spec.color.clone(),
        })
    }

    /// Validates an ordered list of specs; fails on the first invalid entry
    pub fn from_specs(specs: &[CategorySpec]) -> Result<Vec<Self>, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(specs.len());
        for spec in specs {
            let category = Self::from_spec(spec)?;
            if !seen.insert(category.id.clone()) {
                return Err(ConfigError::DuplicateCategory(category.id));
            }
            categories.push(category);
        }

        Ok(categories)
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Builds the drawable value for a number of this category
    pub fn value(&self, number: u32) -> DrawValue {
        DrawValue {
            number,
            suffix: self.suffix.clone(),
        }
    }
}

/// A single drawable value: a number with an optional suffix tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawValue {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl fmt::Display for DrawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => f.pad(&format!("{}{}", self.number, suffix)),
            None => f.pad(&self.number.to_string()),
        }
    }
}

/// A candidate or committed draw: which category, which value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Draw {
    pub category: CategoryId,
    pub value: DrawValue,
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.category)
    }
}
