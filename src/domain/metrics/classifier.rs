//! Threshold Classifier - semaphore categories for compliance percentages.
//!
//! Two named breakpoint sets are in use:
//!
//! - [`ThresholdSet::PRIMARY`] (four buckets) backs the hierarchy trees,
//!   cards and the metas table.
//! - [`ThresholdSet::LEGACY_MAP`] (three buckets, no over-execution) backs the
//!   regional map summary.
//!
//! Missing or non-finite input classifies as `None` ("no data"), never as
//! [`Category::Bajo`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Percentage, ValidationError};

/// Ordinal health category of a compliance percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bajo,
    Vulnerable,
    Buena,
    Sobreejecucion,
}

/// Colour used by the front-end for each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemaphoreColor {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Category {
    /// Returns the wire label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bajo => "bajo",
            Category::Vulnerable => "vulnerable",
            Category::Buena => "buena",
            Category::Sobreejecucion => "sobreejecucion",
        }
    }

    pub fn color(&self) -> SemaphoreColor {
        match self {
            Category::Bajo => SemaphoreColor::Red,
            Category::Vulnerable => SemaphoreColor::Yellow,
            Category::Buena => SemaphoreColor::Green,
            Category::Sobreejecucion => SemaphoreColor::Blue,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Breakpoints of a semaphore scale.
///
/// `p < vulnerable_from` is bajo, `p < buena_from` is vulnerable, and
/// anything above `over_execution_above` (when set) is sobreejecucion.
/// The upper bound is inclusive for buena: `p == over_execution_above` is buena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub vulnerable_from: f64,
    pub buena_from: f64,
    #[serde(default)]
    pub over_execution_above: Option<f64>,
}

impl ThresholdSet {
    /// Four-bucket scale: 83 / 90 / above 100.59.
    pub const PRIMARY: ThresholdSet = ThresholdSet {
        vulnerable_from: 83.0,
        buena_from: 90.0,
        over_execution_above: Some(100.59),
    };

    /// Three-bucket scale used by the map view: 70 / 85.
    pub const LEGACY_MAP: ThresholdSet = ThresholdSet {
        vulnerable_from: 70.0,
        buena_from: 85.0,
        over_execution_above: None,
    };

    /// Creates a custom threshold set, validating breakpoint order.
    pub fn new(
        vulnerable_from: f64,
        buena_from: f64,
        over_execution_above: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let set = Self {
            vulnerable_from,
            buena_from,
            over_execution_above,
        };
        set.validate()?;
        Ok(set)
    }

    /// Checks that breakpoints are finite and ascending.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let bounds = [
            Some(self.vulnerable_from),
            Some(self.buena_from),
            self.over_execution_above,
        ];
        if bounds.iter().flatten().any(|b| !b.is_finite()) {
            return Err(ValidationError::invalid_format(
                "thresholds",
                "breakpoints must be finite numbers",
            ));
        }
        let ordered = self.vulnerable_from <= self.buena_from
            && self
                .over_execution_above
                .map_or(true, |over| self.buena_from <= over);
        if !ordered {
            return Err(ValidationError::invalid_format(
                "thresholds",
                "breakpoints must be in ascending order",
            ));
        }
        Ok(())
    }

    /// Classifies a percentage, `None` meaning "no data".
    pub fn classify(&self, percentage: Option<Percentage>) -> Option<Category> {
        percentage.and_then(|p| self.classify_value(p.exact()))
    }

    /// Classifies a raw whole-number percentage; NaN and infinities yield `None`.
    pub fn classify_value(&self, value: f64) -> Option<Category> {
        if !value.is_finite() {
            return None;
        }
        let category = if value < self.vulnerable_from {
            Category::Bajo
        } else if value < self.buena_from {
            Category::Vulnerable
        } else {
            match self.over_execution_above {
                Some(over) if value > over => Category::Sobreejecucion,
                _ => Category::Buena,
            }
        };
        Some(category)
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self::PRIMARY
    }
}

/// Named preset or inline threshold set, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSpec {
    Preset(ThresholdPreset),
    Custom(ThresholdSet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
    Primary,
    LegacyMap,
}

impl ThresholdSpec {
    pub fn resolve(&self) -> ThresholdSet {
        match self {
            ThresholdSpec::Preset(ThresholdPreset::Primary) => ThresholdSet::PRIMARY,
            ThresholdSpec::Preset(ThresholdPreset::LegacyMap) => ThresholdSet::LEGACY_MAP,
            ThresholdSpec::Custom(set) => *set,
        }
    }
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        ThresholdSpec::Preset(ThresholdPreset::Primary)
    }
}

/// Tally of categories over a set of percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub bajo: usize,
    pub vulnerable: usize,
    pub buena: usize,
    pub sobreejecucion: usize,
    pub no_data: usize,
}

impl CategoryBreakdown {
    pub fn record(&mut self, category: Option<Category>) {
        match category {
            Some(Category::Bajo) => self.bajo += 1,
            Some(Category::Vulnerable) => self.vulnerable += 1,
            Some(Category::Buena) => self.buena += 1,
            Some(Category::Sobreejecucion) => self.sobreejecucion += 1,
            None => self.no_data += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.bajo + self.vulnerable + self.buena + self.sobreejecucion + self.no_data
    }
}

impl FromIterator<Option<Category>> for CategoryBreakdown {
    fn from_iter<I: IntoIterator<Item = Option<Category>>>(iter: I) -> Self {
        let mut breakdown = CategoryBreakdown::default();
        for category in iter {
            breakdown.record(category);
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary(value: f64) -> Option<Category> {
        ThresholdSet::PRIMARY.classify_value(value)
    }

    fn legacy(value: f64) -> Option<Category> {
        ThresholdSet::LEGACY_MAP.classify_value(value)
    }

    #[test]
    fn primary_boundaries() {
        assert_eq!(primary(82.9), Some(Category::Bajo));
        assert_eq!(primary(83.0), Some(Category::Vulnerable));
        assert_eq!(primary(89.99), Some(Category::Vulnerable));
        assert_eq!(primary(90.0), Some(Category::Buena));
        assert_eq!(primary(100.59), Some(Category::Buena));
        assert_eq!(primary(100.6), Some(Category::Sobreejecucion));
    }

    #[test]
    fn legacy_map_boundaries() {
        assert_eq!(legacy(69.99), Some(Category::Bajo));
        assert_eq!(legacy(70.0), Some(Category::Vulnerable));
        assert_eq!(legacy(84.99), Some(Category::Vulnerable));
        assert_eq!(legacy(85.0), Some(Category::Buena));
        assert_eq!(legacy(250.0), Some(Category::Buena));
    }

    #[test]
    fn zero_is_bajo() {
        assert_eq!(primary(0.0), Some(Category::Bajo));
    }

    #[test]
    fn non_finite_is_no_data() {
        assert_eq!(primary(f64::NAN), None);
        assert_eq!(primary(f64::INFINITY), None);
        assert_eq!(legacy(f64::NEG_INFINITY), None);
    }

    #[test]
    fn missing_percentage_is_no_data() {
        assert_eq!(ThresholdSet::PRIMARY.classify(None), None);
        assert_eq!(
            ThresholdSet::PRIMARY.classify(Percentage::from_whole(95.0)),
            Some(Category::Buena)
        );
    }

    #[test]
    fn near_boundary_ratios_classify_before_rounding() {
        // 82.996 shows as 83.00 and 100.594 as 100.59
        let just_below = Percentage::of(Some(82_996.0), Some(100_000.0));
        let just_above = Percentage::of(Some(100_594.0), Some(100_000.0));

        assert_eq!(just_below.unwrap().value(), 83.0);
        assert_eq!(ThresholdSet::PRIMARY.classify(just_below), Some(Category::Bajo));
        assert_eq!(just_above.unwrap().value(), 100.59);
        assert_eq!(
            ThresholdSet::PRIMARY.classify(just_above),
            Some(Category::Sobreejecucion)
        );
    }

    #[test]
    fn custom_set_rejects_unordered_breakpoints() {
        assert!(ThresholdSet::new(90.0, 80.0, None).is_err());
        assert!(ThresholdSet::new(80.0, 90.0, Some(85.0)).is_err());
        assert!(ThresholdSet::new(f64::NAN, 90.0, None).is_err());
        assert!(ThresholdSet::new(60.0, 80.0, Some(110.0)).is_ok());
    }

    #[test]
    fn threshold_preset_or_inline_set_resolves() {
        let preset: ThresholdSpec = serde_json::from_str("\"legacy_map\"").unwrap();
        assert_eq!(preset.resolve(), ThresholdSet::LEGACY_MAP);

        let custom: ThresholdSpec =
            serde_json::from_str(r#"{"vulnerable_from": 50, "buena_from": 75}"#).unwrap();
        let set = custom.resolve();
        assert_eq!(set.buena_from, 75.0);
        assert_eq!(set.over_execution_above, None);

        assert_eq!(ThresholdSpec::default().resolve(), ThresholdSet::PRIMARY);
    }

    #[test]
    fn category_labels_and_colors() {
        assert_eq!(Category::Sobreejecucion.label(), "sobreejecucion");
        assert_eq!(Category::Bajo.color(), SemaphoreColor::Red);
        assert_eq!(Category::Vulnerable.color(), SemaphoreColor::Yellow);
        assert_eq!(
            serde_json::to_string(&Category::Buena).unwrap(),
            "\"buena\""
        );
    }

    #[test]
    fn breakdown_counts_no_data_separately() {
        let breakdown: CategoryBreakdown = vec![
            Some(Category::Bajo),
            Some(Category::Buena),
            Some(Category::Buena),
            None,
        ]
        .into_iter()
        .collect();

        assert_eq!(breakdown.buena, 2);
        assert_eq!(breakdown.bajo, 1);
        assert_eq!(breakdown.no_data, 1);
        assert_eq!(breakdown.total(), 4);
    }
}
