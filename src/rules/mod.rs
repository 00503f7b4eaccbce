//! # Grid Rules
//!
//! Static per-product constraints for the personalization grid.
//!
//! | Product | Lines | Columns | Cross | Reduced | Graphic fee |
//! |---------|-------|---------|-------|---------|-------------|
//! | `paver-4x8` | 3 | 15 | no | - | 0.00 |
//! | `paver-8x8` | 6 | 15 | no | - | 0.00 |
//! | `paver-12x12` | 6 | 15 | yes | 12 | 25.00 |
//! | `paver-24x24` | 8 | 24 | yes | 18 | 50.00 |
//!
//! The reduced-column widths of the two large pavers are working assumptions
//! rather than confirmed production limits. They live in the table like every
//! other value and can be replaced with a rule file (see [`crate::config`]).
//!
//! ## Usage
//!
//! ```
//! use pavers::rules::{RuleTable, SessionFlags};
//!
//! let table = RuleTable::builtin();
//! let rule = table.resolve("paver-12x12").unwrap();
//!
//! let flags = SessionFlags { cross_selected: true, graphic_attached: false };
//! assert_eq!(rule.effective_columns(flags), 12);
//! assert!(table.resolve("gift-card").is_none());
//! ```

mod money;

pub use money::{Money, ParseMoneyError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on lines per rule, keeps every grid small and bounded.
pub const MAX_LINES: usize = 32;

/// Upper bound on columns per rule.
pub const MAX_COLUMNS: usize = 64;

/// Constraint set for one personalizable product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridRule {
    /// Number of lines the buyer must fill in
    pub lines: usize,

    /// Characters per line without any add-on
    pub columns: usize,

    /// Whether the decorative cross can be selected
    #[serde(default)]
    pub allow_cross: bool,

    /// Characters per line once the cross or a graphic takes up room
    #[serde(default)]
    pub reduced_columns: Option<usize>,

    /// Charged once per unit when a graphic is attached
    #[serde(default)]
    pub graphic_fee: Money,
}

/// Add-on toggles in force for one editing or validation attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    #[serde(default)]
    pub cross_selected: bool,
    #[serde(default)]
    pub graphic_attached: bool,
}

impl GridRule {
    /// Column count in force for the given add-on toggles.
    ///
    /// The reduced width applies when it is defined and either add-on is on.
    #[inline]
    pub fn effective_columns(&self, flags: SessionFlags) -> usize {
        match self.reduced_columns {
            Some(reduced) if flags.cross_selected || flags.graphic_attached => reduced,
            _ => self.columns,
        }
    }

    /// Drop a cross request on rules that do not offer the cross.
    #[inline]
    pub fn sanitize_flags(&self, flags: SessionFlags) -> SessionFlags {
        SessionFlags {
            cross_selected: flags.cross_selected && self.allow_cross,
            ..flags
        }
    }

    /// Check the structural invariants of a rule.
    pub fn check(&self) -> Result<(), String> {
        if self.lines == 0 || self.lines > MAX_LINES {
            return Err(format!("lines must be between 1 and {MAX_LINES}"));
        }
        if self.columns == 0 || self.columns > MAX_COLUMNS {
            return Err(format!("columns must be between 1 and {MAX_COLUMNS}"));
        }
        if let Some(reduced) = self.reduced_columns {
            if reduced == 0 || reduced >= self.columns {
                return Err(format!(
                    "reduced_columns must be between 1 and {}",
                    self.columns - 1
                ));
            }
        }
        Ok(())
    }
}

const fn rule(
    lines: usize,
    columns: usize,
    allow_cross: bool,
    reduced_columns: Option<usize>,
    fee_cents: u64,
) -> GridRule {
    GridRule {
        lines,
        columns,
        allow_cross,
        reduced_columns,
        graphic_fee: Money::from_cents(fee_cents),
    }
}

const BUILTIN_RULES: &[(&str, GridRule)] = &[
    ("paver-4x8", rule(3, 15, false, None, 0)),
    ("paver-8x8", rule(6, 15, false, None, 0)),
    // Reduced widths below are assumed, not confirmed by production.
    ("paver-12x12", rule(6, 15, true, Some(12), 2500)),
    ("paver-24x24", rule(8, 24, true, Some(18), 5000)),
];

/// Product key to rule mapping. At most one rule per product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<String, GridRule>,
}

impl RuleTable {
    /// Empty table: no product is personalizable.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default paver catalog.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(key, rule)| (key.to_string(), *rule))
            .collect();
        Self { rules }
    }

    /// Add a rule, refusing duplicates and malformed rules.
    pub fn insert(&mut self, product: impl Into<String>, rule: GridRule) -> Result<(), String> {
        let product = product.into();
        if product.trim().is_empty() {
            return Err("product key must not be empty".to_string());
        }
        rule.check().map_err(|e| format!("{product}: {e}"))?;
        if self.rules.contains_key(&product) {
            return Err(format!("{product}: duplicate rule"));
        }
        self.rules.insert(product, rule);
        Ok(())
    }

    /// Rule for a product, or `None` when the product is not personalizable.
    #[inline]
    pub fn resolve(&self, product: &str) -> Option<&GridRule> {
        self.rules.get(product)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GridRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSS: SessionFlags = SessionFlags {
        cross_selected: true,
        graphic_attached: false,
    };
    const GRAPHIC: SessionFlags = SessionFlags {
        cross_selected: false,
        graphic_attached: true,
    };

    #[test]
    fn test_reduced_columns_follow_either_flag() {
        let table = RuleTable::builtin();
        for (key, rule) in table.iter() {
            let Some(reduced) = rule.reduced_columns else {
                continue;
            };
            assert_eq!(rule.effective_columns(CROSS), reduced, "{key}");
            assert_eq!(rule.effective_columns(GRAPHIC), reduced, "{key}");
            assert_eq!(
                rule.effective_columns(SessionFlags::default()),
                rule.columns,
                "{key}"
            );
        }
    }

    #[test]
    fn test_flags_ignored_without_reduced_columns() {
        let rule = rule(3, 15, false, None, 0);
        assert_eq!(rule.effective_columns(CROSS), 15);
        assert_eq!(rule.effective_columns(GRAPHIC), 15);
    }

    #[test]
    fn test_unknown_product_is_not_personalizable() {
        assert!(RuleTable::builtin().resolve("mug").is_none());
        assert!(RuleTable::new().resolve("paver-4x8").is_none());
    }

    #[test]
    fn test_builtin_rules_are_well_formed() {
        for (key, rule) in RuleTable::builtin().iter() {
            assert!(rule.check().is_ok(), "{key}");
        }
    }

    #[test]
    fn test_insert_rejects_bad_rules() {
        let mut table = RuleTable::new();
        assert!(table.insert("a", rule(0, 15, false, None, 0)).is_err());
        assert!(table.insert("a", rule(3, 15, true, Some(15), 0)).is_err());
        assert!(table.insert("a", rule(3, 15, true, Some(12), 0)).is_ok());
        assert!(table.insert("a", rule(3, 15, false, None, 0)).is_err());
        assert!(table.insert(" ", rule(3, 15, false, None, 0)).is_err());
    }

    #[test]
    fn test_sanitize_drops_unavailable_cross() {
        let plain = rule(3, 15, false, None, 0);
        assert!(!plain.sanitize_flags(CROSS).cross_selected);
        let crossable = rule(3, 15, true, Some(12), 0);
        assert!(crossable.sanitize_flags(CROSS).cross_selected);
    }

    #[test]
    fn test_rule_refuses_unknown_keys() {
        let typo = r#"{"lines": 6, "columns": 15, "reduced_column": 12}"#;
        assert!(serde_json::from_str::<GridRule>(typo).is_err());

        let ok = r#"{"lines": 6, "columns": 15, "reduced_columns": 12}"#;
        assert_eq!(
            serde_json::from_str::<GridRule>(ok).unwrap().reduced_columns,
            Some(12)
        );
    }
}
