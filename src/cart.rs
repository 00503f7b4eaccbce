//! # Cart Lines and Graphic Fees
//!
//! A minimal cart honouring the one contract the engine has with cart
//! storage: lines carrying different uniqueness tokens are never merged.
//! Plain lines (no personalization) of the same product merge by adding
//! quantities, as a storefront cart would.
//!
//! The graphic fee is recomputed from the current lines and the current rule
//! table on every call; nothing is cached.

use serde::{Deserialize, Serialize};

use crate::record::PersonalizationRecord;
use crate::rules::{Money, RuleTable};

/// One purchasable unit in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: String,
    pub quantity: u32,
    #[serde(default)]
    pub personalization: Option<PersonalizationRecord>,
}

impl CartLine {
    pub fn new(product: impl Into<String>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
            personalization: None,
        }
    }

    pub fn personalized(record: PersonalizationRecord, quantity: u32) -> Self {
        Self {
            product: record.product().to_string(),
            quantity,
            personalization: Some(record),
        }
    }

    fn token(&self) -> Option<&str> {
        self.personalization.as_ref().map(PersonalizationRecord::token)
    }

    fn merges_with(&self, other: &CartLine) -> bool {
        self.product == other.product && self.token() == other.token()
    }

    /// Graphic fee for this line under `table`.
    ///
    /// Zero without a graphic reference, or when the product no longer has a
    /// rule.
    pub fn graphic_fee(&self, table: &RuleTable) -> Money {
        let has_graphic = self
            .personalization
            .as_ref()
            .is_some_and(|record| record.graphic().is_some());
        if !has_graphic {
            return Money::ZERO;
        }
        table
            .resolve(&self.product)
            .map(|rule| rule.graphic_fee.times(self.quantity))
            .unwrap_or(Money::ZERO)
    }
}

/// Total graphic fee over a set of cart lines.
pub fn compute_fee(lines: &[CartLine], table: &RuleTable) -> Money {
    lines.iter().map(|line| line.graphic_fee(table)).sum()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, merging only with an identical plain line or the very
    /// same record. Returns the index of the line that holds it.
    pub fn add(&mut self, line: CartLine) -> usize {
        if let Some(index) = self.lines.iter().position(|l| l.merges_with(&line)) {
            let existing = &mut self.lines[index];
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            return index;
        }
        self.lines.push(line);
        self.lines.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empty the cart, returning its lines.
    pub fn take(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    pub fn graphic_fee(&self, table: &RuleTable) -> Money {
        compute_fee(&self.lines, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Alignment, GraphicRef, build_record};
    use crate::rules::{GridRule, SessionFlags};
    use crate::validate::validate_lines;

    fn table_with_fee(cents: u64) -> RuleTable {
        let mut table = RuleTable::new();
        table
            .insert(
                "paver-12x12",
                GridRule {
                    lines: 1,
                    columns: 15,
                    allow_cross: true,
                    reduced_columns: Some(12),
                    graphic_fee: Money::from_cents(cents),
                },
            )
            .unwrap();
        table
    }

    fn record(text: &str, graphic: bool) -> PersonalizationRecord {
        let lines = validate_lines(1, 12, &[text]).unwrap();
        let graphic = graphic.then(|| GraphicRef {
            id: "g".into(),
            url: "/api/graphics/g".into(),
        });
        let flags = SessionFlags {
            cross_selected: false,
            graphic_attached: graphic.is_some(),
        };
        build_record("paver-12x12", &lines, flags, 12, graphic, Alignment::Center).unwrap()
    }

    #[test]
    fn test_fee_counts_only_graphic_lines() {
        let table = table_with_fee(250);
        let lines = [
            CartLine::personalized(record("WITH LOGO", true), 2),
            CartLine::personalized(record("NO LOGO", false), 5),
        ];
        assert_eq!(compute_fee(&lines, &table).to_string(), "5.00");
    }

    #[test]
    fn test_fee_zero_when_rule_removed() {
        let lines = [CartLine::personalized(record("LOGO", true), 1)];
        assert_eq!(compute_fee(&lines, &RuleTable::new()), Money::ZERO);
    }

    #[test]
    fn test_fee_follows_current_table() {
        let lines = [CartLine::personalized(record("LOGO", true), 3)];
        assert_eq!(compute_fee(&lines, &table_with_fee(100)).to_string(), "3.00");
        assert_eq!(compute_fee(&lines, &table_with_fee(200)).to_string(), "6.00");
    }

    #[test]
    fn test_identical_personalizations_stay_separate() {
        let mut cart = Cart::new();
        let a = cart.add(CartLine::personalized(record("SAME", false), 1));
        let b = cart.add(CartLine::personalized(record("SAME", false), 1));
        assert_ne!(a, b);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_plain_lines_merge() {
        let mut cart = Cart::new();
        cart.add(CartLine::new("paver-4x8", 1));
        cart.add(CartLine::new("paver-4x8", 2));
        cart.add(CartLine::new("paver-8x8", 1));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_same_record_merges() {
        let mut cart = Cart::new();
        let rec = record("AGAIN", false);
        cart.add(CartLine::personalized(rec.clone(), 1));
        cart.add(CartLine::personalized(rec, 1));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_remove_and_take() {
        let mut cart = Cart::new();
        cart.add(CartLine::new("paver-4x8", 1));
        assert!(cart.remove(3).is_none());
        assert!(cart.remove(0).is_some());
        assert!(cart.is_empty());
        cart.add(CartLine::new("paver-4x8", 1));
        assert_eq!(cart.take().len(), 1);
        assert!(cart.is_empty());
    }
}
