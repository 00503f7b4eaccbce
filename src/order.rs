//! # Order Projection
//!
//! Flattens a personalization record into display-ready facts when an order
//! is created. The facts are plain copies: later rule-table changes do not
//! reach orders that already exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartLine, compute_fee};
use crate::record::PersonalizationRecord;
use crate::rules::{Money, RuleTable};

pub const LABEL_LINES: &str = "Personalization";
pub const LABEL_CROSS: &str = "Cross";
pub const LABEL_GRAPHIC: &str = "Graphic";
pub const LABEL_ALIGNMENT: &str = "Alignment";
pub const LABEL_COLUMNS: &str = "Characters per line";

/// One labelled value stored on an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFact {
    pub label: String,
    pub value: String,
}

impl OrderFact {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Facts for production, in display order.
pub fn project_for_order(record: &PersonalizationRecord) -> Vec<OrderFact> {
    let text = record
        .lines()
        .iter()
        .map(|line| line.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut facts = vec![OrderFact::new(LABEL_LINES, text)];
    if record.cross_selected() {
        facts.push(OrderFact::new(LABEL_CROSS, "Yes"));
    }
    if let Some(graphic) = record.graphic() {
        facts.push(OrderFact::new(
            LABEL_GRAPHIC,
            format!("{} ({})", graphic.id, graphic.url),
        ));
    }
    facts.push(OrderFact::new(LABEL_ALIGNMENT, record.alignment().to_string()));
    facts.push(OrderFact::new(
        LABEL_COLUMNS,
        record.effective_columns().to_string(),
    ));
    facts
}

/// A finalized order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: String,
    pub quantity: u32,
    pub facts: Vec<OrderFact>,
}

impl OrderLine {
    /// Copy a cart line's facts at this moment.
    pub fn snapshot(line: &CartLine) -> Self {
        Self {
            product: line.product.clone(),
            quantity: line.quantity,
            facts: line
                .personalization
                .as_ref()
                .map(project_for_order)
                .unwrap_or_default(),
        }
    }
}

/// An order created from a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
    pub graphic_fee: Money,
}

impl Order {
    pub fn from_cart(id: impl Into<String>, lines: &[CartLine], table: &RuleTable) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            lines: lines.iter().map(OrderLine::snapshot).collect(),
            graphic_fee: compute_fee(lines, table),
        }
    }
}
