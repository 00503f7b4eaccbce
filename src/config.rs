//! # Configuration Files
//!
//! Rule tables can be loaded from JSON instead of using the builtin catalog:
//!
//! ```json
//! {
//!   "rules": [
//!     { "product": "paver-4x8", "lines": 3, "columns": 15 },
//!     { "product": "paver-12x12", "lines": 6, "columns": 15,
//!       "allow_cross": true, "reduced_columns": 12, "graphic_fee": "25.00" }
//!   ]
//! }
//! ```
//!
//! Every rule is checked on load; one bad entry refuses the whole file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PaversError;
use crate::rules::{GridRule, Money, RuleTable};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    rules: Vec<RuleEntry>,
}

/// One rule as written in the file. Spelled out field by field because serde
/// cannot refuse unknown keys through `#[serde(flatten)]`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    product: String,
    lines: usize,
    columns: usize,
    #[serde(default)]
    allow_cross: bool,
    #[serde(default)]
    reduced_columns: Option<usize>,
    #[serde(default)]
    graphic_fee: Money,
}

impl RuleEntry {
    fn new(product: &str, rule: &GridRule) -> Self {
        Self {
            product: product.to_string(),
            lines: rule.lines,
            columns: rule.columns,
            allow_cross: rule.allow_cross,
            reduced_columns: rule.reduced_columns,
            graphic_fee: rule.graphic_fee,
        }
    }

    fn into_parts(self) -> (String, GridRule) {
        let rule = GridRule {
            lines: self.lines,
            columns: self.columns,
            allow_cross: self.allow_cross,
            reduced_columns: self.reduced_columns,
            graphic_fee: self.graphic_fee,
        };
        (self.product, rule)
    }
}

impl RuleTable {
    /// Parse a rule table from JSON.
    pub fn from_json(json: &str) -> Result<Self, PaversError> {
        let file: RuleFile = serde_json::from_str(json)?;
        let mut table = RuleTable::new();
        for entry in file.rules {
            let (product, rule) = entry.into_parts();
            table.insert(product, rule).map_err(PaversError::Config)?;
        }
        Ok(table)
    }

    /// Read a rule table file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaversError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
            .map_err(|e| PaversError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Serialize in the same format [`RuleTable::from_json`] reads.
    pub fn to_json(&self) -> Result<String, PaversError> {
        let file = RuleFile {
            rules: self
                .iter()
                .map(|(product, rule)| RuleEntry::new(product, rule))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

/// Buyer-facing texts shown around the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notices {
    pub success: String,
    pub error: String,
    pub disclaimer: String,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            success: "Thank you for your submission! We will contact you soon.".to_string(),
            error: "Something went wrong. Please try again later.".to_string(),
            disclaimer: "Your message will be reviewed before engraving.".to_string(),
        }
    }
}
