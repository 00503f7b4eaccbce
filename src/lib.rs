//! # Pavers - Grid Personalization Engine
//!
//! Pavers captures the text a buyer wants engraved on a paver, checks it
//! against the product's grid rule, and turns accepted text into cart and
//! order data. It provides:
//!
//! - **Rules**: per-product line and column limits, cross and graphic add-ons
//! - **Validation**: the one authoritative accept/reject decision
//! - **Grid editor**: the cell-by-cell input state machine
//! - **Records**: immutable cart attachments with uniqueness tokens
//! - **Fees and orders**: graphic fees and frozen order-line facts
//!
//! ## Quick Start
//!
//! ```
//! use pavers::{
//!     order::project_for_order,
//!     record::{build_record, Alignment},
//!     rules::{RuleTable, SessionFlags},
//!     validate::validate_lines,
//! };
//!
//! let table = RuleTable::builtin();
//! let rule = table.resolve("paver-4x8").expect("personalizable");
//!
//! let flags = SessionFlags::default();
//! let columns = rule.effective_columns(flags);
//! let lines = validate_lines(rule.lines, columns, &["in memory of", "rex", "good boy"])?;
//!
//! let record = build_record("paver-4x8", &lines, flags, columns, None, Alignment::Center)?;
//! let facts = project_for_order(&record);
//! assert_eq!(facts[0].value, "IN MEMORY OF\nREX\nGOOD BOY");
//!
//! # Ok::<(), pavers::error::Rejection>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`rules`] | Rule table, column resolution, money amounts |
//! | [`charset`] | Engraving character allow-list |
//! | [`validate`] | Line validation |
//! | [`editor`] | Interactive grid editor |
//! | [`record`] | Personalization records |
//! | [`cart`] | Cart lines and graphic fees |
//! | [`order`] | Order projection |
//! | [`upload`] | Graphic upload policy and storage |
//! | [`submission`] | Authoritative submission pipeline |
//! | [`config`] | Rule files and notice texts |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod cart;
pub mod charset;
pub mod config;
pub mod editor;
pub mod error;
pub mod order;
pub mod record;
pub mod rules;
pub mod server;
pub mod submission;
pub mod upload;
pub mod validate;

// Re-exports for convenience
pub use error::{PaversError, Rejection};
pub use rules::{GridRule, RuleTable, SessionFlags};
