//! # Authoritative Submission
//!
//! The server-side path that decides whether a personalization is accepted.
//! Whatever the editor reported, every check runs again here:
//!
//! ```text
//! consent token ─► rule lookup ─► upload outcome ─► effective columns
//!                      │                                   │
//!                      └─ no rule: not personalizable      ▼
//!                                            validate lines ─► record
//! ```
//!
//! A refused submission produces no record, so nothing reaches the cart.
//! When only the graphic upload failed, the refusal still carries the
//! accepted lines so the buyer fixes the upload without retyping.

use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::Rejection;
use crate::record::{Alignment, GraphicRef, PersonalizationRecord, build_record};
use crate::rules::{RuleTable, SessionFlags};
use crate::validate::{LineValue, validate_lines};

/// Anti-forgery token check, supplied by the host application.
pub trait ConsentVerifier: Send + Sync {
    fn verify(&self, token: &str) -> bool;
}

/// Accepts exactly one configured token.
#[derive(Debug, Clone)]
pub struct StaticConsent {
    token: String,
}

impl StaticConsent {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl ConsentVerifier for StaticConsent {
    fn verify(&self, token: &str) -> bool {
        !self.token.is_empty() && token == self.token
    }
}

/// What became of the buyer's graphic, if they tried to attach one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadOutcome {
    #[default]
    NotSupplied,
    Stored(GraphicRef),
    Failed(Rejection),
}

/// Raw form input for one personalization attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    pub product: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub cross: bool,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub consent_token: Option<String>,
    #[serde(skip)]
    pub upload: UploadOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The product has no rule; skip personalization entirely.
    NotPersonalizable,
    Accepted(PersonalizationRecord),
}

/// A refused submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refusal {
    pub rejection: Rejection,
    /// Lines that already passed validation, kept for the retry.
    pub retained_lines: Vec<LineValue>,
}

impl From<Rejection> for Refusal {
    fn from(rejection: Rejection) -> Self {
        Self {
            rejection,
            retained_lines: Vec::new(),
        }
    }
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rejection.fmt(f)
    }
}

impl std::error::Error for Refusal {}

impl Submission {
    /// Flags this submission asks for, before rule sanitizing.
    pub fn requested_flags(&self) -> SessionFlags {
        SessionFlags {
            cross_selected: self.cross,
            graphic_attached: !matches!(self.upload, UploadOutcome::NotSupplied),
        }
    }

    /// Run every acceptance check and build the record.
    pub fn process(
        self,
        table: &RuleTable,
        consent: &dyn ConsentVerifier,
    ) -> Result<Outcome, Refusal> {
        let token_ok = self
            .consent_token
            .as_deref()
            .is_some_and(|token| consent.verify(token));
        if !token_ok {
            warn!(product = %self.product, "submission without a valid consent token");
            return Err(Rejection::MissingConsentToken.into());
        }

        let Some(rule) = table.resolve(&self.product) else {
            debug!(product = %self.product, "product is not personalizable");
            return Ok(Outcome::NotPersonalizable);
        };

        let flags = rule.sanitize_flags(self.requested_flags());
        if self.cross && !flags.cross_selected {
            debug!(product = %self.product, "cross not offered, ignoring request");
        }
        let columns = rule.effective_columns(flags);

        let lines = validate_lines(rule.lines, columns, &self.lines).map_err(|rejection| {
            info!(product = %self.product, line = ?rejection.line(), "lines refused: {rejection}");
            Refusal::from(rejection)
        })?;

        let graphic = match self.upload {
            UploadOutcome::NotSupplied => None,
            UploadOutcome::Stored(graphic) => Some(graphic),
            UploadOutcome::Failed(rejection) => {
                info!(product = %self.product, "graphic refused: {rejection}");
                return Err(Refusal {
                    rejection,
                    retained_lines: lines,
                });
            }
        };

        let record = build_record(
            &self.product,
            &lines,
            flags,
            columns,
            graphic,
            self.alignment,
        )?;
        info!(
            product = %self.product,
            columns,
            cross = flags.cross_selected,
            graphic = record.graphic().is_some(),
            "personalization accepted"
        );
        Ok(Outcome::Accepted(record))
    }
}
