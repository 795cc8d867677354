// Result Recovery Engine.
// Turns raw completion text into a schema-valid answer. Never fails: when
// nothing usable can be salvaged the operation's fallback is returned whole.

pub mod schema;
pub mod scrape;
pub mod stages;

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::LlmError;
use schema::ResultSchema;
use scrape::Scraper;
use stages::{Stage, StageInput};

/// Everything the engine needs to know about one operation's answer.
#[derive(Debug)]
pub struct Contract {
    pub schema: &'static ResultSchema,
    /// A valid instance of `schema`, possibly customized for the request.
    pub fallback: Value,
    pub scraper: Option<Scraper>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    GatewayUnavailable,
    Unrecoverable,
    InputTooShort,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FallbackReason::GatewayUnavailable => "completion gateway unavailable",
            FallbackReason::Unrecoverable => "no recoverable structure",
            FallbackReason::InputTooShort => "request input too short",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    Parsed { stage: Stage },
    Repaired { stage: Stage, filled: Vec<String> },
    Fallback { reason: FallbackReason },
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Parsed { .. } => "parsed",
            Provenance::Repaired { .. } => "repaired",
            Provenance::Fallback { .. } => "fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Parsed { stage } => write!(f, "parsed at {stage}"),
            Provenance::Repaired { stage, filled } => {
                write!(f, "repaired from {stage} (filled: {})", filled.join(", "))
            }
            Provenance::Fallback { reason } => write!(f, "fallback ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredResult {
    pub value: Value,
    pub provenance: Provenance,
}

impl Contract {
    pub fn fallback_result(&self, reason: FallbackReason) -> RecoveredResult {
        RecoveredResult {
            value: self.fallback.clone(),
            provenance: Provenance::Fallback { reason },
        }
    }
}

/// Runs the stages in order until one yields an object shaped like the
/// schema. That candidate wins: it is validated, else repaired from the
/// fallback, else the fallback is returned. Later stages never replace it.
pub fn recover(raw: &str, contract: &Contract) -> RecoveredResult {
    let schema = contract.schema;
    let input = StageInput::new(raw, contract.scraper);

    let winner = Stage::ORDER.into_iter().find_map(|stage| {
        let candidate = stage.attempt(&input)?;
        if schema.recognizes(&candidate) {
            Some((stage, candidate))
        } else {
            debug!("{} candidate from {stage} has no schema keys", schema.name);
            None
        }
    });

    let Some((stage, candidate)) = winner else {
        warn!("{}: no usable structure in completion, using fallback", schema.name);
        return contract.fallback_result(FallbackReason::Unrecoverable);
    };

    let violation = match schema.validate(candidate.clone()) {
        Ok(conformed) => {
            if !conformed.adjustments.is_empty() {
                debug!(
                    "{} adjustments at {stage}: {}",
                    schema.name,
                    conformed.adjustments.join("; ")
                );
            }
            return RecoveredResult {
                value: conformed.value,
                provenance: Provenance::Parsed { stage },
            };
        }
        Err(violation) => violation,
    };
    debug!("{} candidate from {stage} rejected: {violation}", schema.name);

    match schema.repair(candidate, &contract.fallback) {
        Ok(repaired) => {
            debug!(
                "{} repaired from {stage}; filled: {:?}; adjusted: {:?}",
                schema.name, repaired.filled, repaired.adjustments
            );
            RecoveredResult {
                value: repaired.value,
                provenance: Provenance::Repaired {
                    stage,
                    filled: repaired.filled,
                },
            }
        }
        Err(violation) => {
            warn!("{} repair failed: {violation}, using fallback", schema.name);
            contract.fallback_result(FallbackReason::Unrecoverable)
        }
    }
}

/// Recovers a gateway outcome. A failed call goes straight to the fallback.
pub fn recover_completion(
    completion: Result<String, LlmError>,
    contract: &Contract,
) -> RecoveredResult {
    match completion {
        Ok(raw) => {
            debug!("{} raw completion: {raw}", contract.schema.name);
            recover(&raw, contract)
        }
        Err(e) => {
            warn!("{} completion failed: {e}", contract.schema.name);
            contract.fallback_result(FallbackReason::GatewayUnavailable)
        }
    }
}
