//! Canonical encoding of a validated [`StrategyConfig`].
//!
//! Three deterministic steps: canonical JSON serialization, base-64 over the
//! UTF-8 bytes, and assembly of the executor invocation line. Defined only
//! for validated configs — the caller runs validation first and never hands
//! this module a failed pass.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use schema::StrategyConfig;

/// Command the invocation line hands the payload to.
/// The connector script reads it back via its `--config-b64` argument.
pub const DEFAULT_EXECUTOR: &str = "python3 mt5_connector.py";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The three outputs of one encoding pass over a validated config.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPayload {
    /// Canonical JSON text. Field set and order mirror the declaration
    /// table; equal configs serialize to identical bytes.
    pub canonical: String,
    /// Base-64 of the canonical text's UTF-8 bytes. Standard alphabet,
    /// no line wrapping.
    pub payload: String,
    /// Single-line executor command with the payload as one quoted argument.
    pub invocation: String,
}

/// Encode with the default executor command.
pub fn encode(config: &StrategyConfig) -> Result<EncodedPayload, CodecError> {
    encode_for(config, DEFAULT_EXECUTOR)
}

/// Encode for a specific executor command.
///
/// Base-64 output is alphanumeric plus `+/=`, so single quotes around the
/// payload keep it a single shell token with nothing to escape inside.
pub fn encode_for(config: &StrategyConfig, executor: &str) -> Result<EncodedPayload, CodecError> {
    let canonical = serde_json::to_string(config)?;
    let payload = general_purpose::STANDARD.encode(canonical.as_bytes());
    let invocation = format!("{executor} --config-b64 '{payload}'");
    Ok(EncodedPayload { canonical, payload, invocation })
}

/// Reverse of [`encode`]: base-64 payload back to the typed config.
/// Mirrors the decode the executor performs on its end of the contract.
pub fn decode(payload: &str) -> Result<StrategyConfig, CodecError> {
    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    let canonical = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&canonical)?)
}
