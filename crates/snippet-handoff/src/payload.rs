//! The one-shot wire payload.
//!
//! Exactly one payload crosses the data channel per successful session. It is
//! a tagged, versioned structure validated on receipt - never cast-and-trust.

use crate::error::{HandoffError, Result};
use serde::{Deserialize, Serialize};

/// Tag identifying a document transfer frame.
pub const PAYLOAD_KIND: &str = "document-transfer";

/// Current payload schema version.
pub const PAYLOAD_VERSION: u32 = 1;

/// The document snapshot transmitted during a handoff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub kind: String,
    pub version: u32,
    pub document_id: String,
    pub content: String,
    /// RFC 3339 timestamp taken when the sender built the payload.
    pub timestamp: String,
}

impl TransferPayload {
    /// Build a payload for the given document snapshot, stamped now.
    pub fn new(document_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: PAYLOAD_KIND.to_string(),
            version: PAYLOAD_VERSION,
            document_id: document_id.into(),
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Serialize for the wire.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| HandoffError::PayloadValidation(e.to_string()))
    }

    /// Parse and validate a wire frame. Malformed frames, unknown kinds,
    /// unsupported versions and empty content are all rejected.
    pub fn decode(frame: &str) -> Result<Self> {
        let payload: TransferPayload = serde_json::from_str(frame)
            .map_err(|e| HandoffError::PayloadValidation(format!("malformed frame: {e}")))?;
        payload.validate()?;
        Ok(payload)
    }

    /// Structural validation, applied on receipt.
    pub fn validate(&self) -> Result<()> {
        if self.kind != PAYLOAD_KIND {
            return Err(HandoffError::PayloadValidation(format!(
                "unexpected kind: {}",
                self.kind
            )));
        }
        if self.version != PAYLOAD_VERSION {
            return Err(HandoffError::PayloadValidation(format!(
                "unsupported version: {}",
                self.version
            )));
        }
        if self.content.trim().is_empty() {
            return Err(HandoffError::PayloadValidation(
                "empty document content".to_string(),
            ));
        }
        Ok(())
    }
}
