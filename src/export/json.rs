//! JSON backup encoding
//!
//! The full-fidelity format: `decode_json(encode_json(p)) == p` for every payload.

use crate::error::{MedstockError, MedstockResult};

use super::BackupPayload;

/// Encode a payload as pretty-printed UTF-8 JSON
pub fn encode_json(payload: &BackupPayload) -> MedstockResult<Vec<u8>> {
    serde_json::to_vec_pretty(payload)
        .map_err(|e| MedstockError::Export(format!("Failed to serialize backup: {}", e)))
}

/// Parse a JSON backup document
pub fn decode_json(bytes: &[u8]) -> MedstockResult<BackupPayload> {
    serde_json::from_slice(bytes)
        .map_err(|e| MedstockError::Json(format!("Failed to parse backup file: {}", e)))
}
