// [libs/domain/models/src/model.rs]
//! =================================================================
//! APARATO: DTO DE ARTEFACTO DE MODELO FEDERADO (V1.0)
//! RESPONSABILIDAD: ARTEFACTO DE MODELO Y SU BITÁCORA DE VERSIONES
//! =================================================================

use serde::{Deserialize, Serialize};

/// Magic prefix every valid model artifact must start with.
pub const MODEL_MAGIC: &[u8; 4] = b"MODL";

/// An opaque byte sequence identified by an integer version and a
/// content digest. Owned exclusively by the OTA engine; the integrity
/// store only ever holds immutable snapshots of past versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u64,
    pub size: u64,
    pub digest: String,
    pub bytes: Vec<u8>,
}

impl ModelArtifact {
    pub fn new(version: u64, bytes: Vec<u8>, digest: String) -> Self {
        let size = bytes.len() as u64;
        Self {
            version,
            size,
            digest,
            bytes,
        }
    }

    /// Content-only validity: non-empty, at least 8 bytes, and prefixed
    /// by the model magic. Does not check a declared digest; that is a
    /// separate step against an externally supplied checksum.
    pub fn is_valid_content(bytes: &[u8]) -> bool {
        bytes.len() >= 8 && bytes.starts_with(MODEL_MAGIC)
    }
}

/// Append-only version history entry, truncated by the integrity store
/// to the most recent `max_rollback_versions` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistoryEntry {
    pub version: u64,
    pub timestamp: u64,
    pub node_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_size_from_bytes() {
        let artifact = ModelArtifact::new(2, vec![1, 2, 3, 4], "abc".to_string());
        assert_eq!(artifact.size, 4);
    }

    #[test]
    fn valid_content_requires_magic_prefix_and_min_length() {
        let mut bytes = MODEL_MAGIC.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert!(ModelArtifact::is_valid_content(&bytes));
        assert!(!ModelArtifact::is_valid_content(b"MODL"));
        assert!(!ModelArtifact::is_valid_content(b"XXXXXXXX"));
    }
}
