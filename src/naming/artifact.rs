// CLASSIFICATION: COMMUNITY
// Filename: artifact.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Dump artifact file names.
//!
//! A dump is stored as `<node>_<slot>_<debug_op>_<timestamp>` below its device
//! directory. Name scopes of the node become subdirectories, so the name that
//! is parsed here is the `/`-separated path relative to the device directory.
//! Node names may contain `_`; only the last three fields are split off.

use std::fmt;

use crate::error::FormatError;

const ARTIFACT_PATTERN: &str = "<node_name>_<output_slot>_<debug_op>_<timestamp>";

/// Decoded form of a dump artifact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    pub node_name: String,
    pub output_slot: u32,
    pub debug_op: String,
    pub timestamp: u64,
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.node_name, self.output_slot, self.debug_op, self.timestamp
        )
    }
}

/// Parse an artifact path relative to its device directory.
pub fn parse_artifact_name(rel_path: &str) -> Result<ArtifactName, FormatError> {
    let malformed = || FormatError::ArtifactName {
        path: rel_path.to_string(),
        expected: ARTIFACT_PATTERN,
    };

    let mut fields = rel_path.rsplitn(4, '_');
    let (Some(timestamp), Some(debug_op), Some(slot), Some(node_name)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };

    if node_name.is_empty() || node_name.ends_with('/') {
        return Err(malformed());
    }
    if debug_op.is_empty() || debug_op.contains('/') {
        return Err(malformed());
    }
    let output_slot = parse_decimal(slot).ok_or_else(malformed)?;
    let timestamp = parse_decimal(timestamp).ok_or_else(malformed)?;

    Ok(ArtifactName {
        node_name: node_name.to_string(),
        output_slot,
        debug_op: debug_op.to_string(),
        timestamp,
    })
}

fn parse_decimal<T: std::str::FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
