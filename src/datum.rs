// CLASSIFICATION: COMMUNITY
// Filename: datum.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! A single dumped tensor.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::error::{FormatError, Result};
use crate::naming::{decode_device, parse_artifact_name};
use crate::payload::{PayloadDecoder, TensorPayload};

/// One dumped (node, slot, debug op, timestamp) capture on one device.
///
/// Size and contents are read from disk on every call; the artifact may have
/// been removed since the index was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugTensorDatum {
    device_name: String,
    node_name: String,
    output_slot: u32,
    debug_op: String,
    timestamp: u64,
    file_path: PathBuf,
}

impl DebugTensorDatum {
    /// Build a datum from the dump root and the artifact path relative to it.
    ///
    /// The first component of `rel_path` is the device directory; the rest is
    /// the artifact name, with name scopes as subdirectories.
    pub fn new(dump_root: &Path, rel_path: &Path) -> Result<Self> {
        let mut components = rel_path.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        });
        let device_dir = components.next().unwrap_or_default();
        let device_name = decode_device(&device_dir)?;

        let artifact: Vec<_> = components.collect();
        if artifact.is_empty() {
            return Err(FormatError::ArtifactName {
                path: rel_path.display().to_string(),
                expected: "<device_dir>/<node_name>_<output_slot>_<debug_op>_<timestamp>",
            }
            .into());
        }
        let name = parse_artifact_name(&artifact.join("/"))?;

        Ok(Self {
            device_name,
            node_name: name.node_name,
            output_slot: name.output_slot,
            debug_op: name.debug_op,
            timestamp: name.timestamp,
            file_path: dump_root.join(rel_path),
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn output_slot(&self) -> u32 {
        self.output_slot
    }

    pub fn debug_op(&self) -> &str {
        &self.debug_op
    }

    /// Dump timestamp. Only ordered relative to other dumps of the same device.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// `node:slot`
    pub fn tensor_name(&self) -> String {
        format!("{}:{}", self.node_name, self.output_slot)
    }

    /// `node:slot:debug_op`
    pub fn watch_key(&self) -> String {
        format!("{}:{}:{}", self.node_name, self.output_slot, self.debug_op)
    }

    /// Size of the artifact on disk, or `None` if it no longer exists.
    pub fn dump_size_bytes(&self) -> Option<u64> {
        fs::metadata(&self.file_path).ok().map(|meta| meta.len())
    }

    /// Read and decode the artifact, or `None` if it cannot be read.
    pub fn load_payload(&self, decoder: &dyn PayloadDecoder) -> Option<TensorPayload> {
        match fs::read(&self.file_path) {
            Ok(bytes) => Some(decoder.decode(&bytes)),
            Err(err) => {
                debug!("cannot read dump {}: {}", self.file_path.display(), err);
                None
            }
        }
    }
}

impl fmt::Display for DebugTensorDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{DebugTensorDatum ({}) {}:{} @ {} @ {}}}",
            self.device_name, self.node_name, self.output_slot, self.debug_op, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DumpError;
    use crate::payload::TensorArray;

    const CPU_DIR: &str = "_tfdbg_device_,job_localhost,replica_0,task_0,cpu_0";

    #[test]
    fn decodes_nested_artifact() {
        let root = Path::new("/tmp/tfdbg_1");
        let rel = format!("{CPU_DIR}/ns1/ns2/node_a_1_2_DebugIdentity_1472563253536385");
        let datum = DebugTensorDatum::new(root, Path::new(&rel)).unwrap();

        assert_eq!(datum.device_name(), "/job:localhost/replica:0/task:0/cpu:0");
        assert_eq!(datum.debug_op(), "DebugIdentity");
        assert_eq!(datum.node_name(), "ns1/ns2/node_a_1");
        assert_eq!(datum.output_slot(), 2);
        assert_eq!(datum.tensor_name(), "ns1/ns2/node_a_1:2");
        assert_eq!(datum.timestamp(), 1472563253536385);
        assert_eq!(datum.watch_key(), "ns1/ns2/node_a_1:2:DebugIdentity");
        assert_eq!(datum.file_path(), root.join(&rel));
        assert_eq!(
            datum.to_string(),
            "{DebugTensorDatum (/job:localhost/replica:0/task:0/cpu:0) \
             ns1/ns2/node_a_1:2 @ DebugIdentity @ 1472563253536385}"
        );
    }

    #[test]
    fn missing_artifact_has_no_size_or_payload() {
        let rel = format!("{CPU_DIR}/ns1/ns2/node_foo_1_2_DebugIdentity_1472563253536385");
        let datum = DebugTensorDatum::new(Path::new("/nonexistent/tfdbg_1"), Path::new(&rel)).unwrap();
        assert_eq!(datum.dump_size_bytes(), None);
        let decoder = |_: &[u8]| -> TensorPayload { TensorArray::F32(vec![]).into() };
        assert_eq!(datum.load_payload(&decoder), None);
    }

    #[test]
    fn rejects_paths_outside_device_dirs() {
        let err = DebugTensorDatum::new(Path::new("/tmp"), Path::new("ns1/node_0_DebugIdentity_1"))
            .unwrap_err();
        assert!(matches!(err, DumpError::Format(FormatError::DevicePath { .. })));

        let err = DebugTensorDatum::new(Path::new("/tmp"), Path::new(CPU_DIR)).unwrap_err();
        assert!(matches!(err, DumpError::Format(FormatError::ArtifactName { .. })));
    }
}
