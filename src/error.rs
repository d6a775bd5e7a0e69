// CLASSIFICATION: COMMUNITY
// Filename: error.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Error types shared by the naming codec and the dump directory index.

use std::path::PathBuf;

use thiserror::Error;

/// A name that does not follow the dump naming convention.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid device directory name \"{name}\": expected {expected}")]
    DevicePath { name: String, expected: &'static str },
    #[error("Dump file path \"{path}\" does not conform to the naming pattern: {expected}")]
    ArtifactName { path: String, expected: &'static str },
    #[error("Invalid prefix in debug node name: '{0}'")]
    InvalidPrefix(String),
    #[error("Invalid debug node name: '{0}'")]
    InvalidFormat(String),
    #[error("Invalid tensor name in debug node name: '{0}'")]
    InvalidWatchedTensor(String),
}

/// Errors produced while building or querying a [`crate::DumpDir`].
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Dump root directory {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Duplicate node name on device {device}: '{node}'")]
    DuplicateNode { device: String, node: String },
    #[error("Invalid device name: {0}")]
    UnknownDevice(String),
    #[error("Watch key \"{0}\" does not exist in the debug dump")]
    UnknownWatchKey(String),
    #[error("Node '{0}' does not exist in the partition graphs")]
    UnknownNode(String),
    #[error("Node '{node}' exists on multiple devices {devices:?}; a device name is required")]
    AmbiguousNode { node: String, devices: Vec<String> },
    #[error("No partition graphs have been loaded")]
    NoGraphs,
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse graph file {}: {source}", .path.display())]
    GraphFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DumpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DumpError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;
