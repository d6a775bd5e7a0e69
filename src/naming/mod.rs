// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Naming convention used by instrumented runs when writing dumps.
//!
//! All identifying information of a dumped tensor lives in the directory and
//! file names: device directories encode the device identifier, and artifact
//! files encode node, output slot, debug op and timestamp. Debug and copy
//! nodes inserted by the instrumentation rewrite use reserved name prefixes.

pub mod artifact;
pub mod device;
pub mod node;

pub use artifact::{parse_artifact_name, ArtifactName};
pub use device::{decode_device, encode_device, DeviceName};
pub use node::{
    get_node_name, get_output_slot, is_copy_node, is_debug_node, parse_debug_node_name,
    parse_node_or_tensor_name, DebugNodeName, NodeKind,
};

/// Prefix of every metadata entry written next to dumps.
pub const METADATA_FILE_PREFIX: &str = "_tfdbg_";
/// Tag following [`METADATA_FILE_PREFIX`] on device directories.
pub const DEVICE_TAG: &str = "device_";
/// Tag following [`METADATA_FILE_PREFIX`] on partition graph files.
pub const GRAPH_FILE_TAG: &str = "graph_";
/// Prefix of copy nodes inserted by the instrumentation rewrite.
pub const COPY_NODE_PREFIX: &str = "__copy_";
/// Prefix of debug nodes inserted by the instrumentation rewrite.
pub const DEBUG_NODE_PREFIX: &str = "__dbg_";

/// Whether a file name inside a device directory is a partition graph file.
pub fn is_graph_file(file_name: &str) -> bool {
    file_name
        .strip_prefix(METADATA_FILE_PREFIX)
        .map_or(false, |rest| rest.starts_with(GRAPH_FILE_TAG))
}
