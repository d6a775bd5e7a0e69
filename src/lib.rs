// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.1
// Date Modified: 2026-10-19
// Author: Lukas Bower

//! Reader for per-device tensor debug dumps.
//!
//! An instrumented run writes one file per captured tensor into a directory
//! per device, encoding device, node, output slot, debug op and timestamp in
//! the names. [`DumpDir`] decodes that layout into an immutable index;
//! [`has_inf_or_nan`] flags dumps holding non-finite values.

/// Error types
pub mod error;

/// Device, node and artifact naming convention
pub mod naming;

/// Single dumped tensor
pub mod datum;

/// Decoded payloads and the decoder seam
pub mod payload;

/// NaN / Inf detection
pub mod anomaly;

/// Partition graph descriptors
pub mod graph;

/// Scan options
pub mod config;

/// Dump directory index
pub mod dump_dir;

pub use anomaly::{has_inf_or_nan, TensorFilter};
pub use config::DumpDirConfig;
pub use datum::DebugTensorDatum;
pub use dump_dir::{DumpDir, DumpDirBuilder};
pub use error::{DumpError, FormatError, Result};
pub use graph::{GraphDescriptor, NodeDef};
pub use num_complex::Complex;
pub use payload::{DType, PayloadDecoder, Record, TensorArray, TensorPayload};
