// CLASSIFICATION: COMMUNITY
// Filename: config.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

use log::warn;

pub const PARALLEL_SCAN_ENV: &str = "TENSORDUMP_PARALLEL_SCAN";
pub const LOAD_GRAPHS_ENV: &str = "TENSORDUMP_LOAD_GRAPHS";

/// Options controlling how a dump root is scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpDirConfig {
    /// Scan device directories concurrently.
    pub parallel_scan: bool,
    /// Read `_tfdbg_graph_*` files when no graphs are supplied by the caller.
    pub load_graphs: bool,
}

impl Default for DumpDirConfig {
    fn default() -> Self {
        Self {
            parallel_scan: env_flag(PARALLEL_SCAN_ENV, false),
            load_graphs: env_flag(LOAD_GRAPHS_ENV, true),
        }
    }
}

fn env_flag(var: &str, default: bool) -> bool {
    match std::env::var(var) {
        Ok(value) => parse_flag(&value).unwrap_or_else(|| {
            warn!("ignoring {var}={value:?}: expected a boolean");
            default
        }),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
