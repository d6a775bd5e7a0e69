// CLASSIFICATION: COMMUNITY
// Filename: scan.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Filesystem scan of a dump root, one device directory at a time.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::datum::DebugTensorDatum;
use crate::error::{DumpError, Result};
use crate::graph::GraphDescriptor;
use crate::naming::{decode_device, is_graph_file};

/// A device directory found directly under the dump root.
#[derive(Debug, Clone)]
pub(crate) struct DeviceDir {
    pub device_name: String,
    pub path: PathBuf,
}

/// Everything read from one device directory.
#[derive(Debug)]
pub(crate) struct DeviceScan {
    pub device_name: String,
    pub data: Vec<DebugTensorDatum>,
    pub graphs: Vec<GraphDescriptor>,
}

/// List device directories under `root`, sorted by device name. Entries that
/// are not directories or do not decode as device names are skipped.
pub(crate) fn discover_devices(root: &Path) -> Result<Vec<DeviceDir>> {
    let entries = fs::read_dir(root).map_err(|e| DumpError::io(root, e))?;
    let mut devices = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DumpError::io(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            debug!("skipping non-directory entry {}", path.display());
            continue;
        }
        let name = entry.file_name();
        match decode_device(&name.to_string_lossy()) {
            Ok(device_name) => devices.push(DeviceDir { device_name, path }),
            Err(err) => debug!("skipping {}: {}", path.display(), err),
        }
    }
    devices.sort_by(|a, b| a.device_name.cmp(&b.device_name));
    Ok(devices)
}

/// Parse every artifact below one device directory, in file-name order.
pub(crate) fn scan_device(root: &Path, device: &DeviceDir, load_graphs: bool) -> Result<DeviceScan> {
    let mut data = Vec::new();
    let mut graphs = Vec::new();
    for entry in WalkDir::new(&device.path).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&device.path).to_path_buf();
            DumpError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_graph_file(&entry.file_name().to_string_lossy()) {
            if load_graphs {
                graphs.push(GraphDescriptor::from_json_file(entry.path(), &device.device_name)?);
            }
            continue;
        }
        let rel_path = entry.path().strip_prefix(root).unwrap_or(entry.path());
        data.push(DebugTensorDatum::new(root, rel_path)?);
    }
    debug!(
        "device {}: {} dumps, {} graph files",
        device.device_name,
        data.len(),
        graphs.len()
    );
    Ok(DeviceScan {
        device_name: device.device_name.clone(),
        data,
        graphs,
    })
}
