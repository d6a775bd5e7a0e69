// CLASSIFICATION: COMMUNITY
// Filename: builder.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Staged construction of a [`DumpDir`].
//!
//! All device directories are scanned and all graph descriptors checked
//! before anything is committed; any failure leaves no index behind.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use super::scan::{discover_devices, scan_device, DeviceDir, DeviceScan};
use super::DumpDir;
use crate::config::DumpDirConfig;
use crate::error::{DumpError, Result};
use crate::graph::{partition_by_device, GraphDescriptor};

/// Builder for [`DumpDir`].
#[derive(Debug, Clone)]
pub struct DumpDirBuilder {
    root: PathBuf,
    graphs: Option<Vec<GraphDescriptor>>,
    config: DumpDirConfig,
}

impl DumpDirBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            graphs: None,
            config: DumpDirConfig::default(),
        }
    }

    /// Use these partition graphs instead of any graph files on disk.
    pub fn graphs(mut self, graphs: Vec<GraphDescriptor>) -> Self {
        self.graphs = Some(graphs);
        self
    }

    pub fn config(mut self, config: DumpDirConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<DumpDir> {
        if !self.root.is_dir() {
            return Err(DumpError::NotFound(self.root));
        }
        info!("loading dumps from {}", self.root.display());

        let devices = discover_devices(&self.root)?;
        let load_graphs = self.graphs.is_none() && self.config.load_graphs;
        let scan = |device: &DeviceDir| scan_device(&self.root, device, load_graphs);
        let results: Vec<Result<DeviceScan>> = if self.config.parallel_scan {
            devices.par_iter().map(scan).collect()
        } else {
            devices.iter().map(scan).collect()
        };
        let scans = results.into_iter().collect::<Result<Vec<_>>>()?;

        let staged = Staging {
            root: self.root,
            graphs: self.graphs,
            scans,
        };
        staged.commit()
    }
}

/// Scan results waiting for the cross-device checks.
struct Staging {
    root: PathBuf,
    graphs: Option<Vec<GraphDescriptor>>,
    scans: Vec<DeviceScan>,
}

impl Staging {
    fn commit(self) -> Result<DumpDir> {
        let mut device_names = Vec::with_capacity(self.scans.len());
        let mut device_data = Vec::with_capacity(self.scans.len());
        let mut disk_graphs = Vec::new();
        for scan in self.scans {
            device_names.push(scan.device_name);
            device_data.push(scan.data);
            disk_graphs.extend(scan.graphs);
        }

        let graphs = self.graphs.unwrap_or(disk_graphs);
        let mut device_graphs = partition_by_device(&graphs)?;
        device_graphs.retain(|device, graph| {
            if device.is_empty() {
                warn!("{} graph nodes have no device; ignoring them", graph.len());
                return false;
            }
            let known = device_names.binary_search(device).is_ok();
            if !known {
                warn!("partition graph for {device} has no dump directory; ignoring it");
            }
            known
        });

        let dump_dir = DumpDir::assemble(self.root, device_names, device_data, device_graphs);
        info!(
            "loaded {} dumps from {} devices ({} with graphs)",
            dump_dir.size(),
            dump_dir.devices().len(),
            dump_dir.device_graphs.len()
        );
        Ok(dump_dir)
    }
}
