// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! In-memory index over a dump root.
//!
//! Layout on disk:
//!
//! ```text
//! <root>/
//!   _tfdbg_device_,job_localhost,replica_0,task_0,cpu_0/
//!     _tfdbg_graph_<id>                      partition graph (optional)
//!     ns1/ns2/node_a_0_DebugIdentity_<ts>    one file per dump
//!   _tfdbg_device_,job_localhost,replica_0,task_0,gpu_0/
//!     ...
//! ```
//!
//! A [`DumpDir`] is immutable once built. Dumps are kept per device in scan
//! order, and a combined timeline orders all of them by timestamp.

mod builder;
mod scan;

pub use builder::DumpDirBuilder;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::anomaly::TensorFilter;
use crate::datum::DebugTensorDatum;
use crate::error::{DumpError, Result};
use crate::graph::{DeviceGraph, GraphDescriptor};
use crate::payload::{PayloadDecoder, TensorPayload};

/// (device index, position within that device's dumps)
type DatumRef = (usize, usize);

/// Queryable index of every dump under a root directory.
#[derive(Debug)]
pub struct DumpDir {
    root: PathBuf,
    /// Sorted.
    device_names: Vec<String>,
    /// Parallel to `device_names`.
    device_data: Vec<Vec<DebugTensorDatum>>,
    timeline: Vec<DatumRef>,
    watch_keys: HashMap<String, Vec<DatumRef>>,
    device_graphs: BTreeMap<String, DeviceGraph>,
    t0: Option<u64>,
}

impl DumpDir {
    /// Index `root`, reading partition graphs from disk if present.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        DumpDirBuilder::new(root).build()
    }

    /// Index `root`, validated against the given partition graphs.
    pub fn with_graphs(root: impl AsRef<Path>, graphs: Vec<GraphDescriptor>) -> Result<Self> {
        DumpDirBuilder::new(root).graphs(graphs).build()
    }

    fn assemble(
        root: PathBuf,
        device_names: Vec<String>,
        device_data: Vec<Vec<DebugTensorDatum>>,
        device_graphs: BTreeMap<String, DeviceGraph>,
    ) -> Self {
        let mut timeline: Vec<DatumRef> = device_data
            .iter()
            .enumerate()
            .flat_map(|(dev, data)| (0..data.len()).map(move |pos| (dev, pos)))
            .collect();
        timeline.sort_by_key(|&(dev, pos)| device_data[dev][pos].timestamp());

        let mut watch_keys: HashMap<String, Vec<DatumRef>> = HashMap::new();
        for &(dev, pos) in &timeline {
            watch_keys
                .entry(device_data[dev][pos].watch_key())
                .or_default()
                .push((dev, pos));
        }

        let t0 = device_data
            .iter()
            .flatten()
            .map(DebugTensorDatum::timestamp)
            .min();

        Self {
            root,
            device_names,
            device_data,
            timeline,
            watch_keys,
            device_graphs,
            t0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Device names with a dump directory, sorted.
    pub fn devices(&self) -> Vec<&str> {
        self.device_names.iter().map(String::as_str).collect()
    }

    /// Number of dumps across all devices.
    pub fn size(&self) -> usize {
        self.timeline.len()
    }

    /// Earliest dump timestamp across all devices.
    pub fn t0(&self) -> Option<u64> {
        self.t0
    }

    /// All dumps ordered by timestamp.
    pub fn dumped_tensor_data(&self) -> Vec<&DebugTensorDatum> {
        self.timeline.iter().map(|&r| self.datum(r)).collect()
    }

    /// Dumps of one device in scan order.
    pub fn dumped_tensor_data_for_device(&self, device_name: &str) -> Result<&[DebugTensorDatum]> {
        let dev = self.device_index(device_name)?;
        Ok(&self.device_data[dev])
    }

    /// Node names of one device, or of all devices when `device_name` is
    /// `None`. A device's partition graph is used when available, otherwise
    /// the names of the dumped nodes.
    pub fn nodes(&self, device_name: Option<&str>) -> Result<Vec<&str>> {
        match device_name {
            Some(name) => {
                let dev = self.device_index(name)?;
                Ok(self.device_nodes(dev))
            }
            None => Ok((0..self.device_names.len())
                .flat_map(|dev| self.device_nodes(dev))
                .collect()),
        }
    }

    fn device_nodes(&self, dev: usize) -> Vec<&str> {
        if let Some(graph) = self.device_graphs.get(&self.device_names[dev]) {
            return graph.node_names().collect();
        }
        let mut seen = HashSet::new();
        self.device_data[dev]
            .iter()
            .map(DebugTensorDatum::node_name)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Dumps of one watch key (`node:slot:debug_op`), ordered by timestamp.
    pub fn watch_key_to_data(
        &self,
        watch_key: &str,
        device_name: Option<&str>,
    ) -> Result<Vec<&DebugTensorDatum>> {
        let dev = device_name.map(|d| self.device_index(d)).transpose()?;
        let refs = self
            .watch_keys
            .get(watch_key)
            .ok_or_else(|| DumpError::UnknownWatchKey(watch_key.to_string()))?;
        Ok(refs
            .iter()
            .filter(|(d, _)| dev.map_or(true, |dev| dev == *d))
            .map(|&r| self.datum(r))
            .collect())
    }

    /// Sorted watch keys dumped for `node_name`.
    pub fn debug_watch_keys(&self, node_name: &str, device_name: Option<&str>) -> Result<Vec<String>> {
        let devices = match device_name {
            Some(name) => vec![self.device_index(name)?],
            None => (0..self.device_names.len()).collect(),
        };
        let keys: BTreeSet<String> = devices
            .into_iter()
            .flat_map(|dev| self.device_data[dev].iter())
            .filter(|datum| datum.node_name() == node_name)
            .map(DebugTensorDatum::watch_key)
            .collect();
        Ok(keys.into_iter().collect())
    }

    fn watched(
        &self,
        node_name: &str,
        output_slot: u32,
        debug_op: &str,
        device_name: Option<&str>,
    ) -> Result<Vec<&DebugTensorDatum>> {
        self.watch_key_to_data(&format!("{node_name}:{output_slot}:{debug_op}"), device_name)
    }

    pub fn get_tensor_file_paths(
        &self,
        node_name: &str,
        output_slot: u32,
        debug_op: &str,
        device_name: Option<&str>,
    ) -> Result<Vec<&Path>> {
        let data = self.watched(node_name, output_slot, debug_op, device_name)?;
        Ok(data.into_iter().map(DebugTensorDatum::file_path).collect())
    }

    /// Timestamps relative to [`DumpDir::t0`].
    pub fn get_rel_timestamps(
        &self,
        node_name: &str,
        output_slot: u32,
        debug_op: &str,
        device_name: Option<&str>,
    ) -> Result<Vec<u64>> {
        let t0 = self.t0.unwrap_or(0);
        let data = self.watched(node_name, output_slot, debug_op, device_name)?;
        Ok(data
            .into_iter()
            .map(|d| d.timestamp().saturating_sub(t0))
            .collect())
    }

    pub fn get_dump_sizes_bytes(
        &self,
        node_name: &str,
        output_slot: u32,
        debug_op: &str,
        device_name: Option<&str>,
    ) -> Result<Vec<Option<u64>>> {
        let data = self.watched(node_name, output_slot, debug_op, device_name)?;
        Ok(data.into_iter().map(DebugTensorDatum::dump_size_bytes).collect())
    }

    /// Decode every dump of a watched tensor. Dumps missing from disk yield `None`.
    pub fn get_tensors(
        &self,
        node_name: &str,
        output_slot: u32,
        debug_op: &str,
        device_name: Option<&str>,
        decoder: &dyn PayloadDecoder,
    ) -> Result<Vec<Option<TensorPayload>>> {
        let data = self.watched(node_name, output_slot, debug_op, device_name)?;
        Ok(data
            .par_iter()
            .map(|datum| datum.load_payload(decoder))
            .collect())
    }

    /// Dumps, in timestamp order, whose decoded payload satisfies `predicate`.
    /// Stops after `first_n` matches unless `first_n` is 0.
    pub fn find(
        &self,
        predicate: &TensorFilter,
        first_n: usize,
        decoder: &dyn PayloadDecoder,
    ) -> Vec<&DebugTensorDatum> {
        let hit = |datum: &DebugTensorDatum| {
            datum
                .load_payload(decoder)
                .map_or(false, |payload| predicate(datum, &payload))
        };
        let data = self.dumped_tensor_data();
        if first_n == 0 {
            return data.into_par_iter().filter(|d| hit(*d)).collect();
        }
        data.into_iter().filter(|d| hit(*d)).take(first_n).collect()
    }

    /// Whether partition graphs are available for any device.
    pub fn has_graphs(&self) -> bool {
        !self.device_graphs.is_empty()
    }

    pub fn node_exists(&self, node_name: &str, device_name: Option<&str>) -> Result<bool> {
        self.require_graphs()?;
        match device_name {
            Some(name) => {
                self.device_index(name)?;
                Ok(self
                    .device_graphs
                    .get(name)
                    .map_or(false, |g| g.contains(node_name)))
            }
            None => Ok(self.device_graphs.values().any(|g| g.contains(node_name))),
        }
    }

    /// Devices whose partition graph contains `node_name`.
    pub fn node_devices(&self, node_name: &str) -> Result<Vec<&str>> {
        self.require_graphs()?;
        let devices: Vec<&str> = self
            .device_graphs
            .iter()
            .filter(|(_, g)| g.contains(node_name))
            .map(|(device, _)| device.as_str())
            .collect();
        if devices.is_empty() {
            return Err(DumpError::UnknownNode(node_name.to_string()));
        }
        Ok(devices)
    }

    pub fn node_op_type(&self, node_name: &str, device_name: Option<&str>) -> Result<&str> {
        let graph = self.graph_for(node_name, device_name)?;
        graph
            .node(node_name)
            .map(|node| node.op.as_str())
            .ok_or_else(|| DumpError::UnknownNode(node_name.to_string()))
    }

    /// Data (or, with `is_control`, control) inputs of a node.
    pub fn node_inputs(
        &self,
        node_name: &str,
        is_control: bool,
        device_name: Option<&str>,
    ) -> Result<Vec<String>> {
        self.graph_for(node_name, device_name)?
            .inputs(node_name, is_control)
            .ok_or_else(|| DumpError::UnknownNode(node_name.to_string()))
    }

    /// Nodes on the same device consuming a node's outputs.
    pub fn node_recipients(
        &self,
        node_name: &str,
        is_control: bool,
        device_name: Option<&str>,
    ) -> Result<Vec<String>> {
        self.graph_for(node_name, device_name)?
            .recipients(node_name, is_control)
            .ok_or_else(|| DumpError::UnknownNode(node_name.to_string()))
    }

    pub fn transitive_inputs(
        &self,
        node_name: &str,
        include_control: bool,
        device_name: Option<&str>,
    ) -> Result<Vec<String>> {
        self.graph_for(node_name, device_name)?
            .transitive_inputs(node_name, include_control)
            .ok_or_else(|| DumpError::UnknownNode(node_name.to_string()))
    }

    fn datum(&self, (dev, pos): DatumRef) -> &DebugTensorDatum {
        &self.device_data[dev][pos]
    }

    fn device_index(&self, device_name: &str) -> Result<usize> {
        self.device_names
            .binary_search_by(|d| d.as_str().cmp(device_name))
            .map_err(|_| DumpError::UnknownDevice(device_name.to_string()))
    }

    fn require_graphs(&self) -> Result<()> {
        if self.device_graphs.is_empty() {
            return Err(DumpError::NoGraphs);
        }
        Ok(())
    }

    /// The partition graph holding `node_name`, on the given device or on the
    /// only device that has it.
    fn graph_for(&self, node_name: &str, device_name: Option<&str>) -> Result<&DeviceGraph> {
        self.require_graphs()?;
        let unknown = || DumpError::UnknownNode(node_name.to_string());
        if let Some(name) = device_name {
            self.device_index(name)?;
            return self
                .device_graphs
                .get(name)
                .filter(|g| g.contains(node_name))
                .ok_or_else(unknown);
        }
        let mut holders = self.device_graphs.iter().filter(|(_, g)| g.contains(node_name));
        match (holders.next(), holders.next()) {
            (Some((_, graph)), None) => Ok(graph),
            (None, _) => Err(unknown()),
            (Some(_), Some(_)) => Err(DumpError::AmbiguousNode {
                node: node_name.to_string(),
                devices: self.node_devices(node_name)?.into_iter().map(String::from).collect(),
            }),
        }
    }
}
