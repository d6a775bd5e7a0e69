// CLASSIFICATION: COMMUNITY
// Filename: graph.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Partition graph descriptors.
//!
//! A descriptor lists the nodes executed in a run together with the device
//! each node was placed on. Descriptors are either supplied by the caller or
//! read from `_tfdbg_graph_*` JSON files inside the device directories.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{DumpError, Result};
use crate::naming::get_node_name;

/// Marker of a control-dependency input.
const CONTROL_INPUT_PREFIX: char = '^';

/// A node of a partition graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub device: String,
    /// Data inputs as `node` or `node:slot`, control inputs as `^node`.
    #[serde(default)]
    pub input: Vec<String>,
}

impl NodeDef {
    pub fn new(name: &str, op: &str, device: &str) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            device: device.into(),
            input: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: &str) -> Self {
        self.input.push(input.into());
        self
    }
}

/// A partition graph as executed by the instrumented runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GraphDescriptor {
    #[serde(default, alias = "node")]
    pub nodes: Vec<NodeDef>,
}

impl GraphDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeDef) -> Self {
        self.nodes.push(node);
        self
    }

    /// Load a JSON graph file. Nodes without a device are assigned
    /// `default_device`.
    pub fn from_json_file(path: &Path, default_device: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DumpError::io(path, e))?;
        let mut graph: GraphDescriptor =
            serde_json::from_str(&text).map_err(|source| DumpError::GraphFile {
                path: path.to_path_buf(),
                source,
            })?;
        for node in graph.nodes.iter_mut().filter(|n| n.device.is_empty()) {
            node.device = default_device.to_string();
        }
        debug!("loaded graph {} with {} nodes", path.display(), graph.nodes.len());
        Ok(graph)
    }
}

/// All nodes placed on one device, with input and recipient maps.
#[derive(Debug, Default)]
pub(crate) struct DeviceGraph {
    nodes: Vec<NodeDef>,
    by_name: HashMap<String, usize>,
    recipients: HashMap<String, Vec<String>>,
    control_recipients: HashMap<String, Vec<String>>,
}

impl DeviceGraph {
    fn insert(&mut self, device: &str, node: NodeDef) -> Result<()> {
        if self.by_name.contains_key(&node.name) {
            return Err(DumpError::DuplicateNode {
                device: device.to_string(),
                node: node.name,
            });
        }
        self.by_name.insert(node.name.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn link_recipients(&mut self) {
        for node in &self.nodes {
            for input in &node.input {
                let (target, name) = match input.strip_prefix(CONTROL_INPUT_PREFIX) {
                    Some(ctrl) => (&mut self.control_recipients, ctrl),
                    None => (&mut self.recipients, get_node_name(input)),
                };
                target
                    .entry(name.to_string())
                    .or_default()
                    .push(node.name.clone());
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    pub(crate) fn contains(&self, node_name: &str) -> bool {
        self.by_name.contains_key(node_name)
    }

    pub(crate) fn node(&self, node_name: &str) -> Option<&NodeDef> {
        self.by_name.get(node_name).map(|&idx| &self.nodes[idx])
    }

    /// Names of the nodes feeding `node_name`, data or control.
    pub(crate) fn inputs(&self, node_name: &str, is_control: bool) -> Option<Vec<String>> {
        let node = self.node(node_name)?;
        let inputs = node
            .input
            .iter()
            .filter_map(|input| match input.strip_prefix(CONTROL_INPUT_PREFIX) {
                Some(ctrl) if is_control => Some(ctrl.to_string()),
                None if !is_control => Some(get_node_name(input).to_string()),
                _ => None,
            })
            .collect();
        Some(inputs)
    }

    pub(crate) fn recipients(&self, node_name: &str, is_control: bool) -> Option<Vec<String>> {
        if !self.contains(node_name) {
            return None;
        }
        let map = if is_control {
            &self.control_recipients
        } else {
            &self.recipients
        };
        Some(map.get(node_name).cloned().unwrap_or_default())
    }

    /// Every node reachable backwards through inputs, nearest first.
    pub(crate) fn transitive_inputs(
        &self,
        node_name: &str,
        include_control: bool,
    ) -> Option<Vec<String>> {
        self.node(node_name)?;
        let mut seen = HashSet::from([node_name.to_string()]);
        let mut queue = VecDeque::from([node_name.to_string()]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            let mut inputs = self.inputs(&current, false).unwrap_or_default();
            if include_control {
                inputs.extend(self.inputs(&current, true).unwrap_or_default());
            }
            for input in inputs {
                if seen.insert(input.clone()) {
                    out.push(input.clone());
                    queue.push_back(input);
                }
            }
        }
        Some(out)
    }
}

/// Split descriptors by node device. A node name may repeat across devices
/// but not within one device. Nodes without a device form their own group
/// under the empty key and are checked the same way.
pub(crate) fn partition_by_device(
    graphs: &[GraphDescriptor],
) -> Result<BTreeMap<String, DeviceGraph>> {
    let mut devices: BTreeMap<String, DeviceGraph> = BTreeMap::new();
    for node in graphs.iter().flat_map(|g| g.nodes.iter()) {
        devices
            .entry(node.device.clone())
            .or_default()
            .insert(&node.device, node.clone())?;
    }
    for graph in devices.values_mut() {
        graph.link_recipients();
    }
    Ok(devices)
}
