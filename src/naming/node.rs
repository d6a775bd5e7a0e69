// CLASSIFICATION: COMMUNITY
// Filename: node.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-19

//! Node and tensor reference parsing.
//!
//! A tensor is referenced as `node:slot`; a bare `node` refers to slot 0 where
//! a slot is needed. Node names produced by the instrumentation rewrite are
//! recognised by their literal prefix and classified into [`NodeKind`].

use std::fmt;

use super::{COPY_NODE_PREFIX, DEBUG_NODE_PREFIX};
use crate::error::FormatError;

/// Category of a graph node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Ordinary,
    Copy,
    Debug,
}

/// Reserved prefixes and the category they select. Prefixes do not overlap.
const NODE_PREFIXES: &[(&str, NodeKind)] = &[
    (COPY_NODE_PREFIX, NodeKind::Copy),
    (DEBUG_NODE_PREFIX, NodeKind::Debug),
];

impl NodeKind {
    /// Classify a node name by its literal, case-sensitive prefix.
    pub fn classify(node_name: &str) -> Self {
        NODE_PREFIXES
            .iter()
            .find(|(prefix, _)| node_name.starts_with(prefix))
            .map_or(NodeKind::Ordinary, |&(_, kind)| kind)
    }
}

/// Split `node` or `node:slot` into its node name and optional slot.
///
/// Only a trailing `:` followed entirely by digits is treated as a slot.
pub fn parse_node_or_tensor_name(name: &str) -> (&str, Option<u32>) {
    match name.rsplit_once(':') {
        Some((node, slot))
            if !slot.is_empty() && slot.bytes().all(|b| b.is_ascii_digit()) =>
        {
            match slot.parse() {
                Ok(slot) => (node, Some(slot)),
                Err(_) => (name, None),
            }
        }
        _ => (name, None),
    }
}

pub fn get_node_name(name: &str) -> &str {
    parse_node_or_tensor_name(name).0
}

/// Output slot of a tensor reference, 0 for a bare node name.
pub fn get_output_slot(name: &str) -> u32 {
    parse_node_or_tensor_name(name).1.unwrap_or(0)
}

pub fn is_copy_node(node_name: &str) -> bool {
    NodeKind::classify(node_name) == NodeKind::Copy
}

pub fn is_debug_node(node_name: &str) -> bool {
    NodeKind::classify(node_name) == NodeKind::Debug
}

/// Components of a debug node name
/// `__dbg_<watched_node>:<watched_slot>_<debug_op_index>_<debug_op>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugNodeName {
    pub watched_node: String,
    pub watched_slot: u32,
    pub debug_op_index: u32,
    pub debug_op: String,
}

impl fmt::Display for DebugNodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}_{}_{}",
            DEBUG_NODE_PREFIX, self.watched_node, self.watched_slot, self.debug_op_index, self.debug_op
        )
    }
}

/// Parse the name of a debug node materialized in a graph.
pub fn parse_debug_node_name(node_name: &str) -> Result<DebugNodeName, FormatError> {
    if NodeKind::classify(node_name) != NodeKind::Debug {
        return Err(FormatError::InvalidPrefix(node_name.to_string()));
    }
    let body = &node_name[DEBUG_NODE_PREFIX.len()..];

    let mut parts = body.rsplitn(3, '_');
    let (Some(debug_op), Some(index), Some(watched)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FormatError::InvalidFormat(node_name.to_string()));
    };
    if debug_op.is_empty() {
        return Err(FormatError::InvalidFormat(node_name.to_string()));
    }
    let debug_op_index = index
        .parse()
        .map_err(|_| FormatError::InvalidFormat(node_name.to_string()))?;

    match parse_node_or_tensor_name(watched) {
        (watched_node, Some(watched_slot)) if !watched_node.is_empty() => Ok(DebugNodeName {
            watched_node: watched_node.to_string(),
            watched_slot,
            debug_op_index,
            debug_op: debug_op.to_string(),
        }),
        _ => Err(FormatError::InvalidWatchedTensor(node_name.to_string())),
    }
}
