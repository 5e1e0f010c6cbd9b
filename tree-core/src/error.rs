//! Error types for the tree core.

use thiserror::Error;

use crate::types::NodeId;

/// Errors raised by scene graph mutation and parameter validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown scene node {0}")]
    UnknownNode(NodeId),

    #[error("cannot attach node {0} to itself")]
    SelfAttach(NodeId),

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("{name} = {value} is outside {min}..={max}")]
    ParamOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
