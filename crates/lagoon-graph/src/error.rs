use crate::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {id} has a non-finite {field}")]
    NonFinite { id: NodeId, field: &'static str },

    #[error("node {id} has an invalid mass {mass} (must be finite and > 0)")]
    InvalidMass { id: NodeId, mass: f64 },

    #[error("node {id} has an invalid {field} {value} (must be finite and >= 0)")]
    InvalidDimension {
        id: NodeId,
        field: &'static str,
        value: f64,
    },

    // `source` is reserved by thiserror for the error chain.
    #[error("edge #{index} ({from} -> {to}) references a missing node")]
    MissingEndpoint { index: usize, from: NodeId, to: NodeId },

    #[error("node {id} appears more than once in the snapshot")]
    DuplicateNode { id: NodeId },
}

pub type Result<T> = std::result::Result<T, Error>;
