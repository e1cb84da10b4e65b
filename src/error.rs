use crate::graph::NodeId;

pub type Result<T> = std::result::Result<T, SamplingError>;

#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    #[error("Self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("Node id {node} exceeds the configured maximum {max}")]
    NodeIdOutOfRange { node: NodeId, max: u64 },

    #[error("Edge already present: ({0}, {1})")]
    DuplicateEdge(NodeId, NodeId),

    #[error("Edge not found: ({0}, {1})")]
    EdgeNotFound(NodeId, NodeId),

    #[error("Removal of ({0}, {1}) while the stream graph is empty")]
    EmptyStreamRemoval(NodeId, NodeId),

    #[error("Deletions are not supported by {0}")]
    DeletionUnsupported(&'static str),

    #[error("Local triangle counting is not enabled on this counter")]
    LocalCountingDisabled,

    #[error("Missing edge weight for ({0}, {1})")]
    MissingEdgeWeight(NodeId, NodeId),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SamplingError {
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        SamplingError::InvalidParameter(msg.into())
    }

    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        SamplingError::InvariantViolation(msg.into())
    }

    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        SamplingError::Parse {
            line,
            message: msg.into(),
        }
    }
}
