use lagoon_graph::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] lagoon_graph::Error),
    #[error(transparent)]
    Solver(#[from] lagoon_physics::Error),
    #[error(transparent)]
    Direction(#[from] lagoon_layered::Error),
    #[error("invalid layout config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("unknown node {id}")]
    UnknownNode { id: NodeId },
    #[error("failed to start layout worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("layout worker stopped before delivering a result")]
    WorkerGone,
}
