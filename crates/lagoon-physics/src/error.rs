#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown solver `{name}` (expected standard, adaptive, rectangular or ranked)")]
    UnknownSolver { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
