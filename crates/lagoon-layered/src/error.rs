#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown rank direction `{value}` (expected TB, BT, LR or RL)")]
    UnknownDirection { value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
