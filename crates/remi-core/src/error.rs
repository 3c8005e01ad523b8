use thiserror::Error;

/// Top-level error type for Remi.
#[derive(Debug, Error)]
pub enum RemiError {
    /// Invalid or incomplete configuration — fatal at startup.
    #[error("config error: {0}")]
    Config(String),

    /// Model output matched neither the terminal marker nor the action
    /// pattern. Carries the offending text; aborts the current turn.
    #[error("could not parse model output: `{0}`")]
    Parse(String),

    /// The model requested a tool that is not registered.
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),

    /// The reasoning loop ran past its step cap without finishing.
    #[error("reasoning loop exceeded {0} steps")]
    LoopExceeded(usize),

    /// The model call did not return within the configured deadline.
    #[error("model call timed out after {0}s")]
    Timeout(u64),

    /// Error from the model provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Reminder store error.
    #[error("store error: {0}")]
    Memory(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
