use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("{0}")]
    Task(#[from] TaskFailure),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("config error: {0}")]
    Config(String),
    #[error("submit failed: {0}")]
    Submit(#[source] anyhow::Error),
    #[error("execution wait failed: {0}")]
    Wait(#[source] anyhow::Error),
    #[error("execution failed: code={code} {message}")]
    Execution { code: i32, message: String },
}

/// The worker's simulated unrecoverable failure. Exists to give the platform
/// a non-zero exit to retry; never raised outside the sentinel index.
#[derive(Error, Debug)]
#[error("purposefully failing task with index {index}")]
pub struct TaskFailure {
    pub index: u32,
}
