//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `jobfan_core::api` instead of reaching into internal modules.

pub use crate::auth::TokenSource;
pub use crate::config::{
    apply_env_overrides, load_default, load_file, AppConfig, DispatchConfig, LoggingConfig,
    WorkerConfig,
};
pub use crate::dispatch::{build_run_request, dispatch, DispatchMode, DispatchReport};
pub use crate::error::{CliError, DispatchError, TaskFailure};
pub use crate::jobs::{
    job_path, ContainerOverride, EnvVar, JobsClient, JobsHttpError, JobsHttpErrorKind, Operation,
    OperationStatus, RunJobOverrides, RunJobRequest,
};
pub use crate::worker::{run_task, TaskContext};
