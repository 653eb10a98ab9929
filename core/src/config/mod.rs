mod load;
mod types;

pub use load::{
    apply_env_overrides, load_default, load_file, ENV_FAIL_INDEX, ENV_JOB, ENV_PARALLELISM,
    ENV_PROJECT, ENV_REGION, ENV_TASK_COUNT,
};
pub(crate) use load::parse_or_default;
pub use types::{AppConfig, DispatchConfig, LoggingConfig, WorkerConfig};
