use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// GCP project id. Required for dispatch; the worker never needs it.
    #[serde(default)]
    pub project: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Name of the Cloud Run job the dispatcher targets.
    #[serde(default = "default_job")]
    pub job: String,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_region() -> String {
    "us-central1".to_string()
}

fn default_job() -> String {
    "worker-job".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            region: default_region(),
            job: default_job(),
            dispatch: DispatchConfig::default(),
            worker: WorkerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Number of worker tasks one job run fans out to.
    #[serde(default = "default_task_count")]
    pub task_count: u32,

    /// Parallelism override sent with the run request. `None` omits the
    /// override entirely (some jobs reject it).
    #[serde(default = "default_parallelism")]
    pub parallelism: Option<u32>,

    /// If true, block on the run operation instead of fire-and-forget.
    #[serde(default)]
    pub wait: bool,

    /// Admin API endpoint.
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Interval between operation polls in blocking mode.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_task_count() -> u32 {
    10
}

fn default_parallelism() -> Option<u32> {
    Some(2)
}

fn default_api_endpoint() -> String {
    "https://run.googleapis.com".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            task_count: default_task_count(),
            parallelism: default_parallelism(),
            wait: false,
            api_endpoint: default_api_endpoint(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Task index that simulates an unrecoverable failure, used to exercise
    /// the platform's retry behavior. Point it outside the task-index range
    /// to never trigger.
    #[serde(default = "default_fail_index")]
    pub fail_index: u32,
}

fn default_fail_index() -> u32 {
    3
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            fail_index: default_fail_index(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "jobfan_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}
