//! Dispatcher: build one job-run request and hand it to the platform. All
//! fan-out, retry, and placement happens on the platform side.

use uuid::Uuid;

use crate::config::{AppConfig, ENV_TASK_COUNT};
use crate::error::DispatchError;
use crate::jobs::{
    job_path, ContainerOverride, EnvVar, JobsClient, Operation, RunJobOverrides, RunJobRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Submit the run request, log the operation name, exit.
    FireAndForget,
    /// Submit, then poll the operation until the execution finishes.
    Blocking,
}

impl DispatchMode {
    pub fn from_wait(wait: bool) -> Self {
        if wait {
            Self::Blocking
        } else {
            Self::FireAndForget
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Correlation id carried in every log line of this invocation.
    pub dispatch_id: String,
    /// Resource name of the long-running operation the platform returned.
    pub operation: String,
    /// Final operation state; `None` in fire-and-forget mode.
    pub outcome: Option<Operation>,
}

/// Every task sees the fan-out width through this env override.
pub fn build_run_request(cfg: &AppConfig) -> RunJobRequest {
    RunJobRequest {
        overrides: Some(RunJobOverrides {
            task_count: Some(cfg.dispatch.task_count),
            parallelism: cfg.dispatch.parallelism,
            container_overrides: vec![ContainerOverride {
                env: vec![EnvVar::new(
                    ENV_TASK_COUNT,
                    cfg.dispatch.task_count.to_string(),
                )],
            }],
        }),
    }
}

pub async fn dispatch(
    cfg: &AppConfig,
    mode: DispatchMode,
    client: &JobsClient,
) -> Result<DispatchReport, DispatchError> {
    if cfg.project.trim().is_empty() {
        return Err(DispatchError::Config(
            "project id is required (set GCP_PROJECT)".to_string(),
        ));
    }

    let dispatch_id = Uuid::new_v4().to_string();
    let path = job_path(&cfg.project, &cfg.region, &cfg.job);

    tracing::info!(
        target: "jobfan.dispatch",
        dispatch_id = %dispatch_id,
        job = %cfg.job,
        task_count = cfg.dispatch.task_count,
        parallelism = ?cfg.dispatch.parallelism,
        "launching {} with {} tasks",
        cfg.job,
        cfg.dispatch.task_count
    );

    let request = build_run_request(cfg);
    let op = client
        .run_job(&path, &request)
        .await
        .map_err(DispatchError::Submit)?;

    match mode {
        DispatchMode::FireAndForget => {
            tracing::info!(
                target: "jobfan.dispatch",
                dispatch_id = %dispatch_id,
                operation = %op.name,
                "worker job dispatched, not waiting on execution"
            );
            Ok(DispatchReport {
                dispatch_id,
                operation: op.name,
                outcome: None,
            })
        }
        DispatchMode::Blocking => {
            let poll = std::time::Duration::from_millis(cfg.dispatch.poll_interval_ms);
            let finished = client
                .wait_operation(&op.name, poll)
                .await
                .map_err(DispatchError::Wait)?;

            if let Some(status) = &finished.error {
                return Err(DispatchError::Execution {
                    code: status.code,
                    message: status.message.clone(),
                });
            }

            let response = finished
                .response
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "{}".to_string());
            tracing::info!(
                target: "jobfan.dispatch",
                dispatch_id = %dispatch_id,
                operation = %finished.name,
                response = %response,
                "worker job execution finished"
            );

            Ok(DispatchReport {
                dispatch_id,
                operation: op.name,
                outcome: Some(finished),
            })
        }
    }
}
