mod client;
mod models;

pub use client::{job_path, JobsClient, JobsHttpError, JobsHttpErrorKind};
pub use models::{
    ContainerOverride, EnvVar, Operation, OperationStatus, RunJobOverrides, RunJobRequest,
};
