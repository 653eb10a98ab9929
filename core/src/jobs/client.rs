use std::{error::Error as StdError, fmt};

use serde::de::DeserializeOwned;

use super::models::{Operation, RunJobRequest};
use crate::auth::TokenSource;

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobsHttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl JobsHttpErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobsHttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct JobsHttpError {
    kind: JobsHttpErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl JobsHttpError {
    pub fn kind(&self) -> JobsHttpErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            JobsHttpErrorKind::Timeout
        } else if err.is_connect() {
            JobsHttpErrorKind::Connect
        } else if err.is_request() {
            JobsHttpErrorKind::Request
        } else if err.is_body() {
            JobsHttpErrorKind::Body
        } else if err.is_decode() {
            JobsHttpErrorKind::Decode
        } else {
            JobsHttpErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        JobsHttpError {
            kind,
            status,
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }

    fn status_error(status: u16, url: String, preview: String) -> Self {
        JobsHttpError {
            kind: JobsHttpErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview,
            source: None,
        }
    }

    fn decode_error(status: u16, url: String, err: serde_json::Error, preview: String) -> Self {
        let message = format!("failed to decode response body: {} | body={}", err, preview);
        JobsHttpError {
            kind: JobsHttpErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message,
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl fmt::Display for JobsHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "jobs http error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for JobsHttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

async fn parse_json_response<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| JobsHttpError::from_reqwest(err, url.clone()))?;

    if !status.is_success() {
        let preview = preview_body(&body);
        return Err(JobsHttpError::status_error(status.as_u16(), url, preview).into());
    }

    serde_json::from_str::<T>(&body).map_err(|err| {
        let preview = preview_body(&body);
        JobsHttpError::decode_error(status.as_u16(), url, err, preview).into()
    })
}

/// Format the fully-qualified resource name of a job.
pub fn job_path(project: &str, region: &str, job: &str) -> String {
    format!("projects/{}/locations/{}/jobs/{}", project, region, job)
}

/// Client for the two Admin API calls this tool makes: submitting a job run
/// and polling the resulting long-running operation.
pub struct JobsClient {
    http: reqwest::Client,
    base_url: String,
    token: TokenSource,
}

impl JobsClient {
    pub fn new(base_url: String, token: TokenSource, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub async fn run_job(
        &self,
        job_path: &str,
        request: &RunJobRequest,
    ) -> anyhow::Result<Operation> {
        let url = format!("{}/v2/{}:run", self.base_url, job_path);
        tracing::debug!(
            target: "jobfan.jobs",
            stage = "jobs.http.run.in",
            url = %url,
            task_count = ?request.overrides.as_ref().and_then(|o| o.task_count),
            parallelism = ?request.overrides.as_ref().and_then(|o| o.parallelism)
        );
        let token = self.token.bearer().await?;
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|err| JobsHttpError::from_reqwest(err, url.clone()))?;
        let status = resp.status();
        let op: Operation = parse_json_response(resp).await?;
        tracing::debug!(
            target: "jobfan.jobs",
            stage = "jobs.http.run.out",
            status = %status,
            operation = %op.name
        );
        Ok(op)
    }

    pub async fn get_operation(&self, name: &str) -> anyhow::Result<Operation> {
        let url = format!("{}/v2/{}", self.base_url, name);
        tracing::debug!(target: "jobfan.jobs", stage = "jobs.http.operation.in", url = %url);
        let token = self.token.bearer().await?;
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| JobsHttpError::from_reqwest(err, url.clone()))?;
        let status = resp.status();
        let op: Operation = parse_json_response(resp).await?;
        tracing::debug!(
            target: "jobfan.jobs",
            stage = "jobs.http.operation.out",
            status = %status,
            done = op.done
        );
        Ok(op)
    }

    /// Poll the operation until `done`. No deadline here: the platform bounds
    /// execution through the job's own task timeout and retry budget.
    pub async fn wait_operation(
        &self,
        name: &str,
        poll_interval: std::time::Duration,
    ) -> anyhow::Result<Operation> {
        loop {
            let op = self.get_operation(name).await?;
            if op.done {
                return Ok(op);
            }
            tracing::debug!(
                target: "jobfan.jobs",
                operation = %op.name,
                "execution still running"
            );
            tokio::time::sleep(poll_interval).await;
        }
    }
}
