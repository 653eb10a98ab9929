use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use super::types::AppConfig;

/// Environment variables recognized by the dispatcher. Worker-side task
/// context (`CLOUD_RUN_TASK_*`) is read separately in `crate::worker`.
pub const ENV_PROJECT: &str = "GCP_PROJECT";
pub const ENV_REGION: &str = "GCP_REGION";
pub const ENV_JOB: &str = "WORKER_JOB_NAME";
pub const ENV_TASK_COUNT: &str = "TOTAL_TASK_COUNT";
pub const ENV_PARALLELISM: &str = "PARALLEL_TASKS";
pub const ENV_FAIL_INDEX: &str = "FAIL_TASK_INDEX";

pub fn load_default() -> anyhow::Result<AppConfig> {
    let mut cfg = load_file(Path::new("config.toml"))?;
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

pub fn load_file(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        let s = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    } else {
        Ok(AppConfig::default())
    }
}

/// Apply environment overrides through a lookup closure. Factored out of
/// `load_default` so tests never have to mutate process environment.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_PROJECT) {
        if !v.trim().is_empty() {
            cfg.project = v;
        }
    }
    if let Some(v) = lookup(ENV_REGION) {
        if !v.trim().is_empty() {
            cfg.region = v;
        }
    }
    if let Some(v) = lookup(ENV_JOB) {
        if !v.trim().is_empty() {
            cfg.job = v;
        }
    }
    if let Some(v) = lookup(ENV_TASK_COUNT) {
        cfg.dispatch.task_count = parse_or_default(ENV_TASK_COUNT, &v, cfg.dispatch.task_count);
    }
    if let Some(v) = lookup(ENV_PARALLELISM) {
        // 0 drops the parallelism override from the run request; some jobs
        // reject an explicit override.
        let parsed = parse_or_default(
            ENV_PARALLELISM,
            &v,
            cfg.dispatch.parallelism.unwrap_or_default(),
        );
        cfg.dispatch.parallelism = if parsed == 0 { None } else { Some(parsed) };
    }
    if let Some(v) = lookup(ENV_FAIL_INDEX) {
        cfg.worker.fail_index = parse_or_default(ENV_FAIL_INDEX, &v, cfg.worker.fail_index);
    }
}

/// Integer parsing keeps the documented fall-back-to-default behavior, but a
/// rejected value is logged so misconfiguration stays visible.
pub(crate) fn parse_or_default<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(
                target: "jobfan.config",
                key,
                value = raw,
                fallback = %default,
                "unparseable value, falling back to default"
            );
            default
        }
    }
}
