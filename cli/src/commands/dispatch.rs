use jobfan_core::api as core_api;

use super::cli::DispatchArgs;

/// CLI flags sit above config.toml and env in the override chain.
pub fn apply_arg_overrides(cfg: &mut core_api::AppConfig, args: &DispatchArgs) {
    if let Some(project) = &args.project {
        cfg.project = project.clone();
    }
    if let Some(region) = &args.region {
        cfg.region = region.clone();
    }
    if let Some(job) = &args.job {
        cfg.job = job.clone();
    }
    if let Some(task_count) = args.task_count {
        cfg.dispatch.task_count = task_count;
    }
    if let Some(parallelism) = args.parallelism {
        cfg.dispatch.parallelism = if parallelism == 0 {
            None
        } else {
            Some(parallelism)
        };
    }
    if args.wait {
        cfg.dispatch.wait = true;
    }
    if let Some(endpoint) = &args.api_endpoint {
        cfg.dispatch.api_endpoint = endpoint.clone();
    }
}

pub async fn run(
    args: DispatchArgs,
    mut cfg: core_api::AppConfig,
) -> Result<i32, core_api::CliError> {
    apply_arg_overrides(&mut cfg, &args);

    let token = core_api::TokenSource::from_env()?;
    let client = core_api::JobsClient::new(
        cfg.dispatch.api_endpoint.clone(),
        token,
        cfg.dispatch.timeout_ms,
    )?;
    let mode = core_api::DispatchMode::from_wait(cfg.dispatch.wait);

    core_api::dispatch(&cfg, mode, &client).await?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn no_args() -> DispatchArgs {
        DispatchArgs {
            project: None,
            region: None,
            job: None,
            task_count: None,
            parallelism: None,
            wait: false,
            api_endpoint: None,
        }
    }

    #[test]
    fn no_flags_leave_config_untouched() {
        let mut cfg = core_api::AppConfig::default();
        apply_arg_overrides(&mut cfg, &no_args());
        assert_eq!(cfg.dispatch.task_count, 10);
        assert_eq!(cfg.dispatch.parallelism, Some(2));
        assert!(!cfg.dispatch.wait);
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = core_api::AppConfig::default();
        let args = DispatchArgs {
            project: Some("demo".to_string()),
            region: Some("europe-west1".to_string()),
            job: Some("batch-worker".to_string()),
            task_count: Some(25),
            parallelism: Some(0),
            wait: true,
            api_endpoint: None,
        };
        apply_arg_overrides(&mut cfg, &args);
        assert_eq!(cfg.project, "demo");
        assert_eq!(cfg.region, "europe-west1");
        assert_eq!(cfg.job, "batch-worker");
        assert_eq!(cfg.dispatch.task_count, 25);
        assert_eq!(cfg.dispatch.parallelism, None);
        assert!(cfg.dispatch.wait);
    }

    #[test]
    fn wait_flag_never_clears_configured_wait() {
        let mut cfg = core_api::AppConfig::default();
        cfg.dispatch.wait = true;
        apply_arg_overrides(&mut cfg, &no_args());
        assert!(cfg.dispatch.wait);
    }
}
