use jobfan_core::api as core_api;

use super::cli::WorkerArgs;

pub fn run(args: WorkerArgs, cfg: core_api::AppConfig) -> Result<i32, core_api::CliError> {
    let ctx = core_api::TaskContext::from_env();
    let fail_index = args.fail_index.unwrap_or(cfg.worker.fail_index);
    core_api::run_task(&ctx, fail_index)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config_sentinel() {
        let cfg = core_api::AppConfig::default();
        let args = WorkerArgs {
            fail_index: Some(0),
        };
        // default platform context is index 0, so the overridden sentinel hits
        let err = run(args, cfg).unwrap_err();
        assert!(matches!(err, core_api::CliError::Task(_)));
    }
}
