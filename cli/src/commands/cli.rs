use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jobfan", about = "Dispatch Cloud Run worker jobs and run worker tasks")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DispatchArgs {
    /// GCP project id. Falls back to GCP_PROJECT / config.toml.
    #[arg(long)]
    pub project: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    /// Name of the Cloud Run job to launch.
    #[arg(long)]
    pub job: Option<String>,

    /// Number of worker tasks to fan out to.
    #[arg(long)]
    pub task_count: Option<u32>,

    /// Parallelism override. 0 drops the override from the request.
    #[arg(long)]
    pub parallelism: Option<u32>,

    /// Block until the execution finishes instead of fire-and-forget.
    #[arg(long)]
    pub wait: bool,

    /// Admin API endpoint override.
    #[arg(long, hide = true)]
    pub api_endpoint: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct WorkerArgs {
    /// Task index that simulates an unrecoverable failure.
    /// Falls back to FAIL_TASK_INDEX / config.toml.
    #[arg(long)]
    pub fail_index: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Dispatch(DispatchArgs),
    Worker(WorkerArgs),
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_dispatch_flags() {
        let args = Args::try_parse_from([
            "jobfan",
            "dispatch",
            "--project",
            "demo",
            "--task-count",
            "25",
            "--wait",
        ])
        .unwrap();

        match args.command {
            Commands::Dispatch(d) => {
                assert_eq!(d.project.as_deref(), Some("demo"));
                assert_eq!(d.task_count, Some(25));
                assert!(d.wait);
                assert!(d.region.is_none());
            }
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn parses_worker_defaults() {
        let args = Args::try_parse_from(["jobfan", "worker"]).unwrap();
        match args.command {
            Commands::Worker(w) => assert!(w.fail_index.is_none()),
            other => panic!("expected worker, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_subcommand() {
        assert!(Args::try_parse_from(["jobfan"]).is_err());
    }

    #[test]
    fn rejects_non_integer_task_count() {
        assert!(Args::try_parse_from(["jobfan", "dispatch", "--task-count", "many"]).is_err());
    }
}
