use clap::Parser;
mod commands;
use commands::cli;
use jobfan_core::config::{load_default, AppConfig, LoggingConfig};
use jobfan_core::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();
    let cfg = load_default().map_err(|e| error::CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(error::CliError::Config)?;

    dispatch(args.command, cfg).await
}

fn exit_code_for_error(e: &error::CliError) -> i32 {
    // 0: success
    // 1: dispatch/execution failure, simulated task failure
    // 2: configuration error
    match e {
        error::CliError::Config(_) => 2,
        error::CliError::Dispatch(error::DispatchError::Config(_)) => 2,
        _ => 1,
    }
}

async fn dispatch(cmd: cli::Commands, cfg: AppConfig) -> Result<i32, error::CliError> {
    match cmd {
        cli::Commands::Dispatch(dispatch_args) => commands::dispatch::run(dispatch_args, cfg).await,
        cli::Commands::Worker(worker_args) => commands::worker::run(worker_args, cfg),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("jobfan"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("jobfan.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_contract() {
        let exec = error::CliError::Dispatch(error::DispatchError::Execution {
            code: 9,
            message: "task 3 exceeded maximum retries".to_string(),
        });
        assert_eq!(exit_code_for_error(&exec), 1);

        let task = error::CliError::Task(error::TaskFailure { index: 3 });
        assert_eq!(exit_code_for_error(&task), 1);

        let config = error::CliError::Config("missing project".to_string());
        assert_eq!(exit_code_for_error(&config), 2);

        let dispatch_config = error::CliError::Dispatch(error::DispatchError::Config(
            "project id is required".to_string(),
        ));
        assert_eq!(exit_code_for_error(&dispatch_config), 2);
    }
}
