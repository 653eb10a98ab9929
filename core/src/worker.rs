//! Worker-task entrypoint logic. The platform launches one process per task
//! and injects the task's position through `CLOUD_RUN_TASK_*`.

use crate::config::parse_or_default;
use crate::error::TaskFailure;

pub const ENV_TASK_INDEX: &str = "CLOUD_RUN_TASK_INDEX";
pub const ENV_TASK_COUNT: &str = "CLOUD_RUN_TASK_COUNT";

/// Platform-injected task position, read once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskContext {
    /// Zero-based task index.
    pub index: u32,
    /// Total number of tasks in this job run.
    pub count: u32,
}

impl TaskContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let index = lookup(ENV_TASK_INDEX)
            .map(|v| parse_or_default(ENV_TASK_INDEX, &v, 0))
            .unwrap_or(0);
        let count = lookup(ENV_TASK_COUNT)
            .map(|v| parse_or_default(ENV_TASK_COUNT, &v, 10))
            .unwrap_or(10);
        let ctx = Self { index, count };
        ctx.check_invariants();
        ctx
    }

    /// The platform owns these values, so a violation is logged, not fatal.
    fn check_invariants(&self) {
        if self.count == 0 {
            tracing::warn!(
                target: "jobfan.worker",
                count = self.count,
                "task count should be a positive integer"
            );
        } else if self.index >= self.count {
            tracing::warn!(
                target: "jobfan.worker",
                index = self.index,
                count = self.count,
                "task index out of range"
            );
        }
    }

    /// One-based position used in log lines.
    pub fn display_number(&self) -> u32 {
        self.index + 1
    }
}

/// Run one task: log start, optionally simulate the sentinel failure, log
/// completion. A returned `TaskFailure` becomes a non-zero exit, which is
/// what the platform's retry logic keys on.
pub fn run_task(ctx: &TaskContext, fail_index: u32) -> Result<(), TaskFailure> {
    tracing::info!(
        target: "jobfan.worker",
        index = ctx.index,
        "Task {} of {} has started.",
        ctx.display_number(),
        ctx.count
    );

    if ctx.index == fail_index {
        return Err(TaskFailure { index: ctx.index });
    }

    tracing::info!(
        target: "jobfan.worker",
        index = ctx.index,
        "Task {} of {} is complete.",
        ctx.display_number(),
        ctx.count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn context_defaults_when_unset() {
        let ctx = TaskContext::from_lookup(|_| None);
        assert_eq!(ctx, TaskContext { index: 0, count: 10 });
    }

    #[test]
    fn context_reads_injected_values() {
        let map = HashMap::from([(ENV_TASK_INDEX, "4"), (ENV_TASK_COUNT, "5")]);
        let ctx = TaskContext::from_lookup(lookup_from(&map));
        assert_eq!(ctx, TaskContext { index: 4, count: 5 });
    }

    #[test]
    fn context_falls_back_on_garbage() {
        let map = HashMap::from([(ENV_TASK_INDEX, "first"), (ENV_TASK_COUNT, "-2")]);
        let ctx = TaskContext::from_lookup(lookup_from(&map));
        assert_eq!(ctx, TaskContext { index: 0, count: 10 });
    }

    #[test]
    fn display_number_is_one_based() {
        let ctx = TaskContext { index: 0, count: 5 };
        assert_eq!(ctx.display_number(), 1);
    }

    #[test]
    fn sentinel_index_fails() {
        let ctx = TaskContext { index: 3, count: 10 };
        let err = run_task(&ctx, 3).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(
            err.to_string(),
            "purposefully failing task with index 3"
        );
    }

    #[test]
    fn non_sentinel_indices_complete() {
        for index in [0u32, 1, 2, 4, 9] {
            let ctx = TaskContext { index, count: 10 };
            assert!(run_task(&ctx, 3).is_ok());
        }
    }

    #[test]
    fn out_of_range_sentinel_never_triggers() {
        for index in 0..10u32 {
            let ctx = TaskContext { index, count: 10 };
            assert!(run_task(&ctx, u32::MAX).is_ok());
        }
    }
}
