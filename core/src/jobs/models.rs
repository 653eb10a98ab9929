use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `jobs.run` (Cloud Run Admin API v2). Field names follow the wire
/// format, hence the camelCase renames.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunJobRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<RunJobOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunJobOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_overrides: Vec<ContainerOverride>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerOverride {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Long-running operation returned by `jobs.run`. `response` and `metadata`
/// are kept as raw JSON; the dispatcher only logs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,

    #[serde(default)]
    pub done: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// `google.rpc.Status` as surfaced on a failed operation. A populated error
/// is the platform's signal that one or more tasks exhausted their retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn run_request_serializes_camel_case() {
        let req = RunJobRequest {
            overrides: Some(RunJobOverrides {
                task_count: Some(10),
                parallelism: Some(2),
                container_overrides: vec![ContainerOverride {
                    env: vec![EnvVar::new("TOTAL_TASK_COUNT", "10")],
                }],
            }),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "overrides": {
                    "taskCount": 10,
                    "parallelism": 2,
                    "containerOverrides": [
                        { "env": [ { "name": "TOTAL_TASK_COUNT", "value": "10" } ] }
                    ]
                }
            })
        );
    }

    #[test]
    fn absent_parallelism_is_omitted() {
        let req = RunJobRequest {
            overrides: Some(RunJobOverrides {
                task_count: Some(3),
                parallelism: None,
                container_overrides: vec![],
            }),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({ "overrides": { "taskCount": 3 } }));
    }

    #[test]
    fn operation_deserializes_pending() {
        let op: Operation = serde_json::from_value(json!({
            "name": "projects/p/locations/l/operations/op-1",
            "metadata": { "job": "worker-job" }
        }))
        .unwrap();

        assert_eq!(op.name, "projects/p/locations/l/operations/op-1");
        assert!(!op.done);
        assert!(op.error.is_none());
        assert!(op.response.is_none());
    }

    #[test]
    fn operation_deserializes_failure() {
        let op: Operation = serde_json::from_value(json!({
            "name": "projects/p/locations/l/operations/op-2",
            "done": true,
            "error": { "code": 9, "message": "task 3 exceeded maximum retries" }
        }))
        .unwrap();

        assert!(op.done);
        let err = op.error.unwrap();
        assert_eq!(err.code, 9);
        assert_eq!(err.message, "task 3 exceeded maximum retries");
    }
}
