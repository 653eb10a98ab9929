pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod jobs;
pub mod worker;

pub use error::{CliError, DispatchError, TaskFailure};
