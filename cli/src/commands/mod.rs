pub mod cli;
pub mod dispatch;
pub mod worker;
