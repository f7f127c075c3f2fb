pub mod config;
pub mod fleet;
pub mod kafka;
pub mod ssm;
