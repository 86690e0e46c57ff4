pub mod config;
pub mod connection;
pub mod create;
pub mod fetch;
pub mod start;
