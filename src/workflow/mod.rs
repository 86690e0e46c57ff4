pub mod branch;
pub mod connection;
pub mod create;
pub mod fetch;
pub mod start;

#[cfg(test)]
pub mod testing;
