pub mod branch;
pub mod document;
pub mod ticket;
