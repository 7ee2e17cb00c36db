//! CLI command implementations.

pub mod books;
pub mod export;
pub mod list;
pub mod load;
pub mod similar;
pub mod status;
