pub mod config;
pub mod output;
pub mod standings;
pub mod stderr_buffer;
pub mod store;
