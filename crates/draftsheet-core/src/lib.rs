// Library root: re-exports all modules so integration tests and the CLI
// can access the crate's public API.

pub mod app;
pub mod config;
pub mod draft;
pub mod export;
pub mod players;
pub mod protocol;
