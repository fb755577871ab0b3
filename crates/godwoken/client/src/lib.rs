mod api;
pub use api::*;

mod cli;
pub use cli::*;

mod client;
pub use client::*;

mod config;
pub use config::*;

pub mod error;

mod fee_check;
pub use fee_check::*;

mod orchestrator;
pub use orchestrator::*;

mod resolver;
pub use resolver::*;

/// End to end account creation used by the `godwoken-create-account` binary.
mod runner;
pub use runner::*;

#[cfg(test)]
mod test_utils;
