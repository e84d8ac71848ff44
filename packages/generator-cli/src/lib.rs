#![deny(clippy::all)]

/**
 * apigen CLI
 *
 * Command-line front end for the apigen generator
 */
pub use apigen as generator;

pub mod config;
pub mod main_entry;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
