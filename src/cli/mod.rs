//! # CLI Module
//!
//! Command-line entry point of the `enzovu` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! enzovu serve
//! enzovu serve --addr 127.0.0.1:9000 --watch public
//! ```
//!
//! Options:
//! - `--addr <ADDR>` - Bind address (default: `APP_HOST:APP_PORT`)
//! - `--watch <PATH>` - Rebuild the routes when `PATH` changes
//!
//! Stops gracefully on `SIGINT`/`SIGTERM`.
//!
//! ### `routes`
//!
//! ```bash
//! enzovu routes
//! ```
//!
//! Prints every registered `METHOD pattern` pair in match order.

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
