//! Veritext Web
//!
//! Axum server exposing the detector over HTTP, the embedded single-page UI,
//! and the `veritext` command-line interface.

pub mod cli;
pub mod config;
pub mod server;
pub mod state;

pub use cli::*;
pub use config::*;
pub use server::*;
pub use state::*;
