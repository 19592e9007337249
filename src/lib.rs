//! Squad RCON text-protocol adapter (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package exposes
//! them as `squad_rcon::{types,core,adapter}` and ships the `squad-rcon` binary.

pub use squad_rcon_adapter as adapter;
pub use squad_rcon_core as core;
pub use squad_rcon_types as types;
