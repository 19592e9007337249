//! Async seams around the console decoders
//!
//! The byte-level connection to the admin console is somebody else's job; this crate
//! takes it as an [`RconTransport`] and layers typed operations on top.
//!
//! # Components
//!
//! - [`transport`]: the request/response seam
//! - [`rcon`]: [`SquadRcon`], typed queries and admin commands plus team shuffle
//! - [`runtime`]: the broadcast pump turning unsolicited lines into events
//! - [`layers`]: cached layer catalog
//! - [`config`]: environment configuration for the console front-end
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use squad_rcon_adapter::{RconTransport, SquadRcon, TransportError};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl RconTransport for Echo {
//!     async fn execute(&self, command: &str) -> Result<String, TransportError> {
//!         Ok(command.to_string())
//!     }
//! }
//!
//! let rcon = SquadRcon::new(Echo);
//! let sent = tokio_test::block_on(rcon.execute("AdminEndMatch")).unwrap();
//! assert_eq!(sent, "AdminEndMatch");
//! ```

pub mod config;
pub mod layers;
pub mod rcon;
pub mod runtime;
pub mod transport;

pub use squad_rcon_core as core;
pub use squad_rcon_types as types;

pub use config::ConsoleConfig;
pub use layers::{
    parse_catalog, CatalogError, FileLayerSource, LayerCatalog, LayerSource, StaticLayerSource,
};
pub use rcon::{RconError, ShuffleReport, SquadRcon, SwitchFailure};
pub use runtime::{spawn_broadcast_pump, PumpStats};
pub use transport::{RconTransport, TransportError};
