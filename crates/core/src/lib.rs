//! Console text decoding - pure, synchronous, and testable
//!
//! This crate turns Squad admin-console text into structured data and back. It has
//! **no I/O**: every function takes text in and returns values out, so it can be called
//! from any number of request paths at once.
//!
//! # Module Structure
//!
//! - [`identity`]: `platform:id` lists embedded in console text
//! - [`rule`]: regex plus handler rules and the ordered [`RuleSet`] dispatcher
//! - [`broadcast`]: reference rules for unsolicited console broadcasts
//! - [`log_rules`]: reference rules for server log lines (consumed by a log dispatcher)
//! - [`roster`]: `ListPlayers` / `ListSquads` decoders
//! - [`status`]: `ShowServerInfo`, `ShowCurrentMap`, `ShowNextMap` decoders
//! - [`command`]: admin command formatting
//! - [`shuffle`]: team-shuffle planning over any `rand::Rng`
//!
//! # Example
//!
//! ```
//! use squad_rcon_core::BroadcastClassifier;
//! use squad_rcon_core::types::EventKind;
//!
//! let classifier = BroadcastClassifier::new();
//! let event = classifier
//!     .classify("Kicked player 7. [Online IDs=eos:ab12] Bob")
//!     .expect("kick line");
//!
//! assert_eq!(event.kind, EventKind::PlayerKicked);
//! assert_eq!(event.field("eosid"), Some("ab12"));
//! assert!(classifier.classify("hello").is_none());
//! ```

pub mod broadcast;
pub mod command;
pub mod error;
pub mod identity;
pub mod log_rules;
pub mod roster;
pub mod rule;
pub mod shuffle;
pub mod status;

pub use squad_rcon_types as types;

// Re-export commonly used items for convenience
pub use broadcast::{broadcast_rules, BroadcastClassifier};
pub use error::DecodeError;
pub use identity::{format_identities, parse_identities};
pub use log_rules::log_rules;
pub use roster::{decode_player_roster, decode_squad_roster, LineDecoder};
pub use rule::{Dispatch, EventSink, PatternRule, RuleMatch, RuleSet};
pub use shuffle::{plan_team_shuffle, ShufflePlan, TeamAssignment};
pub use status::{decode_current_map, decode_next_map, decode_server_status};
