//! Core types module - shared data structures and constants
//!
//! This module defines the data model produced by the console decoders and consumed by
//! callers of the adapter. All types are plain data with no parsing logic, making them
//! usable in any context (decoders, the async adapter, the CLI, tests).
//!
//! # Identity Fields
//!
//! Console text embeds a player's identifiers on several online platforms. They are held
//! in an [`IdentitySet`] and merged into flat records under one of two naming
//! conventions:
//!
//! | Convention | Platform | Key |
//! |------------|----------|-----|
//! | [`MergeConvention::Flat`] | `steam` | `steamid` |
//! | [`MergeConvention::Flat`] | `EOS` | `eosid` |
//! | `MergeConvention::Prefixed("player")` | `steam` | `playerSteamID` |
//! | `MergeConvention::Prefixed("creator")` | `eos` | `creatorEosID` |
//!
//! # Sentinels
//!
//! - `N/A` ([`NOT_AVAILABLE`]): team/squad not assigned, decoded as `None`
//! - `To be voted` ([`TO_BE_VOTED`]): next layer undecided, decoded as `None`
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use squad_rcon_types::{IdentitySet, MergeConvention};
//!
//! let mut ids = IdentitySet::new();
//! ids.insert("Steam", "76561198000000000");
//! ids.insert("eos", "0002abcd");
//!
//! let mut fields = BTreeMap::new();
//! ids.merge_into(&mut fields, MergeConvention::Prefixed("creator"));
//! assert_eq!(fields["creatorSteamID"], "76561198000000000");
//! assert_eq!(fields["creatorEosID"], "0002abcd");
//!
//! assert_eq!(ids.to_string(), "eos:0002abcd steam:76561198000000000");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel the console prints for an unassigned team or squad.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel the console prints when the next layer will be decided by vote.
pub const TO_BE_VOTED: &str = "To be voted";

/// Team id the shuffle assigns first.
pub const TEAM_ONE: u32 = 1;

/// The other playable team.
pub const TEAM_TWO: u32 = 2;

// ============== Identities ==============

/// Naming convention used when merging identities into a flat field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeConvention<'a> {
    /// `<platform lower>id`, used for the acting subject of an event.
    Flat,
    /// `<prefix><Platform>ID`, used for a secondary actor (squad creator, etc).
    Prefixed(&'a str),
}

impl MergeConvention<'_> {
    /// Field name for `platform` under this convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use squad_rcon_types::MergeConvention;
    ///
    /// assert_eq!(MergeConvention::Flat.key("Steam"), "steamid");
    /// assert_eq!(MergeConvention::Prefixed("player").key("eos"), "playerEosID");
    /// ```
    pub fn key(&self, platform: &str) -> String {
        match self {
            MergeConvention::Flat => format!("{}id", platform.to_lowercase()),
            MergeConvention::Prefixed(prefix) => {
                format!("{prefix}{}ID", capitalize(platform))
            }
        }
    }
}

fn capitalize(platform: &str) -> String {
    let lower = platform.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Platform name to identifier mapping for one player.
///
/// Platform names are stored lower-cased. Inserting a platform that is already present
/// keeps the first identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentitySet(BTreeMap<String, String>);

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identifier. Returns `false` when the platform was already present.
    pub fn insert(&mut self, platform: &str, id: &str) -> bool {
        let key = platform.to_lowercase();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, id.to_string());
        true
    }

    /// Look up an identifier by platform name (case-insensitive).
    pub fn get(&self, platform: &str) -> Option<&str> {
        self.0.get(&platform.to_lowercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(platform, id)` pairs in platform order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, id)| (p.as_str(), id.as_str()))
    }

    /// Best identifier for addressing the player in an admin command.
    ///
    /// Prefers steam, then eos, then whatever platform sorts first.
    pub fn preferred(&self) -> Option<&str> {
        self.get("steam")
            .or_else(|| self.get("eos"))
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    /// Merge every identifier into `fields` using `convention` for the key names.
    pub fn merge_into(&self, fields: &mut BTreeMap<String, String>, convention: MergeConvention<'_>) {
        for (platform, id) in &self.0 {
            fields.insert(convention.key(platform), id.clone());
        }
    }

    /// Merged view as a new map.
    pub fn merged(&self, convention: MergeConvention<'_>) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        self.merge_into(&mut out, convention);
        out
    }
}

impl fmt::Display for IdentitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (platform, id) in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{platform}:{id}")?;
            first = false;
        }
        Ok(())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for IdentitySet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut set = IdentitySet::new();
        for (platform, id) in iter {
            set.insert(platform, id);
        }
        set
    }
}

// ============== Events ==============

/// Discriminator for emitted events.
///
/// Console broadcast kinds are fixed; log-derived kinds beyond the two reference rules
/// travel as [`EventKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    ChatMessage,
    PossessedAdminCamera,
    UnpossessedAdminCamera,
    PlayerWarned,
    PlayerKicked,
    PlayerBanned,
    SquadCreated,
    FragDetonates,
    LatHitVehicle,
    Other(String),
}

impl EventKind {
    /// Wire name of the kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use squad_rcon_types::EventKind;
    ///
    /// assert_eq!(EventKind::ChatMessage.as_str(), "CHAT_MESSAGE");
    /// assert_eq!(EventKind::FragDetonates.as_str(), "FRAG-DETONATES");
    /// ```
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::ChatMessage => "CHAT_MESSAGE",
            EventKind::PossessedAdminCamera => "POSSESSED_ADMIN_CAMERA",
            EventKind::UnpossessedAdminCamera => "UNPOSSESSED_ADMIN_CAMERA",
            EventKind::PlayerWarned => "PLAYER_WARNED",
            EventKind::PlayerKicked => "PLAYER_KICKED",
            EventKind::PlayerBanned => "PLAYER_BANNED",
            EventKind::SquadCreated => "SQUAD_CREATED",
            EventKind::FragDetonates => "FRAG-DETONATES",
            EventKind::LatHitVehicle => "LAT-HIT-VEHICLE",
            EventKind::Other(name) => name,
        }
    }

    /// Parse a wire name. Unknown names become [`EventKind::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "CHAT_MESSAGE" => EventKind::ChatMessage,
            "POSSESSED_ADMIN_CAMERA" => EventKind::PossessedAdminCamera,
            "UNPOSSESSED_ADMIN_CAMERA" => EventKind::UnpossessedAdminCamera,
            "PLAYER_WARNED" => EventKind::PlayerWarned,
            "PLAYER_KICKED" => EventKind::PlayerKicked,
            "PLAYER_BANNED" => EventKind::PlayerBanned,
            "SQUAD_CREATED" => EventKind::SquadCreated,
            "FRAG-DETONATES" => EventKind::FragDetonates,
            "LAT-HIT-VEHICLE" => EventKind::LatHitVehicle,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EventKind::from_name(&s))
    }
}

/// A structured event decoded from one console or log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    /// Full source line.
    pub raw: String,
    /// Assigned when the line was parsed.
    pub time: DateTime<Utc>,
    /// In-game clock copied verbatim from the line, when it carries one.
    #[serde(default, rename = "gameTime", skip_serializing_if = "Option::is_none")]
    pub game_time: Option<String>,
    #[serde(default, rename = "chainID", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Kind-specific fields plus merged identity fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Event {
    pub fn new(kind: EventKind, raw: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            time,
            game_time: None,
            chain_id: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_identities(mut self, ids: &IdentitySet, convention: MergeConvention<'_>) -> Self {
        ids.merge_into(&mut self.fields, convention);
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

// ============== Records ==============

/// One row of the `ListPlayers` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "playerID")]
    pub player_id: u32,
    pub name: String,
    #[serde(rename = "teamID")]
    pub team_id: Option<u32>,
    #[serde(rename = "squadID")]
    pub squad_id: Option<u32>,
    #[serde(rename = "isLeader")]
    pub is_leader: bool,
    pub role: String,
    pub ids: IdentitySet,
}

impl PlayerRecord {
    /// Identity fields merged flat (`steamid`, `eosid`, ...).
    pub fn identity_fields(&self) -> BTreeMap<String, String> {
        self.ids.merged(MergeConvention::Flat)
    }

    /// Argument for commands taking "any id": a platform id, else the session player id.
    pub fn any_id(&self) -> String {
        match self.ids.preferred() {
            Some(id) => id.to_string(),
            None => self.player_id.to_string(),
        }
    }
}

/// One squad row of the `ListSquads` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadRecord {
    #[serde(rename = "squadID")]
    pub squad_id: u32,
    #[serde(rename = "squadName")]
    pub squad_name: String,
    pub size: u32,
    pub locked: bool,
    #[serde(rename = "creatorName")]
    pub creator_name: String,
    /// From the most recent team header; `None` before any header.
    #[serde(rename = "teamID")]
    pub team_id: Option<u32>,
    #[serde(rename = "teamName")]
    pub team_name: Option<String>,
    #[serde(rename = "creatorIds")]
    pub creator_ids: IdentitySet,
}

impl SquadRecord {
    /// Creator identities merged with the `creator` prefix (`creatorSteamID`, ...).
    pub fn creator_fields(&self) -> BTreeMap<String, String> {
        self.creator_ids.merged(MergeConvention::Prefixed("creator"))
    }
}

/// Decoded `ShowServerInfo` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatusSummary {
    #[serde(rename = "serverName")]
    pub server_name: String,
    #[serde(rename = "maxPlayers")]
    pub max_players: u32,
    #[serde(rename = "publicQueueLimit")]
    pub public_queue_limit: u32,
    #[serde(rename = "reserveSlots")]
    pub reserve_slots: u32,
    #[serde(rename = "playerCount")]
    pub player_count: u32,
    #[serde(rename = "publicQueueSize")]
    pub public_queue_size: u32,
    #[serde(rename = "reserveQueueSize")]
    pub reserve_queue_size: u32,
    #[serde(rename = "currentLayer")]
    pub current_layer: String,
    #[serde(rename = "nextLayer")]
    pub next_layer: String,
    #[serde(rename = "teamOneName")]
    pub team_one_name: String,
    #[serde(rename = "teamTwoName")]
    pub team_two_name: String,
    #[serde(rename = "matchTimeoutSeconds")]
    pub match_timeout_seconds: f64,
    #[serde(rename = "matchStartTime")]
    pub match_start_time: Option<DateTime<Utc>>,
    #[serde(rename = "gameVersion")]
    pub game_version: String,
    /// The undecoded response, kept for fields this summary does not model.
    pub raw: serde_json::Value,
}

/// Result of `ShowCurrentMap` / `ShowNextMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInfo {
    pub level: Option<String>,
    pub layer: Option<String>,
}

/// One layer descriptor from the map-layer catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(rename = "layerid", alias = "rawName")]
    pub layer_id: String,
    #[serde(alias = "levelId")]
    pub classname: String,
    #[serde(
        default,
        rename = "levelName",
        alias = "mapName",
        skip_serializing_if = "Option::is_none"
    )]
    pub level_name: Option<String>,
    #[serde(
        default,
        rename = "gamemode",
        alias = "gameMode",
        skip_serializing_if = "Option::is_none"
    )]
    pub game_mode: Option<String>,
    /// Catalog keys not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
