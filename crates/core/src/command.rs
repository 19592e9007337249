//! Command formatter - typed parameters to console command lines
//!
//! The console reads one command per line. Identifiers and layer names are wrapped in
//! double quotes; numeric and enum arguments are bare; a trailing free-text message is
//! taken verbatim up to the end of the line.
//!
//! | Function | Output |
//! |----------|--------|
//! | [`broadcast`] | `AdminBroadcast <message>` |
//! | [`set_fog_of_war`] | `AdminSetFogOfWar <0\|1>` |
//! | [`warn`] | `AdminWarn "<id>" <message>` |
//! | [`ban`] | `AdminBan "<id>" <interval> <message>` |
//! | [`switch_team`] | `AdminForceTeamChange "<id>"` |
//! | [`kick`] | `AdminKick "<id>" <message>` |
//! | [`change_layer`] | `AdminChangeLayer "<layer>"` |
//! | [`set_next_layer`] | `AdminSetNextLayer "<layer>"` |
//! | [`end_match`] | `AdminEndMatch` |
//! | [`disband_squad`] | `AdminDisbandSquad <team> <squad>` |
//! | [`remove_player_from_squad`] | `AdminRemovePlayerFromSquadById <player>` |
//! | [`rename_squad`] | `AdminRenameSquad <team> <squad>` |
//!
//! No game-level validation happens here (layer names, interval syntax); the only
//! guarantee is one well-formed line per call. Embedded double quotes are dropped from
//! quoted arguments and line breaks become spaces.

use std::fmt;

pub const LIST_PLAYERS: &str = "ListPlayers";
pub const LIST_SQUADS: &str = "ListSquads";
pub const SHOW_SERVER_INFO: &str = "ShowServerInfo";
pub const SHOW_CURRENT_MAP: &str = "ShowCurrentMap";
pub const SHOW_NEXT_MAP: &str = "ShowNextMap";

/// Fog-of-war setting accepted by `AdminSetFogOfWar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FogOfWarMode {
    Off,
    On,
}

impl FogOfWarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FogOfWarMode::Off => "0",
            FogOfWarMode::On => "1",
        }
    }
}

impl From<bool> for FogOfWarMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            FogOfWarMode::On
        } else {
            FogOfWarMode::Off
        }
    }
}

impl fmt::Display for FogOfWarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", single_line(text).replace('"', ""))
}

/// Join non-empty parts with single spaces.
fn line<const N: usize>(parts: [&str; N]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn broadcast(message: &str) -> String {
    line(["AdminBroadcast", &single_line(message)])
}

pub fn set_fog_of_war(mode: FogOfWarMode) -> String {
    line(["AdminSetFogOfWar", mode.as_str()])
}

pub fn warn(any_id: &str, message: &str) -> String {
    line(["AdminWarn", &quoted(any_id), &single_line(message)])
}

/// `ban_length` follows the console's interval syntax: `0` permanent, `1m` one minute,
/// `1d` one day, `1M` one month.
///
/// # Examples
///
/// ```
/// use squad_rcon_core::command::ban;
///
/// assert_eq!(
///     ban("76561198000000000", "7d", "cheating"),
///     r#"AdminBan "76561198000000000" 7d cheating"#
/// );
/// ```
pub fn ban(any_id: &str, ban_length: &str, message: &str) -> String {
    line([
        "AdminBan",
        &quoted(any_id),
        &single_line(ban_length),
        &single_line(message),
    ])
}

pub fn switch_team(any_id: &str) -> String {
    line(["AdminForceTeamChange", &quoted(any_id)])
}

pub fn kick(any_id: &str, message: &str) -> String {
    line(["AdminKick", &quoted(any_id), &single_line(message)])
}

pub fn change_layer(layer: &str) -> String {
    line(["AdminChangeLayer", &quoted(layer)])
}

pub fn set_next_layer(layer: &str) -> String {
    line(["AdminSetNextLayer", &quoted(layer)])
}

pub fn end_match() -> String {
    "AdminEndMatch".to_string()
}

pub fn disband_squad(team_id: u32, squad_id: u32) -> String {
    format!("AdminDisbandSquad {team_id} {squad_id}")
}

pub fn remove_player_from_squad(player_id: u32) -> String {
    format!("AdminRemovePlayerFromSquadById {player_id}")
}

/// Resets the squad's name to the default.
pub fn rename_squad(team_id: u32, squad_id: u32) -> String {
    format!("AdminRenameSquad {team_id} {squad_id}")
}
