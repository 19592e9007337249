//! Status decoders - `ShowServerInfo`, `ShowCurrentMap`, `ShowNextMap`
//!
//! `ShowServerInfo` answers with one JSON object whose keys carry a type suffix
//! (`_s` string, `_I` integer, `_d` double). Numbers arrive either as JSON numbers or as
//! decimal strings depending on server version; both are accepted, but anything that is
//! not a clean base-10 value fails the whole response.

use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::{MapInfo, ServerStatusSummary, TO_BE_VOTED};

static CURRENT_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Current level is ([^,]*), layer is ([^,]*)").expect("current map pattern is valid")
});

static NEXT_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Next level is ([^,]*), layer is ([^,]*)").expect("next map pattern is valid")
});

/// Decode a `ShowServerInfo` response.
///
/// `now` anchors the derived match start time.
///
/// # Errors
///
/// Fails on invalid JSON, a non-object payload, or any missing/malformed numeric field.
pub fn decode_server_status(
    blob: &str,
    now: DateTime<Utc>,
) -> Result<ServerStatusSummary, DecodeError> {
    let value: Value =
        serde_json::from_str(blob).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    decode_server_status_value(value, now)
}

/// Decode an already-parsed `ShowServerInfo` payload.
///
/// # Errors
///
/// See [`decode_server_status`].
pub fn decode_server_status_value(
    value: Value,
    now: DateTime<Utc>,
) -> Result<ServerStatusSummary, DecodeError> {
    let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let current_layer = string_field(obj, "MapName_s");
    let match_start_time = match obj.get("PLAYTIME_I") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let seconds = integer_value::<i64>("PLAYTIME_I", v)?;
            Some(match_start_time(now, seconds).ok_or_else(|| DecodeError::OutOfRange {
                field: "PLAYTIME_I",
                value: seconds.to_string(),
            })?)
        }
    };

    Ok(ServerStatusSummary {
        server_name: string_field(obj, "ServerName_s"),
        max_players: integer_field(obj, "MaxPlayers")?,
        public_queue_limit: integer_field(obj, "PublicQueueLimit_I")?,
        reserve_slots: integer_field(obj, "PlayerReserveCount_I")?,
        player_count: integer_field(obj, "PlayerCount_I")?,
        public_queue_size: integer_field(obj, "PublicQueue_I")?,
        reserve_queue_size: integer_field(obj, "ReservedQueue_I")?,
        next_layer: string_field(obj, "NextLayer_s"),
        team_one_name: strip_map_name(&string_field(obj, "TeamOne_s"), &current_layer),
        team_two_name: strip_map_name(&string_field(obj, "TeamTwo_s"), &current_layer),
        match_timeout_seconds: float_field(obj, "MatchTimeout_d")?,
        match_start_time,
        game_version: string_field(obj, "GameVersion_s"),
        current_layer,
        raw: value,
    })
}

/// Match start derived from the server's playtime counter.
///
/// `None` when the subtraction leaves chrono's representable range.
pub fn match_start_time(now: DateTime<Utc>, playtime_seconds: i64) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(TimeDelta::try_seconds(playtime_seconds)?)
}

/// Remove the first case-insensitive occurrence of `map_name` from `team`.
///
/// The map name is matched literally. Team strings that do not contain it are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use squad_rcon_core::status::strip_map_name;
///
/// assert_eq!(strip_map_name("narva_raas_v1 USA", "Narva_RAAS_v1"), " USA");
/// assert_eq!(strip_map_name("USA", "Narva_RAAS_v1"), "USA");
/// assert_eq!(strip_map_name("a.b (x) 1", "a.b (x)"), " 1");
/// ```
pub fn strip_map_name(team: &str, map_name: &str) -> String {
    if map_name.is_empty() {
        return team.to_string();
    }
    match RegexBuilder::new(&regex::escape(map_name))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replacen(team, 1, "").into_owned(),
        Err(_) => team.to_string(),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn integer_field(obj: &Map<String, Value>, key: &'static str) -> Result<u32, DecodeError> {
    let value = obj.get(key).ok_or(DecodeError::MissingField(key))?;
    integer_value(key, value)
}

fn integer_value<T>(key: &'static str, value: &Value) -> Result<T, DecodeError>
where
    T: std::str::FromStr + TryFrom<i64> + TryFrom<u64>,
{
    let malformed = || DecodeError::MalformedInteger {
        field: key,
        value: value.to_string(),
    };
    match value {
        Value::String(s) => {
            let s = s.as_str();
            let digits = s.strip_prefix('-').unwrap_or(s);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            s.parse::<T>().map_err(|_| malformed())
        }
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                T::try_from(u).map_err(|_| malformed())
            } else if let Some(i) = n.as_i64() {
                T::try_from(i).map_err(|_| malformed())
            } else {
                Err(malformed())
            }
        }
        _ => Err(malformed()),
    }
}

fn float_field(obj: &Map<String, Value>, key: &'static str) -> Result<f64, DecodeError> {
    let value = obj.get(key).ok_or(DecodeError::MissingField(key))?;
    let malformed = || DecodeError::MalformedFloat {
        field: key,
        value: value.to_string(),
    };
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().map_err(|_| malformed())?,
        Value::Number(n) => n.as_f64().ok_or_else(malformed)?,
        _ => return Err(malformed()),
    };
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(malformed())
    }
}

/// Decode a `ShowCurrentMap` response.
///
/// # Errors
///
/// [`DecodeError::UnexpectedResponse`] when the response is not a current-map line.
pub fn decode_current_map(response: &str) -> Result<MapInfo, DecodeError> {
    let caps = CURRENT_MAP
        .captures(response)
        .ok_or_else(|| DecodeError::UnexpectedResponse {
            command: "ShowCurrentMap",
            response: response.to_string(),
        })?;
    Ok(MapInfo {
        level: Some(caps[1].to_string()),
        layer: Some(caps[2].to_string()),
    })
}

/// Decode a `ShowNextMap` response.
///
/// An empty level, a layer still `To be voted`, or an unrecognised response all decode
/// to absent fields rather than an error.
pub fn decode_next_map(response: &str) -> MapInfo {
    let Some(caps) = NEXT_MAP.captures(response) else {
        return MapInfo::default();
    };
    let level = &caps[1];
    let layer = &caps[2];
    MapInfo {
        level: (!level.is_empty()).then(|| level.to_string()),
        layer: (layer != TO_BE_VOTED).then(|| layer.to_string()),
    }
}
