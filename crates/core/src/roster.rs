//! List response decoders - `ListPlayers` and `ListSquads`
//!
//! Both responses are blocks of lines where each interesting line matches a fixed
//! pattern. Anything else (section banners, blank lines, truncated rows) is dropped.
//!
//! ```text
//! ----- Active Players -----
//! ID: 3 | Online IDs: EOS: 0002aa steam: 111 | Name: Carl | Team ID: 1 | Squad ID: N/A | Is Leader: False | Role: Rifleman
//!
//! ----- Active Squads -----
//! Team ID: 2 (British Army)
//! ID: 1 | Name: ARMOR | Size: 2 | Locked: True | Creator Name: Dave | Creator Online IDs: steam: 222
//! ```
//!
//! `ListSquads` only names the team on a header line, so [`SquadRosterDecoder`] carries
//! the last header it saw onto every squad row that follows. That state lives in the
//! decoder value, which is created fresh for each response.

use std::sync::LazyLock;

use regex::Regex;

use crate::identity::parse_identities;
use crate::types::{PlayerRecord, SquadRecord, NOT_AVAILABLE};

static PLAYER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ID: (?P<playerID>\d+) \| Online IDs:(?P<ids>[^|]+)\| Name: (?P<name>.+) \| Team ID: (?P<teamID>\d|N/A) \| Squad ID: (?P<squadID>\d+|N/A) \| Is Leader: (?P<isLeader>True|False) \| Role: (?P<role>.+)$",
    )
    .expect("player line pattern is valid")
});

static SQUAD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"ID: (?P<squadID>\d+) \| Name: (?P<squadName>.+) \| Size: (?P<size>\d+) \| Locked: (?P<locked>True|False) \| Creator Name: (?P<creatorName>.+) \| Creator Online IDs:(?P<ids>[^|]+)",
    )
    .expect("squad line pattern is valid")
});

static TEAM_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Team ID: (\d) \((.+)\)").expect("team header pattern is valid"));

/// Decodes one line at a time, possibly carrying state between lines.
pub trait LineDecoder {
    type Record;

    /// Decode `line`. `None` for lines that carry no record.
    fn decode_line(&mut self, line: &str) -> Option<Self::Record>;
}

/// Run `decoder` over every line of `text`, keeping records in input order.
pub fn decode_lines<D: LineDecoder>(text: &str, mut decoder: D) -> Vec<D::Record> {
    text.lines()
        .filter_map(|line| decoder.decode_line(line.trim_end_matches('\r')))
        .collect()
}

/// `N/A` → `Some(None)`, digits → `Some(Some(n))`, overflow → `None`.
fn optional_number(text: &str) -> Option<Option<u32>> {
    if text == NOT_AVAILABLE {
        return Some(None);
    }
    text.parse::<u32>().ok().map(Some)
}

fn boolean(text: &str) -> bool {
    text == "True"
}

/// Decoder for `ListPlayers` rows. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerRosterDecoder;

impl LineDecoder for PlayerRosterDecoder {
    type Record = PlayerRecord;

    fn decode_line(&mut self, line: &str) -> Option<PlayerRecord> {
        let Some(caps) = PLAYER_LINE.captures(line) else {
            tracing::trace!(line, "skipping non-player line");
            return None;
        };

        let (Ok(player_id), Some(team_id), Some(squad_id)) = (
            caps["playerID"].parse::<u32>(),
            optional_number(&caps["teamID"]),
            optional_number(&caps["squadID"]),
        ) else {
            tracing::trace!(line, "dropping player line with out-of-range id");
            return None;
        };

        Some(PlayerRecord {
            player_id,
            name: caps["name"].to_string(),
            team_id,
            squad_id,
            is_leader: boolean(&caps["isLeader"]),
            role: caps["role"].to_string(),
            ids: parse_identities(&caps["ids"]),
        })
    }
}

/// Team header most recently seen in a `ListSquads` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamHeader {
    pub id: u32,
    pub name: String,
}

/// Decoder for `ListSquads` rows, carrying the current team header.
#[derive(Debug, Clone, Default)]
pub struct SquadRosterDecoder {
    team: Option<TeamHeader>,
}

impl SquadRosterDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_team(&self) -> Option<&TeamHeader> {
        self.team.as_ref()
    }
}

impl LineDecoder for SquadRosterDecoder {
    type Record = SquadRecord;

    fn decode_line(&mut self, line: &str) -> Option<SquadRecord> {
        if let Some(caps) = TEAM_HEADER.captures(line) {
            if let Ok(id) = caps[1].parse::<u32>() {
                self.team = Some(TeamHeader {
                    id,
                    name: caps[2].to_string(),
                });
            }
        }

        let Some(caps) = SQUAD_LINE.captures(line) else {
            tracing::trace!(line, "no squad row on line");
            return None;
        };

        let (Ok(squad_id), Ok(size)) = (caps["squadID"].parse::<u32>(), caps["size"].parse::<u32>())
        else {
            tracing::trace!(line, "dropping squad line with out-of-range number");
            return None;
        };

        Some(SquadRecord {
            squad_id,
            squad_name: caps["squadName"].to_string(),
            size,
            locked: boolean(&caps["locked"]),
            creator_name: caps["creatorName"].to_string(),
            team_id: self.team.as_ref().map(|t| t.id),
            team_name: self.team.as_ref().map(|t| t.name.clone()),
            creator_ids: parse_identities(&caps["ids"]),
        })
    }
}

/// Decode a `ListPlayers` response. Empty input yields an empty roster.
pub fn decode_player_roster(text: &str) -> Vec<PlayerRecord> {
    decode_lines(text, PlayerRosterDecoder)
}

/// Decode a `ListSquads` response. Empty input yields an empty roster.
pub fn decode_squad_roster(text: &str) -> Vec<SquadRecord> {
    decode_lines(text, SquadRosterDecoder::new())
}
