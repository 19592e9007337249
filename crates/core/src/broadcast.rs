//! Broadcast classifier - unsolicited console lines to events
//!
//! The server pushes chat, admin-camera, warn, kick, ban and squad-creation notices
//! over the console connection without being asked. [`BroadcastClassifier`] runs the
//! reference rule set over each such line and yields at most one [`Event`].
//!
//! # Rules (in dispatch order)
//!
//! | Rule | Kind | Identity merge |
//! |------|------|----------------|
//! | `chat` | `CHAT_MESSAGE` | flat |
//! | `admin-camera-possessed` | `POSSESSED_ADMIN_CAMERA` | flat |
//! | `admin-camera-unpossessed` | `UNPOSSESSED_ADMIN_CAMERA` | flat |
//! | `player-warned` | `PLAYER_WARNED` | none |
//! | `player-kicked` | `PLAYER_KICKED` | flat |
//! | `squad-created` | `SQUAD_CREATED` | prefixed `player` |
//! | `player-banned` | `PLAYER_BANNED` | flat |
//!
//! The server is inconsistent about `Online IDs` / `Online Ids` casing between
//! messages; each pattern matches its own message's casing exactly.

use chrono::{DateTime, Utc};

use crate::identity::parse_identities;
use crate::rule::{EventSink, PatternRule, RuleHandler, RuleMatch, RuleSet};
use crate::types::{Event, EventKind, MergeConvention};

const CHAT: &str =
    r"\[(ChatAll|ChatTeam|ChatSquad|ChatAdmin)\] \[Online IDs:([^\]]+)\] (.+?) : (.*)";
const POSSESSED_ADMIN_CAMERA: &str = r"\[Online Ids:([^\]]+)\] (.+) has possessed admin camera\.";
const UNPOSSESSED_ADMIN_CAMERA: &str =
    r"\[Online IDs:([^\]]+)\] (.+) has unpossessed admin camera\.";
const PLAYER_WARNED: &str = r#"Remote admin has warned player (.*)\. Message was "(.*)""#;
const PLAYER_KICKED: &str = r"Kicked player ([0-9]+)\. \[Online IDs=([^\]]+)\] (.*)";
const SQUAD_CREATED: &str = r"(?P<playerName>.+) \(Online IDs:([^)]+)\) has created Squad (?P<squadID>\d+) \(Squad Name: (?P<squadName>.+)\) on (?P<teamName>.+)";
const PLAYER_BANNED: &str =
    r"Banned player ([0-9]+)\. \[Online IDs=([^\]]+)\] (.*) for interval (.*)";

fn on_chat(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        m.event()
            .with_field("chat", m.text(1))
            .with_field("name", m.text(3))
            .with_field("message", m.text(4))
            .with_identities(&parse_identities(m.text(2)), MergeConvention::Flat),
    );
}

fn on_admin_camera(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        m.event()
            .with_field("name", m.text(2))
            .with_identities(&parse_identities(m.text(1)), MergeConvention::Flat),
    );
}

fn on_warned(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        m.event()
            .with_field("name", m.text(1))
            .with_field("reason", m.text(2)),
    );
}

fn on_kicked(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        m.event()
            .with_field("playerID", m.text(1))
            .with_field("name", m.text(3))
            .with_identities(&parse_identities(m.text(2)), MergeConvention::Flat),
    );
}

fn on_squad_created(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    let mut ev = m.event();
    for group in ["playerName", "squadID", "squadName", "teamName"] {
        if let Some(value) = m.name(group) {
            ev.fields.insert(group.to_string(), value.to_string());
        }
    }
    sink.emit(ev.with_identities(
        &parse_identities(m.text(2)),
        MergeConvention::Prefixed("player"),
    ));
}

fn on_banned(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        m.event()
            .with_field("playerID", m.text(1))
            .with_field("name", m.text(3))
            .with_field("interval", m.text(4))
            .with_identities(&parse_identities(m.text(2)), MergeConvention::Flat),
    );
}

fn reference_rule(name: &str, kind: EventKind, pattern: &str, handler: RuleHandler) -> PatternRule {
    PatternRule::new(name, kind, pattern, handler).expect("broadcast pattern is valid")
}

/// The reference broadcast rules, in dispatch order.
pub fn broadcast_rules() -> RuleSet {
    RuleSet::new()
        .with(reference_rule("chat", EventKind::ChatMessage, CHAT, on_chat))
        .with(reference_rule(
            "admin-camera-possessed",
            EventKind::PossessedAdminCamera,
            POSSESSED_ADMIN_CAMERA,
            on_admin_camera,
        ))
        .with(reference_rule(
            "admin-camera-unpossessed",
            EventKind::UnpossessedAdminCamera,
            UNPOSSESSED_ADMIN_CAMERA,
            on_admin_camera,
        ))
        .with(reference_rule("player-warned", EventKind::PlayerWarned, PLAYER_WARNED, on_warned))
        .with(reference_rule("player-kicked", EventKind::PlayerKicked, PLAYER_KICKED, on_kicked))
        .with(reference_rule(
            "squad-created",
            EventKind::SquadCreated,
            SQUAD_CREATED,
            on_squad_created,
        ))
        .with(reference_rule("player-banned", EventKind::PlayerBanned, PLAYER_BANNED, on_banned))
}

/// Classifies unsolicited console lines. Immutable after construction.
#[derive(Debug, Clone)]
pub struct BroadcastClassifier {
    rules: RuleSet,
}

impl Default for BroadcastClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastClassifier {
    /// Classifier over [`broadcast_rules`].
    pub fn new() -> Self {
        Self::with_rules(broadcast_rules())
    }

    /// Classifier over a caller-supplied rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Classify one line. `None` means no rule matched, which is not an error.
    pub fn classify(&self, line: &str) -> Option<Event> {
        self.classify_at(line, Utc::now())
    }

    pub fn classify_at(&self, line: &str, time: DateTime<Utc>) -> Option<Event> {
        let mut sink: Option<Event> = None;
        self.rules.dispatch_at(line, None, time, &mut sink);
        sink
    }
}
