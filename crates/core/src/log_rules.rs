//! Log rules - pattern rules over timestamp-prefixed server log lines
//!
//! Squad writes trace lines shaped like
//!
//! ```text
//! [2024.01.02-10.11.12:123][ 42]LogSquadTrace: [DedicatedServer]...
//!  ^ in-game clock           ^ chain id
//! ```
//!
//! The chain id ties together the several lines the engine prints for one event. These
//! rules are handed to the external log dispatcher through [`log_rules`]; the dispatcher
//! owns file tailing and buffering.

use crate::rule::{EventSink, PatternRule, RuleHandler, RuleMatch, RuleSet};
use crate::types::{Event, EventKind};

const FRAG_DETONATES: &str = r"^\[([0-9.:-]+)\]\[([ 0-9]*)\]LogSquadTrace: \[DedicatedServer\]ASQProjectile::ApplyExplosiveDamage\(\): HitActor=([^ ]+) DamageCauser=BP_([A-Za-z0-9_]+)_C_(\d+) DamageInstigator=([^ ]+) ExplosionLocation=V\(X=([-+]?\d+\.\d+), Y=([-+]?\d+\.\d+), Z=([-+]?\d+\.\d+)\)";

const LAT_HIT_VEHICLE: &str = r"^\[([0-9.:-]+)\]\[([ 0-9]*)\]LogSquadTrace: \[DedicatedServer\]ASQVehicleSeat::TraceAndMessageClient\(\): (.+): ([0-9. ]+) damage taken by causer ([^ ]+) instigator \(Online Ids: (.+?)\) EOS: ([0-9a-f]{32}) steam: (\d{17}) health remaining ([0-9.]+)";

/// Event with the in-game clock and chain id copied from groups 1 and 2.
///
/// The chain id printed on the line wins; the dispatcher's running id is the fallback
/// for lines whose chain column is blank.
fn log_event(m: &RuleMatch<'_>) -> Event {
    let mut ev = m.event();
    ev.game_time = m.get(1).map(str::to_string);
    ev.chain_id = m
        .get(2)
        .and_then(|c| c.trim().parse::<u64>().ok())
        .or(m.chain_id());
    ev
}

fn on_frag_detonates(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        log_event(m)
            .with_field("hitactor", m.text(3))
            .with_field("fragtype", m.text(4))
            .with_field("playercontroller", m.text(6))
            .with_field("x", m.text(7))
            .with_field("y", m.text(8))
            .with_field("z", m.text(9)),
    );
}

fn on_lat_hit_vehicle(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
    sink.emit(
        log_event(m)
            .with_field("victim_obj", m.text(3))
            .with_field("damage", m.text(4).trim())
            .with_field("weapon", m.text(5))
            .with_field("player_name", m.text(6))
            .with_field("player_eosid", m.text(7))
            .with_field("player_steamid", m.text(8))
            .with_field("health", m.text(9)),
    );
}

fn log_rule(name: &str, kind: EventKind, pattern: &str, handler: RuleHandler) -> PatternRule {
    PatternRule::new(name, kind, pattern, handler).expect("log pattern is valid")
}

/// Reference log rules, in dispatch order.
pub fn log_rules() -> RuleSet {
    RuleSet::new()
        .with(log_rule(
            "frag-detonates",
            EventKind::FragDetonates,
            FRAG_DETONATES,
            on_frag_detonates,
        ))
        .with(log_rule(
            "lat-hit-vehicle",
            EventKind::LatHitVehicle,
            LAT_HIT_VEHICLE,
            on_lat_hit_vehicle,
        ))
}
