//! Broadcast classification through the facade crate

use chrono::{DateTime, Utc};

use squad_rcon::core::{broadcast_rules, log_rules, BroadcastClassifier, Dispatch, RuleSet};
use squad_rcon::types::{Event, EventKind};

fn at() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
}

fn classify(line: &str) -> Event {
    BroadcastClassifier::new()
        .classify_at(line, at())
        .unwrap_or_else(|| panic!("no event for {line:?}"))
}

#[test]
fn test_chat_message() {
    let line = "[ChatAll] [Online IDs:EOS: 0002aa steam: 76561198000000001] Alice : gg all";
    let ev = classify(line);
    assert_eq!(ev.kind, EventKind::ChatMessage);
    assert_eq!(ev.raw, line);
    assert_eq!(ev.time, at());
    assert_eq!(ev.field("chat"), Some("ChatAll"));
    assert_eq!(ev.field("name"), Some("Alice"));
    assert_eq!(ev.field("message"), Some("gg all"));
    assert_eq!(ev.field("eosid"), Some("0002aa"));
    assert_eq!(ev.field("steamid"), Some("76561198000000001"));
}

#[test]
fn test_admin_camera_casing_is_per_rule() {
    let ev = classify("[Online Ids:steam: 1] Bob has possessed admin camera.");
    assert_eq!(ev.kind, EventKind::PossessedAdminCamera);
    assert_eq!(ev.field("name"), Some("Bob"));
    assert_eq!(ev.field("steamid"), Some("1"));

    let ev = classify("[Online IDs:steam: 1] Bob has unpossessed admin camera.");
    assert_eq!(ev.kind, EventKind::UnpossessedAdminCamera);

    let classifier = BroadcastClassifier::new();
    assert!(classifier
        .classify("[Online IDs:steam: 1] Bob has possessed admin camera.")
        .is_none());
}

#[test]
fn test_warn_kick_ban() {
    let ev = classify(r#"Remote admin has warned player Carl. Message was "no teamkilling""#);
    assert_eq!(ev.kind, EventKind::PlayerWarned);
    assert_eq!(ev.field("name"), Some("Carl"));
    assert_eq!(ev.field("reason"), Some("no teamkilling"));

    let ev = classify("Kicked player 7. [Online IDs=eos:ab12] Bob");
    assert_eq!(ev.kind, EventKind::PlayerKicked);
    assert_eq!(ev.field("playerID"), Some("7"));
    assert_eq!(ev.field("name"), Some("Bob"));
    assert_eq!(ev.field("eosid"), Some("ab12"));

    let ev = classify("Banned player 12. [Online IDs=steam:765] Dave for interval 7d");
    assert_eq!(ev.kind, EventKind::PlayerBanned);
    assert_eq!(ev.field("playerID"), Some("12"));
    assert_eq!(ev.field("name"), Some("Dave"));
    assert_eq!(ev.field("interval"), Some("7d"));
    assert_eq!(ev.field("steamid"), Some("765"));
}

#[test]
fn test_squad_created_uses_prefixed_ids() {
    let ev = classify(
        "Eve (Online IDs: EOS: e1 steam: 42) has created Squad 3 (Squad Name: ARMOR) on British Army",
    );
    assert_eq!(ev.kind, EventKind::SquadCreated);
    assert_eq!(ev.field("playerName"), Some("Eve"));
    assert_eq!(ev.field("squadID"), Some("3"));
    assert_eq!(ev.field("squadName"), Some("ARMOR"));
    assert_eq!(ev.field("teamName"), Some("British Army"));
    assert_eq!(ev.field("playerEosID"), Some("e1"));
    assert_eq!(ev.field("playerSteamID"), Some("42"));
    assert_eq!(ev.field("steamid"), None);
}

#[test]
fn test_unrecognised_lines_yield_nothing() {
    let classifier = BroadcastClassifier::new();
    for line in ["", "hello", "Kicked player x. [Online IDs=eos:1] Bob"] {
        assert!(classifier.classify(line).is_none(), "{line:?}");
    }
}

#[test]
fn test_event_serializes_flat() {
    let ev = classify("Kicked player 7. [Online IDs=eos:ab12] Bob");
    let v = serde_json::to_value(&ev).unwrap();
    assert_eq!(v["kind"], "PLAYER_KICKED");
    assert_eq!(v["playerID"], "7");
    assert_eq!(v["eosid"], "ab12");
    assert_eq!(v["raw"], "Kicked player 7. [Online IDs=eos:ab12] Bob");
    assert!(v.get("chainID").is_none());

    let back: Event = serde_json::from_value(v).unwrap();
    assert_eq!(back, ev);
}

#[test]
fn test_combined_rules_dispatch_log_lines() {
    let mut rules: RuleSet = broadcast_rules();
    let broadcast_count = rules.len();
    rules.extend(log_rules());

    let line = "[2024.01.02-10.11.12:123][ 42]LogSquadTrace: [DedicatedServer]ASQProjectile::ApplyExplosiveDamage(): HitActor=BP_Soldier_RU_C_2147 DamageCauser=BP_Frag_RGD5_C_2147000 DamageInstigator=BP_PlayerController_C_2147001 ExplosionLocation=V(X=1.00, Y=2.00, Z=3.00)";
    let mut sink = Vec::new();
    let outcome = rules.dispatch(line, None, &mut sink);
    assert_eq!(
        outcome,
        Dispatch::Matched {
            rule: "frag-detonates",
            index: broadcast_count
        }
    );
    assert_eq!(sink[0].kind, EventKind::FragDetonates);
    assert_eq!(sink[0].chain_id, Some(42));

    let classifier = BroadcastClassifier::with_rules(rules);
    assert_eq!(classifier.classify(line).unwrap().field("fragtype"), Some("Frag_RGD5"));
}
