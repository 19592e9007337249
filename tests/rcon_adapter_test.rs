//! SquadRcon over a scripted transport

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use squad_rcon::adapter::{RconError, RconTransport, SquadRcon, TransportError};
use squad_rcon::core::command::FogOfWarMode;
use squad_rcon::core::DecodeError;
use squad_rcon::types::MapInfo;

/// Replies from a fixed table and records every command it is sent.
#[derive(Default)]
struct ScriptedTransport {
    replies: HashMap<String, String>,
    failing: HashSet<String>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn reply(mut self, command: &str, response: &str) -> Self {
        self.replies.insert(command.to_string(), response.to_string());
        self
    }

    fn fail(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl RconTransport for ScriptedTransport {
    async fn execute(&self, command: &str) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(command.to_string());
        if self.failing.contains(command) {
            return Err(TransportError::Failed(format!("rejected {command}")));
        }
        Ok(self.replies.get(command).cloned().unwrap_or_default())
    }
}

const ROSTER: &str = "----- Active Players -----
ID: 0 | Online IDs: EOS: e0 steam: s0 | Name: P0 | Team ID: 1 | Squad ID: N/A | Is Leader: False | Role: R
ID: 1 | Online IDs: EOS: e1 steam: s1 | Name: P1 | Team ID: 1 | Squad ID: N/A | Is Leader: False | Role: R
ID: 2 | Online IDs: EOS: e2 steam: s2 | Name: P2 | Team ID: 1 | Squad ID: N/A | Is Leader: False | Role: R
ID: 3 | Online IDs: EOS: e3 steam: s3 | Name: P3 | Team ID: 1 | Squad ID: N/A | Is Leader: False | Role: R
ID: 4 | Online IDs: EOS: e4 | Name: P4 | Team ID: N/A | Squad ID: N/A | Is Leader: False | Role: R
";

#[tokio::test]
async fn test_admin_commands_are_formatted_and_sent() {
    let rcon = SquadRcon::new(ScriptedTransport::default());

    rcon.broadcast("restart soon").await.unwrap();
    rcon.set_fog_of_war(FogOfWarMode::On).await.unwrap();
    rcon.warn("s1", "read the rules").await.unwrap();
    rcon.ban("76561198000000000", "7d", "cheating").await.unwrap();
    rcon.switch_team("e2").await.unwrap();
    rcon.kick("s3", "afk").await.unwrap();
    rcon.change_layer("Narva_RAAS_v1").await.unwrap();
    rcon.set_next_layer("Gorodok_AAS_v2").await.unwrap();
    rcon.end_match().await.unwrap();
    rcon.disband_squad(1, 4).await.unwrap();
    rcon.remove_player_from_squad(17).await.unwrap();
    rcon.rename_squad(2, 3).await.unwrap();

    assert_eq!(
        rcon.transport().sent(),
        vec![
            "AdminBroadcast restart soon",
            "AdminSetFogOfWar 1",
            r#"AdminWarn "s1" read the rules"#,
            r#"AdminBan "76561198000000000" 7d cheating"#,
            r#"AdminForceTeamChange "e2""#,
            r#"AdminKick "s3" afk"#,
            r#"AdminChangeLayer "Narva_RAAS_v1""#,
            r#"AdminSetNextLayer "Gorodok_AAS_v2""#,
            "AdminEndMatch",
            "AdminDisbandSquad 1 4",
            "AdminRemovePlayerFromSquadById 17",
            "AdminRenameSquad 2 3",
        ]
    );
}

#[tokio::test]
async fn test_queries_decode_responses() {
    let transport = ScriptedTransport::default()
        .reply("ListPlayers", ROSTER)
        .reply(
            "ListSquads",
            "Team ID: 2 (British Army)\nID: 1 | Name: ARMOR | Size: 2 | Locked: True | Creator Name: Dave | Creator Online IDs: steam: 222\n",
        )
        .reply("ShowCurrentMap", "Current level is Narva, layer is Narva_RAAS_v1")
        .reply("ShowNextMap", "Next level is Gorodok, layer is To be voted");
    let rcon = SquadRcon::new(transport);

    let players = rcon.get_player_roster().await.unwrap();
    assert_eq!(players.len(), 5);
    assert_eq!(players[4].team_id, None);

    let squads = rcon.get_squad_roster().await.unwrap();
    assert_eq!(squads[0].team_name.as_deref(), Some("British Army"));

    assert_eq!(
        rcon.get_current_map().await.unwrap().layer.as_deref(),
        Some("Narva_RAAS_v1")
    );
    assert_eq!(
        rcon.get_next_map().await.unwrap(),
        MapInfo {
            level: Some("Gorodok".to_string()),
            layer: None,
        }
    );
}

#[tokio::test]
async fn test_errors_are_propagated() {
    let rcon = SquadRcon::new(
        ScriptedTransport::default()
            .fail("ListPlayers")
            .reply("ShowServerInfo", r#"{"MaxPlayers":"lots"}"#),
    );

    assert!(matches!(
        rcon.get_player_roster().await,
        Err(RconError::Transport(TransportError::Failed(_)))
    ));
    assert!(matches!(
        rcon.get_server_status().await,
        Err(RconError::Decode(DecodeError::MalformedInteger {
            field: "MaxPlayers",
            ..
        }))
    ));
    assert!(matches!(
        rcon.get_current_map().await,
        Err(RconError::Decode(DecodeError::UnexpectedResponse { .. }))
    ));
}

#[tokio::test]
async fn test_shuffle_balances_and_reports_failures() {
    let transport = ScriptedTransport::default()
        .reply("ListPlayers", ROSTER)
        .fail(r#"AdminForceTeamChange "e4""#);
    let rcon = SquadRcon::new(Arc::new(transport));

    let report = rcon.shuffle_teams_seeded(42).await.unwrap();
    assert_eq!(report.assignments.len(), 5);

    let team_one = report.assignments.iter().filter(|a| a.target_team == 1).count();
    assert_eq!(team_one, 3);

    // P4 has no team, so it is always switched; its switch is rejected.
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].assignment.name, "P4");
    assert!(matches!(
        &report.failures[0].error,
        RconError::Transport(TransportError::Failed(msg)) if msg.contains("e4")
    ));
    assert!(!report.is_complete());

    let expected_switches = report.assignments.iter().filter(|a| a.needs_switch()).count();
    assert_eq!(report.switched.len() + report.failures.len(), expected_switches);

    let sent = rcon.transport().sent();
    assert_eq!(sent[0], "ListPlayers");
    assert_eq!(sent.len(), 1 + expected_switches);
    for a in &report.switched {
        assert!(sent.contains(&format!("AdminForceTeamChange \"{}\"", a.any_id)));
    }
}

#[tokio::test]
async fn test_shuffle_of_empty_roster_sends_nothing() {
    let rcon = SquadRcon::new(ScriptedTransport::default());
    let report = rcon.shuffle_teams().await.unwrap();
    assert!(report.assignments.is_empty());
    assert!(report.is_complete());
    assert_eq!(rcon.transport().sent(), vec!["ListPlayers"]);
}

#[tokio::test]
async fn test_seeded_shuffle_is_reproducible() {
    let first = SquadRcon::new(ScriptedTransport::default().reply("ListPlayers", ROSTER));
    let second = SquadRcon::new(ScriptedTransport::default().reply("ListPlayers", ROSTER));

    let a = first.shuffle_teams_seeded(7).await.unwrap();
    let b = second.shuffle_teams_seeded(7).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(first.transport().sent(), second.transport().sent());
}
