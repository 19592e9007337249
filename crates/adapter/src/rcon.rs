//! Squad console facade
//!
//! [`SquadRcon`] pairs a transport with the core decoders and formatters: queries go out
//! as command strings, responses come back as typed records. Transport failures and
//! decode failures are propagated as [`RconError`] without retrying.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::core::command::{self, FogOfWarMode};
use crate::core::shuffle::{plan_team_shuffle, ShufflePlan, TeamAssignment};
use crate::core::status::{decode_current_map, decode_next_map, decode_server_status};
use crate::core::{decode_player_roster, decode_squad_roster, DecodeError};
use crate::transport::{RconTransport, TransportError};
use crate::types::{MapInfo, PlayerRecord, ServerStatusSummary, SquadRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RconError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A switch that the console rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchFailure {
    pub assignment: TeamAssignment,
    pub error: RconError,
}

/// Aggregate outcome of [`SquadRcon::shuffle_teams`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleReport {
    /// Every player, in dealt order, with the team they were dealt.
    pub assignments: Vec<TeamAssignment>,
    /// Switches the console accepted.
    pub switched: Vec<TeamAssignment>,
    /// Switches the console rejected; the rest of the batch still ran.
    pub failures: Vec<SwitchFailure>,
}

impl ShuffleReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Typed view of the admin console over any [`RconTransport`].
#[derive(Debug, Clone)]
pub struct SquadRcon<T> {
    transport: T,
}

impl<T: RconTransport> SquadRcon<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a raw command line.
    ///
    /// # Errors
    ///
    /// Propagates the transport error verbatim.
    pub async fn execute(&self, command: &str) -> Result<String, RconError> {
        tracing::debug!(command, "executing console command");
        Ok(self.transport.execute(command).await?)
    }

    async fn run(&self, command: String) -> Result<(), RconError> {
        self.execute(&command).await.map(|_| ())
    }

    // ============== Queries ==============

    /// # Errors
    ///
    /// Transport failures only; unparsable rows are dropped.
    pub async fn get_player_roster(&self) -> Result<Vec<PlayerRecord>, RconError> {
        let response = self.execute(command::LIST_PLAYERS).await?;
        Ok(decode_player_roster(&response))
    }

    /// # Errors
    ///
    /// Transport failures only; unparsable rows are dropped.
    pub async fn get_squad_roster(&self) -> Result<Vec<SquadRecord>, RconError> {
        let response = self.execute(command::LIST_SQUADS).await?;
        Ok(decode_squad_roster(&response))
    }

    /// # Errors
    ///
    /// Transport failures, or [`DecodeError`] when any numeric field is malformed.
    pub async fn get_server_status(&self) -> Result<ServerStatusSummary, RconError> {
        let response = self.execute(command::SHOW_SERVER_INFO).await?;
        Ok(decode_server_status(&response, Utc::now())?)
    }

    /// # Errors
    ///
    /// Transport failures, or [`DecodeError::UnexpectedResponse`].
    pub async fn get_current_map(&self) -> Result<MapInfo, RconError> {
        let response = self.execute(command::SHOW_CURRENT_MAP).await?;
        Ok(decode_current_map(&response)?)
    }

    /// # Errors
    ///
    /// Transport failures only.
    pub async fn get_next_map(&self) -> Result<MapInfo, RconError> {
        let response = self.execute(command::SHOW_NEXT_MAP).await?;
        Ok(decode_next_map(&response))
    }

    // ============== Admin Commands ==============

    pub async fn broadcast(&self, message: &str) -> Result<(), RconError> {
        self.run(command::broadcast(message)).await
    }

    pub async fn set_fog_of_war(&self, mode: FogOfWarMode) -> Result<(), RconError> {
        self.run(command::set_fog_of_war(mode)).await
    }

    pub async fn warn(&self, any_id: &str, message: &str) -> Result<(), RconError> {
        self.run(command::warn(any_id, message)).await
    }

    pub async fn ban(&self, any_id: &str, ban_length: &str, message: &str) -> Result<(), RconError> {
        self.run(command::ban(any_id, ban_length, message)).await
    }

    pub async fn switch_team(&self, any_id: &str) -> Result<(), RconError> {
        self.run(command::switch_team(any_id)).await
    }

    pub async fn kick(&self, any_id: &str, message: &str) -> Result<(), RconError> {
        self.run(command::kick(any_id, message)).await
    }

    pub async fn change_layer(&self, layer: &str) -> Result<(), RconError> {
        self.run(command::change_layer(layer)).await
    }

    pub async fn set_next_layer(&self, layer: &str) -> Result<(), RconError> {
        self.run(command::set_next_layer(layer)).await
    }

    pub async fn end_match(&self) -> Result<(), RconError> {
        self.run(command::end_match()).await
    }

    pub async fn disband_squad(&self, team_id: u32, squad_id: u32) -> Result<(), RconError> {
        self.run(command::disband_squad(team_id, squad_id)).await
    }

    pub async fn remove_player_from_squad(&self, player_id: u32) -> Result<(), RconError> {
        self.run(command::remove_player_from_squad(player_id)).await
    }

    pub async fn rename_squad(&self, team_id: u32, squad_id: u32) -> Result<(), RconError> {
        self.run(command::rename_squad(team_id, squad_id)).await
    }

    // ============== Team Shuffle ==============

    /// Shuffle the current roster onto alternating teams, seeded from OS entropy.
    ///
    /// Switches are sent one after another. A rejected switch is recorded in the report
    /// and the remaining switches still go out.
    ///
    /// # Errors
    ///
    /// Only when the roster itself cannot be fetched.
    pub async fn shuffle_teams(&self) -> Result<ShuffleReport, RconError> {
        self.shuffle_teams_from(None).await
    }

    /// Like [`SquadRcon::shuffle_teams`] with a fixed seed, so the dealt order is
    /// reproducible for a given roster.
    ///
    /// # Errors
    ///
    /// Only when the roster itself cannot be fetched.
    pub async fn shuffle_teams_seeded(&self, seed: u64) -> Result<ShuffleReport, RconError> {
        self.shuffle_teams_from(Some(seed)).await
    }

    async fn shuffle_teams_from(&self, seed: Option<u64>) -> Result<ShuffleReport, RconError> {
        let players = self.get_player_roster().await?;
        let plan = {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            plan_team_shuffle(&players, &mut rng)
        };
        Ok(self.apply_shuffle(plan).await)
    }

    async fn apply_shuffle(&self, plan: ShufflePlan) -> ShuffleReport {
        let mut report = ShuffleReport::default();
        for assignment in plan.switches() {
            match self.execute(&command::switch_team(&assignment.any_id)).await {
                Ok(_) => report.switched.push(assignment.clone()),
                Err(error) => {
                    tracing::warn!(
                        player = %assignment.name,
                        any_id = %assignment.any_id,
                        %error,
                        "team switch failed"
                    );
                    report.failures.push(SwitchFailure {
                        assignment: assignment.clone(),
                        error,
                    });
                }
            }
        }
        report.assignments = plan.assignments;

        tracing::info!(
            players = report.assignments.len(),
            switched = report.switched.len(),
            failed = report.failures.len(),
            "team shuffle finished"
        );
        report
    }
}
