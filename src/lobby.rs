//! Drives the per-player pipeline across a lobby roster.

use crate::analysis::heuristics::{detect_boosting, detect_performance_issues};
use crate::analysis::history::{build_history, display_slice};
use crate::analysis::risk;
use crate::api::client::OpggClient;
use crate::api::endpoints::GAME_HISTORY;
use crate::api::transport::RemoteTransport;
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::model::{AnalysisResult, PlayerIdentity, PlayerStats};
use crate::normalize::resolve_summoner;
use crate::region::Region;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStage {
    Pending,
    Searching,
    FetchingHistory,
    Analyzing,
    Done,
    Failed,
}

impl fmt::Display for PlayerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerStage::Pending => "pending",
            PlayerStage::Searching => "searching",
            PlayerStage::FetchingHistory => "fetching history",
            PlayerStage::Analyzing => "analyzing",
            PlayerStage::Done => "done",
            PlayerStage::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Human-readable status update for one player, keyed by `name#tag`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub player: String,
    pub stage: PlayerStage,
    pub message: String,
}

pub struct LobbyAnalyzer<T: RemoteTransport> {
    client: OpggClient<T>,
    config: EngineConfig,
}

impl<T: RemoteTransport> LobbyAnalyzer<T> {
    pub fn new(transport: T, config: EngineConfig) -> Self {
        let client = OpggClient::new(transport, &config);
        LobbyAnalyzer { client, config }
    }

    pub fn with_client(client: OpggClient<T>, config: EngineConfig) -> Self {
        LobbyAnalyzer { client, config }
    }

    pub fn client(&self) -> &OpggClient<T> {
        &self.client
    }

    /// Analyzes each identity in order, one at a time. Failed players are
    /// reported on `progress` and left out of the result; the batch always
    /// runs to the end unless the progress receiver goes away.
    pub fn analyze_lobby(
        &mut self,
        identities: &[PlayerIdentity],
        region: Region,
        progress: Option<&Sender<ProgressEvent>>,
    ) -> Vec<AnalysisResult> {
        let mut results = Vec::new();

        for (idx, identity) in identities.iter().enumerate() {
            if idx > 0 && !self.config.min_call_spacing.is_zero() {
                thread::sleep(self.config.min_call_spacing);
            }

            let mut reporter = Reporter::new(identity, progress);
            reporter.emit(PlayerStage::Pending, "queued".to_string());
            if reporter.hung_up {
                info!("progress receiver dropped, stopping lobby analysis");
                break;
            }

            let player_region = identity.region.unwrap_or(region);
            match self.analyze_player(identity, player_region, &mut reporter) {
                Ok(result) => {
                    reporter.emit(
                        PlayerStage::Done,
                        format!("risk score {} ({})", result.risk_score, risk::risk_band(result.risk_score)),
                    );
                    results.push(result);
                }
                Err(e) => {
                    warn!(player = %identity, error = %e, "player analysis failed");
                    reporter.emit(PlayerStage::Failed, e.to_string());
                }
            }

            if reporter.hung_up {
                info!("progress receiver dropped, stopping lobby analysis");
                break;
            }
        }

        results
    }

    /// Full pipeline for one player under the per-player time budget.
    fn analyze_player(
        &mut self,
        identity: &PlayerIdentity,
        region: Region,
        reporter: &mut Reporter<'_>,
    ) -> Result<AnalysisResult, AppError> {
        let deadline = Instant::now() + self.config.player_time_budget;

        reporter.emit(PlayerStage::Searching, format!("looking up profile on {}", region));
        let (profile, encoding) = resolve_summoner(&mut self.client, identity, region, deadline)?;

        reporter.emit(PlayerStage::FetchingHistory, "fetching match history".to_string());
        let params = encoding.encode_with_limit(identity, region, self.config.history_count);
        let remaining = deadline.saturating_duration_since(Instant::now());
        let payload = self.client.request(GAME_HISTORY, &params, remaining)?;
        let history = build_history(&payload, identity, self.config.history_count)?;

        if profile.is_none() && history.is_empty() {
            return Err(AppError::NotFound(identity.riot_id()));
        }

        reporter.emit(
            PlayerStage::Analyzing,
            format!("analyzing {} matches", history.len()),
        );
        let stats = profile.unwrap_or_else(|| PlayerStats::unranked(identity, region));
        let boosting = detect_boosting(&history);
        let performance = detect_performance_issues(&history);
        let risk_score = risk::score(&boosting, &performance, stats.tier);

        Ok(AnalysisResult {
            stats,
            matches: display_slice(&history, self.config.display_limit),
            boosting,
            performance,
            risk_score,
        })
    }
}

struct Reporter<'a> {
    player: String,
    progress: Option<&'a Sender<ProgressEvent>>,
    hung_up: bool,
}

impl<'a> Reporter<'a> {
    fn new(identity: &PlayerIdentity, progress: Option<&'a Sender<ProgressEvent>>) -> Self {
        Reporter {
            player: identity.riot_id(),
            progress,
            hung_up: false,
        }
    }

    fn emit(&mut self, stage: PlayerStage, message: String) {
        info!(player = %self.player, %stage, "{}", message);
        let Some(sender) = self.progress else {
            return;
        };
        let event = ProgressEvent {
            player: self.player.clone(),
            stage,
            message,
        };
        if sender.send(event).is_err() {
            self.hung_up = true;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatParticipant {
    #[serde(default)]
    cid: String,
    #[serde(default)]
    game_name: String,
    #[serde(default)]
    game_tag: String,
    #[serde(default)]
    puuid: String,
}

#[derive(Debug, Deserialize)]
struct ChatParticipants {
    participants: Vec<ChatParticipant>,
}

/// Identities of the champ-select participants in an LCU
/// `/chat/v5/participants` payload. Anything unreadable yields an empty
/// roster.
pub fn identities_from_chat_participants(payload: &Value) -> Vec<PlayerIdentity> {
    let lobby: ChatParticipants = match serde_json::from_value(payload.clone()) {
        Ok(lobby) => lobby,
        Err(e) => {
            warn!(error = %e, "could not parse lobby participants");
            return Vec::new();
        }
    };

    lobby
        .participants
        .into_iter()
        .filter(|p| p.cid.contains("champ-select"))
        .filter(|p| !p.game_name.is_empty() && !p.game_tag.is_empty())
        .map(|p| PlayerIdentity {
            stable_id: (!p.puuid.is_empty()).then_some(p.puuid),
            ..PlayerIdentity::new(&p.game_name, &p.game_tag)
        })
        .collect()
}
