//! Pre-game lobby scouting: fetches per-player statistics from the OP.GG
//! aggregator and flags accounts that look boosted or shared.

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod lobby;
pub mod model;
pub mod normalize;
pub mod rate_limit;
pub mod region;

pub use error::AppError;
pub use lobby::{LobbyAnalyzer, PlayerStage, ProgressEvent};
pub use model::{AnalysisResult, BoostingFlags, MatchRecord, PerformanceFlags, PlayerIdentity, PlayerStats, Tier};
pub use region::Region;
