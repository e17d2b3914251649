use crate::error::AppError;
use crate::region::Region;
use std::env;
use std::time::Duration;

pub const DEFAULT_MCP_URL: &str = "https://mcp-api.op.gg/mcp";

// Transport
pub const CACHE_TTL_SECS: i64 = 5 * 60;
pub const MIN_CALL_SPACING: Duration = Duration::from_secs(1);
pub const CALL_TIMEOUT: Duration = Duration::from_secs(15);
pub const PLAYER_TIME_BUDGET: Duration = Duration::from_secs(45);

// History
pub const HISTORY_FETCH_COUNT: usize = 100;
pub const DISPLAY_MATCH_LIMIT: usize = 20;

// Heuristics
pub const FLASH_SPELL_ID: i64 = 4;
pub const RECENT_WINDOW: usize = 20;
pub const OLDER_WINDOW_END: usize = 50;
pub const WINRATE_SPIKE_POINTS: f64 = 30.0;
pub const KDA_VARIANCE_LIMIT: f64 = 2.0;
pub const PERFORMANCE_WINDOW: usize = 5;
pub const FEEDING_DEATHS: f64 = 10.0;
pub const POOR_KDA: f64 = 1.0;
pub const LOW_VISION: f64 = 15.0;
pub const CS_VARIANCE_LIMIT: f64 = 2500.0;

// Risk weights
pub const FLASH_CHANGE_WEIGHT: i64 = 10;
pub const WINRATE_SPIKE_WEIGHT: i64 = 25;
pub const INCONSISTENT_PLAYSTYLE_WEIGHT: i64 = 15;
pub const FEEDING_WEIGHT: i64 = 20;
pub const POOR_KDA_WEIGHT: i64 = 15;
pub const LOW_VISION_WEIGHT: i64 = 10;
pub const INCONSISTENT_CS_WEIGHT: i64 = 10;
pub const APEX_TIER_THRESHOLD: i64 = 30;
pub const APEX_TIER_WEIGHT: i64 = 20;

/// Timing and sizing knobs for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cache_ttl: chrono::Duration,
    pub min_call_spacing: Duration,
    pub call_timeout: Duration,
    pub player_time_budget: Duration,
    pub history_count: usize,
    pub display_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_ttl: chrono::Duration::seconds(CACHE_TTL_SECS),
            min_call_spacing: MIN_CALL_SPACING,
            call_timeout: CALL_TIMEOUT,
            player_time_budget: PLAYER_TIME_BUDGET,
            history_count: HISTORY_FETCH_COUNT,
            display_limit: DISPLAY_MATCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mcp_url: String,
    pub region: Region,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mcp_url = env::var("OPGG_MCP_URL").unwrap_or_else(|_| DEFAULT_MCP_URL.to_string());
        if !(mcp_url.starts_with("https://") || mcp_url.starts_with("http://")) {
            return Err(AppError::ConfigError(format!(
                "OPGG_MCP_URL must be an http(s) URL, got '{}'",
                mcp_url
            )));
        }

        let region = env::var("LOBBY_REGION")
            .map(|r| Region::normalize(&r))
            .unwrap_or_default();

        Ok(Config { mcp_url, region })
    }
}
