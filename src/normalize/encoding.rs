use crate::api::client::OpggClient;
use crate::api::endpoints::SUMMONER_SEARCH;
use crate::api::transport::RemoteTransport;
use crate::error::AppError;
use crate::model::{PlayerIdentity, PlayerStats};
use crate::region::Region;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

use super::normalize_summoner;

/// Ways of naming a player to the aggregator. It accepts exactly one of
/// these at a time and does not say which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamEncoding {
    GameNameTagLine,
    RiotId,
    SummonerNameTagline,
    Name,
}

impl ParamEncoding {
    pub const PRIORITY: [ParamEncoding; 4] = [
        ParamEncoding::GameNameTagLine,
        ParamEncoding::RiotId,
        ParamEncoding::SummonerNameTagline,
        ParamEncoding::Name,
    ];

    pub fn encode(&self, identity: &PlayerIdentity, region: Region) -> Value {
        let region = region.slug();
        match self {
            ParamEncoding::GameNameTagLine => json!({
                "game_name": identity.display_name,
                "tag_line": identity.tag_line,
                "region": region,
            }),
            ParamEncoding::RiotId => json!({
                "riot_id": identity.riot_id(),
                "region": region,
            }),
            ParamEncoding::SummonerNameTagline => json!({
                "summoner_name": identity.display_name,
                "tagline": identity.tag_line,
                "region": region,
            }),
            ParamEncoding::Name => json!({
                "name": identity.riot_id(),
                "region": region,
            }),
        }
    }

    /// Same encoding with a `limit` for list endpoints.
    pub fn encode_with_limit(&self, identity: &PlayerIdentity, region: Region, limit: usize) -> Value {
        let mut params = self.encode(identity, region);
        if let Value::Object(map) = &mut params {
            map.insert("limit".to_string(), json!(limit));
        }
        params
    }
}

/// Looks the player up with each encoding in turn and stops at the first
/// response that normalizes to a profile.
///
/// Returns the profile (if any) together with the encoding to reuse for
/// follow-up calls. A timeout aborts the search; a transport failure moves
/// on to the next encoding and is returned only if every encoding failed
/// that way.
pub fn resolve_summoner<T: RemoteTransport>(
    client: &mut OpggClient<T>,
    identity: &PlayerIdentity,
    region: Region,
    deadline: Instant,
) -> Result<(Option<PlayerStats>, ParamEncoding), AppError> {
    let mut last_failure = None;
    let mut answered = false;

    for encoding in ParamEncoding::PRIORITY {
        let params = encoding.encode(identity, region);
        let remaining = deadline.saturating_duration_since(Instant::now());

        let payload = match client.request(SUMMONER_SEARCH, &params, remaining) {
            Ok(payload) => payload,
            Err(e) if e.is_timeout() => return Err(e),
            Err(e) => {
                warn!(player = %identity, ?encoding, error = %e, "summoner lookup failed");
                last_failure = Some(e);
                continue;
            }
        };

        answered = true;
        if let Some(stats) = normalize_summoner(&payload, identity, region)? {
            debug!(player = %identity, ?encoding, "summoner resolved");
            return Ok((Some(stats), encoding));
        }
    }

    match last_failure {
        Some(e) if !answered => Err(e),
        _ => Ok((None, ParamEncoding::PRIORITY[0])),
    }
}
