use crate::error::AppError;
use crate::model::{MatchRecord, PlayerIdentity};
use crate::normalize::normalize_match_history;
use serde_json::Value;

/// Builds the player's match history from raw game-history entries.
///
/// Upstream already lists games most recent first; that order is kept as
/// is and not re-sorted by timestamp.
pub fn build_history(
    entries: &Value,
    identity: &PlayerIdentity,
    count: usize,
) -> Result<Vec<MatchRecord>, AppError> {
    let mut history = normalize_match_history(entries, identity, count)?;
    history.truncate(count);
    Ok(history)
}

/// The first `count` matches, for display.
pub fn display_slice(history: &[MatchRecord], count: usize) -> Vec<MatchRecord> {
    history.iter().take(count).cloned().collect()
}
