//! Boosting and performance heuristics over a most-recent-first history.

use crate::config::{
    CS_VARIANCE_LIMIT, FEEDING_DEATHS, FLASH_SPELL_ID, KDA_VARIANCE_LIMIT, LOW_VISION, OLDER_WINDOW_END,
    PERFORMANCE_WINDOW, POOR_KDA, RECENT_WINDOW, WINRATE_SPIKE_POINTS,
};
use crate::model::{BoostingFlags, MatchRecord, PerformanceFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashSlot {
    D,
    F,
}

pub fn flash_slot(record: &MatchRecord) -> Option<FlashSlot> {
    if record.summoner_spell_a == FLASH_SPELL_ID {
        Some(FlashSlot::D)
    } else if record.summoner_spell_b == FLASH_SPELL_ID {
        Some(FlashSlot::F)
    } else {
        None
    }
}

/// Number of times flash moved between slots. Games without flash are
/// skipped and do not reset the last known slot.
pub fn count_flash_changes(history: &[MatchRecord]) -> u32 {
    let mut last: Option<FlashSlot> = None;
    let mut changes = 0;

    for slot in history.iter().filter_map(flash_slot) {
        if last.is_some_and(|prev| prev != slot) {
            changes += 1;
        }
        last = Some(slot);
    }
    changes
}

/// Percentage of wins; 0 for an empty window.
pub fn win_rate(matches: &[MatchRecord]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    let wins = matches.iter().filter(|m| m.win).count();
    wins as f64 / matches.len() as f64 * 100.0
}

fn window(history: &[MatchRecord], start: usize, end: usize) -> &[MatchRecord] {
    let end = end.min(history.len());
    let start = start.min(end);
    &history[start..end]
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn is_winrate_spike(recent: f64, older: f64) -> bool {
    recent - older > WINRATE_SPIKE_POINTS
}

pub fn detect_boosting(history: &[MatchRecord]) -> BoostingFlags {
    let flash_change_count = count_flash_changes(history);

    let recent = window(history, 0, RECENT_WINDOW);
    let older = window(history, RECENT_WINDOW, OLDER_WINDOW_END);

    let recent_kdas: Vec<f64> = recent.iter().map(MatchRecord::kda).collect();

    BoostingFlags {
        flash_position_changed: flash_change_count > 0,
        flash_change_count,
        suspicious_winrate_spike: is_winrate_spike(win_rate(recent), win_rate(older)),
        inconsistent_playstyle: variance(&recent_kdas) > KDA_VARIANCE_LIMIT,
    }
}

/// Flags computed over the most recent games only.
pub fn detect_performance_issues(history: &[MatchRecord]) -> PerformanceFlags {
    let last = window(history, 0, PERFORMANCE_WINDOW);
    if last.is_empty() {
        return PerformanceFlags::default();
    }

    let deaths: Vec<f64> = last.iter().map(|m| m.deaths as f64).collect();
    let kdas: Vec<f64> = last.iter().map(MatchRecord::kda).collect();
    let vision: Vec<f64> = last.iter().map(|m| m.vision_score as f64).collect();
    let cs: Vec<f64> = last.iter().map(|m| m.minions_killed as f64).collect();

    PerformanceFlags {
        is_feeding: mean(&deaths) > FEEDING_DEATHS,
        poor_kda: mean(&kdas) < POOR_KDA,
        low_vision_score: mean(&vision) < LOW_VISION,
        inconsistent_cs: variance(&cs) > CS_VARIANCE_LIMIT,
    }
}
