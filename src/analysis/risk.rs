use crate::config::{
    APEX_TIER_THRESHOLD, APEX_TIER_WEIGHT, FEEDING_WEIGHT, FLASH_CHANGE_WEIGHT, INCONSISTENT_CS_WEIGHT,
    INCONSISTENT_PLAYSTYLE_WEIGHT, LOW_VISION_WEIGHT, POOR_KDA_WEIGHT, WINRATE_SPIKE_WEIGHT,
};
use crate::model::{BoostingFlags, PerformanceFlags, Tier};

/// Additive risk score, clamped to 0..=100.
pub fn score(boosting: &BoostingFlags, performance: &PerformanceFlags, tier: Tier) -> u8 {
    let weighted = [
        (boosting.suspicious_winrate_spike, WINRATE_SPIKE_WEIGHT),
        (boosting.inconsistent_playstyle, INCONSISTENT_PLAYSTYLE_WEIGHT),
        (performance.is_feeding, FEEDING_WEIGHT),
        (performance.poor_kda, POOR_KDA_WEIGHT),
        (performance.low_vision_score, LOW_VISION_WEIGHT),
        (performance.inconsistent_cs, INCONSISTENT_CS_WEIGHT),
    ];

    let mut total = FLASH_CHANGE_WEIGHT.saturating_mul(i64::from(boosting.flash_change_count));
    for (flag, weight) in weighted {
        if flag {
            total = total.saturating_add(weight);
        }
    }

    // High-rank accounts that already look off get extra scrutiny
    if tier.is_apex() && total > APEX_TIER_THRESHOLD {
        total = total.saturating_add(APEX_TIER_WEIGHT);
    }

    total.clamp(0, 100) as u8
}

/// Coarse label for display.
pub fn risk_band(score: u8) -> &'static str {
    match score {
        0..=29 => "low",
        30..=59 => "medium",
        _ => "high",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_performance() -> PerformanceFlags {
        PerformanceFlags {
            is_feeding: true,
            poor_kda: true,
            low_vision_score: true,
            inconsistent_cs: true,
        }
    }

    #[test]
    fn test_clean_account_scores_zero() {
        assert_eq!(score(&BoostingFlags::default(), &PerformanceFlags::default(), Tier::Challenger), 0);
    }

    #[test]
    fn test_all_flags_clamp_to_100() {
        let boosting = BoostingFlags {
            flash_position_changed: true,
            flash_change_count: 69,
            suspicious_winrate_spike: true,
            inconsistent_playstyle: true,
        };
        assert_eq!(score(&boosting, &all_performance(), Tier::Challenger), 100);

        let extreme = BoostingFlags {
            flash_change_count: u32::MAX,
            ..boosting
        };
        assert_eq!(score(&extreme, &all_performance(), Tier::Unranked), 100);
    }

    #[test]
    fn test_weights_add_up() {
        let boosting = BoostingFlags {
            flash_position_changed: true,
            flash_change_count: 2,
            suspicious_winrate_spike: false,
            inconsistent_playstyle: true,
        };
        let performance = PerformanceFlags {
            low_vision_score: true,
            ..PerformanceFlags::default()
        };
        // 20 + 15 + 10
        assert_eq!(score(&boosting, &performance, Tier::Gold), 45);
    }

    #[test]
    fn test_apex_bonus_needs_total_above_30() {
        let feeding = PerformanceFlags {
            is_feeding: true,
            low_vision_score: true,
            ..PerformanceFlags::default()
        };
        // Exactly 30: no bonus
        assert_eq!(score(&BoostingFlags::default(), &feeding, Tier::Master), 30);

        let boosting = BoostingFlags {
            flash_position_changed: true,
            flash_change_count: 1,
            ..BoostingFlags::default()
        };
        // 40 + 20
        assert_eq!(score(&boosting, &feeding, Tier::Grandmaster), 60);
        assert_eq!(score(&boosting, &feeding, Tier::Diamond), 40);
    }

    #[test]
    fn test_risk_band() {
        assert_eq!(risk_band(0), "low");
        assert_eq!(risk_band(30), "medium");
        assert_eq!(risk_band(100), "high");
    }
}
