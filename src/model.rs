use crate::error::AppError;
use crate::region::Region;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    pub display_name: String,
    pub tag_line: String,
    pub region: Option<Region>,
    pub stable_id: Option<String>,
}

impl PlayerIdentity {
    pub fn new(display_name: &str, tag_line: &str) -> Self {
        PlayerIdentity {
            display_name: display_name.to_string(),
            tag_line: tag_line.to_string(),
            region: None,
            stable_id: None,
        }
    }

    /// Parses `Name#TAG`.
    pub fn parse(riot_id: &str) -> Result<Self, AppError> {
        let (name, tag) = riot_id.split_once('#').ok_or(AppError::InvalidRiotId)?;
        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() {
            return Err(AppError::InvalidRiotId);
        }
        Ok(PlayerIdentity::new(name, tag))
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.display_name, self.tag_line)
    }

    /// Case-insensitive name + tag comparison.
    pub fn matches(&self, name: &str, tag: &str) -> bool {
        self.display_name.trim().to_lowercase() == name.trim().to_lowercase()
            && self.tag_line.trim().to_lowercase() == tag.trim().to_lowercase()
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.display_name, self.tag_line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
    Unranked,
}

impl Tier {
    pub fn parse(raw: &str) -> Tier {
        match raw.trim().to_uppercase().as_str() {
            "IRON" => Tier::Iron,
            "BRONZE" => Tier::Bronze,
            "SILVER" => Tier::Silver,
            "GOLD" => Tier::Gold,
            "PLATINUM" => Tier::Platinum,
            "EMERALD" => Tier::Emerald,
            "DIAMOND" => Tier::Diamond,
            "MASTER" => Tier::Master,
            "GRANDMASTER" => Tier::Grandmaster,
            "CHALLENGER" => Tier::Challenger,
            // "", "NA", "NONE" and anything unknown
            _ => Tier::Unranked,
        }
    }

    /// The top three competitive tiers.
    pub fn is_apex(&self) -> bool {
        matches!(self, Tier::Master | Tier::Grandmaster | Tier::Challenger)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
            Tier::Unranked => "UNRANKED",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric divisions 1-4 become I-IV; roman numerals pass through.
pub fn normalize_division(raw: &str) -> String {
    match raw.trim().to_uppercase().as_str() {
        "1" | "I" => "I".to_string(),
        "2" | "II" => "II".to_string(),
        "3" | "III" => "III".to_string(),
        "4" | "IV" => "IV".to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub display_name: String,
    pub tag_line: String,
    pub region: Region,
    pub tier: Tier,
    pub division: String,
    pub league_points: i64,
    pub wins: i64,
    pub losses: i64,
    pub account_level: i64,
}

impl PlayerStats {
    /// Placeholder used when the profile lookup came back empty but match
    /// history did not.
    pub fn unranked(identity: &PlayerIdentity, region: Region) -> Self {
        PlayerStats {
            display_name: identity.display_name.clone(),
            tag_line: identity.tag_line.clone(),
            region,
            tier: Tier::Unranked,
            division: String::new(),
            league_points: 0,
            wins: 0,
            losses: 0,
            account_level: 0,
        }
    }

    pub fn win_rate(&self) -> f64 {
        let games = self.wins + self.losses;
        if games <= 0 {
            0.0
        } else {
            self.wins as f64 / games as f64 * 100.0
        }
    }

    pub fn rank_label(&self) -> String {
        if self.tier == Tier::Unranked {
            return self.tier.to_string();
        }
        if self.division.is_empty() {
            format!("{} {}LP", self.tier, self.league_points)
        } else {
            format!("{} {} {}LP", self.tier, self.division, self.league_points)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub champion_id: i64,
    pub win: bool,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub summoner_spell_a: i64,
    pub summoner_spell_b: i64,
    pub wards_placed: i64,
    pub wards_killed: i64,
    pub vision_score: i64,
    pub minions_killed: i64,
    pub gold_earned: i64,
    pub damage_to_champions: i64,
    pub duration_seconds: i64,
    pub created_at_epoch: i64,
}

impl MatchRecord {
    pub fn kda(&self) -> f64 {
        kda(self.kills, self.deaths, self.assists)
    }
}

pub fn kda(kills: i64, deaths: i64, assists: i64) -> f64 {
    if deaths == 0 {
        (kills + assists) as f64
    } else {
        (kills + assists) as f64 / deaths as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoostingFlags {
    pub flash_position_changed: bool,
    pub flash_change_count: u32,
    pub suspicious_winrate_spike: bool,
    pub inconsistent_playstyle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PerformanceFlags {
    pub is_feeding: bool,
    pub poor_kda: bool,
    pub low_vision_score: bool,
    pub inconsistent_cs: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub stats: PlayerStats,
    /// Most recent first, capped for display.
    pub matches: Vec<MatchRecord>,
    pub boosting: BoostingFlags,
    pub performance: PerformanceFlags,
    pub risk_score: u8,
}

impl AnalysisResult {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.stats.display_name, self.stats.tag_line)
    }
}
