//! Turns aggregator payloads of unknown shape into canonical records.

pub mod encoding;
pub mod strategies;

use crate::error::AppError;
use crate::model::{normalize_division, MatchRecord, PlayerIdentity, PlayerStats, Tier};
use crate::region::Region;
use chrono::DateTime;
use serde_json::Value;
use std::collections::HashSet;
use strategies::{to_record, Record, STRATEGIES};
use tracing::debug;

pub use encoding::{resolve_summoner, ParamEncoding};

const NAME_KEYS: [&str; 5] = ["gamename", "riotidgamename", "summonername", "name", "riotid"];
const TAG_KEYS: [&str; 4] = ["tagline", "riotidtagline", "tag", "gametag"];
const MATCH_ID_KEYS: [&str; 3] = ["matchid", "gameid", "id"];

fn field<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_null())
}

fn int_field(record: &Record, keys: &[&str]) -> Option<i64> {
    field(record, keys).and_then(as_int)
}

fn str_field(record: &Record, keys: &[&str]) -> Option<String> {
    field(record, keys).and_then(|v| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

fn as_win(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "win" | "victory" | "true" | "w" | "1" => Some(true),
            "lose" | "loss" | "defeat" | "false" | "l" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Epoch seconds from an integer (seconds or milliseconds) or an RFC 3339
/// timestamp.
fn as_epoch(value: &Value) -> Option<i64> {
    if let Value::String(s) = value {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(s.trim()) {
            return Some(parsed.timestamp());
        }
    }
    as_int(value).map(|n| if n > 100_000_000_000 { n / 1000 } else { n })
}

/// Name and tag carried by a record, splitting `name#tag` when the tag has
/// no field of its own.
fn record_identity(record: &Record) -> Option<(String, Option<String>)> {
    let name = str_field(record, &NAME_KEYS)?;
    let tag = str_field(record, &TAG_KEYS);
    if tag.is_none() {
        if let Some((n, t)) = name.split_once('#') {
            return Some((n.to_string(), Some(t.to_string())));
        }
    }
    Some((name, tag))
}

/// Records without identity fields are assumed to be scoped to the player
/// already; records that carry a name must match both name and tag.
fn belongs_to(record: &Record, identity: &PlayerIdentity) -> bool {
    match record_identity(record) {
        None => true,
        Some((name, Some(tag))) => identity.matches(&name, &tag),
        Some((_, None)) => false,
    }
}

fn check_identity(identity: &PlayerIdentity) -> Result<(), AppError> {
    if identity.display_name.trim().is_empty() || identity.tag_line.trim().is_empty() {
        return Err(AppError::InvalidRiotId);
    }
    Ok(())
}

fn is_solo_queue(entry: &Record) -> bool {
    str_field(entry, &["gametype", "queuetype", "queue"])
        .map(|q| {
            let q = q.to_uppercase();
            q.contains("SOLO") || q == "RANKED"
        })
        .unwrap_or(false)
}

/// The record holding tier/division/lp/wins/losses: the record itself when
/// it is flat, otherwise the preferred league entry.
fn league_record(record: &Record) -> Record {
    let entries: Vec<Record> = field(record, &["leaguestats", "leagues", "leagueentries", "ranks"])
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_object).map(to_record).collect())
        .unwrap_or_default();

    let mut league = if entries.is_empty() {
        record.clone()
    } else {
        entries
            .iter()
            .find(|e| is_solo_queue(e))
            .unwrap_or(&entries[0])
            .clone()
    };

    if let Some(Value::Object(tier_info)) = field(&league, &["tierinfo", "rank"]).cloned() {
        for (k, v) in to_record(&tier_info) {
            league.entry(k).or_insert(v);
        }
    }
    league
}

fn summoner_from_record(record: &Record, identity: &PlayerIdentity, region: Region) -> Option<PlayerStats> {
    let (name, tag) = record_identity(record)?;
    if !belongs_to(record, identity) {
        return None;
    }

    let league = league_record(record);
    let tier = str_field(&league, &["tier"]).map(|t| Tier::parse(&t)).unwrap_or(Tier::Unranked);
    let division = str_field(&league, &["division", "rank"])
        .map(|d| normalize_division(&d))
        .unwrap_or_default();

    Some(PlayerStats {
        display_name: name,
        tag_line: tag.unwrap_or_else(|| identity.tag_line.clone()),
        region,
        tier,
        division,
        league_points: int_field(&league, &["lp", "leaguepoints"]).unwrap_or(0),
        wins: int_field(&league, &["wins", "win"]).unwrap_or(0),
        losses: int_field(&league, &["losses", "lose", "loss"]).unwrap_or(0),
        account_level: int_field(record, &["level", "summonerlevel", "accountlevel"]).unwrap_or(0),
    })
}

fn spells(record: &Record) -> (i64, i64) {
    if let Some(list) = field(record, &["spells", "summonerspells"]).and_then(Value::as_array) {
        let slot = |i: usize| list.get(i).and_then(as_int).unwrap_or(0);
        return (slot(0), slot(1));
    }
    (
        int_field(record, &["spell1id", "summoner1id", "spell1", "spella", "summonerspella", "dspell"]).unwrap_or(0),
        int_field(record, &["spell2id", "summoner2id", "spell2", "spellb", "summonerspellb", "fspell"]).unwrap_or(0),
    )
}

fn match_from_record(record: &Record) -> Option<MatchRecord> {
    // A usable row needs at least a result and a scoreline
    let win = field(record, &["win", "iswin", "result"]).and_then(as_win)?;
    let kills = int_field(record, &["kills", "kill"])?;
    let deaths = int_field(record, &["deaths", "death"])?;
    let assists = int_field(record, &["assists", "assist"])?;
    let (summoner_spell_a, summoner_spell_b) = spells(record);

    Some(MatchRecord {
        match_id: str_field(record, &MATCH_ID_KEYS).unwrap_or_default(),
        champion_id: int_field(record, &["championid", "champion", "championkey"]).unwrap_or(0),
        win,
        kills,
        deaths,
        assists,
        summoner_spell_a,
        summoner_spell_b,
        wards_placed: int_field(record, &["wardsplaced", "wardplace"]).unwrap_or(0),
        wards_killed: int_field(record, &["wardskilled", "wardkill"]).unwrap_or(0),
        vision_score: int_field(record, &["visionscore", "vision"]).unwrap_or(0),
        minions_killed: int_field(record, &["minionskilled", "totalminionskilled", "minionkill", "cs"]).unwrap_or(0),
        gold_earned: int_field(record, &["goldearned", "gold"]).unwrap_or(0),
        damage_to_champions: int_field(
            record,
            &["totaldamagedealttochampions", "damagetochampions", "championdamage", "damage"],
        )
        .unwrap_or(0),
        duration_seconds: int_field(record, &["gamelength", "gameduration", "durationseconds", "duration"]).unwrap_or(0),
        created_at_epoch: field(record, &["createdatepoch", "createdat", "gamecreation", "timestamp"])
            .and_then(as_epoch)
            .unwrap_or(0),
    })
}

/// Picks the target player's row out of a match entry. Entries with a
/// participant list emit nothing unless one participant matches exactly.
fn select_participant(entry: &Record, identity: &PlayerIdentity) -> Option<Record> {
    let Some(participants) = field(entry, &["participants"]).and_then(Value::as_array) else {
        return belongs_to(entry, identity).then(|| entry.clone());
    };

    let match_id = str_field(entry, &MATCH_ID_KEYS);

    let mut row = participants
        .iter()
        .filter_map(Value::as_object)
        .map(to_record)
        .find(|p| match record_identity(p) {
            Some((name, Some(tag))) => identity.matches(&name, &tag),
            _ => false,
        })?;

    // A participant's own `id` (often lifted from its summoner) is not the game's
    row.remove("id");

    // Match-level fields fill in what the participant row lacks
    for (k, v) in entry {
        if k != "participants" {
            row.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
    if let Some(id) = match_id {
        row.insert("matchid".to_string(), Value::String(id));
    }
    Some(row)
}

fn matches_from_records(records: &[Record], identity: &PlayerIdentity) -> Vec<MatchRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|entry| select_participant(entry, identity))
        .filter_map(|row| match_from_record(&row))
        // Tabular payloads list one row per participant; keep one per match
        .filter(|m| m.match_id.is_empty() || seen.insert(m.match_id.clone()))
        .collect()
}

/// Extracts the player's profile, or `None` if no strategy recognizes it.
pub fn normalize_summoner(
    payload: &Value,
    identity: &PlayerIdentity,
    region: Region,
) -> Result<Option<PlayerStats>, AppError> {
    check_identity(identity)?;

    for (name, strategy) in STRATEGIES {
        let Some(records) = strategy(payload) else {
            continue;
        };
        if let Some(stats) = records
            .iter()
            .find_map(|r| summoner_from_record(r, identity, region))
        {
            debug!(strategy = name, player = %identity, "summoner normalized");
            return Ok(Some(stats));
        }
    }
    Ok(None)
}

/// Extracts up to `limit` matches in upstream order.
pub fn normalize_match_history(
    payload: &Value,
    identity: &PlayerIdentity,
    limit: usize,
) -> Result<Vec<MatchRecord>, AppError> {
    check_identity(identity)?;

    for (name, strategy) in STRATEGIES {
        let Some(records) = strategy(payload) else {
            continue;
        };
        let mut matches = matches_from_records(&records, identity);
        if !matches.is_empty() {
            debug!(strategy = name, player = %identity, count = matches.len(), "match history normalized");
            matches.truncate(limit);
            return Ok(matches);
        }
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn faker() -> PlayerIdentity {
        PlayerIdentity::new("Faker", "KR1")
    }

    #[test]
    fn test_summoner_direct_object() {
        let payload = json!({
            "data": {"summoner": {
                "game_name": "Faker",
                "tagline": "KR1",
                "level": 750,
                "league_stats": [
                    {"game_type": "FLEXRANKED", "tier_info": {"tier": "GOLD", "division": 2, "lp": 10}, "win": 1, "lose": 1},
                    {"game_type": "SOLORANKED", "tier_info": {"tier": "challenger", "division": 1, "lp": 1400}, "win": 300, "lose": 200}
                ]
            }}
        });
        let stats = normalize_summoner(&payload, &faker(), Region::Kr).unwrap().unwrap();
        assert_eq!(stats.tier, Tier::Challenger);
        assert_eq!(stats.division, "I");
        assert_eq!(stats.league_points, 1400);
        assert_eq!(stats.wins, 300);
        assert_eq!(stats.losses, 200);
        assert_eq!(stats.account_level, 750);
        assert_eq!(stats.win_rate(), 60.0);
    }

    #[test]
    fn test_summoner_table_in_text_wrapper() {
        let table = json!({
            "headers": ["game_name", "tag_line", "tier", "rank", "lp", "wins", "losses", "level"],
            "rows": [["faker", "kr1", "NONE", "", 0, 0, 0, 30]]
        });
        let payload = json!({"content": [{"type": "text", "text": table.to_string()}]});
        let stats = normalize_summoner(&payload, &faker(), Region::Kr).unwrap().unwrap();
        assert_eq!(stats.tier, Tier::Unranked);
        assert_eq!(stats.division, "");
        assert_eq!(stats.account_level, 30);
    }

    #[test]
    fn test_summoner_for_someone_else_is_none() {
        let payload = json!({"gameName": "Chovy", "tagLine": "KR1", "tier": "GRANDMASTER"});
        assert_eq!(normalize_summoner(&payload, &faker(), Region::Kr).unwrap(), None);
    }

    #[test]
    fn test_unknown_shape_is_none_not_error() {
        let payload = json!({"content": [{"type": "text", "text": "nothing here"}]});
        assert_eq!(normalize_summoner(&payload, &faker(), Region::Kr).unwrap(), None);
        assert!(normalize_match_history(&payload, &faker(), 20).unwrap().is_empty());
        assert!(normalize_match_history(&json!(null), &faker(), 20).unwrap().is_empty());
    }

    #[test]
    fn test_missing_identity_is_an_error() {
        let blank = PlayerIdentity::new("", "KR1");
        assert_eq!(
            normalize_summoner(&json!({}), &blank, Region::Kr),
            Err(AppError::InvalidRiotId)
        );
        assert_eq!(
            normalize_match_history(&json!({}), &blank, 5),
            Err(AppError::InvalidRiotId)
        );
    }

    #[test]
    fn test_match_participants_pick_target_row() {
        let payload = json!({"games": [
            {
                "match_id": "KR_1",
                "game_length_second": 1800,
                "gameLength": 1800,
                "created_at": "2024-05-01T12:00:00+00:00",
                "participants": [
                    {"summoner": {"game_name": "Keria", "tagline": "KR1"}, "champion_id": 412, "stats": {"result": "WIN", "kill": 0, "death": 1, "assist": 15}},
                    {"summoner": {"game_name": "FAKER", "tagline": "kr1"}, "champion_id": 7, "spells": [4, 14],
                     "stats": {"result": "WIN", "kill": 8, "death": 2, "assist": 6, "vision_score": 22, "minion_kill": 240}}
                ]
            },
            {
                "match_id": "KR_2",
                "participants": [
                    {"summoner": {"game_name": "Keria", "tagline": "KR1"}, "stats": {"result": "LOSE", "kill": 0, "death": 1, "assist": 2}}
                ]
            }
        ]});

        let matches = normalize_match_history(&payload, &faker(), 20).unwrap();
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.match_id, "KR_1");
        assert_eq!(m.champion_id, 7);
        assert!(m.win);
        assert_eq!((m.kills, m.deaths, m.assists), (8, 2, 6));
        assert_eq!((m.summoner_spell_a, m.summoner_spell_b), (4, 14));
        assert_eq!(m.vision_score, 22);
        assert_eq!(m.minions_killed, 240);
        assert_eq!(m.duration_seconds, 1800);
        assert_eq!(m.created_at_epoch, 1714564800);
    }

    #[test]
    fn test_match_table_rows_per_participant() {
        let table = json!({
            "headers": ["match_id", "game_name", "tag_line", "champion_id", "win", "kills", "deaths", "assists", "spell1_id", "spell2_id"],
            "rows": [
                ["M3", "Faker", "KR1", 7, true, 1, 2, 3, 14, 4],
                ["M3", "Keria", "KR1", 412, true, 0, 0, 9, 4, 3],
                ["M2", "Keria", "KR1", 412, false, 0, 5, 1, 4, 3],
                ["M1", "Faker", "KR1", 61, "LOSE", 2, 7, 1, 4, 14]
            ]
        });
        let payload = json!({"content": [{"type": "text", "text": table.to_string()}]});
        let matches = normalize_match_history(&payload, &faker(), 20).unwrap();
        let ids: Vec<_> = matches.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["M3", "M1"]);
        assert_eq!(matches[0].summoner_spell_b, 4);
        assert!(!matches[1].win);
    }

    #[test]
    fn test_match_history_truncates_in_upstream_order() {
        let games: Vec<Value> = (0..10)
            .map(|i| json!({"match_id": format!("M{}", i), "win": i % 2 == 0, "kills": i, "deaths": 1, "assists": 0, "game_creation": 1_700_000_000_000i64 - i * 1000}))
            .collect();
        let matches = normalize_match_history(&json!({ "data": games }), &faker(), 3).unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].match_id, "M0");
        assert_eq!(matches[2].match_id, "M2");
        assert_eq!(matches[0].created_at_epoch, 1_700_000_000);
    }

    #[test]
    fn test_game_id_wins_over_participant_summoner_id() {
        let games: Vec<Value> = (0..5)
            .map(|i| json!({
                "id": format!("GAME_{}", i),
                "participants": [
                    {"summoner": {"id": 999, "game_name": "Faker", "tagline": "KR1"},
                     "stats": {"result": "WIN", "kill": 4, "death": 2, "assist": 7}}
                ]
            }))
            .collect();

        let matches = normalize_match_history(&json!({ "games": games }), &faker(), 20).unwrap();
        let ids: Vec<_> = matches.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["GAME_0", "GAME_1", "GAME_2", "GAME_3", "GAME_4"]);
    }

    #[test]
    fn test_rows_with_name_but_no_tag_are_rejected() {
        let payload = json!({"games": [
            {"match_id": "M1", "game_name": "Faker", "win": true, "kills": 1, "deaths": 1, "assists": 1},
            {"match_id": "M2", "game_name": "Faker#KR1", "win": true, "kills": 1, "deaths": 1, "assists": 1}
        ]});
        let matches = normalize_match_history(&payload, &faker(), 20).unwrap();
        let ids: Vec<_> = matches.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["M2"]);

        let profile = json!({"name": "Faker", "level": 30});
        assert_eq!(normalize_summoner(&profile, &faker(), Region::Kr).unwrap(), None);
    }
}
