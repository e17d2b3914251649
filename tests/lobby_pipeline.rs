use lobby_scout::api::transport::RemoteTransport;
use lobby_scout::config::EngineConfig;
use lobby_scout::{AppError, LobbyAnalyzer, PlayerIdentity, PlayerStage, ProgressEvent, Region, Tier};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const FLASH: i64 = 4;
const IGNITE: i64 = 14;

fn fast_config() -> EngineConfig {
    EngineConfig {
        min_call_spacing: Duration::ZERO,
        ..EngineConfig::default()
    }
}

/// Player name from whichever identity encoding the engine used.
fn player_of(params: &Value) -> String {
    ["game_name", "summoner_name", "riot_id", "name"]
        .iter()
        .find_map(|k| params.get(*k).and_then(Value::as_str))
        .map(|s| s.split('#').next().unwrap_or_default().to_string())
        .unwrap_or_default()
}

fn text_wrapped(value: Value) -> Value {
    json!({"content": [{"type": "text", "text": value.to_string()}], "isError": false})
}

/// 70 games, most recent first. Flash switches slot every 10 games and the
/// five most recent games average 12 deaths.
fn faker_history_table() -> Value {
    let headers = json!([
        "match_id", "game_name", "tag_line", "champion_id", "win", "kills", "deaths", "assists",
        "spell1_id", "spell2_id", "vision_score", "minions_killed", "game_creation"
    ]);

    let mut rows = Vec::new();
    for i in 0..70i64 {
        let segment = i / 10;
        let (spell_a, spell_b) = if segment % 2 == 0 { (FLASH, IGNITE) } else { (IGNITE, FLASH) };
        let deaths = if i < 5 { 12 } else { 4 };
        let created = 1_700_000_000_000i64 - i * 3_600_000;
        let match_id = format!("KR_{}", 7000 - i);

        // Another participant from the same game comes first
        rows.push(json!([match_id, "Keria", "KR1", 412, true, 0, 1, 20, FLASH, 3, 80, 40, created]));
        rows.push(json!([match_id, "Faker", "KR1", 7, i % 2 == 0, 6, deaths, 5, spell_a, spell_b, 25, 220, created]));
    }

    text_wrapped(json!({"headers": headers, "rows": rows}))
}

struct FakerTransport {
    calls: Cell<usize>,
}

impl RemoteTransport for FakerTransport {
    fn invoke(&self, function: &str, params: &Value, _timeout: Duration) -> Result<Value, AppError> {
        self.calls.set(self.calls.get() + 1);
        match function {
            "lol-summoner-search" => Ok(text_wrapped(json!({
                "headers": ["game_name", "tag_line", "level", "tier", "division", "lp", "wins", "losses"],
                "rows": [["Faker", "KR1", 812, "challenger", 1, 1520, 420, 300]]
            }))),
            "lol-summoner-game-history" => {
                assert_eq!(params["region"], json!("kr"));
                Ok(faker_history_table())
            }
            other => Err(AppError::TransportFailure(format!("unexpected {}", other))),
        }
    }
}

#[test]
fn test_faker_end_to_end() {
    let mut analyzer = LobbyAnalyzer::new(FakerTransport { calls: Cell::new(0) }, fast_config());
    let identity = PlayerIdentity::new("Faker", "KR1");

    let results = analyzer.analyze_lobby(&[identity], Region::normalize("kr"), None);
    assert_eq!(results.len(), 1);
    let result = &results[0];

    assert_eq!(result.stats.tier, Tier::Challenger);
    assert_eq!(result.stats.division, "I");
    assert_eq!(result.stats.account_level, 812);
    assert_eq!(result.boosting.flash_change_count, 6);
    assert!(result.boosting.flash_position_changed);
    assert!(result.performance.is_feeding);
    assert!(result.risk_score >= 20);
    assert!(result.risk_score <= 100);

    // Capped for display, most recent first
    assert_eq!(result.matches.len(), 20);
    assert_eq!(result.matches[0].match_id, "KR_7000");
    assert!(result.matches.iter().all(|m| m.champion_id == 7));

    // Summoner and history lookups only
    assert_eq!(analyzer.client().transport().calls.get(), 2);
}

#[test]
fn test_repeat_lobby_is_served_from_cache() {
    let mut analyzer = LobbyAnalyzer::new(FakerTransport { calls: Cell::new(0) }, fast_config());
    let roster = [PlayerIdentity::new("Faker", "KR1")];

    let first = analyzer.analyze_lobby(&roster, Region::Kr, None);
    let second = analyzer.analyze_lobby(&roster, Region::Kr, None);

    assert_eq!(first[0].risk_score, second[0].risk_score);
    assert_eq!(analyzer.client().transport().calls.get(), 2);
}

/// Every player resolves to a clean profile except the scripted ones.
struct LobbyTransport {
    timeout_player: &'static str,
    slow_player: Option<(&'static str, Duration)>,
    log: RefCell<Vec<String>>,
}

impl RemoteTransport for LobbyTransport {
    fn invoke(&self, function: &str, params: &Value, _timeout: Duration) -> Result<Value, AppError> {
        let player = player_of(params);
        self.log.borrow_mut().push(format!("{}:{}", function, player));

        if player == self.timeout_player {
            return Err(AppError::Timeout(function.to_string()));
        }
        if let Some((slow, delay)) = self.slow_player {
            if player == slow {
                thread::sleep(delay);
                return Ok(json!({"content": []}));
            }
        }

        match function {
            "lol-summoner-search" => Ok(json!({
                "summoner": {"game_name": player, "tagline": "T", "level": 100,
                             "league_stats": [{"game_type": "SOLORANKED", "tier_info": {"tier": "SILVER", "division": 3, "lp": 40}, "win": 20, "lose": 22}]}
            })),
            _ => Ok(json!({"games": [
                {"match_id": format!("{}-1", player), "win": true, "kills": 4, "deaths": 3, "assists": 8, "spells": [FLASH, IGNITE], "vision_score": 30, "cs": 180},
                {"match_id": format!("{}-2", player), "win": false, "kills": 2, "deaths": 5, "assists": 6, "spells": [FLASH, IGNITE], "vision_score": 28, "cs": 170}
            ]})),
        }
    }
}

fn roster() -> Vec<PlayerIdentity> {
    (1..=5).map(|i| PlayerIdentity::new(&format!("P{}", i), "T")).collect()
}

#[test]
fn test_batch_survives_one_timeout() {
    let transport = LobbyTransport {
        timeout_player: "P3",
        slow_player: None,
        log: RefCell::new(Vec::new()),
    };
    let mut analyzer = LobbyAnalyzer::new(transport, fast_config());
    let (tx, rx) = mpsc::channel();

    let results = analyzer.analyze_lobby(&roster(), Region::Na, Some(&tx));
    drop(tx);
    let events: Vec<ProgressEvent> = rx.iter().collect();

    assert_eq!(results.len(), 4);
    let names: Vec<_> = results.iter().map(|r| r.stats.display_name.as_str()).collect();
    assert_eq!(names, vec!["P1", "P2", "P4", "P5"]);

    let failures: Vec<_> = events.iter().filter(|e| e.stage == PlayerStage::Failed).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].player, "P3#T");

    // The timeout is not retried with other encodings
    let p3_calls = analyzer
        .client()
        .transport()
        .log
        .borrow()
        .iter()
        .filter(|c| c.ends_with(":P3"))
        .count();
    assert_eq!(p3_calls, 1);
}

#[test]
fn test_player_budget_bounds_slow_lookups() {
    let transport = LobbyTransport {
        timeout_player: "",
        slow_player: Some(("P2", Duration::from_millis(150))),
        log: RefCell::new(Vec::new()),
    };
    let config = EngineConfig {
        player_time_budget: Duration::from_millis(100),
        ..fast_config()
    };
    let mut analyzer = LobbyAnalyzer::new(transport, config);
    let (tx, rx) = mpsc::channel();

    let results = analyzer.analyze_lobby(&roster(), Region::Na, Some(&tx));
    drop(tx);

    assert_eq!(results.len(), 4);
    let failed: Vec<_> = rx.iter().filter(|e| e.stage == PlayerStage::Failed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].player, "P2#T");
    assert!(failed[0].message.contains("Timed out"));
}

#[test]
fn test_results_carry_normalized_profile() {
    let transport = LobbyTransport {
        timeout_player: "",
        slow_player: None,
        log: RefCell::new(Vec::new()),
    };
    let mut analyzer = LobbyAnalyzer::new(transport, fast_config());
    let results = analyzer.analyze_lobby(&roster()[..1], Region::normalize("euw1"), None);

    let stats = &results[0].stats;
    assert_eq!(stats.region, Region::Euw);
    assert_eq!(stats.tier, Tier::Silver);
    assert_eq!(stats.division, "III");
    assert_eq!(stats.league_points, 40);
    assert!(!results[0].boosting.flash_position_changed);
    assert_eq!(results[0].matches.len(), 2);
}
