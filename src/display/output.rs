use crate::analysis::heuristics::flash_slot;
use crate::analysis::risk::risk_band;
use crate::model::{AnalysisResult, MatchRecord};
use chrono::DateTime;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct LobbyRow {
    player: String,
    rank: String,
    #[tabled(rename = "WR")]
    win_rate: String,
    games: String,
    risk: String,
    flags: String,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    number: String,
    date: String,
    champion: String,
    result: String,
    #[tabled(rename = "K/D/A")]
    score: String,
    #[tabled(rename = "KDA")]
    kda: String,
    flash: String,
    vision: String,
    cs: String,
}

fn colored_risk(score: u8) -> String {
    let label = format!("{} ({})", score, risk_band(score));
    match risk_band(score) {
        "low" => label.green().to_string(),
        "medium" => label.yellow().to_string(),
        _ => label.red().bold().to_string(),
    }
}

/// Short labels for every raised flag.
pub fn flag_labels(result: &AnalysisResult) -> Vec<String> {
    let mut labels = Vec::new();
    let b = &result.boosting;
    let p = &result.performance;

    if b.flash_position_changed {
        labels.push(format!("flash moved x{}", b.flash_change_count));
    }
    if b.suspicious_winrate_spike {
        labels.push("winrate spike".to_string());
    }
    if b.inconsistent_playstyle {
        labels.push("erratic KDA".to_string());
    }
    if p.is_feeding {
        labels.push("feeding".to_string());
    }
    if p.poor_kda {
        labels.push("poor KDA".to_string());
    }
    if p.low_vision_score {
        labels.push("low vision".to_string());
    }
    if p.inconsistent_cs {
        labels.push("erratic CS".to_string());
    }
    labels
}

pub fn display_lobby(results: &[AnalysisResult], requested: usize) {
    println!("\n{}", "🔎 LOBBY RISK ASSESSMENT".bold().cyan());
    println!("{}\n", "=".repeat(80).cyan());

    if results.is_empty() {
        println!("{}", "No players could be analyzed".yellow());
        return;
    }

    let rows: Vec<LobbyRow> = results
        .iter()
        .map(|r| {
            let flags = flag_labels(r);
            LobbyRow {
                player: r.riot_id(),
                rank: r.stats.rank_label(),
                win_rate: format!("{:.1}%", r.stats.win_rate()),
                games: format!("{}W {}L", r.stats.wins, r.stats.losses),
                risk: colored_risk(r.risk_score),
                flags: if flags.is_empty() { "-".to_string() } else { flags.join(", ") },
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if results.len() < requested {
        println!(
            "{} {} of {} players could not be analyzed",
            "⚠️".yellow(),
            requested - results.len(),
            requested
        );
    }
    println!();
}

pub fn display_match_history(result: &AnalysisResult) {
    let matches = &result.matches;
    if matches.is_empty() {
        return;
    }

    let wins = matches.iter().filter(|m| m.win).count();
    println!(
        "\n{}",
        format!("📊 {} (Last {} Games)", result.riot_id(), matches.len()).bold().cyan()
    );
    println!(
        "{} {} W / {} L\n",
        "📈 Overall:".bold(),
        wins.to_string().green(),
        (matches.len() - wins).to_string().red()
    );

    let rows: Vec<MatchRow> = matches
        .iter()
        .enumerate()
        .map(|(idx, m)| match_row(idx + 1, m))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn match_row(number: usize, m: &MatchRecord) -> MatchRow {
    let date = DateTime::from_timestamp(m.created_at_epoch, 0)
        .filter(|_| m.created_at_epoch > 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    MatchRow {
        number: number.to_string(),
        date,
        champion: m.champion_id.to_string(),
        result: if m.win {
            "WIN".green().to_string()
        } else {
            "LOSS".red().to_string()
        },
        score: format!("{}/{}/{}", m.kills, m.deaths, m.assists),
        kda: format!("{:.2}", m.kda()),
        flash: flash_slot(m)
            .map(|s| format!("{:?}", s))
            .unwrap_or_else(|| "-".to_string()),
        vision: m.vision_score.to_string(),
        cs: m.minions_killed.to_string(),
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}
