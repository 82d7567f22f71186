//! CSV export of round history and standings, and re-import of standings from an export.

use crate::logic::{finalize_results, Standings};
use crate::models::{Battle, Contestant, Role, Round};
use std::collections::HashMap;
use std::io::{Read, Write};

/// Fixed columns of the round history export; judge triples follow.
pub const ROUND_COLUMNS: [&str; 10] = [
    "round",
    "lead_1",
    "follow_1",
    "lead_2",
    "follow_2",
    "lead_winner",
    "follow_winner",
    "song_title",
    "song_artist",
    "spotify_url",
];

/// Errors while writing or reading CSV.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    /// An imported file lacks a required column.
    MissingColumn(&'static str),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::MissingColumn(c) => write!(f, "Missing column: {}", c),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Write one row per judged round. Rows carry a judge / lead vote / follow vote triple per
/// judge (guests first); shorter rows are padded so every row has the header's width.
pub fn write_round_history<W: Write>(battle: &Battle, writer: W) -> Result<(), ExportError> {
    let rounds: Vec<&Round> = battle.round_history().collect();
    let max_judges = rounds.iter().map(|r| r.all_judges().count()).max().unwrap_or(0);

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = ROUND_COLUMNS.iter().map(|c| c.to_string()).collect();
    for n in 1..=max_judges {
        header.push(format!("judge_{}", n));
        header.push(format!("lead_vote_{}", n));
        header.push(format!("follow_vote_{}", n));
    }
    wtr.write_record(&header)?;

    for round in rounds {
        let song = round.song_info.as_ref();
        let mut row = vec![
            round.round_num.to_string(),
            round.pair_1.lead.clone(),
            round.pair_1.follow.clone(),
            round.pair_2.lead.clone(),
            round.pair_2.follow.clone(),
            round.lead_outcome.as_ref().map(|o| o.to_string()).unwrap_or_default(),
            round.follow_outcome.as_ref().map(|o| o.to_string()).unwrap_or_default(),
            song.map(|s| s.title.clone()).unwrap_or_default(),
            song.map(|s| s.artist.clone()).unwrap_or_default(),
            song.and_then(|s| s.spotify_url.clone()).unwrap_or_default(),
        ];
        for judge in round.all_judges() {
            row.push(judge.clone());
            for role in Role::ALL {
                row.push(
                    round
                        .votes(role)
                        .get(judge)
                        .map(|&d| u8::from(d).to_string())
                        .unwrap_or_default(),
                );
            }
        }
        row.resize(header.len(), String::new());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the current standings: role, rank, name, points, position in the initial shuffled order.
pub fn write_summary<W: Write>(battle: &Battle, writer: W) -> Result<(), ExportError> {
    let standings = finalize_results(battle);
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["role", "rank", "name", "points", "initial_position"])?;
    for role in Role::ALL {
        let pool = battle.pool(role);
        for (idx, c) in standings.for_role(role).iter().enumerate() {
            let initial = pool
                .roster
                .iter()
                .position(|r| r.id == c.id)
                .map(|p| (p + 1).to_string())
                .unwrap_or_default();
            wtr.write_record([
                role.to_string(),
                (idx + 1).to_string(),
                c.name.clone(),
                c.points.to_string(),
                initial,
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Rebuild aggregate standings from a round history export: every contestant named in a round
/// is listed, and each round win listed in `lead_winner` / `follow_winner` is worth one point.
/// Rows keep first-appearance order and are stable-sorted by points.
pub fn import_standings<R: Read>(reader: R) -> Result<Standings, ExportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(ExportError::MissingColumn(name))
    };
    let lead_cols = [column("lead_1")?, column("lead_2")?];
    let follow_cols = [column("follow_1")?, column("follow_2")?];
    let lead_winner = column("lead_winner")?;
    let follow_winner = column("follow_winner")?;

    let mut leads = Tally::default();
    let mut follows = Tally::default();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        leads.record([field(lead_cols[0]), field(lead_cols[1])], field(lead_winner));
        follows.record([field(follow_cols[0]), field(follow_cols[1])], field(follow_winner));
    }
    Ok(Standings {
        leads: leads.into_leaderboard(),
        follows: follows.into_leaderboard(),
    })
}

#[derive(Default)]
struct Tally {
    order: Vec<String>,
    points: HashMap<String, u32>,
}

impl Tally {
    fn record(&mut self, dancers: [&str; 2], winner: &str) {
        for name in dancers.into_iter().filter(|n| !n.is_empty()) {
            if !self.points.contains_key(name) {
                self.order.push(name.to_string());
                self.points.insert(name.to_string(), 0);
            }
        }
        if dancers.contains(&winner) && !winner.is_empty() {
            if let Some(p) = self.points.get_mut(winner) {
                *p += 1;
            }
        }
    }

    fn into_leaderboard(self) -> Vec<Contestant> {
        let mut rows: Vec<Contestant> = self
            .order
            .into_iter()
            .map(|name| {
                let points = self.points.get(&name).copied().unwrap_or(0);
                Contestant::with_points(name, points)
            })
            .collect();
        rows.sort_by(|a, b| b.points.cmp(&a.points));
        rows
    }
}
