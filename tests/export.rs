//! Integration tests for CSV export and standings import.

mod common;

use common::*;
use hustle_battle::export::{import_standings, write_round_history, write_summary, ExportError};
use hustle_battle::{check_for_win, judge_round, next_round_with_rng, Decision, Role, SongInfo};

fn played_battle() -> hustle_battle::Battle {
    let mut b = battle_with(4);
    let mut r = rng();
    b.current_round.song_info = Some(SongInfo {
        title: "Boogie Wonderland".into(),
        artist: "Earth, Wind & Fire".into(),
        spotify_url: None,
    });
    judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
    judge_round(&mut b, Role::Follow, &guest_votes(Decision::Second)).unwrap();
    check_for_win(&mut b);
    next_round_with_rng(&mut b, &mut r).unwrap();

    judge_round(&mut b, Role::Lead, &guest_votes(Decision::First)).unwrap();
    judge_round(&mut b, Role::Follow, &guest_votes(Decision::Tie)).unwrap();
    b
}

#[test]
fn round_history_has_one_row_per_judged_round() {
    let b = played_battle();
    let mut out = Vec::new();
    write_round_history(&b, &mut out).unwrap();

    let mut rdr = csv::Reader::from_reader(out.as_slice());
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "round");
    assert_eq!(&headers[7], "song_title");
    assert_eq!(&headers[10], "judge_1");
    assert_eq!(&headers[11], "lead_vote_1");
    assert_eq!(&headers[12], "follow_vote_1");

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][7], "Boogie Wonderland");
    assert_eq!(&rows[0][8], "Earth, Wind & Fire");
    assert_eq!(&rows[0][9], "");
    assert_eq!(&rows[0][10], "Kenji");
    assert_eq!(&rows[0][11], "1");
    assert_eq!(&rows[0][12], "2");
    assert!(rows[1][6].starts_with("Tie between"));
    assert!(rows.iter().all(|row| row.len() == headers.len()));
}

#[test]
fn imported_standings_match_battle_points() {
    let b = played_battle();
    let mut out = Vec::new();
    write_round_history(&b, &mut out).unwrap();
    let imported = import_standings(out.as_slice()).unwrap();

    for role in Role::ALL {
        let rows = imported.for_role(role);
        assert!(!rows.is_empty());
        for row in rows {
            let c = b.pool(role).find_by_name(&row.name).unwrap();
            assert_eq!(row.points, c.points, "{}", row.name);
        }
    }
    assert_eq!(imported.leads[0].points, 2);
    assert_eq!(imported.follows[0].points, 1);
}

#[test]
fn summary_lists_every_contestant() {
    let b = played_battle();
    let mut out = Vec::new();
    write_summary(&b, &mut out).unwrap();

    let mut rdr = csv::Reader::from_reader(out.as_slice());
    assert_eq!(
        rdr.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["role", "rank", "name", "points", "initial_position"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(&rows[0][0], "lead");
    assert_eq!(&rows[0][1], "1");
    assert_eq!(&rows[0][3], "2");
    assert_eq!(&rows[4][0], "follow");
    assert!(rows.iter().all(|r| !r[4].is_empty()));
}

#[test]
fn import_rejects_files_without_winner_columns() {
    let data = "round,lead_1,follow_1,lead_2,follow_2\n1,A,B,C,D\n";
    match import_standings(data.as_bytes()) {
        Err(ExportError::MissingColumn(column)) => assert_eq!(column, "lead_winner"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
