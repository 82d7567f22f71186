//! Terminal driver: prompts for rosters and ballots, runs rounds until both roles are crowned.
//! Run with: cargo run --bin cli

use hustle_battle::{
    finalize_results, judge_and_check_for_win, next_round, start_battle, validate_votes, Battle,
    Contestant, Decision, JudgeResult, Role, Vote,
};
use std::io::{self, BufRead, Write};

fn print_header(text: &str) {
    println!("\n===== {} =====\n", text);
}

fn read_line(input: &mut impl BufRead, prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

fn read_names(input: &mut impl BufRead, prompt: &str) -> io::Result<Vec<String>> {
    Ok(read_line(input, prompt)?.split(',').map(str::to_string).collect())
}

/// Ask until the judge gives a ballot they are allowed to cast (guests 1-4, peers 1-2).
fn read_decision(
    input: &mut impl BufRead,
    judge: &str,
    option_1: &str,
    option_2: &str,
    is_guest: bool,
) -> io::Result<Decision> {
    let mut prompt = format!("{} vote:\n [1] {}\n [2] {}\n", judge, option_1, option_2);
    if is_guest {
        prompt.push_str(" [3] Tie\n [4] No Contest\n");
    }
    prompt.push_str("Choice: ");
    loop {
        let answer = read_line(input, &prompt)?;
        match answer.parse::<u8>().map(Decision::try_from) {
            Ok(Ok(d)) if is_guest || !d.is_guest_only() => return Ok(d),
            Ok(_) => println!("Invalid choice."),
            Err(_) => println!("Enter a number."),
        }
    }
}

fn with_points(battle: &Battle, role: Role, name: &str) -> String {
    match battle.pool(role).find_by_name(name) {
        Some(c) => format!("{} ({} pts)", c.name, c.points),
        None => name.to_string(),
    }
}

fn print_result(result: &JudgeResult) {
    let list = |names: &[String]| {
        if names.is_empty() {
            "None".to_string()
        } else {
            names.join(", ")
        }
    };
    println!("Winner: {}", result.outcome);
    println!("Guest Votes: {}", list(&result.guest_votes));
    println!("Contestant Votes: {}", list(&result.contestant_votes));
}

fn collect_votes(input: &mut impl BufRead, battle: &Battle, role: Role) -> io::Result<Vec<Vote>> {
    let (option_1, option_2) = match role {
        Role::Lead => (battle.current_round.pair_1.lead.clone(), battle.current_round.pair_2.lead.clone()),
        Role::Follow => (battle.current_round.pair_1.follow.clone(), battle.current_round.pair_2.follow.clone()),
    };
    let judges: Vec<String> = battle.current_round.all_judges().cloned().collect();
    let mut votes = Vec::with_capacity(judges.len());
    for judge in judges {
        let is_guest = battle.is_guest(&judge);
        let decision = read_decision(input, &judge, &option_1, &option_2, is_guest)?;
        votes.push(Vote::new(judge, decision));
    }
    Ok(votes)
}

fn print_leaderboard(title: &str, rows: &[Contestant]) {
    println!("{}:", title);
    for (i, c) in rows.iter().enumerate() {
        println!("  {}. {} - {} pts", i + 1, c.name, c.points);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Welcome to the Dance Battle!\n");
    let leads = read_names(&mut input, "Enter lead names (comma-separated): ")?;
    let follows = read_names(&mut input, "Enter follow names (comma-separated): ")?;
    let guests = read_names(&mut input, "Enter guest judge names (comma-separated): ")?;

    let mut battle = start_battle(&leads, &follows, &guests)?;

    while !battle.is_finished() {
        let round = &battle.current_round;
        print_header(&format!("Round {}", round.round_num));
        for (i, pair) in [&round.pair_1, &round.pair_2].into_iter().enumerate() {
            println!(
                "Matchup {}: {} (Lead) & {} (Follow)",
                i + 1,
                with_points(&battle, Role::Lead, &pair.lead),
                with_points(&battle, Role::Follow, &pair.follow)
            );
        }
        println!("Contestant Judges: {}", battle.contestant_judges().join(", "));

        for role in Role::ALL {
            print_header(&format!("Voting for {}", role.plural()));
            let votes = collect_votes(&mut input, &battle, role)?;
            validate_votes(&battle, &votes)?;
            let (result, crownings) = judge_and_check_for_win(&mut battle, role, &votes)?;
            print_result(&result);
            for crowning in crownings {
                println!("{}", crowning);
            }
        }

        if let Err(e) = next_round(&mut battle) {
            eprintln!("Cannot continue: {}", e);
            break;
        }
    }

    print_header("FINAL RESULTS");
    let standings = finalize_results(&battle);
    print_leaderboard("Leads", &standings.leads);
    print_leaderboard("Follows", &standings.follows);
    Ok(())
}
