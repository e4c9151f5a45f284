use std::collections::BTreeMap;
use std::env;

use contracts::{BoardView, Difficulty, GenerateConfig, RoomView, TokenView};
use scenario_core::scenario::{generate, ScenarioBundle};

const COLUMN_WIDTH: usize = 34;

fn print_usage() {
    println!("scenario-cli <command>");
    println!("commands:");
    println!("  generate <players> [difficulty] [seed] [--json]");
    println!("    players: 2-4");
    println!("    difficulty: easy | medium | hard (default medium)");
    println!("    seed: u32 (default: wall clock, not reproducible)");
    println!("    --json: print the serialized scenario instead of boards");
}

fn parse_players(value: Option<&String>) -> Result<u8, String> {
    let raw = value.ok_or_else(|| "missing players".to_string())?;
    let players = raw
        .parse::<u8>()
        .map_err(|_| format!("invalid players: {raw}"))?;
    if !(2..=4).contains(&players) {
        return Err(format!("players must be 2-4, got {players}"));
    }
    Ok(players)
}

fn parse_difficulty(value: Option<&String>) -> Result<Difficulty, String> {
    match value {
        None => Ok(Difficulty::Medium),
        Some(raw) => {
            Difficulty::parse(raw).ok_or_else(|| format!("invalid difficulty: {raw}"))
        }
    }
}

fn parse_seed(value: Option<&String>) -> Result<Option<u32>, String> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| format!("invalid seed: {raw}")),
    }
}

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let json = args.iter().any(|arg| arg == "--json");
    args.retain(|arg| arg != "--json");
    let command = args.get(1).map(String::as_str);

    match command {
        Some("generate") => {
            let parsed = parse_players(args.get(2)).and_then(|players| {
                let difficulty = parse_difficulty(args.get(3))?;
                let seed = parse_seed(args.get(4))?;
                Ok((players, difficulty, seed))
            });
            match parsed {
                Ok((num_players, difficulty, seed)) => {
                    let config = GenerateConfig {
                        num_players,
                        difficulty,
                        seed,
                        perturbation: None,
                        warm_cool_bias: None,
                    };
                    let bundle = generate(&config);
                    if json {
                        match serde_json::to_string_pretty(&bundle.scenario()) {
                            Ok(encoded) => println!("{encoded}"),
                            Err(err) => {
                                eprintln!("error: {err}");
                                std::process::exit(1);
                            }
                        }
                    } else {
                        print_scenario(&bundle);
                    }
                }
                Err(err) => {
                    eprintln!("error: {}", err);
                    print_usage();
                    std::process::exit(2);
                }
            }
        }
        _ => {
            print_usage();
        }
    }
}

fn print_scenario(bundle: &ScenarioBundle) {
    let scenario = bundle.scenario();

    println!(
        "generated: {} players, {} difficulty, seed={}, {} moves",
        scenario.num_players,
        scenario.difficulty,
        bundle.seed,
        scenario.perturbation_log.len()
    );
    println!();

    print_board("INITIAL BOARD (visible to all players)", &scenario.initial_board);
    print_board("SOLUTION BOARD (hidden)", &scenario.solution_board);

    println!("PLAYER CONDITIONS");
    let violations = bundle.violations_on_initial();
    for (index, player) in scenario.players.iter().enumerate() {
        let violated = violations.get(index).copied().unwrap_or(0);
        println!(
            "  Player {} (voice: {}) [{}/{} violated on initial board]",
            player.id,
            player.voice,
            violated,
            player.constraints.len()
        );
        for (rule_index, (condition, candidate)) in player
            .constraints
            .iter()
            .zip(&bundle.assignments[index])
            .enumerate()
        {
            let status = if candidate.constraint.eval(&bundle.initial) {
                "ok"
            } else {
                "violated"
            };
            println!("    {}. {}  [{status}]", rule_index + 1, condition.text);
        }
    }
    println!();

    println!(
        "PERTURBATION LOG ({} moves, initial -> solution)",
        scenario.perturbation_log.len()
    );
    if scenario.perturbation_log.is_empty() {
        println!("  (no perturbations applied)");
    }
    for (index, line) in scenario.perturbation_log.iter().enumerate() {
        println!("  {}. {line}", index + 1);
    }
    println!();

    print_verification(bundle);
    print_statistics(bundle);
}

fn print_board(label: &str, board: &BoardView) {
    println!("{label}");
    for floor in ["upstairs", "downstairs"] {
        let names = match board.layout.get(floor) {
            Some(names) => names,
            None => continue,
        };
        let rooms: Vec<&RoomView> = names
            .iter()
            .filter_map(|name| board.rooms.iter().find(|room| &room.name == name))
            .collect();
        let separator = format!(
            "+{}+{}+",
            "-".repeat(COLUMN_WIDTH),
            "-".repeat(COLUMN_WIDTH)
        );
        println!("  {}", floor.to_uppercase());
        println!("  {separator}");
        println!("  {}", grid_line(&rooms, header_cell));
        println!("  {}", grid_line(&rooms, |room| slot_cell("Lamp", room.lamp)));
        println!(
            "  {}",
            grid_line(&rooms, |room| slot_cell("Wall Hanging", room.wall_hanging))
        );
        println!(
            "  {}",
            grid_line(&rooms, |room| slot_cell("Curio", room.curio))
        );
        println!("  {separator}");
    }
    println!();
}

fn grid_line(rooms: &[&RoomView], cell: impl Fn(&RoomView) -> String) -> String {
    let cells: Vec<String> = rooms
        .iter()
        .map(|room| format!("{:<width$}", cell(room), width = COLUMN_WIDTH))
        .collect();
    format!("|{}|", cells.join("|"))
}

fn header_cell(room: &RoomView) -> String {
    format!(" {} [{} walls]", room.name, room.wall_color)
}

fn slot_cell(label: &str, token: Option<TokenView>) -> String {
    match token {
        Some(token) => format!("   {label}: {} {}", token.style, token.color),
        None => format!("   {label}: (empty)"),
    }
}

fn print_verification(bundle: &ScenarioBundle) {
    println!("VERIFICATION");
    let mut total = 0;
    let mut broken_on_solution = 0;
    for rules in &bundle.assignments {
        for candidate in rules {
            total += 1;
            if !candidate.constraint.eval(&bundle.solution) {
                broken_on_solution += 1;
            }
        }
    }
    if broken_on_solution == 0 {
        println!("  all {total} conditions satisfied by the solution");
    } else {
        println!("  {broken_on_solution}/{total} conditions FAIL on the solution");
    }
    let violations = bundle.violations_on_initial();
    let summary: Vec<String> = violations
        .iter()
        .enumerate()
        .map(|(player, count)| format!("P{}={count}", player + 1))
        .collect();
    let everyone_starts_broken = violations.iter().all(|count| *count >= 1);
    println!(
        "  violations on initial board: {}{}",
        summary.join(", "),
        if everyone_starts_broken {
            ""
        } else {
            "  (warning: some players start fulfilled)"
        }
    );
    println!();
}

fn print_statistics(bundle: &ScenarioBundle) {
    println!("STATISTICS");
    println!("  solution objects: {}", bundle.solution.total_objects());
    println!("  initial objects:  {}", bundle.initial.total_objects());
    println!("  perturbation moves: {}", bundle.moves.len());
    let mut kind_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for rules in &bundle.assignments {
        for candidate in rules {
            *kind_counts.entry(candidate.constraint.kind_label()).or_default() += 1;
        }
    }
    let kinds: Vec<String> = kind_counts
        .iter()
        .map(|(kind, count)| format!("{kind}={count}"))
        .collect();
    println!("  condition kinds: {}", kinds.join(", "));
}
