use shakmaty::Color;
use std::env;
use std::process;

use whatthemove_core::{analyze, parse_pgn_file, Result};

mod render;

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let path = args.iter().skip(1).find(|a| !a.starts_with("--"));

    let Some(path) = path else {
        print_usage(&args[0]);
        process::exit(1);
    };

    if let Err(e) = run(path, json) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <pgn_file> [--json]", program);
    println!();
    println!("Replays the game and prints the tactical motifs found after each");
    println!("move, from both White's and Black's perspective.");
}

fn run(path: &str, json: bool) -> Result<()> {
    let games = parse_pgn_file(path)?;

    let mut documents = Vec::new();
    for (index, game) in games.iter().enumerate() {
        if !json {
            println!("================================================================");
            println!("Game {}: {}", index + 1, game.summary());
            println!("================================================================");
            println!();
        }

        let mut moves = Vec::new();
        for ply in game.replay()? {
            let mut position = ply.position.clone();
            let white = analyze(&mut position, Color::White, ply.move_number)?;
            let black = analyze(&mut position, Color::Black, ply.move_number)?;

            if json {
                moves.push(serde_json::json!({
                    "ply": ply.ply,
                    "move_number": ply.move_number,
                    "san": ply.san,
                    "white": white,
                    "black": black,
                }));
            } else {
                println!("{}", render::markdown(&position, &white, &ply.san));
                println!();
                println!("{}", render::markdown(&position, &black, &ply.san));
                println!();
            }
        }

        if json {
            documents.push(serde_json::json!({
                "game": index + 1,
                "summary": game.summary(),
                "moves": moves,
            }));
        }
    }

    if json {
        let out = serde_json::Value::Array(documents);
        println!("{}", serde_json::to_string_pretty(&out).expect("valid JSON value"));
    }
    Ok(())
}
