//! Evolve a phrase from random noise, printing progress in the classic
//! three-line format: target, diff markers, best candidate with its score.
//!
//! Usage: `cargo run --example string_search -- "some target" [mutation-rate]`

use std::env;
use std::process;

use weasel_ga::engine::{Engine, RunOutcome};
use weasel_ga::SearchConfig;

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let target = args
        .next()
        .unwrap_or_else(|| "methinks it is like a weasel".to_string());
    let mutation_rate: f32 = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(rate) => rate,
            Err(_) => {
                eprintln!("mutation rate must be a float, got {raw:?}");
                process::exit(2);
            }
        },
        None => 0.01,
    };

    let config = match SearchConfig::new(target.as_str(), mutation_rate) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let mut engine = Engine::new(config, rand::random());
    let outcome = engine.run(|report| {
        // Repaint in place rather than scrolling.
        print!("\x1b[2J\x1b[H");
        println!("gen: {:>6} {}", report.generation, report.target);
        println!("gen: {:>6} {}", report.generation, report.diff);
        println!(
            "gen: {:>6} {} {:.3}\n",
            report.generation, report.best, report.score
        );
    });

    match outcome {
        RunOutcome::Converged { generation, best } => {
            println!("matched {best} in {generation} generations");
        }
        RunOutcome::GenerationCapReached { generation, best } => {
            println!("gave up at generation {generation}, best was {best}");
        }
    }
}
