//! The `pastsynth` binary (§0.1/§6): parses CLI arguments, drives a solver
//! or the random-formula generator, and reports results on stdout/stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use pastsynth::logic::Alphabet;
use pastsynth::options::{CliOptions, Command, TraceLevel};
use pastsynth::solver::{ClassicSolver, Never};
use pastsynth::{encoder, qbf, random, solve, spec::Spec, Algorithm};

fn main() -> ExitCode {
    let options = CliOptions::parse();
    initialize_logging(options.trace);

    match run(options.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(io::stderr(), "pastsynth: error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn initialize_logging(level: TraceLevel) {
    let _ = env_logger::builder()
        .filter(None, level.into())
        .format_timestamp_millis()
        .try_init();
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Solve { algorithm, formula, ins } => run_solve(algorithm, &formula, &ins),
        Command::Random { n_formulas, n_vars, size, seed } => {
            run_random(n_formulas, n_vars, size, seed);
            Ok(())
        }
        Command::Clausify { algorithm, formula, ins } => run_clausify(algorithm, &formula, &ins),
    }
}

fn run_solve(algorithm: Algorithm, formula: &str, ins: &[String]) -> Result<(), String> {
    let declared: Vec<&str> = ins.iter().map(String::as_str).collect();
    let status = solve(formula, &declared, algorithm, &Never).map_err(|e| e.to_string())?;
    println!("{}", status);
    Ok(())
}

fn run_random(n_formulas: usize, n_vars: usize, size: usize, seed: u64) {
    for line in random::random_lines(n_formulas, n_vars, size, seed) {
        println!("{}", line);
    }
}

fn run_clausify(algorithm: Algorithm, formula: &str, ins: &[String]) -> Result<(), String> {
    if algorithm == Algorithm::Bdd {
        log::warn!("clausify ignores the chosen algorithm and always encodes the classic solver's test formula");
    }

    let sigma = Alphabet::new();
    let declared: Vec<String> = ins.to_vec();
    let parsed = Spec::parse(&sigma, formula, &declared).map_err(|e| e.to_string())?;
    let aut = encoder::encode(&sigma, &parsed);

    let solver = ClassicSolver::new();
    let first_test = solver.first_test_formula(&sigma, &aut, parsed.game_type);

    let prenexed = qbf::prenex(&first_test);
    let qdimacs = qbf::tseitin_qdimacs(&prenexed);
    print!("{}", qdimacs);
    Ok(())
}
