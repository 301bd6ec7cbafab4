
use {
    anyhow::{anyhow, Context, Result},
    clap::Parser,
    itertools::Itertools,
    log::debug,
    rayon::prelude::*,
    intcode::{Word, parse_program, network::{run_chain, run_feedback}},
};

/// Day 7: Amplification Circuit
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

type Circuit = fn(&[Word], &[Word], Word) -> Result<Option<Word>, intcode::Error>;

/// Tries every ordering of `phases`, returning the best ordering and its signal.
fn best_settings(program: &[Word], phases: &[Word], circuit: Circuit)
    -> Result<(Vec<Word>, Word)>
{
    let orderings: Vec<Vec<Word>> = phases.iter()
        .copied()
        .permutations(phases.len())
        .collect();

    let results = orderings.into_par_iter()
        .map(|settings| -> Result<(Vec<Word>, Word)> {
            let signal = circuit(program, &settings, 0)?
                .ok_or_else(|| anyhow!("amplifiers produced no signal for {:?}", settings))?;
            debug!("{:?} -> {}", settings, signal);
            Ok((settings, signal))
        })
        .collect::<Result<Vec<_>>>()?;

    results.into_iter()
        .max_by_key(|(_, signal)| *signal)
        .ok_or_else(|| anyhow!("no phase settings to try"))
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let program = parse_program(&input).context("loading program")?;

    let (settings, signal) = best_settings(&program, &[0, 1, 2, 3, 4], run_chain)?;
    println!("Part 1: best settings {:?}, signal {}", settings, signal);

    let (settings, signal) = best_settings(&program, &[5, 6, 7, 8, 9], run_feedback)?;
    println!("Part 2: best settings {:?}, signal {}", settings, signal);

    Ok(())
}
