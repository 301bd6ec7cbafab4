
use {
    anyhow::{ensure, Result},
    clap::Parser,
    log::debug,
};

/// Day 4: Secure Container
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Lowest candidate password
    low: u32,

    /// Highest candidate password
    high: u32,
}

// every `length`-digit number whose digits never decrease, each digit >= `from`,
// in ascending order
fn nondecreasing(from: u32, length: u32) -> Box<dyn Iterator<Item = u32>> {
    assert!(length > 0);
    Box::new((from ..= 9)
        .flat_map(move |dig| -> Box<dyn Iterator<Item = u32>> {
            let head = dig * 10u32.pow(length-1);
            if length > 1 {
                Box::new(nondecreasing(dig, length - 1).map(move |tail| head + tail))
            }
            else {
                Box::new(std::iter::once(head))
            }
        }))
}

fn candidates(low: u32, high: u32) -> impl Iterator<Item = String> {
    nondecreasing(0, 6)
        .skip_while(move |guess| *guess <  low)
        .take_while(move |guess| *guess <= high)
        .map(|guess| format!("{:06}", guess))
}

fn has_pair(guess: &str) -> bool {
    let bytes = guess.as_bytes();
    bytes.windows(2).any(|w| w[0] == w[1])
}

// a run of exactly two equal digits somewhere
fn has_strict_pair(guess: &str) -> bool {
    guess.chars()
        .fold(None, |state, cur| match state {
            None => Some((cur, 1, false)),
            Some((prev, run, found)) =>
                if prev == cur { Some((cur, run+1, found            )) }
                else           { Some((cur, 1,     found || run == 2)) }
        })
        .map(|(_, run, found)| found || run == 2)
        .unwrap_or(false)
}


fn main() -> Result<()> {
    let args = Args::parse();
    aoc_common::init_logging(args.common.verbose);
    ensure!(args.low <= args.high, "empty range {}-{}", args.low, args.high);
    ensure!(args.high < 1_000_000, "passwords are six digits");
    debug!("{} nondecreasing candidates in range", candidates(args.low, args.high).count());

    let part1 = candidates(args.low, args.high)
        .filter(|guess| has_pair(guess))
        .count();
    println!("Part 1: {} possible codes", part1);

    let part2 = candidates(args.low, args.high)
        .filter(|guess| has_strict_pair(guess))
        .count();
    println!("Part 2: {} possible codes", part2);

    Ok(())
}
