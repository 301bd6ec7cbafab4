
use {
    anyhow::{anyhow, ensure, Result},
    clap::Parser,
    log::{debug, trace},
};

/// Day 16: Flawed Frequency Transmission
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Phases of FFT to apply
    #[arg(long, default_value_t = 100)]
    phases: usize,
}

const REPEATS: usize = 10_000;

fn parse_digits(string: &str) -> Result<Vec<i32>> {
    string.chars()
        .map(|c| c.to_digit(10)
            .map(|d| d as i32)
            .ok_or_else(|| anyhow!("{:?} isn't a digit", c)))
        .collect()
}

fn format_digits(digits: &[i32]) -> String {
    digits.iter()
        .map(|d| char::from(b'0' + *d as u8))
        .collect()
}

// element i of the output uses the pattern 0,1,0,-1 with each entry repeated i+1 times,
// skipping the very first entry. So it adds runs of i+1 digits starting at i, 4(i+1) apart,
// and subtracts the runs starting 2(i+1) after those.
fn phase(digits: &[i32]) -> Vec<i32> {
    let n = digits.len();
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0i64);
    for d in digits.iter() {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + *d as i64);
    }
    let run_sum = |start: usize, len: usize| -> i64 {
        if start >= n { return 0; }
        prefix[(start + len).min(n)] - prefix[start]
    };

    (0..n)
        .map(|i| {
            let width = i + 1;
            let mut total = 0;
            let mut start = i;
            while start < n {
                total += run_sum(start, width);
                total -= run_sum(start + 2 * width, width);
                start += 4 * width;
            }
            (total.abs() % 10) as i32
        })
        .collect()
}

fn fft(digits: &[i32], phases: usize) -> Vec<i32> {
    let mut state = digits.to_vec();
    for pass in 1..=phases {
        state = phase(&state);
        trace!("phase {}: {}", pass, format_digits(&state[..state.len().min(8)]));
    }
    state
}

/// The eight digits at the offset given by the first seven, after running the
/// signal repeated ten thousand times through `phases` phases.
///
/// Past the midpoint the pattern is all zeros then all ones, so each digit is just the
/// sum of itself and everything after it. Only that half is ever computed.
fn decode_message(digits: &[i32], phases: usize) -> Result<Vec<i32>> {
    ensure!(digits.len() >= 7, "signal too short to hold an offset");
    let offset = digits[0..7].iter()
        .fold(0, |s, d| s * 10 + *d as usize);
    let total = digits.len() * REPEATS;
    debug!("message offset {} in {} digits", offset, total);

    ensure!(offset + 8 <= total, "message offset {} past the end of the signal", offset);
    ensure!(offset >= total / 2, "message offset {} is in the first half of the signal", offset);

    let mut tail: Vec<i32> = digits.iter()
        .copied()
        .cycle()
        .take(total)
        .skip(offset)
        .collect();

    for _ in 0..phases {
        let mut sum = 0;
        for d in tail.iter_mut().rev() {
            sum = (sum + *d) % 10;
            *d = sum;
        }
    }

    Ok(tail[..8].to_vec())
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let digits = parse_digits(input.trim())?;
    ensure!(digits.len() >= 8, "signal has only {} digits", digits.len());

    let result = fft(&digits, args.phases);
    println!("Part 1: {}", format_digits(&result[0..8]));

    let message = decode_message(&digits, args.phases)?;
    println!("Part 2: {}", format_digits(&message));

    Ok(())
}
