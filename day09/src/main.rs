
use {
    anyhow::{Context, Result},
    clap::Parser,
    log::warn,
    intcode::{Word, run_vm, parse_program},
};

/// Day 9: Sensor Boost
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

fn format_output(output: &[Word]) -> String {
    output.iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

// test mode reports malfunctioning opcodes before the keycode
fn boost(program: &[Word], mode: Word) -> Result<Vec<Word>> {
    let output = run_vm(program.to_vec(), vec![mode])
        .with_context(|| format!("running BOOST in mode {}", mode))?;
    if output.len() > 1 {
        warn!("mode {} reported malfunctions: {}", mode, format_output(&output));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_echoes_mode() {
        // read mode into a far-off relative address, then print it
        let program = vec![109,1000,203,24,204,24,99];
        assert_eq!(boost(&program, 1).unwrap(), vec![1]);
        assert_eq!(boost(&program, 2).unwrap(), vec![2]);
    }

    #[test]
    fn test_format_output() {
        assert_eq!(format_output(&[203, 0]), "203,0");
        assert_eq!(format_output(&[]), "");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let program = parse_program(&input).context("loading program")?;

    println!("Part 1: {}", format_output(&boost(&program, 1)?));
    println!("Part 2: {}", format_output(&boost(&program, 2)?));

    Ok(())
}
