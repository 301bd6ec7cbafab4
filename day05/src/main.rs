
use {
    std::io::{BufRead, Write},
    anyhow::{anyhow, Context, Result},
    clap::Parser,
    log::warn,
    intcode::{VM, VMResult, Word, parse_program, run_vm},
};

/// Day 5: Sunny with a Chance of Asteroids
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Prompt for input on stdin instead of running the two diagnostics
    #[arg(long)]
    interactive: bool,
}

/// Runs the diagnostic for one system ID. Every output but the last is a test
/// result that should be zero; the last is the diagnostic code.
fn diagnose(program: &[Word], system_id: Word) -> Result<Word> {
    let output = run_vm(program.to_vec(), vec![system_id])?;
    let (code, tests) = output.split_last()
        .ok_or_else(|| anyhow!("no diagnostic code produced"))?;

    for (index, result) in tests.iter().enumerate() {
        if *result != 0 {
            warn!("system {}: test {} failed with {}", system_id, index, result);
        }
    }

    Ok(*code)
}

fn interact(program: Vec<Word>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut vm = VM::new(program);
    loop {
        match vm.run()? {
            VMResult::Output(out) => { println!("{}", out); }
            VMResult::WaitInput => {
                print!("> ");
                std::io::stdout().flush()?;
                let line = lines.next()
                    .ok_or_else(|| anyhow!("stdin closed while program wanted input"))?
                    .context("reading stdin")?;
                let value: Word = line.trim().parse()
                    .with_context(|| format!("parsing input {:?}", line))?;
                vm.feed_input(value)?;
            }
            VMResult::Stopped => { break; }
        }
    }
    Ok(())
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let program = parse_program(&input).context("loading program")?;

    if args.interactive {
        return interact(program);
    }

    println!("Part 1: diagnostic code {}", diagnose(&program, 1)?);
    println!("Part 2: diagnostic code {}", diagnose(&program, 5)?);

    Ok(())
}
