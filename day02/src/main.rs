
use {
    anyhow::{anyhow, Context, Result},
    clap::Parser,
    log::debug,
    intcode::{VM, VMResult, Word, parse_program},
};

/// Day 2: 1202 Program Alarm
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Value address 0 must hold for part 2
    #[arg(long, default_value_t = 19690720)]
    target: Word,
}

fn run_with(program: &[Word], noun: Word, verb: Word) -> Result<Word> {
    let mut vm = VM::new(program.to_vec());
    vm.poke(1, noun);
    vm.poke(2, verb);
    match vm.run()? {
        VMResult::Stopped => Ok(vm.peek(0)),
        other             => Err(anyhow!("program didn't halt cleanly: {:?}", other)),
    }
}

fn find_inputs(program: &[Word], target: Word) -> Result<Option<(Word, Word)>> {
    for noun in 0 ..= 99 {
        for verb in 0 ..= 99 {
            // some combinations run off into garbage; those just aren't the answer
            match run_with(program, noun, verb) {
                Ok(output) if output == target => return Ok(Some((noun, verb))),
                Ok(_)                          => { }
                Err(err) => debug!("noun {} verb {}: {}", noun, verb, err),
            }
        }
    }
    Ok(None)
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let program = parse_program(&input).context("loading program")?;

    let baseline = run_with(&program, 12, 2)?;
    println!("Part 1: location 0 after baseline execution: {}", baseline);

    let (noun, verb) = find_inputs(&program, args.target)?
        .ok_or_else(|| anyhow!("no noun/verb combination produces {}", args.target))?;
    println!("Part 2: noun {}, verb {} (answer: {})", noun, verb, 100 * noun + verb);

    Ok(())
}
