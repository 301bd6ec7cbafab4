
use {
    anyhow::Result,
    clap::Parser,
};

/// Day 1: The Tyranny of the Rocket Equation
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

fn fuel(mass: i32) -> i32 {
    mass / 3 - 2
}

// fuel for the module, then fuel for that fuel, until it rounds down to nothing
fn fuel_for_mass(mass: i32) -> i32 {
    std::iter::successors(
        Some(mass),
        |load| {
            let requirement = fuel(*load);
            if requirement > 0 { Some(requirement) }
            else               { None }
        }
    ).skip(1).sum::<i32>()
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let masses: Vec<i32> = aoc_common::parse_lines(&input)?;
    log::info!("{} modules", masses.len());

    let part1: i32 = masses.iter().copied().map(fuel).sum();
    println!("Part 1: fuel for modules: {}", part1);

    let part2: i32 = masses.iter().copied().map(fuel_for_mass).sum();
    println!("Part 2: fuel including fuel: {}", part2);

    Ok(())
}
