
use {
    std::collections::{HashMap, HashSet},
    anyhow::{anyhow, bail, ensure, Context, Result},
    clap::Parser,
    log::debug,
    once_cell::sync::Lazy,
    regex::Regex,
};

/// Day 14: Space Stoichiometry
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Ore in the cargo hold for part 2
    #[arg(long, default_value_t = 1_000_000_000_000)]
    ore: i64,
}

const ORE:  &str = "ORE";
const FUEL: &str = "FUEL";

static REAGENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+) (\w+)$").unwrap());

type Multiple<'a> = (i64, &'a str);
type Equations<'a> = HashMap<&'a str, (i64, Vec<Multiple<'a>>)>;

fn parse_multiple(raw: &str) -> Result<Multiple<'_>> {
    let caps = REAGENT.captures(raw.trim())
        .ok_or_else(|| anyhow!("bad reagent {:?}", raw))?;
    let (_, [count, name]) = caps.extract();
    let count: i64 = count.parse()?;
    ensure!(count > 0, "zero quantity of {}", name);
    Ok((count, name))
}

fn parse_equations(input: &str) -> Result<Equations<'_>> {
    let mut eqns = Equations::new();
    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (reqs_part, prod_part) = line.split_once("=>")
            .ok_or_else(|| anyhow!("reaction without '=>': {:?}", line))?;
        let reqs = reqs_part.split(',')
            .map(parse_multiple)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("in reaction {:?}", line))?;
        let (count, product) = parse_multiple(prod_part)
            .with_context(|| format!("in reaction {:?}", line))?;
        if eqns.insert(product, (count, reqs)).is_some() {
            bail!("more than one reaction makes {}", product);
        }
    }

    // everything but ore has to come from somewhere
    for (_, reqs) in eqns.values() {
        for (_, name) in reqs {
            ensure!(*name == ORE || eqns.contains_key(name), "no reaction makes {}", name);
        }
    }
    ensure!(eqns.contains_key(FUEL), "no reaction makes {}", FUEL);
    check_acyclic(&eqns)?;

    Ok(eqns)
}

// peel off reactions whose inputs are all resolved; whatever is left feeds itself
fn check_acyclic(eqns: &Equations<'_>) -> Result<()> {
    let mut resolved: HashSet<&str> = HashSet::new();
    resolved.insert(ORE);

    loop {
        let ready: Vec<&str> = eqns.iter()
            .filter(|(name, _)| !resolved.contains(*name))
            .filter(|(_, (_, reqs))| reqs.iter().all(|(_, req)| resolved.contains(req)))
            .map(|(name, _)| *name)
            .collect();
        if ready.is_empty() { break; }
        resolved.extend(ready);
    }

    match eqns.keys().find(|name| !resolved.contains(*name)) {
        Some(name) => bail!("making {} needs a cycle of reactions", name),
        None       => Ok(()),
    }
}

// negative stock is owed; run reactions until only ore is owed, keeping leftovers
fn refine<'a>(
    stock: &mut HashMap<&'a str, i64>,
    eqns: &Equations<'a>)
{
    loop {
        let mut delta: HashMap<&'a str, i64> = HashMap::new();

        for (name, deficit) in stock.iter().filter(|(_, count)| **count < 0) {
            let (prod_factor, reqs) = if let Some(eqn) = eqns.get(name) {
                eqn
            }
            else {
                continue;
            };

            let runs = (deficit.abs() + prod_factor - 1) / prod_factor;

            for (req_factor, req) in reqs.iter() {
                *delta.entry(req).or_insert(0) -= runs * req_factor;
            }

            *delta.entry(name).or_insert(0) += runs * prod_factor;
        }

        if delta.is_empty() { break; }

        for (name, count) in delta.iter() {
            *stock.entry(name).or_insert(0) += count;
        }
    }
}

fn get_ore_required<'a>(eqns: &Equations<'a>, name: &'a str, need: i64) -> i64 {
    let mut stock = HashMap::new();
    stock.insert(name, -need);
    refine(&mut stock, eqns);
    -stock.get(ORE).copied().unwrap_or(0)
}

/// Most fuel that can be made from `total_ore`.
fn max_fuel(eqns: &Equations<'_>, total_ore: i64) -> i64 {
    let per_fuel = get_ore_required(eqns, FUEL, 1);
    if per_fuel <= 0 || per_fuel > total_ore {
        return 0;
    }

    // leftovers only help, so this many is always affordable
    let mut lo = total_ore / per_fuel;
    let mut hi = lo * 2;
    while get_ore_required(eqns, FUEL, hi) <= total_ore {
        lo = hi;
        hi *= 2;
    }

    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        let ore = get_ore_required(eqns, FUEL, mid);
        debug!("{} fuel needs {} ore", mid, ore);
        if ore <= total_ore { lo = mid; }
        else                { hi = mid; }
    }
    lo
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let eqns = parse_equations(&input)?;
    debug!("{} reactions", eqns.len());

    let ore_required = get_ore_required(&eqns, FUEL, 1);
    println!("Part 1: ore required for 1 fuel: {}", ore_required);

    let fuel = max_fuel(&eqns, args.ore);
    println!("Part 2: {} fuel for {} ore", fuel, args.ore);

    Ok(())
}
