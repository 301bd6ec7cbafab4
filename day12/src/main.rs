
use {
    std::ops::{Add, Sub, AddAssign, SubAssign},
    anyhow::{anyhow, ensure, Context, Result},
    clap::Parser,
    log::{debug, info},
    scan_fmt::scan_fmt,
};

/// Day 12: The N-Body Problem
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Steps to simulate before measuring energy
    #[arg(long, default_value_t = 1000)]
    steps: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct V3 {
    x: i32,
    y: i32,
    z: i32
}

impl V3 {
    fn new(x: i32, y: i32, z: i32) -> V3 {
        V3 { x, y, z }
    }

    fn map(self, f: impl Fn(i32) -> i32) -> V3 {
        V3 { x: f(self.x), y: f(self.y), z: f(self.z) }
    }

    fn map2(self, rhs: V3, f: impl Fn(i32, i32) -> i32) -> V3 {
        V3 { x: f(self.x, rhs.x), y: f(self.y, rhs.y), z: f(self.z, rhs.z) }
    }

    fn manhattan(self) -> i32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

impl std::str::FromStr for V3 {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<V3> {
        let (x, y, z) = scan_fmt!(s, "<x={d}, y={d}, z={d}>", i32, i32, i32)
            .map_err(|e| anyhow!("bad moon position {:?}: {}", s, e))?;
        Ok(V3::new(x, y, z))
    }
}

impl Add for V3 {
    type Output = V3;
    fn add(self, rhs: V3) -> V3 {
        self.map2(rhs, |a, b| a + b)
    }
}

impl AddAssign for V3 {
    fn add_assign(&mut self, rhs: V3) {
        *self = *self + rhs;
    }
}

impl Sub for V3 {
    type Output = V3;
    fn sub(self, rhs: V3) -> V3 {
        self.map2(rhs, |a, b| a - b)
    }
}

impl SubAssign for V3 {
    fn sub_assign(&mut self, rhs: V3) {
        *self = *self - rhs;
    }
}

// anything a moon can move through: the full 3-space or a single axis
trait MoonCoord: AddAssign + SubAssign + Sized + Copy + Eq {
    fn gravity(self, rhs: Self) -> Self;
}

impl MoonCoord for V3 {
    fn gravity(self, rhs: V3) -> V3 {
        (rhs - self).map(i32::signum)
    }
}

impl MoonCoord for i32 {
    fn gravity(self, rhs: i32) -> i32 {
        (rhs - self).signum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Moon<X: MoonCoord> {
    pub pos: X,
    pub vel: X
}

impl Moon<V3> {
    fn at_rest(pos: V3) -> Self {
        Moon { pos, vel: V3::default() }
    }

    fn energy(&self) -> i32 {
        self.pos.manhattan() * self.vel.manhattan()
    }
}

fn parse_moons(input: &str) -> Result<Vec<Moon<V3>>> {
    input.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse().map(Moon::at_rest))
        .collect()
}

fn step<X: MoonCoord>(moons: &mut [Moon<X>]) {
    for index_a in 0..moons.len() {
        for index_b in index_a + 1 .. moons.len() {
            let g = moons[index_a].pos.gravity(moons[index_b].pos);
            moons[index_a].vel += g;
            moons[index_b].vel -= g;
        }
    }

    for moon in moons.iter_mut() {
        moon.pos += moon.vel;
    }
}

fn total_energy(initial: &[Moon<V3>], steps: usize) -> i32 {
    let mut moons = initial.to_vec();
    for _ in 0..steps {
        step(&mut moons);
    }
    moons.iter().map(Moon::energy).sum()
}

// the simulation is reversible, so the first repeated state is always the initial one
fn steps_to_repeat(mut moons: Vec<Moon<i32>>) -> u64 {
    let first = moons.clone();
    let mut steps = 0;
    loop {
        step(&mut moons);
        steps += 1;
        if moons == first { return steps; }
    }
}

fn steps_to_repeat_axis(initial: &[Moon<V3>], f: impl Fn(V3) -> i32) -> u64 {
    let moons = initial.iter()
        .map(|moon| Moon { pos: f(moon.pos), vel: f(moon.vel) })
        .collect();
    steps_to_repeat(moons)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}

/// Axes evolve independently, so the whole system repeats at the lcm of their periods.
fn steps_to_repeat_all(initial: &[Moon<V3>]) -> u64 {
    let x = steps_to_repeat_axis(initial, |v| v.x);
    let y = steps_to_repeat_axis(initial, |v| v.y);
    let z = steps_to_repeat_axis(initial, |v| v.z);
    debug!("axis periods: x {} y {} z {}", x, y, z);
    lcm(x, lcm(y, z))
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let moons = parse_moons(&input).context("parsing moons")?;
    ensure!(!moons.is_empty(), "no moons in input");
    info!("{} moons", moons.len());

    println!("Part 1: total energy after {} steps: {}", args.steps, total_energy(&moons, args.steps));
    println!("Part 2: steps to repeat: {}", steps_to_repeat_all(&moons));

    Ok(())
}
