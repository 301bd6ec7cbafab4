
use {
    std::collections::{HashSet, HashMap},
    anyhow::{anyhow, Result},
    clap::Parser,
    log::debug,
};

/// Day 10: Monitoring Station
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Which vaporisation to report for part 2
    #[arg(long, default_value_t = 200)]
    nth: usize,
}

type Roid = (i32, i32);

// euclidean algorithm, for reducing ratios
fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

// reduce a integer vector v into
// - d: a direction (in lowest terms)
// - k: a factor for this direction
// such that v = kd
struct Relative {
    pub direction: (i32, i32),
    pub factor:    i32,
}

fn relative(x: i32, y: i32) -> Option<Relative> {
    if x == 0 && y == 0 {
        return None;
    }

    let factor = gcd(x.abs(), y.abs());
    let direction = (x / factor, y / factor);
    Some(Relative { direction, factor })
}

// clockwise angle from "up", for x-right, y-down coords
fn bearing(x: i32, y: i32) -> f64 {
    let x = x as f64;
    let y = y as f64;
    let raw = x.atan2(-y);
    if raw < 0. { raw + 2. * std::f64::consts::PI }
    else        { raw }
}

fn parse_roids(input: &str) -> Vec<Roid> {
    input.lines()
        .enumerate()
        .flat_map(|(y, line)| {
            line.chars()
                .enumerate()
                .filter(|(_, ch)| *ch == '#')
                .map(move |(x, _)| (x as i32, y as i32))
        })
        .collect()
}

/// The asteroid with line of sight to the most others, and that count.
fn best_station(roids: &[Roid]) -> Option<(Roid, usize)> {
    roids.iter()
        .map(|(cx, cy)| {
            let directions: HashSet<_> = roids.iter()
                .filter_map(|(rx, ry)| relative(rx - cx, ry - cy).map(|r| r.direction))
                .collect();
            ((*cx, *cy), directions.len())
        })
        .max_by_key(|(_, num_directions)| *num_directions)
}

fn vaporisation_order(roids: &[Roid], (station_x, station_y): Roid) -> Vec<Roid> {
    // map each roid according to its direction from the station
    let mut map: HashMap<(i32, i32), Vec<(i32, Roid)>> = HashMap::new();

    roids.iter()
        .filter_map(|(rx, ry)|
            relative(rx - station_x, ry - station_y)
                .map(|rel| (rel, (*rx, *ry)))
        )
        .for_each(|(rel, roid)| {
            map.entry(rel.direction)
                .or_default()
                .push((rel.factor, roid));
        });

    // for each direction, sort the roids along it by increasing distance
    for roids in map.values_mut() {
        roids.sort_by_key(|(factor, _)| *factor);
    }

    // key each roid by total angle turned through by laser,
    // i.e. its bearing + a full turn for each roid occluding it
    let mut vec: Vec<(f64, Roid)> = map.iter()
        .flat_map(|((dx, dy), roids)| {
            let theta = bearing(*dx, *dy);
            roids.iter()
                .enumerate()
                .map(move |(rank, (_, roid))|
                    (rank as f64 * 2. * std::f64::consts::PI + theta, *roid)
                )
        })
        .collect();

    vec.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    vec.into_iter().map(|(_, roid)| roid).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = ".#..#\n.....\n#####\n....#\n...##\n";

    const LARGE: &str = "\
.#..##.###...#######
##.############..##.
.#.######.########.#
.###.#######.####.#.
#####.##.#.##.###.##
..#####..#.#########
####################
#.####....###.#.#.##
##.#################
#####.##.###..####..
..######..##.#######
####.##.####...##..#
.#####..#.######.###
##...#.##########...
#.##########.#######
.####.#.###.###.#.##
....##.##.###..#####
.#.#.###########.###
#.#.#.#####.####.###
###.##.####.##.#..##
";

    #[test]
    fn test_bearing() {
        assert!((bearing( 1,  1) - 3. * std::f64::consts::FRAC_PI_4).abs() < 0.00001);
        assert!((bearing( 1, -1) -      std::f64::consts::FRAC_PI_4).abs() < 0.00001);
        assert!((bearing(-1, -1) - 7. * std::f64::consts::FRAC_PI_4).abs() < 0.00001);
        assert!((bearing(-1,  1) - 5. * std::f64::consts::FRAC_PI_4).abs() < 0.00001);

        assert!((bearing( 0, -1)                                   ).abs() < 0.00001);
        assert!((bearing( 1,  0) -      std::f64::consts::FRAC_PI_2).abs() < 0.00001);
        assert!((bearing( 0,  1) - 2. * std::f64::consts::FRAC_PI_2).abs() < 0.00001);
        assert!((bearing(-1,  0) - 3. * std::f64::consts::FRAC_PI_2).abs() < 0.00001);
    }

    #[test]
    fn test_relative() {
        let r = relative(-4, 6).unwrap();
        assert_eq!(r.direction, (-2, 3));
        assert_eq!(r.factor, 2);
        assert_eq!(relative(0, -5).unwrap().direction, (0, -1));
        assert!(relative(0, 0).is_none());
    }

    #[test]
    fn test_small() {
        let roids = parse_roids(SMALL);
        assert_eq!(best_station(&roids), Some(((3, 4), 8)));
    }

    #[test]
    fn test_large() {
        let roids = parse_roids(LARGE);
        let (station, count) = best_station(&roids).unwrap();
        assert_eq!((station, count), ((11, 13), 210));

        let order = vaporisation_order(&roids, station);
        assert_eq!(order.len(), roids.len() - 1);
        assert_eq!(order[0],   (11, 12));
        assert_eq!(order[1],   (12, 1));
        assert_eq!(order[2],   (12, 2));
        assert_eq!(order[199], (8, 2));
        assert_eq!(order[298], (11, 1));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let roids = parse_roids(&input);
    debug!("{} asteroids", roids.len());

    let (station, best_count) = best_station(&roids)
        .ok_or_else(|| anyhow!("no asteroids in the map"))?;
    println!("Part 1: {} from ({} {})", best_count, station.0, station.1);

    let order = vaporisation_order(&roids, station);
    let (x, y) = order.get(args.nth.wrapping_sub(1)).copied()
        .ok_or_else(|| anyhow!("only {} asteroids to vaporise", order.len()))?;
    println!("Part 2: ({} {}) = {}", x, y, x * 100 + y);

    Ok(())
}
