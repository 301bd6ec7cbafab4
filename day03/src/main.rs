
use {
    anyhow::{anyhow, bail, Result},
    clap::Parser,
    log::debug,
};

/// Day 3: Crossed Wires
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct P2 { x: i32, y: i32 }

impl P2 {
    fn new(x: i32, y: i32) -> P2 {
        P2 { x, y }
    }

    fn manhattan_norm(&self) -> i32 {
        self.x.abs() + self.y.abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum V2 {
    Dx(i32),
    Dy(i32)
}

impl V2 {
    fn length(self) -> i32 {
        match self {
            V2::Dx(d) => d.abs(),
            V2::Dy(d) => d.abs()
        }
    }
}

impl std::ops::Add<V2> for P2 {
    type Output = P2;
    fn add(self, rhs: V2) -> P2 {
        match rhs {
            V2::Dx(dx) => P2::new(self.x + dx, self.y),
            V2::Dy(dy) => P2::new(self.x, self.y + dy),
        }
    }
}

impl std::ops::AddAssign<V2> for P2 {
    fn add_assign(&mut self, rhs: V2) {
        *self = *self + rhs;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seg {
    pub p: P2,
    pub d: V2
}

impl Seg {
    fn new(p: P2, d: V2) -> Seg {
        Seg { p, d }
    }
}

/// A crossing point plus how far along each segment it lies.
type Crossing = (P2, i32, i32);

mod intersections {
    use {
        std::cmp::{min, max},
        super::*,
    };

    fn span(p: i32, s: i32) -> (i32, i32) {
        (min(p, p + s), max(p, p + s))
    }

    // collinear overlap: both measures are piecewise linear along it, so ends and kinks
    // suffice. The origin gets filtered out later, hence its neighbours too.
    fn impl_parallel(pa: i32, pb: i32, sa: i32, sb: i32) -> Vec<(i32, i32, i32)> {
        let (mina, maxa) = span(pa, sa);
        let (minb, maxb) = span(pb, sb);
        let lo = max(mina, minb);
        let hi = min(maxa, maxb);
        if hi < lo { return Vec::new(); }

        let mut candidates: Vec<i32> = [lo, hi, 0, 1, -1, pa, pb].into_iter()
            .map(|c| c.clamp(lo, hi))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates.into_iter()
            .map(|c| (c, (pa - c).abs(), (pb - c).abs()))
            .collect()
    }

    fn impl_ortho(pa: i32, pb: i32, sa: i32, sb: i32, aopp: i32, bopp: i32) -> bool {
        let (mina, maxa) = span(pa, sa);
        let (minb, maxb) = span(pb, sb);
        (minb ..= maxb).contains(&aopp) && (mina ..= maxa).contains(&bopp)
    }

    pub fn intersection(a: &Seg, b: &Seg) -> Vec<Crossing> {
        use V2::*;

        match (a.d, b.d) {
            (Dx(wa), Dx(wb)) => {
                if a.p.y != b.p.y { return Vec::new(); }
                impl_parallel(a.p.x, b.p.x, wa, wb).into_iter()
                    .map(|(ix, da, db)| (P2::new(ix, a.p.y), da, db))
                    .collect()
            }
            (Dy(ha), Dy(hb)) => {
                if a.p.x != b.p.x { return Vec::new(); }
                impl_parallel(a.p.y, b.p.y, ha, hb).into_iter()
                    .map(|(iy, da, db)| (P2::new(a.p.x, iy), da, db))
                    .collect()
            }
            (Dx(wa), Dy(hb)) => {
                impl_ortho(a.p.x, b.p.y, wa, hb, a.p.y, b.p.x)
                    .then(|| (P2::new(b.p.x, a.p.y), (b.p.x-a.p.x).abs(), (a.p.y-b.p.y).abs()))
                    .into_iter()
                    .collect()
            }
            (Dy(ha), Dx(wb)) => {
                impl_ortho(a.p.y, b.p.x, ha, wb, a.p.x, b.p.y)
                    .then(|| (P2::new(a.p.x, b.p.y), (b.p.y-a.p.y).abs(), (a.p.x-b.p.x).abs()))
                    .into_iter()
                    .collect()
            }
        }
    }
}

use intersections::intersection;

fn parse_path_segment(seg: &str) -> Option<V2> {
    let dist: i32 = seg.get(1..)?.parse().ok()?;
    let vec = match seg.chars().next()? {
        'R' => V2::Dx( dist),
        'L' => V2::Dx(-dist),
        'U' => V2::Dy( dist),
        'D' => V2::Dy(-dist),
        _ => { return None; }
    };
    Some(vec)
}

/// Segments of a wire, each tagged with the wire length covered before it.
fn parse_wire(line: &str) -> Result<Vec<(i32, Seg)>> {
    let steps = line.trim()
        .split(',')
        .map(|seg| parse_path_segment(seg).ok_or_else(|| anyhow!("bad path segment {:?}", seg)))
        .collect::<Result<Vec<_>>>()?;

    Ok(steps.into_iter()
        .scan(
            (0i32, P2::new(0,0)),
            |(covered, pos), step| {
                let result = (*covered, Seg::new(*pos, step));
                *pos     += step;
                *covered += step.length();
                Some(result)
            }
        )
        .collect())
}

/// (closest crossing by distance from the port, fewest combined steps)
fn solve(wire_a: &[(i32, Seg)], wire_b: &[(i32, Seg)]) -> Option<(i32, i32)> {
    let crossings: Vec<_> = wire_a.iter()
        .flat_map(|(covered_a, seg_a)| {
            wire_b.iter()
                .flat_map(move |(covered_b, seg_b)| {
                    intersection(seg_a, seg_b)
                        .into_iter()
                        .map(move |(point, da, db)| (point, *covered_a + *covered_b + da + db))
                })
        })
        .filter(|(point, _)| *point != P2::new(0, 0))
        .collect();

    debug!("{} crossings", crossings.len());

    let nearest = crossings.iter().map(|(point, _)| point.manhattan_norm()).min()?;
    let shortest = crossings.iter().map(|(_, steps)| *steps).min()?;
    Some((nearest, shortest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_segment() {
        assert_eq!(parse_path_segment("R1" ).unwrap(), V2::Dx(  1));
        assert_eq!(parse_path_segment("L2" ).unwrap(), V2::Dx( -2));
        assert_eq!(parse_path_segment("U3" ).unwrap(), V2::Dy(  3));
        assert_eq!(parse_path_segment("D40").unwrap(), V2::Dy(-40));
        assert_eq!(parse_path_segment("X4"), None);
        assert_eq!(parse_path_segment(""), None);
    }

    fn check(a: &str, b: &str, expect: (i32, i32)) {
        let a = parse_wire(a).unwrap();
        let b = parse_wire(b).unwrap();
        assert_eq!(solve(&a, &b), Some(expect));
    }

    #[test]
    fn test_sample_wires() {
        check("R8,U5,L5,D3", "U7,R6,D4,L4", (6, 30));
        check("R75,D30,R83,U83,L12,D49,R71,U7,L72",
              "U62,R66,U55,R34,D71,R55,D58,R83",
              (159, 610));
        check("R98,U47,R26,D63,R33,U87,L62,D20,R33,U53,R51",
              "U98,R91,D20,R16,D67,R40,U7,R15,U6,R7",
              (135, 410));
    }

    #[test]
    fn test_overlap() {
        // both run along y = 2 over x in 3..=5
        check("U2,R5", "R3,U2,R4", (5, 10));
    }

    #[test]
    fn test_overlap_from_port() {
        // both leave along y = 0, so the first shared point after the port wins
        check("R5,U2", "R3,D2", (1, 2));
        check("L4,D1", "L9", (1, 2));
        check("U3,R1", "U6", (1, 2));
    }

    #[test]
    fn test_vertical_first() {
        let a = Seg::new(P2::new(2, -1), V2::Dy(5));
        let b = Seg::new(P2::new(0,  1), V2::Dx(4));
        assert_eq!(intersection(&a, &b), vec![(P2::new(2, 1), 2, 2)]);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;

    let mut wires = input.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_wire);
    let (wire_a, wire_b) = match (wires.next(), wires.next()) {
        (Some(a), Some(b)) => (a?, b?),
        _                  => bail!("expected two wires"),
    };

    let (nearest, shortest) = solve(&wire_a, &wire_b)
        .ok_or_else(|| anyhow!("wires never cross"))?;
    println!("Part 1: {}", nearest);
    println!("Part 2: {}", shortest);

    Ok(())
}
