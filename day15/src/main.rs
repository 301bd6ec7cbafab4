
use {
    std::{
        cmp::Reverse,
        collections::{HashMap, HashSet},
    },
    anyhow::{anyhow, bail, Context, Result},
    clap::Parser,
    log::{debug, info},
    priority_queue::PriorityQueue,
    intcode::{VM, Word, parse_program},
};

/// Day 15: Oxygen System
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct V2 {
    pub x: i32,
    pub y: i32
}

impl V2 {
    fn new(x: i32, y: i32) -> V2 {
        V2 { x, y }
    }
}

impl std::ops::Add for V2 {
    type Output = V2;
    fn add(self, rhs: V2) -> V2 {
        V2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    fn each() -> impl Iterator<Item = Direction> {
        use Direction::*;
        static DIRS: [Direction; 4] = [ North, South, West, East ];
        DIRS.iter().copied()
    }

    fn opposite(self) -> Direction {
        use Direction::*;
        match self {
            North  => South,
            South  => North,
            West   => East,
            East   => West
        }
    }
}

// +ve y is north
impl From<Direction> for V2 {
    fn from(dir: Direction) -> V2 {
        use Direction::*;
        match dir {
            North  => V2::new( 0,  1),
            South  => V2::new( 0, -1),
            West   => V2::new(-1,  0),
            East   => V2::new( 1,  0)
        }
    }
}

impl From<Direction> for Word {
    fn from(dir: Direction) -> Word {
        use Direction::*;
        match dir {
            North  => 1,
            South  => 2,
            West   => 3,
            East   => 4
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Clear,
    Wall,
    Goal
}

impl TryFrom<Word> for Tile {
    type Error = anyhow::Error;
    fn try_from(i: Word) -> Result<Tile> {
        use Tile::*;
        let tile = match i {
            0 => Wall,
            1 => Clear,
            2 => Goal,
            _ => bail!("bad droid status {}", i)
        };
        Ok(tile)
    }
}

/// Something that can be steered around the maze one square at a time.
/// Reports what was in the way; a droid never moves into a wall.
trait Droid {
    fn step(&mut self, direction: Direction) -> Result<Tile>;
}

/// The repair droid, driven by its intcode program.
struct VmDroid {
    vm: VM,
}

impl VmDroid {
    fn new(mem: Vec<Word>) -> Result<VmDroid> {
        let mut vm = VM::new(mem);
        vm.run()?.expect_wait_input().context("droid didn't ask for a command")?;
        Ok(VmDroid { vm })
    }
}

impl Droid for VmDroid {
    fn step(&mut self, direction: Direction) -> Result<Tile> {
        self.vm.feed_input(direction.into())?;
        let status = self.vm.run()?.expect_output().context("expected droid status report")?;
        self.vm.run()?.expect_wait_input().context("droid didn't ask for the next command")?;
        Tile::try_from(status)
    }
}

/// Everything learned about the maze: open squares with their open neighbours,
/// walls that were bumped into, and the oxygen system if found.
#[derive(Debug, Default)]
struct Maze {
    adjs:  HashMap<V2, Vec<V2>>,
    walls: HashSet<V2>,
    goal:  Option<V2>,
}

fn traverse_recursive<D: Droid>(droid: &mut D, maze: &mut Maze, position: V2) -> Result<()> {
    for direction in Direction::each() {
        let new_position = position + V2::from(direction);

        if maze.walls.contains(&new_position) {
            continue;
        }

        if maze.adjs.contains_key(&new_position) {
            let links = maze.adjs.entry(position).or_default();
            if !links.contains(&new_position) {
                links.push(new_position);
            }
            continue;
        }

        let tile = droid.step(direction)?;
        if tile == Tile::Wall {
            maze.walls.insert(new_position);
            continue;
        }

        if tile == Tile::Goal {
            maze.goal = Some(new_position);
        }

        // moved; explore from there, then come back
        maze.adjs.entry(new_position).or_default().push(position);
        maze.adjs.entry(position).or_default().push(new_position);
        traverse_recursive(droid, maze, new_position)?;

        let back = droid.step(direction.opposite())?;
        if back == Tile::Wall {
            bail!("droid couldn't back out of {:?}", new_position);
        }
    }

    Ok(())
}

/// Explores the whole maze depth first, leaving the droid where it started.
fn traverse<D: Droid>(droid: &mut D) -> Result<Maze> {
    let start = V2::new(0, 0);
    let mut maze = Maze::default();
    maze.adjs.insert(start, Vec::new());
    traverse_recursive(droid, &mut maze, start)?;
    info!("explored {} open squares, {} walls", maze.adjs.len(), maze.walls.len());
    Ok(maze)
}

fn dijkstra(adjs: &HashMap<V2, Vec<V2>>, start: V2) -> HashMap<V2, i32> {
    let mut dists: HashMap<V2, i32> = HashMap::new();
    dists.insert(start, 0);

    let mut queue: PriorityQueue<V2, Reverse<i32>> = PriorityQueue::new();
    queue.push(start, Reverse(0));

    while let Some((u, Reverse(dist_u))) = queue.pop() {
        let neighbors = if let Some(neighbors) = adjs.get(&u) {
            neighbors
        }
        else {
            continue;
        };

        for v in neighbors.iter() {
            let new_dist = dist_u + 1;
            if new_dist < dists.get(v).copied().unwrap_or(i32::MAX) {
                dists.insert(*v, new_dist);
                queue.push(*v, Reverse(new_dist));
            }
        }
    }

    dists
}

fn render(maze: &Maze) -> String {
    let known = || maze.adjs.keys().chain(maze.walls.iter());
    let min_x = known().map(|p| p.x).min().unwrap_or(0);
    let max_x = known().map(|p| p.x).max().unwrap_or(0);
    let min_y = known().map(|p| p.y).min().unwrap_or(0);
    let max_y = known().map(|p| p.y).max().unwrap_or(0);

    (min_y..=max_y).rev()
        .map(|y| {
            (min_x..=max_x)
                .map(|x| {
                    let pos = V2::new(x, y);
                    if      pos == V2::new(0, 0)          { 'S' }
                    else if Some(pos) == maze.goal        { 'O' }
                    else if maze.walls.contains(&pos)     { '#' }
                    else if maze.adjs.contains_key(&pos)  { '.' }
                    else                                  { ' ' }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fewest moves from the start to the oxygen system, and minutes for oxygen to fill the maze.
fn survey(maze: &Maze) -> Result<(i32, i32)> {
    let goal = maze.goal.ok_or_else(|| anyhow!("oxygen system not found"))?;
    let dists = dijkstra(&maze.adjs, goal);
    let to_start = dists.get(&V2::new(0, 0)).copied()
        .ok_or_else(|| anyhow!("no path to the oxygen system"))?;
    let fill_time = dists.values().copied().max().unwrap_or(0);
    Ok((to_start, fill_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    // a droid in a hand-drawn maze; 'D' marks the start, 'O' the oxygen system
    struct GridDroid {
        rows: Vec<Vec<u8>>,
        col: usize,
        row: usize,
        moves: usize,
    }

    impl GridDroid {
        fn new(map: &[&str]) -> GridDroid {
            let rows: Vec<Vec<u8>> = map.iter().map(|r| r.bytes().collect()).collect();
            let (row, col) = rows.iter().enumerate()
                .find_map(|(y, r)| r.iter().position(|b| *b == b'D').map(|x| (y, x)))
                .unwrap();
            GridDroid { rows, col, row, moves: 0 }
        }
    }

    impl Droid for GridDroid {
        fn step(&mut self, direction: Direction) -> Result<Tile> {
            let (col, row) = match direction {
                Direction::North => (self.col, self.row - 1),
                Direction::South => (self.col, self.row + 1),
                Direction::West  => (self.col - 1, self.row),
                Direction::East  => (self.col + 1, self.row),
            };
            let tile = match self.rows.get(row).and_then(|r| r.get(col)) {
                Some(b'.') | Some(b'D') => Tile::Clear,
                Some(b'O')              => Tile::Goal,
                _                       => Tile::Wall,
            };
            if tile != Tile::Wall {
                self.col = col;
                self.row = row;
                self.moves += 1;
            }
            Ok(tile)
        }
    }

    const MAZE: [&str; 5] = [
        " ##   ",
        "#D.## ",
        "#.#..#",
        "#.O.# ",
        " ###  ",
    ];

    #[test]
    fn test_explore() {
        let mut droid = GridDroid::new(&MAZE);
        let maze = traverse(&mut droid).unwrap();
        assert_eq!((droid.col, droid.row), (1, 1));
        assert_eq!(maze.adjs.len(), 8);
        assert_eq!(maze.goal, Some(V2::new(1, -2)));
        assert_eq!(survey(&maze).unwrap(), (3, 4));
    }

    #[test]
    fn test_render() {
        let mut droid = GridDroid::new(&MAZE);
        let maze = traverse(&mut droid).unwrap();
        let expected = MAZE.join("\n").replace('D', "S");
        assert_eq!(render(&maze), expected);
    }

    #[test]
    fn test_no_oxygen() {
        let mut droid = GridDroid::new(&["###", "#D#", "###"]);
        let maze = traverse(&mut droid).unwrap();
        assert_eq!(droid.moves, 0);
        assert!(survey(&maze).is_err());
    }

    #[test]
    fn test_dijkstra() {
        let mut adjs = HashMap::new();
        let a = V2::new(0, 0);
        let b = V2::new(1, 0);
        let c = V2::new(2, 0);
        adjs.insert(a, vec![b]);
        adjs.insert(b, vec![a, c]);
        adjs.insert(c, vec![b]);
        let dists = dijkstra(&adjs, a);
        assert_eq!(dists[&c], 2);
        assert_eq!(dijkstra(&adjs, b).values().max(), Some(&1));
    }

    #[test]
    fn test_vm_droid() {
        // always reports the oxygen system, then stops taking commands
        let mut droid = VmDroid::new(vec![3,100,104,2,3,100,99]).unwrap();
        assert_eq!(droid.step(Direction::East).unwrap(), Tile::Goal);
        assert!(droid.step(Direction::West).is_err());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let mem = parse_program(&input).context("loading program")?;

    let mut droid = VmDroid::new(mem)?;
    let maze = traverse(&mut droid)?;
    debug!("maze:\n{}", render(&maze));

    let (goal_dist, fill_time) = survey(&maze)?;
    println!("Part 1: goal dist: {}", goal_dist);
    println!("Part 2: fill time: {} min", fill_time);

    Ok(())
}
