
use {
    std::collections::HashMap,
    anyhow::{anyhow, bail, Context, Result},
    clap::Parser,
    log::debug,
    intcode::{VM, VMResult, Word, parse_program},
};

/// Day 11: Space Police
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Colour {
    Black,
    White
}

impl TryFrom<Word> for Colour {
    type Error = anyhow::Error;
    fn try_from(i: Word) -> Result<Colour> {
        let colour = match i {
            0 => Colour::Black,
            1 => Colour::White,
            _ => bail!("bad paint colour {}", i),
        };
        Ok(colour)
    }
}

impl From<Colour> for Word {
    fn from(c: Colour) -> Word {
        match c {
            Colour::Black => 0,
            Colour::White => 1
        }
    }
}

type Panels = HashMap<(i32, i32), Colour>;

/// Runs the robot to completion. Only panels it actually painted are returned.
fn run_robot(mem: Vec<Word>, start_colour: Colour) -> Result<Panels> {
    let mut panels = Panels::new();

    // right handed, +ve y up
    let mut pos_x = 0;
    let mut pos_y = 0;
    let mut dir_x = 0;
    let mut dir_y = 1;

    let mut vm = VM::new(mem);
    loop {
        match vm.run()? {
            VMResult::Output(paint) => {
                let colour = Colour::try_from(paint)?;
                panels.insert((pos_x, pos_y), colour);

                let turn = vm.run()?.expect_output().context("paint output without turn")?;
                let (new_dir_x, new_dir_y) = match turn {
                    0 => (-dir_y, dir_x), // left 90
                    1 => (dir_y, -dir_x), // right 90
                    _ => bail!("bad turn {}", turn),
                };
                dir_x = new_dir_x;
                dir_y = new_dir_y;
                pos_x += dir_x;
                pos_y += dir_y;
            }

            VMResult::WaitInput => {
                let unpainted = if (pos_x, pos_y) == (0, 0) { start_colour } else { Colour::Black };
                let colour = panels.get(&(pos_x, pos_y)).copied().unwrap_or(unpainted);
                vm.feed_input(Word::from(colour))?;
            }

            VMResult::Stopped => {
                break;
            }
        }
    }

    debug!("robot stopped at ({}, {})", pos_x, pos_y);
    Ok(panels)
}

fn render(panels: &Panels) -> Option<String> {
    let white_panels: Vec<_> = panels.iter()
        .filter(|(_, c)| **c == Colour::White)
        .map(|(pos, _)| *pos)
        .collect();

    let min_x = white_panels.iter().map(|(x, _)| *x).min()?;
    let max_x = white_panels.iter().map(|(x, _)| *x).max()?;
    let min_y = white_panels.iter().map(|(_, y)| *y).min()?;
    let max_y = white_panels.iter().map(|(_, y)| *y).max()?;

    let width = max_x - min_x + 1;
    let height = max_y - min_y + 1;
    let mut image = vec![' '; (width * height) as usize];

    for (x, y) in white_panels.iter() {
        let x = x - min_x;
        let y = height - (y - min_y) - 1;
        image[(y * width + x) as usize] = '#';
    }

    let rows: Vec<String> = image.chunks_exact(width as usize)
        .map(|row| row.iter().collect())
        .collect();
    Some(rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step() {
        // read, paint white, turn left, halt
        let panels = run_robot(vec![3,100,104,1,104,0,99], Colour::Black).unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[&(0, 0)], Colour::White);
    }

    #[test]
    fn test_start_colour_visible() {
        // paint whatever colour was read back onto the panel
        let program = vec![3,100,4,100,104,0,99];
        let panels = run_robot(program.clone(), Colour::White).unwrap();
        assert_eq!(panels[&(0, 0)], Colour::White);
        let panels = run_robot(program, Colour::Black).unwrap();
        assert_eq!(panels[&(0, 0)], Colour::Black);
    }

    #[test]
    fn test_nothing_painted() {
        assert!(run_robot(vec![99], Colour::White).unwrap().is_empty());
    }

    #[test]
    fn test_paint_and_move() {
        // read, paint white, turn right, read, paint black, turn left, halt
        let program = vec![3,100,104,1,104,1,3,100,104,0,104,0,99];
        let panels = run_robot(program, Colour::Black).unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[&(0, 0)], Colour::White);
        assert_eq!(panels[&(1, 0)], Colour::Black);
    }

    #[test]
    fn test_bad_colour() {
        assert!(run_robot(vec![3,100,104,7,104,0,99], Colour::Black).is_err());
        assert!(run_robot(vec![3,100,104,1,99], Colour::Black).is_err());
    }

    #[test]
    fn test_render() {
        let mut panels = Panels::new();
        panels.insert((0, 0), Colour::White);
        panels.insert((1, 1), Colour::White);
        panels.insert((1, 0), Colour::Black);
        assert_eq!(render(&panels).unwrap(), " #\n# ");
        assert_eq!(render(&Panels::new()), None);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let mem = parse_program(&input).context("loading program")?;

    let panels_part1 = run_robot(mem.clone(), Colour::Black)?;
    println!("Part 1: distinct panels painted: {}", panels_part1.len());

    let panels_part2 = run_robot(mem, Colour::White)?;
    let image = render(&panels_part2).ok_or_else(|| anyhow!("nothing painted white"))?;
    println!("Part 2:");
    println!("{}", image);

    Ok(())
}
