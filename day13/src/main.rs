
use {
    std::collections::HashMap,
    anyhow::{bail, Context, Result},
    clap::Parser,
    log::{debug, trace, warn},
    intcode::{VM, VMResult, Word, parse_program},
};

/// Day 13: Care Package
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    /// Quarters to insert for the second game
    #[arg(long, default_value_t = 2)]
    quarters: Word,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TileType {
    Empty,
    Wall,
    Block,
    Paddle,
    Ball
}

impl TryFrom<Word> for TileType {
    type Error = anyhow::Error;
    fn try_from(id: Word) -> Result<TileType> {
        use TileType::*;
        let ty = match id {
            0 => Empty,
            1 => Wall,
            2 => Block,
            3 => Paddle,
            4 => Ball,
            _ => bail!("bad tile id {}", id)
        };
        Ok(ty)
    }
}

impl From<TileType> for char {
    fn from(ty: TileType) -> char {
        use TileType::*;
        match ty {
            Empty  => ' ',
            Wall   => '█',
            Block  => '◻',
            Paddle => '━',
            Ball   => '●',
        }
    }
}

type Board = HashMap<(Word, Word), TileType>;

fn render(board: &Board) -> String {
    let max_x = board.keys().map(|(x, _)| *x).max().unwrap_or(-1);
    let max_y = board.keys().map(|(_, y)| *y).max().unwrap_or(-1);

    (0..=max_y)
        .map(|y| {
            (0..=max_x)
                .map(|x| board.get(&(x, y)).copied().map(char::from).unwrap_or(' '))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_blocks(board: &Board) -> usize {
    board.values()
        .filter(|ty| **ty == TileType::Block)
        .count()
}

/// Runs the arcade to completion. With `quarters` set the game is played for free,
/// steering the paddle under the ball.
fn play_game(mut mem: Vec<Word>, quarters: Option<Word>) -> Result<(Board, Word)> {
    if let Some(quarters) = quarters {
        match mem.first_mut() {
            Some(first) => { *first = quarters; }
            None        => bail!("empty program"),
        }
    }

    let mut board = Board::new();
    let mut score = 0;

    let mut paddle_x = 0;
    let mut ball_x   = 0;

    let mut vm = VM::new(mem);
    loop {
        match vm.run()? {
            VMResult::Output(x) => {
                let y = vm.run()?.expect_output().context("missing y")?;
                let t = vm.run()?.expect_output().context("missing tile id / score")?;
                if x == -1 && y == 0 {
                    score = t;
                    continue;
                }

                if x < 0 || y < 0 {
                    bail!("tile drawn off screen at ({}, {})", x, y);
                }

                let ty = TileType::try_from(t)?;
                board.insert((x, y), ty);
                match ty {
                    TileType::Paddle => { paddle_x = x; }
                    TileType::Ball   => { ball_x   = x; }
                    _                => { }
                }
            }

            VMResult::WaitInput => {
                let direction = (ball_x - paddle_x).signum();
                trace!("score {:06}, ball {}, paddle {}, joystick {}", score, ball_x, paddle_x, direction);
                vm.feed_input(direction)?;
            }

            VMResult::Stopped => {
                break;
            }
        }
    }

    debug!("final screen:\n{}", render(&board));
    Ok((board, score))
}


fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let mem = parse_program(&input).context("loading program")?;

    let (board, _) = play_game(mem.clone(), None)?;
    println!("Part 1: block count: {}", count_blocks(&board));

    let (board, score) = play_game(mem, Some(args.quarters))?;
    let remaining = count_blocks(&board);
    if remaining > 0 {
        warn!("game ended with {} blocks left", remaining);
    }
    println!("Part 2: final score: {}", score);

    Ok(())
}
