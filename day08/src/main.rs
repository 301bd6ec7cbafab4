
use {
    anyhow::{bail, ensure, Result},
    clap::Parser,
    log::info,
};

/// Day 8: Space Image Format
#[derive(Debug, Parser)]
struct Args {
    #[command(flatten)]
    common: aoc_common::Args,

    #[arg(long, default_value_t = 25)]
    width: usize,

    #[arg(long, default_value_t = 6)]
    height: usize,
}

const BLACK:       u8 = b'0';
const WHITE:       u8 = b'1';
const TRANSPARENT: u8 = b'2';

fn layers(data: &[u8], width: usize, height: usize) -> Result<std::slice::ChunksExact<'_, u8>> {
    ensure!(width > 0 && height > 0, "empty layer size {}x{}", width, height);
    if let Some(bad) = data.iter().find(|p| !p.is_ascii_digit()) {
        bail!("unexpected byte {:?} in image data", *bad as char);
    }
    let size = width * height;
    ensure!(!data.is_empty() && data.len() % size == 0,
            "{} pixels isn't a whole number of {}x{} layers", data.len(), width, height);
    Ok(data.chunks_exact(size))
}

fn checksum(data: &[u8], width: usize, height: usize) -> Result<usize> {
    let counts = layers(data, width, height)?
        .map(|layer| {
            let mut zeros = 0;
            let mut ones  = 0;
            let mut twos  = 0;
            for digit in layer.iter() {
                match *digit {
                    BLACK       => { zeros += 1; }
                    WHITE       => { ones  += 1; }
                    TRANSPARENT => { twos  += 1; }
                    _           => { }
                }
            }
            (zeros, ones, twos)
        })
        .min_by_key(|(zeros, _, _)| *zeros);

    Ok(counts.map(|(_, ones, twos)| ones * twos).unwrap_or(0))
}

// topmost non-transparent pixel wins
fn compose(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    Ok(layers(data, width, height)?
        .fold(
            Vec::<u8>::new(),
            |mut composed, layer| {
                if composed.is_empty() {
                    composed = layer.to_vec();
                }
                else {
                    for (dest, src) in composed.iter_mut().zip(layer.iter()) {
                        if *dest == TRANSPARENT {
                            *dest = *src;
                        }
                    }
                }
                composed
            }
        ))
}

fn render(image: &[u8], width: usize) -> String {
    image.chunks_exact(width)
        .map(|row| {
            row.iter().map(|p| match *p {
                BLACK       => ' ',
                WHITE       => '#',
                TRANSPARENT => '/',
                _           => '?'
            })
            .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(b"123456789012", 3, 2).unwrap(), 1);
        assert_eq!(checksum(b"001222112201", 3, 2).unwrap(), 6);
    }

    #[test]
    fn test_compose() {
        let image = compose(b"0222112222120000", 2, 2).unwrap();
        assert_eq!(image, b"0110".to_vec());
        assert_eq!(render(&image, 2), " #\n# ");
    }

    #[test]
    fn test_bad_size() {
        assert!(checksum(b"12345", 3, 2).is_err());
        assert!(compose(b"", 3, 2).is_err());
        assert!(compose(b"12a456", 3, 2).is_err());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let input = args.common.setup()?;
    let data = input.trim().as_bytes();
    info!("{} layers", data.len() / (args.width * args.height).max(1));

    println!("Part 1: {}", checksum(data, args.width, args.height)?);

    let image = compose(data, args.width, args.height)?;
    println!("Part 2:");
    println!("{}", render(&image, args.width));

    Ok(())
}
