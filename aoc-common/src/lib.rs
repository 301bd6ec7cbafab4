//! Plumbing shared by the day binaries: command line, input loading, logging.

use {
    std::{
        fmt::Display,
        path::{Path, PathBuf},
        str::FromStr,
    },
    log::LevelFilter,
    thiserror::Error,
};

/// Arguments every day accepts. Flatten into a day's own `Parser` struct.
#[derive(Debug, Clone, clap::Args)]
pub struct Args {
    /// Puzzle input file
    #[arg(short, long, default_value = "input")]
    pub input: PathBuf,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Sets up logging and reads the input file in one go.
    pub fn setup(&self) -> Result<String, InputError> {
        init_logging(self.verbose);
        read_input(&self.input)
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: can't parse {text:?}: {reason}")]
    Parse {
        line: usize,
        text: String,
        reason: String,
    },
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialises env_logger. Safe to call more than once; later calls are no-ops.
pub fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(verbose));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.format_timestamp(None).try_init();
}

pub fn read_input(path: &Path) -> Result<String, InputError> {
    log::debug!("reading input from {}", path.display());
    std::fs::read_to_string(path)
        .map_err(|source| InputError::Io { path: path.to_owned(), source })
}

/// Parses one value per non-empty line.
pub fn parse_lines<T>(text: &str) -> Result<Vec<T>, InputError>
    where T: FromStr,
          T::Err: Display
{
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.trim().parse().map_err(|err: T::Err| InputError::Parse {
                line:   index + 1,
                text:   line.to_string(),
                reason: err.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let values: Vec<i32> = parse_lines("12\n\n14\n 1969 \n").unwrap();
        assert_eq!(values, vec![12, 14, 1969]);
    }

    #[test]
    fn test_parse_lines_reports_line() {
        match parse_lines::<i32>("1\n2\nthree\n") {
            Err(InputError::Parse { line, text, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "three");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }

    #[test]
    fn test_read_input_missing() {
        let err = read_input(Path::new("definitely/not/here")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}
