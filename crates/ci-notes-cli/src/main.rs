//! ci-notes - inspect CI reports stored as git notes
//!
//! Reads note blobs from files or stdin and prints reports as JSON. Fetching
//! the notes is left to git itself:
//!
//! ```text
//! git notes --ref "$(ci-notes ref)" show HEAD | ci-notes latest --lines -
//! ```
//!
//! ## Commands
//!
//! - `parse`: parse a single note
//! - `valid`: list the recognized CI reports among many notes
//! - `latest`: show the most recent recognized report
//! - `ref`: print the notes ref CI reports live under

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, Level};

use ci_notes::{Note, SelectOptions, TieBreak, TimestampPolicy};

#[derive(Parser)]
#[command(name = "ci-notes")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read CI status reports stored as git notes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true, env = "CI_NOTES_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one note and print it as a report
    Parse {
        /// Note file (`-` for stdin)
        input: PathBuf,
    },

    /// Print every recognized CI report, in input order
    Valid {
        /// Note files (`-` for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Treat each non-empty line as a separate note
        #[arg(long)]
        lines: bool,
    },

    /// Print the most recent recognized CI report, or `null`
    Latest {
        /// Note files (`-` for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Treat each non-empty line as a separate note
        #[arg(long)]
        lines: bool,

        /// Which report wins when timestamps tie
        #[arg(long, value_enum, default_value_t = TieBreakArg::Last)]
        tie_break: TieBreakArg,

        /// Ignore reports whose timestamp is not an integer instead of failing
        #[arg(long)]
        skip_invalid_timestamps: bool,
    },

    /// Print the git-notes ref that holds CI reports
    Ref,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    First,
    Last,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::First => TieBreak::FirstSeen,
            TieBreakArg::Last => TieBreak::LastSeen,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    ci_notes::init_tracing(cli.json, level);

    match cli.command {
        Commands::Parse { input } => cmd_parse(&input),
        Commands::Valid { inputs, lines } => cmd_valid(&inputs, lines),
        Commands::Latest {
            inputs,
            lines,
            tie_break,
            skip_invalid_timestamps,
        } => {
            let options = SelectOptions {
                tie_break: tie_break.into(),
                invalid_timestamps: if skip_invalid_timestamps {
                    TimestampPolicy::Skip
                } else {
                    TimestampPolicy::Reject
                },
            };
            cmd_latest(&inputs, lines, &options)
        }
        Commands::Ref => {
            println!("{}", ci_notes::NOTES_REF);
            Ok(())
        }
    }
}

fn cmd_parse(input: &Path) -> Result<()> {
    let bytes = read_input(input)?;
    let report = ci_notes::parse(&bytes)
        .with_context(|| format!("{} is not a CI report note", input.display()))?;
    print_json(&report)
}

fn cmd_valid(inputs: &[PathBuf], lines: bool) -> Result<()> {
    let notes = collect_notes(inputs, lines)?;
    let reports = ci_notes::parse_all_valid(&notes);
    print_json(&reports)
}

fn cmd_latest(inputs: &[PathBuf], lines: bool, options: &SelectOptions) -> Result<()> {
    let notes = collect_notes(inputs, lines)?;
    let reports = ci_notes::parse_all_valid(&notes);
    let latest = ci_notes::latest_report_with(&reports, options)
        .context("failed to select the latest CI report")?;
    print_json(&latest)
}

/// Read one input; `-` means stdin.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read notes from stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read every input and split it into notes.
fn collect_notes(inputs: &[PathBuf], lines: bool) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    for input in inputs {
        let bytes = read_input(input)?;
        let before = notes.len();
        notes.extend(split_notes(bytes, lines));
        debug!(
            event = "input.read",
            input = %input.display(),
            notes = notes.len() - before,
        );
    }
    Ok(notes)
}

/// One note per input, or one note per non-empty line with `lines`.
fn split_notes(bytes: Vec<u8>, lines: bool) -> Vec<Note> {
    if !lines {
        return vec![Note::from(bytes)];
    }
    bytes
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(|line| Note::from(line.to_vec()))
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn split_whole_input_is_one_note() {
        let notes = split_notes(b"{\"a\":1}\n{\"b\":2}\n".to_vec(), false);
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn split_lines_skips_blank_lines() {
        let input = b"{\"status\":\"success\"}\r\n\n   \n{\"status\":\"failure\"}".to_vec();
        let notes = split_notes(input, true);
        assert_eq!(
            notes,
            vec![
                Note::from(r#"{"status":"success"}"#),
                Note::from(r#"{"status":"failure"}"#),
            ]
        );
    }

    #[test]
    fn collect_notes_reads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        std::fs::write(&first, r#"{"timestamp":"1","agent":"a"}"#).unwrap();
        let mut f = std::fs::File::create(&second).unwrap();
        writeln!(f, r#"{{"timestamp":"2","agent":"b"}}"#).unwrap();
        writeln!(f, r#"{{"timestamp":"3","agent":"c"}}"#).unwrap();

        let notes = collect_notes(&[first, second], true).unwrap();
        let reports = ci_notes::parse_all_valid(&notes);
        let agents: Vec<&str> = reports.iter().map(|r| r.agent.as_str()).collect();
        assert_eq!(agents, vec!["a", "b", "c"]);
    }

    #[test]
    fn collect_notes_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = collect_notes(&[missing], false).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn cli_parses_latest_flags() {
        let cli = Cli::try_parse_from([
            "ci-notes",
            "latest",
            "--lines",
            "--tie-break",
            "first",
            "--skip-invalid-timestamps",
            "-",
        ])
        .unwrap();
        match cli.command {
            Commands::Latest {
                inputs,
                lines,
                tie_break,
                skip_invalid_timestamps,
            } => {
                assert_eq!(inputs, vec![PathBuf::from("-")]);
                assert!(lines);
                assert_eq!(TieBreak::from(tie_break), TieBreak::FirstSeen);
                assert!(skip_invalid_timestamps);
            }
            _ => panic!("expected latest command"),
        }
    }

    #[test]
    fn cli_requires_inputs_for_valid() {
        assert!(Cli::try_parse_from(["ci-notes", "valid"]).is_err());
    }
}
