use clap::Parser;
use std::path::PathBuf;

use jobscan::query::SortKey;
use jobscan::record::Dimension;
use jobscan::session::UiEvent;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Listing export: a JSON array of job objects
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Keep only this experience level
    #[arg(long)]
    pub level: Option<String>,

    /// Keep only this employment type
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Keep only this skill
    #[arg(long)]
    pub skill: Option<String>,

    /// titleAsc, titleDesc, timeAsc (newest first) or timeDesc (oldest first)
    #[arg(long)]
    pub sort: Option<String>,

    /// Print the distinct level/type/skill values
    #[arg(long)]
    pub options: bool,

    /// Print the details of the n-th listed job (1-based)
    #[arg(long, value_name = "N")]
    pub detail: Option<usize>,

    /// stdout, json, or a .json/.jsonl/.csv/.tsv/.html path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Read commands from stdin instead of printing once
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(long)]
    pub benchmark: bool,
}

pub const HELP: &str = "\
commands:
  load <path>      read a listing file
  level [value]    filter by level (no value: all)
  type [value]     filter by type
  skill [value]    filter by skill
  sort [key]       titleAsc | titleDesc | timeAsc | timeDesc (no key: file order)
  show <n>         details of the n-th listing
  close            close the details
  quit";

/// Translate one line typed by the user. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<UiEvent>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    let event = match cmd {
        "load" if rest.is_empty() => return Err("usage: load <path>".to_string()),
        "load" => UiEvent::LoadRequested(PathBuf::from(rest)),
        "sort" => UiEvent::SortChanged(SortKey::from_name(rest)),
        "show" => {
            let n: usize = rest
                .parse()
                .map_err(|_| format!("usage: show <n>, got `{}`", rest))?;
            if n == 0 {
                return Err("listings are numbered from 1".to_string());
            }
            UiEvent::Select(n - 1)
        }
        "close" => UiEvent::Dismiss,
        "quit" | "exit" => UiEvent::Quit,
        "help" => return Err(HELP.to_string()),
        other => match Dimension::from_name(other) {
            Some(dim) => UiEvent::FilterChanged(dim, rest.to_string()),
            None => return Err(format!("unknown command `{}`, try `help`", other)),
        },
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_keep_spaces_in_values() {
        match parse_command("type  Fixed price ") {
            Ok(Some(UiEvent::FilterChanged(Dimension::Type, v))) => assert_eq!(v, "Fixed price"),
            other => panic!("unexpected: {other:?}"),
        }
        match parse_command("level") {
            Ok(Some(UiEvent::FilterChanged(Dimension::Level, v))) => assert!(v.is_empty()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn show_is_one_based() {
        assert!(matches!(parse_command("show 3"), Ok(Some(UiEvent::Select(2)))));
        assert!(parse_command("show 0").is_err());
        assert!(parse_command("show x").is_err());
    }

    #[test]
    fn misc_commands() {
        assert!(matches!(parse_command("   "), Ok(None)));
        assert!(matches!(parse_command("close"), Ok(Some(UiEvent::Dismiss))));
        assert!(matches!(parse_command("exit"), Ok(Some(UiEvent::Quit))));
        assert!(matches!(
            parse_command("sort timeDesc"),
            Ok(Some(UiEvent::SortChanged(SortKey::PostedOldestFirst)))
        ));
        assert!(matches!(
            parse_command("sort"),
            Ok(Some(UiEvent::SortChanged(SortKey::Unsorted)))
        ));
        assert!(matches!(
            parse_command("load data/jobs.json"),
            Ok(Some(UiEvent::LoadRequested(p))) if p == PathBuf::from("data/jobs.json")
        ));
        assert!(parse_command("load").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::parse_from([
            "jobscan", "jobs.json", "--type", "Hourly", "--sort", "titleAsc", "--detail", "2",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("jobs.json")));
        assert_eq!(args.kind.as_deref(), Some("Hourly"));
        assert_eq!(args.detail, Some(2));
        assert!(!args.interactive);
    }
}
