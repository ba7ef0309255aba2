use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod files;
mod git;
mod logging;

use commands::{
    diff::DiffArgs, fmt::FmtArgs, lint::LintArgs, stats::StatsArgs, who::WhoArgs, why::WhyArgs,
    Session,
};
use git::Git;

#[derive(Parser)]
#[command(name = "co", version, about = "Query and maintain CODEOWNERS files")]
struct Cli {
    /// CODEOWNERS file (default: the first of CODEOWNERS, .github/, .gitlab/
    /// or docs/ in the repository)
    #[arg(short = 'f', long = "file", env = "CO_FILE", global = true)]
    codeowners_file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Who(WhoArgs),
    Why(WhyArgs),
    Fmt(FmtArgs),
    Lint(LintArgs),
    Stats(StatsArgs),
    Diff(DiffArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let session = Session::new(Git::discover(), cli.codeowners_file);
    match &cli.command {
        Command::Who(args) => commands::who::run(&session, args),
        Command::Why(args) => commands::why::run(&session, args),
        Command::Fmt(args) => commands::fmt::run(&session, args),
        Command::Lint(args) => commands::lint::run(&session, args),
        Command::Stats(args) => commands::stats::run(&session, args),
        Command::Diff(args) => commands::diff::run(&session, args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_who() {
        let cli = Cli::try_parse_from(["co", "who", "-o", "@a,@b", "-o", "c", "-u", "src", "-f", "OWNERS"])
            .unwrap();
        assert_eq!(cli.codeowners_file, Some(PathBuf::from("OWNERS")));
        match cli.command {
            Command::Who(args) => {
                assert_eq!(args.owners, vec!["@a", "@b", "c"]);
                assert!(args.unowned);
                assert!(!args.json);
                assert_eq!(args.paths, vec![PathBuf::from("src")]);
            }
            _ => panic!("expected who"),
        }
    }

    #[test]
    fn test_parse_diff() {
        let cli = Cli::try_parse_from(["co", "diff", "main", "topic", "-r"]).unwrap();
        match cli.command {
            Command::Diff(args) => {
                assert_eq!(args.refs, vec!["main", "topic"]);
                assert!(args.renames);
            }
            _ => panic!("expected diff"),
        }
        assert!(Cli::try_parse_from(["co", "diff", "a", "b", "c"]).is_err());
    }
}
