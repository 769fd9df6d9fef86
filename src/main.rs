#![forbid(unsafe_code)]
#![deny(warnings, clippy::all, clippy::pedantic)]

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use patchscan::{
    FileChange, git_diff_with_timeout, git_log_with_timeout,
    output::{TabStyle, format_tab, to_json},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Tab,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about = "Extract structured file changes from git history.")]
struct Args {
    /// Repository directory to scan
    source: PathBuf,

    /// Scan uncommitted changes instead of history
    #[arg(long)]
    diff: bool,

    /// With --diff, compare the index to HEAD instead of the working tree
    #[arg(long, requires = "diff")]
    staged: bool,

    /// Extra git log arguments, split on whitespace (e.g. "--since=2020-01-01 -- src/")
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    log_opts: String,

    /// Seconds to allow the git invocation to run
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Output format: tab (default) or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Tab)]
    output: OutputFormat,

    /// Table style to use with --output tab
    #[arg(long, value_enum, default_value_t = TabStyle::Rounded)]
    tab_style: TabStyle,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout_secs);

    let stream = if args.diff {
        git_diff_with_timeout(&args.source, args.staged, timeout)
    } else {
        git_log_with_timeout(&args.source, &args.log_opts, timeout)
    };
    let stream = match stream {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("patchscan: {e}");
            return ExitCode::FAILURE;
        }
    };

    let records: Result<Vec<FileChange>, _> = stream.collect();
    let records = match records {
        Ok(records) => records,
        Err(e) => {
            eprintln!("patchscan: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.output {
        OutputFormat::Tab => println!("{}", format_tab(&records, args.tab_style)),
        OutputFormat::Json => println!("{}", to_json(&records)),
    }
    ExitCode::SUCCESS
}
