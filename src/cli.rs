use clap::Parser;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::process;

const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// The name this binary was invoked as, used to prefix every user-facing
/// message. Only constructible from argv so it cannot be confused with an
/// arbitrary string.
pub struct ToolName(String);

impl ToolName {
    pub fn from_argv() -> Self {
        let name = std::env::args()
            .next()
            .as_deref()
            .map(Path::new)
            .and_then(Path::file_name)
            .and_then(OsStr::to_str)
            .unwrap_or(env!("CARGO_BIN_NAME"))
            .to_string();
        Self(name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Parser)]
#[command(
    name = "line-sift",
    about = "Sifts duplicate lines out of large text and CSV files",
    disable_help_flag = true
)]
pub struct Args {
    /// File to deduplicate
    pub input: PathBuf,

    /// Write output here instead of stdout
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print usage
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Parses argv. Help, unknown flags, extra positionals and a missing or
/// nonexistent input file all end in the usage text and exit status 1; only
/// validated arguments come back.
pub fn parse(tool: &ToolName) -> Args {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => fail(tool, &first_line(&err.to_string())),
    };

    if args.help {
        usage(tool);
    }
    if !args.input.exists() {
        fail(
            tool,
            &format!(
                "the input file argument must be a valid path to a file, {} does not exist",
                args.input.display()
            ),
        );
    }
    args
}

pub fn report_error(tool: &ToolName, err: &anyhow::Error) {
    eprintln!("{RED}{tool}: {err:#}{RESET}");
}

fn fail(tool: &ToolName, message: &str) -> ! {
    eprintln!("{RED}{tool}: {message}{RESET}");
    usage(tool)
}

fn usage(tool: &ToolName) -> ! {
    let lines = [
        format!("{tool}: Usage:"),
        format!("{tool}: {tool} [--output-file <output-file>] <input-file>"),
        format!("{tool}: Reads a file and dedupes its content line by line"),
    ];
    for line in lines {
        eprintln!("{CYAN}{line}{RESET}");
    }
    process::exit(1);
}

// clap errors render with a trailing usage block; the prefixed single-line
// report only wants the message itself.
fn first_line(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or(rendered);
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
