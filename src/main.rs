//! CLI entry point for ferret

use std::path::PathBuf;
use std::process;

use clap::Parser;
use ferret::{Reporter, SystemResolver, Walker, parse_criteria};

const CRITERIA_HELP: &str = "\
CRITERIA may be any ordered combination of:
  -user <name/uid>       match entries owned by the given user
  -name <glob>           match the final path component against a glob
  -path <glob>           match the full path against a glob ('*' stops at '/')
  -type <b|c|d|p|f|l|s>  match entries of the given type
  -nouser                match entries whose owner id has no known name
  -print                 print the path (the default action when none given)
  -ls                    print a detailed listing record
";

#[derive(Parser, Debug)]
#[command(name = "ferret")]
#[command(about = "Walk a directory tree and act on entries matching ordered criteria")]
#[command(version)]
#[command(after_help = CRITERIA_HELP)]
struct Args {
    /// File or directory to start from
    root: PathBuf,

    /// Ordered criteria, evaluated left to right per entry
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    criteria: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let prog = std::env::args()
        .next()
        .unwrap_or_else(|| String::from("ferret"));
    let reporter = Reporter::new(prog);
    let resolver = SystemResolver::new();

    let criteria = match parse_criteria(&args.criteria, &resolver) {
        Ok(criteria) => criteria,
        Err(err) => {
            eprintln!("{}: {}", reporter.prog(), err);
            eprintln!();
            eprintln!("Usage: {} <FILE/DIRECTORY> [CRITERIA]...", reporter.prog());
            eprint!("{CRITERIA_HELP}");
            process::exit(1);
        }
    };

    let walker = Walker::new(&criteria, &resolver, &reporter);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Per-entry failures were already reported by the walker and do not
    // change the exit status; only a dead root is fatal.
    if let Err(err) = walker.run(&args.root, &mut out) {
        eprintln!("{}: {}", reporter.prog(), err);
        process::exit(1);
    }
}
