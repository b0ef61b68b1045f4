use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "runar")]
#[command(version)]
#[command(about = "A Rust ar archive utility", long_about = None)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["list", "print", "extract", "append"])
))]
#[command(after_help = "Examples:\n  \
  runar -t package.deb                 list members of package.deb\n  \
  runar -p package.deb debian-binary   print a member to stdout\n  \
  runar -x package.deb -d out '*.tar*' extract matching members into out/\n  \
  runar -q libfoo.a a.o b.o            append files, creating the archive")]
pub struct Cli {
    /// Archive file path
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Members to operate on (default: all), or files to append with -q
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List members
    #[arg(short = 't')]
    pub list: bool,

    /// Print members to stdout
    #[arg(short = 'p')]
    pub print: bool,

    /// Extract members
    #[arg(short = 'x')]
    pub extract: bool,

    /// Append files to the archive, creating it if needed
    #[arg(short = 'q')]
    pub append: bool,

    /// Extract members into DIR
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Suppress progress messages
    #[arg(long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

/// What the command line asks to do with the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Print,
    Extract,
    Append,
}

impl Cli {
    pub fn operation(&self) -> Operation {
        if self.append {
            Operation::Append
        } else if self.extract {
            Operation::Extract
        } else if self.print {
            Operation::Print
        } else {
            Operation::List
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.print
    }

    pub fn extract_dir(&self) -> PathBuf {
        self.extract_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
