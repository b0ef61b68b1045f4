//! Main entry point for the runar CLI application.
//!
//! This binary provides a command-line interface for listing, printing,
//! extracting and appending members of Unix `ar` archives.

use anyhow::{Context, Result, bail};
use chrono::DateTime;
use clap::Parser;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use runar::cli::Operation;
use runar::config::DEFAULT_CREATE_MODE;
use runar::{Archive, Cli, Header};

/// Application entry point.
///
/// Parses command-line arguments, opens the archive and dispatches to the
/// handler for the requested operation.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let operation = cli.operation();
    // Only appending may create a new archive
    if operation != Operation::Append && !cli.archive.exists() {
        bail!("{}: No such file or directory", cli.archive.display());
    }

    let archive = Archive::open(&cli.archive, DEFAULT_CREATE_MODE)
        .with_context(|| format!("failed to open {}", cli.archive.display()))?;

    match operation {
        Operation::List => list_members(&archive, &cli),
        Operation::Print => print_members(&archive, &cli),
        Operation::Extract => extract_members(Arc::new(archive), &cli).await,
        Operation::Append => {
            append_files(&archive, &cli)?;
            archive.close().context("failed to close archive")?;
            Ok(())
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects `info` and the default
/// is `warn`.
fn init_tracing(cli: &Cli) {
    let default = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Pick the headers named by the FILES arguments.
///
/// With no arguments every header is selected. Arguments containing `*` or
/// `?` are glob patterns; any other argument must name an existing member.
fn select_headers(headers: &[Header], patterns: &[String]) -> Result<Vec<Header>> {
    if patterns.is_empty() {
        return Ok(headers.to_vec());
    }

    for pattern in patterns.iter().filter(|p| !has_glob_chars(p)) {
        if !headers.iter().any(|h| h.name() == pattern) {
            bail!("no entry {} in archive", pattern);
        }
    }

    Ok(headers
        .iter()
        .filter(|h| {
            patterns.iter().any(|p| {
                if has_glob_chars(p) {
                    glob_match(p, h.name())
                } else {
                    h.name() == p
                }
            })
        })
        .cloned()
        .collect())
}

/// Distinct member names in first-seen order.
///
/// An archive may carry several headers with one name; reading resolves to
/// the last of them, so each name is processed once.
fn unique_names(headers: &[Header]) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .filter(|h| seen.insert(h.name().to_owned()))
        .map(|h| h.name().to_owned())
        .collect()
}

/// List archive members.
///
/// Supports two output formats:
/// - Simple format (`-t`): Just member names, one per line
/// - Verbose format (`-tv`): Table with mode, size and modification time
fn list_members(archive: &Archive, cli: &Cli) -> Result<()> {
    let headers = select_headers(&archive.list(), &cli.files)?;

    if cli.verbose {
        println!("{:<10}  {:>10}  {:<16}  Name", "Mode", "Size", "Date");
        println!("{}", "-".repeat(60));
    }

    let mut total_size = 0u64;
    for header in &headers {
        if cli.verbose {
            println!(
                "{:<10}  {:>10}  {:<16}  {}",
                mode_string(header.mode()),
                header.size(),
                format_time(header.mtime()),
                header.name()
            );
            total_size += header.size();
        } else {
            println!("{}", header.name());
        }
    }

    if cli.verbose {
        println!("{}", "-".repeat(60));
        println!(
            "{:<10}  {:>10}  {:<16}  {} members",
            "",
            format_size(total_size),
            "",
            headers.len()
        );
    }

    Ok(())
}

/// Write selected members to stdout.
///
/// With `-v` each member is preceded by a `<name>` banner.
fn print_members(archive: &Archive, cli: &Cli) -> Result<()> {
    let headers = select_headers(&archive.list(), &cli.files)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for name in unique_names(&headers) {
        if cli.verbose {
            write!(out, "\n<{}>\n\n", name)?;
        }
        archive
            .read(&name, &mut out)
            .with_context(|| format!("failed to read {}", name))?;
    }
    out.flush()?;

    Ok(())
}

/// Extract selected members into the `-d` directory.
///
/// Every member is exported on its own blocking task; reads use positioned
/// I/O, so the tasks share one archive without stepping on each other.
async fn extract_members(archive: Arc<Archive>, cli: &Cli) -> Result<()> {
    let headers = select_headers(&archive.list(), &cli.files)?;
    let dir = cli.extract_dir();

    let mut tasks = JoinSet::new();
    for name in unique_names(&headers) {
        let archive = Arc::clone(&archive);
        let dir = dir.clone();
        tasks.spawn_blocking(move || {
            archive
                .export(&name, &dir)
                .with_context(|| format!("failed to extract {}", name))?;
            Ok::<_, anyhow::Error>(name)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let name = joined.context("extraction task panicked")??;
        if !cli.is_quiet() {
            println!("x - {}", name);
        }
    }

    Ok(())
}

/// Append the FILES arguments to the archive.
fn append_files(archive: &Archive, cli: &Cli) -> Result<()> {
    if cli.files.is_empty() {
        bail!("no files to append");
    }

    for file in &cli.files {
        archive
            .import(file)
            .with_context(|| format!("failed to append {}", file))?;
        if cli.verbose && !cli.is_quiet() {
            println!("a - {}", file);
        }
    }

    Ok(())
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
///
/// # Examples
///
/// ```ignore
/// assert!(glob_match("*.tar.gz", "data.tar.gz"));
/// assert!(glob_match("file?.o", "file1.o"));
/// assert!(!glob_match("*.o", "readme.md"));
/// ```
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Star matches zero characters, or one and stays for more
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

/// Render permission bits the way `ls -l` does, e.g. `rw-r--r--`.
fn mode_string(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM` (UTC).
fn format_time(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
