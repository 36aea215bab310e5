//! codebook — checks and maintains book chapters with embedded code listings.
//!
//! - `codebook check [DIR]`: parse every chapter, report slug-line violations
//!   and chapters that don't serialize back to the same text
//! - `codebook listings [PATH]`: list the source file behind each listing
//! - `codebook renumber [DIR]`: show how numbered chapters would be renamed
//! - `codebook verify [DIR]`: check listing source files exist in a local checkout

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use codebook_config::Config;
use codebook_engine::{
    CheckOptions, DocumentReport, Findings, RoundTrip, SourceReport, SourceRoot, ValidationMode,
    check_book, check_directory, check_file, renumber, validation, verify_directory,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "codebook",
    version,
    about = "Tests and maintains Markdown chapters containing embedded code listings"
)]
struct Cli {
    /// Config file to use instead of ~/.config/codebook/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validates Markdown files: listings, repository links and exact round-trip
    Check {
        /// Book directory (defaults to the configured book path, then `.`)
        dir: Option<PathBuf>,

        /// Print a unified diff for chapters that don't round-trip
        #[arg(long)]
        diff: bool,

        /// Don't write `<chapter>.tmp` files for chapters that don't round-trip
        #[arg(long)]
        no_artifacts: bool,

        /// Report listings in languages without a slug convention
        #[arg(long)]
        strict: bool,
    },
    /// Validates code listings within Markdown files
    Listings {
        /// A single chapter or a book directory
        path: Option<PathBuf>,

        /// Report listings in languages without a slug convention
        #[arg(long)]
        strict: bool,
    },
    /// Reorders numbered Markdown files. To insert a file 'n', name it
    /// 'n.! Chapter Title'. The '!' gives that chapter priority over another
    /// chapter with the same number.
    Renumber {
        /// Book directory (defaults to the configured book path, then `.`)
        dir: Option<PathBuf>,
    },
    /// Verifies that the files named on slug lines exist in a local checkout
    /// of the code repository
    Verify {
        /// Book directory (defaults to the configured book path, then `.`)
        dir: Option<PathBuf>,

        /// Local checkout of the code repository (overrides `code_root`)
        #[arg(long)]
        code_root: Option<PathBuf>,

        /// Link URL prefix that maps onto the checkout (overrides `repo_prefix`)
        #[arg(long)]
        repo_prefix: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether everything checked was clean.
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;
    log::debug!("Using config: {config:?}");

    match cli.command {
        Command::Check {
            dir,
            diff,
            no_artifacts,
            strict,
        } => {
            let dir = book_dir(dir, &config);
            let options = CheckOptions {
                mode: mode(strict, &config),
                write_artifacts: config.write_artifacts && !no_artifacts,
            };
            let reports = check_book(&dir, options)
                .with_context(|| format!("failed to check {}", dir.display()))?;
            for report in &reports {
                print_check(report, diff);
            }
            Ok(reports.iter().all(DocumentReport::is_clean))
        }
        Command::Listings { path, strict } => {
            let path = book_dir(path, &config);
            let options = CheckOptions {
                mode: mode(strict, &config),
                write_artifacts: false,
            };
            let (reports, many) = if path.is_file() {
                (vec![check_file(&path, options)], false)
            } else if path.is_dir() {
                let reports = check_directory(&path, options)
                    .with_context(|| format!("failed to check {}", path.display()))?;
                (reports, true)
            } else {
                bail!("{} does not exist", path.display());
            };
            for report in &reports {
                if many {
                    print!("{}", separator(&report.name(), '+'));
                }
                print_listings(report);
            }
            Ok(reports
                .iter()
                .all(|r| r.outcome.as_ref().is_ok_and(|f| f.violations.is_empty())))
        }
        Command::Renumber { dir } => {
            let dir = book_dir(dir, &config);
            let chapters = renumber::chapters(&dir)
                .with_context(|| format!("failed to read chapters in {}", dir.display()))?;
            let appendices = renumber::appendices(&dir)
                .with_context(|| format!("failed to read appendices in {}", dir.display()))?;

            if chapters.changes.is_empty() && appendices.changes.is_empty() {
                println!("No Changes");
            }
            for file in chapters.changes.iter().chain(&appendices.changes) {
                println!("'{}'  -->  '{}'", file.original_name, file.new_name);
            }
            Ok(true)
        }
        Command::Verify {
            dir,
            code_root,
            repo_prefix,
        } => {
            let dir = book_dir(dir, &config);
            let root = source_root(code_root, repo_prefix, &config)?;
            let reports = verify_directory(&dir, &root)
                .with_context(|| format!("failed to verify {}", dir.display()))?;
            for report in &reports {
                print_verify(report);
            }
            Ok(reports.iter().all(SourceReport::is_clean))
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let loaded = match explicit {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("config file {} not found", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

fn book_dir(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| config.book_path.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn source_root(
    code_root: Option<PathBuf>,
    repo_prefix: Option<String>,
    config: &Config,
) -> Result<SourceRoot> {
    let Some(local) = code_root.or_else(|| config.code_root.clone()) else {
        bail!("no code root: pass --code-root or set code_root in the config file");
    };
    let root = SourceRoot::new(local);
    Ok(match repo_prefix.or_else(|| config.repo_prefix.clone()) {
        Some(prefix) => root.with_repo_prefix(prefix),
        None => root,
    })
}

fn mode(strict: bool, config: &Config) -> ValidationMode {
    if strict || config.strict_languages {
        ValidationMode::Strict
    } else {
        ValidationMode::Lenient
    }
}

fn print_check(report: &DocumentReport, diff: bool) {
    let name = report.name();
    let findings = match &report.outcome {
        Ok(findings) => findings,
        Err(e) => {
            println!("{name}: [Unparseable] {e}");
            return;
        }
    };

    for link in findings.document.repo_links() {
        println!("RepoLink: {}", link.url);
    }
    match &findings.round_trip {
        RoundTrip::Exact => println!("{name}: [OK]"),
        RoundTrip::Drift(drift) => {
            println!(
                "{name}: [Not the same] first difference at line {}",
                drift.first_divergent_line()
            );
            if let Some(artifact) = &findings.artifact {
                println!("  wrote {}", artifact.display());
            }
            if diff {
                print!("{}", drift.unified_diff(findings.document.original(), &name));
            }
        }
    }
    print_violations(findings);
}

fn print_listings(report: &DocumentReport) {
    match &report.outcome {
        Ok(findings) => {
            for listing in findings.document.code_listings() {
                if let Some(summary) = validation::listing_summary(listing) {
                    println!("{summary}");
                }
            }
            print_violations(findings);
        }
        Err(e) => println!("{}: [Unparseable] {e}", report.name()),
    }
}

fn print_verify(report: &SourceReport) {
    match &report.outcome {
        Ok(checks) => {
            for check in checks {
                let status = if check.exists { "Verified" } else { "Missing" };
                println!("{status}: {}", check.path.display());
            }
        }
        Err(e) => println!("{}: [Unparseable] {e}", report.name()),
    }
}

fn print_violations(findings: &Findings) {
    for violation in &findings.violations {
        println!("  {violation}");
    }
}

/// ` name ` centered in a 60-column line of `fill`.
fn separator(name: &str, fill: char) -> String {
    let label = format!(" {name} ");
    let pad = 60usize.saturating_sub(label.chars().count());
    let left = pad / 2;
    let right = pad - left;
    format!(
        "{}{label}{}\n",
        fill.to_string().repeat(left),
        fill.to_string().repeat(right)
    )
}
