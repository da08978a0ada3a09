//! demacro - rewrite custom LaTeX macros in Jupyter notebook markdown.
//!
//! Walks a directory tree, rewrites the markdown cells of every notebook
//! through the demacro-core engine, and writes back only the notebooks
//! that changed.

mod notebook;
mod report;

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use demacro_core::MacroRewriter;
use log::{debug, info};
use rayon::prelude::*;

use crate::notebook::{find_notebooks, rewrite_notebook_file};
use crate::report::{FileOutcome, RunReport};

#[derive(Debug)]
struct Config {
    root: PathBuf,
    dry_run: bool,
    json: bool,
}

fn main() {
    env_logger::init();

    let config = match parse_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("Usage: demacro [OPTIONS] [DIR]  (try --help)");
            process::exit(2);
        }
    };

    let report = match run(&config) {
        Ok(report) => report,
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(1);
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => {
                eprintln!("error: failed to render report: {err}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", report.render_text(config.dry_run));
    }

    if report.has_failures() {
        process::exit(1);
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Config, String> {
    let mut root: Option<PathBuf> = None;
    let mut dry_run = false;
    let mut json = false;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("demacro {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-n" | "--dry-run" => dry_run = true,
            "-j" | "--json" => json = true,
            _ if arg.starts_with('-') => return Err(format!("unknown option: {arg}")),
            _ => {
                if root.is_some() {
                    return Err(format!("unexpected argument: {arg}"));
                }
                root = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Config {
        root: root.unwrap_or_else(|| PathBuf::from(".")),
        dry_run,
        json,
    })
}

fn print_help() {
    eprintln!(
        r#"demacro - rewrite custom LaTeX macros in notebook markdown

USAGE:
    demacro [OPTIONS] [DIR]

ARGS:
    DIR    Directory scanned recursively for .ipynb files (default: .)

OPTIONS:
    -n, --dry-run    Report what would change without writing anything
    -j, --json       Print the run report as JSON
    -h, --help       Print this help
    -V, --version    Print version information"#
    );
}

fn run(config: &Config) -> Result<RunReport, String> {
    let start = Instant::now();

    let rewriter = MacroRewriter::new().map_err(|err| err.to_string())?;
    let notebooks = find_notebooks(&config.root).map_err(|err| err.to_string())?;
    info!(
        "found {} notebooks under {}",
        notebooks.len(),
        config.root.display()
    );

    // find_notebooks returns sorted paths; the indexed parallel iterator
    // keeps that order in the collected outcomes.
    let outcomes: Vec<FileOutcome> = notebooks
        .into_par_iter()
        .map(|path| process_notebook(path, &rewriter, config.dry_run))
        .collect();

    let elapsed = start.elapsed();
    Ok(RunReport::new(outcomes, elapsed.as_secs_f64() * 1000.0))
}

fn process_notebook(path: PathBuf, rewriter: &MacroRewriter, dry_run: bool) -> FileOutcome {
    info!("processing {}", path.display());
    match rewrite_notebook_file(&path, rewriter, !dry_run) {
        Ok(fragments_changed) => {
            debug!("{}: {fragments_changed} fragments rewritten", path.display());
            FileOutcome {
                path,
                fragments_changed,
                error: None,
            }
        }
        Err(err) => FileOutcome {
            path,
            fragments_changed: 0,
            error: Some(err.to_string()),
        },
    }
}
