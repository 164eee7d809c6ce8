// ABOUTME: Command-line tool converting an Apple device tree blob to JSON
// ABOUTME: Reads a file or stdin, decodes the whole tree, then writes JSON in one go

use anyhow::{Context, Result};
use apple_device_tree::{AdtParser, DEFAULT_MAX_DEPTH, JsonStyle, MAX_DEPTH_LIMIT, to_json_string};
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert an Apple Device Tree blob into JSON
#[derive(Debug, Parser)]
#[command(name = "adt2json", version, about)]
struct Cli {
    /// Device tree file to read (stdin when omitted)
    input: Option<PathBuf>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Maximum node nesting below the root
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_DEPTH_LIMIT as u64)
    )]
    max_depth: usize,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let data = read_input(cli.input.as_deref())?;
    let json = convert(&data, cli)?;
    write_output(cli.output.as_deref(), &json)
}

/// Decode and render fully in memory so a failure never emits partial JSON
fn convert(data: &[u8], cli: &Cli) -> Result<String> {
    let style = if cli.pretty {
        JsonStyle::Pretty
    } else {
        JsonStyle::Compact
    };

    let root = AdtParser::new(data)
        .with_max_depth(cli.max_depth)
        .parse_tree()
        .context("Failed to decode device tree")?;
    log::info!("decoded {} nodes", root.node_count());

    Ok(to_json_string(&root, style)?)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
        }
        None => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read standard input")?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write '{}'", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
            Ok(())
        }
    }
}
