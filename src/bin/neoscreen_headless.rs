//! Neoscreen Headless Runner
//!
//! Applies redraw batches to a recording surface without a display, for
//! testing and automation. Reads newline-delimited JSON batches from a
//! file or stdin and outputs either the rendered glyph layer as text or
//! the recorded surface calls as JSON.

use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;

use neoscreen::{decode_batch, ChannelResolver, Config, RecordingSurface, Renderer};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Parse command line arguments
    let mut config = Config::default();
    let mut input_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                if i < args.len() {
                    config.cols = args[i].parse().unwrap_or(80);
                }
            },
            "-r" | "--rows" => {
                i += 1;
                if i < args.len() {
                    config.rows = args[i].parse().unwrap_or(24);
                }
            },
            "-C" | "--config" => {
                i += 1;
                if i < args.len() {
                    match Config::load(Path::new(&args[i])) {
                        Ok(loaded) => config = loaded,
                        Err(e) => {
                            eprintln!("Failed to load config: {}", e);
                            return ExitCode::FAILURE;
                        },
                    }
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    // Read input
    let input = match &input_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to read {}: {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Failed to read stdin: {}", e);
                return ExitCode::FAILURE;
            }
            buf
        },
    };

    // Headless runs have no editor to ask, so color lookups stay
    // unanswered and cursor colors fall back to the default foreground
    let (tx, rx) = mpsc::channel();
    let resolver = ChannelResolver::new(|_| None, tx);

    let dims = config.dimensions();
    let mut renderer = Renderer::with_colors(
        dims,
        config.screen_colors(),
        RecordingSurface::new(dims),
        Box::new(resolver),
    );

    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let batch: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Line {}: invalid JSON: {}", line_no + 1, e);
                return ExitCode::FAILURE;
            },
        };
        let events = match decode_batch(&batch) {
            Ok(events) => events,
            Err(e) => {
                eprintln!("Line {}: {}", line_no + 1, e);
                return ExitCode::FAILURE;
            },
        };
        renderer.apply_batch(&events);
        renderer.idle();
        renderer.drain_resolutions(&rx);
    }

    match output_format {
        OutputFormat::Text => print!("{}", renderer.surface().to_text()),
        OutputFormat::Json => match serde_json::to_string_pretty(renderer.surface().calls()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize surface calls: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

fn print_help() {
    println!("Neoscreen Headless Runner");
    println!();
    println!("Usage: neoscreen-headless [OPTIONS] [FILE]");
    println!();
    println!("Reads newline-delimited JSON redraw batches from FILE or stdin.");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>      Grid columns (default: 80)");
    println!("  -r, --rows <N>      Grid rows (default: 24)");
    println!("  -C, --config <F>    Load configuration from JSON file");
    println!("  -f, --file <F>      Input file (default: stdin)");
    println!("  -t, --text          Output rendered glyph layer as text (default)");
    println!("  -j, --json          Output recorded surface calls as JSON");
    println!("  -h, --help          Show this help");
}
