//! CLI for the Bell-LaPadula covert channel demonstration.
//!
//! `transmit`: read file -> frame bits -> HIGH sender / LOW receiver -> write decoded file -> report.
//! `replay`: run an instruction script through the reference monitor.

use clap::{Parser, Subcommand};
use covert_channel::reporter::Report;
use covert_channel::sink::json_stream::JsonStreamSink;
use covert_channel::{Session, SessionConfig};
use covert_core::types::SecurityLevel;
use covert_monitor::ReferenceMonitor;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "covert", version, about = "Bell-LaPadula reference monitor and storage covert channel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Leak a file from a HIGH subject to a LOW subject through object existence.
    Transmit {
        /// File whose bytes are sent. Must not contain zero bytes.
        input: PathBuf,

        #[arg(short, long, env = "COVERT_OUTPUT", default_value = "output.txt")]
        output: PathBuf,

        /// Log every turn.
        #[arg(short, long, default_value_t = false)]
        verbose: bool,

        /// Shared signalling object.
        #[arg(long, env = "COVERT_OBJECT", default_value = "obj")]
        object: String,

        /// Per-turn trace: "ndjson" writes NDJSON to stdout,
        /// "ndjson:/path/to/file" writes to file.
        #[arg(long)]
        trace: Option<String>,

        /// Print the summary as JSON instead of the boxed report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Replay an instruction script (`<command> <subject> <object> [value]` per line).
    Replay {
        script: PathBuf,

        /// Subject registration, NAME=LEVEL. Defaults to hal=high and lyle=low.
        #[arg(long = "subject", value_parser = parse_assignment)]
        subjects: Vec<(String, SecurityLevel)>,

        /// Object seeded with value 0 before replay, NAME=LEVEL.
        #[arg(long = "object", value_parser = parse_assignment)]
        objects: Vec<(String, SecurityLevel)>,

        /// One JSON object per step instead of text lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn parse_assignment(s: &str) -> Result<(String, SecurityLevel), String> {
    let (name, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=LEVEL, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty name in '{s}'"));
    }
    let level = level.parse::<SecurityLevel>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), level))
}

/// Reads the message file. A missing or unreadable input is fatal.
fn load_message(input: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(input).map_err(|e| format!("cannot read input file {}: {e}", input.display()))
}

fn write_decoded(output: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(output, bytes)
        .map_err(|e| format!("cannot write output file {}: {e}", output.display()))
}

fn run_transmit(
    input: &Path,
    output: &Path,
    verbose: bool,
    object: String,
    trace: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Read the message.
    let message = load_message(input)?;
    tracing::info!(input = %input.display(), bytes = message.len(), "loaded message");

    // 2. Run both actors.
    let session = Session::new(SessionConfig {
        object,
        verbose,
        record_trace: trace.is_some(),
    });
    let tx = session.transmit(&message)?;

    // 3. Write what the receiver decoded. A failure here is reported
    // after the summary; the in-memory result is already complete.
    let write_result = write_decoded(output, &tx.decoded);
    match &write_result {
        Ok(()) => tracing::info!(
            output = %output.display(),
            bytes = tx.decoded.len(),
            "wrote decoded output"
        ),
        Err(e) => tracing::error!(output = %output.display(), error = %e, "failed to write output"),
    }

    let report = Report::build(&message, &tx);

    // 4. Trace sink.
    if let Some(ref sink_spec) = trace {
        if sink_spec == "ndjson" {
            let mut s = JsonStreamSink::stdout();
            s.write_summary(&report.to_row())?;
            s.write_events(&tx.events)?;
            let n = s.finish()?;
            tracing::info!(rows = n, "ndjson trace: wrote to stdout");
        } else if let Some(path) = sink_spec.strip_prefix("ndjson:") {
            let file = std::fs::File::create(path)?;
            let mut s = JsonStreamSink::new(file);
            s.write_summary(&report.to_row())?;
            s.write_events(&tx.events)?;
            let n = s.finish()?;
            tracing::info!(rows = n, path, "ndjson trace: wrote to file");
        } else {
            eprintln!("Unknown trace sink: {}. Use 'ndjson' or 'ndjson:/path'", sink_spec);
        }
    }

    // 5. Summary. Kept off stdout when the trace is streaming there.
    if json {
        let rendered = serde_json::to_string_pretty(&report.to_row())?;
        if trace.as_deref() == Some("ndjson") {
            eprintln!("{rendered}");
        } else {
            println!("{rendered}");
        }
    } else if trace.as_deref() == Some("ndjson") {
        eprint!("{}", report.render());
    } else {
        print!("{}", report.render());
    }

    write_result?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transmit {
            input,
            output,
            verbose,
            object,
            trace,
            json,
        } => run_transmit(&input, &output, verbose, object, trace, json)?,

        Commands::Replay {
            script,
            subjects,
            objects,
            json,
        } => {
            let text = std::fs::read_to_string(&script)
                .map_err(|e| format!("cannot read script {}: {e}", script.display()))?;
            let steps = covert_core::parse_script(&text);

            let monitor = ReferenceMonitor::new();
            let subjects = if subjects.is_empty() {
                vec![
                    ("hal".to_string(), SecurityLevel::High),
                    ("lyle".to_string(), SecurityLevel::Low),
                ]
            } else {
                subjects
            };
            for (name, level) in &subjects {
                monitor.register_subject(name, *level)?;
            }
            for (name, level) in &objects {
                monitor.seed_object(name, *level)?;
            }

            tracing::info!(
                steps = steps.len(),
                subjects = subjects.len(),
                objects = objects.len(),
                "replaying script"
            );

            let outcomes = covert_monitor::replay(&monitor, &steps)?;
            for outcome in &outcomes {
                if json {
                    println!("{}", serde_json::to_string(outcome)?);
                } else {
                    println!("{outcome}");
                }
            }
        }
    }

    Ok(())
}
