use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use vdt_send::config::{Config, ConfigLoader};
use vdt_send::{logging, open_and_send, AppResult};

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Send raw Videotex (VDT) files to a Minitel over a serial line.",
    long_about = "Writes each file verbatim, in argument order, to the serial device. \
                  The line defaults to /dev/ttyUSB0 at 1200 baud 7E1 without flow control; \
                  other line profiles are selected in the configuration file."
)]
struct Args {
    /// Files to send, in order.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Configuration file (defaults to the standard search path).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Serial device to write to, overriding the configuration.
    #[arg(short, long, value_name = "PATH")]
    device: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> AppResult<()> {
    let mut config: Config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?.into_config(),
        None => ConfigLoader::load()?.into_config(),
    };
    if let Some(device) = args.device {
        config.serial.device = device;
        config.validate()?;
    }

    logging::init(&config.logging, args.verbose)?;

    let settings = config.serial.line_settings();
    debug!(?config, "Resolved configuration");
    info!("Line profile {}: {}", config.serial.profile, settings);

    let report = open_and_send(
        &config.serial.device,
        &settings,
        config.transmit.write_mode,
        &args.files,
    )?;

    info!(
        "Done: {} file(s), {} bytes sent to {}",
        report.files.len(),
        report.bytes_written,
        config.serial.device
    );
    Ok(())
}
