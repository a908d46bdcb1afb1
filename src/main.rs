use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quietport::config::ConfigLoader;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "quietport",
    version,
    about = "Serial port I/O through stty with quiet-period read termination.",
    long_about = "Configures a POSIX serial device with stty, writes bytes, and reads \
                  until the line goes quiet a given number of times instead of reading \
                  a fixed length or up to a delimiter."
)]
struct Args {
    /// Explicit configuration file path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device path (overrides configuration).
    #[arg(short, long)]
    device: Option<PathBuf>,

    /// Baud rate (overrides configuration).
    #[arg(short, long)]
    baud: Option<u32>,

    /// Read deadline in seconds (overrides configuration).
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read from the port until the line has gone quiet.
    Read {
        /// Number of silence periods that terminate the read.
        #[arg(short = 'n', long, default_value_t = 1)]
        blocks: u32,
    },
    /// Write data to the port.
    Write {
        /// Data to send, verbatim (no trailing newline is added).
        data: String,
    },
    /// Print the resolved configuration as TOML.
    Config,
}

#[cfg(not(unix))]
fn main() {
    eprintln!("quietport requires a unix-like OS with stty");
    std::process::exit(1);
}

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use quietport::SerialPort;
    use tracing_subscriber::EnvFilter;

    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();

    if let Some(device) = args.device {
        config.serial.device = device;
    }
    if let Some(baud) = args.baud {
        config.serial.baud = baud;
    }
    if let Some(secs) = args.timeout_secs {
        config.serial.timeout_secs = secs;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Command::Write { data } => {
            let mut port = SerialPort::new(config.serial.to_port_settings());
            port.write(data.as_bytes());
            if !port.is_open() {
                std::process::exit(1);
            }
        }
        Command::Read { blocks } => {
            let mut port = SerialPort::new(config.serial.to_port_settings());
            let data = port.read(blocks);
            if !port.is_open() {
                std::process::exit(1);
            }
            println!("{}", String::from_utf8_lossy(&data));
        }
    }

    Ok(())
}
