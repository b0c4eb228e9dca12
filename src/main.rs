use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod error;
mod report;
mod validate;
mod wol;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// MAC address to wake, 12 hexadecimal digits without separators.
    mac: String,

    /// IPv4 address of the target.
    ip: String,

    /// UDP port to send the packet to.
    #[arg(default_value_t = wol::DEFAULT_PORT.to_string())]
    port: String,

    /// Send timeout in milliseconds.
    #[arg(short, long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = SimpleLogger::new()
        .with_level(args.log_level())
        .with_colors(args.color())
        .init()
    {
        eprintln!("unable to initialise logging: {}", err);
    }

    let timeout = Duration::from_millis(args.timeout_ms);
    match wol::wake(&args.mac, &args.ip, &args.port, timeout) {
        Ok(report) => {
            log::info!("sent to {} at {}", report.mac(), report.endpoint());
            let color = args.color() && std::io::stdout().is_terminal();
            println!("{}", report.render(color));
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::info!("wake failed: {:?}", err);
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

#[test]
fn test_args_defaults() {
    let args = Args::try_parse_from(["wol-send", "AABBCCDDEEFF", "192.168.1.100"]).unwrap();
    assert_eq!(args.port, "9");
    assert_eq!(args.timeout_ms, 1000);
    assert_eq!(args.log_level(), LevelFilter::Warn);
    assert!(!args.no_color);
}

#[test]
fn test_args_overrides() {
    let args = Args::try_parse_from([
        "wol-send",
        "AABBCCDDEEFF",
        "192.168.1.100",
        "7",
        "--timeout-ms",
        "250",
        "--no-color",
        "-vv",
    ])
    .unwrap();
    assert_eq!(args.port, "7");
    assert_eq!(args.timeout_ms, 250);
    assert_eq!(args.log_level(), LevelFilter::Debug);
    assert!(!args.color());
}

#[test]
fn test_args_require_mac_and_ip() {
    assert!(Args::try_parse_from(["wol-send", "AABBCCDDEEFF"]).is_err());
}
