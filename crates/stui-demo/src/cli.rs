#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo server.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `STUI_*` prefix.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::process;

use stui_runtime::server::DEFAULT_PORT;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
stui demo: a financial calculator served over Telnet

USAGE:
    stui-demo [OPTIONS]

OPTIONS:
    --port=N             Listen port (default: 2323)
    --bind=ADDR          Listen address (default: 0.0.0.0)
    --max-sessions=N     Refuse clients beyond N concurrent sessions
    --log-json           Emit logs as JSON lines
    --help, -h           Show this help message
    --version, -V        Show version

CONNECT:
    telnet localhost 2323

KEYBINDINGS:
    F1-F7           Switch tabs
    Up / Down       Move focus
    Left / Right    Switch tabs, or move between dialog buttons
    Space / Enter   Press the focused button
    Ctrl+C          Disconnect

ENVIRONMENT VARIABLES:
    STUI_PORT             Override --port
    STUI_BIND             Override --bind
    STUI_MAX_SESSIONS     Override --max-sessions
    STUI_LOG_JSON         Set to 1 for --log-json
    STUI_DEBUG_TRACE      1 or all for raw session traces on stderr, or ids like 3,7
    RUST_LOG              Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub port: u16,
    pub bind: IpAddr,
    /// `None` accepts any number of clients.
    pub max_sessions: Option<usize>,
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            max_sessions: None,
            log_json: false,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or bad input.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("stui-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// The testable core of [`Opts::parse`].
    pub fn parse_from<I, E>(args: I, var: E) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("STUI_PORT") {
            opts.port = parse_value("STUI_PORT", &val)?;
        }
        if let Some(val) = var("STUI_BIND") {
            opts.bind = parse_value("STUI_BIND", &val)?;
        }
        if let Some(val) = var("STUI_MAX_SESSIONS") {
            opts.max_sessions = Some(parse_value("STUI_MAX_SESSIONS", &val)?);
        }
        if let Some(val) = var("STUI_LOG_JSON") {
            opts.log_json = matches!(val.trim(), "1" | "true");
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--log-json" => opts.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--port=") {
                        opts.port = parse_value("--port", val)?;
                    } else if let Some(val) = other.strip_prefix("--bind=") {
                        opts.bind = parse_value("--bind", val)?;
                    } else if let Some(val) = other.strip_prefix("--max-sessions=") {
                        opts.max_sessions = Some(parse_value("--max-sessions", val)?);
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, val: &str) -> Result<T, String> {
    val.trim()
        .parse()
        .map_err(|_| format!("Invalid {name} value: {val}"))
}
