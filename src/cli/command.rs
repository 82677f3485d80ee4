use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use mediabits::process::fields::FieldSpec;

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    author     = env!("CARGO_PKG_AUTHORS"),
    about      = "Tools for probing codec parameter fields in H.264/H.265 and AV1 payloads",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat unread payload before the trailing bits as an error.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode fields from an H.264/H.265 RBSP (emulation prevention removed).
    H26x(ProbeArgs),

    /// Decode fields from an AV1 OBU payload.
    Av1(ProbeArgs),

    /// Decode a leb128() value from hex bytes.
    Leb128(Leb128Args),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input payload (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Comma separated field descriptors, e.g. "profile_idc:u(8),sps_id:ue(v)".
    #[arg(long, short, value_name = "LIST", value_delimiter = ',', required = true)]
    pub fields: Vec<FieldSpec>,

    /// Number of leading bytes to skip (e.g. the NAL unit header).
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    pub offset: usize,

    /// Input holds hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,

    /// Output machine-readable JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct Leb128Args {
    /// Hex encoded bytes, e.g. "ac02" or "ac 02".
    #[arg(value_name = "HEX", num_args = 1.., required = true)]
    pub bytes: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mediabits::process::fields::FieldKind;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_field_list() {
        let cli = Cli::try_parse_from([
            "mediaprobe",
            "h26x",
            "sps.bin",
            "--fields",
            "profile_idc:u(8),skip(16),sps_id:ue(v)",
            "--offset",
            "1",
        ])
        .unwrap();

        let Commands::H26x(args) = cli.command else {
            panic!("expected h26x subcommand");
        };
        assert_eq!(args.offset, 1);
        assert_eq!(
            args.fields,
            vec![
                FieldSpec::new("profile_idc", FieldKind::U(8)),
                FieldSpec {
                    name: None,
                    kind: FieldKind::Skip(16),
                },
                FieldSpec::new("sps_id", FieldKind::Ue),
            ]
        );
    }

    #[test]
    fn rejects_bad_descriptor() {
        let res = Cli::try_parse_from(["mediaprobe", "av1", "-", "--fields", "u(99)"]);
        assert!(res.is_err());
    }
}
