use anyhow::Result;
use clap::Parser as ClapParser;

use cli::command::{Cli, Commands, LogFormat};
use cli::leb128::cmd_leb128;
use cli::probe::{cmd_av1, cmd_h26x};

mod cli;
mod hex;
mod input;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(cli.loglevel.to_level_filter());
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                writeln!(
                    buf,
                    "{{\"ts\":{},\"lvl\":\"{}\",\"msg\":{}}}",
                    buf.timestamp(),
                    record.level(),
                    serde_json::Value::String(record.args().to_string())
                )
            });
        }
    }
    env_builder.try_init()?;

    match cli.command {
        Commands::H26x(ref args) => cmd_h26x(args, &cli)?,
        Commands::Av1(ref args) => cmd_av1(args, &cli)?,
        Commands::Leb128(ref args) => cmd_leb128(args)?,
    }

    Ok(())
}
