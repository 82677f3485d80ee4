use anyhow::{Context, Result};
use mediabits::readers::obu::decode_leb128;

use super::command::Leb128Args;
use crate::hex::parse_hex;

pub fn cmd_leb128(args: &Leb128Args) -> Result<()> {
    let bytes = parse_hex(&args.bytes.join(" "))?;
    log::debug!("Decoding leb128() from {} bytes", bytes.len());

    let (value, used) = decode_leb128(&bytes).context("Failed to decode leb128()")?;

    println!("Value                       {value} ({value:#X})");
    println!("Bytes consumed              {used}");
    if used < bytes.len() {
        log::warn!("{} trailing bytes ignored", bytes.len() - used);
    }

    Ok(())
}
