use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, ensure};

use crate::hex::parse_hex;

/// Unified input reader that handles both file and pipe input with buffered reading
pub struct InputReader {
    reader: Box<dyn Read>,
    is_pipe: bool,
}

impl InputReader {
    /// Create a new InputReader from a path
    /// Use "-" for stdin pipe input
    pub fn new<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path_str = input_path.as_ref().to_string_lossy();
        let is_pipe = path_str == "-";

        let reader: Box<dyn Read> = if is_pipe {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(input_path.as_ref())
                .with_context(|| format!("Failed to open {path_str}"))?;
            Box::new(BufReader::new(file))
        };

        Ok(Self { reader, is_pipe })
    }

    /// Check if this is pipe input
    pub fn is_pipe(&self) -> bool {
        self.is_pipe
    }

    /// Read all remaining data. Payloads are parameter sets or OBUs, so the
    /// whole input is held in memory.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Load a payload, decoding hex text if requested and dropping `offset`
/// leading bytes.
pub fn read_payload(input_path: &Path, hex: bool, offset: usize) -> Result<Vec<u8>> {
    let mut reader = InputReader::new(input_path)?;
    if reader.is_pipe() {
        log::debug!("Reading payload from stdin");
    }

    let raw = reader.read_all()?;
    let mut data = if hex {
        let text = String::from_utf8(raw).context("Hex input is not valid UTF-8")?;
        parse_hex(&text)?
    } else {
        raw
    };

    ensure!(
        offset <= data.len(),
        "Offset {offset} exceeds payload size of {} bytes",
        data.len()
    );
    data.drain(..offset);

    Ok(data)
}
