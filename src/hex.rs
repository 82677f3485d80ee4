use anyhow::{Context, Result};

/// Parse hex text into bytes. Groups are separated by whitespace, `:`, `-`
/// or `,`, may carry a `0x` prefix and must each hold whole bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for group in text
        .split(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == ',')
        .filter(|group| !group.is_empty())
    {
        let digits = group
            .strip_prefix("0x")
            .or_else(|| group.strip_prefix("0X"))
            .unwrap_or(group);

        let decoded =
            hex::decode(digits).with_context(|| format!("Invalid hex group: {group}"))?;
        bytes.extend_from_slice(&decoded);
    }

    Ok(bytes)
}
