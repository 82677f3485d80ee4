use std::fmt::{self, Write as _};

use anyhow::{Result, bail};
use mediabits::process::fields::{FieldDecoder, FieldReport, FieldSource};
use mediabits::readers::golomb::ExpGolombReader;
use mediabits::readers::obu::Av1BitReader;

use super::command::{Cli, ProbeArgs};
use crate::input::read_payload;

pub fn cmd_h26x(args: &ProbeArgs, cli: &Cli) -> Result<()> {
    let payload = read_payload(&args.input, args.hex, args.offset)?;
    log::info!(
        "Probing RBSP: {} ({} bytes)",
        args.input.display(),
        payload.len()
    );

    probe(ExpGolombReader::new(&payload), args, cli)
}

pub fn cmd_av1(args: &ProbeArgs, cli: &Cli) -> Result<()> {
    let payload = read_payload(&args.input, args.hex, args.offset)?;
    log::info!(
        "Probing OBU payload: {} ({} bytes)",
        args.input.display(),
        payload.len()
    );

    probe(Av1BitReader::new(&payload), args, cli)
}

fn probe<R: FieldSource>(reader: R, args: &ProbeArgs, cli: &Cli) -> Result<()> {
    let report = FieldDecoder::new(reader).decode_all(&args.fields);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report)?);
    }

    if let Some(failure) = &report.failure {
        bail!(
            "Field #{} {} failed at bit {}: {}",
            failure.index,
            failure.field,
            failure.bit_offset,
            failure.error
        );
    }

    if report.more_data {
        let msg = format!(
            "{} bits left before the trailing bits after the last field",
            report.bits_remaining
        );
        if cli.strict {
            bail!(msg);
        }
        log::warn!("{msg}");
    }

    Ok(())
}

fn render_text(report: &FieldReport) -> Result<String, fmt::Error> {
    let mut out = String::new();

    let name_width = report
        .fields
        .iter()
        .filter_map(|f| f.name.as_deref().map(str::len))
        .max()
        .unwrap_or(0)
        .max(5);

    writeln!(
        out,
        "{:>6}  {:<name_width$}  {:<9}  Value",
        "Bit", "Field", "Type"
    )?;
    for field in &report.fields {
        writeln!(
            out,
            "{:>6}  {:<name_width$}  {:<9}  {}",
            field.bit_offset,
            field.name.as_deref().unwrap_or("-"),
            field.descriptor,
            field.value
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Bits consumed {}, remaining {}",
        report.bits_consumed, report.bits_remaining
    )?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabits::process::fields::FieldSpec;

    fn report(payload: &[u8], list: &str) -> FieldReport {
        let specs: Vec<FieldSpec> = list.split(',').map(|s| s.parse().unwrap()).collect();
        FieldDecoder::new(ExpGolombReader::new(payload)).decode_all(&specs)
    }

    #[test]
    fn text_listing() {
        let text = render_text(&report(
            &[0x64, 0x00, 0x1F, 0xAC],
            "profile_idc:u(8),skip(16),ue(v)",
        ))
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "   Bit  Field        Type       Value");
        assert_eq!(lines[1], "     0  profile_idc  u(8)       100");
        assert_eq!(lines[2], "     8  -            skip(16)   -");
        assert_eq!(lines[3], "    24  -            ue(v)      0");
        assert_eq!(lines[5], "Bits consumed 25, remaining 7");
    }

    #[test]
    fn json_report() {
        let json = serde_json::to_value(report(&[0x40], "a:ue(v),b:u(8)")).unwrap();

        assert_eq!(json["reader"], "h26x");
        assert_eq!(json["fields"][0]["value"], 1);
        assert_eq!(json["failure"]["index"], 1);
        assert_eq!(json["failure"]["error"], "Out of bits at position 8 of 8");
    }
}
