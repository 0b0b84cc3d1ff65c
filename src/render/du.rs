use crate::Result;
use crate::model::DurationMap;

use anyhow::Context;
use std::io::Write;

/// Write a du-like report: one `<seconds>\t<target>` line per target, in map
/// order, with no header. This is the input format webtreemap expects.
pub fn write_du_report<W: Write>(out: &mut W, durations: &DurationMap) -> Result<()> {
    for (target, secs) in durations {
        writeln!(out, "{}\t{}", format_secs(*secs), target)
            .with_context(|| format!("write report line for {}", target))?;
    }
    Ok(())
}

/// Shortest round-trip form, always with a fractional part or exponent:
/// `1.0`, `1.5`, `0.30000000000000004`, `1e+16`, `1.5e-05`.
pub fn format_secs(secs: f64) -> String {
    let s = format!("{:?}", secs);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}
