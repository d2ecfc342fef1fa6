//! `peek list`: show the signals recorded in a VCD file.

use std::io::Write;

use peek_probe::LoadedVcd;
use peek_trace::HasTrace;

use crate::session::{load_settings, open_waveform};
use crate::{GlobalArgs, ListArgs};

/// Runs the `peek list` command.
///
/// Prints one line per signal: name, declared width and number of stored
/// value changes. Returns exit code 0.
pub fn run(args: &ListArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let waveform = open_waveform(&args.vcd, &config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_listing(&mut out, &waveform)?;

    if !global.quiet {
        eprintln!(
            "   {} signal(s), timescale {}, last change at {}",
            waveform.group.len(),
            waveform.timescale,
            waveform
                .end_time()
                .map_or_else(|| "-".to_string(), |t| t.to_string())
        );
    }
    Ok(0)
}

/// Writes the aligned signal listing.
fn write_listing<W: Write>(out: &mut W, waveform: &LoadedVcd) -> std::io::Result<()> {
    let name_width = waveform
        .group
        .iter()
        .map(|p| p.name().len())
        .max()
        .unwrap_or(0)
        .max("signal".len());

    writeln!(out, "{:<name_width$}  {:>5}  {:>7}", "signal", "width", "changes")?;
    for peeker in &waveform.group {
        writeln!(
            out,
            "{:<name_width$}  {:>5}  {:>7}",
            peeker.name(),
            peeker.width(),
            peeker.trace().len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn listing_is_aligned() {
        let vcd = "\
$scope module top $end
$var wire 1 ! clk $end
$var wire 16 \" address $end
$upscope $end
$enddefinitions $end
#0
0!
b0 \"
#5
1!
#10
0!
b1 \"
";
        let waveform = peek_probe::load_vcd(Cursor::new(vcd)).unwrap();
        let mut buf = Vec::new();
        write_listing(&mut buf, &waveform).unwrap();
        let expected = "\
signal       width  changes
top.clk          1        3
top.address     16        2
";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
