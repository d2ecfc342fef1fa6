//! Trigger listings.

use std::io::Write;

use peek_trace::Tick;

use crate::error::ReportError;

/// Output format for a trigger listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ListingFormat {
    /// One tick per line.
    #[default]
    Text,
    /// A JSON array of ticks.
    Json,
}

/// Writes trigger ticks in the requested format.
pub fn write_triggers<W: Write>(
    out: &mut W,
    times: &[Tick],
    format: ListingFormat,
) -> Result<(), ReportError> {
    match format {
        ListingFormat::Text => {
            for t in times {
                writeln!(out, "{t}")?;
            }
        }
        ListingFormat::Json => {
            serde_json::to_writer(&mut *out, times)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(times: &[Tick], format: ListingFormat) -> String {
        let mut buf = Vec::new();
        write_triggers(&mut buf, times, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_is_one_tick_per_line() {
        assert_eq!(render(&[5, 6, 12], ListingFormat::Text), "5\n6\n12\n");
        assert_eq!(render(&[], ListingFormat::Text), "");
    }

    #[test]
    fn json_is_an_array() {
        assert_eq!(render(&[5, 6, 12], ListingFormat::Json), "[5,6,12]\n");
        assert_eq!(render(&[], ListingFormat::Json), "[]\n");
    }
}
