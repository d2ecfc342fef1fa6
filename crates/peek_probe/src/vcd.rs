//! VCD file source for peekers.
//!
//! Parses IEEE 1364 Value Change Dump files and replays every value change
//! into a [`PeekerGroup`], one peeker per `$var`. Ticks are the raw VCD
//! timestamps; the header's `$timescale` is kept alongside for display.
//!
//! `x` and `z` bits read as 0. Several changes to one signal within a single
//! timestamp collapse to the last one.

use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;

use num::BigInt;
use peek_trace::{Tick, Value};
use thiserror::Error;

use crate::error::ProbeError;
use crate::group::PeekerGroup;
use crate::time::Timescale;

/// Errors that can occur while loading a VCD file.
#[derive(Debug, Error)]
pub enum VcdLoadError {
    /// An I/O error occurred while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A parse error at a specific line number.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// The 1-based line number where the error occurred.
        line: usize,
        /// Description of the error.
        message: String,
    },
    /// The VCD file has a structural format error.
    #[error("format error: {0}")]
    FormatError(String),
    /// Replaying a value change into a peeker failed.
    #[error("failed to record value change: {0}")]
    Probe(#[from] ProbeError),
}

/// Header metadata for one `$var`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VcdSignalDef {
    /// The VCD identifier code (e.g., `!`, `"`, `!"`).
    pub id_code: String,
    /// The hierarchical signal name (dotted path from the scope stack).
    pub name: String,
    /// Bit width of the signal.
    pub width: u32,
    /// The VCD variable type (e.g., `wire`, `reg`).
    pub var_type: String,
}

/// A VCD file replayed into peekers.
#[derive(Clone, Debug)]
pub struct LoadedVcd {
    /// Timescale from the header.
    pub timescale: Timescale,
    /// Signal definitions, parallel to the peekers in `group`.
    pub signals: Vec<VcdSignalDef>,
    /// One peeker per signal, holding its full value-change history.
    pub group: PeekerGroup,
}

impl LoadedVcd {
    /// The last timestamp at which any signal changed.
    pub fn end_time(&self) -> Option<Tick> {
        self.group.max_time()
    }
}

/// Loads a VCD waveform from a buffered reader.
///
/// # Errors
///
/// Returns [`VcdLoadError`] on I/O errors, malformed header or value-change
/// lines, timestamps that go backwards, or a missing `$enddefinitions`.
pub fn load_vcd<R: BufRead>(reader: R) -> Result<LoadedVcd, VcdLoadError> {
    let mut tokens = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        tokens.extend(line.split_whitespace().map(|tok| (idx + 1, tok.to_string())));
    }

    let mut loader = Loader::default();
    loader.run(tokens.into_iter())?;
    let loaded = loader.finish()?;
    log::debug!(
        "loaded {} VCD signals, last change at tick {:?}, timescale {}",
        loaded.signals.len(),
        loaded.end_time(),
        loaded.timescale
    );
    Ok(loaded)
}

/// Loads a VCD file from a filesystem path.
///
/// # Errors
///
/// Returns [`VcdLoadError`] on I/O or parse errors.
pub fn load_vcd_file(path: &Path) -> Result<LoadedVcd, VcdLoadError> {
    let file = std::fs::File::open(path)?;
    load_vcd(std::io::BufReader::new(file))
}

#[derive(Default)]
struct Loader {
    timescale: Timescale,
    signals: Vec<VcdSignalDef>,
    group: PeekerGroup,
    ids: HashMap<String, Vec<usize>>,
    scopes: Vec<String>,
    saw_enddefinitions: bool,
    time: Tick,
    pending: BTreeMap<usize, Value>,
}

impl Loader {
    fn run<I>(&mut self, mut tokens: I) -> Result<(), VcdLoadError>
    where
        I: Iterator<Item = (usize, String)>,
    {
        while let Some((line, tok)) = tokens.next() {
            if let Some(keyword) = tok.strip_prefix('$') {
                self.keyword(keyword, line, &mut tokens)?;
            } else if let Some(time) = tok.strip_prefix('#') {
                self.timestamp(time, line)?;
            } else {
                self.value_change(&tok, line, &mut tokens)?;
            }
        }
        self.flush()
    }

    fn keyword<I>(&mut self, keyword: &str, line: usize, tokens: &mut I) -> Result<(), VcdLoadError>
    where
        I: Iterator<Item = (usize, String)>,
    {
        match keyword {
            // value-change section markers; their bodies are ordinary changes
            "dumpvars" | "dumpall" | "dumpon" | "dumpoff" | "end" => return Ok(()),
            _ => {}
        }
        let body = collect_body(keyword, line, tokens)?;
        match keyword {
            "enddefinitions" => self.saw_enddefinitions = true,
            "timescale" => {
                let text = body.concat();
                self.timescale = text.parse().map_err(|_| VcdLoadError::ParseError {
                    line,
                    message: format!("invalid timescale: {text}"),
                })?;
            }
            "scope" => {
                // "module <name>", "begin <name>", ...
                if let Some(name) = body.get(1).or_else(|| body.first()) {
                    self.scopes.push(name.clone());
                }
            }
            "upscope" => {
                self.scopes.pop();
            }
            "var" => self.var(&body, line)?,
            _ => {}
        }
        Ok(())
    }

    fn var(&mut self, body: &[String], line: usize) -> Result<(), VcdLoadError> {
        // "<type> <width> <id_code> <name> [<range>]"
        let [var_type, width, id_code, var_name, ..] = body else {
            return Err(VcdLoadError::ParseError {
                line,
                message: format!("invalid $var: {}", body.join(" ")),
            });
        };
        let width: u32 = width.parse().map_err(|_| VcdLoadError::ParseError {
            line,
            message: format!("invalid width in $var: {width}"),
        })?;
        let name = if self.scopes.is_empty() {
            var_name.clone()
        } else {
            format!("{}.{var_name}", self.scopes.join("."))
        };

        let idx = self.group.add(name.as_str(), width);
        self.ids.entry(id_code.clone()).or_default().push(idx);
        self.signals.push(VcdSignalDef {
            id_code: id_code.clone(),
            name,
            width,
            var_type: var_type.clone(),
        });
        Ok(())
    }

    fn timestamp(&mut self, text: &str, line: usize) -> Result<(), VcdLoadError> {
        let time: Tick = text.parse().map_err(|_| VcdLoadError::ParseError {
            line,
            message: format!("invalid timestamp: #{text}"),
        })?;
        if time < self.time {
            return Err(VcdLoadError::ParseError {
                line,
                message: format!("timestamp #{time} goes back from #{}", self.time),
            });
        }
        if time > self.time {
            self.flush()?;
            self.time = time;
        }
        Ok(())
    }

    fn value_change<I>(&mut self, tok: &str, line: usize, tokens: &mut I) -> Result<(), VcdLoadError>
    where
        I: Iterator<Item = (usize, String)>,
    {
        let mut chars = tok.chars();
        let Some(kind) = chars.next() else {
            return Ok(());
        };
        let (value, id_code) = match kind {
            '0' | '1' | 'x' | 'X' | 'z' | 'Z' => (Value::from(kind == '1'), chars.as_str().to_string()),
            'b' | 'B' => {
                let id = next_id(tok, line, tokens)?;
                (parse_binary(chars.as_str(), line)?, id)
            }
            'r' | 'R' => {
                let id = next_id(tok, line, tokens)?;
                let real: f64 = chars.as_str().parse().map_err(|_| VcdLoadError::ParseError {
                    line,
                    message: format!("invalid real value: {tok}"),
                })?;
                (Value::Real(real), id)
            }
            _ => {
                return Err(VcdLoadError::ParseError {
                    line,
                    message: format!("unexpected token: {tok}"),
                })
            }
        };

        match self.ids.get(&id_code) {
            Some(indices) => {
                for &idx in indices {
                    self.pending.insert(idx, value.clone());
                }
            }
            None => log::warn!("line {line}: value change for undeclared id code '{id_code}'"),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), VcdLoadError> {
        for (idx, value) in std::mem::take(&mut self.pending) {
            if let Some(peeker) = self.group.peeker_mut(idx) {
                peeker.observe(self.time, value).map_err(ProbeError::from)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<LoadedVcd, VcdLoadError> {
        if !self.saw_enddefinitions && !self.signals.is_empty() {
            return Err(VcdLoadError::FormatError(
                "missing $enddefinitions".to_string(),
            ));
        }
        Ok(LoadedVcd {
            timescale: self.timescale,
            signals: self.signals,
            group: self.group,
        })
    }
}

/// Collects keyword body tokens up to the closing `$end`.
fn collect_body<I>(keyword: &str, line: usize, tokens: &mut I) -> Result<Vec<String>, VcdLoadError>
where
    I: Iterator<Item = (usize, String)>,
{
    let mut body = Vec::new();
    for (_, tok) in tokens.by_ref() {
        if tok == "$end" {
            return Ok(body);
        }
        body.push(tok);
    }
    Err(VcdLoadError::ParseError {
        line,
        message: format!("unterminated ${keyword}"),
    })
}

fn next_id<I>(tok: &str, line: usize, tokens: &mut I) -> Result<String, VcdLoadError>
where
    I: Iterator<Item = (usize, String)>,
{
    tokens
        .next()
        .map(|(_, id)| id)
        .ok_or_else(|| VcdLoadError::ParseError {
            line,
            message: format!("missing id code after {tok}"),
        })
}

/// Parses an MSB-first binary string; `x`/`z` bits read as 0.
fn parse_binary(bits: &str, line: usize) -> Result<Value, VcdLoadError> {
    let cleaned: Vec<u8> = bits
        .bytes()
        .map(|b| match b {
            b'x' | b'X' | b'z' | b'Z' => b'0',
            other => other,
        })
        .collect();
    BigInt::parse_bytes(&cleaned, 2)
        .map(Value::Int)
        .ok_or_else(|| VcdLoadError::ParseError {
            line,
            message: format!("invalid binary value: b{bits}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeUnit;
    use peek_trace::HasTrace;
    use std::io::{Cursor, Write};

    fn history(loaded: &LoadedVcd, name: &str) -> Vec<(Tick, i64)> {
        loaded
            .group
            .trace(name)
            .unwrap()
            .samples()
            .iter()
            .map(|s| (s.time, s.value.to_i64().unwrap()))
            .collect()
    }

    fn minimal_vcd() -> &'static str {
        "\
$date
  Simulation date
$end
$version
  Some Simulator
$end
$timescale
  1ns
$end
$scope module top $end
$var wire 1 ! clk $end
$upscope $end
$enddefinitions $end
$dumpvars
0!
$end
#5
1!
#10
0!
"
    }

    #[test]
    fn load_minimal_vcd() {
        let loaded = load_vcd(Cursor::new(minimal_vcd())).unwrap();
        assert_eq!(loaded.signals.len(), 1);
        assert_eq!(loaded.signals[0].name, "top.clk");
        assert_eq!(loaded.signals[0].width, 1);
        assert_eq!(loaded.signals[0].id_code, "!");
        assert_eq!(loaded.timescale, Timescale::new(1, TimeUnit::Ns));
        assert_eq!(history(&loaded, "top.clk"), vec![(0, 0), (5, 1), (10, 0)]);
        assert_eq!(loaded.end_time(), Some(10));
    }

    #[test]
    fn multi_signal() {
        let vcd = "\
$timescale 10ps $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 1 \" data $end
$upscope $end
$enddefinitions $end
#0
0!
1\"
#100
1!
0\"
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(loaded.timescale, Timescale::new(10, TimeUnit::Ps));
        assert_eq!(loaded.group.names(), vec!["top.clk", "top.data"]);
        assert_eq!(history(&loaded, "top.clk"), vec![(0, 0), (100, 1)]);
        assert_eq!(history(&loaded, "top.data"), vec![(0, 1), (100, 0)]);
    }

    #[test]
    fn binary_values() {
        let vcd = "\
$scope module top $end
$var wire 4 ! data $end
$upscope $end
$enddefinitions $end
#0
b0000 !
#100
b1010 !
#200
b101 !
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(history(&loaded, "top.data"), vec![(0, 0), (100, 10), (200, 5)]);
    }

    #[test]
    fn wide_binary_value() {
        let bits = format!("1{}", "0".repeat(99));
        let vcd = format!(
            "$var wire 100 ! wide $end\n$enddefinitions $end\n#0\nb{bits} !\n"
        );
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        let expected = BigInt::from(1u8) << 99usize;
        assert_eq!(
            *loaded.group.trace("wide").unwrap().value_at(0),
            Value::Int(expected)
        );
    }

    #[test]
    fn xz_values_read_as_zero() {
        let vcd = "\
$scope module top $end
$var wire 1 ! sig $end
$var wire 4 \" bus $end
$upscope $end
$enddefinitions $end
#0
x!
bx1z1 \"
#100
1!
#200
z!
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(history(&loaded, "top.sig"), vec![(0, 0), (100, 1), (200, 0)]);
        assert_eq!(history(&loaded, "top.bus"), vec![(0, 0b0101)]);
    }

    #[test]
    fn real_values() {
        let vcd = "\
$var real 64 ! v $end
$enddefinitions $end
#0
r1.5 !
#3
r-0.25 !
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        let t = loaded.group.trace("v").unwrap();
        assert_eq!(*t.value_at(1), Value::Real(1.5));
        assert_eq!(*t.value_at(3), Value::Real(-0.25));
    }

    #[test]
    fn hierarchical_scopes() {
        let vcd = "\
$scope module top $end
$scope module cpu $end
$var wire 1 ! clk $end
$upscope $end
$scope module mem $end
$var wire 8 \" data [7:0] $end
$upscope $end
$upscope $end
$enddefinitions $end
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(loaded.signals[0].name, "top.cpu.clk");
        assert_eq!(loaded.signals[1].name, "top.mem.data");
        assert_eq!(loaded.signals[1].width, 8);
    }

    #[test]
    fn multi_line_var_declaration() {
        let vcd = "\
$var
  reg 8
  # count
$end
$enddefinitions $end
#0
b11 #
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(loaded.signals[0].var_type, "reg");
        assert_eq!(loaded.signals[0].id_code, "#");
        assert_eq!(history(&loaded, "count"), vec![(0, 3)]);
    }

    #[test]
    fn same_timestamp_changes_keep_last_value() {
        let vcd = "\
$var wire 1 ! s $end
$enddefinitions $end
$dumpvars
0!
$end
#0
1!
#4
0!
#4
1!
#6
0!
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(history(&loaded, "s"), vec![(0, 1), (6, 0)]);
    }

    #[test]
    fn aliased_id_codes_feed_every_var() {
        let vcd = "\
$scope module top $end
$var wire 1 ! clk $end
$scope module sub $end
$var wire 1 ! clk_in $end
$upscope $end
$upscope $end
$enddefinitions $end
#0
1!
";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(history(&loaded, "top.clk"), vec![(0, 1)]);
        assert_eq!(history(&loaded, "top.sub.clk_in"), vec![(0, 1)]);
    }

    #[test]
    fn backwards_timestamp_is_an_error() {
        let vcd = "\
$var wire 1 ! s $end
$enddefinitions $end
#10
1!
#5
0!
";
        let err = load_vcd(Cursor::new(vcd)).unwrap_err();
        assert!(matches!(err, VcdLoadError::ParseError { line: 5, .. }));
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        let vcd = "$enddefinitions $end\n#abc\n";
        let err = load_vcd(Cursor::new(vcd)).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn unexpected_token_is_an_error() {
        let vcd = "$var wire 1 ! s $end\n$enddefinitions $end\n#0\nq!\n";
        let err = load_vcd(Cursor::new(vcd)).unwrap_err();
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn unterminated_keyword_is_an_error() {
        let vcd = "$comment never closed\n";
        let err = load_vcd(Cursor::new(vcd)).unwrap_err();
        assert!(err.to_string().contains("unterminated $comment"));
    }

    #[test]
    fn empty_vcd() {
        let vcd = "$timescale 1fs $end\n$enddefinitions $end\n";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert!(loaded.signals.is_empty());
        assert!(loaded.group.is_empty());
        assert_eq!(loaded.end_time(), None);
    }

    #[test]
    fn missing_enddefinitions_with_signals() {
        let vcd = "\
$scope module top $end
$var wire 1 ! clk $end
$upscope $end
";
        let err = load_vcd(Cursor::new(vcd)).unwrap_err();
        assert!(err.to_string().contains("missing $enddefinitions"));
    }

    #[test]
    fn undeclared_id_is_ignored() {
        let vcd = "$var wire 1 ! s $end\n$enddefinitions $end\n#0\n1?\n0!\n";
        let loaded = load_vcd(Cursor::new(vcd)).unwrap();
        assert_eq!(history(&loaded, "s"), vec![(0, 0)]);
    }

    #[test]
    fn peekers_from_vcd_compose() {
        let loaded = load_vcd(Cursor::new(minimal_vcd())).unwrap();
        let clk = loaded.group.get("clk").unwrap();
        let edge = clk.trace().posedge().unwrap();
        assert_eq!(edge.trig_times(20), vec![5]);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{}", minimal_vcd()).unwrap();
        tmp.flush().unwrap();
        let loaded = load_vcd_file(tmp.path()).unwrap();
        assert_eq!(loaded.signals.len(), 1);
    }

    #[test]
    fn load_vcd_file_not_found() {
        let result = load_vcd_file(Path::new("/nonexistent/file.vcd"));
        assert!(matches!(result.unwrap_err(), VcdLoadError::Io(_)));
    }
}
