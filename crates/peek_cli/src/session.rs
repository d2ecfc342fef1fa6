//! Shared setup for the subcommands: configuration, waveform loading and
//! trigger evaluation.

use std::path::Path;

use peek_config::{PeekConfig, ResolvedTrigger, TriggerMode};
use peek_probe::LoadedVcd;
use peek_trace::{Tick, Trace, Value};

use crate::GlobalArgs;

/// Loads `--config` if given, else `./peek.toml` if present, else defaults.
pub fn load_settings(global: &GlobalArgs) -> Result<PeekConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => peek_config::load_config_file(path)?,
        None => peek_config::load_config_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Loads a VCD file and applies `[trace]` settings to every signal.
pub fn open_waveform(
    path: &Path,
    config: &PeekConfig,
) -> Result<LoadedVcd, Box<dyn std::error::Error>> {
    let mut loaded = peek_probe::load_vcd_file(path)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    loaded
        .group
        .set_default_value(&Value::from(config.trace.default_value));
    log::info!(
        "{}: {} signals, timescale {}",
        path.display(),
        loaded.group.len(),
        loaded.timescale
    );
    Ok(loaded)
}

/// Evaluates a resolved trigger; the result is named after its label.
pub fn evaluate_trigger(
    trigger: &ResolvedTrigger,
    waveform: &LoadedVcd,
) -> Result<Trace, Box<dyn std::error::Error>> {
    let trace = peek_expr::eval_str(&trigger.expr, &waveform.group)
        .map_err(|e| format!("in trigger `{}`: {e}", trigger.expr))?;
    Ok(trace.renamed(trigger.label.as_str()))
}

/// Reduces a trigger trace to ticks according to `mode`.
pub fn trigger_times(trace: &Trace, horizon: Tick, mode: TriggerMode) -> Vec<Tick> {
    match mode {
        TriggerMode::Ticks => trace.trig_times(horizon),
        TriggerMode::Edges => trace.trig_edges(horizon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VCD: &str = "\
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 8 \" data $end
$upscope $end
$enddefinitions $end
#0
0!
b0 \"
#5
1!
#8
0!
b101 \"
#12
1!
";

    fn write_vcd(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("dump.vcd");
        fs::write(&path, VCD).unwrap();
        path
    }

    #[test]
    fn open_waveform_applies_default_value() {
        let tmp = TempDir::new().unwrap();
        let config = peek_config::load_config_from_str("[trace]\ndefault_value = 9\n").unwrap();
        let loaded = open_waveform(&write_vcd(&tmp), &config).unwrap();
        assert_eq!(loaded.group.len(), 2);
        assert_eq!(
            *loaded.group.trace("top.clk").unwrap().default_value(),
            Value::from(9)
        );
    }

    #[test]
    fn open_waveform_names_the_file_on_error() {
        let err = open_waveform(Path::new("/nonexistent/dump.vcd"), &PeekConfig::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/dump.vcd: "));
    }

    #[test]
    fn trigger_is_named_after_label() {
        let tmp = TempDir::new().unwrap();
        let loaded = open_waveform(&write_vcd(&tmp), &PeekConfig::default()).unwrap();
        let trigger = ResolvedTrigger {
            label: "rise".into(),
            expr: "clk & ~clk.delay(1)".into(),
        };
        let trace = evaluate_trigger(&trigger, &loaded).unwrap();
        assert_eq!(trace.name(), "rise");
        assert_eq!(trigger_times(&trace, 14, TriggerMode::Ticks), vec![5, 12]);
    }

    #[test]
    fn modes_select_ticks_or_run_starts() {
        let t = Trace::from_samples("t", 1, [(0, 0), (5, 1), (8, 0), (12, 1)]).unwrap();
        assert_eq!(trigger_times(&t, 14, TriggerMode::Ticks), vec![5, 6, 7, 12, 13]);
        assert_eq!(trigger_times(&t, 14, TriggerMode::Edges), vec![5, 12]);
    }

    #[test]
    fn bad_trigger_mentions_expression() {
        let tmp = TempDir::new().unwrap();
        let loaded = open_waveform(&write_vcd(&tmp), &PeekConfig::default()).unwrap();
        let trigger = ResolvedTrigger {
            label: "x".into(),
            expr: "nosuch & 1".into(),
        };
        let err = evaluate_trigger(&trigger, &loaded).unwrap_err();
        assert_eq!(
            err.to_string(),
            "in trigger `nosuch & 1`: at offset 0: unknown signal 'nosuch'"
        );
    }
}
