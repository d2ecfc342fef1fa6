//! `peek show`: print signal values in a window.
//!
//! The window is anchored on one occurrence of a trigger when `--trigger` is
//! given, otherwise it spans the whole dump. `--start`/`--stop` override
//! either bound.

use peek_config::{resolve_horizon, resolve_mode, resolve_trigger, DisplayFormat, PeekConfig};
use peek_probe::LoadedVcd;
use peek_report::{write_table, WaveJson, Window};
use peek_trace::Trace;

use crate::session::{evaluate_trigger, load_settings, open_waveform, trigger_times};
use crate::{GlobalArgs, ShowArgs, ShowFormat};

/// Runs the `peek show` command. Returns exit code 0.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let waveform = open_waveform(&args.vcd, &config)?;

    let (window, trigger) = match &args.trigger {
        Some(name_or_expr) => {
            let resolved = resolve_trigger(&config, name_or_expr);
            let trace = evaluate_trigger(&resolved, &waveform)?;
            let horizon = resolve_horizon(&config, None, waveform.end_time());
            let times = trigger_times(&trace, horizon, resolve_mode(&config, false));
            let window = Window::from_triggers(
                &times,
                args.index,
                args.before.unwrap_or(config.display.before),
                args.after.unwrap_or(config.display.after),
            )
            .map_err(|e| format!("trigger `{}`: {e}", resolved.label))?;
            (window, Some(trace))
        }
        None => (
            Window::new(0, waveform.end_time().unwrap_or(0))?,
            None,
        ),
    };
    let window = Window::new(
        args.start.unwrap_or(window.start),
        args.stop.unwrap_or(window.stop),
    )?;
    let mut traces = select_signals(args, &config, &waveform)?;
    log::info!("showing {} signal(s) over {window}", traces.len());

    let title = match &trigger {
        Some(t) => format!("{} #{}", t.name(), args.index),
        None => args.vcd.display().to_string(),
    };
    if let Some(t) = &trigger {
        traces.push(t);
    }

    let format = args.format.unwrap_or(match config.display.format {
        DisplayFormat::Table => ShowFormat::Table,
        DisplayFormat::WaveJson => ShowFormat::Wavejson,
    });
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        ShowFormat::Table => write_table(&mut out, &traces, window)?,
        ShowFormat::Wavejson => WaveJson::build(&traces, window, &title)?.write(&mut out)?,
    }

    if !global.quiet && format == ShowFormat::Table {
        eprintln!("   window {window} ({} ticks), timescale {}", window.len(), waveform.timescale);
    }
    Ok(0)
}

/// Signals from `--signal`, else `display.signals`, else every signal.
fn select_signals<'a>(
    args: &ShowArgs,
    config: &PeekConfig,
    waveform: &'a LoadedVcd,
) -> Result<Vec<&'a Trace>, Box<dyn std::error::Error>> {
    let names: Vec<&str> = if !args.signals.is_empty() {
        args.signals.iter().map(String::as_str).collect()
    } else if !config.display.signals.is_empty() {
        config.display.signals.iter().map(String::as_str).collect()
    } else {
        waveform.group.names()
    };
    let traces = names
        .into_iter()
        .map(|name| waveform.group.trace(name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(traces)
}
