//! `peek trig`: list the ticks at which a trigger fires.

use peek_config::{resolve_horizon, resolve_mode, resolve_trigger};
use peek_report::{write_triggers, ListingFormat};

use crate::session::{evaluate_trigger, load_settings, open_waveform, trigger_times};
use crate::{GlobalArgs, ListFormat, TrigArgs};

/// Exit code when the trigger never fires below the horizon.
pub const EXIT_NO_TRIGGER: i32 = 2;

/// Runs the `peek trig` command.
///
/// Resolves the trigger (a `[triggers]` name or an inline expression),
/// evaluates it against the waveform and prints its ticks. Returns exit code 0
/// if it fired at least once, [`EXIT_NO_TRIGGER`] otherwise.
pub fn run(args: &TrigArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let waveform = open_waveform(&args.vcd, &config)?;

    let trigger = resolve_trigger(&config, &args.trigger);
    let trace = evaluate_trigger(&trigger, &waveform)?;
    let horizon = resolve_horizon(&config, args.horizon, waveform.end_time());
    let mode = resolve_mode(&config, args.edges);
    let times = trigger_times(&trace, horizon, mode);
    log::info!(
        "trigger `{}` ({}) fired {} time(s) below {horizon}",
        trigger.label,
        trigger.expr,
        times.len()
    );

    let format = match args.format {
        ListFormat::Text => ListingFormat::Text,
        ListFormat::Json => ListingFormat::Json,
    };
    let stdout = std::io::stdout();
    write_triggers(&mut stdout.lock(), &times, format)?;

    if !global.quiet && args.format == ListFormat::Text {
        eprintln!(
            "   {} trigger(s) for `{}` below tick {horizon}",
            times.len(),
            trigger.label
        );
    }

    if times.is_empty() {
        Ok(EXIT_NO_TRIGGER)
    } else {
        Ok(0)
    }
}
