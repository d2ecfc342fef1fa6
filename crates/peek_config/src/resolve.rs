//! Merging configured settings with command-line choices.

use crate::types::{PeekConfig, TriggerMode};

/// A trigger expression ready to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrigger {
    /// Label for reports: the configured name, or the expression itself.
    pub label: String,
    /// Expression text.
    pub expr: String,
}

/// Resolves `name_or_expr` against `[triggers]`.
///
/// A configured name yields its expression; anything else is taken to be an
/// expression already.
pub fn resolve_trigger(config: &PeekConfig, name_or_expr: &str) -> ResolvedTrigger {
    let key = name_or_expr.trim();
    match config.triggers.get(key) {
        Some(expr) => ResolvedTrigger {
            label: key.to_string(),
            expr: expr.clone(),
        },
        None => ResolvedTrigger {
            label: key.to_string(),
            expr: key.to_string(),
        },
    }
}

/// Picks the trigger horizon: command line, then `trigger.horizon`, then one
/// past the last recorded change (`1` when nothing was recorded).
pub fn resolve_horizon(config: &PeekConfig, cli: Option<u64>, last_change: Option<u64>) -> u64 {
    cli.or(config.trigger.horizon)
        .unwrap_or_else(|| last_change.map_or(1, |t| t.saturating_add(1)))
}

/// Picks the trigger mode: `--edges` on the command line wins over the file.
pub fn resolve_mode(config: &PeekConfig, cli_edges: bool) -> TriggerMode {
    if cli_edges {
        TriggerMode::Edges
    } else {
        config.trigger.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn config() -> PeekConfig {
        load_config_from_str(
            r#"
[trigger]
horizon = 500
mode = "edges"

[triggers]
rise = "top.clk & ~top.clk.delay(1)"
"#,
        )
        .unwrap()
    }

    #[test]
    fn named_trigger_resolves_to_expression() {
        let t = resolve_trigger(&config(), "rise");
        assert_eq!(t.label, "rise");
        assert_eq!(t.expr, "top.clk & ~top.clk.delay(1)");
    }

    #[test]
    fn unknown_name_is_an_expression() {
        let t = resolve_trigger(&config(), " top.rst == 0 ");
        assert_eq!(t.label, "top.rst == 0");
        assert_eq!(t.expr, "top.rst == 0");
    }

    #[test]
    fn horizon_precedence() {
        let cfg = config();
        assert_eq!(resolve_horizon(&cfg, Some(7), Some(99)), 7);
        assert_eq!(resolve_horizon(&cfg, None, Some(99)), 500);

        let bare = PeekConfig::default();
        assert_eq!(resolve_horizon(&bare, None, Some(99)), 100);
        assert_eq!(resolve_horizon(&bare, None, None), 1);
        assert_eq!(resolve_horizon(&bare, None, Some(u64::MAX)), u64::MAX);
    }

    #[test]
    fn mode_precedence() {
        assert_eq!(resolve_mode(&config(), false), TriggerMode::Edges);
        assert_eq!(resolve_mode(&PeekConfig::default(), false), TriggerMode::Ticks);
        assert_eq!(resolve_mode(&PeekConfig::default(), true), TriggerMode::Edges);
    }
}
