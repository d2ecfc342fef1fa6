//! Configuration types deserialized from `peek.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Ticks shown before the anchor trigger when `display.before` is unset.
pub const DEFAULT_BEFORE: u64 = 10;
/// Ticks shown after the anchor trigger when `display.after` is unset.
pub const DEFAULT_AFTER: u64 = 20;

/// The complete contents of a `peek.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeekConfig {
    /// Trace construction settings.
    #[serde(default)]
    pub trace: TraceConfig,
    /// Trigger extraction settings.
    #[serde(default)]
    pub trigger: TriggerConfig,
    /// Named trigger expressions, e.g. `rise = "clk & ~clk.delay(1)"`.
    #[serde(default)]
    pub triggers: BTreeMap<String, String>,
    /// Report settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[trace]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TraceConfig {
    /// Value reported before a trace's first sample.
    #[serde(default)]
    pub default_value: i64,
}

/// `[trigger]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Explicit horizon for trigger extraction. Unset means one past the last
    /// recorded change.
    #[serde(default)]
    pub horizon: Option<u64>,
    /// Whether triggers list every non-zero tick or only run starts.
    #[serde(default)]
    pub mode: TriggerMode,
}

/// How a trigger trace is reduced to ticks.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Every tick at which the trigger is non-zero (default).
    #[default]
    Ticks,
    /// Only the first tick of each non-zero run.
    Edges,
}

/// `[display]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Signals shown by `peek show` when none are given on the command line.
    ///
    /// Accepts a single string or a list of strings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub signals: Vec<String>,
    /// Ticks shown before the anchor trigger.
    #[serde(default = "default_before")]
    pub before: u64,
    /// Ticks shown after the anchor trigger.
    #[serde(default = "default_after")]
    pub after: u64,
    /// Output format.
    #[serde(default)]
    pub format: DisplayFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            signals: Vec::new(),
            before: DEFAULT_BEFORE,
            after: DEFAULT_AFTER,
            format: DisplayFormat::default(),
        }
    }
}

fn default_before() -> u64 {
    DEFAULT_BEFORE
}

fn default_after() -> u64 {
    DEFAULT_AFTER
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    /// Plain-text value table (default).
    #[default]
    Table,
    /// WaveJSON document.
    WaveJson,
}

/// Deserializes either a single string or an array of strings into a `Vec<String>`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a signal name or a list of signal names")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut names = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(name) = seq.next_element::<String>()? {
                names.push(name);
            }
            Ok(names)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
