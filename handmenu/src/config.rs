//! Runtime configuration.
//!
//! Every component has a `Default`-able config struct; a config file is a
//! single s-expression plist overriding any subset of them:
//!
//! ```text
//! (:preferred-hand :right
//!  :thumb-linearity-threshold 0.02
//!  :debounce t
//!  :click-mode :rising-edge :click-cooldown-ms 250
//!  :scroll-mode :repeat :scroll-repeat-ms 150
//!  :drag-hold-ms 400
//!  :cursor-offset-y 50)
//! ```
//!
//! Unknown keys are ignored.

use std::path::Path;

use anyhow::{bail, Context};
use lexpr::Value;
use tracing::debug;

use crate::pipeline::CursorConfig;
use crate::sexp::{bool_sexp, get_bool, get_float, get_int, get_keyword, plist_keys};
use crate::tracking::debounce::ActionTiming;
use crate::tracking::{ClassifierConfig, DebounceConfig, DebounceMode, Handedness, SelectorConfig};

const KNOWN_KEYS: &[&str] = &[
    "thumb-linearity-threshold",
    "preferred-hand",
    "track-previous",
    "debounce",
    "click-mode",
    "click-repeat-ms",
    "click-cooldown-ms",
    "scroll-mode",
    "scroll-repeat-ms",
    "scroll-cooldown-ms",
    "drag-hold-ms",
    "cursor-offset-y",
    "frame-interval-ms",
];

/// Largest accepted `:cursor-offset-y` magnitude, in pixels.
const MAX_CURSOR_OFFSET: i64 = 10_000;

/// All tunables of the application.
#[derive(Debug, Clone)]
pub struct HandMenuConfig {
    pub classifier: ClassifierConfig,
    pub selector: SelectorConfig,
    pub debounce: DebounceConfig,
    pub cursor: CursorConfig,
    /// Frame time assumed when a frame carries no timestamp.
    pub frame_interval_ms: f64,
}

impl Default for HandMenuConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            selector: SelectorConfig::default(),
            debounce: DebounceConfig::default(),
            cursor: CursorConfig::default(),
            frame_interval_ms: 33.0,
        }
    }
}

impl HandMenuConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_sexp(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse a config plist over the defaults.
    pub fn from_sexp(text: &str) -> anyhow::Result<Self> {
        let value = lexpr::from_str(text).context("malformed s-expression")?;
        let mut config = Self::default();
        config.apply(&value)?;
        Ok(config)
    }

    fn apply(&mut self, value: &Value) -> anyhow::Result<()> {
        for key in plist_keys(value) {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!("ignoring unknown config key :{}", key);
            }
        }

        if let Some(t) = get_float(value, "thumb-linearity-threshold") {
            if t.is_nan() || t <= 0.0 {
                bail!(":thumb-linearity-threshold must be positive, got {}", t);
            }
            self.classifier.thumb_linearity_threshold = t as f32;
        }

        if let Some(hand) = get_keyword(value, "preferred-hand") {
            self.selector.preferred = match hand.as_str() {
                "left" => Handedness::Left,
                "right" => Handedness::Right,
                other => bail!(":preferred-hand must be left or right, got {}", other),
            };
        }
        if let Some(b) = get_bool(value, "track-previous") {
            self.selector.track_previous = b;
        }

        if let Some(b) = get_bool(value, "debounce") {
            self.debounce.enabled = b;
        }
        apply_timing(value, "click", &mut self.debounce.click)?;
        apply_timing(value, "scroll", &mut self.debounce.scroll)?;
        if let Some(ms) = get_float(value, "drag-hold-ms") {
            self.debounce.drag_hold_ms = non_negative("drag-hold-ms", ms)?;
        }

        if let Some(offset) = get_int(value, "cursor-offset-y") {
            if !(-MAX_CURSOR_OFFSET..=MAX_CURSOR_OFFSET).contains(&offset) {
                bail!(
                    ":cursor-offset-y must be within -{0}..={0}, got {1}",
                    MAX_CURSOR_OFFSET,
                    offset
                );
            }
            self.cursor.offset_y = offset as i32;
        }
        if let Some(ms) = get_float(value, "frame-interval-ms") {
            self.frame_interval_ms = non_negative("frame-interval-ms", ms)?;
        }
        Ok(())
    }

    /// Generate s-expression for config output.
    pub fn to_sexp(&self) -> String {
        let d = &self.debounce;
        format!(
            "(:thumb-linearity-threshold {} :preferred-hand :{} :track-previous {} :debounce {} \
             :click-mode :{} :click-repeat-ms {} :click-cooldown-ms {} \
             :scroll-mode :{} :scroll-repeat-ms {} :scroll-cooldown-ms {} \
             :drag-hold-ms {} :cursor-offset-y {} :frame-interval-ms {})",
            self.classifier.thumb_linearity_threshold,
            self.selector.preferred.as_str(),
            bool_sexp(self.selector.track_previous),
            bool_sexp(d.enabled),
            d.click.mode.as_str(),
            d.click.repeat_ms,
            d.click.cooldown_ms,
            d.scroll.mode.as_str(),
            d.scroll.repeat_ms,
            d.scroll.cooldown_ms,
            d.drag_hold_ms,
            self.cursor.offset_y,
            self.frame_interval_ms,
        )
    }
}

/// Apply `:<prefix>-mode`, `:<prefix>-repeat-ms` and `:<prefix>-cooldown-ms`.
fn apply_timing(value: &Value, prefix: &str, timing: &mut ActionTiming) -> anyhow::Result<()> {
    let key = format!("{}-mode", prefix);
    if let Some(mode) = get_keyword(value, &key) {
        timing.mode = match DebounceMode::from_str(&mode) {
            Some(m) => m,
            None => bail!(":{} must be rising-edge or repeat, got {}", key, mode),
        };
    }
    let key = format!("{}-repeat-ms", prefix);
    if let Some(ms) = get_float(value, &key) {
        timing.repeat_ms = non_negative(&key, ms)?;
    }
    let key = format!("{}-cooldown-ms", prefix);
    if let Some(ms) = get_float(value, &key) {
        timing.cooldown_ms = non_negative(&key, ms)?;
    }
    Ok(())
}

fn non_negative(key: &str, ms: f64) -> anyhow::Result<f64> {
    if !ms.is_finite() || ms < 0.0 {
        bail!(":{} must be a non-negative number, got {}", key, ms);
    }
    Ok(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plist_keeps_defaults() {
        let c = HandMenuConfig::from_sexp("()").unwrap();
        assert_eq!(c.classifier.thumb_linearity_threshold, 0.02);
        assert_eq!(c.selector.preferred, Handedness::Right);
        assert!(c.debounce.enabled);
        assert_eq!(c.debounce.click.mode, DebounceMode::RisingEdge);
        assert_eq!(c.debounce.scroll.repeat_ms, 150.0);
        assert_eq!(c.cursor.offset_y, 50);
        assert_eq!(c.frame_interval_ms, 33.0);
    }

    #[test]
    fn test_overrides() {
        let c = HandMenuConfig::from_sexp(
            "(:thumb-linearity-threshold 0.05 :preferred-hand :left :track-previous nil \
              :click-mode :repeat :click-repeat-ms 300 :scroll-cooldown-ms 100 \
              :drag-hold-ms 600 :cursor-offset-y 0 :frame-interval-ms 16.5)",
        )
        .unwrap();
        assert_eq!(c.classifier.thumb_linearity_threshold, 0.05);
        assert_eq!(c.selector.preferred, Handedness::Left);
        assert!(!c.selector.track_previous);
        assert_eq!(c.debounce.click.mode, DebounceMode::Repeat);
        assert_eq!(c.debounce.click.repeat_ms, 300.0);
        // untouched fields keep defaults
        assert_eq!(c.debounce.click.cooldown_ms, 250.0);
        assert_eq!(c.debounce.scroll.cooldown_ms, 100.0);
        assert_eq!(c.debounce.drag_hold_ms, 600.0);
        assert_eq!(c.cursor.offset_y, 0);
        assert_eq!(c.frame_interval_ms, 16.5);
    }

    #[test]
    fn test_debounce_disabled() {
        let c = HandMenuConfig::from_sexp("(:debounce nil)").unwrap();
        assert!(!c.debounce.enabled);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let c = HandMenuConfig::from_sexp("(:theme :dark :drag-hold-ms 500)").unwrap();
        assert_eq!(c.debounce.drag_hold_ms, 500.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(HandMenuConfig::from_sexp("(:preferred-hand :both)").is_err());
        assert!(HandMenuConfig::from_sexp("(:click-mode :sometimes)").is_err());
        assert!(HandMenuConfig::from_sexp("(:scroll-repeat-ms -5)").is_err());
        assert!(HandMenuConfig::from_sexp("(:thumb-linearity-threshold 0)").is_err());
        assert!(HandMenuConfig::from_sexp("(:preferred-hand").is_err());
    }

    #[test]
    fn test_cursor_offset_bounded() {
        assert!(HandMenuConfig::from_sexp("(:cursor-offset-y 2147483647)").is_err());
        assert!(HandMenuConfig::from_sexp("(:cursor-offset-y -10001)").is_err());
        let c = HandMenuConfig::from_sexp("(:cursor-offset-y -10000)").unwrap();
        assert_eq!(c.cursor.offset_y, -10_000);
    }

    #[test]
    fn test_error_names_key() {
        let err = HandMenuConfig::from_sexp("(:drag-hold-ms -1)").unwrap_err();
        assert!(err.to_string().contains(":drag-hold-ms"), "{}", err);
    }

    #[test]
    fn test_to_sexp_round_trips() {
        let mut c = HandMenuConfig::default();
        c.selector.preferred = Handedness::Left;
        c.debounce.scroll.mode = DebounceMode::RisingEdge;
        c.cursor.offset_y = 30;
        let parsed = HandMenuConfig::from_sexp(&c.to_sexp()).unwrap();
        assert_eq!(parsed.selector.preferred, Handedness::Left);
        assert_eq!(parsed.debounce.scroll.mode, DebounceMode::RisingEdge);
        assert_eq!(parsed.cursor.offset_y, 30);
        assert_eq!(parsed.debounce.click.cooldown_ms, 250.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = HandMenuConfig::load(Path::new("/nonexistent/handmenu.el")).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read config"));
    }
}
