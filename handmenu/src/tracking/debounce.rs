//! Per-action debouncing of the raw action stream.
//!
//! The mapper fires on every qualifying frame, so holding a click pose for
//! half a second would click fifteen times.  Each discrete action gets a
//! small Idle → Triggered → Cooldown latch driven by frame time.  Holding
//! the click pose past a threshold turns it into a drag.

use tracing::debug;

use super::action::{ActionKind, ActionSet};
use super::landmarks::Keypoint;

// ── Config ─────────────────────────────────────────────────

/// How a held gesture behaves after its first firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceMode {
    /// Fire once per press.
    RisingEdge,
    /// Fire again every `repeat_ms` while held.
    Repeat,
}

impl DebounceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RisingEdge => "rising-edge",
            Self::Repeat => "repeat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rising-edge" => Some(Self::RisingEdge),
            "repeat" => Some(Self::Repeat),
            _ => None,
        }
    }
}

/// Timing for one action kind.
#[derive(Debug, Clone, Copy)]
pub struct ActionTiming {
    pub mode: DebounceMode,
    /// Interval between repeats while held (Repeat mode only).
    pub repeat_ms: f64,
    /// Time after release before the action can fire again.
    pub cooldown_ms: f64,
}

/// Configuration for action debouncing.
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// When false, raw mapper output passes through unchanged.
    pub enabled: bool,
    pub click: ActionTiming,
    /// Shared by scroll-up and scroll-down.
    pub scroll: ActionTiming,
    /// Click-pose hold time (ms) after which drag is reported.
    pub drag_hold_ms: f64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            click: ActionTiming {
                mode: DebounceMode::RisingEdge,
                repeat_ms: 0.0,
                cooldown_ms: 250.0,
            },
            scroll: ActionTiming {
                mode: DebounceMode::Repeat,
                repeat_ms: 150.0,
                cooldown_ms: 0.0,
            },
            drag_hold_ms: 400.0,
        }
    }
}

// ── Latch ──────────────────────────────────────────────────

/// Latch phase for a single action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatchPhase {
    Idle,
    Triggered {
        /// How long the gesture has been held (ms).
        held_ms: f64,
        /// Time since the last firing (ms).
        since_fire_ms: f64,
    },
    Cooldown {
        remaining_ms: f64,
    },
}

impl LatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Triggered { .. } => "triggered",
            Self::Cooldown { .. } => "cooldown",
        }
    }
}

#[derive(Debug, Clone)]
struct ActionLatch {
    phase: LatchPhase,
}

impl ActionLatch {
    fn new() -> Self {
        Self {
            phase: LatchPhase::Idle,
        }
    }

    /// Advance one frame.  Returns true if the action fires this frame.
    fn step(&mut self, kind: ActionKind, active: bool, dt_ms: f64, timing: &ActionTiming) -> bool {
        if let LatchPhase::Cooldown { remaining_ms } = self.phase {
            let remaining_ms = remaining_ms - dt_ms;
            if remaining_ms > 0.0 {
                self.phase = LatchPhase::Cooldown { remaining_ms };
                return false;
            }
            self.phase = LatchPhase::Idle;
        }

        match (self.phase, active) {
            (LatchPhase::Idle, true) => {
                self.phase = LatchPhase::Triggered {
                    held_ms: 0.0,
                    since_fire_ms: 0.0,
                };
                debug!("{} triggered", kind.as_str());
                true
            }
            (LatchPhase::Idle, false) => false,
            (LatchPhase::Triggered { held_ms, since_fire_ms }, true) => {
                let held_ms = held_ms + dt_ms;
                let mut since_fire_ms = since_fire_ms + dt_ms;
                let fire = timing.mode == DebounceMode::Repeat && since_fire_ms >= timing.repeat_ms;
                if fire {
                    since_fire_ms = 0.0;
                }
                self.phase = LatchPhase::Triggered {
                    held_ms,
                    since_fire_ms,
                };
                fire
            }
            (LatchPhase::Triggered { .. }, false) => {
                self.phase = if timing.cooldown_ms > 0.0 {
                    LatchPhase::Cooldown {
                        remaining_ms: timing.cooldown_ms,
                    }
                } else {
                    LatchPhase::Idle
                };
                debug!("{} released", kind.as_str());
                false
            }
            (LatchPhase::Cooldown { .. }, _) => false,
        }
    }

    fn held_ms(&self) -> Option<f64> {
        match self.phase {
            LatchPhase::Triggered { held_ms, .. } => Some(held_ms),
            _ => None,
        }
    }
}

// ── Debouncer ──────────────────────────────────────────────

/// Central debounce state: one latch per discrete action kind.
pub struct ActionDebouncer {
    pub config: DebounceConfig,
    click: ActionLatch,
    scroll_up: ActionLatch,
    scroll_down: ActionLatch,
}

impl Default for ActionDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl ActionDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            click: ActionLatch::new(),
            scroll_up: ActionLatch::new(),
            scroll_down: ActionLatch::new(),
        }
    }

    fn latch(&self, kind: ActionKind) -> Option<&ActionLatch> {
        match kind {
            ActionKind::Click => Some(&self.click),
            ActionKind::ScrollUp => Some(&self.scroll_up),
            ActionKind::ScrollDown => Some(&self.scroll_down),
            ActionKind::Move | ActionKind::Drag => None,
        }
    }

    /// Current latch phase for an action; move and drag have none.
    pub fn phase(&self, kind: ActionKind) -> Option<LatchPhase> {
        self.latch(kind).map(|l| l.phase)
    }

    /// Filter one frame of raw mapper output.
    ///
    /// `index_tip` is the controlling hand's index fingertip, which anchors
    /// a drag.
    pub fn filter(&mut self, raw: &ActionSet, index_tip: Option<Keypoint>, dt_ms: f64) -> ActionSet {
        if !self.config.enabled {
            return *raw;
        }

        let mut out = ActionSet {
            move_to: raw.move_to,
            ..ActionSet::default()
        };

        let click_timing = self.config.click;
        let scroll_timing = self.config.scroll;

        out.click = self
            .click
            .step(ActionKind::Click, raw.click, dt_ms, &click_timing);
        if self
            .scroll_down
            .step(ActionKind::ScrollDown, raw.scroll_down.is_some(), dt_ms, &scroll_timing)
        {
            out.scroll_down = raw.scroll_down;
        }
        if self
            .scroll_up
            .step(ActionKind::ScrollUp, raw.scroll_up.is_some(), dt_ms, &scroll_timing)
        {
            out.scroll_up = raw.scroll_up;
        }

        // A held click pose becomes a drag that follows the index tip.
        if let (true, Some(held_ms)) = (raw.click, self.click.held_ms()) {
            if held_ms >= self.config.drag_hold_ms {
                out.drag = index_tip;
            }
        }

        out
    }

    /// Reset all latches to idle.
    pub fn reset(&mut self) {
        self.click = ActionLatch::new();
        self.scroll_up = ActionLatch::new();
        self.scroll_down = ActionLatch::new();
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:enabled {} :click {} :scroll-up {} :scroll-down {})",
            if self.config.enabled { "t" } else { "nil" },
            self.click.phase.as_str(),
            self.scroll_up.phase.as_str(),
            self.scroll_down.phase.as_str(),
        )
    }

    /// Generate s-expression for config output.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:enabled {} :click-mode {} :click-cooldown-ms {:.0} :scroll-mode {} :scroll-repeat-ms {:.0} :scroll-cooldown-ms {:.0} :drag-hold-ms {:.0})",
            if self.config.enabled { "t" } else { "nil" },
            self.config.click.mode.as_str(),
            self.config.click.cooldown_ms,
            self.config.scroll.mode.as_str(),
            self.config.scroll.repeat_ms,
            self.config.scroll.cooldown_ms,
            self.config.drag_hold_ms,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
