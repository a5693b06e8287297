//! Per-frame gesture pipeline.
//!
//! Validation, hand selection, finger classification, action mapping and
//! debouncing, in that order, plus conversion of the index fingertip to a
//! screen cursor position.

use tracing::{debug, info};

use crate::sexp::bool_sexp;
use crate::tracking::{
    map_actions, ActionDebouncer, ActionSet, DebounceConfig, DetectionFrame, FingerClassifier,
    FingerStates, ClassifierConfig, HandLandmark, HandSelector, Handedness, Keypoint,
    LandmarkError, SelectorConfig,
};

// ── Cursor ─────────────────────────────────────────────────

/// Cursor conversion settings.
#[derive(Debug, Clone)]
pub struct CursorConfig {
    /// Pixels added to y; the band above the camera image.
    pub offset_y: i32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { offset_y: 50 }
    }
}

/// Screen position in integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Project a normalized keypoint onto the frame, truncating toward zero.
    ///
    /// Coordinates far outside [0, 1] saturate at the `i32` range.
    pub fn from_keypoint(k: &Keypoint, width: u32, height: u32, offset_y: i32) -> Self {
        Self {
            x: (k.x * width as f32) as i32,
            y: ((k.y * height as f32) as i32).saturating_add(offset_y),
        }
    }

    /// The position in frame coordinates, with the top band removed.
    pub fn in_frame(&self, offset_y: i32) -> (i32, i32) {
        (self.x, self.y.saturating_sub(offset_y))
    }
}

// ── Pipeline ───────────────────────────────────────────────

/// Result of one pipeline step.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Corrected handedness of the controlling hand.
    pub handedness: Option<Handedness>,
    pub fingers: Option<FingerStates>,
    /// Mapper output before debouncing.
    pub raw: ActionSet,
    /// Debounced actions.
    pub actions: ActionSet,
    /// Cursor after this frame.
    pub cursor: CursorPosition,
    /// True when the cursor was moved this frame.
    pub cursor_moved: bool,
}

pub struct GesturePipeline {
    pub classifier: FingerClassifier,
    pub selector: HandSelector,
    pub debouncer: ActionDebouncer,
    pub cursor_config: CursorConfig,
    cursor: CursorPosition,
    controlling: Option<Handedness>,
    frames: u64,
}

impl Default for GesturePipeline {
    fn default() -> Self {
        Self::new(
            ClassifierConfig::default(),
            SelectorConfig::default(),
            DebounceConfig::default(),
            CursorConfig::default(),
        )
    }
}

impl GesturePipeline {
    pub fn new(
        classifier: ClassifierConfig,
        selector: SelectorConfig,
        debounce: DebounceConfig,
        cursor: CursorConfig,
    ) -> Self {
        Self {
            classifier: FingerClassifier::new(classifier),
            selector: HandSelector::new(selector),
            debouncer: ActionDebouncer::new(debounce),
            cursor_config: cursor,
            cursor: CursorPosition::default(),
            controlling: None,
            frames: 0,
        }
    }

    /// Last cursor position.
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame through the pipeline.
    ///
    /// Malformed hands fail the whole frame before any state is touched.
    pub fn process(
        &mut self,
        frame: &DetectionFrame,
        dt_ms: f64,
    ) -> Result<FrameOutput, LandmarkError> {
        let hands = frame.validated_hands()?;
        self.frames += 1;

        let hand = self.selector.select(&hands);
        let handedness = hand.map(|h| h.handedness());
        if handedness != self.controlling {
            match handedness {
                Some(h) => info!("Controlling hand: {}", h.as_str()),
                None => info!("Controlling hand: none"),
            }
            self.controlling = handedness;
        }

        let fingers = hand.map(|h| self.classifier.classify(h));
        let raw = map_actions(hand, &fingers.unwrap_or_default());
        let index_tip = hand.map(|h| h.keypoint(HandLandmark::IndexTip));
        let actions = self.debouncer.filter(&raw, index_tip, dt_ms);

        let mut cursor_moved = false;
        if let Some(target) = actions.move_to.or(actions.drag) {
            let next = CursorPosition::from_keypoint(
                &target,
                frame.width,
                frame.height,
                self.cursor_config.offset_y,
            );
            cursor_moved = next != self.cursor;
            self.cursor = next;
        }

        if !actions.is_idle() {
            debug!(
                frame = self.frames,
                fingers = %fingers.map(|f| f.pattern()).unwrap_or_default(),
                "actions {:?}",
                actions.kinds().iter().map(|k| k.as_str()).collect::<Vec<_>>()
            );
        }

        Ok(FrameOutput {
            handedness,
            fingers,
            raw,
            actions,
            cursor: self.cursor,
            cursor_moved,
        })
    }

    /// Drop all cross-frame state except the cursor.
    pub fn reset(&mut self) {
        self.selector.reset();
        self.debouncer.reset();
        self.controlling = None;
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:frames {} :controlling {} :cursor (:x {} :y {}) :debounce {} :selector {} :threshold {:.3})",
            self.frames,
            self.controlling.map(|h| h.as_str()).unwrap_or("nil"),
            self.cursor.x,
            self.cursor.y,
            self.debouncer.status_sexp(),
            self.selector.status_sexp(),
            self.classifier.config.thumb_linearity_threshold,
        )
    }

    /// Whether the debouncer is active.
    pub fn debounce_enabled(&self) -> bool {
        self.debouncer.config.enabled
    }

    /// Generate s-expression for config output.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:cursor-offset-y {} :preferred-hand {} :track-previous {} :debounce {})",
            self.cursor_config.offset_y,
            self.selector.config.preferred.as_str(),
            bool_sexp(self.selector.config.track_previous),
            self.debouncer.config_sexp(),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
