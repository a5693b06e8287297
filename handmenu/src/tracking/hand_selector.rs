//! Controlling-hand selection.
//!
//! Only one hand drives input at a time.  A right hand always wins over a
//! left one; when the provider labels two hands identically the candidate
//! nearest to last frame's controlling wrist is kept.

use tracing::{debug, warn};

use super::landmarks::{Hand, HandLandmark, Handedness, Keypoint};

/// Configuration for hand selection.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Hand that wins when both are present.
    pub preferred: Handedness,
    /// Use last frame's wrist to break same-label ties.
    pub track_previous: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            preferred: Handedness::Right,
            track_previous: true,
        }
    }
}

/// Pick the controlling hand with no cross-frame memory.
///
/// Prefers a right hand, then a left hand; first in provider order among
/// same-label hands.
pub fn select_controlling_hand(hands: &[Hand]) -> Option<&Hand> {
    hands
        .iter()
        .find(|h| h.handedness() == Handedness::Right)
        .or_else(|| hands.iter().find(|h| h.handedness() == Handedness::Left))
}

/// Stateful selector that remembers the previous controlling wrist.
#[derive(Debug, Default)]
pub struct HandSelector {
    pub config: SelectorConfig,
    previous_wrist: Option<Keypoint>,
}

impl HandSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            previous_wrist: None,
        }
    }

    /// Select this frame's controlling hand.
    pub fn select<'a>(&mut self, hands: &'a [Hand]) -> Option<&'a Hand> {
        let preferred = self.config.preferred;
        let chosen = self
            .pick(hands, preferred)
            .or_else(|| self.pick(hands, preferred.mirrored()));

        match chosen {
            Some(hand) => {
                self.previous_wrist = Some(hand.keypoint(HandLandmark::Wrist));
            }
            None => {
                if self.previous_wrist.take().is_some() {
                    debug!("Controlling hand lost");
                }
            }
        }
        chosen
    }

    fn pick<'a>(&self, hands: &'a [Hand], handedness: Handedness) -> Option<&'a Hand> {
        let mut candidates = hands.iter().filter(|h| h.handedness() == handedness);
        let first = candidates.next()?;
        let rest: Vec<&Hand> = candidates.collect();
        if rest.is_empty() {
            return Some(first);
        }

        warn!(
            "{} hands labelled {}, resolving by previous position",
            rest.len() + 1,
            handedness.as_str()
        );
        let previous = match (self.config.track_previous, self.previous_wrist) {
            (true, Some(p)) => p,
            _ => return Some(first),
        };
        std::iter::once(first).chain(rest).min_by(|a, b| {
            let da = a.keypoint(HandLandmark::Wrist).distance_2d(&previous);
            let db = b.keypoint(HandLandmark::Wrist).distance_2d(&previous);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Forget the previous controlling hand.
    pub fn reset(&mut self) {
        self.previous_wrist = None;
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        let previous = match self.previous_wrist {
            Some(p) => format!("(:x {:.3} :y {:.3})", p.x, p.y),
            None => "nil".to_string(),
        };
        format!(
            "(:preferred {} :track-previous {} :previous-wrist {})",
            self.config.preferred.as_str(),
            if self.config.track_previous { "t" } else { "nil" },
            previous,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
