//! Finger open/closed classification from a single hand's landmarks.
//!
//! Non-thumb fingers use a vertical-extension test (tip above PIP joint).
//! The thumb needs both a straightness test over its five-point chain and a
//! handedness-dependent sideways-extension test.

use super::landmarks::{Hand, HandLandmark, Handedness, Keypoint, LandmarkError};

// ── Finger ─────────────────────────────────────────────────

/// The five fingers, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }

    /// (tip, PIP) landmark pair for the vertical test.  The thumb uses its IP
    /// joint in place of a PIP.
    pub fn tip_and_pip(&self) -> (HandLandmark, HandLandmark) {
        match self {
            Self::Thumb => (HandLandmark::ThumbTip, HandLandmark::ThumbIp),
            Self::Index => (HandLandmark::IndexTip, HandLandmark::IndexPip),
            Self::Middle => (HandLandmark::MiddleTip, HandLandmark::MiddlePip),
            Self::Ring => (HandLandmark::RingTip, HandLandmark::RingPip),
            Self::Pinky => (HandLandmark::PinkyTip, HandLandmark::PinkyPip),
        }
    }
}

// ── FingerStates ───────────────────────────────────────────

/// Open (`true`) / closed (`false`) per finger, in [`Finger::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    pub fn new(states: [bool; 5]) -> Self {
        Self(states)
    }

    pub fn is_open(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }

    pub fn open_count(&self) -> usize {
        self.0.iter().filter(|s| **s).count()
    }

    /// True when exactly the given fingers are open and every other finger
    /// is closed.
    pub fn only(&self, open: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|f| self.is_open(*f) == open.contains(f))
    }

    /// Compact form like `"01100"` for logs and status output.
    pub fn pattern(&self) -> String {
        self.0.iter().map(|s| if *s { '1' } else { '0' }).collect()
    }
}

// ── Config ─────────────────────────────────────────────────

/// Configuration for finger-state classification.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Maximum mean absolute cross product along the thumb chain for the
    /// thumb to count as straight (normalized image units).
    pub thumb_linearity_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thumb_linearity_threshold: 0.02,
        }
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Stateless finger-state classifier.
#[derive(Debug, Clone, Default)]
pub struct FingerClassifier {
    pub config: ClassifierConfig,
}

impl FingerClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify all five fingers of a validated hand.
    pub fn classify(&self, hand: &Hand) -> FingerStates {
        let mut states = [false; 5];
        for finger in Finger::ALL {
            states[finger as usize] = match finger {
                Finger::Thumb => self.thumb_open(hand),
                other => vertical_open(hand, other),
            };
        }
        FingerStates(states)
    }

    /// Thumb is open when its chain is straight and the tip points outward.
    pub fn thumb_open(&self, hand: &Hand) -> bool {
        let straight =
            chain_deviation(&hand.thumb_chain()) < self.config.thumb_linearity_threshold;
        straight && thumb_extended(hand)
    }
}

/// Tip strictly above the PIP joint (image y grows downward).
fn vertical_open(hand: &Hand, finger: Finger) -> bool {
    let (tip, pip) = finger.tip_and_pip();
    hand.keypoint(tip).y < hand.keypoint(pip).y
}

/// Sideways extension: the thumb tip lies outward of the IP joint, and
/// outward is +x for a left hand, -x for a right hand.
fn thumb_extended(hand: &Hand) -> bool {
    let tip = hand.keypoint(HandLandmark::ThumbTip);
    let ip = hand.keypoint(HandLandmark::ThumbIp);
    match hand.handedness() {
        Handedness::Left => tip.x > ip.x,
        Handedness::Right => tip.x < ip.x,
    }
}

/// Mean absolute 2D cross product between consecutive segments of the
/// wrist-to-tip thumb chain.
///
/// A straight chain scores near zero; bending at any joint raises the score.
pub fn chain_deviation(chain: &[Keypoint; 5]) -> f32 {
    let total: f32 = chain
        .windows(3)
        .map(|w| {
            let v1 = (w[1].x - w[0].x, w[1].y - w[0].y);
            let v2 = (w[2].x - w[1].x, w[2].y - w[1].y);
            (v1.0 * v2.1 - v1.1 * v2.0).abs()
        })
        .sum();
    total / (chain.len() - 2) as f32
}

/// `chain_deviation` for an unchecked slice, such as raw provider data.
/// Anything but exactly five points is an error.
pub fn thumb_deviation(points: &[Keypoint]) -> Result<f32, LandmarkError> {
    let chain: &[Keypoint; 5] = points
        .try_into()
        .map_err(|_| LandmarkError::ThumbChain { got: points.len() })?;
    Ok(chain_deviation(chain))
}

// ── Tests ──────────────────────────────────────────────────
