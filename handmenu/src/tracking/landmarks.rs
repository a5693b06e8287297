//! Hand landmark data structures and input validation.
//!
//! Models the 21 keypoints per hand produced by a MediaPipe-style hand
//! landmarker.  Raw provider output is validated into a [`Hand`] at the
//! boundary; nothing downstream ever sees a partial skeleton.

use serde::Deserialize;
use thiserror::Error;

// ── Landmark definitions ───────────────────────────────────

/// The 21 anatomical hand landmarks, in provider index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Thumb chain from wrist to tip, used by the linearity test.
    pub fn thumb_chain() -> [HandLandmark; 5] {
        [
            Self::Wrist,
            Self::ThumbCmc,
            Self::ThumbMcp,
            Self::ThumbIp,
            Self::ThumbTip,
        ]
    }
}

// ── Handedness ─────────────────────────────────────────────

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The other hand.
    ///
    /// The camera frame is flipped horizontally before detection, so the
    /// provider's label is always the mirror of the user's actual hand.
    pub fn mirrored(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ── Keypoint ───────────────────────────────────────────────

/// A normalized landmark position.
///
/// `x` and `y` are fractions of the image width/height (y grows downward),
/// `z` is depth relative to the wrist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 3]")]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Planar distance to another keypoint, ignoring depth.
    pub fn distance_2d(&self, other: &Keypoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f32; 3]> for Keypoint {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

// ── Errors ─────────────────────────────────────────────────

/// Malformed landmark input, rejected before classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {got}")]
    LandmarkCount { got: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("hand {index} in frame has no handedness label")]
    MissingHandedness { index: usize },
    #[error("thumb chain needs exactly 5 points, got {got}")]
    ThumbChain { got: usize },
}

// ── Hand ───────────────────────────────────────────────────

/// One validated hand: 21 keypoints and its corrected handedness.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    handedness: Handedness,
    keypoints: [Keypoint; LANDMARK_COUNT],
}

impl Hand {
    /// Validate a keypoint list into a hand.
    ///
    /// `handedness` must already be corrected for mirroring.
    pub fn new(handedness: Handedness, keypoints: &[Keypoint]) -> Result<Self, LandmarkError> {
        let keypoints: [Keypoint; LANDMARK_COUNT] = keypoints
            .try_into()
            .map_err(|_| LandmarkError::LandmarkCount {
                got: keypoints.len(),
            })?;
        if let Some(index) = keypoints.iter().position(|k| !k.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self {
            handedness,
            keypoints,
        })
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn keypoint(&self, landmark: HandLandmark) -> Keypoint {
        self.keypoints[landmark.index()]
    }

    pub fn keypoints(&self) -> &[Keypoint; LANDMARK_COUNT] {
        &self.keypoints
    }

    pub fn thumb_chain(&self) -> [Keypoint; 5] {
        HandLandmark::thumb_chain().map(|l| self.keypoint(l))
    }
}

// ── Raw provider output ────────────────────────────────────

/// A hand as reported by the landmark provider, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHand {
    /// Label as reported by the provider (not yet mirror-corrected).
    #[serde(default)]
    pub handedness: Option<Handedness>,
    pub landmarks: Vec<Keypoint>,
}

impl RawHand {
    /// Validate and apply the mirroring correction.
    ///
    /// `index` is the hand's position in the frame, used for error reporting.
    pub fn to_hand(&self, index: usize) -> Result<Hand, LandmarkError> {
        let raw = self
            .handedness
            .ok_or(LandmarkError::MissingHandedness { index })?;
        Hand::new(raw.mirrored(), &self.landmarks)
    }
}

/// Everything the provider produced for a single point in time.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Capture time in milliseconds, when the source records one.
    #[serde(default)]
    pub timestamp_ms: Option<f64>,
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

impl DetectionFrame {
    /// An empty frame of the given size.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            timestamp_ms: None,
            hands: Vec::new(),
        }
    }

    /// Validate every hand in the frame, failing on the first bad one.
    pub fn validated_hands(&self) -> Result<Vec<Hand>, LandmarkError> {
        self.hands
            .iter()
            .enumerate()
            .map(|(i, raw)| raw.to_hand(i))
            .collect()
    }
}

// ── Test helpers ───────────────────────────────────────────

/// A relaxed open hand: fingers pointing up, thumb straight out to the side
/// of a user's right hand (toward smaller x).
#[cfg(test)]
pub(crate) fn test_keypoints() -> Vec<Keypoint> {
    let mut k = vec![Keypoint::default(); LANDMARK_COUNT];
    k[HandLandmark::Wrist.index()] = Keypoint::new(0.50, 0.80, 0.0);
    // thumb: collinear, heading left and slightly up
    k[HandLandmark::ThumbCmc.index()] = Keypoint::new(0.45, 0.78, 0.0);
    k[HandLandmark::ThumbMcp.index()] = Keypoint::new(0.40, 0.76, 0.0);
    k[HandLandmark::ThumbIp.index()] = Keypoint::new(0.35, 0.74, 0.0);
    k[HandLandmark::ThumbTip.index()] = Keypoint::new(0.30, 0.72, 0.0);
    for (base, x) in [(5, 0.45), (9, 0.50), (13, 0.55), (17, 0.60)] {
        k[base] = Keypoint::new(x, 0.60, 0.0);
        k[base + 1] = Keypoint::new(x, 0.50, 0.0);
        k[base + 2] = Keypoint::new(x, 0.45, 0.0);
        k[base + 3] = Keypoint::new(x, 0.40, 0.0);
    }
    k
}

/// Curl a non-thumb finger by dropping its tip below its PIP joint.
#[cfg(test)]
pub(crate) fn curl_finger(keypoints: &mut [Keypoint], tip: HandLandmark) {
    let pip = keypoints[tip.index() - 2];
    keypoints[tip.index()] = Keypoint::new(pip.x, pip.y + 0.05, pip.z);
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleTip.index(), 12);
        assert_eq!(HandLandmark::RingTip.index(), 16);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(HandLandmark::PinkyTip.index() + 1, LANDMARK_COUNT);
    }

    #[test]
    fn test_landmark_as_str() {
        assert_eq!(HandLandmark::Wrist.as_str(), "wrist");
        assert_eq!(HandLandmark::ThumbIp.as_str(), "thumb-ip");
        assert_eq!(HandLandmark::PinkyTip.as_str(), "pinky-tip");
    }

    #[test]
    fn test_handedness_mirrored() {
        assert_eq!(Handedness::Left.mirrored(), Handedness::Right);
        assert_eq!(Handedness::Right.mirrored(), Handedness::Left);
        assert_eq!(Handedness::Left.as_str(), "left");
    }

    #[test]
    fn test_hand_valid() {
        let hand = Hand::new(Handedness::Right, &test_keypoints()).unwrap();
        assert_eq!(hand.handedness(), Handedness::Right);
        assert_eq!(hand.keypoint(HandLandmark::IndexTip).y, 0.40);
        assert_eq!(hand.thumb_chain()[4], hand.keypoint(HandLandmark::ThumbTip));
    }

    #[test]
    fn test_hand_wrong_count() {
        let keypoints = vec![Keypoint::default(); 20];
        let err = Hand::new(Handedness::Left, &keypoints).unwrap_err();
        assert_eq!(err, LandmarkError::LandmarkCount { got: 20 });
    }

    #[test]
    fn test_hand_non_finite() {
        let mut keypoints = test_keypoints();
        keypoints[7].y = f32::NAN;
        let err = Hand::new(Handedness::Left, &keypoints).unwrap_err();
        assert_eq!(err, LandmarkError::NonFinite { index: 7 });
    }

    #[test]
    fn test_raw_hand_mirror_correction() {
        let raw = RawHand {
            handedness: Some(Handedness::Left),
            landmarks: test_keypoints(),
        };
        assert_eq!(raw.to_hand(0).unwrap().handedness(), Handedness::Right);
    }

    #[test]
    fn test_raw_hand_missing_label() {
        let raw = RawHand {
            handedness: None,
            landmarks: test_keypoints(),
        };
        assert_eq!(
            raw.to_hand(1).unwrap_err(),
            LandmarkError::MissingHandedness { index: 1 }
        );
    }

    #[test]
    fn test_frame_deserialize() {
        let points: Vec<[f32; 3]> = (0..LANDMARK_COUNT).map(|i| [i as f32 * 0.01, 0.5, 0.0]).collect();
        let json = serde_json::json!({
            "width": 640,
            "height": 480,
            "hands": [{ "handedness": "Right", "landmarks": points }],
        });
        let frame: DetectionFrame = serde_json::from_value(json).unwrap();
        assert_eq!(frame.width, 640);
        let hands = frame.validated_hands().unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].handedness(), Handedness::Left);
        assert!((hands[0].keypoint(HandLandmark::IndexTip).x - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_frame_without_hands() {
        let frame: DetectionFrame = serde_json::from_str(r#"{"width": 320, "height": 240}"#).unwrap();
        assert!(frame.hands.is_empty());
        assert!(frame.validated_hands().unwrap().is_empty());
    }

    #[test]
    fn test_distance_2d() {
        let a = Keypoint::new(0.0, 0.0, 5.0);
        let b = Keypoint::new(0.3, 0.4, -5.0);
        assert!((a.distance_2d(&b) - 0.5).abs() < 1e-6);
    }
}
