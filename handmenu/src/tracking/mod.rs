//! Hand tracking, from raw landmarks to debounced pointer actions.
//!
//! Provides:
//! - `landmarks`: keypoints, validated hands, provider frame format
//! - `finger_state`: per-finger open/closed classification
//! - `hand_selector`: picks the single controlling hand
//! - `action`: stateless finger-pattern to action mapping
//! - `debounce`: per-action latch with cooldown, repeat and drag
//! - `provider`: frame sources (JSON lines replay, scripted)

pub mod action;
pub mod debounce;
pub mod finger_state;
pub mod hand_selector;
pub mod landmarks;
pub mod provider;

pub use action::{map_actions, ActionKind, ActionSet};
pub use debounce::{ActionDebouncer, DebounceConfig, DebounceMode};
pub use finger_state::{ClassifierConfig, Finger, FingerClassifier, FingerStates};
pub use hand_selector::{select_controlling_hand, HandSelector, SelectorConfig};
pub use landmarks::{DetectionFrame, Hand, HandLandmark, Handedness, Keypoint, LandmarkError};
pub use provider::{JsonLinesProvider, LandmarkProvider, ScriptedProvider};
