//! Gesture-to-action mapping.
//!
//! A pure function of the controlling hand's finger states: no memory is
//! kept between frames here.  Latching, cooldowns and drag detection live in
//! [`super::debounce`].

use super::finger_state::{Finger, FingerStates};
use super::landmarks::{Hand, HandLandmark, Keypoint};

/// Discrete action kinds, for logging and per-action debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Click,
    ScrollDown,
    ScrollUp,
    Drag,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Click => "click",
            Self::ScrollDown => "scroll-down",
            Self::ScrollUp => "scroll-up",
            Self::Drag => "drag",
        }
    }
}

/// Index tip and middle tip, the landmarks driving a scroll.
pub type ScrollPair = (Keypoint, Keypoint);

/// Actions for one frame.  The default value is the idle frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionSet {
    /// Cursor target: the index fingertip.
    pub move_to: Option<Keypoint>,
    pub click: bool,
    pub scroll_down: Option<ScrollPair>,
    pub scroll_up: Option<ScrollPair>,
    /// Held-click drag, carrying the index fingertip.
    pub drag: Option<Keypoint>,
}

impl ActionSet {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Kinds present in this set, in mapping order.
    pub fn kinds(&self) -> Vec<ActionKind> {
        let mut kinds = Vec::new();
        if self.move_to.is_some() {
            kinds.push(ActionKind::Move);
        }
        if self.click {
            kinds.push(ActionKind::Click);
        }
        if self.scroll_down.is_some() {
            kinds.push(ActionKind::ScrollDown);
        }
        if self.scroll_up.is_some() {
            kinds.push(ActionKind::ScrollUp);
        }
        if self.drag.is_some() {
            kinds.push(ActionKind::Drag);
        }
        kinds
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:move {} :click {} :scroll-down {} :scroll-up {} :drag {})",
            point_sexp(self.move_to.as_ref()),
            if self.click { "t" } else { "nil" },
            if self.scroll_down.is_some() { "t" } else { "nil" },
            if self.scroll_up.is_some() { "t" } else { "nil" },
            point_sexp(self.drag.as_ref()),
        )
    }
}

fn point_sexp(point: Option<&Keypoint>) -> String {
    match point {
        Some(p) => format!("(:x {:.3} :y {:.3})", p.x, p.y),
        None => "nil".to_string(),
    }
}

/// Map the controlling hand's finger states to this frame's actions.
///
/// Rules are checked in the order move, click, scroll-down, scroll-up.  Their
/// finger preconditions are disjoint, so at most one fires.  No hand, or an
/// unrecognised pose, yields the idle set.
pub fn map_actions(hand: Option<&Hand>, states: &FingerStates) -> ActionSet {
    let mut actions = ActionSet::default();
    let Some(hand) = hand else {
        return actions;
    };

    let index_tip = hand.keypoint(HandLandmark::IndexTip);
    let middle_tip = hand.keypoint(HandLandmark::MiddleTip);

    if states.only(&[Finger::Index]) {
        actions.move_to = Some(index_tip);
    }

    if states.only(&[Finger::Thumb, Finger::Index]) {
        actions.click = true;
    }

    if states.only(&[Finger::Index, Finger::Middle]) {
        actions.scroll_down = Some((index_tip, middle_tip));
    }

    if states.only(&[Finger::Index, Finger::Middle, Finger::Ring]) {
        actions.scroll_up = Some((index_tip, middle_tip));
    }

    actions
}

// ── Tests ──────────────────────────────────────────────────
