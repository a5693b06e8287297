//! Main menu: the corner button and the radial selector it opens.

use super::Rect;

/// Corner button that opens the radial menu.
pub const MENU_BUTTON: Rect = Rect::new(20, 20, 200, 80);

/// Gap between the outer ring and the nearer frame edge.
const RING_MARGIN: i32 = 50;

/// Radial menu entries, in clockwise wedge order starting at +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadialButton {
    Settings,
    ChangeSound,
    TurnOff,
    Channels,
    Back,
}

impl RadialButton {
    pub const ALL: [RadialButton; 5] = [
        Self::Settings,
        Self::ChangeSound,
        Self::TurnOff,
        Self::Channels,
        Self::Back,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Settings => "Settings",
            Self::ChangeSound => "Change Sound",
            Self::TurnOff => "Turn Off",
            Self::Channels => "Channels",
            Self::Back => "Back",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::ChangeSound => "change-sound",
            Self::TurnOff => "turn-off",
            Self::Channels => "channels",
            Self::Back => "back",
        }
    }
}

/// Geometry of the radial menu for one frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadialMenu {
    pub center_x: i32,
    pub center_y: i32,
    pub outer_radius: i32,
    pub inner_radius: i32,
}

impl RadialMenu {
    /// Ring centered in the frame.
    pub fn for_frame(width: u32, height: u32) -> Self {
        let center_x = (width / 2) as i32;
        let center_y = (height / 2) as i32;
        let outer_radius = center_x.min(center_y) - RING_MARGIN;
        Self {
            center_x,
            center_y,
            outer_radius,
            inner_radius: outer_radius / 2,
        }
    }

    /// Angular width of one wedge in degrees.
    pub fn wedge_degrees() -> f64 {
        360.0 / RadialButton::ALL.len() as f64
    }

    /// Button under a frame-space point, if it lies strictly inside the ring.
    pub fn hit(&self, x: i32, y: i32) -> Option<RadialButton> {
        let dx = f64::from(x) - f64::from(self.center_x);
        let dy = f64::from(y) - f64::from(self.center_y);
        let dist = dx.hypot(dy);
        if dist <= f64::from(self.inner_radius) || dist >= f64::from(self.outer_radius) {
            return None;
        }
        let angle = (dy.atan2(dx).to_degrees() + 360.0) % 360.0;
        let index = ((angle / Self::wedge_degrees()) as usize).min(RadialButton::ALL.len() - 1);
        Some(RadialButton::ALL[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> RadialMenu {
        RadialMenu::for_frame(640, 480)
    }

    #[test]
    fn test_geometry() {
        let m = menu();
        assert_eq!((m.center_x, m.center_y), (320, 240));
        assert_eq!(m.outer_radius, 190);
        assert_eq!(m.inner_radius, 95);
    }

    #[test]
    fn test_odd_frame_size() {
        let m = RadialMenu::for_frame(641, 301);
        assert_eq!((m.center_x, m.center_y), (320, 150));
        assert_eq!(m.outer_radius, 100);
        assert_eq!(m.inner_radius, 50);
    }

    #[test]
    fn test_wedges_clockwise_from_right() {
        let m = menu();
        let r = 140;
        // just below +x (y grows downward)
        assert_eq!(m.hit(320 + r, 250), Some(RadialButton::Settings));
        // straight down, 90 degrees
        assert_eq!(m.hit(320, 240 + r), Some(RadialButton::ChangeSound));
        // left, 180 degrees
        assert_eq!(m.hit(320 - r, 240), Some(RadialButton::TurnOff));
        // straight up, 270 degrees
        assert_eq!(m.hit(320, 240 - r), Some(RadialButton::Channels));
        // just above +x, ~356 degrees
        assert_eq!(m.hit(320 + r, 230), Some(RadialButton::Back));
    }

    #[test]
    fn test_ring_bounds_exclusive() {
        let m = menu();
        assert_eq!(m.hit(320, 240), None);
        assert_eq!(m.hit(320 + 95, 240), None);
        assert_eq!(m.hit(320 + 96, 240), Some(RadialButton::Settings));
        assert_eq!(m.hit(320 + 189, 240), Some(RadialButton::Settings));
        assert_eq!(m.hit(320 + 190, 240), None);
        assert_eq!(m.hit(0, 0), None);
    }

    #[test]
    fn test_wedge_boundary() {
        let m = menu();
        // exactly 0 degrees opens wedge 0
        assert_eq!(m.hit(320 + 150, 240), Some(RadialButton::Settings));
        assert_eq!(RadialMenu::wedge_degrees(), 72.0);
    }

    #[test]
    fn test_extreme_points_miss() {
        let m = menu();
        assert_eq!(m.hit(i32::MIN, i32::MIN), None);
        assert_eq!(m.hit(320, i32::MAX), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = RadialButton::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels, ["Settings", "Change Sound", "Turn Off", "Channels", "Back"]);
        assert_eq!(RadialButton::TurnOff.as_str(), "turn-off");
    }
}
