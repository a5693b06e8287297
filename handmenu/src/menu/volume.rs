//! Volume level for the Change Sound sub-menu.

use tracing::debug;

pub const VOLUME_MAX: u8 = 100;
pub const VOLUME_STEP: u8 = 5;
const VOLUME_INITIAL: u8 = 50;

#[derive(Debug, Clone)]
pub struct VolumeControl {
    level: u8,
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self {
            level: VOLUME_INITIAL,
        }
    }
}

impl VolumeControl {
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Raise by one step.  Returns the new level if it changed.
    pub fn raise(&mut self) -> Option<u8> {
        self.set(self.level.saturating_add(VOLUME_STEP).min(VOLUME_MAX))
    }

    /// Lower by one step.  Returns the new level if it changed.
    pub fn lower(&mut self) -> Option<u8> {
        self.set(self.level.saturating_sub(VOLUME_STEP))
    }

    fn set(&mut self, level: u8) -> Option<u8> {
        if level == self.level {
            return None;
        }
        self.level = level;
        debug!("Volume: {}", level);
        Some(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_level() {
        assert_eq!(VolumeControl::default().level(), 50);
    }

    #[test]
    fn test_raise_clamps_at_max() {
        let mut v = VolumeControl::default();
        for _ in 0..10 {
            assert!(v.raise().is_some());
        }
        assert_eq!(v.level(), 100);
        assert_eq!(v.raise(), None);
        assert_eq!(v.level(), 100);
    }

    #[test]
    fn test_lower_clamps_at_zero() {
        let mut v = VolumeControl::default();
        assert_eq!(v.lower(), Some(45));
        for _ in 0..9 {
            v.lower();
        }
        assert_eq!(v.level(), 0);
        assert_eq!(v.lower(), None);
    }
}
