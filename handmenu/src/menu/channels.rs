//! Scrollable channel list.

use tracing::debug;

use super::Rect;

pub const TOTAL_CHANNELS: usize = 20;
pub const VISIBLE_CHANNELS: usize = 10;
pub const ROW_HEIGHT: i32 = 50;
pub const LIST_X: i32 = 300;
pub const LIST_Y: i32 = 150;

/// Highest scroll offset: the last page shows the last channel.
pub const MAX_OFFSET: usize = TOTAL_CHANNELS - VISIBLE_CHANNELS;

const NO_SELECTION: &str = "No Channel Selected";

/// Channel list state; survives leaving and re-entering the sub-menu.
#[derive(Debug, Clone, Default)]
pub struct ChannelList {
    offset: usize,
    selected: Option<usize>,
}

impl ChannelList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Display name of a channel by zero-based index.
    pub fn label(index: usize) -> String {
        format!("Channel {}", index + 1)
    }

    pub fn selected_label(&self) -> String {
        match self.selected {
            Some(i) => Self::label(i),
            None => NO_SELECTION.to_string(),
        }
    }

    /// List rectangle for a frame size.  Rows are not clipped to its height.
    pub fn list_rect(frame_width: u32, frame_height: u32) -> Rect {
        Rect::new(
            LIST_X,
            LIST_Y,
            frame_width as i32 - 350,
            frame_height as i32 - 200,
        )
    }

    /// Move the window one row up.  Returns true if the offset changed.
    pub fn scroll_up(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset -= 1;
        debug!("Channel list scrolled up: {}", self.offset);
        true
    }

    /// Move the window one row down.  Returns true if the offset changed.
    pub fn scroll_down(&mut self) -> bool {
        if self.offset >= MAX_OFFSET {
            return false;
        }
        self.offset += 1;
        debug!("Channel list scrolled down: {}", self.offset);
        true
    }

    /// Channel index of the visible row under a frame-space point.
    ///
    /// Rows are half-open vertically so a point on a shared edge belongs to
    /// the lower row only.  The last visible row also owns its bottom edge.
    pub fn hit_row(&self, x: i32, y: i32, frame_width: u32, frame_height: u32) -> Option<usize> {
        let list = Self::list_rect(frame_width, frame_height);
        if x < list.x || x > list.x.saturating_add(list.w) || y < LIST_Y {
            return None;
        }
        let rel = y - LIST_Y;
        let row = if rel == ROW_HEIGHT * VISIBLE_CHANNELS as i32 {
            VISIBLE_CHANNELS - 1
        } else {
            (rel / ROW_HEIGHT) as usize
        };
        if row >= VISIBLE_CHANNELS {
            return None;
        }
        let index = row + self.offset;
        (index < TOTAL_CHANNELS).then_some(index)
    }

    /// Select a channel.  Returns false for an out-of-range index.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= TOTAL_CHANNELS {
            return false;
        }
        self.selected = Some(index);
        true
    }
}
