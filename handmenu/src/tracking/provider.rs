//! Landmark providers: where detection frames come from.
//!
//! The pose-estimation model is a black box behind [`LandmarkProvider`].
//! A live camera + model implementation lives outside this crate; recorded
//! sessions replay through [`JsonLinesProvider`] and tests script frames
//! with [`ScriptedProvider`].

use std::collections::VecDeque;
use std::io::BufRead;

use anyhow::Context;
use tracing::{debug, trace};

use super::landmarks::DetectionFrame;

/// Anything that can deliver one complete detection frame at a time.
pub trait LandmarkProvider {
    /// Next frame, or `None` when the stream has ended.
    fn next_frame(&mut self) -> anyhow::Result<Option<DetectionFrame>>;
}

// ── JSON lines replay ──────────────────────────────────────

/// Replays frames recorded as one JSON object per line.
///
/// ```text
/// {"width": 640, "height": 480, "hands": [{"handedness": "Left", "landmarks": [[0.5, 0.8, 0.0], ...]}]}
/// ```
///
/// Blank lines and lines starting with `#` are skipped.
pub struct JsonLinesProvider<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesProvider<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> LandmarkProvider for JsonLinesProvider<R> {
    fn next_frame(&mut self) -> anyhow::Result<Option<DetectionFrame>> {
        loop {
            self.buf.clear();
            let n = self
                .reader
                .read_line(&mut self.buf)
                .with_context(|| format!("failed to read frame at line {}", self.line_no + 1))?;
            if n == 0 {
                debug!("replay finished after {} lines", self.line_no);
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let frame: DetectionFrame = serde_json::from_str(line)
                .with_context(|| format!("malformed frame at line {}", self.line_no))?;
            trace!(line = self.line_no, hands = frame.hands.len(), "frame decoded");
            return Ok(Some(frame));
        }
    }
}

// ── Scripted ───────────────────────────────────────────────

/// In-memory queue of frames.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    frames: VecDeque<DetectionFrame>,
}

impl ScriptedProvider {
    pub fn new(frames: impl IntoIterator<Item = DetectionFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: DetectionFrame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for ScriptedProvider {
    fn next_frame(&mut self) -> anyhow::Result<Option<DetectionFrame>> {
        Ok(self.frames.pop_front())
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmarks::{Handedness, LANDMARK_COUNT};
    use std::io::Cursor;

    fn frame_line(label: &str) -> String {
        let points: Vec<String> = (0..LANDMARK_COUNT).map(|_| "[0.5, 0.5, 0.0]".to_string()).collect();
        format!(
            r#"{{"width": 640, "height": 480, "hands": [{{"handedness": "{}", "landmarks": [{}]}}]}}"#,
            label,
            points.join(", ")
        )
    }

    #[test]
    fn test_json_lines_reads_frames() {
        let input = format!("{}\n{}\n", frame_line("Left"), frame_line("Right"));
        let mut p = JsonLinesProvider::new(Cursor::new(input));

        let first = p.next_frame().unwrap().unwrap();
        assert_eq!(first.width, 640);
        assert_eq!(first.hands[0].handedness, Some(Handedness::Left));
        let second = p.next_frame().unwrap().unwrap();
        assert_eq!(second.hands[0].handedness, Some(Handedness::Right));
        assert!(p.next_frame().unwrap().is_none());
        assert_eq!(p.line_no(), 2);
    }

    #[test]
    fn test_json_lines_skips_blank_and_comments() {
        let input = format!(
            "# recorded session\n\n{}\n   \n{{\"width\": 320, \"height\": 240}}\n",
            frame_line("Left")
        );
        let mut p = JsonLinesProvider::new(Cursor::new(input));
        assert_eq!(p.next_frame().unwrap().unwrap().hands.len(), 1);
        let empty = p.next_frame().unwrap().unwrap();
        assert!(empty.hands.is_empty());
        assert_eq!(empty.width, 320);
        assert!(p.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_json_lines_malformed_line() {
        let input = format!("{}\n{{\"width\": \"wide\"}}\n", frame_line("Left"));
        let mut p = JsonLinesProvider::new(Cursor::new(input));
        assert!(p.next_frame().unwrap().is_some());
        let err = p.next_frame().unwrap_err();
        assert!(format!("{:#}", err).contains("malformed frame at line 2"), "{:#}", err);
    }

    #[test]
    fn test_json_lines_missing_label_decodes() {
        // the label is validated later, not by the decoder
        let input = frame_line("Left").replace(r#""handedness": "Left", "#, "");
        let mut p = JsonLinesProvider::new(Cursor::new(input));
        let frame = p.next_frame().unwrap().unwrap();
        assert!(frame.hands[0].handedness.is_none());
        assert!(frame.validated_hands().is_err());
    }

    #[test]
    fn test_scripted_provider() {
        let mut p = ScriptedProvider::new([DetectionFrame::empty(10, 10)]);
        p.push(DetectionFrame::empty(20, 20));
        assert_eq!(p.remaining(), 2);
        assert_eq!(p.next_frame().unwrap().unwrap().width, 10);
        assert_eq!(p.next_frame().unwrap().unwrap().width, 20);
        assert!(p.next_frame().unwrap().is_none());
    }
}
