//! Frame loop tying the provider, pipeline, actuator and menu together.

use std::io::Write;

use anyhow::Context;
use tracing::{info, warn};

use crate::actuator::PointerActuator;
use crate::config::HandMenuConfig;
use crate::menu::{MenuEvent, MenuSession};
use crate::pipeline::{FrameOutput, GesturePipeline};
use crate::tracking::{DetectionFrame, LandmarkProvider};

/// Why [`App::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    ExitRequested,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfStream => "end-of-stream",
            Self::ExitRequested => "exit-requested",
        }
    }
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub events: u64,
    pub stop: StopReason,
}

pub struct App {
    pub config: HandMenuConfig,
    pipeline: GesturePipeline,
    menu: MenuSession,
    last_timestamp_ms: Option<f64>,
}

impl App {
    pub fn new(config: HandMenuConfig) -> Self {
        let pipeline = GesturePipeline::new(
            config.classifier.clone(),
            config.selector.clone(),
            config.debounce.clone(),
            config.cursor.clone(),
        );
        let menu = MenuSession::new(config.cursor.offset_y);
        Self {
            config,
            pipeline,
            menu,
            last_timestamp_ms: None,
        }
    }

    pub fn pipeline(&self) -> &GesturePipeline {
        &self.pipeline
    }

    pub fn menu(&self) -> &MenuSession {
        &self.menu
    }

    /// Milliseconds since the previous frame.
    ///
    /// Uses frame timestamps when present, else the configured interval.
    fn frame_dt(&mut self, frame: &DetectionFrame) -> f64 {
        let interval = self.config.frame_interval_ms;
        match (frame.timestamp_ms, self.last_timestamp_ms) {
            (Some(now), Some(prev)) => {
                self.last_timestamp_ms = Some(now);
                if now < prev {
                    warn!("frame timestamp went backwards ({} < {})", now, prev);
                    interval
                } else {
                    now - prev
                }
            }
            (now, _) => {
                self.last_timestamp_ms = now;
                interval
            }
        }
    }

    /// Process one frame: pipeline, then actuator, then menu.
    pub fn step(
        &mut self,
        frame: &DetectionFrame,
        actuator: &mut dyn PointerActuator,
    ) -> anyhow::Result<(FrameOutput, Vec<MenuEvent>)> {
        let dt_ms = self.frame_dt(frame);
        let output = self.pipeline.process(frame, dt_ms)?;

        if output.cursor_moved {
            actuator.move_cursor(output.cursor)?;
        }
        if output.actions.click {
            actuator.click()?;
        }

        let events = self
            .menu
            .update(frame.width, frame.height, output.cursor, &output.actions);
        Ok((output, events))
    }

    /// Run until the provider ends, the menu requests exit, or an error.
    ///
    /// Menu events are written to `out` as one s-expression per line.
    pub fn run(
        &mut self,
        provider: &mut dyn LandmarkProvider,
        actuator: &mut dyn PointerActuator,
        out: &mut dyn Write,
    ) -> anyhow::Result<RunSummary> {
        info!(
            "handmenu loop starting (debounce {})",
            if self.pipeline.debounce_enabled() { "on" } else { "off" }
        );
        let mut frames = 0u64;
        let mut events = 0u64;

        let stop = loop {
            let Some(frame) = provider.next_frame()? else {
                break StopReason::EndOfStream;
            };
            frames += 1;

            let (_, menu_events) = self
                .step(&frame, actuator)
                .with_context(|| format!("frame {} rejected", frames))?;
            for event in &menu_events {
                writeln!(out, "{}", event.to_sexp()).context("failed to write event")?;
            }
            events += menu_events.len() as u64;

            if self.menu.exit_requested() {
                break StopReason::ExitRequested;
            }
        };

        out.flush().context("failed to flush events")?;
        info!(frames, events, "handmenu loop stopped: {}", stop.as_str());
        Ok(RunSummary {
            frames,
            events,
            stop,
        })
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:pipeline {} :menu {})",
            self.pipeline.status_sexp(),
            self.menu.status_sexp()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::{PointerCall, RecordingActuator};
    use crate::menu::MenuView;
    use crate::pipeline::test_frames::*;
    use crate::pipeline::CursorPosition;
    use crate::tracking::landmarks::RawHand;
    use crate::tracking::{Handedness, ScriptedProvider};

    fn at(mut frame: DetectionFrame, ts: f64) -> DetectionFrame {
        frame.timestamp_ms = Some(ts);
        frame
    }

    #[test]
    fn test_open_menu_and_turn_off() {
        let menu_button = (0.2, 0.125);
        let turn_off = (0.28125, 0.5);
        let mut provider = ScriptedProvider::new([
            at(right_hand_frame(POINT, menu_button.0, menu_button.1), 0.0),
            at(right_hand_frame(CLICK, menu_button.0, menu_button.1), 100.0),
            at(right_hand_frame(POINT, turn_off.0, turn_off.1), 200.0),
            at(right_hand_frame(POINT, turn_off.0, turn_off.1), 300.0),
            at(right_hand_frame(POINT, turn_off.0, turn_off.1), 400.0),
            // click cooldown (250 ms) has run out by now
            at(right_hand_frame(CLICK, turn_off.0, turn_off.1), 500.0),
            at(right_hand_frame(POINT, 0.5, 0.5), 600.0),
        ]);
        let mut actuator = RecordingActuator::default();
        let mut out = Vec::new();
        let mut app = App::new(HandMenuConfig::default());

        let summary = app.run(&mut provider, &mut actuator, &mut out).unwrap();
        assert_eq!(summary.stop, StopReason::ExitRequested);
        assert_eq!(summary.frames, 6);
        assert_eq!(summary.events, 2);
        assert_eq!(provider.remaining(), 1);

        assert_eq!(
            actuator.calls,
            vec![
                PointerCall::Move(CursorPosition::new(128, 110)),
                PointerCall::Click,
                PointerCall::Move(CursorPosition::new(180, 290)),
                PointerCall::Click,
            ]
        );
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "(:type :event :event :menu-opened)",
                "(:type :event :event :exit-requested)"
            ]
        );
        assert_eq!(app.menu().view(), MenuView::Radial);
    }

    #[test]
    fn test_click_during_cooldown_ignored() {
        let menu_button = (0.2, 0.125);
        let mut app = App::new(HandMenuConfig::default());
        let mut actuator = RecordingActuator::default();
        let frames = [
            at(right_hand_frame(POINT, menu_button.0, menu_button.1), 0.0),
            at(right_hand_frame(CLICK, menu_button.0, menu_button.1), 33.0),
            at(right_hand_frame(POINT, menu_button.0, menu_button.1), 66.0),
            at(right_hand_frame(CLICK, menu_button.0, menu_button.1), 99.0),
        ];
        let mut opened = 0;
        for frame in &frames {
            let (_, events) = app.step(frame, &mut actuator).unwrap();
            opened += events.iter().filter(|e| **e == MenuEvent::MenuOpened).count();
        }
        assert_eq!(opened, 1);
        assert_eq!(actuator.clicks(), 1);
    }

    #[test]
    fn test_end_of_stream() {
        let mut provider = ScriptedProvider::new([
            DetectionFrame::empty(640, 480),
            DetectionFrame::empty(640, 480),
        ]);
        let mut actuator = RecordingActuator::default();
        let mut out = Vec::new();
        let mut app = App::new(HandMenuConfig::default());
        let summary = app.run(&mut provider, &mut actuator, &mut out).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                frames: 2,
                events: 0,
                stop: StopReason::EndOfStream
            }
        );
        assert!(actuator.calls.is_empty());
        assert!(out.is_empty());
        assert_eq!(app.pipeline().frames(), 2);
    }

    #[test]
    fn test_invalid_frame_stops_run() {
        let mut bad = DetectionFrame::empty(640, 480);
        bad.hands.push(RawHand {
            handedness: None,
            landmarks: pose_keypoints(POINT),
        });
        let mut provider = ScriptedProvider::new([DetectionFrame::empty(640, 480), bad]);
        let mut actuator = RecordingActuator::default();
        let mut out = Vec::new();
        let mut app = App::new(HandMenuConfig::default());
        let err = app.run(&mut provider, &mut actuator, &mut out).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("frame 2 rejected"), "{}", msg);
    }

    #[test]
    fn test_frame_dt() {
        let mut app = App::new(HandMenuConfig::default());
        let untimed = DetectionFrame::empty(640, 480);
        assert_eq!(app.frame_dt(&untimed), 33.0);
        assert_eq!(app.frame_dt(&at(untimed.clone(), 1000.0)), 33.0);
        assert_eq!(app.frame_dt(&at(untimed.clone(), 1050.0)), 50.0);
        // backwards clock falls back to the interval
        assert_eq!(app.frame_dt(&at(untimed.clone(), 900.0)), 33.0);
        assert_eq!(app.frame_dt(&at(untimed, 920.0)), 20.0);
    }

    #[test]
    fn test_left_hand_alone_drives_cursor() {
        let mut frame = DetectionFrame::empty(640, 480);
        frame.hands.push(RawHand {
            handedness: Some(Handedness::Right),
            landmarks: pose_keypoints(POINT),
        });
        let mut app = App::new(HandMenuConfig::default());
        let mut actuator = RecordingActuator::default();
        let (output, _) = app.step(&frame, &mut actuator).unwrap();
        assert_eq!(output.handedness, Some(Handedness::Left));
        assert_eq!(actuator.calls.len(), 1);
    }

    #[test]
    fn test_status_sexp_parses() {
        let app = App::new(HandMenuConfig::default());
        assert!(lexpr::from_str(&app.status_sexp()).is_ok());
    }
}
