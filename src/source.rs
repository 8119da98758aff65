// src/source.rs - Landmark streams: recorded JSON lines and a simulated hand
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SourceError;
use crate::events::Control;
use crate::landmarks::{Hand, Handedness, LandmarkFrame, INDEX_TIP};

/// One record of a landmark stream: a frame to process or a control to apply
/// before the next frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceItem {
    Frame(LandmarkFrame),
    Control(Control),
}

/// Upstream producer of frames. `Ok(None)` is the end of the stream; an
/// error is fatal for the session.
pub trait LandmarkSource {
    fn next_item(&mut self) -> Result<Option<SourceItem>, SourceError>;
}

/// Reads one JSON `SourceItem` per line. Blank lines and lines starting
/// with `#` are skipped.
pub struct ReplaySource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn next_item(&mut self) -> Result<Option<SourceItem>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let record = self.buf.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }
            return serde_json::from_str(record)
                .map(Some)
                .map_err(|source| SourceError::Parse {
                    line: self.line,
                    source,
                });
        }
    }
}

const SIM_FPS: f64 = 30.0;
// Thumb-index gap in camera pixels.
const SIM_PINCHED_GAP: f64 = 20.0;
const SIM_OPEN_GAP: f64 = 80.0;

/// A right hand tracing a slow loop across the frame. It taps every two
/// seconds and holds a long pinch (a drag) every six.
pub struct SimulatedSource {
    frame_width: f64,
    frames: u64,
    produced: u64,
}

impl SimulatedSource {
    pub fn new(frame_width: f64, frames: u64) -> Self {
        Self {
            frame_width,
            frames,
            produced: 0,
        }
    }

    fn frame_at(&self, t: f64) -> LandmarkFrame {
        let wrist = Vector2::new(0.5 + 0.2 * (t * 0.5).cos(), 0.75 + 0.1 * t.sin());
        let mut hand = Hand::synthetic(Handedness::Right, wrist, [true, true, false, false, false]);

        let in_drag = t % 6.0 >= 3.0 && t % 6.0 < 4.0;
        let in_tap = t % 2.0 >= 1.0 && t % 2.0 < 1.15;
        let gap = if in_drag || in_tap { SIM_PINCHED_GAP } else { SIM_OPEN_GAP };
        hand.set_thumb_gap(INDEX_TIP, gap / self.frame_width);

        LandmarkFrame::new(t, vec![hand])
    }
}

impl LandmarkSource for SimulatedSource {
    fn next_item(&mut self) -> Result<Option<SourceItem>, SourceError> {
        if self.produced >= self.frames {
            debug!("Simulation finished after {} frames", self.produced);
            return Ok(None);
        }
        let t = self.produced as f64 / SIM_FPS;
        self.produced += 1;
        Ok(Some(SourceItem::Frame(self.frame_at(t))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn hand_json() -> String {
        let hand = Hand::synthetic(Handedness::Left, Vector2::new(0.4, 0.7), [true; 5]);
        serde_json::to_string(&hand).unwrap()
    }

    #[test]
    fn replays_frames_and_controls() {
        let input = format!(
            "# recorded session\n{{\"frame\":{{\"timestamp\":0.0,\"hands\":[{}]}}}}\n\n{{\"control\":\"recalibrate\"}}\n{{\"frame\":{{\"timestamp\":0.033}}}}\n",
            hand_json()
        );
        let mut source = ReplaySource::new(Cursor::new(input));

        match source.next_item().unwrap() {
            Some(SourceItem::Frame(frame)) => {
                assert_eq!(frame.hands.len(), 1);
                assert_eq!(frame.hands[0].handedness, Handedness::Left);
            }
            other => panic!("expected a frame, got {:?}", other),
        }
        assert_eq!(
            source.next_item().unwrap(),
            Some(SourceItem::Control(Control::Recalibrate))
        );
        assert_eq!(
            source.next_item().unwrap(),
            Some(SourceItem::Frame(LandmarkFrame::empty(0.033)))
        );
        assert_eq!(source.next_item().unwrap(), None);
    }

    #[test]
    fn bad_record_reports_line_number() {
        let input = "{\"frame\":{\"timestamp\":0.0}}\n# comment\n{\"frame\": 12}\n";
        let mut source = ReplaySource::new(Cursor::new(input));
        assert!(source.next_item().unwrap().is_some());
        match source.next_item() {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ReplaySource::open(dir.path().join("absent.jsonl")),
            Err(SourceError::Io(_))
        ));
    }

    #[test]
    fn simulation_produces_valid_frames_then_ends() {
        let mut source = SimulatedSource::new(640.0, 90);
        let mut count = 0;
        let mut last_t = -1.0;
        while let Some(item) = source.next_item().unwrap() {
            let SourceItem::Frame(frame) = item else {
                panic!("simulation only produces frames");
            };
            assert!(frame.timestamp > last_t);
            assert!(frame.hands.iter().all(|h| h.validate().is_ok()));
            last_t = frame.timestamp;
            count += 1;
        }
        assert_eq!(count, 90);
    }
}
