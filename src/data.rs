// src/data.rs - Session event log, CSV export and HTML report
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;

use crate::events::InteractionEvent;
use crate::keys::{ActionKey, Key};

#[derive(Debug, Serialize)]
struct EventRecord {
    frame: u64,
    timestamp: f64,
    event: &'static str,
    x: Option<f64>,
    y: Option<f64>,
    key: Option<String>,
    mode: Option<&'static str>,
}

impl EventRecord {
    fn new(frame: u64, timestamp: f64, event: &InteractionEvent) -> Self {
        let mut record = Self {
            frame,
            timestamp,
            event: event.kind(),
            x: None,
            y: None,
            key: None,
            mode: None,
        };
        match event {
            InteractionEvent::CursorMove { x, y } => {
                record.x = Some(*x);
                record.y = Some(*y);
            }
            InteractionEvent::KeySelected { key } => record.key = Some(key.to_string()),
            InteractionEvent::ModeChanged { mode } => record.mode = Some(mode.as_str()),
            _ => {}
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub duration: f64,
    /// Event count per `InteractionEvent::kind`.
    pub counts: BTreeMap<&'static str, usize>,
    /// Text produced by the selected keys, with Backspace applied.
    pub typed_text: String,
}

impl SessionSummary {
    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}

/// Streams session events to `events.csv` as they arrive and keeps only the
/// running totals the summary and report need.
pub struct SessionRecorder {
    output_dir: PathBuf,
    session_name: String,
    writer: Option<Writer<File>>,
    counts: BTreeMap<&'static str, usize>,
    typed_text: String,
    frames: u64,
    first_timestamp: Option<f64>,
    last_timestamp: Option<f64>,
}

impl SessionRecorder {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            writer: None,
            counts: BTreeMap::new(),
            typed_text: String::new(),
            frames: 0,
            first_timestamp: None,
            last_timestamp: None,
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.session_dir().join("events.csv")
    }

    /// Creates `events.csv` in the session directory. Events recorded from
    /// now on are written to it as they arrive.
    pub fn start_csv(&mut self) -> Result<PathBuf> {
        let csv_path = self.csv_path();
        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let file = File::create(&csv_path)
            .with_context(|| format!("creating {}", csv_path.display()))?;
        self.writer = Some(Writer::from_writer(file));
        Ok(csv_path)
    }

    /// Logs the events one processed frame produced.
    pub fn record_frame(&mut self, timestamp: f64, events: &[InteractionEvent]) -> Result<()> {
        let frame = self.frames;
        self.frames += 1;
        self.first_timestamp.get_or_insert(timestamp);
        self.last_timestamp = Some(timestamp);
        self.log(frame, timestamp, events)
    }

    /// Logs events raised between frames, stamped with the last frame seen.
    pub fn record_between_frames(&mut self, events: &[InteractionEvent]) -> Result<()> {
        let frame = self.frames.saturating_sub(1);
        let timestamp = self.last_timestamp.unwrap_or(0.0);
        self.log(frame, timestamp, events)
    }

    fn log(&mut self, frame: u64, timestamp: f64, events: &[InteractionEvent]) -> Result<()> {
        for event in events {
            *self.counts.entry(event.kind()).or_insert(0) += 1;
            if let InteractionEvent::KeySelected { key } = event {
                apply_key(&mut self.typed_text, *key);
            }
            if let Some(writer) = self.writer.as_mut() {
                writer.serialize(EventRecord::new(frame, timestamp, event))?;
            }
        }
        Ok(())
    }

    /// Flushes buffered CSV rows to disk.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().context("flushing events.csv")?;
        }
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames: self.frames,
            duration: match (self.first_timestamp, self.last_timestamp) {
                (Some(first), Some(last)) => last - first,
                _ => 0.0,
            },
            counts: self.counts.clone(),
            typed_text: self.typed_text.clone(),
        }
    }

    pub fn generate_report(&self) -> Result<PathBuf> {
        let report_path = self.session_dir().join("report.html");
        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&report_path, self.create_html_report())
            .with_context(|| format!("writing {}", report_path.display()))?;
        Ok(report_path)
    }

    fn create_html_report(&self) -> String {
        let summary = self.summary();
        let rows: String = summary
            .counts
            .iter()
            .map(|(kind, count)| {
                format!(
                    "        <div class=\"stat-item\">\n            <span class=\"stat-label\">{}:</span>\n            <span class=\"stat-value\">{}</span>\n        </div>\n",
                    kind, count
                )
            })
            .collect();

        format!(r#"
<!DOCTYPE html>
<html>
<head>
    <title>Gesture Session Report - {}</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; background: #f5f5f5; }}
        h1 {{ color: #333; }}
        .stats {{ background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .stat-item {{ margin: 10px 0; }}
        .stat-label {{ font-weight: bold; color: #666; }}
        .stat-value {{ color: #4682EA; font-size: 1.2em; }}
        pre {{ background: #fafafa; padding: 10px; border-radius: 4px; }}
    </style>
</head>
<body>
    <h1>Gesture Session Report</h1>
    <div class="stats">
        <h2>Session: {}</h2>
        <div class="stat-item">
            <span class="stat-label">Frames:</span>
            <span class="stat-value">{}</span>
        </div>
        <div class="stat-item">
            <span class="stat-label">Duration:</span>
            <span class="stat-value">{:.1} s</span>
        </div>
{}        <h2>Typed text</h2>
        <pre>{}</pre>
    </div>
</body>
</html>
        "#,
            self.session_name,
            self.session_name,
            summary.frames,
            summary.duration,
            rows,
            escape_html(&summary.typed_text)
        )
    }
}

fn apply_key(text: &mut String, key: Key) {
    match key {
        Key::Char(c) => text.push(c),
        Key::Space => text.push(' '),
        Key::Backspace => {
            text.pop();
        }
        Key::Action(ActionKey::Enter) => text.push('\n'),
        Key::Action(ActionKey::Tab) => text.push('\t'),
        Key::Action(_) => {}
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
