//! Test doubles shared by unit tests.
//!
//! `FixedMeasurer` lays text out on a fixed character grid, and
//! `ScriptedFetcher` serves canned responses with optional latency.

use crate::model::{FetchError, Row, RowId};
use crate::source::{FetchDirection, RowFetcher};
use crate::view_state::{MeasureError, TextMeasurer};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Build a loaded row whose message is `message {id}`.
pub fn row(id: &str) -> Row {
    Row::new(RowId::new(id).unwrap(), format!("message {id}"), None)
}

/// Build `count` loaded rows with ids `{prefix}-0..`.
pub fn rows(prefix: &str, count: usize) -> Vec<Row> {
    (0..count).map(|i| row(&format!("{prefix}-{i}"))).collect()
}

/// Measures text as if every glyph were `char_width` wide.
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasurer {
    char_width: f64,
    line_height: usize,
    fail_render: bool,
}

impl FixedMeasurer {
    pub fn new(char_width: f64, line_height: usize) -> Self {
        Self {
            char_width,
            line_height,
            fail_render: false,
        }
    }

    /// Reports a valid glyph width, but every layout pass fails.
    pub fn failing(char_width: f64) -> Self {
        Self {
            char_width,
            line_height: 0,
            fail_render: true,
        }
    }
}

#[async_trait]
impl TextMeasurer for FixedMeasurer {
    fn text_width(&self, text: &str, _font: &str) -> Result<f64, MeasureError> {
        Ok(text.chars().count() as f64 * self.char_width)
    }

    async fn rendered_height(
        &self,
        text: &str,
        container_width: usize,
    ) -> Result<usize, MeasureError> {
        if self.fail_render {
            return Err(MeasureError("layout unavailable".to_string()));
        }
        let width = text.chars().count() as f64 * self.char_width;
        let lines = (width / container_width.max(1) as f64).ceil() as usize;
        Ok(lines.max(1) * self.line_height)
    }
}

/// Serves queued responses per direction; an empty queue yields no rows.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    latency: Duration,
    older: Mutex<VecDeque<Result<Vec<Row>, FetchError>>>,
    newer: Mutex<VecDeque<Result<Vec<Row>, FetchError>>>,
    calls: Mutex<Vec<(FetchDirection, usize)>>,
}

impl ScriptedFetcher {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn push(&self, direction: FetchDirection, response: Result<Vec<Row>, FetchError>) {
        let queue = match direction {
            FetchDirection::Older => &self.older,
            FetchDirection::Newer => &self.newer,
        };
        queue.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<(FetchDirection, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowFetcher for ScriptedFetcher {
    async fn fetch(&self, direction: FetchDirection, count: usize) -> Result<Vec<Row>, FetchError> {
        self.calls.lock().unwrap().push((direction, count));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let queue = match direction {
            FetchDirection::Older => &self.older,
            FetchDirection::Newer => &self.newer,
        };
        let next = queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}
