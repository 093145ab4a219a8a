//! Progress reporting for the fetch and copy loops.

use tracing::info;

/// One running progress indicator. `finish` releases it; calling it twice is harmless.
pub trait Progress: Send {
    fn inc(&mut self, n: u64);
    fn finish(&mut self);
}

/// Creates progress indicators; `total` is `None` when unknown.
pub trait ProgressFactory: Send + Sync {
    fn start(&self, label: &str, total: Option<u64>) -> Box<dyn Progress>;
}

/// Logs `label: done/total` every `stride` items and once more on finish.
pub struct LogProgressFactory {
    stride: u64,
}

impl LogProgressFactory {
    pub fn new(stride: u64) -> Self {
        Self {
            stride: stride.max(1),
        }
    }
}

impl Default for LogProgressFactory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressFactory for LogProgressFactory {
    fn start(&self, label: &str, total: Option<u64>) -> Box<dyn Progress> {
        Box::new(LogProgress {
            label: label.to_string(),
            total,
            done: 0,
            stride: self.stride,
            finished: false,
        })
    }
}

struct LogProgress {
    label: String,
    total: Option<u64>,
    done: u64,
    stride: u64,
    finished: bool,
}

impl LogProgress {
    fn report(&self) {
        match self.total {
            Some(total) => {
                info!(done = self.done, total, "{}: {}/{}", self.label, self.done, total)
            }
            None => info!(done = self.done, "{}: {}", self.label, self.done),
        }
    }
}

impl Progress for LogProgress {
    fn inc(&mut self, n: u64) {
        let before = self.done / self.stride;
        self.done += n;
        if self.done / self.stride != before {
            self.report();
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.report();
        }
    }
}
