// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background work for the UI thread.
//!
//! File loading, image encoding and project storage run on worker threads
//! so the canvas keeps responding while they are in flight. The UI polls
//! each task once per frame.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// A single piece of work running on its own thread.
pub struct BackgroundTask<T> {
    label: String,
    started: Instant,
    receiver: Receiver<Result<T>>,
    stall_reported: bool,
}

impl<T: Send + 'static> BackgroundTask<T> {
    /// Run `work` on a new thread.
    pub fn spawn<F>(label: impl Into<String>, work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = channel();
        let thread_label = label.clone();

        std::thread::spawn(move || {
            let result = work();
            if sender.send(result).is_err() {
                log::debug!("Result of \"{}\" arrived after it was abandoned", thread_label);
            }
        });

        Self {
            label,
            started: Instant::now(),
            receiver,
            stall_reported: false,
        }
    }
}

impl<T> BackgroundTask<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Check for a result without blocking.
    ///
    /// A worker that died without answering is reported as an error.
    pub fn poll(&mut self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow!("{} stopped without a result", self.label)))
            }
        }
    }

    /// Whether the task has been running longer than `threshold`.
    ///
    /// The first time this becomes true a warning is logged.
    pub fn is_stalled(&mut self, threshold: Duration) -> bool {
        let stalled = self.elapsed() >= threshold;
        if stalled && !self.stall_reported {
            self.stall_reported = true;
            log::warn!(
                "{} has been running for {:.0}s",
                self.label,
                self.elapsed().as_secs_f32()
            );
        }
        stalled
    }
}
