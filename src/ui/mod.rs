// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Wall Mockup application.

pub mod canvas;
pub mod project_panel;
pub mod sidebar;
pub mod textures;
pub mod toolbar;

use std::time::{Duration, Instant};

/// Kind of status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// A transient message shown in the project panel.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text.into(), MessageKind::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text.into(), MessageKind::Error)
    }

    fn new(text: String, kind: MessageKind) -> Self {
        Self {
            text,
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, lifetime: Duration) -> bool {
        self.shown_at.elapsed() >= lifetime
    }

    pub fn color(&self) -> egui::Color32 {
        match self.kind {
            MessageKind::Success => egui::Color32::from_rgb(90, 180, 110),
            MessageKind::Error => egui::Color32::from_rgb(220, 90, 80),
        }
    }
}
