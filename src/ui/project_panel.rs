// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project manager: name, save, saved-project list, export and import.

use super::StatusMessage;
use crate::models::project::ProjectSummary;

/// Progress of the current save, as shown on the save button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    /// The save has been running longer than the configured threshold
    Stalled,
}

/// Panel state that lives across frames.
#[derive(Debug, Default)]
pub struct ProjectPanelState {
    pub name: String,
    pub show_list: bool,
}

/// Result of project panel interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    None,
    Save,
    ToggleList,
    Load(String),
    Delete { id: String, name: String },
    Export,
    Import,
    NewProject,
}

/// Everything the panel shows besides its own state.
pub struct PanelView<'a> {
    pub projects: &'a [ProjectSummary],
    pub current_id: Option<&'a str>,
    pub has_wall: bool,
    pub save_status: SaveStatus,
    pub listing: bool,
    pub message: Option<&'a StatusMessage>,
}

/// Format Unix milliseconds as a local date, e.g. `Mar 4, 2025`.
pub fn format_date(millis: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&chrono::Local).format("%b %-d, %Y").to_string(),
        None => "Unknown date".to_string(),
    }
}

/// Label for the save button.
pub fn save_label(status: SaveStatus) -> &'static str {
    match status {
        SaveStatus::Idle => "Save Project",
        SaveStatus::Saving => "Saving...",
        SaveStatus::Stalled => "Retry save",
    }
}

/// Display the project panel.
pub fn show(ui: &mut egui::Ui, state: &mut ProjectPanelState, view: PanelView<'_>) -> ProjectAction {
    let mut action = ProjectAction::None;

    ui.heading("Project");

    ui.add(
        egui::TextEdit::singleline(&mut state.name)
            .hint_text("Project name")
            .desired_width(f32::INFINITY),
    );

    ui.horizontal_wrapped(|ui| {
        // A stalled save may be retried; a running one may not
        let can_save = view.has_wall && view.save_status != SaveStatus::Saving;
        if ui
            .add_enabled(can_save, egui::Button::new(save_label(view.save_status)))
            .clicked()
        {
            action = ProjectAction::Save;
        }

        let toggle = if state.show_list { "Hide Projects" } else { "Open Project" };
        if ui.button(toggle).clicked() {
            action = ProjectAction::ToggleList;
        }
    });

    ui.horizontal_wrapped(|ui| {
        if ui
            .add_enabled(view.has_wall, egui::Button::new("Export..."))
            .clicked()
        {
            action = ProjectAction::Export;
        }
        if ui.button("Import...").clicked() {
            action = ProjectAction::Import;
        }
        if ui.button("+ New Project").clicked() {
            action = ProjectAction::NewProject;
        }
    });

    if let Some(message) = view.message {
        ui.label(egui::RichText::new(&message.text).color(message.color()));
    }

    if state.show_list {
        ui.separator();
        if view.listing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading projects...");
            });
        } else if view.projects.is_empty() {
            ui.label(egui::RichText::new("No saved projects").italics().weak());
        } else {
            egui::ScrollArea::vertical()
                .max_height(240.0)
                .id_source("saved_projects")
                .show(ui, |ui| {
                    for summary in view.projects {
                        let active = view.current_id == Some(summary.id.as_str());
                        if let Some(row) = project_row(ui, summary, active) {
                            action = row;
                        }
                    }
                });
        }
    }

    action
}

fn project_row(ui: &mut egui::Ui, summary: &ProjectSummary, active: bool) -> Option<ProjectAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        let text = format!(
            "{}\n{} · {} painting(s)",
            summary.name,
            format_date(summary.updated_at),
            summary.painting_count
        );
        if ui
            .selectable_label(active, text)
            .on_hover_text(format!("Created {}", format_date(summary.created_at)))
            .clicked()
        {
            action = Some(ProjectAction::Load(summary.id.clone()));
        }
        if ui.small_button("×").on_hover_text("Delete project").clicked() {
            action = Some(ProjectAction::Delete {
                id: summary.id.clone(),
                name: summary.name.clone(),
            });
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_label_follows_status() {
        assert_eq!(save_label(SaveStatus::Idle), "Save Project");
        assert_eq!(save_label(SaveStatus::Saving), "Saving...");
        assert_eq!(save_label(SaveStatus::Stalled), "Retry save");
    }

    #[test]
    fn test_format_date_contains_year() {
        // Mid-year so no timezone can move it into another year
        let label = format_date(1_718_000_000_000);
        assert!(label.ends_with("2024"), "{}", label);
    }

    #[test]
    fn test_format_date_out_of_range() {
        assert_eq!(format_date(i64::MAX), "Unknown date");
    }
}
