// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the live composition and routes actions
//! from the UI components to the models, the drag controller and the
//! background persistence tasks.

use crate::config::AppConfig;
use crate::io::media::{self, DecodedImage, LoadedImage};
use crate::io::serialization::{self, ProjectError};
use crate::io::store::{DirectoryStore, MemoryStore, ObjectStore, ProjectStore};
use crate::io::tasks::BackgroundTask;
use crate::models::composition::{Composition, Scene};
use crate::models::history::History;
use crate::models::painting::{Painting, PaintingId, PaintingSpec};
use crate::models::project::{Project, ProjectSummary};
use crate::models::wall::Wall;
use crate::ui::canvas::{self, CanvasAction};
use crate::ui::project_panel::{self, PanelView, ProjectAction, ProjectPanelState, SaveStatus};
use crate::ui::sidebar::{self, SidebarAction, UploadForm};
use crate::ui::textures::{TextureCache, TextureKey};
use crate::ui::{toolbar, StatusMessage};
use crate::util::drag::{DragController, DragStart};
use crate::util::scale::Zoom;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

type SharedStore = Arc<ProjectStore<Box<dyn ObjectStore>>>;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

/// A project read from the store or a file, with its images already decoded.
struct OpenedProject {
    project: Project,
    scene: Scene,
    wall_pixels: Option<DecodedImage>,
    painting_pixels: Vec<(PaintingId, DecodedImage)>,
}

/// Where an opened project came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenSource {
    Store,
    File,
}

/// Menu entries that need the whole app to act on.
enum MenuAction {
    None,
    NewProject,
    Import,
    Export,
    Undo,
    Redo,
}

/// Work running off the UI thread, one slot per kind.
#[derive(Default)]
struct Tasks {
    wall_image: Option<BackgroundTask<LoadedImage>>,
    painting_image: Option<BackgroundTask<LoadedImage>>,
    save: Option<BackgroundTask<Project>>,
    list: Option<BackgroundTask<Vec<ProjectSummary>>>,
    open: Option<(OpenSource, BackgroundTask<OpenedProject>)>,
    delete: Option<BackgroundTask<String>>,
    export: Option<BackgroundTask<PathBuf>>,
}

impl Tasks {
    fn any_pending(&self) -> bool {
        self.wall_image.is_some()
            || self.painting_image.is_some()
            || self.save.is_some()
            || self.list.is_some()
            || self.open.is_some()
            || self.delete.is_some()
            || self.export.is_some()
    }
}

/// Take the result of a finished task out of its slot.
fn poll_slot<T>(slot: &mut Option<BackgroundTask<T>>) -> Option<anyhow::Result<T>> {
    let result = slot.as_mut()?.poll()?;
    *slot = None;
    Some(result)
}

/// Name used when saving with an empty name field.
fn default_project_name() -> String {
    format!("Project {}", chrono::Local::now().format("%-m/%-d/%Y"))
}

/// Name written into an exported file; matches the suggested file name.
fn export_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "project".to_string()
    } else {
        name.to_string()
    }
}

/// Name given to an imported project.
fn imported_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "Imported Project".to_string()
    } else {
        name.to_string()
    }
}

/// Ask a yes/no question in a native dialog.
fn confirm(title: &str, description: &str) -> bool {
    let answer = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    matches!(answer, rfd::MessageDialogResult::Yes)
}

/// Read a project's images on the calling thread so the UI only uploads them.
fn open_project(project: Project) -> anyhow::Result<OpenedProject> {
    let scene = serialization::deserialize(&project)?;

    let wall_pixels = scene.wall.as_ref().and_then(|wall| match media::decode(&wall.image) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::warn!("Wall image of \"{}\" cannot be shown: {}", project.name, e);
            None
        }
    });
    let painting_pixels = scene
        .paintings
        .iter()
        .filter_map(|painting| match media::decode(&painting.image) {
            Ok(decoded) => Some((painting.id, decoded)),
            Err(e) => {
                log::warn!("Image of painting {} cannot be shown: {}", painting.id, e);
                None
            }
        })
        .collect();

    Ok(OpenedProject {
        project,
        scene,
        wall_pixels,
        painting_pixels,
    })
}

/// Main application state.
pub struct WallMockApp {
    config: AppConfig,

    /// Live wall and paintings
    composition: Composition,

    /// Painting arrangements for undo/redo
    history: History<Vec<Painting>>,

    drag: DragController,
    zoom: Zoom,
    textures: TextureCache,
    store: SharedStore,

    wall_form: UploadForm,
    painting_form: UploadForm,
    /// The wall setup form is shown again for an existing wall
    changing_wall: bool,
    /// Painting whose frame picker is open
    frame_picker: Option<PaintingId>,

    panel: ProjectPanelState,
    projects: Vec<ProjectSummary>,
    /// Store id of the project being edited, `None` until first saved
    current_project_id: Option<String>,
    /// Creation time of the project being edited
    current_created_at: Option<i64>,

    message: Option<StatusMessage>,
    tasks: Tasks,

    /// Recompute the fit scale on the next frame
    fit_pending: bool,
    /// Canvas area used for the last fit, to refit on resize
    last_canvas_size: Option<egui::Vec2>,
}

impl WallMockApp {
    /// Create the application, opening the project store from `config`.
    ///
    /// When the project directory cannot be used, projects are kept in
    /// memory for this session and the user is told so.
    pub fn new(config: AppConfig) -> Self {
        let mut message = None;
        let dir = config.storage.projects_dir();
        let backend: Box<dyn ObjectStore> = match DirectoryStore::open(&dir) {
            Ok(store) => {
                log::info!("Project store at {}", store.dir().display());
                Box::new(store)
            }
            Err(e) => {
                log::error!("Cannot open project store at {}: {}", dir.display(), e);
                message = Some(StatusMessage::error(
                    "Project storage unavailable, saves last for this session only",
                ));
                Box::new(MemoryStore::new())
            }
        };

        Self::with_store(config, Arc::new(ProjectStore::new(backend)), message)
    }

    fn with_store(config: AppConfig, store: SharedStore, message: Option<StatusMessage>) -> Self {
        Self {
            composition: Composition::new(config.placement.clone()),
            history: History::default(),
            drag: DragController::new(),
            zoom: Zoom::new(&config.zoom),
            textures: TextureCache::default(),
            store,
            wall_form: UploadForm::default(),
            painting_form: UploadForm::default(),
            changing_wall: false,
            frame_picker: None,
            panel: ProjectPanelState::default(),
            projects: Vec::new(),
            current_project_id: None,
            current_created_at: None,
            message,
            tasks: Tasks::default(),
            fit_pending: false,
            last_canvas_size: None,
            config,
        }
    }

    fn show_success(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage::success(text));
    }

    fn show_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("{}", text);
        self.message = Some(StatusMessage::error(text));
    }

    fn save_status(&mut self) -> SaveStatus {
        let threshold = Duration::from_secs(self.config.storage.slow_operation_secs);
        match self.tasks.save.as_mut() {
            None => SaveStatus::Idle,
            Some(task) => {
                if task.is_stalled(threshold) {
                    SaveStatus::Stalled
                } else {
                    SaveStatus::Saving
                }
            }
        }
    }

    /// Save a painting arrangement before changing it.
    fn remember_paintings(&mut self) {
        self.history.push(self.composition.paintings().to_vec());
    }

    // ---- Wall and paintings ----

    fn pick_image(&mut self, for_wall: bool) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        let label = if for_wall { "load wall image" } else { "load painting image" };
        let task = BackgroundTask::spawn(label, move || Ok(media::load_file(&path)?));
        if for_wall {
            self.wall_form.loading = true;
            self.tasks.wall_image = Some(task);
        } else {
            self.painting_form.loading = true;
            self.tasks.painting_image = Some(task);
        }
    }

    fn set_wall(&mut self, ctx: &egui::Context) {
        let Some((real_width, real_height)) = self.wall_form.dimensions() else {
            self.show_error("Please enter the wall width and height in inches");
            return;
        };
        let loaded = self.wall_form.image.as_ref();
        let wall = Wall::new(
            loaded.map(|l| l.image.clone()),
            loaded.map_or(0, |l| l.decoded.width),
            loaded.map_or(0, |l| l.decoded.height),
            real_width,
            real_height,
        );

        match wall {
            Ok(wall) => {
                self.drag.release();
                self.frame_picker = None;
                self.textures.clear_scene();
                if let Some(loaded) = &self.wall_form.image {
                    self.textures.insert(ctx, TextureKey::Wall, &loaded.decoded);
                }
                self.composition.set_wall(wall);
                self.history.clear();
                self.wall_form.clear();
                self.textures.remove(TextureKey::WallPreview);
                self.changing_wall = false;
                self.fit_pending = true;
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    fn add_painting(&mut self, ctx: &egui::Context) {
        let Some((width_inches, height_inches)) = self.painting_form.dimensions() else {
            self.show_error("Please enter the painting width and height in inches");
            return;
        };
        let spec = PaintingSpec {
            image: self.painting_form.image.as_ref().map(|l| l.image.clone()),
            width_inches,
            height_inches,
        };

        let before = self.composition.paintings().to_vec();
        match self.composition.add_painting(spec) {
            Ok(id) => {
                self.history.push(before);
                if let Some(loaded) = &self.painting_form.image {
                    self.textures.insert(ctx, TextureKey::Painting(id), &loaded.decoded);
                }
                self.painting_form.clear();
                self.textures.remove(TextureKey::PaintingPreview);
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    fn remove_painting(&mut self, id: PaintingId) {
        if self.composition.painting(id).is_none() {
            return;
        }
        self.remember_paintings();
        self.composition.remove_painting(id);
        self.drag.forget(id);
        self.textures.remove(TextureKey::Painting(id));
        if self.frame_picker == Some(id) {
            self.frame_picker = None;
        }
    }

    fn undo(&mut self) {
        if let Some(previous) = self.history.undo(self.composition.paintings().to_vec()) {
            self.drag.release();
            self.frame_picker = None;
            self.composition.restore_paintings(previous);
            log::info!("Undo");
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.history.redo(self.composition.paintings().to_vec()) {
            self.drag.release();
            self.frame_picker = None;
            self.composition.restore_paintings(next);
            log::info!("Redo");
        }
    }

    /// Clear the wall, the paintings and the current project id.
    fn reset(&mut self) {
        self.drag.release();
        self.frame_picker = None;
        self.composition.reset();
        self.history.clear();
        self.textures.clear_scene();
        self.current_project_id = None;
        self.current_created_at = None;
        self.panel.name.clear();
        self.changing_wall = false;
        self.abandon_save();
        log::info!("Started a new project");
    }

    /// Forget a running save so its result cannot rebind the project now
    /// being edited. The worker still finishes writing its own record.
    fn abandon_save(&mut self) {
        if let Some(task) = self.tasks.save.take() {
            log::info!("Project changed while \"{}\" was running; its result is ignored", task.label());
        }
    }

    // ---- Projects ----

    fn save_project(&mut self) {
        if self.composition.wall().is_none() {
            self.show_error("Set up a wall before saving");
            return;
        }
        if self.panel.name.trim().is_empty() {
            self.panel.name = default_project_name();
        }

        let name = self.panel.name.trim().to_string();
        let id = self.current_project_id.clone();
        let created_at = self.current_created_at;
        let wall = self.composition.wall().cloned();
        let paintings = self.composition.paintings().to_vec();
        let quality = self.config.encoding.jpeg_quality;
        let store = Arc::clone(&self.store);

        if self.tasks.save.is_some() {
            log::warn!("Retrying save of \"{}\"; the earlier attempt is abandoned", name);
        }
        // Replacing the slot drops the receiver of a stalled attempt
        self.tasks.save = Some(BackgroundTask::spawn("save project", move || {
            let mut project = serialization::serialize(&name, wall.as_ref(), &paintings, quality)
                .context("Failed to embed images")?;
            project.id = id;
            if let Some(created_at) = created_at {
                project.created_at = created_at;
            }
            Ok(store.save(&project)?)
        }));
    }

    fn refresh_projects(&mut self) {
        let store = Arc::clone(&self.store);
        self.tasks.list = Some(BackgroundTask::spawn("list projects", move || Ok(store.list()?)));
    }

    fn load_project(&mut self, id: String) {
        let store = Arc::clone(&self.store);
        let task = BackgroundTask::spawn("open project", move || {
            let project = store
                .get(&id)
                .with_context(|| format!("Failed to read project {}", id))?
                .ok_or_else(|| anyhow::anyhow!("Project not found"))?;
            open_project(project)
        });
        self.tasks.open = Some((OpenSource::Store, task));
    }

    fn delete_project(&mut self, id: String, name: &str) {
        if !confirm("Delete project", &format!("Delete \"{}\"? This cannot be undone.", name)) {
            return;
        }
        let store = Arc::clone(&self.store);
        self.tasks.delete = Some(BackgroundTask::spawn("delete project", move || {
            store.delete(&id)?;
            Ok(id)
        }));
    }

    fn new_project(&mut self) {
        if self.composition.wall().is_some()
            && !confirm("New project", "Start a new project? Unsaved changes will be lost.")
        {
            return;
        }
        self.reset();
    }

    fn export_project(&mut self) {
        if self.composition.wall().is_none() {
            self.show_error("Set up a wall before exporting");
            return;
        }
        let file_name =
            serialization::default_file_name(&self.panel.name, &self.config.storage.file_extension);
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Wall Mockup", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        let name = export_name(&self.panel.name);
        let wall = self.composition.wall().cloned();
        let paintings = self.composition.paintings().to_vec();
        let quality = self.config.encoding.jpeg_quality;
        self.tasks.export = Some(BackgroundTask::spawn("export project", move || {
            let project = serialization::serialize(&name, wall.as_ref(), &paintings, quality)?;
            serialization::export_file(&project, &path)?;
            Ok(path)
        }));
    }

    fn import_project(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Wall Mockup", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .pick_file()
        else {
            return;
        };
        self.start_import(path);
    }

    /// Read a project file in the background; it replaces the live state
    /// only once it has been fully validated.
    fn start_import(&mut self, path: PathBuf) {
        let task = BackgroundTask::spawn("import project", move || {
            let project = serialization::import_file(&path)
                .with_context(|| format!("Cannot import {}", path.display()))?;
            open_project(project)
        });
        self.tasks.open = Some((OpenSource::File, task));
    }

    /// Replace the live state with an opened project.
    fn apply_opened(&mut self, ctx: &egui::Context, source: OpenSource, opened: OpenedProject) {
        let OpenedProject {
            project,
            scene,
            wall_pixels,
            painting_pixels,
        } = opened;

        self.abandon_save();
        self.drag.release();
        self.frame_picker = None;
        self.changing_wall = false;
        self.textures.clear_scene();
        if let Some(pixels) = &wall_pixels {
            self.textures.insert(ctx, TextureKey::Wall, pixels);
        }
        for (id, pixels) in &painting_pixels {
            self.textures.insert(ctx, TextureKey::Painting(*id), pixels);
        }

        self.composition.load(scene);
        self.history.clear();
        self.fit_pending = true;

        match source {
            OpenSource::Store => {
                self.current_project_id = project.id.clone();
                self.current_created_at = Some(project.created_at);
                self.panel.name = project.name.clone();
                self.panel.show_list = false;
                self.show_success(format!("Loaded \"{}\"", project.name));
            }
            OpenSource::File => {
                self.current_project_id = None;
                self.current_created_at = None;
                self.panel.name = imported_name(&project.name);
                self.show_success(format!("Imported \"{}\"", self.panel.name));
            }
        }
    }

    /// Collect finished background work.
    fn poll_tasks(&mut self, ctx: &egui::Context) {
        if let Some(result) = poll_slot(&mut self.tasks.wall_image) {
            self.wall_form.loading = false;
            match result {
                Ok(loaded) => {
                    self.textures.insert(ctx, TextureKey::WallPreview, &loaded.decoded);
                    self.wall_form.image = Some(loaded);
                }
                Err(e) => self.show_error(format!("Failed to load image: {:#}", e)),
            }
        }

        if let Some(result) = poll_slot(&mut self.tasks.painting_image) {
            self.painting_form.loading = false;
            match result {
                Ok(loaded) => {
                    self.textures.insert(ctx, TextureKey::PaintingPreview, &loaded.decoded);
                    self.painting_form.image = Some(loaded);
                }
                Err(e) => self.show_error(format!("Failed to load image: {:#}", e)),
            }
        }

        if let Some(result) = poll_slot(&mut self.tasks.save) {
            match result {
                Ok(saved) => {
                    self.current_project_id = saved.id.clone();
                    self.current_created_at = Some(saved.created_at);
                    self.show_success("Project saved");
                    if self.panel.show_list {
                        self.refresh_projects();
                    }
                }
                Err(e) => self.show_error(format!("Failed to save project: {:#}", e)),
            }
        }

        if let Some(result) = poll_slot(&mut self.tasks.list) {
            match result {
                Ok(projects) => self.projects = projects,
                Err(e) => self.show_error(format!("Failed to load projects: {:#}", e)),
            }
        }

        let opened = match self.tasks.open.as_mut() {
            Some((source, task)) => task.poll().map(|result| (*source, result)),
            None => None,
        };
        if let Some((source, result)) = opened {
            self.tasks.open = None;
            match result {
                Ok(opened) => self.apply_opened(ctx, source, opened),
                Err(e) => {
                    let invalid = e
                        .downcast_ref::<ProjectError>()
                        .is_some_and(ProjectError::is_invalid_input);
                    let text = match (source, invalid) {
                        (OpenSource::File, true) => format!("Invalid project file: {:#}", e),
                        (OpenSource::File, false) => format!("Failed to import project: {:#}", e),
                        (OpenSource::Store, _) => format!("Failed to load project: {:#}", e),
                    };
                    self.show_error(text);
                }
            }
        }

        if let Some(result) = poll_slot(&mut self.tasks.delete) {
            match result {
                Ok(id) => {
                    if self.current_project_id.as_deref() == Some(id.as_str()) {
                        self.current_project_id = None;
                        self.current_created_at = None;
                    }
                    self.projects.retain(|p| p.id != id);
                    self.show_success("Project deleted");
                    self.refresh_projects();
                }
                Err(e) => self.show_error(format!("Failed to delete project: {:#}", e)),
            }
        }

        if let Some(result) = poll_slot(&mut self.tasks.export) {
            match result {
                Ok(path) => self.show_success(format!("Exported to {}", path.display())),
                Err(e) => self.show_error(format!("Failed to export project: {:#}", e)),
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.frame_picker = None;
            self.changing_wall = false;
            self.drag.release();
        }

        // Text fields keep their own undo
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.undo();
        }
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.redo();
        }
    }

    fn handle_canvas(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::Press {
                painting,
                button,
                pointer,
                painting_top_left,
            } => {
                let before = self.composition.paintings().to_vec();
                if self.drag.press(painting, button, pointer, painting_top_left) == DragStart::Started {
                    self.history.push(before);
                    self.frame_picker = None;
                }
            }
            CanvasAction::Drag {
                pointer,
                wall_origin,
                container,
                painting_size,
            } => {
                if let Some(step) = self.drag.move_to(pointer, wall_origin, container, painting_size) {
                    if !self.composition.update_position(step.painting, step.position) {
                        self.drag.forget(step.painting);
                    }
                }
            }
            CanvasAction::Release => {
                self.drag.release();
            }
            CanvasAction::Remove(id) => self.remove_painting(id),
            CanvasAction::ToggleFramePicker(id) => {
                self.frame_picker = if self.frame_picker == Some(id) { None } else { Some(id) };
            }
            CanvasAction::SelectFrame(id, style) => {
                let changed = self
                    .composition
                    .painting(id)
                    .is_some_and(|p| p.frame_style != style);
                if changed {
                    self.remember_paintings();
                    self.composition.update_frame_style(id, style);
                }
                self.frame_picker = None;
            }
            CanvasAction::None => {}
        }
    }

    /// Make sure every visible image has a texture, e.g. after undo
    /// brings back a removed painting.
    fn ensure_textures(&mut self, ctx: &egui::Context) {
        if let Some(wall) = self.composition.wall() {
            self.textures.ensure(ctx, TextureKey::Wall, &wall.image);
        }
        for painting in self.composition.paintings() {
            self.textures.ensure(ctx, TextureKey::Painting(painting.id), &painting.image);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) -> MenuAction {
        let mut action = MenuAction::None;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project").clicked() {
                        action = MenuAction::NewProject;
                        ui.close_menu();
                    }
                    if ui.button("Import Project...").clicked() {
                        action = MenuAction::Import;
                        ui.close_menu();
                    }
                    let has_wall = self.composition.wall().is_some();
                    if ui.add_enabled(has_wall, egui::Button::new("Export Project...")).clicked() {
                        action = MenuAction::Export;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.history.can_undo();
                    if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        action = MenuAction::Undo;
                        ui.close_menu();
                    }
                    let can_redo = self.history.can_redo();
                    if ui.add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)")).clicked() {
                        action = MenuAction::Redo;
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    let has_wall = self.composition.wall().is_some();
                    if ui.add_enabled(has_wall, egui::Button::new("Zoom In")).clicked() {
                        self.zoom.zoom_in();
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_wall, egui::Button::new("Zoom Out")).clicked() {
                        self.zoom.zoom_out();
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_wall, egui::Button::new("Fit to Screen")).clicked() {
                        self.zoom.reset_to_fit();
                        ui.close_menu();
                    }
                });
            });
        });

        action
    }

    /// Refit the wall when it changed or the canvas was resized.
    fn update_fit(&mut self, ui: &egui::Ui, ctx: &egui::Context) {
        let Some(wall) = self.composition.wall() else {
            return;
        };
        let canvas = ui.available_size();
        let resized = self
            .last_canvas_size
            .is_some_and(|last| (last - canvas).length() > 1.0);
        if !self.fit_pending && !resized {
            return;
        }

        let window_height = ctx.screen_rect().height() as f64;
        self.zoom
            .fit(wall.image_size(), canvas.x as f64, window_height, &self.config.zoom);
        self.last_canvas_size = Some(canvas);
        self.fit_pending = false;
        log::debug!("Fit scale {}", self.zoom.percent_label());
    }
}

impl eframe::App for WallMockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_tasks(ctx);
        self.ensure_textures(ctx);

        let message_lifetime = Duration::from_secs_f32(self.config.message_secs);
        if self.message.as_ref().is_some_and(|m| m.is_expired(message_lifetime)) {
            self.message = None;
        }

        // Keep polling while work is in flight
        if self.tasks.any_pending() {
            ctx.request_repaint();
        } else if self.message.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        match self.menu_bar(ctx) {
            MenuAction::NewProject => self.new_project(),
            MenuAction::Import => self.import_project(),
            MenuAction::Export => self.export_project(),
            MenuAction::Undo => self.undo(),
            MenuAction::Redo => self.redo(),
            MenuAction::None => {}
        }

        self.handle_keyboard(ctx);

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let wall_label = self.composition.wall().map(Wall::dimensions_label);
            toolbar::show(ui, &mut self.zoom, wall_label.as_deref());
        });

        // Project manager (right side)
        let save_status = self.save_status();
        let project_action = egui::SidePanel::right("project_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                let view = PanelView {
                    projects: &self.projects,
                    current_id: self.current_project_id.as_deref(),
                    has_wall: self.composition.wall().is_some(),
                    save_status,
                    listing: self.tasks.list.is_some(),
                    message: self.message.as_ref(),
                };
                project_panel::show(ui, &mut self.panel, view)
            })
            .inner;

        match project_action {
            ProjectAction::Save => self.save_project(),
            ProjectAction::ToggleList => {
                self.panel.show_list = !self.panel.show_list;
                if self.panel.show_list {
                    self.refresh_projects();
                }
            }
            ProjectAction::Load(id) => self.load_project(id),
            ProjectAction::Delete { id, name } => self.delete_project(id, &name),
            ProjectAction::Export => self.export_project(),
            ProjectAction::Import => self.import_project(),
            ProjectAction::NewProject => self.new_project(),
            ProjectAction::None => {}
        }

        // Wall and painting forms (left side)
        let sidebar_action = egui::SidePanel::left("sidebar")
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        let wall = if self.changing_wall {
                            None
                        } else {
                            self.composition.wall()
                        };
                        sidebar::show(
                            ui,
                            wall,
                            self.composition.paintings(),
                            &mut self.wall_form,
                            &mut self.painting_form,
                            &self.textures,
                        )
                    })
                    .inner
            })
            .inner;

        match sidebar_action {
            SidebarAction::PickWallImage => self.pick_image(true),
            SidebarAction::SetWall => self.set_wall(ctx),
            SidebarAction::ChangeWall => self.changing_wall = true,
            SidebarAction::PickPaintingImage => self.pick_image(false),
            SidebarAction::AddPainting => self.add_painting(ctx),
            SidebarAction::RemovePainting(id) => self.remove_painting(id),
            SidebarAction::None => {}
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if self.tasks.open.is_some() {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new("Loading project...")
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    return CanvasAction::None;
                }

                self.update_fit(ui, ctx);
                let layout = self.composition.layout(&self.zoom);
                canvas::show(
                    ui,
                    layout.as_ref(),
                    &self.textures,
                    self.drag.active(),
                    self.frame_picker,
                )
            })
            .inner;

        self.handle_canvas(canvas_action);
    }
}
