// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns the process-wide session, the image
//! sequence and the document for the current image, and routes UI input to
//! the interaction controller and the annotation store.

use crate::config::Settings;
use crate::controller::{
    handle_wheel, Controller, InteractionState, PressOutcome, ReleaseOutcome, View, WheelOutcome,
};
use crate::i18n::{self, Strings};
use crate::io::{label_file, media};
use crate::models::{
    annotation::normalize_label, project::Project, session::Session, store::AnnotationStore,
};
use crate::ui::{
    annotation_list::{self, ListAction, ListSelection},
    canvas::{self, CanvasContent, CanvasEvent},
    label_dialog::{self, LabelPrompt, LabelTarget, PromptResult},
    toolbar::{self, ToolbarAction, ToolbarStatus},
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// The image currently on screen and its boxes.
struct Document {
    texture: egui::TextureHandle,
    store: AnnotationStore,
}

/// Main application state.
pub struct BoxLabelApp {
    settings: Settings,
    settings_path: PathBuf,
    strings: &'static Strings,

    /// Sticky label and color cursor; lives as long as the process
    session: Session,

    /// Opened images and navigation cursor
    project: Project,

    /// Loaded image, if any
    document: Option<Document>,

    controller: Controller,
    view: View,
    /// Fit the view to the canvas on the next frame
    fit_pending: bool,

    selection: ListSelection,
    prompt: Option<LabelPrompt>,

    /// Recoverable error shown in the status bar
    notification: Option<String>,
}

impl BoxLabelApp {
    /// Create a new application instance.
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        let strings = i18n::strings_for(&settings.language);
        Self {
            settings,
            settings_path,
            strings,
            session: Session::new(),
            project: Project::default(),
            document: None,
            controller: Controller::new(),
            view: View::default(),
            fit_pending: false,
            selection: ListSelection::default(),
            prompt: None,
            notification: None,
        }
    }

    fn notify(&mut self, headline: &str, error: anyhow::Error) {
        log::error!("{}: {:#}", headline, error);
        self.notification = Some(format!("{}: {:#}", headline, error));
    }

    /// Ask for images and show the first one.
    fn open_images(&mut self, ctx: &egui::Context) {
        let extensions: Vec<&str> = self
            .settings
            .image_extensions
            .iter()
            .map(String::as_str)
            .collect();
        let Some(paths) = rfd::FileDialog::new()
            .add_filter(self.strings.image_filter, &extensions)
            .pick_files()
        else {
            return;
        };

        let project = Project::new(paths);
        let Some(first) = project.current_image().map(Path::to_path_buf) else {
            return;
        };
        match self.load_document(ctx, &first) {
            Ok(document) => {
                log::info!("Opened {} images", project.len());
                self.project = project;
                self.activate(ctx, document);
            }
            Err(e) => self.notify(self.strings.load_failed, e),
        }
    }

    /// Switch to the image at `index`. On failure nothing changes.
    fn go_to(&mut self, ctx: &egui::Context, index: usize) {
        let Some(path) = self.project.image(index).map(Path::to_path_buf) else {
            return;
        };
        match self.load_document(ctx, &path) {
            Ok(document) => {
                self.project.select(index);
                self.activate(ctx, document);
            }
            Err(e) => self.notify(self.strings.load_failed, e),
        }
    }

    /// Decode an image and build its store from the sibling label file.
    fn load_document(&mut self, ctx: &egui::Context, path: &Path) -> Result<Document> {
        let image = media::load_image(path)?;
        let store = AnnotationStore::load_from(
            &label_file::label_path_for(path),
            image.width,
            image.height,
            &mut self.session,
        )?;

        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.pixels,
        );
        let texture = ctx.load_texture(
            path.to_string_lossy(),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        log::info!(
            "Loaded image: {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(Document { texture, store })
    }

    /// Make `document` current, dropping everything tied to the previous one.
    fn activate(&mut self, ctx: &egui::Context, document: Document) {
        let skipped = document.store.skipped_lines().len();
        self.notification = match document.store.sync_warning() {
            Some(warning) => Some(format!("{}: {}", self.strings.save_failed, warning)),
            None => (skipped > 0).then(|| format!("{} {}", skipped, self.strings.lines_skipped)),
        };
        self.document = Some(document);
        self.controller.reset();
        self.selection.clear();
        self.prompt = None;
        self.fit_pending = true;
        self.update_title(ctx);
    }

    fn update_title(&self, ctx: &egui::Context) {
        if let Some(title) = self.project.title(self.strings.title_pattern) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }
    }

    fn set_language(&mut self, ctx: &egui::Context, code: &str) {
        self.strings = i18n::strings_for(code);
        self.settings.language = self.strings.code.to_string();
        if let Err(e) = self.settings.save(&self.settings_path) {
            log::warn!("Could not save settings: {:#}", e);
        }
        self.update_title(ctx);
    }

    fn handle_canvas_event(&mut self, event: CanvasEvent) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        let store = &mut document.store;

        let result = match event {
            CanvasEvent::Press(point) => {
                match self.controller.press(point, store, &mut self.session) {
                    PressOutcome::Selected(index)
                    | PressOutcome::StartedResize { index, .. } => {
                        self.selection.select_only(index)
                    }
                    PressOutcome::StartedDrawing | PressOutcome::Ignored => {}
                }
                Ok(())
            }
            CanvasEvent::Drag(point) => {
                self.controller.drag_to(point, store);
                Ok(())
            }
            CanvasEvent::Release(point) => self
                .controller
                .release(point, store, &mut self.session)
                .map(|outcome| {
                    if let ReleaseOutcome::Committed { index } = outcome {
                        self.selection.select_only(index);
                    }
                }),
            CanvasEvent::Wheel {
                notch,
                zoom_modifier,
                anchor,
                scroll,
            } => {
                if handle_wheel(&mut self.view, notch, zoom_modifier, anchor)
                    == WheelOutcome::PassThrough
                {
                    self.view.pan(scroll.0, scroll.1);
                }
                Ok(())
            }
            CanvasEvent::Pan(dx, dy) => {
                self.view.pan(dx, dy);
                Ok(())
            }
        };

        if let Err(e) = result {
            self.notify(self.strings.save_failed, e);
        }
    }

    fn apply_label(&mut self, target: LabelTarget, raw: &str) {
        let label = normalize_label(raw);
        let Some(document) = self.document.as_mut() else {
            return;
        };
        let result = match target {
            LabelTarget::Edit(index) => document.store.update(index, &label, &mut self.session),
            LabelTarget::Selected(indices) => {
                document
                    .store
                    .batch_update(&indices, &label, &mut self.session)
            }
        };
        if let Err(e) = result {
            self.notify(self.strings.save_failed, e);
        }
    }

    fn delete_selected(&mut self) {
        let indices = self.selection.indices();
        let Some(document) = self.document.as_mut() else {
            return;
        };
        if indices.is_empty() {
            return;
        }
        let result = document.store.remove(&indices);
        self.selection.clear();
        // Rows were renumbered; a pending prompt would target the wrong box.
        self.prompt = None;
        if let Err(e) = result {
            self.notify(self.strings.save_failed, e);
        }
    }

    /// Store membership only changes between pointer interactions.
    fn is_idle(&self) -> bool {
        *self.controller.state() == InteractionState::Idle
    }

    /// List actions wait while a pointer interaction or a prompt is open.
    fn handle_list_action(&mut self, action: ListAction) {
        if !self.is_idle() || self.prompt.is_some() {
            return;
        }
        match action {
            ListAction::EditLabel(index) => {
                let current = self
                    .document
                    .as_ref()
                    .and_then(|d| d.store.get(index))
                    .map(|a| a.label.clone())
                    .unwrap_or_default();
                self.prompt = Some(LabelPrompt::new(LabelTarget::Edit(index), current));
            }
            ListAction::AssignLabelToSelected => {
                self.prompt = Some(LabelPrompt::new(
                    LabelTarget::Selected(self.selection.indices()),
                    "",
                ));
            }
            ListAction::DeleteSelected => self.delete_selected(),
            ListAction::None => {}
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if self.prompt.is_some() || ctx.wants_keyboard_input() {
            return;
        }
        // A focused button also takes Space as a click.
        let space_free = ctx.memory(|m| m.focused()).is_none();
        let (next, previous, delete) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowRight)
                    || (space_free && i.key_pressed(egui::Key::Space)),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::Delete),
            )
        });

        if next {
            if let Some(index) = self.project.next_index() {
                self.go_to(ctx, index);
            }
        } else if previous {
            if let Some(index) = self.project.previous_index() {
                self.go_to(ctx, index);
            }
        } else if delete && self.is_idle() {
            self.delete_selected();
        }
    }
}

impl eframe::App for BoxLabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let strings = self.strings;

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button(strings.menu_file, |ui| {
                    if ui.button(strings.open_images).clicked() {
                        ui.close_menu();
                        self.open_images(ctx);
                    }
                    ui.separator();
                    if ui.button(strings.quit).clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button(strings.menu_view, |ui| {
                    if ui.button(strings.reset_zoom).clicked() {
                        self.fit_pending = true;
                        ui.close_menu();
                    }
                    ui.menu_button(strings.menu_language, |ui| {
                        for language in i18n::LANGUAGES {
                            let current = language.code == strings.code;
                            if ui.selectable_label(current, language.language_name).clicked() {
                                self.set_language(ctx, language.code);
                                ui.close_menu();
                            }
                        }
                    });
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let status = ToolbarStatus {
                    position: (!self.project.is_empty())
                        .then(|| (self.project.current_index() + 1, self.project.len())),
                    sticky_label: self.session.sticky_label(),
                };
                toolbar::show(ui, &status, strings)
            })
            .inner;
        match toolbar_action {
            ToolbarAction::OpenImages => self.open_images(ctx),
            ToolbarAction::Previous => {
                if let Some(index) = self.project.previous_index() {
                    self.go_to(ctx, index);
                }
            }
            ToolbarAction::Next => {
                if let Some(index) = self.project.next_index() {
                    self.go_to(ctx, index);
                }
            }
            ToolbarAction::None => {}
        }

        // Status bar with the latest notification
        if self.notification.is_some() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(message) = &self.notification {
                        ui.colored_label(egui::Color32::from_rgb(0xf0, 0x80, 0x60), message);
                    }
                    if ui.button(strings.dismiss).clicked() {
                        self.notification = None;
                    }
                });
            });
        }

        // Annotation list (right side)
        let list_action = egui::SidePanel::right("annotations")
            .default_width(360.0)
            .show(ctx, |ui| {
                let annotations = self
                    .document
                    .as_ref()
                    .map(|d| d.store.annotations())
                    .unwrap_or_default();
                annotation_list::show(ui, annotations, &mut self.selection, strings)
            })
            .inner;
        self.handle_list_action(list_action);

        self.handle_keyboard(ctx);

        // Main canvas (center)
        let events = egui::CentralPanel::default()
            .frame(egui::Frame::canvas(&ctx.style()))
            .show(ctx, |ui| match &self.document {
                Some(document) => {
                    let content = CanvasContent {
                        texture: &document.texture,
                        image_size: document.store.image_size(),
                        annotations: document.store.annotations(),
                        draft: self.controller.draft(),
                        selected: &self.selection.rows,
                    };
                    canvas::show(ui, &content, &mut self.view, &mut self.fit_pending)
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new(strings.no_image)
                                .size(16.0)
                                .color(egui::Color32::from_gray(180)),
                        );
                    });
                    Vec::new()
                }
            })
            .inner;
        if self.prompt.is_none() {
            for event in events {
                self.handle_canvas_event(event);
            }
        }

        // Label prompt
        if let Some(prompt) = self.prompt.as_mut() {
            match label_dialog::show(ctx, prompt, strings) {
                PromptResult::Pending => {}
                PromptResult::Cancelled => self.prompt = None,
                PromptResult::Confirmed(text) => {
                    if let Some(prompt) = self.prompt.take() {
                        self.apply_label(prompt.target, &text);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Annotation, Rect};
    use tempfile::TempDir;

    fn app_with_boxes(dir: &TempDir, labels: &[&str]) -> BoxLabelApp {
        let mut app = BoxLabelApp::new(Settings::default(), dir.path().join("boxlabel.yaml"));
        let mut store = AnnotationStore::new(dir.path().join("img.txt"), 800, 600);
        for (i, label) in labels.iter().enumerate() {
            let left = 10.0 + 60.0 * i as f64;
            let ann = Annotation::new(Rect::new(left, 10.0, 50.0, 50.0), *label, i);
            store.add(ann, &mut app.session).unwrap();
        }
        let ctx = egui::Context::default();
        let texture = ctx.load_texture(
            "img",
            egui::ColorImage::new([2, 2], egui::Color32::BLACK),
            egui::TextureOptions::LINEAR,
        );
        app.document = Some(Document { texture, store });
        app
    }

    fn labels(app: &BoxLabelApp) -> Vec<String> {
        app.document
            .as_ref()
            .map(|d| d.store.annotations().iter().map(|a| a.label.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_list_delete_waits_while_prompt_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_boxes(&dir, &["a", "b", "c", "d", "e"]);

        app.handle_list_action(ListAction::EditLabel(3));
        app.selection.select_only(0);
        app.handle_list_action(ListAction::DeleteSelected);
        assert_eq!(labels(&app).len(), 5);

        let prompt = app.prompt.take().unwrap();
        assert_eq!(prompt.target, LabelTarget::Edit(3));
        app.apply_label(prompt.target, "dog");
        assert_eq!(labels(&app), ["a", "b", "c", "dog", "e"]);
    }

    fn press_space(app: &mut BoxLabelApp, focus: Option<egui::Id>) {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Space,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::default(),
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            if let Some(id) = focus {
                ctx.memory_mut(|m| m.request_focus(id));
            }
            app.handle_keyboard(ctx);
        });
    }

    #[test]
    fn test_space_skipped_while_widget_focused() {
        let dir = tempfile::tempdir().unwrap();
        let images = ["a.png", "b.png", "c.png"].map(|n| dir.path().join(n));

        let mut app = app_with_boxes(&dir, &[]);
        app.project = Project::new(images.to_vec());
        press_space(&mut app, Some(egui::Id::new("next_button")));
        assert!(app.notification.is_none());

        // Unfocused Space tries to open the (unreadable) next image.
        press_space(&mut app, None);
        assert!(app.notification.is_some());
        assert_eq!(app.project.current_index(), 0);
    }

    #[test]
    fn test_delete_drops_pending_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_boxes(&dir, &["a", "b", "c", "d", "e"]);

        app.prompt = Some(LabelPrompt::new(LabelTarget::Edit(3), "d"));
        app.selection.select_only(0);
        app.delete_selected();
        assert!(app.prompt.is_none());
        assert_eq!(labels(&app), ["b", "c", "d", "e"]);
    }
}
