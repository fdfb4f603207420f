//! The Mapmark application shell.
//!
//! Owns the document, the interaction controller and the decode channel;
//! every state transition happens inside `update`, so the single egui
//! thread serializes all mutation.

use crate::decode::{DecodeOutcome, DecodedImage, Decoder};
use crate::render;
use crate::ui::{self, EditorForm, PopupAction, ToolbarAction};
use egui::{ColorImage, TextureHandle, TextureOptions};
use kurbo::{Point, Size};
use mapmark_core::encoding;
use mapmark_core::{
    Background, InteractionController, MapDocument, MouseButton, POPUP_SIZE, PointerEvent,
    PopupContent, popup,
};
use std::collections::{HashMap, HashSet};

pub struct MapmarkApp {
    document: MapDocument,
    controller: InteractionController,
    decoder: Decoder,

    background_texture: Option<TextureHandle>,
    /// Marker image textures keyed by their data URI.
    marker_textures: HashMap<String, TextureHandle>,
    /// Payloads with a decode in flight or already failed, so a visible
    /// viewer does not re-request them every frame.
    requested_marker_decodes: HashSet<String>,

    editor_form: Option<EditorForm>,
    /// Current failure notification, shown as a blocking modal.
    error: Option<String>,
}

impl MapmarkApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            document: MapDocument::new(),
            controller: InteractionController::new(),
            decoder: Decoder::new(),
            background_texture: None,
            marker_textures: HashMap::new(),
            requested_marker_decodes: HashSet::new(),
            editor_form: None,
            error: None,
        }
    }

    /// Apply decode completions against current document state.
    fn drain_decodes(&mut self, ctx: &egui::Context) {
        for outcome in self.decoder.poll() {
            match outcome {
                DecodeOutcome::Background(Ok(image)) => {
                    log::info!("background decoded: {}x{}", image.width, image.height);
                    self.background_texture = Some(load_texture(ctx, "background", &image));
                    self.document.set_background(Background {
                        width: image.width,
                        height: image.height,
                        data: image.data_uri,
                    });
                }
                DecodeOutcome::Background(Err(e)) => {
                    log::warn!("background decode failed: {e}");
                    self.error = Some(format!("Failed to decode background image: {e}"));
                }
                DecodeOutcome::MarkerImage { data_uri, result } => match result {
                    Ok(image) => {
                        let texture = load_texture(ctx, "marker_image", &image);
                        self.marker_textures.insert(data_uri, texture);
                    }
                    Err(e) => {
                        // The URI stays in `requested_marker_decodes`,
                        // which suppresses an endless retry loop.
                        log::warn!("marker image decode failed: {e}");
                        self.error = Some(format!("Failed to decode marker image: {e}"));
                    }
                },
            }
        }
    }

    fn apply_toolbar_action(&mut self, ctx: &egui::Context, action: ToolbarAction) {
        match action {
            ToolbarAction::ToggleMode => {
                self.controller.toggle_mode();
                self.editor_form = None;
            }
            ToolbarAction::ImportBackground => self.import_background(ctx),
            ToolbarAction::Save => self.save_document(),
            ToolbarAction::Load => self.load_document(ctx),
        }
    }

    fn import_background(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "webp"])
            .pick_file()
        else {
            return;
        };

        match read_image_as_data_uri(&path) {
            Ok(data_uri) => {
                log::info!("importing background from {}", path.display());
                self.decoder.decode_background(ctx, data_uri);
            }
            Err(e) => self.error = Some(format!("Failed to import background: {e}")),
        }
    }

    fn save_document(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Map document", &["json"])
            .set_file_name("worldmap.json")
            .save_file()
        else {
            return;
        };

        let result = self
            .document
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => log::info!("saved document to {}", path.display()),
            Err(e) => self.error = Some(format!("Failed to save map data: {e}")),
        }
    }

    fn load_document(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Map document", &["json"])
            .pick_file()
        else {
            return;
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                self.error = Some(format!("Failed to load map data: {e}"));
                return;
            }
        };

        // A parse failure leaves the in-memory document untouched.
        match MapDocument::from_json(&text) {
            Ok(parsed) => {
                log::info!(
                    "loaded {} markers from {}",
                    parsed.markers.len(),
                    path.display()
                );
                self.document.replace_markers(parsed.markers);
                self.controller.reset();
                self.editor_form = None;
                // The embedded background decodes asynchronously; a
                // document without one keeps the current background.
                if let Some(data_uri) = parsed.background_image {
                    self.decoder.decode_background(ctx, data_uri);
                }
            }
            Err(e) => self.error = Some(format!("Failed to load map data: {e}")),
        }
    }

    /// Translate canvas interactions into pointer events.
    ///
    /// egui reports clicks on release; the controller's dispatch table
    /// treats them as the pointer-down gestures they stand for. Painted
    /// widgets get no native context menu, so right-click is free for the
    /// delete gesture.
    fn handle_canvas_input(&mut self, response: &egui::Response, rect: egui::Rect) {
        let to_canvas =
            |pos: egui::Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);

        if let Some(pos) = response.interact_pointer_pos() {
            let position = to_canvas(pos);

            if response.clicked_by(egui::PointerButton::Primary) {
                self.controller.handle_pointer_event(
                    &mut self.document,
                    PointerEvent::Down {
                        position,
                        button: MouseButton::Left,
                    },
                );
            }
            if response.secondary_clicked() {
                self.controller.handle_pointer_event(
                    &mut self.document,
                    PointerEvent::Down {
                        position,
                        button: MouseButton::Right,
                    },
                );
            }
            if response.drag_started_by(egui::PointerButton::Middle) {
                self.controller.handle_pointer_event(
                    &mut self.document,
                    PointerEvent::Down {
                        position,
                        button: MouseButton::Middle,
                    },
                );
            }
            if response.dragged_by(egui::PointerButton::Middle) {
                self.controller
                    .handle_pointer_event(&mut self.document, PointerEvent::Move { position });
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Middle) {
            let position = response
                .interact_pointer_pos()
                .map(to_canvas)
                .unwrap_or(Point::ZERO);
            self.controller.handle_pointer_event(
                &mut self.document,
                PointerEvent::Up {
                    position,
                    button: MouseButton::Middle,
                },
            );
        }
    }

    /// Keep the editor form seeded from the selected marker, and drop it
    /// whenever no editor popup is open.
    fn sync_editor_form(&mut self) {
        match (self.controller.popup(), self.controller.selection()) {
            (Some(state), Some(index)) if state.content == PopupContent::Editor => {
                let stale = self
                    .editor_form
                    .as_ref()
                    .is_none_or(|form| form.marker != index);
                if stale {
                    if let Some(marker) = self.document.marker(index) {
                        self.editor_form = Some(EditorForm::seeded_from(index, marker));
                    }
                }
            }
            _ => self.editor_form = None,
        }
    }

    fn show_popup(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let (Some(state), Some(index)) = (self.controller.popup(), self.controller.selection())
        else {
            return;
        };
        let Some(marker) = self.document.marker(index).cloned() else {
            return;
        };

        // Viewer images decode lazily, once per payload.
        if state.content == PopupContent::Viewer
            && !marker.image.is_empty()
            && !self.marker_textures.contains_key(&marker.image)
            && self.requested_marker_decodes.insert(marker.image.clone())
        {
            self.decoder.decode_marker_image(ctx, marker.image.clone());
        }

        let canvas = Size::new(canvas_rect.width() as f64, canvas_rect.height() as f64);
        let origin = popup::position_for(state.anchor, canvas, POPUP_SIZE);
        let screen = canvas_rect.min + egui::vec2(origin.x as f32, origin.y as f32);

        let action = ui::popup(
            ctx,
            screen,
            state.content,
            &marker,
            self.editor_form.as_mut(),
            self.marker_textures.get(&marker.image),
        );

        match action {
            Some(PopupAction::Close) => {
                self.controller.close_popup();
                self.editor_form = None;
            }
            Some(PopupAction::PickImage) => self.pick_marker_image(),
            Some(PopupAction::Commit) => {
                if let Some(form) = self.editor_form.take() {
                    self.controller.commit_editor(
                        &mut self.document,
                        &form.title,
                        &form.description,
                        form.new_image,
                    );
                }
            }
            None => {}
        }
    }

    fn pick_marker_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "webp"])
            .pick_file()
        else {
            return;
        };

        match read_image_as_data_uri(&path) {
            Ok(data_uri) => {
                if let Some(form) = &mut self.editor_form {
                    form.new_image = Some(data_uri);
                }
            }
            Err(e) => self.error = Some(format!("Failed to import marker image: {e}")),
        }
    }
}

impl eframe::App for MapmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_decodes(ctx);

        if let Some(action) = ui::toolbar(ctx, self.controller.mode()) {
            self.apply_toolbar_action(ctx, action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            // The background, when present, fixes the canvas dimensions;
            // otherwise the canvas fits the container.
            let canvas_size = self
                .document
                .canvas_size()
                .map(|s| egui::vec2(s.width as f32, s.height as f32))
                .unwrap_or_else(|| ui.available_size());

            egui::ScrollArea::both().show(ui, |ui| {
                let (response, painter) =
                    ui.allocate_painter(canvas_size, egui::Sense::click_and_drag());
                let rect = response.rect;

                self.handle_canvas_input(&response, rect);
                self.sync_editor_form();

                render::paint_map(
                    &painter,
                    rect,
                    &self.document,
                    self.controller.mode(),
                    self.background_texture.as_ref(),
                );

                self.show_popup(ui.ctx(), rect);
            });
        });

        if let Some(message) = self.error.clone() {
            if ui::error_modal(ctx, &message) {
                self.error = None;
            }
        }
    }
}

fn load_texture(ctx: &egui::Context, name: &str, image: &DecodedImage) -> TextureHandle {
    let color = ColorImage::from_rgba_unmultiplied(
        [image.width as usize, image.height as usize],
        &image.rgba,
    );
    ctx.load_texture(name, color, TextureOptions::LINEAR)
}

fn read_image_as_data_uri(path: &std::path::Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    encoding::to_data_uri(&bytes).map_err(|e| e.to_string())
}
