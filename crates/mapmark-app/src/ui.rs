//! Toolbar, marker popup and error modal.
//!
//! Pure egui rendering; every user intent is returned as an action for
//! the app shell to apply, so no document state is touched from here.

use egui::{Context, Pos2, RichText, TextureHandle};
use mapmark_core::{Marker, Mode, POPUP_SIZE, PopupContent};

/// Window padding inside the popup frame.
const POPUP_PADDING: f32 = 10.0;

/// An intent raised by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    ToggleMode,
    ImportBackground,
    Save,
    Load,
}

/// An intent raised by the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    Close,
    /// Open a file dialog for a new marker image.
    PickImage,
    /// Commit the editor form into the selected marker.
    Commit,
}

/// Scratch state for the editor form, seeded from the selected marker
/// when the popup opens and committed only on explicit confirm.
#[derive(Debug, Clone)]
pub struct EditorForm {
    /// Index of the marker the form was seeded from.
    pub marker: usize,
    pub title: String,
    pub description: String,
    /// Newly chosen image payload; `None` leaves the existing one alone.
    pub new_image: Option<String>,
}

impl EditorForm {
    pub fn seeded_from(index: usize, marker: &Marker) -> Self {
        Self {
            marker: index,
            title: marker.title.clone(),
            description: marker.description.clone(),
            new_image: None,
        }
    }
}

/// Render the top toolbar and return the action clicked, if any.
pub fn toolbar(ctx: &Context, mode: Mode) -> Option<ToolbarAction> {
    let mut action = None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Mapmark");
            ui.separator();

            let mode_label = match mode {
                Mode::Edit => "Edit Mode",
                Mode::Read => "Read Mode",
            };
            if ui.button(mode_label).clicked() {
                action = Some(ToolbarAction::ToggleMode);
            }

            ui.separator();
            if ui.button("Import Background").clicked() {
                action = Some(ToolbarAction::ImportBackground);
            }
            if ui.button("Save").clicked() {
                action = Some(ToolbarAction::Save);
            }
            if ui.button("Load").clicked() {
                action = Some(ToolbarAction::Load);
            }
        });
    });

    action
}

/// Render the marker popup at `origin` (screen coordinates).
///
/// Exactly one of editor/viewer is shown, decided by `content`. The
/// editor needs `form`; the viewer ignores it.
pub fn popup(
    ctx: &Context,
    origin: Pos2,
    content: PopupContent,
    marker: &Marker,
    form: Option<&mut EditorForm>,
    marker_texture: Option<&TextureHandle>,
) -> Option<PopupAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("marker_popup"))
        .fixed_pos(origin)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::window(ui.style()).show(ui, |ui| {
                ui.set_width(POPUP_SIZE.width as f32 - 2.0 * POPUP_PADDING);
                ui.set_max_height(POPUP_SIZE.height as f32 - 2.0 * POPUP_PADDING);

                ui.horizontal(|ui| {
                    let header = match content {
                        PopupContent::Editor => "Edit Location",
                        PopupContent::Viewer => "Location",
                    };
                    ui.label(RichText::new(header).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("\u{2715}").clicked() {
                            action = Some(PopupAction::Close);
                        }
                    });
                });
                ui.separator();

                match content {
                    PopupContent::Editor => {
                        if let Some(form) = form {
                            if let Some(a) = editor_body(ui, form) {
                                action = Some(a);
                            }
                        }
                    }
                    PopupContent::Viewer => viewer_body(ui, marker, marker_texture),
                }
            });
        });

    action
}

fn editor_body(ui: &mut egui::Ui, form: &mut EditorForm) -> Option<PopupAction> {
    let mut action = None;

    ui.label("Title:");
    ui.text_edit_singleline(&mut form.title);

    ui.label("Description:");
    ui.add(
        egui::TextEdit::multiline(&mut form.description)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        if ui.button("Choose Image...").clicked() {
            action = Some(PopupAction::PickImage);
        }
        if form.new_image.is_some() {
            ui.label("new image selected");
        }
    });

    ui.separator();
    if ui.button("Update Location").clicked() {
        action = Some(PopupAction::Commit);
    }

    action
}

fn viewer_body(ui: &mut egui::Ui, marker: &Marker, texture: Option<&TextureHandle>) {
    ui.heading(&marker.title);

    // The image element is simply absent when the marker has none or the
    // decode has not finished yet.
    if !marker.image.is_empty() {
        if let Some(texture) = texture {
            let size = texture.size_vec2();
            let max = egui::vec2(
                POPUP_SIZE.width as f32 - 4.0 * POPUP_PADDING,
                POPUP_SIZE.height as f32 / 2.0,
            );
            let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
            ui.add(egui::Image::new((texture.id(), size * scale)));
        }
    }

    ui.label(&marker.description);
}

/// Blocking, dismissible error notification. Returns true once dismissed.
pub fn error_modal(ctx: &Context, message: &str) -> bool {
    let mut dismissed = false;

    let modal = egui::Modal::new(egui::Id::new("error_modal")).show(ctx, |ui| {
        ui.set_width(320.0);
        ui.heading("Something went wrong");
        ui.label(message);
        ui.separator();
        if ui.button("OK").clicked() {
            dismissed = true;
        }
    });

    dismissed || modal.should_close()
}
