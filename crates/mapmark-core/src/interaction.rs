//! The interaction state machine over mode, selection, drag and popup.

use crate::document::MapDocument;
use crate::input::{MouseButton, PointerEvent};
use crate::popup::{PopupContent, PopupState};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Interaction mode for the whole session. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Markers can be created, moved, deleted and edited.
    #[default]
    Edit,
    /// Markers can only be inspected through the viewer popup.
    Read,
}

/// An in-flight middle-button drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Index of the marker being moved.
    pub marker: usize,
    /// Grab point minus marker position at drag start.
    pub offset: Vec2,
}

/// Owns the mutable interaction state and turns pointer events into
/// document mutations.
///
/// At most one marker is selected at a time (the one being edited, viewed
/// or dragged); the selection is dropped whenever the popup closes.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: Mode,
    selection: Option<usize>,
    drag: Option<DragState>,
    popup: Option<PopupState>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn popup(&self) -> Option<PopupState> {
        self.popup
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed one pointer event through the mode/button dispatch table.
    pub fn handle_pointer_event(&mut self, document: &mut MapDocument, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_down(document, position, button)
            }
            PointerEvent::Move { position } => self.pointer_move(document, position),
            PointerEvent::Up { button, .. } => self.pointer_up(button),
        }
    }

    fn pointer_down(&mut self, document: &mut MapDocument, position: Point, button: MouseButton) {
        let hit = document.hit_test(position);
        match (self.mode, button) {
            (Mode::Edit, MouseButton::Left) => {
                if let Some(index) = hit {
                    self.open_popup(index, position, PopupContent::Editor);
                } else if let Some(index) = document.add_marker(position) {
                    // No hit and a background is loaded: place a new marker
                    // and edit it right away. Without a background this is
                    // a defined no-op.
                    log::debug!("placed marker {index} at ({}, {})", position.x, position.y);
                    self.open_popup(index, position, PopupContent::Editor);
                }
            }
            (Mode::Edit, MouseButton::Right) => {
                if let Some(index) = hit {
                    self.delete_marker(document, index);
                }
            }
            (Mode::Edit, MouseButton::Middle) => {
                if let Some(index) = hit {
                    if let Some(marker) = document.marker(index) {
                        self.drag = Some(DragState {
                            marker: index,
                            offset: position - marker.position(),
                        });
                    }
                }
            }
            (Mode::Read, MouseButton::Left) => {
                if let Some(index) = hit {
                    self.open_popup(index, position, PopupContent::Viewer);
                }
            }
            _ => {}
        }
    }

    /// Frame-synchronous drag: the marker tracks the pointer exactly, no
    /// smoothing. No-op outside a drag.
    fn pointer_move(&mut self, document: &mut MapDocument, position: Point) {
        if let Some(drag) = self.drag {
            if let Some(marker) = document.marker_mut(drag.marker) {
                marker.set_position(position - drag.offset);
            }
        }
    }

    /// End of a middle-button drag; the marker keeps its last position.
    fn pointer_up(&mut self, button: MouseButton) {
        if button == MouseButton::Middle {
            self.drag = None;
        }
    }

    fn delete_marker(&mut self, document: &mut MapDocument, index: usize) {
        if document.remove_marker(index).is_none() {
            return;
        }
        log::debug!("deleted marker {index}");

        if self.selection == Some(index) {
            self.close_popup();
        }
        // Markers are identified by list position, so state pointing past
        // the removed one shifts down by one.
        if let Some(selected) = self.selection {
            if selected > index {
                self.selection = Some(selected - 1);
            }
        }
        self.drag = match self.drag {
            Some(drag) if drag.marker == index => None,
            Some(drag) if drag.marker > index => Some(DragState {
                marker: drag.marker - 1,
                ..drag
            }),
            other => other,
        };
    }

    fn open_popup(&mut self, index: usize, anchor: Point, content: PopupContent) {
        self.selection = Some(index);
        self.popup = Some(PopupState { anchor, content });
    }

    /// Close the popup; the selection goes with it.
    pub fn close_popup(&mut self) {
        self.popup = None;
        self.selection = None;
    }

    /// Flip Edit/Read. Closes any open popup and clears the selection;
    /// never touches marker data.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Edit => Mode::Read,
            Mode::Read => Mode::Edit,
        };
        self.close_popup();
        log::debug!("switched to {:?} mode", self.mode);
    }

    /// Commit the editor form into the selected marker, then close the
    /// popup.
    ///
    /// Title and description always overwrite; the image is replaced only
    /// when a new payload was supplied.
    pub fn commit_editor(
        &mut self,
        document: &mut MapDocument,
        title: &str,
        description: &str,
        new_image: Option<String>,
    ) {
        if let Some(index) = self.selection {
            if let Some(marker) = document.marker_mut(index) {
                marker.title = title.to_owned();
                marker.description = description.to_owned();
                if let Some(image) = new_image {
                    marker.image = image;
                }
            }
        }
        self.close_popup();
    }

    /// Drop all transient state (used when a new document is loaded).
    /// The mode is session-wide and survives.
    pub fn reset(&mut self) {
        self.selection = None;
        self.drag = None;
        self.popup = None;
    }
}
