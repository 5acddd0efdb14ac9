// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui widget for editing a patch.
//!
//! Controls:
//! - Scroll or two-finger drag: pan
//! - Pinch or Ctrl+scroll: zoom around the pointer
//! - Right/middle drag, or Alt + left drag: pan
//! - Left drag on a node: move it
//! - Left drag from a port to a port: connect
//! - Click: select a node or wire; Delete/Backspace removes it

use crate::config::EditorConfig;
use crate::gesture::{GestureEvent, GestureSource, ModifierPanGate};
use crate::interaction::{PatchInteraction, Selection};
use crate::layout::layout_patch;
use crate::patch::Patch;
use crate::render::{draw_patch, rgba, DrawSurface, EguiSurface, LineCap, LinearGradient, WireStroke};
use crate::viewport::{ViewportController, ViewportState};
use egui::{Color32, PointerButton, Pos2, Rect, Stroke, Vec2};

const CANVAS_COLOR: Color32 = Color32::from_gray(24);

/// Translates one frame of egui input into [`GestureEvent`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EguiGestures {
    events: Vec<GestureEvent>,
}

impl EguiGestures {
    /// Read this frame's input for the canvas at `origin`
    pub fn new(input: &egui::InputState, response: &egui::Response, origin: Pos2, gate: &ModifierPanGate) -> Self {
        let mut gestures = Self::default();

        if response.contains_pointer() {
            gestures.push_pan(input.smooth_scroll_delta);
            if let Some(touch) = input.multi_touch() {
                gestures.push_pan(touch.translation_delta);
            }
        }

        if response.dragged_by(PointerButton::Secondary) || response.dragged_by(PointerButton::Middle) {
            gestures.push_pan(response.drag_delta());
        } else if response.dragged_by(PointerButton::Primary) {
            if let Some(event) = gate.filter(response.drag_delta()) {
                gestures.push(event);
            }
        }

        if response.contains_pointer() {
            if let Some(pointer) = input.pointer.hover_pos() {
                gestures.push_pinch((pointer - origin).to_pos2(), input.zoom_delta());
            }
        }

        gestures
    }

    /// Queue a pan; zero deltas are dropped
    pub fn push_pan(&mut self, delta: Vec2) {
        self.push(GestureEvent::Pan { delta });
    }

    /// Queue a pinch around a canvas-relative focal point; unit scales are dropped
    pub fn push_pinch(&mut self, focal: Pos2, scale: f32) {
        self.push(GestureEvent::Pinch { focal, scale });
    }

    fn push(&mut self, event: GestureEvent) {
        if !event.is_noop() {
            self.events.push(event);
        }
    }
}

impl GestureSource for EguiGestures {
    fn collect_gestures(&mut self, out: &mut Vec<GestureEvent>) {
        out.append(&mut self.events);
    }
}

/// Patch editor widget state
#[derive(Debug, Clone)]
pub struct PatchEditor {
    viewport: ViewportState,
    controller: ViewportController,
    interaction: PatchInteraction,
    pan_gate: ModifierPanGate,
    config: EditorConfig,
    /// Draw the node/wire count and zoom in the corner
    pub show_status: bool,
}

impl Default for PatchEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl PatchEditor {
    /// Create an editor with a fresh viewport
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: ViewportState::default(),
            controller: ViewportController::new(config.zoom),
            interaction: PatchInteraction::new(config.interaction.clone()),
            pan_gate: ModifierPanGate::default(),
            config,
            show_status: true,
        }
    }

    /// Current viewport
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// Replace the viewport
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
    }

    /// Edit state
    pub fn interaction(&self) -> &PatchInteraction {
        &self.interaction
    }

    /// Active configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply gesture events to the viewport
    pub fn apply_gestures(&mut self, source: &mut impl GestureSource) {
        let mut events = Vec::new();
        source.collect_gestures(&mut events);

        match self.controller.apply_all(self.viewport, &events) {
            Ok(viewport) => self.viewport = viewport,
            Err(err) => {
                tracing::warn!("{err}; resetting viewport");
                self.viewport = ViewportState::default();
            }
        }
    }

    fn to_content(&self, origin: Pos2, screen: Pos2) -> Pos2 {
        self.viewport.screen_to_content((screen - origin).to_pos2())
    }

    /// Draw the patch filling the available space and handle input
    pub fn show(&mut self, ui: &mut egui::Ui, patch: &mut Patch) -> egui::Response {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let origin = rect.min;

        if response.drag_started_by(PointerButton::Primary) {
            let alt = ui.input(|i| i.modifiers.alt);
            self.pan_gate.begin(alt);
        }

        let mut gestures = ui.input(|i| EguiGestures::new(i, &response, origin, &self.pan_gate));
        self.apply_gestures(&mut gestures);

        self.handle_edits(ui, &response, origin, patch);

        if response.drag_stopped() {
            self.pan_gate.end();
        }

        if response.hovered() && ui.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            self.interaction.delete_selected(patch);
        }

        painter.rect_filled(rect, 0.0, CANVAS_COLOR);
        self.draw(&painter, origin, patch);

        if self.show_status {
            self.draw_status(&painter, rect, patch);
        }

        response
    }

    fn handle_edits(&mut self, ui: &egui::Ui, response: &egui::Response, origin: Pos2, patch: &mut Patch) {
        if self.pan_gate.is_active() {
            return;
        }

        let (pointer, press_origin) = ui.input(|i| (i.pointer.latest_pos(), i.pointer.press_origin()));
        let Some(pointer) = pointer else {
            return;
        };
        let zoom = self.viewport.zoom;
        let layout = layout_patch(patch, &self.config.layout);

        if response.drag_started_by(PointerButton::Primary) {
            let start = self.to_content(origin, press_origin.unwrap_or(pointer));
            self.interaction.press(patch, &layout, start, zoom);
        }
        if response.dragged_by(PointerButton::Primary) {
            self.interaction.drag_to(patch, self.to_content(origin, pointer));
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            let end = self.to_content(origin, pointer);
            self.interaction.release(patch, &layout, end, zoom);
        }
        if response.clicked() {
            let at = self.to_content(origin, pointer);
            self.interaction.click(patch, &layout, at, zoom);
        }
    }

    fn draw(&self, painter: &egui::Painter, origin: Pos2, patch: &Patch) {
        let style = &self.config.style;
        let layout = layout_patch(patch, &self.config.layout);
        let mut surface = EguiSurface::new(painter, origin, self.viewport);

        draw_patch(patch, &layout, style, &mut surface);
        surface.set_shadow(None);

        let wire_stroke = WireStroke {
            width: style.wire_width,
            cap: LineCap::Round,
        };

        if let Some(curve) = self.interaction.wire_drag().and_then(|drag| drag.preview_curve(&layout)) {
            let gradient = LinearGradient::new(curve.from, curve.to, rgba(style.output_color), rgba(style.input_color));
            surface.stroke_bezier(&curve, &gradient, &wire_stroke);
        }

        let highlight = rgba(style.selection_color);
        match self.interaction.selection() {
            Some(Selection::Node(id)) => {
                if let Some(node) = layout.node(id) {
                    painter.rect_stroke(
                        surface.rect_to_screen(node.rect),
                        self.viewport.scale_to_screen(style.corner_radius),
                        Stroke::new(2.0, highlight),
                    );
                }
            }
            Some(Selection::Wire(selected)) => {
                let index = patch.wire_index(&selected);
                if let Some(wire) = layout.wires.iter().find(|w| Some(w.index) == index) {
                    let gradient = LinearGradient::new(wire.curve.from, wire.curve.to, highlight, highlight);
                    surface.stroke_bezier(&wire.curve, &gradient, &wire_stroke);
                }
            }
            None => {}
        }
    }

    fn draw_status(&self, painter: &egui::Painter, rect: Rect, patch: &Patch) {
        painter.text(
            Pos2::new(rect.left() + 5.0, rect.bottom() - 11.0),
            egui::Align2::LEFT_CENTER,
            format!(
                "Nodes: {} | Wires: {} | Zoom: {:.0}%",
                patch.node_count(),
                patch.wire_count(),
                self.viewport.zoom * 100.0,
            ),
            egui::FontId::proportional(11.0),
            Color32::from_gray(150),
        );
    }
}
