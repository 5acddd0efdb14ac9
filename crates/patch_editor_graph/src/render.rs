// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drawing pass over an abstract drawing surface.
//!
//! [`draw_patch`] consumes a [`PatchLayout`] and emits draw calls. It knows
//! nothing about screens or pan/zoom: coordinates are content space and the
//! surface maps them. [`EguiSurface`] is the egui implementation;
//! [`RecordingSurface`] captures calls for tests and headless hosts.

use crate::layout::{PatchLayout, WireCurve};
use crate::patch::Patch;
use crate::viewport::ViewportState;
use egui::{vec2, Align2, Color32, FontId, Pos2, Rect, Stroke};
use serde::{Deserialize, Serialize};

/// Number of straight segments a wire is flattened into
const WIRE_SEGMENTS: usize = 32;

/// Colours and sizes for the drawing pass.
///
/// Colours are unmultiplied RGBA so the style can live in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchStyle {
    /// Node body fill
    pub node_fill: [u8; 4],
    /// Node body corner radius
    pub corner_radius: f32,
    /// Input port fill, also the wire colour at its input end
    pub input_color: [u8; 4],
    /// Output port fill, also the wire colour at its output end
    pub output_color: [u8; 4],
    /// Title and label colour
    pub text_color: [u8; 4],
    /// Title font size
    pub title_size: f32,
    /// Port label font size
    pub label_size: f32,
    /// Wire stroke width
    pub wire_width: f32,
    /// Drop shadow blur radius, `None` disables the shadow
    pub shadow_radius: Option<f32>,
    /// Drop shadow colour
    pub shadow_color: [u8; 4],
    /// Outline of the selected node or wire
    pub selection_color: [u8; 4],
}

impl Default for PatchStyle {
    fn default() -> Self {
        Self {
            node_fill: [51, 51, 51, 153],
            corner_radius: 5.0,
            input_color: [0, 255, 255, 255],
            output_color: [255, 0, 255, 255],
            text_color: [255, 255, 255, 255],
            title_size: 14.0,
            label_size: 11.0,
            wire_width: 2.0,
            shadow_radius: Some(5.0),
            shadow_color: [0, 0, 0, 90],
            selection_color: [100, 150, 255, 255],
        }
    }
}

/// Convert a config colour
pub fn rgba(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Shadow filter applied to everything drawn after it is set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    /// Blur radius in content units
    pub radius: f32,
    /// Shadow colour
    pub color: Color32,
}

/// End cap of a stroked path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Path ends exactly at its endpoints
    Butt,
    /// Half-disc beyond each endpoint
    Round,
}

/// Line style for wires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireStroke {
    /// Width in content units
    pub width: f32,
    /// End cap
    pub cap: LineCap,
}

/// Two-stop linear gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    /// Where `start_color` is fully applied
    pub start: Pos2,
    /// Where `end_color` is fully applied
    pub end: Pos2,
    /// Colour at and before `start`
    pub start_color: Color32,
    /// Colour at and after `end`
    pub end_color: Color32,
}

impl LinearGradient {
    /// Create a gradient
    pub fn new(start: Pos2, end: Pos2, start_color: Color32, end_color: Color32) -> Self {
        Self {
            start,
            end,
            start_color,
            end_color,
        }
    }

    /// Colour at `p`, projected onto the gradient axis
    pub fn color_at(&self, p: Pos2) -> Color32 {
        let axis = self.end - self.start;
        let len_sq = axis.length_sq();
        if len_sq == 0.0 {
            return self.start_color;
        }
        let t = ((p - self.start).dot(axis) / len_sq).clamp(0.0, 1.0);
        lerp_color(self.start_color, self.end_color, t)
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
    Color32::from_rgba_premultiplied(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.a(), b.a()),
    )
}

/// What the drawing pass needs from a rendering backend.
///
/// All coordinates and sizes are in content space.
pub trait DrawSurface {
    /// Fill a rectangle with rounded corners
    fn fill_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color32);

    /// Fill the ellipse inscribed in `rect`
    fn fill_ellipse(&mut self, rect: Rect, color: Color32);

    /// Draw text with `anchor` placed at `pos`
    fn draw_text(&mut self, text: &str, pos: Pos2, anchor: Align2, size: f32, color: Color32);

    /// Stroke a cubic bezier coloured by a gradient
    fn stroke_bezier(&mut self, curve: &WireCurve, gradient: &LinearGradient, stroke: &WireStroke);

    /// Set or clear the shadow filter for subsequent draws
    fn set_shadow(&mut self, _shadow: Option<ShadowStyle>) {}
}

/// Draw a laid-out patch: every node first, in patch order, then every wire.
pub fn draw_patch(patch: &Patch, layout: &PatchLayout, style: &PatchStyle, surface: &mut impl DrawSurface) {
    surface.set_shadow(style.shadow_radius.map(|radius| ShadowStyle {
        radius,
        color: rgba(style.shadow_color),
    }));

    let fill = rgba(style.node_fill);
    let text = rgba(style.text_color);
    let input_color = rgba(style.input_color);
    let output_color = rgba(style.output_color);

    for node_layout in &layout.nodes {
        let Some(node) = patch.nodes.get(node_layout.index) else {
            continue;
        };

        surface.fill_rounded_rect(node_layout.rect, style.corner_radius, fill);
        surface.draw_text(&node.name, node_layout.title_pos, Align2::CENTER_CENTER, style.title_size, text);

        for (port, port_layout) in node.inputs.iter().zip(&node_layout.inputs) {
            surface.fill_ellipse(port_layout.rect, input_color);
            surface.draw_text(&port.name, port_layout.label_pos, Align2::LEFT_CENTER, style.label_size, text);
        }

        for (port, port_layout) in node.outputs.iter().zip(&node_layout.outputs) {
            surface.fill_ellipse(port_layout.rect, output_color);
            surface.draw_text(&port.name, port_layout.label_pos, Align2::RIGHT_CENTER, style.label_size, text);
        }
    }

    let stroke = WireStroke {
        width: style.wire_width,
        cap: LineCap::Round,
    };
    for wire in &layout.wires {
        let gradient = LinearGradient::new(wire.curve.from, wire.curve.to, output_color, input_color);
        surface.stroke_bezier(&wire.curve, &gradient, &stroke);
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `set_shadow`
    Shadow(Option<ShadowStyle>),
    /// `fill_rounded_rect`
    RoundedRect {
        /// Rectangle
        rect: Rect,
        /// Corner radius
        corner_radius: f32,
        /// Fill
        color: Color32,
    },
    /// `fill_ellipse`
    Ellipse {
        /// Bounding box
        rect: Rect,
        /// Fill
        color: Color32,
    },
    /// `draw_text`
    Text {
        /// Contents
        text: String,
        /// Anchor position
        pos: Pos2,
        /// Anchor
        anchor: Align2,
        /// Font size
        size: f32,
        /// Colour
        color: Color32,
    },
    /// `stroke_bezier`
    Bezier {
        /// Curve
        curve: WireCurve,
        /// Gradient
        gradient: LinearGradient,
        /// Stroke
        stroke: WireStroke,
    },
}

/// Surface that records every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    /// Calls so far
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded wire curves
    pub fn curves(&self) -> impl Iterator<Item = &WireCurve> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Bezier { curve, .. } => Some(curve),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color32) {
        self.commands.push(DrawCommand::RoundedRect { rect, corner_radius, color });
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color32) {
        self.commands.push(DrawCommand::Ellipse { rect, color });
    }

    fn draw_text(&mut self, text: &str, pos: Pos2, anchor: Align2, size: f32, color: Color32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            anchor,
            size,
            color,
        });
    }

    fn stroke_bezier(&mut self, curve: &WireCurve, gradient: &LinearGradient, stroke: &WireStroke) {
        self.commands.push(DrawCommand::Bezier {
            curve: *curve,
            gradient: *gradient,
            stroke: *stroke,
        });
    }

    fn set_shadow(&mut self, shadow: Option<ShadowStyle>) {
        self.commands.push(DrawCommand::Shadow(shadow));
    }
}

/// [`DrawSurface`] over an egui painter, mapping content space through the viewport
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: Pos2,
    viewport: ViewportState,
    shadow: Option<ShadowStyle>,
}

impl<'a> EguiSurface<'a> {
    /// `origin` is the top-left of the canvas in egui screen coordinates
    pub fn new(painter: &'a egui::Painter, origin: Pos2, viewport: ViewportState) -> Self {
        Self {
            painter,
            origin,
            viewport,
            shadow: None,
        }
    }

    /// Content position to egui screen position
    pub fn to_screen(&self, p: Pos2) -> Pos2 {
        self.origin + self.viewport.content_to_screen(p).to_vec2()
    }

    /// Content rectangle to egui screen rectangle
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    fn scale(&self, length: f32) -> f32 {
        self.viewport.scale_to_screen(length)
    }
}

impl DrawSurface for EguiSurface<'_> {
    fn fill_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color32) {
        let screen = self.rect_to_screen(rect);
        let rounding = self.scale(corner_radius);

        if let Some(shadow) = self.shadow {
            let offset = self.scale(shadow.radius) / 2.0;
            self.painter.rect_filled(
                screen.translate(vec2(offset, offset)).expand(offset),
                rounding + offset,
                shadow.color,
            );
        }
        self.painter.rect_filled(screen, rounding, color);
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color32) {
        let screen = self.rect_to_screen(rect);
        let radius = screen.width().min(screen.height()) / 2.0;
        self.painter.circle_filled(screen.center(), radius, color);
    }

    fn draw_text(&mut self, text: &str, pos: Pos2, anchor: Align2, size: f32, color: Color32) {
        self.painter.text(
            self.to_screen(pos),
            anchor,
            text,
            FontId::proportional(self.scale(size)),
            color,
        );
    }

    fn stroke_bezier(&mut self, curve: &WireCurve, gradient: &LinearGradient, stroke: &WireStroke) {
        let width = self.scale(stroke.width);
        let points = curve.points(WIRE_SEGMENTS);

        for seg in points.windows(2) {
            let color = gradient.color_at(seg[0] + (seg[1] - seg[0]) / 2.0);
            self.painter.line_segment(
                [self.to_screen(seg[0]), self.to_screen(seg[1])],
                Stroke::new(width, color),
            );
        }

        if stroke.cap == LineCap::Round {
            self.painter.circle_filled(self.to_screen(curve.from), width / 2.0, gradient.start_color);
            self.painter.circle_filled(self.to_screen(curve.to), width / 2.0, gradient.end_color);
        }
    }

    fn set_shadow(&mut self, shadow: Option<ShadowStyle>) {
        self.shadow = shadow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_patch, LayoutConfig};
    use crate::node::{Node, NodeId};
    use crate::wire::Wire;
    use egui::pos2;

    fn sample_patch() -> Patch {
        let mut patch = Patch::new();
        let a = patch.add_node(Node::new("A").with_output("out"));
        let b = patch.add_node(Node::new("B").with_position(300.0, 0.0).with_input("in").with_output("thru"));
        let c = patch.add_node(Node::new("C").with_position(600.0, 50.0).with_input("in"));
        patch.wires.push(Wire::new(a, 0, b, 0));
        patch.wires.push(Wire::new(b, 0, c, 0));
        patch
    }

    fn record(patch: &Patch) -> RecordingSurface {
        let layout = layout_patch(patch, &LayoutConfig::default());
        let mut surface = RecordingSurface::new();
        draw_patch(patch, &layout, &PatchStyle::default(), &mut surface);
        surface
    }

    #[test]
    fn test_nodes_are_drawn_before_wires() {
        let surface = record(&sample_patch());

        let last_node_call = surface
            .commands
            .iter()
            .rposition(|c| !matches!(c, DrawCommand::Bezier { .. }))
            .unwrap();
        let first_wire = surface
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Bezier { .. }))
            .unwrap();
        assert!(last_node_call < first_wire);
        assert_eq!(surface.curves().count(), 2);
        assert!(matches!(surface.commands[0], DrawCommand::Shadow(Some(_))));
    }

    #[test]
    fn test_node_draw_sequence() {
        let mut patch = Patch::new();
        patch.add_node(Node::new("Filter").with_input("in").with_output("out"));
        let surface = record(&patch);
        let style = PatchStyle::default();

        let kinds: Vec<_> = surface
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::Shadow(_) => "shadow".to_owned(),
                DrawCommand::RoundedRect { .. } => "body".to_owned(),
                DrawCommand::Ellipse { color, .. } if *color == rgba(style.input_color) => "input".to_owned(),
                DrawCommand::Ellipse { .. } => "output".to_owned(),
                DrawCommand::Text { text, anchor, .. } => format!("{text}:{anchor:?}"),
                DrawCommand::Bezier { .. } => "wire".to_owned(),
            })
            .collect();

        let expected = vec![
            "shadow".to_owned(),
            "body".to_owned(),
            format!("Filter:{:?}", Align2::CENTER_CENTER),
            "input".to_owned(),
            format!("in:{:?}", Align2::LEFT_CENTER),
            "output".to_owned(),
            format!("out:{:?}", Align2::RIGHT_CENTER),
        ];
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_dangling_wire_leaves_the_rest_intact() {
        let mut patch = sample_patch();
        let clean = record(&patch);

        let a = patch.nodes[0].id;
        patch.wires.insert(1, Wire::new(a, 3, NodeId::new(), 0));
        let dirty = record(&patch);

        assert_eq!(clean.commands, dirty.commands);
    }

    #[test]
    fn test_wire_gradient_runs_output_to_input() {
        let surface = record(&sample_patch());
        let style = PatchStyle::default();

        let DrawCommand::Bezier { curve, gradient, stroke } = surface.commands.last().unwrap() else {
            panic!("expected the last command to be a wire");
        };
        assert_eq!(gradient.start, curve.from);
        assert_eq!(gradient.end, curve.to);
        assert_eq!(gradient.start_color, rgba(style.output_color));
        assert_eq!(gradient.end_color, rgba(style.input_color));
        assert_eq!(stroke.cap, LineCap::Round);
        assert_eq!(stroke.width, style.wire_width);
    }

    #[test]
    fn test_gradient_color_at() {
        let gradient = LinearGradient::new(pos2(0.0, 0.0), pos2(100.0, 0.0), Color32::BLACK, Color32::WHITE);
        assert_eq!(gradient.color_at(pos2(-10.0, 5.0)), Color32::BLACK);
        assert_eq!(gradient.color_at(pos2(200.0, 0.0)), Color32::WHITE);
        assert_eq!(gradient.color_at(pos2(50.0, 30.0)), Color32::from_rgb(128, 128, 128));

        let degenerate = LinearGradient::new(pos2(1.0, 1.0), pos2(1.0, 1.0), Color32::RED, Color32::BLUE);
        assert_eq!(degenerate.color_at(pos2(9.0, 9.0)), Color32::RED);
    }

    #[test]
    fn test_no_shadow_when_disabled() {
        let patch = sample_patch();
        let layout = layout_patch(&patch, &LayoutConfig::default());
        let style = PatchStyle {
            shadow_radius: None,
            ..PatchStyle::default()
        };
        let mut surface = RecordingSurface::new();
        draw_patch(&patch, &layout, &style, &mut surface);
        assert_eq!(surface.commands[0], DrawCommand::Shadow(None));
    }
}
