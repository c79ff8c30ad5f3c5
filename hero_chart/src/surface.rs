// hero_chart/src/surface.rs
//
// Seams between the chart and its host: a 2D drawing surface and a frame
// scheduler. Coordinates are local to the surface, origin top-left.

use std::time::Duration;

use egui::epaint::Mesh;
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

pub trait Surface {
    fn size(&self) -> Vec2;
    fn vertical_gradient(&mut self, rect: Rect, top: Color32, bottom: Color32);
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke);
    fn fill_rect(&mut self, rect: Rect, color: Color32);
}

/// "Call me before the next repaint."
pub trait FrameHost {
    fn request_frame(&self);

    /// Slow wake-up while paused so a visibility restore is noticed.
    fn request_idle_poll(&self) {}
}

impl FrameHost for egui::Context {
    fn request_frame(&self) {
        self.request_repaint();
    }

    fn request_idle_poll(&self) {
        self.request_repaint_after(Duration::from_millis(250));
    }
}

/// Draws into an egui painter clipped to `rect`.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, p: Pos2) -> Pos2 {
        p + self.rect.min.to_vec2()
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn vertical_gradient(&mut self, rect: Rect, top: Color32, bottom: Color32) {
        let r = rect.translate(self.rect.min.to_vec2());
        let mut mesh = Mesh::default();
        mesh.colored_vertex(r.left_top(), top);
        mesh.colored_vertex(r.right_top(), top);
        mesh.colored_vertex(r.right_bottom(), bottom);
        mesh.colored_vertex(r.left_bottom(), bottom);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        self.painter.add(Shape::mesh(mesh));
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], stroke);
    }

    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        let pts: Vec<Pos2> = points.into_iter().map(|p| self.to_screen(p)).collect();
        self.painter.add(Shape::line(pts, stroke));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.painter
            .rect_filled(rect.translate(self.rect.min.to_vec2()), 0.0, color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Gradient { rect: Rect, top: Color32, bottom: Color32 },
    Line { from: Pos2, to: Pos2, stroke: Stroke },
    Polyline { points: Vec<Pos2>, stroke: Stroke },
    Rect { rect: Rect, color: Color32 },
}

/// Headless surface that keeps every draw call; one frame per `take_frame`.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_frame(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn vertical_gradient(&mut self, rect: Rect, top: Color32, bottom: Color32) {
        self.ops.push(DrawOp::Gradient { rect, top, bottom });
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke });
    }

    fn polyline(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        self.ops.push(DrawOp::Polyline { points, stroke });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.ops.push(DrawOp::Rect { rect, color });
    }
}
