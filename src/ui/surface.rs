// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! egui painter backend for the weather backdrop.

use egui::epaint::{Mesh, Vertex, WHITE_UV};
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};
use weather_fx::{Point, Rgba, Size, Surface};

/// Segments used to approximate a radial gradient disc
const GRADIENT_SEGMENTS: u32 = 32;

/// Paints backdrop primitives into a rectangle of an egui painter.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn pos(&self, point: Point) -> Pos2 {
        self.rect.min + egui::vec2(point.x, point.y)
    }
}

impl std::fmt::Debug for EguiSurface<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EguiSurface").field("rect", &self.rect).finish_non_exhaustive()
    }
}

pub fn color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.alpha_u8())
}

/// Triangle fan fading from `inner` at the center to `outer` at the rim
pub fn radial_mesh(center: Pos2, radius: f32, inner: Color32, outer: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, inner);

    for i in 0..GRADIENT_SEGMENTS {
        #[allow(clippy::cast_precision_loss, reason = "segment count is tiny")]
        let angle = std::f32::consts::TAU * i as f32 / GRADIENT_SEGMENTS as f32;
        mesh.colored_vertex(center + radius * egui::vec2(angle.cos(), angle.sin()), outer);
    }

    for i in 0..GRADIENT_SEGMENTS {
        let next = (i + 1) % GRADIENT_SEGMENTS;
        mesh.add_triangle(0, i + 1, next + 1);
    }

    mesh
}

/// Quad blending from `top` to `bottom` over `rect`
pub fn band_mesh(rect: Rect, top: Color32, bottom: Color32) -> Mesh {
    let mut mesh = Mesh::default();

    // Add vertices: top-left, top-right, bottom-right, bottom-left
    for (pos, color) in [
        (rect.left_top(), top),
        (rect.right_top(), top),
        (rect.right_bottom(), bottom),
        (rect.left_bottom(), bottom),
    ] {
        mesh.vertices.push(Vertex { pos, uv: WHITE_UV, color });
    }

    // Two triangles make a rectangle
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> Size {
        Size::new(self.rect.width(), self.rect.height())
    }

    /// egui starts every frame blank, so there is nothing to wipe.
    fn clear(&mut self) {}

    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.painter
            .line_segment([self.pos(from), self.pos(to)], Stroke::new(width, color32(color)));
    }

    fn polyline(&mut self, points: &[Point], width: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        let points = points.iter().map(|p| self.pos(*p)).collect();
        self.painter.add(Shape::line(points, Stroke::new(width, color32(color))));
    }

    fn disc(&mut self, center: Point, radius: f32, color: Rgba) {
        self.painter.circle_filled(self.pos(center), radius, color32(color));
    }

    fn radial_gradient(&mut self, center: Point, radius: f32, inner: Rgba, outer: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let mesh = radial_mesh(self.pos(center), radius, color32(inner), color32(outer));
        self.painter.add(Shape::mesh(mesh));
    }

    fn fill(&mut self, color: Rgba) {
        self.painter.rect_filled(self.rect, 0.0, color32(color));
    }

    fn vertical_gradient(&mut self, top_y: f32, bottom_y: f32, top: Rgba, bottom: Rgba) {
        let band = Rect::from_min_max(
            egui::pos2(self.rect.left(), self.rect.top() + top_y),
            egui::pos2(self.rect.right(), self.rect.top() + bottom_y),
        );
        if band.height() <= 0.0 {
            return;
        }
        self.painter.add(Shape::mesh(band_mesh(band, color32(top), color32(bottom))));
    }
}
