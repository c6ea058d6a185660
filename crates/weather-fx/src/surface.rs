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

//! Drawing surface abstraction.
//!
//! The renderer paints through the [`Surface`] trait so the simulation can
//! run against an egui painter in the desktop app and against a recording
//! surface in tests.

/// A position in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A surface with no area cannot be drawn on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Straight (non-premultiplied) RGBA color with a floating point alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in 0.0 - 1.0
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different opacity, clamped to 0.0 - 1.0.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Opacity as an 8-bit channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "alpha is clamped to 0..=255")]
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Immediate-mode drawing target for one frame.
///
/// Implementations draw in surface pixel coordinates with the origin at the
/// top-left corner.
pub trait Surface {
    /// Current drawable size.
    fn size(&self) -> Size;

    /// Clear everything drawn so far this frame.
    fn clear(&mut self);

    /// Stroke a straight line.
    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba);

    /// Stroke an open polyline through `points`.
    fn polyline(&mut self, points: &[Point], width: f32, color: Rgba);

    /// Fill a solid disc.
    fn disc(&mut self, center: Point, radius: f32, color: Rgba);

    /// Fill a disc whose color fades from `inner` at the center to `outer`
    /// at `radius`.
    fn radial_gradient(&mut self, center: Point, radius: f32, inner: Rgba, outer: Rgba);

    /// Fill the whole surface with a translucent color.
    fn fill(&mut self, color: Rgba);

    /// Fill the full-width band between `top_y` and `bottom_y` with a
    /// vertical gradient.
    fn vertical_gradient(&mut self, top_y: f32, bottom_y: f32, top: Rgba, bottom: Rgba);
}

#[cfg(test)]
pub(crate) mod recording {
    //! Surface that records draw calls for assertions.

    use super::{Point, Rgba, Size, Surface};

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear,
        Line { from: Point, to: Point, width: f32, color: Rgba },
        Polyline { points: Vec<Point>, color: Rgba },
        Disc { center: Point, radius: f32, color: Rgba },
        Gradient { center: Point, radius: f32, inner: Rgba },
        Fill(Rgba),
        Band { top_y: f32, bottom_y: f32, top: Rgba, bottom: Rgba },
    }

    #[derive(Debug)]
    pub struct RecordingSurface {
        pub size: Size,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                size: Size::new(width, height),
                calls: Vec::new(),
            }
        }

        pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Size {
            self.size
        }

        fn clear(&mut self) {
            self.calls.clear();
            self.calls.push(DrawCall::Clear);
        }

        fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
            self.calls.push(DrawCall::Line { from, to, width, color });
        }

        fn polyline(&mut self, points: &[Point], _width: f32, color: Rgba) {
            self.calls.push(DrawCall::Polyline {
                points: points.to_vec(),
                color,
            });
        }

        fn disc(&mut self, center: Point, radius: f32, color: Rgba) {
            self.calls.push(DrawCall::Disc { center, radius, color });
        }

        fn radial_gradient(&mut self, center: Point, radius: f32, inner: Rgba, _outer: Rgba) {
            self.calls.push(DrawCall::Gradient { center, radius, inner });
        }

        fn fill(&mut self, color: Rgba) {
            self.calls.push(DrawCall::Fill(color));
        }

        fn vertical_gradient(&mut self, top_y: f32, bottom_y: f32, top: Rgba, bottom: Rgba) {
            self.calls.push(DrawCall::Band { top_y, bottom_y, top, bottom });
        }
    }
}
