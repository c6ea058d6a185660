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

//! Animated weather backdrop library.
//!
//! This library simulates the particle effects shown behind a weather
//! dashboard: falling rain and snow, pulsing sun glow, twinkling stars,
//! drifting clouds and storm lightning. It is independent of any UI toolkit;
//! hosts plug in through two traits:
//!
//! - [`Surface`]: immediate-mode drawing primitives for one frame
//! - [`FrameHost`]: frame scheduling, resize listeners and surface size
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use weather_fx::{Condition, FrameHandle, FrameHost, ListenerId, Renderer, RendererOptions, RunConfig, Size};
//!
//! struct Headless;
//!
//! impl FrameHost for Headless {
//!     fn surface_size(&self) -> Option<Size> {
//!         Some(Size::new(800.0, 600.0))
//!     }
//!     fn request_frame(&mut self) -> FrameHandle {
//!         FrameHandle(1)
//!     }
//!     fn cancel_frame(&mut self, _handle: FrameHandle) {}
//!     fn add_resize_listener(&mut self) -> ListenerId {
//!         ListenerId(1)
//!     }
//!     fn remove_resize_listener(&mut self, _id: ListenerId) {}
//! }
//!
//! let mut host = Headless;
//! let mut renderer = Renderer::new(RendererOptions::default());
//! let config = RunConfig {
//!     condition: Condition::from_code(1195),
//!     is_day: true,
//!     dark_mode: false,
//! };
//!
//! renderer.start(config, &mut host, Instant::now());
//! assert_eq!(renderer.particles().len(), 200);
//! renderer.stop(&mut host);
//! ```

pub mod backdrop;
pub mod condition;
pub mod host;
pub mod lightning;
pub mod particle;
pub mod renderer;
pub mod surface;

pub use backdrop::{Backdrop, Sky};
pub use condition::{particle_count, Condition, ConditionParseError, ParticleFamily};
pub use host::{FrameHandle, FrameHost, ListenerId};
pub use lightning::{Bolt, Flash, DEFAULT_STRIKE_CHANCE, FLASH_DURATION};
pub use particle::Particle;
pub use renderer::{Renderer, RendererOptions, RunConfig, RunHandle};
pub use surface::{Point, Rgba, Size, Surface};
