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

//! Frame scheduling on top of egui's repaint requests.
//!
//! egui has no per-callback frame queue, so a requested frame is a pending
//! handle plus the instant it becomes due. The app asks [`EguiFrameHost::frame_due`]
//! each update and only advances the simulation when the frame has come due.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use weather_fx::{FrameHandle, FrameHost, ListenerId, Size};

#[derive(Debug)]
pub struct EguiFrameHost {
    ctx: egui::Context,
    size: Option<Size>,
    /// Fixed frame spacing; `None` follows the display refresh
    frame_interval: Option<Duration>,
    pending: Option<(FrameHandle, Instant)>,
    next_frame: u64,
    listeners: HashSet<ListenerId>,
    next_listener: u64,
}

impl EguiFrameHost {
    pub fn new(ctx: egui::Context, frame_interval: Option<Duration>) -> Self {
        Self {
            ctx,
            size: None,
            frame_interval: frame_interval.filter(|d| !d.is_zero()),
            pending: None,
            next_frame: 0,
            listeners: HashSet::new(),
            next_listener: 0,
        }
    }

    /// Record the viewport size for this update.
    ///
    /// Returns the new size when it changed and a resize listener is
    /// registered.
    pub fn observe_viewport(&mut self, size: Size) -> Option<Size> {
        let changed = self.size != Some(size);
        self.size = Some(size);
        (changed && !self.listeners.is_empty()).then_some(size)
    }

    /// Whether the pending frame should run at `now`
    pub fn frame_due(&self, now: Instant) -> bool {
        self.pending.is_some_and(|(_, due)| now >= due)
    }

    #[cfg(test)]
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl FrameHost for EguiFrameHost {
    fn surface_size(&self) -> Option<Size> {
        self.size
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);

        match self.frame_interval {
            Some(interval) => {
                self.pending = Some((handle, Instant::now() + interval));
                self.ctx.request_repaint_after(interval);
            }
            None => {
                self.pending = Some((handle, Instant::now()));
                self.ctx.request_repaint();
            }
        }

        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.is_some_and(|(pending, _)| pending == handle) {
            self.pending = None;
        }
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}
