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

//! Host platform services used by the renderer.
//!
//! A host owns the drawing surface, schedules frames at its display refresh
//! rate and delivers viewport resize notifications to registered listeners.

use crate::surface::Size;

/// Handle to a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Registration of a viewport resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Frame scheduling and viewport services provided by the UI toolkit.
pub trait FrameHost {
    /// Size of the drawing surface, or `None` if no surface can be acquired.
    fn surface_size(&self) -> Option<Size>;

    /// Ask for one more frame at the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a frame previously requested. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start delivering viewport resize notifications.
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Stop delivering viewport resize notifications. Unknown ids are ignored.
    fn remove_resize_listener(&mut self, id: ListenerId);
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory host that tracks outstanding frames and listeners.

    use std::collections::HashSet;

    use super::{FrameHandle, FrameHost, ListenerId};
    use crate::surface::Size;

    #[derive(Debug, Default)]
    pub struct MockHost {
        pub size: Option<Size>,
        pub pending_frames: HashSet<FrameHandle>,
        pub cancelled: Vec<FrameHandle>,
        pub listeners: HashSet<ListenerId>,
        next_id: u64,
    }

    impl MockHost {
        pub fn with_size(width: f32, height: f32) -> Self {
            Self {
                size: Some(Size::new(width, height)),
                ..Self::default()
            }
        }

        pub fn without_surface() -> Self {
            Self::default()
        }

        /// Fire the pending frame, as the display refresh would.
        pub fn fire(&mut self) {
            self.pending_frames.clear();
        }

        fn next(&mut self) -> u64 {
            self.next_id += 1;
            self.next_id
        }
    }

    impl FrameHost for MockHost {
        fn surface_size(&self) -> Option<Size> {
            self.size
        }

        fn request_frame(&mut self) -> FrameHandle {
            let handle = FrameHandle(self.next());
            self.pending_frames.insert(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if self.pending_frames.remove(&handle) {
                self.cancelled.push(handle);
            }
        }

        fn add_resize_listener(&mut self) -> ListenerId {
            let id = ListenerId(self.next());
            self.listeners.insert(id);
            id
        }

        fn remove_resize_listener(&mut self, id: ListenerId) {
            self.listeners.remove(&id);
        }
    }
}
