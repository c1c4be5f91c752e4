// Copyright 2025 eraflo
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

use lucent_core::event::TypedEvent;
use lucent_core::platform::{DisplayConfig, WindowSize};
use lucent_infra::GlowFunctions;

/// What a frame is being drawn for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Size of the render surface, in physical pixels.
    pub size: WindowSize,
    pub config: DisplayConfig,
    /// Number of the frame, starting at 1.
    pub number: u64,
}

/// The user's application, driven on the window thread.
///
/// `F` is the GL function table handed to [`draw`](Self::draw). It is only
/// valid while the render context is current, which is always the case
/// inside `draw`.
pub trait Application<F = GlowFunctions> {
    /// Called for every typed event before the frame it may trigger.
    fn handle_event(&mut self, _event: &TypedEvent) {}

    /// Renders one frame. The result is presented right after.
    fn draw(&mut self, gl: &F, frame: &FrameInfo) -> anyhow::Result<()>;
}
