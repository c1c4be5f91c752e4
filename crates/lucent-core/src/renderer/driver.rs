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

//! Contracts consumed by the render context: the EGL-style driver, the GL
//! function table and the color emulation target.

use super::error::{ContextError, NativeErrorCode};
use crate::platform::{NativeDisplayHandle, NativeSurfaceHandle, WindowSize};
use std::fmt;

/// Result of a driver call. Failures carry the driver's error code.
pub type DriverResult<T> = Result<T, NativeErrorCode>;

/// The EGL-style display/context/surface API.
///
/// Calls mirror their EGL counterparts one to one. Attribute lists are
/// terminated with [`EGL_NONE`](super::attribs::EGL_NONE).
pub trait GraphicsDriver {
    type Display: Copy + fmt::Debug;
    type Config: Copy + fmt::Debug;
    type Context: Copy + fmt::Debug;
    type Surface: Copy + fmt::Debug;
    /// GL function table loaded from this driver.
    type Functions: GlFunctions;

    fn get_display(&self, native: NativeDisplayHandle) -> DriverResult<Self::Display>;

    /// Initializes the display and returns its `(major, minor)` version.
    fn initialize(&self, display: Self::Display) -> DriverResult<(i32, i32)>;

    /// The space separated extension string of the display.
    fn query_extensions(&self, display: Self::Display) -> DriverResult<String>;

    /// Returns the first matching configuration, if any.
    fn choose_config(
        &self,
        display: Self::Display,
        attribs: &[i32],
    ) -> DriverResult<Option<Self::Config>>;

    fn create_context(
        &self,
        display: Self::Display,
        config: Self::Config,
        attribs: &[i32],
    ) -> DriverResult<Self::Context>;

    fn config_attrib(
        &self,
        display: Self::Display,
        config: Self::Config,
        attribute: i32,
    ) -> DriverResult<i32>;

    fn create_window_surface(
        &self,
        display: Self::Display,
        config: Self::Config,
        window: NativeSurfaceHandle,
        attribs: &[i32],
    ) -> DriverResult<Self::Surface>;

    /// Binds `surface` and `context` to the calling thread. `None` for both
    /// unbinds.
    fn make_current(
        &self,
        display: Self::Display,
        surface: Option<Self::Surface>,
        context: Option<Self::Context>,
    ) -> DriverResult<()>;

    fn swap_interval(&self, display: Self::Display, interval: i32) -> DriverResult<()>;

    fn swap_buffers(&self, display: Self::Display, surface: Self::Surface) -> DriverResult<()>;

    fn destroy_surface(&self, display: Self::Display, surface: Self::Surface) -> DriverResult<()>;

    fn destroy_context(&self, display: Self::Display, context: Self::Context) -> DriverResult<()>;

    fn terminate(&self, display: Self::Display) -> DriverResult<()>;

    /// Releases the calling thread's driver state.
    fn release_thread(&self) -> DriverResult<()>;

    /// Loads the GL function table through the driver's proc address lookup.
    fn load_functions(&self) -> Result<Self::Functions, ContextError>;
}

/// The part of the GL function table the render context itself needs.
///
/// The application gets the full table through
/// [`RenderContext::functions`](super::RenderContext::functions).
pub trait GlFunctions {
    type ColorTarget: ColorEmulationTarget;

    /// Blocks until every submitted command has completed.
    fn finish(&self);

    /// Allocates an off-screen color emulation target.
    fn create_color_target(&self) -> Result<Self::ColorTarget, ContextError>;
}

/// An off-screen sRGB render target with a blit-to-window pass.
///
/// While it exists it is the framebuffer the application renders into.
pub trait ColorEmulationTarget {
    /// Resizes the backing storage and binds it for rendering.
    fn refresh(&mut self, size: WindowSize) -> Result<(), ContextError>;

    /// Draws the off-screen image into the window framebuffer.
    fn blit(&mut self);

    /// Rebinds the off-screen framebuffer after a buffer swap.
    fn after_present(&mut self);

    /// Deletes every GL object. Safe to call more than once.
    fn release(&mut self);
}
