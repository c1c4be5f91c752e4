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

//! Platform surface adapters.
//!
//! An adapter turns a native window handle into the opaque surface handle the
//! driver's window-surface call expects. Direct windowing systems hand the
//! window itself to the driver. Compositors need an intermediate native EGL
//! window that the adapter owns.

use super::window::{NativeSurfaceHandle, NativeWindowHandle, WindowSize};
use crate::renderer::ContextError;
use std::fmt;
use std::rc::Rc;

/// Translation from a native window to a driver surface handle.
pub trait SurfaceAdapter: fmt::Debug {
    /// The handle passed to the driver when creating the window surface.
    fn native_handle(&self) -> NativeSurfaceHandle;

    /// The native window this adapter was created for.
    fn window(&self) -> NativeWindowHandle;

    fn size(&self) -> WindowSize;

    /// Resizes in place. The adapter keeps its identity.
    fn resize(&mut self, size: WindowSize);

    /// Releases whatever the adapter owns. Safe to call more than once.
    fn destroy(&mut self);
}

/// Adapter for windowing systems whose windows are directly renderable.
#[derive(Debug)]
pub struct DirectSurface {
    window: NativeWindowHandle,
    size: WindowSize,
}

impl DirectSurface {
    pub fn new(window: NativeWindowHandle, size: WindowSize) -> Self {
        Self { window, size }
    }
}

impl SurfaceAdapter for DirectSurface {
    fn native_handle(&self) -> NativeSurfaceHandle {
        NativeSurfaceHandle::from_window(self.window)
    }

    fn window(&self) -> NativeWindowHandle {
        self.window
    }

    fn size(&self) -> WindowSize {
        self.size
    }

    fn resize(&mut self, size: WindowSize) {
        self.size = size;
    }

    fn destroy(&mut self) {
        // The window owns its own lifetime.
    }
}

/// Compositor-side native window management (`wl_egl_window_*`).
pub trait CompositorApi: fmt::Debug {
    fn create_window(
        &self,
        surface: NativeWindowHandle,
        size: WindowSize,
    ) -> Result<NativeSurfaceHandle, ContextError>;

    fn resize_window(&self, window: NativeSurfaceHandle, size: WindowSize);

    fn destroy_window(&self, window: NativeSurfaceHandle);
}

/// Adapter owning a compositor-managed native window.
///
/// The native window is created once, resized in place and destroyed by this
/// adapter, never by the underlying compositor surface.
#[derive(Debug)]
pub struct CompositorSurface {
    api: Rc<dyn CompositorApi>,
    window: NativeWindowHandle,
    native: Option<NativeSurfaceHandle>,
    size: WindowSize,
}

impl CompositorSurface {
    pub fn create(
        api: Rc<dyn CompositorApi>,
        window: NativeWindowHandle,
        size: WindowSize,
    ) -> Result<Self, ContextError> {
        let native = api.create_window(window, size)?;
        if native.is_null() {
            return Err(ContextError::surface("compositor returned a null native window"));
        }
        log::debug!(
            "Created compositor window {:p} ({}x{}).",
            native.as_ptr(),
            size.width,
            size.height
        );
        Ok(Self {
            api,
            window,
            native: Some(native),
            size,
        })
    }

    pub fn is_destroyed(&self) -> bool {
        self.native.is_none()
    }
}

impl SurfaceAdapter for CompositorSurface {
    fn native_handle(&self) -> NativeSurfaceHandle {
        self.native.unwrap_or_else(NativeSurfaceHandle::null)
    }

    fn window(&self) -> NativeWindowHandle {
        self.window
    }

    fn size(&self) -> WindowSize {
        self.size
    }

    fn resize(&mut self, size: WindowSize) {
        if let Some(native) = self.native {
            self.api.resize_window(native, size);
        }
        self.size = size;
    }

    fn destroy(&mut self) {
        if let Some(native) = self.native.take() {
            log::debug!("Destroying compositor window {:p}.", native.as_ptr());
            self.api.destroy_window(native);
        }
    }
}

impl Drop for CompositorSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// The adapter flavour a window uses, chosen once when the window is created.
#[derive(Clone)]
pub enum SurfaceBackend {
    Direct,
    Compositor(Rc<dyn CompositorApi>),
}

impl SurfaceBackend {
    /// Creates an adapter for `window` at `size`.
    pub fn create(
        &self,
        window: NativeWindowHandle,
        size: WindowSize,
    ) -> Result<Box<dyn SurfaceAdapter>, ContextError> {
        match self {
            SurfaceBackend::Direct => Ok(Box::new(DirectSurface::new(window, size))),
            SurfaceBackend::Compositor(api) => Ok(Box::new(CompositorSurface::create(
                Rc::clone(api),
                window,
                size,
            )?)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SurfaceBackend::Direct => "direct",
            SurfaceBackend::Compositor(_) => "compositor",
        }
    }
}

impl fmt::Debug for SurfaceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
