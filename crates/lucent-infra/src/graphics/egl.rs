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

//! The EGL driver, backed by `libEGL` loaded at runtime.

use super::gl::GlowFunctions;
use khronos_egl as egl;
use lucent_core::platform::{NativeDisplayHandle, NativeSurfaceHandle, WindowError};
use lucent_core::renderer::{ContextError, DriverResult, GraphicsDriver, NativeErrorCode};
use std::ffi::c_void;
use std::fmt;
use std::ptr;
use std::rc::Rc;

type EglInstance = egl::DynamicInstance<egl::EGL1_4>;

const EGL_SUCCESS: i32 = 0x3000;

/// A [`GraphicsDriver`] over the system's `libEGL`.
pub struct EglDriver {
    egl: Rc<EglInstance>,
}

impl EglDriver {
    /// Loads `libEGL` and checks it exposes at least EGL 1.4.
    pub fn load() -> Result<Self, WindowError> {
        let egl = unsafe { EglInstance::load_required() }
            .map_err(|e| WindowError::LibraryLoad(format!("libEGL: {e}")))?;
        log::debug!("libEGL loaded.");
        Ok(Self { egl: Rc::new(egl) })
    }

    /// The error of the last failed call on this thread.
    fn last_error(&self) -> NativeErrorCode {
        NativeErrorCode(self.egl.get_error().map_or(EGL_SUCCESS, |e| e.native()))
    }
}

fn code(err: egl::Error) -> NativeErrorCode {
    NativeErrorCode(err.native())
}

impl GraphicsDriver for EglDriver {
    type Display = egl::Display;
    type Config = egl::Config;
    type Context = egl::Context;
    type Surface = egl::Surface;
    type Functions = GlowFunctions;

    fn get_display(&self, native: NativeDisplayHandle) -> DriverResult<egl::Display> {
        unsafe { self.egl.get_display(native.as_ptr()) }.ok_or_else(|| self.last_error())
    }

    fn initialize(&self, display: egl::Display) -> DriverResult<(i32, i32)> {
        self.egl.initialize(display).map_err(code)
    }

    fn query_extensions(&self, display: egl::Display) -> DriverResult<String> {
        self.egl
            .query_string(Some(display), egl::EXTENSIONS)
            .map(|extensions| extensions.to_string_lossy().into_owned())
            .map_err(code)
    }

    fn choose_config(
        &self,
        display: egl::Display,
        attribs: &[i32],
    ) -> DriverResult<Option<egl::Config>> {
        self.egl.choose_first_config(display, attribs).map_err(code)
    }

    fn create_context(
        &self,
        display: egl::Display,
        config: egl::Config,
        attribs: &[i32],
    ) -> DriverResult<egl::Context> {
        self.egl
            .create_context(display, config, None, attribs)
            .map_err(code)
    }

    fn config_attrib(
        &self,
        display: egl::Display,
        config: egl::Config,
        attribute: i32,
    ) -> DriverResult<i32> {
        self.egl
            .get_config_attrib(display, config, attribute)
            .map_err(code)
    }

    fn create_window_surface(
        &self,
        display: egl::Display,
        config: egl::Config,
        window: NativeSurfaceHandle,
        attribs: &[i32],
    ) -> DriverResult<egl::Surface> {
        unsafe {
            self.egl
                .create_window_surface(display, config, window.as_ptr(), Some(attribs))
        }
        .map_err(code)
    }

    fn make_current(
        &self,
        display: egl::Display,
        surface: Option<egl::Surface>,
        context: Option<egl::Context>,
    ) -> DriverResult<()> {
        self.egl
            .make_current(display, surface, surface, context)
            .map_err(code)
    }

    fn swap_interval(&self, display: egl::Display, interval: i32) -> DriverResult<()> {
        self.egl.swap_interval(display, interval).map_err(code)
    }

    fn swap_buffers(&self, display: egl::Display, surface: egl::Surface) -> DriverResult<()> {
        self.egl.swap_buffers(display, surface).map_err(code)
    }

    fn destroy_surface(&self, display: egl::Display, surface: egl::Surface) -> DriverResult<()> {
        self.egl.destroy_surface(display, surface).map_err(code)
    }

    fn destroy_context(&self, display: egl::Display, context: egl::Context) -> DriverResult<()> {
        self.egl.destroy_context(display, context).map_err(code)
    }

    fn terminate(&self, display: egl::Display) -> DriverResult<()> {
        self.egl.terminate(display).map_err(code)
    }

    fn release_thread(&self) -> DriverResult<()> {
        self.egl.release_thread().map_err(code)
    }

    fn load_functions(&self) -> Result<GlowFunctions, ContextError> {
        let egl = Rc::clone(&self.egl);
        Ok(GlowFunctions::new(move |name| {
            egl.get_proc_address(name)
                .map_or(ptr::null(), |f| f as *const c_void)
        }))
    }
}

impl fmt::Debug for EglDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EglDriver").finish_non_exhaustive()
    }
}
