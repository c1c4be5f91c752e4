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

//! The render context: a driver context bound to one native window.
//!
//! The context owns the driver display/config/context triple, the window
//! surface and, when the configuration cannot render sRGB natively, a color
//! emulation target. The surface is rebuilt whenever the window handle or its
//! size changes, and torn down while the window is hidden.

use super::attribs::{self, EGL_NATIVE_VISUAL_ID};
use super::driver::{ColorEmulationTarget, GlFunctions, GraphicsDriver};
use super::error::ContextError;
use crate::platform::{
    NativeDisplayHandle, NativeSurfaceHandle, NativeWindow, NativeWindowHandle, SurfaceAdapter,
    WindowSize,
};
use crate::settings::ContextSettings;
use std::fmt;
use std::marker::PhantomData;

type ColorTarget<D> = <<D as GraphicsDriver>::Functions as GlFunctions>::ColorTarget;

struct DriverObjects<D: GraphicsDriver> {
    display: D::Display,
    config: D::Config,
    context: D::Context,
}

struct Negotiated<D: GraphicsDriver> {
    config: D::Config,
    context: D::Context,
    visual_id: i32,
    native_srgb: bool,
    functions: D::Functions,
}

/// A driver context, its window surface and optional color emulation.
///
/// A `RenderContext` is confined to the thread that created it; it is
/// neither `Send` nor `Sync`.
pub struct RenderContext<D: GraphicsDriver> {
    driver: D,
    settings: ContextSettings,
    /// `None` once released.
    objects: Option<DriverObjects<D>>,
    functions: D::Functions,
    visual_id: i32,
    native_srgb: bool,
    /// Window the current surface was built for, as of the last `make_current`.
    window: Option<NativeWindowHandle>,
    size: WindowSize,
    adapter: Option<Box<dyn SurfaceAdapter>>,
    surface: Option<D::Surface>,
    color_target: Option<ColorTarget<D>>,
    _thread_bound: PhantomData<*const ()>,
}

impl<D: GraphicsDriver> RenderContext<D> {
    /// Initializes the driver on `native_display` and creates a context.
    ///
    /// ## Arguments
    /// * `driver` - The driver to create the context with.
    /// * `native_display` - The display connection of the window that will be
    ///   rendered to. It is borrowed, never closed by the context.
    /// * `settings` - Context creation settings.
    ///
    /// ## Returns
    /// The new context, or a [`ContextError::Setup`]. Anything acquired before
    /// the failure is released again.
    pub fn create(
        driver: D,
        native_display: NativeDisplayHandle,
        settings: ContextSettings,
    ) -> Result<Self, ContextError> {
        let display = driver
            .get_display(native_display)
            .map_err(|code| ContextError::setup_with_code("eglGetDisplay failed", code))?;
        let (major, minor) = driver
            .initialize(display)
            .map_err(|code| ContextError::setup_with_code("eglInitialize failed", code))?;
        log::info!("EGL {major}.{minor} initialized.");

        let negotiated = match Self::negotiate(&driver, display, major, minor, &settings) {
            Ok(negotiated) => negotiated,
            Err(err) => {
                if let Err(code) = driver.terminate(display) {
                    log::warn!("eglTerminate failed ({code}) while cleaning up.");
                }
                if let Err(code) = driver.release_thread() {
                    log::warn!("eglReleaseThread failed ({code}) while cleaning up.");
                }
                return Err(err);
            }
        };

        log::info!(
            "Render context created (visual {:#x}, sRGB {}).",
            negotiated.visual_id,
            if negotiated.native_srgb {
                "native"
            } else {
                "emulated"
            }
        );

        Ok(Self {
            driver,
            settings,
            objects: Some(DriverObjects {
                display,
                config: negotiated.config,
                context: negotiated.context,
            }),
            functions: negotiated.functions,
            visual_id: negotiated.visual_id,
            native_srgb: negotiated.native_srgb,
            window: None,
            size: WindowSize::default(),
            adapter: None,
            surface: None,
            color_target: None,
            _thread_bound: PhantomData,
        })
    }

    fn negotiate(
        driver: &D,
        display: D::Display,
        major: i32,
        minor: i32,
        settings: &ContextSettings,
    ) -> Result<Negotiated<D>, ContextError> {
        let extensions = driver.query_extensions(display).unwrap_or_else(|code| {
            log::warn!("eglQueryString(EGL_EXTENSIONS) failed ({code}).");
            String::new()
        });
        let native_srgb = attribs::supports_native_srgb(major, minor, &extensions);

        let config_attribs = attribs::config_attributes(native_srgb, settings);
        log::debug!("Choosing EGL config with {config_attribs:x?}.");
        let config = match driver.choose_config(display, &config_attribs) {
            Ok(Some(config)) => config,
            Ok(None) => return Err(ContextError::setup("no matching EGL configuration")),
            Err(code) => return Err(ContextError::setup_with_code("eglChooseConfig failed", code)),
        };
        log::debug!("Chose EGL config {config:?}.");

        let context = driver
            .create_context(display, config, &attribs::context_attributes(settings))
            .map_err(|code| ContextError::setup_with_code("eglCreateContext failed", code))?;

        let acquired = driver
            .config_attrib(display, config, EGL_NATIVE_VISUAL_ID)
            .map_err(|code| {
                ContextError::setup_with_code("failed to read EGL_NATIVE_VISUAL_ID", code)
            })
            .and_then(|visual_id| Ok((visual_id, driver.load_functions()?)));

        match acquired {
            Ok((visual_id, functions)) => Ok(Negotiated {
                config,
                context,
                visual_id,
                native_srgb,
                functions,
            }),
            Err(err) => {
                if let Err(code) = driver.destroy_context(display, context) {
                    log::warn!("eglDestroyContext failed ({code}) while cleaning up.");
                }
                Err(err)
            }
        }
    }

    /// Binds the context to `window`'s current native window.
    ///
    /// Does nothing when the window handle and size are the same as last
    /// time. Otherwise the old surface is torn down and, unless the window is
    /// hidden, a new one is created and made current.
    ///
    /// ## Returns
    /// * [`ContextError::Surface`] or [`ContextError::Driver`] when the surface
    ///   cannot be built or bound. The next call retries.
    /// * [`ContextError::Setup`] when the color emulation target fails. The
    ///   whole context has been released.
    /// * [`ContextError::Released`] after [`release`](Self::release).
    pub fn make_current(&mut self, window: &dyn NativeWindow) -> Result<(), ContextError> {
        let (display, config, context) = match &self.objects {
            Some(objects) => (objects.display, objects.config, objects.context),
            None => return Err(ContextError::Released),
        };

        let binding = window.native_window(self.visual_id);
        if binding.handle == self.window && binding.size == self.size {
            return Ok(());
        }

        if binding.handle.is_none() {
            self.release_color_target();
        }
        self.destroy_surface(display);
        self.window = binding.handle;
        self.size = binding.size;

        let Some(handle) = binding.handle else {
            self.destroy_adapter();
            log::info!("Window hidden, render surface released.");
            return Ok(());
        };

        log::info!(
            "Creating render surface for window {:#x} ({}x{}).",
            handle.get(),
            binding.size.width,
            binding.size.height
        );

        let mut adapter = match self.adapter.take() {
            Some(mut adapter) if adapter.window() == handle => {
                adapter.resize(binding.size);
                adapter
            }
            stale => {
                if let Some(mut stale) = stale {
                    stale.destroy();
                }
                match window.surface_backend().create(handle, binding.size) {
                    Ok(adapter) => adapter,
                    Err(err) => {
                        self.window = None;
                        return Err(err);
                    }
                }
            }
        };

        match self.create_surface(display, config, context, adapter.native_handle()) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.adapter = Some(adapter);
            }
            Err(err) => {
                adapter.destroy();
                self.window = None;
                return Err(err);
            }
        }

        if self.native_srgb {
            return Ok(());
        }
        if let Err(err) = self.refresh_color_target() {
            log::error!("Color emulation target failed, releasing render context: {err}");
            self.release();
            return Err(err);
        }
        Ok(())
    }

    fn create_surface(
        &self,
        display: D::Display,
        config: D::Config,
        context: D::Context,
        native: NativeSurfaceHandle,
    ) -> Result<D::Surface, ContextError> {
        let surface_attribs = attribs::surface_attributes(self.native_srgb);
        let surface = self
            .driver
            .create_window_surface(display, config, native, &surface_attribs)
            .map_err(|code| ContextError::surface_with_code("eglCreateWindowSurface failed", code))?;

        if let Err(code) = self.driver.make_current(display, Some(surface), Some(context)) {
            if let Err(code) = self.driver.destroy_surface(display, surface) {
                log::warn!("eglDestroySurface failed ({code}) while cleaning up.");
            }
            return Err(ContextError::Driver {
                call: "eglMakeCurrent",
                code,
            });
        }

        if let Err(code) = self.driver.swap_interval(display, self.settings.swap_interval) {
            log::warn!(
                "eglSwapInterval({}) failed ({code}).",
                self.settings.swap_interval
            );
        }
        Ok(surface)
    }

    fn refresh_color_target(&mut self) -> Result<(), ContextError> {
        if self.color_target.is_none() {
            log::debug!("Creating sRGB emulation target.");
            self.color_target = Some(self.functions.create_color_target()?);
        }
        match self.color_target.as_mut() {
            Some(target) => target.refresh(self.size),
            None => Ok(()),
        }
    }

    /// Swaps the window surface, blitting the emulation target first when
    /// there is one.
    ///
    /// # Panics
    ///
    /// Panics if there is no current surface. Callers must only present after
    /// a successful [`make_current`](Self::make_current) that produced one.
    pub fn present(&mut self) -> Result<(), ContextError> {
        let (display, surface) = match (&self.objects, self.surface) {
            (Some(objects), Some(surface)) => (objects.display, surface),
            _ => panic!("present called without an active render surface"),
        };

        if let Some(target) = self.color_target.as_mut() {
            target.blit();
        }
        self.driver
            .swap_buffers(display, surface)
            .map_err(|code| ContextError::Driver {
                call: "eglSwapBuffers",
                code,
            })?;
        if let Some(target) = self.color_target.as_mut() {
            target.after_present();
        }
        Ok(())
    }

    /// Tears everything down: emulation target, surface, surface adapter,
    /// context, display and thread state, in that order.
    ///
    /// Calling it again does nothing.
    pub fn release(&mut self) {
        let Some(objects) = self.objects.take() else {
            return;
        };
        log::info!("Releasing render context.");

        self.release_color_target();
        self.destroy_surface(objects.display);
        self.destroy_adapter();
        self.window = None;

        if let Err(code) = self.driver.destroy_context(objects.display, objects.context) {
            log::warn!("eglDestroyContext failed ({code}).");
        }
        if let Err(code) = self.driver.terminate(objects.display) {
            log::warn!("eglTerminate failed ({code}).");
        }
        if let Err(code) = self.driver.release_thread() {
            log::warn!("eglReleaseThread failed ({code}).");
        }
    }

    fn release_color_target(&mut self) {
        if let Some(mut target) = self.color_target.take() {
            target.release();
        }
    }

    fn destroy_surface(&mut self, display: D::Display) {
        let Some(surface) = self.surface.take() else {
            return;
        };
        // Nothing queued may still reference the surface.
        self.functions.finish();
        if let Err(code) = self.driver.make_current(display, None, None) {
            log::warn!("eglMakeCurrent(NONE) failed ({code}).");
        }
        if let Err(code) = self.driver.destroy_surface(display, surface) {
            log::warn!("eglDestroySurface failed ({code}).");
        }
    }

    fn destroy_adapter(&mut self) {
        if let Some(mut adapter) = self.adapter.take() {
            adapter.destroy();
        }
    }

    /// The GL function table. Only usable while the context is current on
    /// this thread.
    pub fn functions(&self) -> &D::Functions {
        &self.functions
    }

    /// Hook point before the context is used. Contexts are thread-confined,
    /// so there is nothing to acquire.
    pub fn lock(&self) {}

    pub fn unlock(&self) {}

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Native visual matching the chosen configuration.
    pub fn visual_id(&self) -> i32 {
        self.visual_id
    }

    pub fn has_native_srgb(&self) -> bool {
        self.native_srgb
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_emulating(&self) -> bool {
        self.color_target.is_some()
    }

    pub fn is_released(&self) -> bool {
        self.objects.is_none()
    }

    /// Size of the window as of the last `make_current`.
    pub fn size(&self) -> WindowSize {
        self.size
    }
}

impl<D: GraphicsDriver> Drop for RenderContext<D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: GraphicsDriver> fmt::Debug for RenderContext<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("visual_id", &self.visual_id)
            .field("native_srgb", &self.native_srgb)
            .field("window", &self.window)
            .field("size", &self.size)
            .field("surface", &self.surface)
            .field("emulating", &self.is_emulating())
            .field("released", &self.is_released())
            .finish()
    }
}
