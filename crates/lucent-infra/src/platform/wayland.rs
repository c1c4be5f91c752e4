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

//! `libwayland-egl`, loaded at runtime, as a [`CompositorApi`].

use lucent_core::platform::{
    CompositorApi, NativeSurfaceHandle, NativeWindowHandle, WindowError, WindowSize,
};
use lucent_core::renderer::ContextError;
use std::ffi::{c_int, c_void, OsStr};
use std::fmt;

type CreateFn = unsafe extern "C" fn(*mut c_void, c_int, c_int) -> *mut c_void;
type ResizeFn = unsafe extern "C" fn(*mut c_void, c_int, c_int, c_int, c_int);
type DestroyFn = unsafe extern "C" fn(*mut c_void);

/// Entry points of `libwayland-egl`.
pub struct WaylandEglLibrary {
    create: CreateFn,
    resize: ResizeFn,
    destroy: DestroyFn,
    // Keeps the entry points above valid.
    _library: libloading::Library,
}

impl WaylandEglLibrary {
    pub const LIBRARY_NAME: &'static str = "libwayland-egl.so.1";

    pub fn open() -> Result<Self, WindowError> {
        Self::open_path(Self::LIBRARY_NAME)
    }

    /// Loads the library from `path` and resolves its entry points.
    pub fn open_path(path: impl AsRef<OsStr>) -> Result<Self, WindowError> {
        let path = path.as_ref();
        let load_error =
            |e: libloading::Error| WindowError::LibraryLoad(format!("{}: {e}", path.to_string_lossy()));

        unsafe {
            let library = libloading::Library::new(path).map_err(load_error)?;
            let create = *library
                .get::<CreateFn>(b"wl_egl_window_create\0")
                .map_err(load_error)?;
            let resize = *library
                .get::<ResizeFn>(b"wl_egl_window_resize\0")
                .map_err(load_error)?;
            let destroy = *library
                .get::<DestroyFn>(b"wl_egl_window_destroy\0")
                .map_err(load_error)?;
            log::debug!("Loaded {}.", path.to_string_lossy());
            Ok(Self {
                create,
                resize,
                destroy,
                _library: library,
            })
        }
    }
}

fn dimension(value: u32) -> c_int {
    c_int::try_from(value).unwrap_or(c_int::MAX)
}

impl CompositorApi for WaylandEglLibrary {
    fn create_window(
        &self,
        surface: NativeWindowHandle,
        size: WindowSize,
    ) -> Result<NativeSurfaceHandle, ContextError> {
        let window =
            unsafe { (self.create)(surface.as_ptr(), dimension(size.width), dimension(size.height)) };
        if window.is_null() {
            return Err(ContextError::surface("wl_egl_window_create failed"));
        }
        Ok(NativeSurfaceHandle::new(window))
    }

    fn resize_window(&self, window: NativeSurfaceHandle, size: WindowSize) {
        unsafe {
            (self.resize)(
                window.as_ptr(),
                dimension(size.width),
                dimension(size.height),
                0,
                0,
            )
        };
    }

    fn destroy_window(&self, window: NativeSurfaceHandle) {
        unsafe { (self.destroy)(window.as_ptr()) };
    }
}

impl fmt::Debug for WaylandEglLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaylandEglLibrary").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_a_load_error() {
        match WaylandEglLibrary::open_path("/nonexistent/libwayland-egl.so.1") {
            Err(WindowError::LibraryLoad(msg)) => {
                assert!(msg.starts_with("/nonexistent/libwayland-egl.so.1"), "{msg}");
            }
            other => panic!("Expected a library load error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_dimensions_saturate() {
        assert_eq!(dimension(640), 640);
        assert_eq!(dimension(u32::MAX), c_int::MAX);
    }
}
