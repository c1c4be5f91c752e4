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

use super::surface::SurfaceBackend;
use raw_window_handle::RawWindowHandle;
use std::ffi::c_void;
use std::num::NonZeroUsize;

/// Lifecycle stage of a platform window. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowStage {
    Created,
    Running,
    Destroyed,
}

impl WindowStage {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// `Created -> Destroyed` is allowed for windows torn down before their
    /// loop ever ran.
    pub fn can_transition_to(self, next: WindowStage) -> bool {
        matches!(
            (self, next),
            (WindowStage::Created, WindowStage::Running)
                | (WindowStage::Running, WindowStage::Destroyed)
                | (WindowStage::Created, WindowStage::Destroyed)
        )
    }
}

/// Window dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Display scale configuration, carried by every resize event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    /// Pixels per device-independent pixel.
    pub px_per_dp: f32,
    /// Pixels per scaled (text) pixel.
    pub px_per_sp: f32,
}

impl DisplayConfig {
    pub const fn new(px_per_dp: f32, px_per_sp: f32) -> Self {
        Self {
            px_per_dp,
            px_per_sp,
        }
    }

    /// Converts a value in dp to whole pixels, rounding to nearest.
    pub fn px(&self, dp: f32) -> u32 {
        (dp * self.px_per_dp).round().max(0.0) as u32
    }

    /// Converts a value in sp to whole pixels, rounding to nearest.
    pub fn sp(&self, sp: f32) -> u32 {
        (sp * self.px_per_sp).round().max(0.0) as u32
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Identity of a native window: an XID on X11, a `wl_surface*` on a
/// compositor. Never zero; a missing window is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindowHandle(NonZeroUsize);

impl NativeWindowHandle {
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        Self::new(ptr as usize)
    }

    /// Extracts the window identity from a `raw-window-handle` value.
    ///
    /// Only the X11 and Wayland variants are understood.
    pub fn from_raw_window_handle(handle: &RawWindowHandle) -> Option<Self> {
        match handle {
            RawWindowHandle::Xlib(h) => Self::new(h.window as usize),
            RawWindowHandle::Xcb(h) => Self::new(h.window.get() as usize),
            RawWindowHandle::Wayland(h) => Self::from_ptr(h.surface.as_ptr()),
            _ => None,
        }
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.get() as *mut c_void
    }
}

/// Native display connection, borrowed from the window by the render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeDisplayHandle(*mut c_void);

impl NativeDisplayHandle {
    pub fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// What the driver receives when it creates a window surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeSurfaceHandle(*mut c_void);

impl NativeSurfaceHandle {
    pub fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// The window handle itself, reinterpreted as the surface type.
    pub fn from_window(window: NativeWindowHandle) -> Self {
        Self(window.as_ptr())
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// The window's answer to "what should I render into right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBinding {
    /// `None` while the window is hidden or minimized.
    pub handle: Option<NativeWindowHandle>,
    pub size: WindowSize,
}

impl WindowBinding {
    pub fn visible(handle: NativeWindowHandle, size: WindowSize) -> Self {
        Self {
            handle: Some(handle),
            size,
        }
    }

    pub fn hidden(size: WindowSize) -> Self {
        Self { handle: None, size }
    }
}

/// A platform window a render context can draw into.
///
/// Implementations are confined to the thread that created them.
pub trait NativeWindow {
    /// The display connection the window lives on.
    fn display(&self) -> NativeDisplayHandle;

    /// The current native handle and size.
    ///
    /// `visual_id` is the visual the render context's configuration needs.
    /// Platforms that create their windows late use it; X11 windows are
    /// created before the context and ignore it.
    fn native_window(&self, visual_id: i32) -> WindowBinding;

    /// How native handles of this window are turned into driver surfaces.
    fn surface_backend(&self) -> &SurfaceBackend;

    fn size(&self) -> WindowSize;

    fn stage(&self) -> WindowStage;

    fn display_config(&self) -> DisplayConfig;
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{WaylandWindowHandle, XcbWindowHandle, XlibWindowHandle};
    use std::num::NonZeroU32;
    use std::ptr::NonNull;

    #[test]
    fn stage_transitions() {
        assert!(WindowStage::Created.can_transition_to(WindowStage::Running));
        assert!(WindowStage::Running.can_transition_to(WindowStage::Destroyed));
        assert!(WindowStage::Created.can_transition_to(WindowStage::Destroyed));
        assert!(!WindowStage::Destroyed.can_transition_to(WindowStage::Running));
        assert!(!WindowStage::Running.can_transition_to(WindowStage::Created));
    }

    #[test]
    fn display_config_rounds_to_pixels() {
        let config = DisplayConfig::new(1.5, 2.0);
        assert_eq!(config.px(10.0), 15);
        assert_eq!(config.px(3.0), 5);
        assert_eq!(config.sp(3.3), 7);
        assert_eq!(config.px(-4.0), 0);
        assert_eq!(DisplayConfig::default().px(800.0), 800);
    }

    #[test]
    fn size_with_a_zero_side_is_empty() {
        assert!(WindowSize::default().is_empty());
        assert!(WindowSize::new(640, 0).is_empty());
        assert!(!WindowSize::new(1, 1).is_empty());
    }

    #[test]
    fn zero_window_handle_is_absent() {
        assert_eq!(NativeWindowHandle::new(0), None);
        assert_eq!(NativeWindowHandle::new(0x4200001).map(|h| h.get()), Some(0x4200001));
    }

    #[test]
    fn window_handle_from_raw_handles() {
        let xlib = RawWindowHandle::Xlib(XlibWindowHandle::new(0x1c00007));
        assert_eq!(
            NativeWindowHandle::from_raw_window_handle(&xlib).map(|h| h.get()),
            Some(0x1c00007)
        );

        let xcb = RawWindowHandle::Xcb(XcbWindowHandle::new(
            NonZeroU32::new(77).expect("non-zero"),
        ));
        assert_eq!(
            NativeWindowHandle::from_raw_window_handle(&xcb).map(|h| h.get()),
            Some(77)
        );

        let mut surface = 0u8;
        let ptr = NonNull::from(&mut surface).cast::<c_void>();
        let wayland = RawWindowHandle::Wayland(WaylandWindowHandle::new(ptr));
        assert_eq!(
            NativeWindowHandle::from_raw_window_handle(&wayland).map(|h| h.as_ptr()),
            Some(ptr.as_ptr())
        );

        let unset = RawWindowHandle::Xlib(XlibWindowHandle::new(0));
        assert_eq!(NativeWindowHandle::from_raw_window_handle(&unset), None);
    }

    #[test]
    fn surface_handle_reinterprets_window() {
        let window = NativeWindowHandle::new(0x99).expect("non-zero");
        assert_eq!(NativeSurfaceHandle::from_window(window).as_ptr() as usize, 0x99);
        assert!(NativeSurfaceHandle::null().is_null());
    }
}
