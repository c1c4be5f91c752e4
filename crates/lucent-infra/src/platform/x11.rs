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

//! An Xlib window, loaded at runtime through `x11-dl`.
//!
//! The window, its display connection and every Xlib call stay on the thread
//! that opened it. Raw events are decoded into [`NativeEvent`]s through the
//! `#[repr(C)]` layout of the `XEvent` union.

use lucent_core::event::{ButtonEvent, MotionEvent, NativeEvent, WindowBackend};
use lucent_core::platform::{
    DisplayConfig, NativeDisplayHandle, NativeWindow, NativeWindowHandle, SurfaceBackend,
    WindowBinding, WindowError, WindowSize, WindowStage,
};
use lucent_core::WindowSettings;
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WindowHandle, XlibDisplayHandle, XlibWindowHandle,
};
use std::ffi::{c_int, c_long, c_uint, c_ulong, CString};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::OnceLock;
use std::time::Duration;
use x11_dl::xlib::{self, Xlib};

// XKBlib.h
const XKB_USE_CORE_KBD: c_uint = 0x0100;
const XKB_ALL_EVENTS_MASK: c_ulong = 0x0fff;
const XKB_MAJOR_VERSION: c_int = 1;
const XKB_MINOR_VERSION: c_int = 0;

const EVENT_MASK: c_long = xlib::ExposureMask
    | xlib::KeyPressMask
    | xlib::KeyReleaseMask
    | xlib::ButtonPressMask
    | xlib::ButtonReleaseMask
    | xlib::PointerMotionMask
    | xlib::StructureNotifyMask;

static XLIB_THREADS: OnceLock<Result<(), WindowError>> = OnceLock::new();

/// Enables Xlib thread support, once per process.
///
/// The first result is cached; later calls return it without touching Xlib.
pub fn init_threads(xlib: &Xlib) -> Result<(), WindowError> {
    XLIB_THREADS
        .get_or_init(|| {
            if unsafe { (xlib.XInitThreads)() } == 0 {
                Err(WindowError::ThreadInit)
            } else {
                log::debug!("Xlib thread support enabled.");
                Ok(())
            }
        })
        .clone()
}

struct CreatedWindow {
    window: xlib::Window,
    screen: c_int,
    delete_atom: xlib::Atom,
    xkb_event: c_int,
}

/// An X11 window and the display connection it lives on.
pub struct X11Window {
    xlib: Xlib,
    display: *mut xlib::Display,
    screen: c_int,
    window: xlib::Window,
    delete_atom: xlib::Atom,
    xkb_event: c_int,
    size: WindowSize,
    stage: WindowStage,
    config: DisplayConfig,
    backend: SurfaceBackend,
    window_alive: bool,
    display_open: bool,
}

impl X11Window {
    /// Connects to the default display and opens a mapped window.
    ///
    /// # Errors
    /// * [`WindowError::LibraryLoad`] if libX11 is missing.
    /// * [`WindowError::ThreadInit`] if Xlib thread support cannot be enabled.
    /// * [`WindowError::Connect`] if no display is reachable.
    /// * [`WindowError::ExtensionUnsupported`] if the server lacks XKEYBOARD.
    pub fn open(settings: &WindowSettings) -> Result<Self, WindowError> {
        let xlib = Xlib::open().map_err(|e| WindowError::LibraryLoad(format!("libX11: {e}")))?;
        init_threads(&xlib)?;

        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
        if display.is_null() {
            return Err(WindowError::Connect);
        }

        let config = settings.display_config();
        let size = settings.initial_size();
        if size.is_empty() {
            log::warn!(
                "Initial window size {}x{} is empty, creating it at least 1x1.",
                size.width,
                size.height
            );
        }
        let created = match unsafe { Self::create_window(&xlib, display, &settings.title, size) } {
            Ok(created) => created,
            Err(err) => {
                unsafe { (xlib.XCloseDisplay)(display) };
                return Err(err);
            }
        };

        log::info!(
            "X11 window {:#x} created: '{}' ({}x{}).",
            created.window,
            settings.title,
            size.width,
            size.height
        );

        Ok(Self {
            xlib,
            display,
            screen: created.screen,
            window: created.window,
            delete_atom: created.delete_atom,
            xkb_event: created.xkb_event,
            size,
            stage: WindowStage::Created,
            config,
            backend: SurfaceBackend::Direct,
            window_alive: true,
            display_open: true,
        })
    }

    /// # Safety
    /// `display` must be an open connection obtained from `xlib`.
    unsafe fn create_window(
        xlib: &Xlib,
        display: *mut xlib::Display,
        title: &str,
        size: WindowSize,
    ) -> Result<CreatedWindow, WindowError> {
        let delete_atom = (xlib.XInternAtom)(display, c"WM_DELETE_WINDOW".as_ptr(), xlib::False);

        let (mut opcode, mut xkb_event, mut xkb_error) = (0, 0, 0);
        let (mut major, mut minor) = (XKB_MAJOR_VERSION, XKB_MINOR_VERSION);
        let supported = (xlib.XkbQueryExtension)(
            display,
            &mut opcode,
            &mut xkb_event,
            &mut xkb_error,
            &mut major,
            &mut minor,
        );
        if supported == xlib::False {
            return Err(WindowError::ExtensionUnsupported("XKEYBOARD"));
        }
        (xlib.XkbSelectEvents)(
            display,
            XKB_USE_CORE_KBD as _,
            XKB_ALL_EVENTS_MASK as _,
            XKB_ALL_EVENTS_MASK as _,
        );
        log::debug!("XKEYBOARD {major}.{minor}, event base {xkb_event}.");

        let screen = (xlib.XDefaultScreen)(display);
        let root = (xlib.XDefaultRootWindow)(display);
        let mut attributes: xlib::XSetWindowAttributes = mem::zeroed();
        attributes.event_mask = EVENT_MASK;
        let window = (xlib.XCreateWindow)(
            display,
            root,
            0,
            0,
            size.width.max(1),
            size.height.max(1),
            0,
            xlib::CopyFromParent as c_int,
            xlib::InputOutput as c_uint,
            ptr::null_mut(),
            xlib::CWEventMask as c_ulong,
            &mut attributes,
        );

        let mut redirect: xlib::XSetWindowAttributes = mem::zeroed();
        redirect.override_redirect = xlib::False;
        (xlib.XChangeWindowAttributes)(
            display,
            window,
            xlib::CWOverrideRedirect as c_ulong,
            &mut redirect,
        );

        let mut hints: xlib::XWMHints = mem::zeroed();
        hints.flags = xlib::InputHint;
        hints.input = xlib::True;
        (xlib.XSetWMHints)(display, window, &mut hints);

        (xlib.XMapWindow)(display, window);
        store_name(xlib, display, window, title);

        let mut protocols = [delete_atom];
        (xlib.XSetWMProtocols)(display, window, protocols.as_mut_ptr(), 1);

        Ok(CreatedWindow {
            window,
            screen,
            delete_atom,
            xkb_event,
        })
    }

    pub fn set_title(&self, title: &str) {
        if self.window_alive {
            unsafe { store_name(&self.xlib, self.display, self.window, title) };
        }
    }

    /// Asks the window manager for a new size. The stored size follows once
    /// the configure notification arrives.
    pub fn resize(&self, size: WindowSize) {
        if !self.window_alive {
            return;
        }
        let mut changes: xlib::XWindowChanges = unsafe { mem::zeroed() };
        changes.width = size.width as c_int;
        changes.height = size.height as c_int;
        unsafe {
            (self.xlib.XConfigureWindow)(
                self.display,
                self.window,
                (xlib::CWWidth | xlib::CWHeight) as c_uint,
                &mut changes,
            );
        }
    }

    pub fn show(&self) {
        if self.window_alive {
            unsafe { (self.xlib.XMapWindow)(self.display, self.window) };
        }
    }

    /// Sends queued requests to the server.
    pub fn flush(&self) {
        if self.display_open {
            unsafe { (self.xlib.XFlush)(self.display) };
        }
    }

    pub fn xid(&self) -> xlib::Window {
        self.window
    }
}

unsafe fn store_name(xlib: &Xlib, display: *mut xlib::Display, window: xlib::Window, title: &str) {
    let title = CString::new(title.replace('\0', "")).unwrap_or_default();
    (xlib.XStoreName)(display, window, title.as_ptr());
}

/// Decodes one raw event. `xkb_event` is the XKEYBOARD event base.
pub fn decode_event(event: &xlib::XEvent, xkb_event: c_int) -> NativeEvent {
    let kind = event.get_type();
    match kind {
        xlib::ButtonPress | xlib::ButtonRelease => {
            let raw = unsafe { event.button };
            let button = ButtonEvent {
                button: raw.button,
                x: raw.x,
                y: raw.y,
                state: raw.state,
                time: Duration::from_millis(raw.time as u64),
            };
            if kind == xlib::ButtonPress {
                NativeEvent::ButtonPress(button)
            } else {
                NativeEvent::ButtonRelease(button)
            }
        }
        xlib::MotionNotify => {
            let raw = unsafe { event.motion };
            NativeEvent::Motion(MotionEvent {
                x: raw.x,
                y: raw.y,
                time: Duration::from_millis(raw.time as u64),
            })
        }
        xlib::Expose => NativeEvent::Expose,
        xlib::ConfigureNotify => {
            let raw = unsafe { event.configure };
            NativeEvent::Configure {
                width: raw.width.max(0) as u32,
                height: raw.height.max(0) as u32,
            }
        }
        xlib::ClientMessage => {
            let raw = unsafe { event.client_message };
            NativeEvent::ClientMessage {
                data: raw.data.get_long(0) as u64,
            }
        }
        xlib::KeyPress => NativeEvent::KeyPress,
        xlib::KeyRelease => NativeEvent::KeyRelease,
        xlib::DestroyNotify => NativeEvent::Destroyed,
        other if other == xkb_event => NativeEvent::KeyboardState,
        other => NativeEvent::Unknown(other),
    }
}

impl NativeWindow for X11Window {
    fn display(&self) -> NativeDisplayHandle {
        NativeDisplayHandle::new(self.display.cast())
    }

    fn native_window(&self, _visual_id: i32) -> WindowBinding {
        match NativeWindowHandle::new(self.window as usize) {
            Some(handle) if self.window_alive => WindowBinding::visible(handle, self.size),
            _ => WindowBinding::hidden(self.size),
        }
    }

    fn surface_backend(&self) -> &SurfaceBackend {
        &self.backend
    }

    fn size(&self) -> WindowSize {
        self.size
    }

    fn stage(&self) -> WindowStage {
        self.stage
    }

    fn display_config(&self) -> DisplayConfig {
        self.config
    }
}

impl WindowBackend for X11Window {
    fn next_event(&mut self) -> NativeEvent {
        let mut raw: xlib::XEvent = unsafe { mem::zeroed() };
        unsafe { (self.xlib.XNextEvent)(self.display, &mut raw) };
        let event = decode_event(&raw, self.xkb_event);
        if event == NativeEvent::Destroyed {
            self.window_alive = false;
        }
        event
    }

    fn delete_atom(&self) -> u64 {
        self.delete_atom as u64
    }

    fn set_size(&mut self, size: WindowSize) {
        self.size = size;
    }

    fn set_stage(&mut self, stage: WindowStage) {
        log::debug!("X11 window {:#x}: {:?} -> {stage:?}.", self.window, self.stage);
        self.stage = stage;
    }

    fn destroy_window(&mut self) {
        if self.window_alive && self.display_open {
            unsafe { (self.xlib.XDestroyWindow)(self.display, self.window) };
        }
        self.window_alive = false;
    }

    fn close_display(&mut self) {
        if self.display_open {
            unsafe { (self.xlib.XCloseDisplay)(self.display) };
            log::info!("X11 display connection closed.");
        }
        self.display_open = false;
    }
}

impl Drop for X11Window {
    fn drop(&mut self) {
        self.destroy_window();
        self.close_display();
    }
}

impl HasWindowHandle for X11Window {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        if !self.window_alive {
            return Err(HandleError::Unavailable);
        }
        let raw = RawWindowHandle::Xlib(XlibWindowHandle::new(self.window));
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl HasDisplayHandle for X11Window {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        if !self.display_open {
            return Err(HandleError::Unavailable);
        }
        let raw = RawDisplayHandle::Xlib(XlibDisplayHandle::new(
            NonNull::new(self.display.cast()),
            self.screen,
        ));
        Ok(unsafe { DisplayHandle::borrow_raw(raw) })
    }
}

impl fmt::Debug for X11Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11Window")
            .field("window", &format_args!("{:#x}", self.window))
            .field("size", &self.size)
            .field("stage", &self.stage)
            .field("window_alive", &self.window_alive)
            .field("display_open", &self.display_open)
            .finish()
    }
}
