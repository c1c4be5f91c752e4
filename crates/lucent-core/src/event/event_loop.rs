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

//! The per-window event loop.
//!
//! The loop blocks on the window's native event source, translates each event
//! and hands the result to an [`EventHandler`]. Anything that can change what
//! is on screen is followed by a redraw request (a [`TypedEvent::Resize`]).
//! The loop ends on the close protocol message, on out-of-band destruction
//! of the window, or when the handler asks for it.

use super::native::NativeEvent;
use super::translate::{translate_button, translate_motion};
use super::types::TypedEvent;
use crate::platform::{NativeWindow, WindowSize, WindowStage};

/// Returned by the handler after each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Why an event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopExit {
    /// The window manager delivered the close protocol message.
    CloseRequested,
    /// The window was destroyed by someone else.
    WindowDestroyed,
    /// The handler returned [`LoopControl::Exit`].
    HandlerExit,
}

/// The native side of a window, as driven by the [`EventLoop`].
///
/// Everything here is called on the thread that owns the window.
pub trait WindowBackend: NativeWindow {
    /// Blocks until the next native event arrives.
    fn next_event(&mut self) -> NativeEvent;

    /// The atom identifying the close protocol message.
    fn delete_atom(&self) -> u64;

    /// Records the size reported by a configure notification.
    fn set_size(&mut self, size: WindowSize);

    fn set_stage(&mut self, stage: WindowStage);

    fn destroy_window(&mut self);

    fn close_display(&mut self);
}

/// Receives the typed events of a window.
pub trait EventHandler {
    fn handle_event(&mut self, window: &dyn NativeWindow, event: TypedEvent) -> LoopControl;

    /// Called once after the loop stopped, while the window and its display
    /// connection are still alive.
    fn exiting(&mut self, _window: &dyn NativeWindow) {}
}

impl<F> EventHandler for F
where
    F: FnMut(&dyn NativeWindow, TypedEvent) -> LoopControl,
{
    fn handle_event(&mut self, window: &dyn NativeWindow, event: TypedEvent) -> LoopControl {
        self(window, event)
    }
}

/// Drives one window until it closes.
pub struct EventLoop<B: WindowBackend> {
    backend: B,
}

impl<B: WindowBackend> EventLoop<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the loop to completion and tears the window down.
    ///
    /// The handler first sees `Stage(Running)`. On exit it gets
    /// [`EventHandler::exiting`], then the window is destroyed (unless it
    /// already was) and the display connection closed.
    pub fn run<H: EventHandler>(mut self, handler: &mut H) -> LoopExit {
        self.backend.set_stage(WindowStage::Running);
        log::info!("Event loop running.");

        let mut exit = None;
        if self.dispatch(handler, TypedEvent::stage(WindowStage::Running)) == LoopControl::Exit {
            exit = Some(LoopExit::HandlerExit);
        }
        let exit = match exit {
            Some(exit) => exit,
            None => loop {
                let event = self.backend.next_event();
                if let Some(exit) = self.step(handler, event) {
                    break exit;
                }
            },
        };

        log::info!("Event loop stopped: {exit:?}.");
        self.teardown(handler, exit);
        exit
    }

    fn step<H: EventHandler>(&mut self, handler: &mut H, event: NativeEvent) -> Option<LoopExit> {
        let control = match event {
            NativeEvent::ButtonPress(button) => match translate_button(&button, true) {
                Some(pointer) => self.dispatch_visible(handler, TypedEvent::Pointer(pointer)),
                None => LoopControl::Continue,
            },
            NativeEvent::ButtonRelease(button) => match translate_button(&button, false) {
                Some(pointer) => self.dispatch_visible(handler, TypedEvent::Pointer(pointer)),
                None => LoopControl::Continue,
            },
            NativeEvent::Motion(motion) => {
                self.dispatch_visible(handler, TypedEvent::Pointer(translate_motion(&motion)))
            }
            NativeEvent::Expose => self.request_redraw(handler),
            NativeEvent::Configure { width, height } => {
                let size = WindowSize::new(width, height);
                if size == self.backend.size() {
                    LoopControl::Continue
                } else {
                    log::debug!("Window resized to {width}x{height}.");
                    self.backend.set_size(size);
                    self.request_redraw(handler)
                }
            }
            NativeEvent::ClientMessage { data } if data == self.backend.delete_atom() => {
                self.dispatch(handler, TypedEvent::CloseRequest);
                return Some(LoopExit::CloseRequested);
            }
            NativeEvent::Destroyed => {
                log::warn!("Window destroyed while its event loop was running.");
                self.dispatch(handler, TypedEvent::CloseRequest);
                return Some(LoopExit::WindowDestroyed);
            }
            NativeEvent::ClientMessage { .. }
            | NativeEvent::KeyPress
            | NativeEvent::KeyRelease
            | NativeEvent::KeyboardState
            | NativeEvent::Unknown(_) => {
                log::trace!("Ignoring native event {event:?}.");
                LoopControl::Continue
            }
        };

        match control {
            LoopControl::Continue => None,
            LoopControl::Exit => Some(LoopExit::HandlerExit),
        }
    }

    fn dispatch<H: EventHandler>(&mut self, handler: &mut H, event: TypedEvent) -> LoopControl {
        log::trace!("Dispatching {event:?}.");
        handler.handle_event(&self.backend, event)
    }

    /// Dispatches `event`, then asks for a redraw if it can change what is on
    /// screen.
    fn dispatch_visible<H: EventHandler>(
        &mut self,
        handler: &mut H,
        event: TypedEvent,
    ) -> LoopControl {
        match self.dispatch(handler, event) {
            LoopControl::Continue if event.affects_content() => self.request_redraw(handler),
            control => control,
        }
    }

    fn request_redraw<H: EventHandler>(&mut self, handler: &mut H) -> LoopControl {
        let event = TypedEvent::resize(self.backend.size(), self.backend.display_config());
        self.dispatch(handler, event)
    }

    fn teardown<H: EventHandler>(&mut self, handler: &mut H, exit: LoopExit) {
        handler.exiting(&self.backend);
        if exit != LoopExit::WindowDestroyed {
            self.backend.destroy_window();
        }
        self.backend.close_display();
        self.backend.set_stage(WindowStage::Destroyed);
    }
}
