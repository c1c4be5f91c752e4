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

//! Drives an [`Application`] from the typed events of one window.

use crate::app::{Application, FrameInfo};
use lucent_core::event::{EventHandler, LoopControl, ResizeEvent, TypedEvent};
use lucent_core::platform::NativeWindow;
use lucent_core::renderer::{GraphicsDriver, RenderContext};

/// The [`EventHandler`] of a window running an application.
///
/// Every redraw request binds the render context to the window, lets the
/// application draw and presents the frame. A present failure is logged;
/// after `max_present_failures` consecutive ones the context is released and
/// the loop asked to stop.
pub struct AppRunner<A, D: GraphicsDriver> {
    app: A,
    context: RenderContext<D>,
    events: Option<flume::Sender<TypedEvent>>,
    max_present_failures: u32,
    present_failures: u32,
    frames: u64,
}

impl<A, D> AppRunner<A, D>
where
    A: Application<D::Functions>,
    D: GraphicsDriver,
{
    pub fn new(app: A, context: RenderContext<D>, max_present_failures: u32) -> Self {
        Self {
            app,
            context,
            events: None,
            max_present_failures: max_present_failures.max(1),
            present_failures: 0,
            frames: 0,
        }
    }

    /// Mirrors every typed event to `sender`, for observers on other threads.
    pub fn with_event_sender(mut self, sender: Option<flume::Sender<TypedEvent>>) -> Self {
        self.events = sender;
        self
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn context(&self) -> &RenderContext<D> {
        &self.context
    }

    /// Frames presented or attempted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn mirror(&mut self, event: TypedEvent) {
        if let Some(sender) = &self.events {
            if sender.send(event).is_err() {
                log::debug!("Event observer disconnected, no longer mirroring events.");
                self.events = None;
            }
        }
    }

    fn redraw(&mut self, window: &dyn NativeWindow, resize: ResizeEvent) -> LoopControl {
        if let Err(e) = self.context.make_current(window) {
            if e.is_fatal() {
                log::error!("Render context unusable: {e}");
                return LoopControl::Exit;
            }
            log::warn!("Skipping frame: {e}");
            return LoopControl::Continue;
        }
        if !self.context.has_surface() {
            return LoopControl::Continue;
        }

        self.frames += 1;
        let frame = FrameInfo {
            size: self.context.size(),
            config: resize.config,
            number: self.frames,
        };
        if let Err(e) = self.app.draw(self.context.functions(), &frame) {
            log::error!("Frame {} failed to draw: {e:#}", frame.number);
        }

        match self.context.present() {
            Ok(()) => {
                self.present_failures = 0;
                LoopControl::Continue
            }
            Err(e) => {
                self.present_failures += 1;
                log::warn!(
                    "Present failed ({}/{}): {e}",
                    self.present_failures,
                    self.max_present_failures
                );
                if self.present_failures >= self.max_present_failures {
                    log::error!(
                        "{} consecutive present failures, shutting the window down.",
                        self.present_failures
                    );
                    self.context.release();
                    LoopControl::Exit
                } else {
                    LoopControl::Continue
                }
            }
        }
    }
}

impl<A, D> EventHandler for AppRunner<A, D>
where
    A: Application<D::Functions>,
    D: GraphicsDriver,
{
    fn handle_event(&mut self, window: &dyn NativeWindow, event: TypedEvent) -> LoopControl {
        log::trace!("Dispatching {event:?}");
        self.mirror(event);
        self.app.handle_event(&event);
        match event {
            TypedEvent::Resize(resize) => self.redraw(window, resize),
            TypedEvent::CloseRequest => {
                self.context.release();
                LoopControl::Continue
            }
            _ => LoopControl::Continue,
        }
    }

    fn exiting(&mut self, _window: &dyn NativeWindow) {
        self.context.release();
    }
}
