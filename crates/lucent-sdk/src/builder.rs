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

use crate::app::Application;
use crate::runner::AppRunner;
use crate::settings::SdkSettings;
use anyhow::{anyhow, Context, Result};
use lucent_core::event::{EventLoop, LoopExit, TypedEvent};
use lucent_core::platform::{NativeWindow, WindowError};
use lucent_core::renderer::RenderContext;
use lucent_core::ContextSettings;
use lucent_infra::{EglDriver, GlowFunctions, X11Window};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const WINDOW_THREAD_NAME: &str = "lucent-window";

/// A builder for windows running an [`Application`] on their own thread.
pub struct WindowBuilder {
    settings: SdkSettings,
    events: Option<flume::Sender<TypedEvent>>,
}

impl WindowBuilder {
    /// Creates a new `WindowBuilder` with default settings.
    pub fn new() -> Self {
        Self::from_settings(SdkSettings::default())
    }

    pub fn from_settings(settings: SdkSettings) -> Self {
        Self {
            settings,
            events: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.window.title = title.into();
        self
    }

    /// Sets the initial size, in device-independent pixels.
    pub fn with_size(mut self, width_dp: f32, height_dp: f32) -> Self {
        self.settings.window.width_dp = width_dp;
        self.settings.window.height_dp = height_dp;
        self
    }

    /// Sets the pixel densities for dp and sp units.
    pub fn with_scale(mut self, px_per_dp: f32, px_per_sp: f32) -> Self {
        self.settings.window.px_per_dp = px_per_dp;
        self.settings.window.px_per_sp = px_per_sp;
        self
    }

    pub fn with_context_settings(mut self, context: ContextSettings) -> Self {
        self.settings.context = context;
        self
    }

    /// Mirrors the window's typed events to `sender`.
    pub fn with_event_sender(mut self, sender: flume::Sender<TypedEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn settings(&self) -> &SdkSettings {
        &self.settings
    }

    /// Spawns the window thread and waits until the window and its render
    /// context exist.
    ///
    /// ## Arguments
    /// * `make_app` - Builds the application on the window thread, once the
    ///   window is ready.
    ///
    /// ## Returns
    /// A handle signalling when the window's event loop has finished, or the
    /// error that prevented the window from being created.
    pub fn spawn<A, M>(self, make_app: M) -> Result<WindowHandle>
    where
        A: Application<GlowFunctions> + 'static,
        M: FnOnce() -> A + Send + 'static,
    {
        let Self { settings, events } = self;
        log::info!(
            "Spawning window '{}' ({}x{} dp).",
            settings.window.title,
            settings.window.width_dp,
            settings.window.height_dp
        );

        let (ready_tx, ready_rx) = flume::bounded::<Result<(), WindowError>>(1);
        let (exit_tx, exit_rx) = flume::bounded::<LoopExit>(1);

        let thread = thread::Builder::new()
            .name(WINDOW_THREAD_NAME.to_string())
            .spawn(move || {
                let (window, context) = match open_window(&settings) {
                    Ok(parts) => parts,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let mut runner =
                    AppRunner::new(make_app(), context, settings.max_present_failures)
                        .with_event_sender(events);
                let exit = EventLoop::new(window).run(&mut runner);
                drop(runner);
                let _ = exit_tx.send(exit);
            })
            .map_err(|e| WindowError::Spawn(e.to_string()))
            .context("Failed to spawn the window thread")?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(WindowHandle {
                thread: Some(thread),
                exit_rx,
                exit: None,
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(anyhow::Error::new(e).context("Window creation failed"))
            }
            Err(_) => {
                let _ = thread.join();
                Err(anyhow!("The window thread stopped before the window was ready"))
            }
        }
    }
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens the native window and creates its render context. Runs on the
/// window thread.
fn open_window(
    settings: &SdkSettings,
) -> Result<(X11Window, RenderContext<EglDriver>), WindowError> {
    let window = X11Window::open(&settings.window)?;
    let driver = EglDriver::load()?;
    let context = RenderContext::create(driver, window.display(), settings.context.clone())?;
    Ok((window, context))
}

/// Completion signal of a spawned window.
#[derive(Debug)]
pub struct WindowHandle {
    thread: Option<JoinHandle<()>>,
    exit_rx: flume::Receiver<LoopExit>,
    exit: Option<LoopExit>,
}

impl WindowHandle {
    /// Waits up to `timeout` for the event loop to finish.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<LoopExit> {
        if self.exit.is_none() {
            self.exit = self.exit_rx.recv_timeout(timeout).ok();
        }
        self.exit
    }

    pub fn is_finished(&self) -> bool {
        self.exit.is_some() || self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Blocks until the window has closed and its thread has ended.
    pub fn join(mut self) -> Result<LoopExit> {
        let exit = match self.exit {
            Some(exit) => Some(exit),
            None => self.exit_rx.recv().ok(),
        };
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| anyhow!("The window thread panicked"))?;
        }
        exit.ok_or_else(|| anyhow!("The window thread ended without reporting how"))
    }
}
