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

//! The public-facing API of Lucent.
//!
//! Applications implement [`Application`] and hand a constructor to
//! [`WindowBuilder::spawn`]. The window, its render context and the
//! application then live on a dedicated thread until the window closes.

mod app;
mod builder;
mod runner;
mod settings;

pub use app::{Application, FrameInfo};
pub use builder::{WindowBuilder, WindowHandle};
pub use runner::AppRunner;
pub use settings::SdkSettings;

pub mod prelude {
    pub use crate::{Application, FrameInfo, SdkSettings, WindowBuilder, WindowHandle};
    pub use glow::HasContext;
    pub use lucent_core::event::{
        EventBus, LoopExit, Point, PointerEvent, PointerKind, ResizeEvent, TypedEvent,
    };
    pub use lucent_core::platform::{DisplayConfig, WindowSize, WindowStage};
    pub use lucent_infra::GlowFunctions;
}

/// Opens a window with `settings`, runs the application until the window
/// closes and reports why it did.
pub fn run<A, M>(settings: SdkSettings, make_app: M) -> anyhow::Result<lucent_core::event::LoopExit>
where
    A: Application + 'static,
    M: FnOnce() -> A + Send + 'static,
{
    WindowBuilder::from_settings(settings).spawn(make_app)?.join()
}
