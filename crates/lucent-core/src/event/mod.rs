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


//! Typed events, their translation from native events, and the event loop.

mod bus;
mod event_loop;
mod native;
mod translate;
mod types;

pub use self::bus::EventBus;
pub use self::event_loop::{EventHandler, EventLoop, LoopControl, LoopExit, WindowBackend};
pub use self::native::{ButtonEvent, MotionEvent, NativeEvent};
pub use self::translate::{
    translate_button, translate_motion, BUTTON_PRIMARY, BUTTON_SCROLL_DOWN, BUTTON_SCROLL_UP,
    SCROLL_SCALE,
};
pub use self::types::{
    Point, PointerEvent, PointerKind, PointerSource, ResizeEvent, StageEvent, TypedEvent,
};
