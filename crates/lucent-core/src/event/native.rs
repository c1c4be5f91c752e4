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

use std::time::Duration;

/// Payload of a button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Platform button number (1 is the primary button).
    pub button: u32,
    pub x: i32,
    pub y: i32,
    /// Modifier and button state mask at the time of the event.
    pub state: u32,
    pub time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    pub x: i32,
    pub y: i32,
    pub time: Duration,
}

/// One platform event, decoded once when it is pulled off the display
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEvent {
    ButtonPress(ButtonEvent),
    ButtonRelease(ButtonEvent),
    Motion(MotionEvent),
    Expose,
    Configure { width: u32, height: u32 },
    /// A client message, identified by its first data word.
    ClientMessage { data: u64 },
    KeyPress,
    KeyRelease,
    /// Any event of the keyboard extension.
    KeyboardState,
    /// The window was destroyed.
    Destroyed,
    Unknown(i32),
}
