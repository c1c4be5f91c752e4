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

//! Typed events delivered to the application.
//!
//! These are plain values: the event loop hands each one to the application
//! callback and waits for it to return before pulling the next native event.

use crate::platform::{DisplayConfig, WindowSize, WindowStage};
use std::time::Duration;

/// A position or a delta, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Press,
    Release,
    Move,
}

/// The class of device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// A pointer press, release or move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub source: PointerSource,
    pub position: Point,
    /// Scroll delta, only set on synthesized wheel moves.
    pub scroll: Option<Point>,
    /// Timestamp from the windowing system clock.
    pub time: Duration,
}

/// Carries the current window size and display scale.
///
/// This is also the redraw request: every `Resize` asks the application to
/// render a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    pub size: WindowSize,
    pub config: DisplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEvent {
    pub stage: WindowStage,
}

/// Everything the application receives from the event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedEvent {
    Pointer(PointerEvent),
    Resize(ResizeEvent),
    Stage(StageEvent),
    /// The window is about to go away, either because the user asked for it
    /// or because it was destroyed by someone else.
    CloseRequest,
}

impl TypedEvent {
    pub fn stage(stage: WindowStage) -> Self {
        TypedEvent::Stage(StageEvent { stage })
    }

    pub fn resize(size: WindowSize, config: DisplayConfig) -> Self {
        TypedEvent::Resize(ResizeEvent { size, config })
    }

    /// Whether the event can change what is on screen, and so must be
    /// followed by a redraw request.
    pub fn affects_content(&self) -> bool {
        matches!(self, TypedEvent::Pointer(_) | TypedEvent::Resize(_))
    }
}
