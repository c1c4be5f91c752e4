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

//! Defines the error types of the render context.

use std::fmt;

/// An error code reported by the graphics driver (`eglGetError`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeErrorCode(pub i32);

impl fmt::Display for NativeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// An error raised while creating, binding or presenting a render context.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextError {
    /// The display, configuration or context could not be set up.
    /// The window cannot be rendered to.
    Setup {
        /// What was being set up.
        reason: String,
        /// The driver's error code, when the driver reported one.
        code: Option<NativeErrorCode>,
    },
    /// The window surface could not be (re)created. The window stays usable
    /// and the next resize retries.
    Surface {
        reason: String,
        code: Option<NativeErrorCode>,
    },
    /// A driver call failed at runtime.
    Driver {
        /// The failing driver entry point.
        call: &'static str,
        code: NativeErrorCode,
    },
    /// The context was used after it was released.
    Released,
}

impl ContextError {
    pub fn setup(reason: impl Into<String>) -> Self {
        ContextError::Setup {
            reason: reason.into(),
            code: None,
        }
    }

    pub fn setup_with_code(reason: impl Into<String>, code: NativeErrorCode) -> Self {
        ContextError::Setup {
            reason: reason.into(),
            code: Some(code),
        }
    }

    pub fn surface(reason: impl Into<String>) -> Self {
        ContextError::Surface {
            reason: reason.into(),
            code: None,
        }
    }

    pub fn surface_with_code(reason: impl Into<String>, code: NativeErrorCode) -> Self {
        ContextError::Surface {
            reason: reason.into(),
            code: Some(code),
        }
    }

    /// The driver's error code, if any.
    pub fn native_code(&self) -> Option<NativeErrorCode> {
        match self {
            ContextError::Setup { code, .. } | ContextError::Surface { code, .. } => *code,
            ContextError::Driver { code, .. } => Some(*code),
            ContextError::Released => None,
        }
    }

    /// Whether the context can no longer be used after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ContextError::Setup { .. } | ContextError::Released)
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Setup { reason, code: None } => {
                write!(f, "Render context setup failed: {reason}")
            }
            ContextError::Setup {
                reason,
                code: Some(code),
            } => write!(f, "Render context setup failed: {reason} ({code})"),
            ContextError::Surface { reason, code: None } => {
                write!(f, "Render surface creation failed: {reason}")
            }
            ContextError::Surface {
                reason,
                code: Some(code),
            } => write!(f, "Render surface creation failed: {reason} ({code})"),
            ContextError::Driver { call, code } => write!(f, "{call} failed ({code})"),
            ContextError::Released => write!(f, "The render context has been released."),
        }
    }
}

impl std::error::Error for ContextError {}
