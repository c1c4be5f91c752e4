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

use crate::renderer::ContextError;
use std::fmt;

/// An error that prevents a window from being created.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowError {
    /// The windowing library could not be made thread-safe.
    ThreadInit,
    /// No connection to the display server.
    Connect,
    /// A required protocol extension is missing.
    ExtensionUnsupported(&'static str),
    /// A system library could not be loaded or lacks a symbol.
    LibraryLoad(String),
    /// The render context for the window could not be created.
    Context(ContextError),
    /// The window thread could not be started.
    Spawn(String),
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::ThreadInit => write!(f, "XInitThreads failed"),
            WindowError::Connect => write!(f, "Failed to connect to the display server"),
            WindowError::ExtensionUnsupported(name) => {
                write!(f, "The {name} extension is not supported by the display server")
            }
            WindowError::LibraryLoad(msg) => write!(f, "Failed to load system library: {msg}"),
            WindowError::Context(err) => write!(f, "Window render context error: {err}"),
            WindowError::Spawn(msg) => write!(f, "Failed to start the window thread: {msg}"),
        }
    }
}

impl std::error::Error for WindowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WindowError::Context(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContextError> for WindowError {
    fn from(err: ContextError) -> Self {
        WindowError::Context(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn context_errors_are_chained() {
        let err: WindowError = ContextError::setup("eglInitialize failed").into();
        assert_eq!(
            format!("{err}"),
            "Window render context error: Render context setup failed: eglInitialize failed"
        );
        assert!(err.source().is_some());
        assert!(WindowError::Connect.source().is_none());
    }

    #[test]
    fn extension_error_names_the_extension() {
        assert_eq!(
            format!("{}", WindowError::ExtensionUnsupported("XKEYBOARD")),
            "The XKEYBOARD extension is not supported by the display server"
        );
    }
}
