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

use anyhow::{Context, Result};
use lucent_core::{ContextSettings, WindowSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to open a window and run an application in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSettings {
    pub window: WindowSettings,
    pub context: ContextSettings,
    /// Consecutive failed presents after which the window is shut down.
    pub max_present_failures: u32,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            context: ContextSettings::default(),
            max_present_failures: 3,
        }
    }
}

impl SdkSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse SDK settings")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid settings in {}", path.display()))
    }
}
