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

//! Settings for windows and their render contexts.
//!
//! Every field has a default, so a settings file only needs to name what it
//! overrides.

use crate::platform::{DisplayConfig, WindowSize};
use serde::{Deserialize, Serialize};

/// Settings used when a native window is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Initial width in dp.
    pub width_dp: f32,
    /// Initial height in dp.
    pub height_dp: f32,
    pub px_per_dp: f32,
    pub px_per_sp: f32,
}

impl WindowSettings {
    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig::new(self.px_per_dp, self.px_per_sp)
    }

    /// The initial size in pixels.
    pub fn initial_size(&self) -> WindowSize {
        let config = self.display_config();
        WindowSize::new(config.px(self.width_dp), config.px(self.height_dp))
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Lucent".to_string(),
            width_dp: 800.0,
            height_dp: 600.0,
            px_per_dp: 1.0,
            px_per_sp: 1.0,
        }
    }
}

/// Settings used when a render context is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Client API version requested from the driver.
    pub client_version: i32,
    /// Driver-side vsync. Zero where the platform paces frames on its own.
    pub swap_interval: i32,
    /// Request an alpha channel on sRGB configurations. Mesa crashes without one.
    pub mesa_alpha_workaround: bool,
    /// Depth buffer bits for configurations rendering straight to the window.
    pub depth_bits: i32,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            client_version: 3,
            swap_interval: if cfg!(target_os = "windows") { 1 } else { 0 },
            mesa_alpha_workaround: cfg!(target_os = "linux"),
            depth_bits: 16,
        }
    }
}
