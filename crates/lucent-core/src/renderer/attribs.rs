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

//! EGL attribute lists for configuration, context and surface creation.
//!
//! Lists are flat `key, value` pairs terminated by [`EGL_NONE`].

pub const EGL_NONE: i32 = 0x3038;
pub const EGL_ALPHA_SIZE: i32 = 0x3021;
pub const EGL_BLUE_SIZE: i32 = 0x3022;
pub const EGL_GREEN_SIZE: i32 = 0x3023;
pub const EGL_RED_SIZE: i32 = 0x3024;
pub const EGL_DEPTH_SIZE: i32 = 0x3025;
pub const EGL_CONFIG_CAVEAT: i32 = 0x3027;
pub const EGL_NATIVE_VISUAL_ID: i32 = 0x302e;
pub const EGL_SURFACE_TYPE: i32 = 0x3033;
pub const EGL_RENDERABLE_TYPE: i32 = 0x3040;
pub const EGL_CONTEXT_CLIENT_VERSION: i32 = 0x3098;
pub const EGL_WINDOW_BIT: i32 = 0x0004;
pub const EGL_OPENGL_ES2_BIT: i32 = 0x0004;
pub const EGL_GL_COLORSPACE_KHR: i32 = 0x309d;
pub const EGL_GL_COLORSPACE_SRGB_KHR: i32 = 0x3089;

/// Extension that adds the sRGB surface colorspace to EGL < 1.5.
pub const KHR_GL_COLORSPACE: &str = "EGL_KHR_gl_colorspace";

use crate::settings::ContextSettings;

/// Whether surfaces can be created with an sRGB colorspace.
///
/// EGL 1.5 has it in core; older versions need [`KHR_GL_COLORSPACE`].
pub fn supports_native_srgb(major: i32, minor: i32, extensions: &str) -> bool {
    major > 1
        || (major == 1 && minor >= 5)
        || extensions
            .split_whitespace()
            .any(|ext| ext == KHR_GL_COLORSPACE)
}

/// Attributes used to choose the framebuffer configuration.
///
/// Without native sRGB the color emulation target brings its own depth
/// buffer, so alpha and depth are only requested on the sRGB path.
pub fn config_attributes(native_srgb: bool, settings: &ContextSettings) -> Vec<i32> {
    let mut attribs = vec![
        EGL_RENDERABLE_TYPE,
        EGL_OPENGL_ES2_BIT,
        EGL_SURFACE_TYPE,
        EGL_WINDOW_BIT,
        EGL_BLUE_SIZE,
        8,
        EGL_GREEN_SIZE,
        8,
        EGL_RED_SIZE,
        8,
        EGL_CONFIG_CAVEAT,
        EGL_NONE,
    ];
    if native_srgb {
        if settings.mesa_alpha_workaround {
            attribs.extend_from_slice(&[EGL_ALPHA_SIZE, 1]);
        }
        attribs.extend_from_slice(&[EGL_DEPTH_SIZE, settings.depth_bits]);
    }
    attribs.push(EGL_NONE);
    attribs
}

pub fn context_attributes(settings: &ContextSettings) -> Vec<i32> {
    vec![EGL_CONTEXT_CLIENT_VERSION, settings.client_version, EGL_NONE]
}

pub fn surface_attributes(native_srgb: bool) -> Vec<i32> {
    let mut attribs = Vec::with_capacity(3);
    if native_srgb {
        attribs.extend_from_slice(&[EGL_GL_COLORSPACE_KHR, EGL_GL_COLORSPACE_SRGB_KHR]);
    }
    attribs.push(EGL_NONE);
    attribs
}

/// Looks up the value of `key` in a terminated attribute list.
pub fn attribute_value(attribs: &[i32], key: i32) -> Option<i32> {
    attribs
        .chunks_exact(2)
        .take_while(|pair| pair[0] != EGL_NONE)
        .find(|pair| pair[0] == key)
        .map(|pair| pair[1])
}
