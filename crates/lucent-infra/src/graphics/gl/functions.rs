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

use super::srgb::SrgbFramebuffer;
use glow::HasContext;
use lucent_core::renderer::{ContextError, GlFunctions};
use std::cell::OnceCell;
use std::ffi::c_void;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

type Loader = Box<dyn Fn(&str) -> *const c_void>;

/// The GL function table handed to the application.
///
/// `glow` queries the GL version while loading, which needs a current
/// context, so the table is resolved on first use rather than at creation.
pub struct GlowFunctions {
    loader: Loader,
    gl: OnceCell<Rc<glow::Context>>,
}

impl GlowFunctions {
    /// Creates a table resolving entry points through `loader`.
    pub fn new(loader: impl Fn(&str) -> *const c_void + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            gl: OnceCell::new(),
        }
    }

    /// The `glow` context. The render context must be current.
    pub fn gl(&self) -> &glow::Context {
        self.shared()
    }

    fn shared(&self) -> &Rc<glow::Context> {
        self.gl.get_or_init(|| {
            let gl = unsafe { glow::Context::from_loader_function(|name| (self.loader)(name)) };
            log::info!("GL functions loaded: {:?}.", gl.version());
            Rc::new(gl)
        })
    }
}

impl Deref for GlowFunctions {
    type Target = glow::Context;

    fn deref(&self) -> &glow::Context {
        self.gl()
    }
}

impl GlFunctions for GlowFunctions {
    type ColorTarget = SrgbFramebuffer;

    fn finish(&self) {
        unsafe { self.gl().finish() };
    }

    fn create_color_target(&self) -> Result<SrgbFramebuffer, ContextError> {
        SrgbFramebuffer::new(Rc::clone(self.shared()))
    }
}

impl fmt::Debug for GlowFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowFunctions")
            .field("loaded", &self.gl.get().is_some())
            .finish()
    }
}
