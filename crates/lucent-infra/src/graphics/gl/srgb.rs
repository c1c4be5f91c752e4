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

//! sRGB emulation for configurations without an sRGB window surface.
//!
//! The application renders into an `SRGB8_ALPHA8` texture. On present the
//! texture is drawn over the window framebuffer with a shader that applies
//! the sRGB transfer function.

use glow::HasContext;
use lucent_core::platform::WindowSize;
use lucent_core::renderer::{ColorEmulationTarget, ContextError};
use std::rc::Rc;

const BLIT_VERTEX_SHADER: &str = r#"#version 100
attribute vec2 pos;
attribute vec2 uv;

varying vec2 vUV;

void main() {
    gl_Position = vec4(pos, 0.0, 1.0);
    vUV = uv;
}
"#;

const BLIT_FRAGMENT_SHADER: &str = r#"#version 100
precision mediump float;

uniform sampler2D tex;
varying vec2 vUV;

vec3 encode_srgb(vec3 linear) {
    vec3 curve = vec3(1.055) * pow(linear, vec3(1.0 / 2.4)) - vec3(0.055);
    vec3 toe = linear * vec3(12.92);
    bvec3 low = lessThan(linear, vec3(0.0031308));
    return vec3(
        low.r ? toe.r : curve.r,
        low.g ? toe.g : curve.g,
        low.b ? toe.b : curve.b
    );
}

void main() {
    vec4 color = texture2D(tex, vUV);
    gl_FragColor = vec4(encode_srgb(color.rgb), color.a);
}
"#;

/// Full-screen triangle strip: `pos.xy, uv.xy` per vertex.
const BLIT_QUAD: [f32; 16] = [
    -1.0, 1.0, 0.0, 1.0, //
    1.0, 1.0, 1.0, 1.0, //
    -1.0, -1.0, 0.0, 0.0, //
    1.0, -1.0, 1.0, 0.0, //
];
const QUAD_STRIDE: i32 = 4 * std::mem::size_of::<f32>() as i32;
const ATTRIB_POS: u32 = 0;
const ATTRIB_UV: u32 = 1;

struct BlitPass {
    program: glow::Program,
    quad: glow::Buffer,
}

impl BlitPass {
    /// Compiles the gamma-encoding program and uploads the quad.
    fn compile(gl: &glow::Context) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program()?;
            let mut shaders = Vec::with_capacity(2);
            for (kind, source) in [
                (glow::VERTEX_SHADER, BLIT_VERTEX_SHADER),
                (glow::FRAGMENT_SHADER, BLIT_FRAGMENT_SHADER),
            ] {
                let compiled = gl.create_shader(kind).and_then(|shader| {
                    gl.shader_source(shader, source);
                    gl.compile_shader(shader);
                    if gl.get_shader_compile_status(shader) {
                        Ok(shader)
                    } else {
                        let log = gl.get_shader_info_log(shader);
                        gl.delete_shader(shader);
                        Err(compile_error(kind, &log))
                    }
                });
                match compiled {
                    Ok(shader) => {
                        gl.attach_shader(program, shader);
                        shaders.push(shader);
                    }
                    Err(e) => {
                        for shader in shaders {
                            gl.delete_shader(shader);
                        }
                        gl.delete_program(program);
                        return Err(e);
                    }
                }
            }
            gl.bind_attrib_location(program, ATTRIB_POS, "pos");
            gl.bind_attrib_location(program, ATTRIB_UV, "uv");
            gl.link_program(program);
            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }
            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("blit program link failed: {}", log.trim()));
            }

            gl.use_program(Some(program));
            let sampler = gl.get_uniform_location(program, "tex");
            gl.uniform_1_i32(sampler.as_ref(), 0);
            gl.use_program(None);

            let quad = match gl.create_buffer() {
                Ok(quad) => quad,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(quad));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&BLIT_QUAD),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self { program, quad })
        }
    }

    fn delete(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
            gl.delete_buffer(self.quad);
        }
    }
}

fn compile_error(kind: u32, log: &str) -> String {
    let stage = match kind {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    };
    format!("blit {stage} shader compilation failed: {}", log.trim())
}

/// An off-screen sRGB framebuffer and its blit pass.
pub struct SrgbFramebuffer {
    gl: Rc<glow::Context>,
    framebuffer: glow::Framebuffer,
    texture: glow::Texture,
    depth: Option<glow::Renderbuffer>,
    blit: BlitPass,
    size: WindowSize,
    released: bool,
}

impl SrgbFramebuffer {
    /// Allocates the framebuffer, its color texture and the blit program.
    /// Storage is sized by the first [`refresh`](ColorEmulationTarget::refresh).
    ///
    /// A blit program that fails to compile or link is a setup error.
    pub fn new(gl: Rc<glow::Context>) -> Result<Self, ContextError> {
        let blit = BlitPass::compile(&gl).map_err(ContextError::setup)?;
        unsafe {
            let framebuffer = match gl.create_framebuffer() {
                Ok(framebuffer) => framebuffer,
                Err(e) => {
                    blit.delete(&gl);
                    return Err(ContextError::setup(e));
                }
            };
            let texture = match gl.create_texture() {
                Ok(texture) => texture,
                Err(e) => {
                    gl.delete_framebuffer(framebuffer);
                    blit.delete(&gl);
                    return Err(ContextError::setup(e));
                }
            };
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl,
                framebuffer,
                texture,
                depth: None,
                blit,
                size: WindowSize::default(),
                released: false,
            })
        }
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }
}

impl ColorEmulationTarget for SrgbFramebuffer {
    fn refresh(&mut self, size: WindowSize) -> Result<(), ContextError> {
        if self.released {
            return Err(ContextError::Released);
        }
        self.size = size;
        let (width, height) = (size.width as i32, size.height as i32);
        let gl = &self.gl;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::SRGB8_ALPHA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            if let Some(depth) = self.depth.take() {
                gl.delete_renderbuffer(depth);
            }
            let depth = gl.create_renderbuffer().map_err(ContextError::setup)?;
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT16, width, height);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            self.depth = Some(depth);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(self.texture),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                return Err(ContextError::setup(format!(
                    "sRGB framebuffer incomplete ({width}x{height}), status {status:#x}"
                )));
            }
        }
        log::debug!("sRGB framebuffer sized to {width}x{height}.");
        Ok(())
    }

    fn blit(&mut self) {
        if self.released {
            return;
        }
        let pass = &self.blit;
        let gl = &self.gl;
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, self.size.width as i32, self.size.height as i32);
            gl.disable(glow::BLEND);
            gl.disable(glow::SCISSOR_TEST);
            gl.disable(glow::DEPTH_TEST);

            gl.use_program(Some(pass.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(pass.quad));
            gl.vertex_attrib_pointer_f32(ATTRIB_POS, 2, glow::FLOAT, false, QUAD_STRIDE, 0);
            gl.vertex_attrib_pointer_f32(
                ATTRIB_UV,
                2,
                glow::FLOAT,
                false,
                QUAD_STRIDE,
                2 * std::mem::size_of::<f32>() as i32,
            );
            gl.enable_vertex_attrib_array(ATTRIB_POS);
            gl.enable_vertex_attrib_array(ATTRIB_UV);
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
            gl.disable_vertex_attrib_array(ATTRIB_POS);
            gl.disable_vertex_attrib_array(ATTRIB_UV);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.use_program(None);

            // The off-screen contents are not needed after the blit.
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer));
            gl.invalidate_framebuffer(
                glow::FRAMEBUFFER,
                &[glow::COLOR_ATTACHMENT0, glow::DEPTH_ATTACHMENT],
            );
        }
    }

    fn after_present(&mut self) {
        if self.released {
            return;
        }
        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, Some(self.framebuffer))
        };
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let gl = &self.gl;
        self.blit.delete(gl);
        unsafe {
            if let Some(depth) = self.depth.take() {
                gl.delete_renderbuffer(depth);
            }
            gl.delete_framebuffer(self.framebuffer);
            gl.delete_texture(self.texture);
        }
        log::debug!("sRGB framebuffer released.");
    }
}
