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

// Lucent Sandbox
// Opens one window, shades it from the pointer position and logs its events.

use anyhow::Result;
use lucent_sdk::prelude::*;
use std::thread;

/// Size of the marker drawn under the pointer, in dp.
const MARKER_DP: f32 = 24.0;

#[derive(Default)]
struct SandboxApp {
    pointer: Point,
    pressed: bool,
    scroll: f32,
}

impl Application for SandboxApp {
    fn handle_event(&mut self, event: &TypedEvent) {
        if let TypedEvent::Pointer(pointer) = event {
            self.pointer = pointer.position;
            match pointer.kind {
                PointerKind::Press => self.pressed = true,
                PointerKind::Release => self.pressed = false,
                PointerKind::Move => {}
            }
            if let Some(scroll) = pointer.scroll {
                self.scroll = (self.scroll + scroll.y / 100.0).clamp(0.0, 1.0);
            }
        }
    }

    fn draw(&mut self, gl: &GlowFunctions, frame: &FrameInfo) -> Result<()> {
        let size = frame.size;
        let red = self.pointer.x / size.width.max(1) as f32;
        let green = self.pointer.y / size.height.max(1) as f32;
        unsafe {
            gl.disable(glow::SCISSOR_TEST);
            gl.viewport(0, 0, size.width as i32, size.height as i32);
            gl.clear_color(red.clamp(0.0, 1.0), green.clamp(0.0, 1.0), self.scroll, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            if self.pressed {
                let marker = frame.config.px(MARKER_DP) as i32;
                let x = self.pointer.x as i32 - marker / 2;
                // GL's origin is bottom-left, pointer coordinates are top-left.
                let y = size.height as i32 - self.pointer.y as i32 - marker / 2;
                gl.enable(glow::SCISSOR_TEST);
                gl.scissor(x, y, marker, marker);
                gl.clear_color(1.0, 1.0, 1.0, 1.0);
                gl.clear(glow::COLOR_BUFFER_BIT);
                gl.disable(glow::SCISSOR_TEST);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => SdkSettings::from_json_file(path)?,
        None => SdkSettings::default(),
    };

    let bus = EventBus::<TypedEvent>::new();
    let receiver = bus.receiver().clone();
    let observer = thread::Builder::new()
        .name("sandbox-observer".to_string())
        .spawn(move || {
            for event in receiver.iter() {
                match event {
                    TypedEvent::Pointer(pointer) if pointer.scroll.is_some() => {
                        log::info!("Scrolled by {:?}", pointer.scroll);
                    }
                    TypedEvent::Stage(stage) => log::info!("Window stage: {:?}", stage.stage),
                    TypedEvent::CloseRequest => log::info!("Window close requested."),
                    other => log::trace!("{other:?}"),
                }
            }
        })?;

    let window = WindowBuilder::from_settings(settings)
        .with_event_sender(bus.sender())
        .spawn(SandboxApp::default)?;
    drop(bus);

    let exit = window.join()?;
    log::info!("Window closed: {exit:?}");
    let _ = observer.join();
    Ok(())
}
