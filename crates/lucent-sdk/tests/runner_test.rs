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

use lucent_core::event::{
    EventHandler, LoopControl, Point, PointerEvent, PointerKind, PointerSource, TypedEvent,
};
use lucent_core::platform::{
    DisplayConfig, NativeDisplayHandle, NativeSurfaceHandle, NativeWindow, NativeWindowHandle,
    SurfaceBackend, WindowBinding, WindowSize, WindowStage,
};
use lucent_core::renderer::{
    ColorEmulationTarget, ContextError, DriverResult, GlFunctions, GraphicsDriver,
    NativeErrorCode, RenderContext,
};
use lucent_core::ContextSettings;
use lucent_sdk::{AppRunner, Application, FrameInfo};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

type CallLog = Rc<RefCell<Vec<String>>>;

// --- Mocks ---

/// A driver whose swaps fail on demand. Native sRGB unless `emulated`.
struct StubDriver {
    log: CallLog,
    fail_swap: Rc<Cell<bool>>,
    emulated: bool,
    fail_target: bool,
}

impl StubDriver {
    fn record(&self, call: impl Into<String>) {
        self.log.borrow_mut().push(call.into());
    }
}

impl GraphicsDriver for StubDriver {
    type Display = u8;
    type Config = u8;
    type Context = u8;
    type Surface = u8;
    type Functions = StubGl;

    fn get_display(&self, _native: NativeDisplayHandle) -> DriverResult<u8> {
        Ok(1)
    }

    fn initialize(&self, _display: u8) -> DriverResult<(i32, i32)> {
        Ok(if self.emulated { (1, 4) } else { (1, 5) })
    }

    fn query_extensions(&self, _display: u8) -> DriverResult<String> {
        Ok(String::new())
    }

    fn choose_config(&self, _display: u8, _attribs: &[i32]) -> DriverResult<Option<u8>> {
        Ok(Some(1))
    }

    fn create_context(&self, _display: u8, _config: u8, _attribs: &[i32]) -> DriverResult<u8> {
        Ok(1)
    }

    fn config_attrib(&self, _display: u8, _config: u8, _attribute: i32) -> DriverResult<i32> {
        Ok(0x21)
    }

    fn create_window_surface(
        &self,
        _display: u8,
        _config: u8,
        _window: NativeSurfaceHandle,
        _attribs: &[i32],
    ) -> DriverResult<u8> {
        self.record("create_surface");
        Ok(1)
    }

    fn make_current(
        &self,
        _display: u8,
        _surface: Option<u8>,
        _context: Option<u8>,
    ) -> DriverResult<()> {
        Ok(())
    }

    fn swap_interval(&self, _display: u8, _interval: i32) -> DriverResult<()> {
        Ok(())
    }

    fn swap_buffers(&self, _display: u8, _surface: u8) -> DriverResult<()> {
        if self.fail_swap.get() {
            self.record("swap failed");
            return Err(NativeErrorCode(0x300d));
        }
        self.record("swap");
        Ok(())
    }

    fn destroy_surface(&self, _display: u8, _surface: u8) -> DriverResult<()> {
        self.record("destroy_surface");
        Ok(())
    }

    fn destroy_context(&self, _display: u8, _context: u8) -> DriverResult<()> {
        self.record("destroy_context");
        Ok(())
    }

    fn terminate(&self, _display: u8) -> DriverResult<()> {
        Ok(())
    }

    fn release_thread(&self) -> DriverResult<()> {
        Ok(())
    }

    fn load_functions(&self) -> Result<StubGl, ContextError> {
        Ok(StubGl {
            fail_target: self.fail_target,
        })
    }
}

struct StubGl {
    fail_target: bool,
}

impl GlFunctions for StubGl {
    type ColorTarget = NoTarget;

    fn finish(&self) {}

    fn create_color_target(&self) -> Result<NoTarget, ContextError> {
        if self.fail_target {
            return Err(ContextError::setup(
                "blit fragment shader compilation failed: 0:12: syntax error",
            ));
        }
        Ok(NoTarget)
    }
}

struct NoTarget;

impl ColorEmulationTarget for NoTarget {
    fn refresh(&mut self, _size: WindowSize) -> Result<(), ContextError> {
        Ok(())
    }
    fn blit(&mut self) {}
    fn after_present(&mut self) {}
    fn release(&mut self) {}
}

struct StubWindow {
    handle: Option<NativeWindowHandle>,
    size: WindowSize,
    backend: SurfaceBackend,
}

impl StubWindow {
    fn visible(width: u32, height: u32) -> Self {
        Self {
            handle: NativeWindowHandle::new(0x42),
            size: WindowSize::new(width, height),
            backend: SurfaceBackend::Direct,
        }
    }
}

impl NativeWindow for StubWindow {
    fn display(&self) -> NativeDisplayHandle {
        NativeDisplayHandle::new(std::ptr::null_mut())
    }

    fn native_window(&self, _visual_id: i32) -> WindowBinding {
        WindowBinding {
            handle: self.handle,
            size: self.size,
        }
    }

    fn surface_backend(&self) -> &SurfaceBackend {
        &self.backend
    }

    fn size(&self) -> WindowSize {
        self.size
    }

    fn stage(&self) -> WindowStage {
        WindowStage::Running
    }

    fn display_config(&self) -> DisplayConfig {
        DisplayConfig::default()
    }
}

/// Records what it is asked to do.
#[derive(Default)]
struct RecordingApp {
    events: Vec<TypedEvent>,
    frames: Vec<FrameInfo>,
    fail_draw: bool,
}

impl Application<StubGl> for RecordingApp {
    fn handle_event(&mut self, event: &TypedEvent) {
        self.events.push(*event);
    }

    fn draw(&mut self, _gl: &StubGl, frame: &FrameInfo) -> anyhow::Result<()> {
        self.frames.push(*frame);
        if self.fail_draw {
            anyhow::bail!("shader missing");
        }
        Ok(())
    }
}

// --- Helpers ---

struct Fixture {
    log: CallLog,
    fail_swap: Rc<Cell<bool>>,
    emulated: bool,
    fail_target: bool,
}

impl Fixture {
    fn new() -> Self {
        Self {
            log: CallLog::default(),
            fail_swap: Rc::new(Cell::new(false)),
            emulated: false,
            fail_target: false,
        }
    }

    /// A driver without native sRGB whose emulation target cannot be built.
    fn broken_emulation() -> Self {
        Self {
            emulated: true,
            fail_target: true,
            ..Self::new()
        }
    }

    fn runner(&self, app: RecordingApp, max_failures: u32) -> AppRunner<RecordingApp, StubDriver> {
        let driver = StubDriver {
            log: self.log.clone(),
            fail_swap: self.fail_swap.clone(),
            emulated: self.emulated,
            fail_target: self.fail_target,
        };
        let context = RenderContext::create(
            driver,
            NativeDisplayHandle::new(std::ptr::null_mut()),
            ContextSettings::default(),
        )
        .unwrap();
        AppRunner::new(app, context, max_failures)
    }

    fn count(&self, call: &str) -> usize {
        self.log.borrow().iter().filter(|c| *c == call).count()
    }
}

fn redraw(window: &StubWindow) -> TypedEvent {
    TypedEvent::resize(window.size, DisplayConfig::new(2.0, 2.0))
}

// --- Tests ---

#[test]
fn redraw_draws_and_presents_a_frame() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let window = StubWindow::visible(320, 200);

    let control = runner.handle_event(&window, redraw(&window));

    assert_eq!(control, LoopControl::Continue);
    assert_eq!(fixture.count("create_surface"), 1);
    assert_eq!(fixture.count("swap"), 1);
    let frames = &runner.app().frames;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].number, 1);
    assert_eq!(frames[0].size, WindowSize::new(320, 200));
    assert_eq!(frames[0].config, DisplayConfig::new(2.0, 2.0));
}

#[test]
fn frames_are_numbered_and_reuse_the_surface() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let window = StubWindow::visible(320, 200);

    for _ in 0..3 {
        runner.handle_event(&window, redraw(&window));
    }

    assert_eq!(fixture.count("create_surface"), 1);
    assert_eq!(fixture.count("swap"), 3);
    let numbers: Vec<u64> = runner.app().frames.iter().map(|f| f.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(runner.frames(), 3);
}

#[test]
fn hidden_window_skips_drawing() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let mut window = StubWindow::visible(320, 200);
    window.handle = None;

    let control = runner.handle_event(&window, redraw(&window));

    assert_eq!(control, LoopControl::Continue);
    assert!(runner.app().frames.is_empty());
    assert_eq!(fixture.count("create_surface"), 0);
}

#[test]
fn a_broken_emulation_target_stops_the_window_without_presenting() {
    let fixture = Fixture::broken_emulation();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let window = StubWindow::visible(64, 64);

    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Exit);

    assert!(runner.context().is_released());
    assert!(runner.app().frames.is_empty());
    assert_eq!(fixture.count("swap"), 0);
    assert_eq!(fixture.count("destroy_context"), 1);
}

#[test]
fn a_failed_draw_is_still_presented() {
    let fixture = Fixture::new();
    let app = RecordingApp {
        fail_draw: true,
        ..Default::default()
    };
    let mut runner = fixture.runner(app, 3);
    let window = StubWindow::visible(64, 64);

    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    assert_eq!(fixture.count("swap"), 1);
}

#[test]
fn repeated_present_failures_release_and_exit() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let window = StubWindow::visible(64, 64);
    fixture.fail_swap.set(true);

    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    assert!(!runner.context().is_released());
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Exit);

    assert!(runner.context().is_released());
    assert_eq!(fixture.count("swap failed"), 3);
    assert_eq!(fixture.count("destroy_context"), 1);
}

#[test]
fn a_successful_present_resets_the_failure_count() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 2);
    let window = StubWindow::visible(64, 64);

    fixture.fail_swap.set(true);
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    fixture.fail_swap.set(false);
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    fixture.fail_swap.set(true);
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Exit);
}

#[test]
fn redraw_after_release_exits() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let window = StubWindow::visible(64, 64);

    assert_eq!(runner.handle_event(&window, TypedEvent::CloseRequest), LoopControl::Continue);
    assert!(runner.context().is_released());
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Exit);
    assert!(runner.app().frames.is_empty());
}

#[test]
fn exiting_releases_the_context_once() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner(RecordingApp::default(), 3);
    let window = StubWindow::visible(64, 64);
    runner.handle_event(&window, redraw(&window));

    runner.exiting(&window);
    runner.exiting(&window);

    assert!(runner.context().is_released());
    assert_eq!(fixture.count("destroy_surface"), 1);
    assert_eq!(fixture.count("destroy_context"), 1);
}

#[test]
fn events_reach_the_app_and_the_observer() {
    let fixture = Fixture::new();
    let (tx, rx) = flume::unbounded();
    let mut runner = fixture
        .runner(RecordingApp::default(), 3)
        .with_event_sender(Some(tx));
    let window = StubWindow::visible(64, 64);
    let press = TypedEvent::Pointer(PointerEvent {
        kind: PointerKind::Press,
        source: PointerSource::Mouse,
        position: Point::new(3.0, 4.0),
        scroll: None,
        time: Duration::from_millis(12),
    });

    runner.handle_event(&window, TypedEvent::stage(WindowStage::Running));
    runner.handle_event(&window, press);

    assert_eq!(
        runner.app().events,
        vec![TypedEvent::stage(WindowStage::Running), press]
    );
    match rx.recv_timeout(Duration::from_secs(1)) {
        Ok(event) => assert_eq!(event, TypedEvent::stage(WindowStage::Running)),
        Err(e) => panic!("Expected a mirrored event, got {e:?}"),
    }
    assert_eq!(rx.recv_timeout(Duration::from_secs(1)).ok(), Some(press));
}

#[test]
fn a_dropped_observer_does_not_stop_the_runner() {
    let fixture = Fixture::new();
    let (tx, rx) = flume::unbounded();
    drop(rx);
    let mut runner = fixture
        .runner(RecordingApp::default(), 3)
        .with_event_sender(Some(tx));
    let window = StubWindow::visible(64, 64);

    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    assert_eq!(runner.handle_event(&window, redraw(&window)), LoopControl::Continue);
    assert_eq!(runner.app().frames.len(), 2);
}
