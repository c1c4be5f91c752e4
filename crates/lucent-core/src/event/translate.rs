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

//! Translation from decoded native events to the application's pointer events.
//!
//! The windowing system reports the wheel as two extra buttons. Presses and
//! releases of those are turned into moves carrying a fixed vertical scroll
//! delta; every other button except the primary one is dropped.

use super::native::{ButtonEvent, MotionEvent};
use super::types::{Point, PointerEvent, PointerKind, PointerSource};

/// The primary (left) button.
pub const BUTTON_PRIMARY: u32 = 1;
/// Wheel rotated away from the user.
pub const BUTTON_SCROLL_UP: u32 = 4;
/// Wheel rotated towards the user.
pub const BUTTON_SCROLL_DOWN: u32 = 5;

/// Magnitude of the scroll delta synthesized for one wheel step.
pub const SCROLL_SCALE: f32 = 10.0;

/// Translates a button press or release into a pointer event.
///
/// # Arguments
///
/// * `event`: The decoded button payload.
/// * `pressed`: `true` for a press, `false` for a release.
///
/// # Returns
///
/// `None` for buttons the application does not see. Wheel buttons produce a
/// scroll move for both the press and the release.
pub fn translate_button(event: &ButtonEvent, pressed: bool) -> Option<PointerEvent> {
    let (kind, scroll) = match event.button {
        BUTTON_PRIMARY if pressed => (PointerKind::Press, None),
        BUTTON_PRIMARY => (PointerKind::Release, None),
        BUTTON_SCROLL_UP => (PointerKind::Move, Some(Point::new(0.0, -SCROLL_SCALE))),
        BUTTON_SCROLL_DOWN => (PointerKind::Move, Some(Point::new(0.0, SCROLL_SCALE))),
        _ => return None,
    };
    Some(PointerEvent {
        kind,
        source: PointerSource::Mouse,
        position: Point::new(event.x as f32, event.y as f32),
        scroll,
        time: event.time,
    })
}

/// Translates pointer motion into a move event at the reported position.
pub fn translate_motion(event: &MotionEvent) -> PointerEvent {
    PointerEvent {
        kind: PointerKind::Move,
        source: PointerSource::Mouse,
        position: Point::new(event.x as f32, event.y as f32),
        scroll: None,
        time: event.time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn button(button: u32) -> ButtonEvent {
        ButtonEvent {
            button,
            x: 12,
            y: 34,
            state: 0,
            time: Duration::from_millis(1500),
        }
    }

    #[test]
    fn primary_press_and_release() {
        let press = translate_button(&button(BUTTON_PRIMARY), true).expect("press translated");
        assert_eq!(press.kind, PointerKind::Press);
        assert_eq!(press.source, PointerSource::Mouse);
        assert_eq!(press.position, Point::new(12.0, 34.0));
        assert_eq!(press.scroll, None);
        assert_eq!(press.time, Duration::from_millis(1500));

        let release = translate_button(&button(BUTTON_PRIMARY), false).expect("release translated");
        assert_eq!(release.kind, PointerKind::Release);
    }

    #[test]
    fn scroll_down_press_is_a_positive_move() {
        let event = translate_button(&button(BUTTON_SCROLL_DOWN), true).expect("scroll translated");
        assert_eq!(event.kind, PointerKind::Move);
        assert_eq!(event.scroll, Some(Point::new(0.0, SCROLL_SCALE)));
        assert_eq!(event.position, Point::new(12.0, 34.0));
    }

    #[test]
    fn scroll_up_press_is_a_negative_move() {
        let event = translate_button(&button(BUTTON_SCROLL_UP), true).expect("scroll translated");
        assert_eq!(event.kind, PointerKind::Move);
        assert_eq!(event.scroll, Some(Point::new(0.0, -SCROLL_SCALE)));
    }

    #[test]
    fn scroll_releases_are_moves_too() {
        let up = translate_button(&button(BUTTON_SCROLL_UP), false).expect("scroll translated");
        assert_eq!(up.kind, PointerKind::Move);
        assert_eq!(up.scroll, Some(Point::new(0.0, -SCROLL_SCALE)));

        let down =
            translate_button(&button(BUTTON_SCROLL_DOWN), false).expect("scroll translated");
        assert_eq!(down.kind, PointerKind::Move);
        assert_eq!(down.scroll, Some(Point::new(0.0, SCROLL_SCALE)));
        assert_eq!(down.position, Point::new(12.0, 34.0));
    }

    #[test]
    fn other_buttons_are_ignored() {
        for b in [2, 3, 6, 7, 8, 9] {
            assert_eq!(translate_button(&button(b), true), None, "button {b}");
            assert_eq!(translate_button(&button(b), false), None, "button {b}");
        }
    }

    #[test]
    fn motion_becomes_move() {
        let event = translate_motion(&MotionEvent {
            x: -3,
            y: 640,
            time: Duration::from_millis(7),
        });
        assert_eq!(event.kind, PointerKind::Move);
        assert_eq!(event.position, Point::new(-3.0, 640.0));
        assert_eq!(event.scroll, None);
        assert_eq!(event.time, Duration::from_millis(7));
    }
}
