//! Modality-independent pointer events. Mouse and touch listeners both
//! translate into `InputEvent` so placement goes through one code path.

use crate::layout::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

impl PointerId {
    /// There is only ever one mouse pointer.
    pub const MOUSE: PointerId = PointerId(-1);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEventKind {
    Down,
    Move,
    Up,
    /// Gesture aborted by the platform (touchcancel, window blur).
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub pointer_kind: PointerKind,
    pub pointer: PointerId,
    /// Canvas-local position; `None` when the platform event carried none.
    pub point: Option<Point>,
}

impl InputEvent {
    pub fn mouse(kind: InputEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            pointer_kind: PointerKind::Mouse,
            pointer: PointerId::MOUSE,
            point: Some(Point::new(x, y)),
        }
    }

    pub fn touch(kind: InputEventKind, identifier: i32, point: Option<Point>) -> Self {
        Self {
            kind,
            pointer_kind: PointerKind::Touch,
            pointer: PointerId(identifier),
            point,
        }
    }
}

/// One entry of a platform touch event's changed-touches list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub identifier: i32,
    pub point: Point,
}

impl InputEvent {
    /// Picks the touch a platform event means for the controller. While a
    /// drag is held by `active`, only that identifier is used, and an event
    /// carrying no touches at all is attributed to it without a point. With
    /// no drag the first changed touch is used. `None` means the event has
    /// nothing for the current gesture.
    pub fn from_touches(
        kind: InputEventKind,
        active: Option<PointerId>,
        changed: &[TouchPoint],
    ) -> Option<Self> {
        match active {
            None => changed
                .first()
                .map(|t| Self::touch(kind, t.identifier, Some(t.point))),
            Some(pointer) => match changed.iter().find(|t| t.identifier == pointer.0) {
                Some(t) => Some(Self::touch(kind, t.identifier, Some(t.point))),
                None if changed.is_empty() => Some(Self::touch(kind, pointer.0, None)),
                None => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touches(ids: &[i32]) -> Vec<TouchPoint> {
        ids.iter()
            .map(|&id| TouchPoint {
                identifier: id,
                point: Point::new(id as f64 * 10.0, 5.0),
            })
            .collect()
    }

    #[test]
    fn builders_tag_the_modality() {
        let m = InputEvent::mouse(InputEventKind::Down, 1.0, 2.0);
        assert_eq!(m.pointer_kind, PointerKind::Mouse);
        assert_eq!(m.pointer, PointerId::MOUSE);
        let t = InputEvent::touch(InputEventKind::Up, 4, None);
        assert_eq!(t.pointer_kind, PointerKind::Touch);
        assert_eq!(t.pointer, PointerId(4));
    }

    #[test]
    fn idle_uses_first_changed_touch() {
        let ev = InputEvent::from_touches(InputEventKind::Down, None, &touches(&[7, 3])).unwrap();
        assert_eq!(ev.pointer, PointerId(7));
        assert_eq!(ev.point, Some(Point::new(70.0, 5.0)));
        assert_eq!(InputEvent::from_touches(InputEventKind::Down, None, &[]), None);
    }

    #[test]
    fn active_finger_found_anywhere_in_the_list() {
        let ev =
            InputEvent::from_touches(InputEventKind::Up, Some(PointerId(1)), &touches(&[2, 1]))
                .unwrap();
        assert_eq!(ev.pointer, PointerId(1));
        assert_eq!(ev.point, Some(Point::new(10.0, 5.0)));
    }

    #[test]
    fn other_fingers_alone_are_dropped() {
        let ev = InputEvent::from_touches(InputEventKind::Move, Some(PointerId(1)), &touches(&[2]));
        assert_eq!(ev, None);
    }

    #[test]
    fn empty_release_goes_to_active_drag() {
        let ev = InputEvent::from_touches(InputEventKind::Up, Some(PointerId(5)), &[]).unwrap();
        assert_eq!(ev.pointer, PointerId(5));
        assert_eq!(ev.point, None);
    }
}
