//! Pointer positions from DOM events, relative to the canvas content box.

use web_sys::{Element, MouseEvent, TouchList};

use crate::state::PointerSample;

fn origin(element: &Element) -> (f64, f64) {
    let rect = element.get_bounding_client_rect();
    (
        rect.left() + element.client_left() as f64,
        rect.top() + element.client_top() as f64,
    )
}

pub fn mouse_point(e: &MouseEvent, element: &Element) -> [f64; 2] {
    let (left, top) = origin(element);
    [e.client_x() as f64 - left, e.client_y() as f64 - top]
}

pub fn sample_mouse(e: &MouseEvent, element: &Element) -> PointerSample {
    let [x, y] = mouse_point(e, element);
    PointerSample::Pan { x, y }
}

/// Sample for the active touches plus how many there are.
pub fn sample_touches(touches: &TouchList, element: &Element) -> Option<(PointerSample, usize)> {
    let (left, top) = origin(element);
    let contacts: Vec<[f64; 2]> = (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| [t.client_x() as f64 - left, t.client_y() as f64 - top])
        .collect();
    PointerSample::from_contacts(&contacts).map(|sample| (sample, contacts.len()))
}
