use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};
use yew::prelude::*;

use super::popover::{HoverLabel, Popover};
use crate::config::GlobeConfig;
use crate::input::{mouse_point, sample_mouse, sample_touches};
use crate::model::GlobeData;
use crate::render::{CanvasSurface, render};
use crate::state::{DragState, GlobeState, hit_test};

#[derive(Properties, PartialEq, Clone)]
pub struct GlobeViewProps {
    pub data: Rc<GlobeData>,
    pub config: Rc<GlobeConfig>,
}

#[function_component(GlobeView)]
pub fn globe_view(props: &GlobeViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let globe = {
        let config = props.config.clone();
        use_mut_ref(move || GlobeState::new(0.0, &config))
    };
    let drag = use_mut_ref(DragState::default);
    let hover = use_state_eq(|| None::<HoverLabel>);

    // Main mount effect (sizing, drawing, pointer events)
    {
        let canvas_ref = canvas_ref.clone();
        let globe = globe.clone();
        let drag = drag.clone();
        let hover = hover.clone();
        let data = props.data.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| -> Box<dyn FnOnce()> {
            let Some(window) = web_sys::window() else {
                log::error!("no global `window`; globe not mounted");
                return Box::new(|| ());
            };
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                log::error!("canvas ref not attached; globe not mounted");
                return Box::new(|| ());
            };

            let apply_canvas_size = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let margin = config.margin;
                move || {
                    let width = canvas.offset_width().max(0) as f64;
                    canvas.set_width(width as u32);
                    canvas.set_height(width as u32);
                    globe.borrow_mut().resize(width, margin);
                }
            };
            apply_canvas_size();

            let draw: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let data = data.clone();
                let config = config.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    {
                        Some(ctx) => ctx,
                        None => {
                            log::warn!("canvas has no 2d context");
                            return;
                        }
                    };
                    render(&mut CanvasSurface(&ctx), &globe.borrow(), &data, &config);
                })
            };
            draw();

            // Mouse down starts a drag
            let mousedown_cb = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let drag = drag.clone();
                let hover = hover.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    if e.button() != 0 {
                        return;
                    }
                    let sample = sample_mouse(&e, &canvas);
                    drag.borrow_mut().begin(&globe.borrow().projection, sample, 1);
                    hover.set(None);
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref())
                .ok();

            // Drag moves are tracked on the window so leaving the canvas keeps the gesture
            let drag_move_cb = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let drag = drag.clone();
                let draw = draw.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let sample = sample_mouse(&e, &canvas);
                    let changed = drag
                        .borrow_mut()
                        .drag(&mut globe.borrow_mut().projection, sample, 1);
                    if changed {
                        draw();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mousemove", drag_move_cb.as_ref().unchecked_ref())
                .ok();

            let mouseup_cb = {
                let drag = drag.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    drag.borrow_mut().end();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();

            // Hover popover
            let hover_cb = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let data = data.clone();
                let hover = hover.clone();
                let drag = drag.clone();
                let radius = config.hover_radius;
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    if !drag.borrow().allows_hover() {
                        return;
                    }
                    let pointer = mouse_point(&e, &canvas);
                    let g = globe.borrow();
                    let label = hit_test(&g.projection, &data.markers, pointer, radius).map(|hit| {
                        HoverLabel {
                            x: hit.x,
                            y: hit.y,
                            text: hit.marker.label.clone(),
                        }
                    });
                    hover.set(label);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousemove", hover_cb.as_ref().unchecked_ref())
                .ok();

            let mouseleave_cb = {
                let hover = hover.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    hover.set(None);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mouseleave", mouseleave_cb.as_ref().unchecked_ref())
                .ok();

            // Resize
            let resize_cb = {
                let draw = draw.clone();
                let hover = hover.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    apply_canvas_size();
                    hover.set(None);
                    draw();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();

            // Touch
            let touch_start_cb = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let drag = drag.clone();
                let hover = hover.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some((sample, contacts)) = sample_touches(&e.touches(), &canvas) {
                        drag.borrow_mut().begin(&globe.borrow().projection, sample, contacts);
                        hover.set(None);
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref())
                .ok();

            let touch_move_cb = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let drag = drag.clone();
                let draw = draw.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some((sample, contacts)) = sample_touches(&e.touches(), &canvas) {
                        let changed = drag
                            .borrow_mut()
                            .drag(&mut globe.borrow_mut().projection, sample, contacts);
                        if changed {
                            draw();
                        }
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref())
                .ok();

            let touch_end_cb = {
                let canvas = canvas.clone();
                let globe = globe.clone();
                let drag = drag.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    match sample_touches(&e.touches(), &canvas) {
                        // a finger is still down: continue from where the globe is now
                        Some((sample, contacts)) => {
                            drag.borrow_mut().begin(&globe.borrow().projection, sample, contacts)
                        }
                        None => drag.borrow_mut().end(),
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref())
                .ok();
            canvas
                .add_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            Box::new(move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mousemove",
                    drag_move_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    hover_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mouseleave",
                    mouseleave_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "touchstart",
                    touch_start_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "touchend",
                    touch_end_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "touchcancel",
                    touch_end_cb.as_ref().unchecked_ref(),
                );
                let _keep_alive = (
                    &mousedown_cb,
                    &drag_move_cb,
                    &mouseup_cb,
                    &hover_cb,
                    &mouseleave_cb,
                    &resize_cb,
                    &touch_start_cb,
                    &touch_move_cb,
                    &touch_end_cb,
                );
            })
        });
    }

    html! {
        <div style="position:relative; width:100%;">
            <canvas ref={canvas_ref} id="map" style="display:block; width:100%; touch-action:none; cursor:grab;" />
            <Popover label={(*hover).clone()} />
        </div>
    }
}
