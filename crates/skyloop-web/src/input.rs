use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Accumulated input state read each frame by the application.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub rise: bool,
    pub sink: bool,
    pub boost: bool,
    /// Mouse look only while a button is held over the canvas.
    pub look_active: bool,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `KeyboardEvent.code`. Returns false for keys the flight
    /// controls don't use, so the page keeps them.
    pub fn set_key(&mut self, code: &str, down: bool) -> bool {
        let flag = match code {
            "KeyW" | "ArrowUp" => &mut self.forward,
            "KeyS" | "ArrowDown" => &mut self.backward,
            "KeyA" => &mut self.strafe_left,
            "KeyD" => &mut self.strafe_right,
            "ArrowLeft" | "KeyQ" => &mut self.turn_left,
            "ArrowRight" | "KeyE" => &mut self.turn_right,
            "Space" => &mut self.rise,
            "KeyC" | "ControlLeft" => &mut self.sink,
            "ShiftLeft" | "ShiftRight" => &mut self.boost,
            _ => return false,
        };
        *flag = down;
        true
    }

    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.look_active {
            self.mouse_dx += dx;
            self.mouse_dy += dy;
        }
    }

    /// Clear per-frame deltas (called after the camera consumes them).
    pub fn clear_deltas(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
    }

    /// Drop every held key, e.g. when the page loses focus mid-press.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Register keyboard listeners on the window and mouse listeners on the
/// canvas, once. Closures are leaked via `.forget()` since they live for
/// the page lifetime.
pub fn register_input_listeners(
    canvas: &web_sys::HtmlCanvasElement,
    state: Rc<RefCell<InputState>>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let window_target: &web_sys::EventTarget = window.as_ref();
    let canvas_target: &web_sys::EventTarget = canvas.as_ref();

    for (event, down) in [("keydown", true), ("keyup", false)] {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                if state.borrow_mut().set_key(&e.code(), down) {
                    e.prevent_default();
                }
            });
        window_target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // blur
    {
        let state = state.clone();
        let closure = Closure::<dyn FnMut()>::new(move || state.borrow_mut().release_all());
        window_target.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    for (event, down) in [("mousedown", true), ("mouseup", false), ("mouseleave", false)] {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_e: web_sys::MouseEvent| {
                state.borrow_mut().look_active = down;
            });
        canvas_target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // mousemove
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                state
                    .borrow_mut()
                    .add_mouse_motion(e.movement_x() as f32, e.movement_y() as f32);
            });
        canvas_target
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // contextmenu (right-drag looks around instead)
    {
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                e.prevent_default();
            });
        canvas_target
            .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}
