use crate::input::InputState;
use glam::{DVec3, Mat4, Vec3};
use skyloop_core::FlightTuning;

/// Minimum height kept between the camera and the ground.
pub const GROUND_CLEARANCE: f64 = 4.0;
const MAX_PITCH: f32 = 1.45;
/// Keyboard turning, in multiples of the per-pixel mouse turn rate per second.
const KEY_TURN_SCALE: f32 = 400.0;
const NEAR: f32 = 0.5;
const FAR: f32 = 4000.0;

/// Free-flight camera. The position is conceptual (f64, unbounded); the
/// renderer only ever sees it after subtracting the origin offset.
#[derive(Debug, Clone)]
pub struct FlightCamera {
    pub position: DVec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_rad: f32,
}

impl FlightCamera {
    pub fn new(altitude: f64) -> Self {
        Self {
            position: DVec3::new(0.0, altitude, 0.0),
            yaw: 0.0,
            pitch: -0.15,
            fov_y_rad: std::f32::consts::FRAC_PI_4,
        }
    }

    /// View direction. Yaw 0 looks down -z.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Horizontal right vector.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn look(&mut self, dx: f32, dy: f32, turn_rate: f32) {
        self.yaw -= dx * turn_rate;
        self.pitch = (self.pitch - dy * turn_rate).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Consume one step of input. `dt` is in seconds.
    pub fn fly(&mut self, input: &InputState, dt: f64, tuning: &FlightTuning) {
        self.look(input.mouse_dx, input.mouse_dy, tuning.turn_rate);

        let key_turn = tuning.turn_rate * KEY_TURN_SCALE * dt as f32;
        if input.turn_left {
            self.yaw += key_turn;
        }
        if input.turn_right {
            self.yaw -= key_turn;
        }

        let forward = self.forward();
        let right = self.right();
        let mut dir = Vec3::ZERO;
        if input.forward {
            dir += forward;
        }
        if input.backward {
            dir -= forward;
        }
        if input.strafe_right {
            dir += right;
        }
        if input.strafe_left {
            dir -= right;
        }
        if input.rise {
            dir += Vec3::Y;
        }
        if input.sink {
            dir -= Vec3::Y;
        }

        let speed = if input.boost {
            tuning.speed * tuning.boost
        } else {
            tuning.speed
        };
        if let Some(dir) = dir.try_normalize() {
            self.position += dir.as_dvec3() * speed * dt;
        }
    }

    /// Push the camera up if it sank below `ground + GROUND_CLEARANCE`.
    pub fn keep_above(&mut self, ground: f32) {
        let floor = ground as f64 + GROUND_CLEARANCE;
        if self.position.y < floor {
            self.position.y = floor;
        }
    }

    /// Projection times view, with the eye at its render-space position.
    pub fn view_proj(&self, render_eye: Vec3, aspect: f32) -> Mat4 {
        let view = Mat4::look_to_rh(render_eye, self.forward(), Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y_rad, aspect.max(1e-3), NEAR, FAR);
        proj * view
    }
}
