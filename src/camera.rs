//! First-person fly camera, projection and input accumulation.
//!
//! The camera is a plain yaw/pitch accumulator: mouse deltas rotate it,
//! WASD keys translate it along the flattened forward/right basis. No
//! history is kept; the controller folds pending input into the camera
//! once per frame via [`CameraController::update`].

use cgmath::{perspective, InnerSpace, Matrix4, Point3, Rad, Vector3};
use instant::Duration;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// wgpu clip space is x,y in [-1, 1] but z in [0, 1], unlike cgmath's
/// OpenGL-convention projection, so the projection matrix is remapped.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keep pitch short of straight up/down so the view basis never degenerates.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, Y: Into<Rad<f32>>, R: Into<Rad<f32>>>(
        position: P,
        yaw: Y,
        pitch: R,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn front(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front(), Vector3::unit_y())
    }
}

#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn set_fovy<F: Into<Rad<f32>>>(&mut self, fovy: F) {
        self.fovy = fovy.into();
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Folds key state and mouse deltas into camera movement.
#[derive(Debug)]
pub struct CameraController {
    amount_forward: f32,
    amount_backward: f32,
    amount_left: f32,
    amount_right: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    speed: f32,
    sensitivity: f32,
    /// While the overlay owns the cursor the camera ignores all input.
    pub enabled: bool,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_left: 0.0,
            amount_right: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            speed,
            sensitivity,
            enabled: true,
        }
    }

    /// Track WASD key state from window events. Returns true when the event
    /// was a movement key.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(*key, *state),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.amount_forward = amount;
                true
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.amount_backward = amount;
                true
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => {
                self.amount_left = amount;
                true
            }
            KeyCode::KeyD | KeyCode::ArrowRight => {
                self.amount_right = amount;
                true
            }
            _ => false,
        }
    }

    /// Accumulate a raw mouse delta; applied on the next [`Self::update`].
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.enabled {
            self.rotate_horizontal += dx as f32;
            self.rotate_vertical -= dy as f32;
        }
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        if self.enabled {
            // Move in the horizontal plane regardless of pitch, like the
            // original fly camera: forward never sinks into the floor.
            let (sin_yaw, cos_yaw) = camera.yaw.0.sin_cos();
            let forward = Vector3::new(cos_yaw, 0.0, sin_yaw).normalize();
            let right = Vector3::new(-sin_yaw, 0.0, cos_yaw).normalize();
            camera.position +=
                forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
            camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;

            camera.yaw += Rad(self.rotate_horizontal * self.sensitivity * dt);
            camera.pitch += Rad(self.rotate_vertical * self.sensitivity * dt);
            camera.pitch.0 = camera.pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        // Mouse deltas are one-shot; key amounts persist until key-up.
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }
}

/// CPU-side copy of the camera uniform as the shaders declare it.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_pos: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_pos: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_pos = camera.position.to_homogeneous().into();
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera plus its GPU-side resources, bundled the way the context owns them.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, EuclideanSpace};

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(4.0, 1.0);
        controller.handle_mouse(0.0, -100_000.0);
        controller.update(&mut camera, Duration::from_secs(1));
        assert!(camera.pitch.0 <= PITCH_LIMIT);
        assert!(camera.front().magnitude() > 0.99);
    }

    #[test]
    fn forward_key_moves_along_view_direction() {
        // Yaw -90 degrees looks down -Z.
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(1.0, 1.0);
        controller.handle_key(KeyCode::KeyW, ElementState::Pressed);
        controller.update(&mut camera, Duration::from_secs(1));
        let moved = camera.position.to_vec();
        assert!(moved.z < -0.9);
        assert!(moved.x.abs() < 1e-4);
        assert!(moved.y.abs() < 1e-4);
    }

    #[test]
    fn key_release_stops_movement() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(1.0, 1.0);
        controller.handle_key(KeyCode::KeyD, ElementState::Pressed);
        controller.handle_key(KeyCode::KeyD, ElementState::Released);
        controller.update(&mut camera, Duration::from_secs(1));
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn disabled_controller_ignores_mouse() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(1.0, 1.0);
        controller.enabled = false;
        controller.handle_mouse(500.0, 500.0);
        controller.update(&mut camera, Duration::from_secs(1));
        assert_eq!(camera.yaw, Rad::from(Deg(-90.0)));
    }
}
