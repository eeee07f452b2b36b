use bevy::prelude::*;
use std::f32::consts::PI;

// Keeps the camera off the poles, where `looking_at` loses its up vector.
const POLE_EPSILON: f32 = 1e-4;

/// Where the camera sits and what it looks at.
#[derive(Debug, Copy, Clone, Default, PartialEq, Reflect)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }

    /// Rotates the position around the target and scales its distance.
    ///
    /// `yaw` is the azimuth around +Y (0 looks from +Z), `pitch` is added to
    /// the polar angle from +Y, and the distance is multiplied by
    /// `zoom.exp()`, never going below `min_distance`.
    pub fn orbit(&mut self, yaw: f32, pitch: f32, zoom: f32, min_distance: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let theta = offset.x.atan2(offset.z) + yaw;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + pitch)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let radius = (radius * zoom.exp()).max(min_distance);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        self.position =
            self.target + Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * radius;
    }
}

/// The configuration of the orbit controls
#[derive(Component, Reflect)]
#[reflect(Component)]
#[require(OrbitMotion)]
pub struct OrbitControls {
    /// Radians per pixel of mouse motion
    pub orbit_sensitivity: f32,
    /// Exponent per pixel of mouse motion
    pub zoom_sensitivity: f32,
    /// For devices with a notched scroll wheel, like desktop mice
    pub scroll_line_sensitivity: f32,
    /// For devices with smooth scrolling, like touchpads
    pub scroll_pixel_sensitivity: f32,
    /// Fraction of the pending orbit applied each frame
    pub damping_factor: f32,
    pub min_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        OrbitControls {
            orbit_sensitivity: 0.2f32.to_radians(), // 0.2 degree per pixel
            zoom_sensitivity: 0.01,
            scroll_line_sensitivity: 16.0, // 1 "line" == 16 "pixels of motion"
            scroll_pixel_sensitivity: 1.0,
            damping_factor: 0.05,
            min_distance: 0.1,
        }
    }
}

/// Orbit input not yet applied to the camera; drained by damping.
#[derive(Debug, Copy, Clone, Default, Component, Reflect)]
#[reflect(Component)]
pub struct OrbitMotion {
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitMotion {
    /// Takes `damping` of the pending motion, leaving the rest for later frames.
    pub fn drain(&mut self, damping: f32) -> (f32, f32) {
        let step = (self.yaw * damping, self.pitch * damping);
        self.yaw -= step.0;
        self.pitch -= step.1;
        step
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
