//! Point lights and their packed uniform representation.
//!
//! The shader interface is baked for exactly [`LIGHT_COUNT`] lights; the
//! uniform is a fixed-size array, not a dynamically sized buffer.

use cgmath::Point3;

use crate::settings::Settings;

/// Number of point lights the scene shaders declare.
pub const LIGHT_COUNT: usize = 2;

/// One point light with Phong colour terms and distance attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    /// A light at `position` taking its colour and attenuation terms from
    /// the live settings (the overlay edits one set of terms shared by
    /// both lights).
    pub fn from_settings(position: Point3<f32>, settings: &Settings) -> Self {
        Self {
            position,
            ambient: settings.ambient,
            diffuse: settings.diffuse,
            specular: settings.specular,
            constant: settings.constant,
            linear: settings.linear,
            quadratic: settings.quadratic,
        }
    }

    /// Refresh the overlay-tunable terms, keeping the position.
    pub fn apply_settings(&mut self, settings: &Settings) {
        *self = Self::from_settings(self.position, settings);
    }
}

/// One light as laid out in the uniform buffer.
///
/// Uniform fields need 16-byte alignment, so each vec3 shares its fourth
/// lane with one of the scalar attenuation terms.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    position: [f32; 3],
    constant: f32,
    ambient: [f32; 3],
    linear: f32,
    diffuse: [f32; 3],
    quadratic: f32,
    specular: [f32; 3],
    _padding: f32,
}

impl From<&PointLight> for LightRaw {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            constant: light.constant,
            ambient: light.ambient,
            linear: light.linear,
            diffuse: light.diffuse,
            quadratic: light.quadratic,
            specular: light.specular,
            _padding: 0.0,
        }
    }
}

/// The full `lights[LIGHT_COUNT]` uniform as the scene shaders declare it.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    lights: [LightRaw; LIGHT_COUNT],
}

impl LightsUniform {
    pub fn new(lights: &[PointLight; LIGHT_COUNT]) -> Self {
        Self {
            lights: [LightRaw::from(&lights[0]), LightRaw::from(&lights[1])],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_light_packs_into_four_vec4_rows() {
        assert_eq!(std::mem::size_of::<LightRaw>(), 4 * 16);
        assert_eq!(std::mem::size_of::<LightsUniform>(), LIGHT_COUNT * 4 * 16);
    }

    #[test]
    fn settings_feed_both_colour_and_attenuation_terms() {
        let mut settings = Settings::default();
        settings.diffuse = [0.25, 0.5, 0.75];
        settings.quadratic = 0.2;
        let light = PointLight::from_settings(Point3::new(4.0, 1.0, -1.0), &settings);
        let raw = LightRaw::from(&light);
        assert_eq!(raw.position, [4.0, 1.0, -1.0]);
        assert_eq!(raw.diffuse, [0.25, 0.5, 0.75]);
        assert_eq!(raw.quadratic, 0.2);
        assert_eq!(raw.constant, 1.0);
    }
}
