//! User-tunable rendering parameters.
//!
//! [`Settings`] is a flat bag of numeric/colour values the overlay can edit
//! at runtime and the renderer reads every frame. Each editable field
//! declares a `[min, max]` range; [`Settings::clamp`] pins every value into
//! its range so out-of-range numbers never reach the pipeline. Nothing is
//! persisted: every process start begins from [`Settings::default`].

/// Metadata for one overlay-editable scalar field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRange {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
}

/// Flat record of live-tunable rendering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Ambient light colour shared by both point lights.
    pub ambient: [f32; 3],
    /// Diffuse light colour shared by both point lights.
    pub diffuse: [f32; 3],
    /// Specular light colour shared by both point lights.
    pub specular: [f32; 3],
    /// Attenuation: constant term.
    pub constant: f32,
    /// Attenuation: linear term.
    pub linear: f32,
    /// Attenuation: quadratic term.
    pub quadratic: f32,
    /// Blinn-Phong specular exponent.
    pub shininess: f32,
    /// Display gamma applied after tone mapping.
    pub gamma: f32,
    /// Exposure applied before tone mapping.
    pub exposure: f32,
    /// Whether the bright-pass/blur bloom stage runs at all.
    pub bloom: bool,
    /// Number of horizontal+vertical blur rounds per frame.
    pub blur_iterations: u32,
    /// Luminance threshold for the bright-pass extraction.
    pub bloom_threshold: f32,
    /// Parallax-mapping displacement scale.
    pub height_scale: f32,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ambient: [0.05, 0.05, 0.05],
            diffuse: [0.8, 0.8, 0.8],
            specular: [1.0, 1.0, 1.0],
            constant: 1.0,
            linear: 0.35,
            quadratic: 0.44,
            shininess: 32.0,
            gamma: 2.2,
            exposure: 1.0,
            bloom: true,
            blur_iterations: 4,
            bloom_threshold: 1.0,
            height_scale: 0.1,
            fov_deg: 45.0,
        }
    }
}

impl Settings {
    pub const CONSTANT: FieldRange = FieldRange { name: "pointLight.constant", min: 0.0, max: 2.0 };
    pub const LINEAR: FieldRange = FieldRange { name: "pointLight.linear", min: 0.0, max: 2.0 };
    pub const QUADRATIC: FieldRange = FieldRange { name: "pointLight.quadratic", min: 0.0, max: 2.0 };
    pub const SHININESS: FieldRange = FieldRange { name: "material.shininess", min: 0.0, max: 1000.0 };
    // Gamma 0 would make the 1/gamma exponent blow up, so the floor is 0.1.
    pub const GAMMA: FieldRange = FieldRange { name: "gamma", min: 0.1, max: 4.0 };
    pub const EXPOSURE: FieldRange = FieldRange { name: "exposure", min: 0.0, max: 4.0 };
    pub const BLUR_ITERATIONS: FieldRange = FieldRange { name: "blurIterations", min: 1.0, max: 10.0 };
    pub const BLOOM_THRESHOLD: FieldRange = FieldRange { name: "bloomThreshold", min: 0.0, max: 4.0 };
    pub const HEIGHT_SCALE: FieldRange = FieldRange { name: "heightScale", min: 0.0, max: 0.5 };
    pub const FOV_DEG: FieldRange = FieldRange { name: "fov", min: 20.0, max: 120.0 };

    /// Ranges for every scalar slider, in overlay display order.
    pub fn fields() -> &'static [FieldRange] {
        &[
            Self::CONSTANT,
            Self::LINEAR,
            Self::QUADRATIC,
            Self::SHININESS,
            Self::GAMMA,
            Self::EXPOSURE,
            Self::BLUR_ITERATIONS,
            Self::BLOOM_THRESHOLD,
            Self::HEIGHT_SCALE,
            Self::FOV_DEG,
        ]
    }

    /// Pin every field into its declared range. Colour channels clamp to `[0, 1]`.
    pub fn clamp(&mut self) {
        for channel in self
            .ambient
            .iter_mut()
            .chain(self.diffuse.iter_mut())
            .chain(self.specular.iter_mut())
        {
            *channel = channel.clamp(0.0, 1.0);
        }
        self.constant = self.constant.clamp(Self::CONSTANT.min, Self::CONSTANT.max);
        self.linear = self.linear.clamp(Self::LINEAR.min, Self::LINEAR.max);
        self.quadratic = self.quadratic.clamp(Self::QUADRATIC.min, Self::QUADRATIC.max);
        self.shininess = self.shininess.clamp(Self::SHININESS.min, Self::SHININESS.max);
        self.gamma = self.gamma.clamp(Self::GAMMA.min, Self::GAMMA.max);
        self.exposure = self.exposure.clamp(Self::EXPOSURE.min, Self::EXPOSURE.max);
        self.blur_iterations = self
            .blur_iterations
            .clamp(Self::BLUR_ITERATIONS.min as u32, Self::BLUR_ITERATIONS.max as u32);
        self.bloom_threshold = self
            .bloom_threshold
            .clamp(Self::BLOOM_THRESHOLD.min, Self::BLOOM_THRESHOLD.max);
        self.height_scale = self
            .height_scale
            .clamp(Self::HEIGHT_SCALE.min, Self::HEIGHT_SCALE.max);
        self.fov_deg = self.fov_deg.clamp(Self::FOV_DEG.min, Self::FOV_DEG.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let settings = Settings::default();
        assert_eq!(settings.ambient, [0.05, 0.05, 0.05]);
        assert_eq!(settings.diffuse, [0.8, 0.8, 0.8]);
        assert_eq!(settings.specular, [1.0, 1.0, 1.0]);
        assert_eq!(settings.constant, 1.0);
        assert_eq!(settings.linear, 0.35);
        assert_eq!(settings.quadratic, 0.44);
        assert_eq!(settings.shininess, 32.0);
        assert_eq!(settings.gamma, 2.2);
        assert_eq!(settings.exposure, 1.0);
        assert!(settings.bloom);
        assert_eq!(settings.blur_iterations, 4);
    }

    #[test]
    fn clamp_pins_out_of_range_values() {
        let mut settings = Settings {
            ambient: [-1.0, 2.0, 0.5],
            shininess: 5000.0,
            gamma: 0.0,
            exposure: -3.0,
            blur_iterations: 99,
            fov_deg: 179.0,
            ..Settings::default()
        };
        settings.clamp();
        assert_eq!(settings.ambient, [0.0, 1.0, 0.5]);
        assert_eq!(settings.shininess, Settings::SHININESS.max);
        assert_eq!(settings.gamma, Settings::GAMMA.min);
        assert_eq!(settings.exposure, 0.0);
        assert_eq!(settings.blur_iterations, 10);
        assert_eq!(settings.fov_deg, Settings::FOV_DEG.max);
    }

    #[test]
    fn clamp_leaves_defaults_untouched() {
        let mut settings = Settings::default();
        settings.clamp();
        assert_eq!(settings, Settings::default());
    }
}
