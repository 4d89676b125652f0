//! Panel-editable parameters and their value domains

use rand::Rng;
use thiserror::Error;

use crate::gfx::camera::CameraTarget;
use crate::gfx::resources::{MaterialId, MaterialManager};

/// Errors raised while parsing a CSS color string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("expected `rgb(r, g, b)`, got {0:?}")]
    Malformed(String),

    #[error("color component {component:?} is not an integer in 0..=255")]
    Component { component: String },
}

/// Closed numeric domain of a panel field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamps `value` to the range and snaps it to the nearest step
    pub fn apply(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

pub const METALNESS: ParamRange = ParamRange::new(0.0, 1.0, 0.0001);
pub const ROUGHNESS: ParamRange = ParamRange::new(0.0, 1.0, 0.0001);
pub const TARGET_AXIS: ParamRange = ParamRange::new(-10.0, 10.0, 0.01);
pub const CAMERA_STEP: ParamRange = ParamRange::new(0.0, 0.05, 0.001);
pub const COLOR_COMPONENT: ParamRange = ParamRange::new(0.0, 255.0, 1.0);

/// RGB components edited by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorState {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorState {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Each component drawn as `floor(U * 255)`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut component = || (rng.random::<f32>() * 255.0).floor() as u8;
        Self {
            red: component(),
            green: component(),
            blue: component(),
        }
    }

    /// CSS form, e.g. `rgb(10, 20, 30)`
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.red, self.green, self.blue)
    }

    /// Linear-light color for shading; components are sRGB encoded
    pub fn to_linear_rgb(&self) -> [f32; 3] {
        [self.red, self.green, self.blue].map(|c| srgb_to_linear(f32::from(c) / 255.0))
    }
}

/// Parses `rgb(r, g, b)` with integer components in 0..=255
pub fn parse_css_rgb(css: &str) -> Result<ColorState, ColorError> {
    let inner = css
        .trim()
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| ColorError::Malformed(css.to_string()))?;

    let components = inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>().map_err(|_| ColorError::Component {
                component: part.to_string(),
            })
        })
        .collect::<Result<Vec<u8>, ColorError>>()?;

    match components.as_slice() {
        [red, green, blue] => Ok(ColorState::new(*red, *green, *blue)),
        _ => Err(ColorError::Malformed(css.to_string())),
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Re-applies the CSS form of `color` to one material, leaving all others alone
pub fn apply_color(
    materials: &mut MaterialManager,
    target: MaterialId,
    color: &ColorState,
) -> Result<(), ColorError> {
    let parsed = parse_css_rgb(&color.css())?;
    if let Some(material) = materials.get_material_mut(target) {
        material.set_rgb(parsed.to_linear_rgb());
    }
    Ok(())
}

/// All shared state the panel edits besides material properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub camera: CameraTarget,
    pub color: ColorState,
}

impl Parameters {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            camera: CameraTarget::default(),
            color: ColorState::random(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::Material;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_css_round_trip() {
        let color = ColorState::new(10, 20, 30);
        assert_eq!(color.css(), "rgb(10, 20, 30)");
        assert_eq!(parse_css_rgb(&color.css()), Ok(color));
        assert_eq!(parse_css_rgb("rgb(255,0,7)"), Ok(ColorState::new(255, 0, 7)));
    }

    #[test]
    fn test_malformed_css_is_rejected() {
        assert!(matches!(
            parse_css_rgb("#0a141e"),
            Err(ColorError::Malformed(_))
        ));
        assert!(matches!(
            parse_css_rgb("rgb(1, 2)"),
            Err(ColorError::Malformed(_))
        ));
        assert_eq!(
            parse_css_rgb("rgb(1, 2, 300)"),
            Err(ColorError::Component {
                component: "300".to_string()
            })
        );
    }

    #[test]
    fn test_random_components_never_reach_255() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let color = ColorState::random(&mut rng);
            assert!(color.red < 255 && color.green < 255 && color.blue < 255);
        }
    }

    #[test]
    fn test_apply_color_changes_only_target_material() {
        let mut materials = MaterialManager::new();
        let text = materials.add_material(Material::metallic("text", 0));
        let colored = materials.add_material(Material::unlit("colored", [0.5, 0.5, 0.5]));
        let glass = materials.add_material(Material::metallic("glass", 1));

        let before_text = materials.get_material(text).unwrap().base_color;
        let before_glass = materials.get_material(glass).unwrap().base_color;

        let color = ColorState::new(10, 20, 30);
        apply_color(&mut materials, colored, &color).unwrap();

        assert_eq!(
            materials.get_material(colored).unwrap().rgb(),
            color.to_linear_rgb()
        );
        assert_eq!(materials.get_material(text).unwrap().base_color, before_text);
        assert_eq!(materials.get_material(glass).unwrap().base_color, before_glass);
    }

    #[test]
    fn test_ranges_clamp_and_snap() {
        assert!((CAMERA_STEP.apply(0.5) - 0.05).abs() < 1e-6);
        assert!(CAMERA_STEP.apply(0.5) <= 0.05);
        assert_eq!(CAMERA_STEP.apply(-1.0), 0.0);
        assert!((CAMERA_STEP.apply(0.0104) - 0.01).abs() < 1e-6);
        assert_eq!(COLOR_COMPONENT.apply(300.0), 255.0);
        assert_eq!(COLOR_COMPONENT.apply(12.4), 12.0);
        assert_eq!(TARGET_AXIS.apply(-25.0), -10.0);
        assert_eq!(METALNESS.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(ColorState::new(0, 0, 0).to_linear_rgb(), [0.0, 0.0, 0.0]);
        let white = ColorState::new(255, 255, 255).to_linear_rgb();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }
}
