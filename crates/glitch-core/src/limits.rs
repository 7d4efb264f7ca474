//! Parameter range tables for the standard and extreme control modes.
//!
//! Advisory: the filters accept anything that is range-safe, these tables
//! only describe what a control surface offers.

use std::fmt;
use std::ops::RangeInclusive;

use crate::effects::{EffectKind, EffectSpec};

#[derive(Clone, Debug, PartialEq)]
pub struct ParamLimits {
    pub variance: RangeInclusive<f64>,
    pub amount: RangeInclusive<f64>,
    pub gaussian_kernel: RangeInclusive<u32>,
    pub motion_degree: RangeInclusive<u32>,
    pub motion_angle: RangeInclusive<f64>,
    pub box_kernel: RangeInclusive<u32>,
    pub camera_intensity: RangeInclusive<u32>,
    pub directional_intensity: RangeInclusive<u32>,
    pub distortion_intensity: RangeInclusive<u32>,
    pub zoom_intensity: RangeInclusive<u32>,
}

impl ParamLimits {
    pub fn standard() -> Self {
        Self {
            variance: 0.0..=0.1,
            amount: 0.0..=0.1,
            gaussian_kernel: 3..=15,
            motion_degree: 1..=30,
            motion_angle: 0.0..=360.0,
            box_kernel: 3..=15,
            camera_intensity: 1..=10,
            directional_intensity: 1..=10,
            distortion_intensity: 1..=20,
            zoom_intensity: 1..=10,
        }
    }

    pub fn extreme() -> Self {
        Self {
            variance: 0.0..=5.0,
            amount: 0.0..=1.0,
            gaussian_kernel: 3..=101,
            motion_degree: 1..=100,
            motion_angle: 0.0..=360.0,
            box_kernel: 3..=101,
            camera_intensity: 1..=50,
            directional_intensity: 1..=50,
            distortion_intensity: 1..=100,
            zoom_intensity: 1..=50,
        }
    }

    pub fn for_mode(extreme: bool) -> Self {
        if extreme {
            Self::extreme()
        } else {
            Self::standard()
        }
    }

    /// Enabled parameters that fall outside this table.
    pub fn check(&self, spec: &EffectSpec) -> Vec<LimitViolation> {
        let mut out = Vec::new();

        if spec.gaussian_noise.enabled {
            check_f64(
                &mut out,
                EffectKind::GaussianNoise,
                "variance",
                spec.gaussian_noise.params.variance,
                &self.variance,
            );
        }
        if spec.salt_pepper_noise.enabled {
            check_f64(
                &mut out,
                EffectKind::SaltPepperNoise,
                "amount",
                spec.salt_pepper_noise.params.amount,
                &self.amount,
            );
        }
        if spec.gaussian_blur.enabled {
            check_u32(
                &mut out,
                EffectKind::GaussianBlur,
                "kernel_size",
                spec.gaussian_blur.params.kernel_size,
                &self.gaussian_kernel,
            );
        }
        if spec.motion_blur.enabled {
            check_u32(
                &mut out,
                EffectKind::MotionBlur,
                "degree",
                spec.motion_blur.params.degree,
                &self.motion_degree,
            );
            check_f64(
                &mut out,
                EffectKind::MotionBlur,
                "angle",
                spec.motion_blur.params.angle,
                &self.motion_angle,
            );
        }
        if spec.box_blur.enabled {
            check_u32(
                &mut out,
                EffectKind::BoxBlur,
                "kernel_size",
                spec.box_blur.params.kernel_size,
                &self.box_kernel,
            );
        }
        if spec.camera_shake.enabled {
            check_u32(
                &mut out,
                EffectKind::CameraShake,
                "intensity",
                spec.camera_shake.params.intensity,
                &self.camera_intensity,
            );
        }
        if spec.directional_shake.enabled {
            check_u32(
                &mut out,
                EffectKind::DirectionalShake,
                "intensity",
                spec.directional_shake.params.intensity,
                &self.directional_intensity,
            );
        }
        if spec.motion_distortion.enabled {
            check_u32(
                &mut out,
                EffectKind::MotionDistortion,
                "intensity",
                spec.motion_distortion.params.intensity,
                &self.distortion_intensity,
            );
        }
        if spec.zoom_motion.enabled {
            check_u32(
                &mut out,
                EffectKind::ZoomMotion,
                "intensity",
                spec.zoom_motion.params.intensity,
                &self.zoom_intensity,
            );
        }

        out
    }
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self::standard()
    }
}

/// A parameter value outside its advertised range.
#[derive(Clone, Debug, PartialEq)]
pub struct LimitViolation {
    pub effect: EffectKind,
    pub param: &'static str,
    pub value: String,
    pub min: String,
    pub max: String,
}

impl fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} = {} is outside [{}, {}]",
            self.effect, self.param, self.value, self.min, self.max
        )
    }
}

fn check_f64(
    out: &mut Vec<LimitViolation>,
    effect: EffectKind,
    param: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) {
    if !range.contains(&value) {
        out.push(LimitViolation {
            effect,
            param,
            value: value.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        });
    }
}

fn check_u32(
    out: &mut Vec<LimitViolation>,
    effect: EffectKind,
    param: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) {
    if !range.contains(&value) {
        out.push(LimitViolation {
            effect,
            param,
            value: value.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Effect, GaussianNoise, ZoomMotion};

    #[test]
    fn defaults_fit_standard_table() {
        let mut spec = EffectSpec::default();
        for kind in EffectKind::EXECUTION_ORDER {
            let effect = spec.effect(kind);
            spec.set(effect, true);
        }
        assert!(ParamLimits::standard().check(&spec).is_empty());
    }

    #[test]
    fn extreme_values_flagged_only_in_standard_mode() {
        let spec = EffectSpec::default()
            .with(Effect::GaussianNoise(GaussianNoise { variance: 2.5 }))
            .with(Effect::ZoomMotion(ZoomMotion { intensity: 40 }));

        let standard = ParamLimits::for_mode(false).check(&spec);
        assert_eq!(standard.len(), 2);
        assert_eq!(standard[0].effect, EffectKind::GaussianNoise);
        assert!(standard[0].to_string().contains("gaussian_noise.variance"));

        assert!(ParamLimits::for_mode(true).check(&spec).is_empty());
    }

    #[test]
    fn disabled_effects_are_not_checked() {
        let mut spec = EffectSpec::default();
        spec.set(Effect::ZoomMotion(ZoomMotion { intensity: 500 }), false);
        assert!(ParamLimits::extreme().check(&spec).is_empty());
    }
}
