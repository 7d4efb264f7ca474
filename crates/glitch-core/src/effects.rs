//! Typed effect configuration.
//!
//! The JSON shape mirrors the control surface's configuration: one entry per
//! effect id, each `{"enabled": bool, ...params}`. Missing entries are
//! disabled and carry the control-surface defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Filter category. Categories run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Noise,
    Blur,
    Shake,
    Motion,
}

/// The nine effect identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    GaussianNoise,
    SaltPepperNoise,
    GaussianBlur,
    MotionBlur,
    BoxBlur,
    CameraShake,
    DirectionalShake,
    MotionDistortion,
    ZoomMotion,
}

impl EffectKind {
    /// Fixed execution order: noise, blur, shake, motion, with the
    /// per-category sub-order baked in.
    pub const EXECUTION_ORDER: [EffectKind; 9] = [
        EffectKind::GaussianNoise,
        EffectKind::SaltPepperNoise,
        EffectKind::GaussianBlur,
        EffectKind::MotionBlur,
        EffectKind::BoxBlur,
        EffectKind::CameraShake,
        EffectKind::DirectionalShake,
        EffectKind::MotionDistortion,
        EffectKind::ZoomMotion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::GaussianNoise => "gaussian_noise",
            EffectKind::SaltPepperNoise => "salt_pepper_noise",
            EffectKind::GaussianBlur => "gaussian_blur",
            EffectKind::MotionBlur => "motion_blur",
            EffectKind::BoxBlur => "box_blur",
            EffectKind::CameraShake => "camera_shake",
            EffectKind::DirectionalShake => "directional_shake",
            EffectKind::MotionDistortion => "motion_distortion",
            EffectKind::ZoomMotion => "zoom_motion",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EffectKind::GaussianNoise => "Gaussian Noise",
            EffectKind::SaltPepperNoise => "Salt Pepper Noise",
            EffectKind::GaussianBlur => "Gaussian Blur",
            EffectKind::MotionBlur => "Motion Blur",
            EffectKind::BoxBlur => "Box Blur",
            EffectKind::CameraShake => "Camera Shake",
            EffectKind::DirectionalShake => "Directional Shake",
            EffectKind::MotionDistortion => "Motion Distortion",
            EffectKind::ZoomMotion => "Zoom Motion",
        }
    }

    pub fn category(self) -> Category {
        match self {
            EffectKind::GaussianNoise | EffectKind::SaltPepperNoise => Category::Noise,
            EffectKind::GaussianBlur | EffectKind::MotionBlur | EffectKind::BoxBlur => {
                Category::Blur
            }
            EffectKind::CameraShake | EffectKind::DirectionalShake => Category::Shake,
            EffectKind::MotionDistortion | EffectKind::ZoomMotion => Category::Motion,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShakeDirection {
    #[default]
    Horizontal,
    Vertical,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionDirection {
    #[default]
    Horizontal,
    Vertical,
    Diagonal,
}

/// Per-pixel additive normal noise, `sigma = sqrt(variance)` on the 0..1 scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianNoise {
    pub variance: f64,
}

impl Default for GaussianNoise {
    fn default() -> Self {
        Self { variance: 0.02 }
    }
}

/// Impulse noise; `amount` is the affected fraction of pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaltPepperNoise {
    pub amount: f64,
}

impl Default for SaltPepperNoise {
    fn default() -> Self {
        Self { amount: 0.01 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianBlur {
    pub kernel_size: u32,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self { kernel_size: 7 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionBlur {
    pub degree: u32,
    /// Degrees, 0..=360.
    pub angle: f64,
}

impl Default for MotionBlur {
    fn default() -> Self {
        Self {
            degree: 20,
            angle: 45.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxBlur {
    pub kernel_size: u32,
}

impl Default for BoxBlur {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraShake {
    /// Maximum displacement in pixels along each axis.
    pub intensity: u32,
}

impl Default for CameraShake {
    fn default() -> Self {
        Self { intensity: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalShake {
    pub intensity: u32,
    pub direction: ShakeDirection,
}

impl Default for DirectionalShake {
    fn default() -> Self {
        Self {
            intensity: 8,
            direction: ShakeDirection::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionDistortion {
    pub direction: MotionDirection,
    /// Streak length in pixels.
    pub intensity: u32,
}

impl Default for MotionDistortion {
    fn default() -> Self {
        Self {
            direction: MotionDirection::Horizontal,
            intensity: 15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomMotion {
    /// Number of blend steps.
    pub intensity: u32,
}

impl Default for ZoomMotion {
    fn default() -> Self {
        Self { intensity: 5 }
    }
}

/// An effect entry: on/off switch plus its parameter record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Toggle<P> {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub params: P,
}

impl<P> Toggle<P> {
    pub fn on(params: P) -> Self {
        Self {
            enabled: true,
            params,
        }
    }
}

/// One effect with its typed parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    GaussianNoise(GaussianNoise),
    SaltPepperNoise(SaltPepperNoise),
    GaussianBlur(GaussianBlur),
    MotionBlur(MotionBlur),
    BoxBlur(BoxBlur),
    CameraShake(CameraShake),
    DirectionalShake(DirectionalShake),
    MotionDistortion(MotionDistortion),
    ZoomMotion(ZoomMotion),
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::GaussianNoise(_) => EffectKind::GaussianNoise,
            Effect::SaltPepperNoise(_) => EffectKind::SaltPepperNoise,
            Effect::GaussianBlur(_) => EffectKind::GaussianBlur,
            Effect::MotionBlur(_) => EffectKind::MotionBlur,
            Effect::BoxBlur(_) => EffectKind::BoxBlur,
            Effect::CameraShake(_) => EffectKind::CameraShake,
            Effect::DirectionalShake(_) => EffectKind::DirectionalShake,
            Effect::MotionDistortion(_) => EffectKind::MotionDistortion,
            Effect::ZoomMotion(_) => EffectKind::ZoomMotion,
        }
    }
}

/// Full effect configuration, one entry per kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSpec {
    pub gaussian_noise: Toggle<GaussianNoise>,
    pub salt_pepper_noise: Toggle<SaltPepperNoise>,
    pub gaussian_blur: Toggle<GaussianBlur>,
    pub motion_blur: Toggle<MotionBlur>,
    pub box_blur: Toggle<BoxBlur>,
    pub camera_shake: Toggle<CameraShake>,
    pub directional_shake: Toggle<DirectionalShake>,
    pub motion_distortion: Toggle<MotionDistortion>,
    pub zoom_motion: Toggle<ZoomMotion>,
}

impl EffectSpec {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::invalid(format!("effect spec: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::processing(format!("serialize effect spec: {e}")))
    }

    /// Enable `effect` with its parameters, replacing the previous entry.
    pub fn with(mut self, effect: Effect) -> Self {
        self.set(effect, true);
        self
    }

    pub fn set(&mut self, effect: Effect, enabled: bool) {
        match effect {
            Effect::GaussianNoise(p) => self.gaussian_noise = Toggle { enabled, params: p },
            Effect::SaltPepperNoise(p) => self.salt_pepper_noise = Toggle { enabled, params: p },
            Effect::GaussianBlur(p) => self.gaussian_blur = Toggle { enabled, params: p },
            Effect::MotionBlur(p) => self.motion_blur = Toggle { enabled, params: p },
            Effect::BoxBlur(p) => self.box_blur = Toggle { enabled, params: p },
            Effect::CameraShake(p) => self.camera_shake = Toggle { enabled, params: p },
            Effect::DirectionalShake(p) => self.directional_shake = Toggle { enabled, params: p },
            Effect::MotionDistortion(p) => self.motion_distortion = Toggle { enabled, params: p },
            Effect::ZoomMotion(p) => self.zoom_motion = Toggle { enabled, params: p },
        }
    }

    pub fn is_enabled(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::GaussianNoise => self.gaussian_noise.enabled,
            EffectKind::SaltPepperNoise => self.salt_pepper_noise.enabled,
            EffectKind::GaussianBlur => self.gaussian_blur.enabled,
            EffectKind::MotionBlur => self.motion_blur.enabled,
            EffectKind::BoxBlur => self.box_blur.enabled,
            EffectKind::CameraShake => self.camera_shake.enabled,
            EffectKind::DirectionalShake => self.directional_shake.enabled,
            EffectKind::MotionDistortion => self.motion_distortion.enabled,
            EffectKind::ZoomMotion => self.zoom_motion.enabled,
        }
    }

    /// Parameters for `kind`, whether or not it is enabled.
    pub fn effect(&self, kind: EffectKind) -> Effect {
        match kind {
            EffectKind::GaussianNoise => Effect::GaussianNoise(self.gaussian_noise.params),
            EffectKind::SaltPepperNoise => Effect::SaltPepperNoise(self.salt_pepper_noise.params),
            EffectKind::GaussianBlur => Effect::GaussianBlur(self.gaussian_blur.params),
            EffectKind::MotionBlur => Effect::MotionBlur(self.motion_blur.params),
            EffectKind::BoxBlur => Effect::BoxBlur(self.box_blur.params),
            EffectKind::CameraShake => Effect::CameraShake(self.camera_shake.params),
            EffectKind::DirectionalShake => {
                Effect::DirectionalShake(self.directional_shake.params)
            }
            EffectKind::MotionDistortion => {
                Effect::MotionDistortion(self.motion_distortion.params)
            }
            EffectKind::ZoomMotion => Effect::ZoomMotion(self.zoom_motion.params),
        }
    }

    /// Enabled effects in execution order.
    pub fn enabled_effects(&self) -> Vec<Effect> {
        EffectKind::EXECUTION_ORDER
            .iter()
            .filter(|&&k| self.is_enabled(k))
            .map(|&k| self.effect(k))
            .collect()
    }

    pub fn any_enabled(&self) -> bool {
        EffectKind::EXECUTION_ORDER
            .iter()
            .any(|&k| self.is_enabled(k))
    }

    pub fn active_effect_names(&self) -> Vec<&'static str> {
        EffectKind::EXECUTION_ORDER
            .iter()
            .filter(|&&k| self.is_enabled(k))
            .map(|k| k.display_name())
            .collect()
    }
}
