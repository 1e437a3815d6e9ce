// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-clip properties.
//!
//! Every clip carries a shared transform (position, scale, opacity, effect)
//! plus a [`ClipKind`] holding only the fields that make sense for its
//! asset type: volume for audio and video, the GIF flag for images,
//! rotation, material and animation for 3D models.

use crate::asset::{AssetType, EffectSpec};
use crate::keyframe::KeyframeTrack;
use serde::{Deserialize, Serialize};

/// Smallest allowed scale factor
pub const MIN_SCALE: f32 = 0.1;
/// Largest allowed scale factor
pub const MAX_SCALE: f32 = 5.0;
/// Smallest allowed animation speed
pub const MIN_SPEED: f32 = 0.1;

/// Clamp each scale component into `[MIN_SCALE, MAX_SCALE]`
pub fn clamp_scale(scale: [f32; 3]) -> [f32; 3] {
    scale.map(|s| s.clamp(MIN_SCALE, MAX_SCALE))
}

/// Clamp a unit value (opacity, volume) into `[0, 1]`
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Effect applied to a clip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedEffect {
    /// Preset identifier
    pub effect_id: String,
    /// Filter expression
    pub filter: Option<String>,
    /// Animation name
    pub animation: Option<String>,
}

impl From<&EffectSpec> for AppliedEffect {
    fn from(spec: &EffectSpec) -> Self {
        Self {
            effect_id: spec.effect_id.clone(),
            filter: spec.filter.clone(),
            animation: spec.animation.clone(),
        }
    }
}

/// Surface material of a 3D model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Render as wireframe
    pub wireframe: bool,
    /// Metalness in `[0, 1]`
    pub metalness: f32,
    /// Roughness in `[0, 1]`
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            wireframe: false,
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

/// Default animation settings of a 3D clip, used before the first keyframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Animation names exposed by the model
    pub available: Vec<String>,
    /// Currently playing animation; at most one plays at a time
    pub active: Option<String>,
    /// Playback speed multiplier
    pub speed: f32,
    /// Whether the animation loops
    pub looping: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            available: Vec::new(),
            active: None,
            speed: 1.0,
            looping: true,
        }
    }
}

impl AnimationState {
    /// Copy of this state with `name` toggled: selecting a new animation
    /// replaces the current one, selecting the current one stops it
    pub fn toggled(&self, name: &str) -> Self {
        let active = match self.active.as_deref() {
            Some(current) if current == name => None,
            _ => Some(name.to_string()),
        };
        Self {
            active,
            ..self.clone()
        }
    }
}

/// Properties specific to 3D model clips
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelProperties {
    /// Euler rotation in radians
    pub rotation: [f32; 3],
    /// Surface material
    pub material: Material,
    /// Default animation state
    pub animation: AnimationState,
    /// Animation keyframes
    pub keyframes: KeyframeTrack,
}

/// Kind-specific clip properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClipKind {
    /// Video clip
    Video {
        /// Volume in `[0, 1]`
        volume: f32,
    },
    /// Audio clip
    Audio {
        /// Volume in `[0, 1]`
        volume: f32,
    },
    /// Image clip
    Image {
        /// Whether the image is an animated GIF
        is_animated_gif: bool,
    },
    /// 3D model clip
    Model(ModelProperties),
    /// Text clip
    Text,
    /// Effect clip
    Effect,
}

impl ClipKind {
    /// Default kind data for an asset type
    pub fn for_asset_type(asset_type: AssetType) -> Self {
        match asset_type {
            AssetType::Video => Self::Video { volume: 1.0 },
            AssetType::Audio => Self::Audio { volume: 1.0 },
            AssetType::Image => Self::Image { is_animated_gif: false },
            AssetType::Model3d => Self::Model(ModelProperties::default()),
            AssetType::Text => Self::Text,
            AssetType::Effect => Self::Effect,
        }
    }

    /// The asset type this kind belongs to
    pub fn asset_type(&self) -> AssetType {
        match self {
            Self::Video { .. } => AssetType::Video,
            Self::Audio { .. } => AssetType::Audio,
            Self::Image { .. } => AssetType::Image,
            Self::Model(_) => AssetType::Model3d,
            Self::Text => AssetType::Text,
            Self::Effect => AssetType::Effect,
        }
    }
}

/// Visual and audio parameters of a clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipProperties {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Scale (x, y, z)
    pub scale: [f32; 3],
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Applied effect; a clip carries at most one
    pub applied_effect: Option<AppliedEffect>,
    /// Kind-specific properties
    pub kind: ClipKind,
}

impl ClipProperties {
    /// Default properties for a clip of the given asset type
    pub fn for_asset_type(asset_type: AssetType) -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            opacity: 1.0,
            applied_effect: None,
            kind: ClipKind::for_asset_type(asset_type),
        }
    }

    /// Volume, for audio and video clips
    pub fn volume(&self) -> Option<f32> {
        match self.kind {
            ClipKind::Video { volume } | ClipKind::Audio { volume } => Some(volume),
            _ => None,
        }
    }

    /// Model properties, for 3D clips
    pub fn model(&self) -> Option<&ModelProperties> {
        match &self.kind {
            ClipKind::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Mutable model properties, for 3D clips
    pub fn model_mut(&mut self) -> Option<&mut ModelProperties> {
        match &mut self.kind {
            ClipKind::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Whether this is an animated GIF image
    pub fn is_animated_gif(&self) -> bool {
        matches!(self.kind, ClipKind::Image { is_animated_gif: true })
    }
}

/// Shallow, top-level edit of clip properties.
///
/// Each `Some` field replaces the stored value wholesale; nested values are
/// never merged. To change one field of `animation`, pass a full
/// [`AnimationState`] built from the current one. Fields that do not apply
/// to the clip's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertiesUpdate {
    /// New position
    pub position: Option<[f32; 3]>,
    /// New scale
    pub scale: Option<[f32; 3]>,
    /// New opacity
    pub opacity: Option<f32>,
    /// New applied effect (`Some(None)` removes it)
    pub applied_effect: Option<Option<AppliedEffect>>,
    /// New volume (audio/video)
    pub volume: Option<f32>,
    /// New animated-GIF flag (image)
    pub is_animated_gif: Option<bool>,
    /// New rotation (3D)
    pub rotation: Option<[f32; 3]>,
    /// New material (3D)
    pub material: Option<Material>,
    /// New default animation state (3D)
    pub animation: Option<AnimationState>,
    /// New keyframe track (3D)
    pub keyframes: Option<KeyframeTrack>,
}

impl PropertiesUpdate {
    /// Apply to stored properties, clamping numeric input into range
    pub fn apply(self, props: &mut ClipProperties) {
        if let Some(position) = self.position {
            props.position = position;
        }
        if let Some(scale) = self.scale {
            props.scale = clamp_scale(scale);
        }
        if let Some(opacity) = self.opacity {
            props.opacity = clamp_unit(opacity);
        }
        if let Some(effect) = self.applied_effect {
            props.applied_effect = effect;
        }

        match &mut props.kind {
            ClipKind::Video { volume } | ClipKind::Audio { volume } => {
                if let Some(v) = self.volume {
                    *volume = clamp_unit(v);
                }
            }
            ClipKind::Image { is_animated_gif } => {
                if let Some(gif) = self.is_animated_gif {
                    *is_animated_gif = gif;
                }
            }
            ClipKind::Model(model) => {
                if let Some(rotation) = self.rotation {
                    model.rotation = rotation;
                }
                if let Some(material) = self.material {
                    model.material = Material {
                        metalness: clamp_unit(material.metalness),
                        roughness: clamp_unit(material.roughness),
                        ..material
                    };
                }
                if let Some(mut animation) = self.animation {
                    animation.speed = animation.speed.max(MIN_SPEED);
                    model.animation = animation;
                }
                if let Some(keyframes) = self.keyframes {
                    model.keyframes = keyframes;
                }
            }
            ClipKind::Text | ClipKind::Effect => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;

    #[test]
    fn test_defaults_per_asset_type() {
        let video = ClipProperties::for_asset_type(AssetType::Video);
        assert_eq!(video.volume(), Some(1.0));
        assert!(video.model().is_none());

        let model = ClipProperties::for_asset_type(AssetType::Model3d);
        assert_eq!(model.volume(), None);
        let m = model.model().cloned().unwrap_or_default();
        assert_eq!(m.material.roughness, 1.0);
        assert_eq!(m.animation.speed, 1.0);
        assert!(m.animation.looping);

        for asset_type in AssetType::all() {
            assert_eq!(ClipKind::for_asset_type(*asset_type).asset_type(), *asset_type);
        }
    }

    #[test]
    fn test_animation_replaced_wholesale() {
        let mut props = ClipProperties::for_asset_type(AssetType::Model3d);
        PropertiesUpdate {
            animation: Some(AnimationState {
                available: vec!["Idle".into(), "Walk".into()],
                active: Some("Idle".into()),
                speed: 1.5,
                looping: false,
            }),
            ..Default::default()
        }
        .apply(&mut props);

        // Caller passes only a speed change without spreading the old state
        PropertiesUpdate {
            animation: Some(AnimationState {
                speed: 2.0,
                ..Default::default()
            }),
            ..Default::default()
        }
        .apply(&mut props);

        let animation = props.model().map(|m| m.animation.clone()).unwrap_or_default();
        assert!(animation.available.is_empty());
        assert_eq!(animation.active, None);
        assert_eq!(animation.speed, 2.0);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let mut props = ClipProperties::for_asset_type(AssetType::Audio);
        PropertiesUpdate {
            scale: Some([0.0, 9.0, 1.0]),
            opacity: Some(1.7),
            volume: Some(-0.5),
            ..Default::default()
        }
        .apply(&mut props);

        assert_eq!(props.scale, [MIN_SCALE, MAX_SCALE, 1.0]);
        assert_eq!(props.opacity, 1.0);
        assert_eq!(props.volume(), Some(0.0));
    }

    #[test]
    fn test_foreign_fields_are_ignored() {
        let mut props = ClipProperties::for_asset_type(AssetType::Image);
        let before = props.clone();
        PropertiesUpdate {
            volume: Some(0.2),
            rotation: Some([1.0, 0.0, 0.0]),
            keyframes: Some([Keyframe::new(1.0, None)].into_iter().collect()),
            ..Default::default()
        }
        .apply(&mut props);
        assert_eq!(props, before);
    }

    #[test]
    fn test_toggle_keeps_single_animation() {
        let state = AnimationState {
            available: vec!["Walk".into(), "Run".into()],
            ..Default::default()
        };
        let walking = state.toggled("Walk");
        assert_eq!(walking.active.as_deref(), Some("Walk"));

        let running = walking.toggled("Run");
        assert_eq!(running.active.as_deref(), Some("Run"));

        let stopped = running.toggled("Run");
        assert_eq!(stopped.active, None);
        assert_eq!(stopped.available, state.available);
    }
}
