// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property resolution: what a clip looks and sounds like at one instant.

use crate::clip::Clip;
use crate::properties::{
    clamp_scale, clamp_unit, AppliedEffect, ClipKind, Material, ModelProperties, MIN_SPEED,
};
use serde::Serialize;

/// Flattened, renderer-ready properties of a clip at a global time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperties {
    /// Clip-local time, clamped into `[0, duration]`
    pub local_time: f32,
    /// Animation to play (3D only)
    pub active_animation: Option<String>,
    /// Animation speed multiplier
    pub animation_speed: f32,
    /// Whether the animation loops
    pub animation_loop: bool,
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Euler rotation in radians
    pub rotation: [f32; 3],
    /// Scale (x, y, z)
    pub scale: [f32; 3],
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Volume in `[0, 1]` (audio/video only)
    pub volume: Option<f32>,
    /// Surface material (3D only)
    pub material: Option<Material>,
    /// Applied effect
    pub applied_effect: Option<AppliedEffect>,
    /// Whether the image is an animated GIF
    pub is_animated_gif: bool,
}

struct AnimationChoice<'a> {
    active: Option<&'a str>,
    speed: f32,
    looping: bool,
}

/// Most recent keyframe at or before `local_time` wins; before the first
/// keyframe (or with none) the clip's default animation state applies.
fn choose_animation(model: &ModelProperties, local_time: f32) -> AnimationChoice<'_> {
    match model.keyframes.active_at(local_time) {
        Some(kf) => AnimationChoice {
            active: kf.active.as_deref(),
            speed: kf.speed,
            looping: kf.looping,
        },
        None => AnimationChoice {
            active: model.animation.active.as_deref(),
            speed: model.animation.speed,
            looping: model.animation.looping,
        },
    }
}

/// Resolve a clip's properties at a global time.
///
/// Base properties are static for the clip's whole lifetime; only the 3D
/// animation selection depends on time. Out-of-range stored values are
/// clamped rather than reported.
pub fn resolve(clip: &Clip, time: f32) -> ResolvedProperties {
    let local_time = clip.local_time(time);
    let props = &clip.properties;

    let mut resolved = ResolvedProperties {
        local_time,
        active_animation: None,
        animation_speed: 1.0,
        animation_loop: true,
        position: props.position,
        rotation: [0.0; 3],
        scale: clamp_scale(props.scale),
        opacity: clamp_unit(props.opacity),
        volume: props.volume().map(clamp_unit),
        material: None,
        applied_effect: props.applied_effect.clone(),
        is_animated_gif: props.is_animated_gif(),
    };

    if let ClipKind::Model(model) = &props.kind {
        let choice = choose_animation(model, local_time);
        resolved.active_animation = choice.active.map(str::to_string);
        resolved.animation_speed = choice.speed.max(MIN_SPEED);
        resolved.animation_loop = choice.looping;
        resolved.rotation = model.rotation;
        resolved.material = Some(model.material);
    }

    resolved
}
