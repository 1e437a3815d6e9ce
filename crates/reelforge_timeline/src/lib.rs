// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline core for the ReelForge editor.
//!
//! This crate provides the editing model and its playback evaluation:
//! - Asset registry (video, image, audio, 3D model, text, effect)
//! - Typed tracks holding time-placed clips
//! - Per-clip properties tagged by asset kind
//! - Animation keyframes for 3D clips
//! - Property resolution at a global time
//! - Frame composition in painter's order
//!
//! ## Architecture
//!
//! Everything here is plain owned data and pure functions. A host owns a
//! [`Timeline`] and an [`AssetRegistry`], mutates them through their
//! operations, and calls [`evaluate`] once per tick to get a
//! [`FrameDescriptor`] for the renderer.

pub mod asset;
pub mod clip;
pub mod composition;
pub mod effects;
pub mod error;
pub mod keyframe;
pub mod properties;
pub mod resolve;
pub mod timeline;
pub mod track;

pub use asset::{Asset, AssetId, AssetRegistry, AssetType, EffectSpec, EffectTarget, TextSpec};
pub use clip::{Clip, ClipEdge, ClipId, ClipUpdate, MIN_CLIP_DURATION};
pub use composition::{evaluate, FrameDescriptor, FrameLayer, PlaybackDirective, SYNC_TOLERANCE};
pub use effects::{EffectCategory, EffectPreset};
pub use error::{Result, TimelineError};
pub use keyframe::{Keyframe, KeyframeId, KeyframeTrack, KeyframeUpdate};
pub use properties::{
    AnimationState, AppliedEffect, ClipKind, ClipProperties, Material, ModelProperties,
    PropertiesUpdate,
};
pub use resolve::{resolve, ResolvedProperties};
pub use timeline::{OverlapPolicy, Timeline};
pub use track::{Track, TrackId};
