// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in effect presets.

use crate::asset::{EffectSpec, EffectTarget};
use EffectCategory::{Image, Text, Video, Viral};

/// Group an effect preset is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectCategory {
    /// Color filters for images
    Image,
    /// Entrance/exit motion for video
    Video,
    /// Short-form social effects
    Viral,
    /// Text animations
    Text,
}

impl EffectCategory {
    /// Media kind presets in this category are applied to
    pub fn target(&self) -> EffectTarget {
        match self {
            Self::Image => EffectTarget::Image,
            Self::Video | Self::Viral => EffectTarget::Video,
            Self::Text => EffectTarget::Text,
        }
    }
}

/// A named effect preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPreset {
    /// Preset identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Category
    pub category: EffectCategory,
    /// Filter expression, if the preset is a filter
    pub filter: Option<&'static str>,
    /// Animation name, if the preset animates
    pub animation: Option<&'static str>,
}

impl EffectPreset {
    const fn filter(
        id: &'static str,
        name: &'static str,
        category: EffectCategory,
        filter: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            category,
            filter: Some(filter),
            animation: None,
        }
    }

    const fn animation(
        id: &'static str,
        name: &'static str,
        category: EffectCategory,
        animation: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            category,
            filter: None,
            animation: Some(animation),
        }
    }

    /// Build the effect description stored on an effect asset
    pub fn spec(&self) -> EffectSpec {
        EffectSpec {
            effect_id: self.id.to_string(),
            target: self.category.target(),
            filter: self.filter.map(str::to_string),
            animation: self.animation.map(str::to_string),
        }
    }

    /// Get all presets
    pub fn all() -> &'static [EffectPreset] {
        PRESETS
    }

    /// Get presets in a category
    pub fn in_category(
        category: EffectCategory,
    ) -> impl Iterator<Item = &'static EffectPreset> {
        PRESETS.iter().filter(move |p| p.category == category)
    }

    /// Look up a preset by ID
    pub fn find(id: &str) -> Option<&'static EffectPreset> {
        PRESETS.iter().find(|p| p.id == id)
    }
}

const PRESETS: &[EffectPreset] = &[
    EffectPreset::filter("blur", "Blur", Image, "blur(5px)"),
    EffectPreset::filter("grayscale", "Black & White", Image, "grayscale(100%)"),
    EffectPreset::filter("sepia", "Sepia", Image, "sepia(100%)"),
    EffectPreset::filter("brightness", "Brightness", Image, "brightness(150%)"),
    EffectPreset::filter("contrast", "Contrast", Image, "contrast(150%)"),
    EffectPreset::filter("saturate", "Saturation", Image, "saturate(200%)"),
    EffectPreset::filter("hue-rotate", "Hue Rotate", Image, "hue-rotate(90deg)"),
    EffectPreset::filter("invert", "Invert", Image, "invert(100%)"),
    EffectPreset::animation("fade-in", "Fade In", Video, "fade-in"),
    EffectPreset::animation("fade-out", "Fade Out", Video, "fade-out"),
    EffectPreset::animation("zoom-in", "Zoom In", Video, "zoom-in"),
    EffectPreset::animation("zoom-out", "Zoom Out", Video, "zoom-out"),
    EffectPreset::animation("slide-left", "Slide Left", Video, "slide-left"),
    EffectPreset::animation("slide-right", "Slide Right", Video, "slide-right"),
    EffectPreset::animation("glitch", "Glitch", Viral, "glitch"),
    EffectPreset::filter("rgb-split", "RGB Split", Viral, "rgb-split"),
    EffectPreset::animation("shake-intense", "Shake", Viral, "shake-intense"),
    EffectPreset::animation("zoom-punch", "Zoom Punch", Viral, "zoom-punch"),
    EffectPreset::animation("flash-strobe", "Flash", Viral, "flash-strobe"),
    EffectPreset::filter("chromatic", "Chromatic", Viral, "chromatic"),
    EffectPreset::filter("distortion", "Distortion", Viral, "distortion"),
    EffectPreset::filter("vhs", "VHS", Viral, "vhs"),
    EffectPreset::animation("bounce", "Bounce", Text, "bounce"),
    EffectPreset::animation("pulse", "Pulse", Text, "pulse"),
    EffectPreset::animation("shake", "Shake", Text, "shake"),
    EffectPreset::animation("glow", "Glow", Text, "glow"),
    EffectPreset::animation("typewriter", "Typewriter", Text, "typewriter"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_ids_are_unique() {
        let ids: HashSet<_> = EffectPreset::all().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), EffectPreset::all().len());
    }

    #[test]
    fn test_preset_spec() {
        let spec = EffectPreset::find("sepia").map(EffectPreset::spec);
        assert_eq!(
            spec,
            Some(EffectSpec {
                effect_id: "sepia".to_string(),
                target: EffectTarget::Image,
                filter: Some("sepia(100%)".to_string()),
                animation: None,
            })
        );
        assert!(EffectPreset::find("sparkles").is_none());
    }

    #[test]
    fn test_every_preset_does_something() {
        for preset in EffectPreset::all() {
            assert!(preset.filter.is_some() || preset.animation.is_some(), "{}", preset.id);
        }
        assert_eq!(EffectPreset::in_category(EffectCategory::Text).count(), 5);
    }

    #[test]
    fn test_viral_presets_target_video() {
        let glitch = EffectPreset::find("glitch").map(EffectPreset::spec);
        assert_eq!(glitch.map(|s| s.target), Some(EffectTarget::Video));
        let bounce = EffectPreset::find("bounce").map(EffectPreset::spec);
        assert_eq!(bounce.map(|s| s.target), Some(EffectTarget::Text));
    }
}
