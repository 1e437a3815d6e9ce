// SPDX-License-Identifier: MIT OR Apache-2.0
//! Imported media assets and the registry that owns them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

impl AssetId {
    /// Create a new random asset ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of media an asset holds; also the type a track accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Video file
    Video,
    /// Still or animated image
    Image,
    /// Audio file
    Audio,
    /// 3D model (glTF, FBX, OBJ)
    Model3d,
    /// Generated text
    Text,
    /// Visual effect layer
    Effect,
}

impl AssetType {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Model3d => "3D",
            Self::Text => "Text",
            Self::Effect => "Effect",
        }
    }

    /// Whether clips of this type drive an external media element
    pub fn is_timed_media(&self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }

    /// Get all asset types
    pub fn all() -> &'static [AssetType] {
        &[
            Self::Video,
            Self::Image,
            Self::Audio,
            Self::Model3d,
            Self::Text,
            Self::Effect,
        ]
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content of a text asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    /// Text to display
    pub content: String,
    /// Font size in pixels
    pub font_size: f32,
    /// CSS-style color
    pub color: String,
    /// Font family name
    pub font_family: String,
}

impl TextSpec {
    /// Create a text spec with default styling
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: 48.0,
            color: "#ffffff".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Kind of media an effect is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EffectTarget {
    /// Still images
    Image,
    /// Video
    #[default]
    Video,
    /// Text overlays
    Text,
}

/// Description of an effect asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Preset identifier
    pub effect_id: String,
    /// Media kind the effect targets
    #[serde(default)]
    pub target: EffectTarget,
    /// Filter expression applied by the renderer
    pub filter: Option<String>,
    /// Named animation applied by the renderer
    pub animation: Option<String>,
}

/// An imported or generated media asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset ID
    pub id: AssetId,
    /// Display name
    pub name: String,
    /// Media type
    pub asset_type: AssetType,
    /// Opaque handle to the underlying media (URL, path, blob key)
    pub source: String,
    /// Intrinsic duration for video/audio, in seconds
    pub natural_duration: Option<f32>,
    /// Text content, for text assets
    pub text: Option<TextSpec>,
    /// Effect description, for effect assets
    pub effect: Option<EffectSpec>,
}

impl Asset {
    /// Create a new media asset
    pub fn new(name: impl Into<String>, asset_type: AssetType, source: impl Into<String>) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            asset_type,
            source: source.into(),
            natural_duration: None,
            text: None,
            effect: None,
        }
    }

    /// Create a text asset
    pub fn text(spec: TextSpec) -> Self {
        let name: String = spec.content.chars().take(20).collect();
        Self {
            text: Some(spec),
            ..Self::new(name, AssetType::Text, String::new())
        }
    }

    /// Create an effect asset
    pub fn effect(name: impl Into<String>, spec: EffectSpec) -> Self {
        Self {
            effect: Some(spec),
            ..Self::new(name, AssetType::Effect, String::new())
        }
    }

    /// Set the intrinsic duration
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.natural_duration = Some(seconds);
        self
    }
}

/// Flat collection of assets, in import order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: IndexMap<AssetId, Asset>,
}

impl AssetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset
    pub fn add(&mut self, asset: Asset) -> AssetId {
        let id = asset.id;
        self.assets.insert(id, asset);
        id
    }

    /// Remove an asset. Clips referencing it are left in place.
    pub fn remove(&mut self, id: AssetId) -> Option<Asset> {
        self.assets.shift_remove(&id)
    }

    /// Get an asset
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    /// Get a mutable asset
    pub fn get_mut(&mut self, id: AssetId) -> Option<&mut Asset> {
        self.assets.get_mut(&id)
    }

    /// Replace the content of a text asset
    pub fn set_text(&mut self, id: AssetId, spec: TextSpec) -> bool {
        match self.assets.get_mut(&id) {
            Some(asset) if asset.asset_type == AssetType::Text => {
                asset.text = Some(spec);
                true
            }
            _ => false,
        }
    }

    /// Replace the description of an effect asset
    pub fn set_effect(&mut self, id: AssetId, spec: EffectSpec) -> bool {
        match self.assets.get_mut(&id) {
            Some(asset) if asset.asset_type == AssetType::Effect => {
                asset.effect = Some(spec);
                true
            }
            _ => false,
        }
    }

    /// Iterate over assets in import order
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Get asset count
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<Asset> for AssetRegistry {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().map(|a| (a.id, a)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_preserves_import_order() {
        let mut registry = AssetRegistry::new();
        let a = registry.add(Asset::new("a.mp4", AssetType::Video, "blob:a"));
        let b = registry.add(Asset::new("b.png", AssetType::Image, "blob:b"));
        let c = registry.add(Asset::new("c.mp3", AssetType::Audio, "blob:c"));

        registry.remove(b);
        let ids: Vec<_> = registry.iter().map(|asset| asset.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_text_edit_only_applies_to_text_assets() {
        let mut registry = AssetRegistry::new();
        let text = registry.add(Asset::text(TextSpec::new("Hello")));
        let image = registry.add(Asset::new("b.png", AssetType::Image, "blob:b"));

        assert!(registry.set_text(text, TextSpec::new("Goodbye")));
        assert!(!registry.set_text(image, TextSpec::new("Nope")));
        assert!(!registry.set_text(AssetId::new(), TextSpec::new("Missing")));

        let edited = registry.get(text).and_then(|a| a.text.as_ref());
        assert_eq!(edited.map(|t| t.content.as_str()), Some("Goodbye"));
        assert!(registry.get(image).is_some_and(|a| a.text.is_none()));
    }

    #[test]
    fn test_text_asset_name_is_truncated_content() {
        let asset = Asset::text(TextSpec::new("A fairly long caption for the intro"));
        assert_eq!(asset.name, "A fairly long captio");
        assert_eq!(asset.asset_type, AssetType::Text);
    }
}
