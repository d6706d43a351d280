use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ViewerError;
use crate::gfx::catalog::PrimitiveCatalog;
use crate::gfx::material::{Material, MaterialKind};
use crate::viewer::AnimationState;

/// How `set_opacity` treats values outside `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpacityPolicy {
    /// Store whatever was given
    #[default]
    PassThrough,
    /// Clamp into `[0, 1]`
    Clamp,
}

/// Which built-in primitive list the viewer cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogVariant {
    #[default]
    Standard,
    Extended,
}

impl CatalogVariant {
    pub fn build(&self) -> PrimitiveCatalog {
        match self {
            CatalogVariant::Standard => PrimitiveCatalog::standard(),
            CatalogVariant::Extended => PrimitiveCatalog::extended(),
        }
    }
}

impl fmt::Display for CatalogVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogVariant::Standard => f.write_str("standard"),
            CatalogVariant::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for CatalogVariant {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(CatalogVariant::Standard),
            "extended" | "legacy" => Ok(CatalogVariant::Extended),
            _ => Err(ViewerError::UnknownName {
                kind: "catalog",
                name: s.to_string(),
            }),
        }
    }
}

/// Startup choices for a viewer session
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub catalog: CatalogVariant,
    pub initial_animation: AnimationState,
    pub opacity_policy: OpacityPolicy,
    pub initial_material: Material,
    /// Radians added to the X and Y rotation on every running frame
    pub rotation_step: f32,
    /// Uniform scale applied to imported models
    pub import_scale: f32,
    pub screenshot_path: PathBuf,
    /// Seed for the color randomizer; `None` seeds from the OS
    pub seed: Option<u64>,
    pub window_size: (u32, u32),
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogVariant::Standard,
            initial_animation: AnimationState::Running,
            opacity_policy: OpacityPolicy::PassThrough,
            initial_material: Material::new(MaterialKind::Standard, 0x00ff00, 0.75),
            rotation_step: 0.01,
            import_scale: 0.5,
            screenshot_path: PathBuf::from("screenshot.png"),
            seed: None,
            window_size: (1280, 720),
        }
    }
}

impl ViewerConfig {
    /// The older viewer: all 21 shapes, a half transparent basic material and
    /// clamped opacity
    pub fn legacy() -> Self {
        Self {
            catalog: CatalogVariant::Extended,
            opacity_policy: OpacityPolicy::Clamp,
            initial_material: Material::new(MaterialKind::Basic, 0x00ff00, 0.5),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_legacy_presets() {
        let config = ViewerConfig::default();
        assert_eq!(config.initial_animation, AnimationState::Running);
        assert_eq!(config.opacity_policy, OpacityPolicy::PassThrough);
        assert_eq!(config.initial_material.kind, MaterialKind::Standard);
        assert_eq!(config.import_scale, 0.5);

        let legacy = ViewerConfig::legacy();
        assert_eq!(legacy.catalog, CatalogVariant::Extended);
        assert_eq!(legacy.opacity_policy, OpacityPolicy::Clamp);
        assert_eq!(legacy.initial_material.opacity, 0.5);
        assert_eq!(legacy.catalog.build().len(), 21);
    }

    #[test]
    fn test_parse_catalog_variant() {
        assert_eq!("legacy".parse::<CatalogVariant>().unwrap(), CatalogVariant::Extended);
        assert_eq!("Standard".parse::<CatalogVariant>().unwrap(), CatalogVariant::Standard);
        assert!("huge".parse::<CatalogVariant>().is_err());
    }
}
