use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;

/// Shading model of the shared object material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit flat color
    Basic,
    /// Diffuse only
    Lambert,
    /// Diffuse plus specular highlight
    Phong,
    /// Metalness / roughness
    Standard,
    /// Banded diffuse
    Toon,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Basic,
        MaterialKind::Phong,
        MaterialKind::Standard,
        MaterialKind::Lambert,
        MaterialKind::Toon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Basic => "basic",
            MaterialKind::Lambert => "lambert",
            MaterialKind::Phong => "phong",
            MaterialKind::Standard => "standard",
            MaterialKind::Toon => "toon",
        }
    }

    /// Index used by the shader to pick a lighting model
    pub fn shader_id(&self) -> u32 {
        match self {
            MaterialKind::Basic => 0,
            MaterialKind::Lambert => 1,
            MaterialKind::Phong => 2,
            MaterialKind::Standard => 3,
            MaterialKind::Toon => 4,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(MaterialKind::Basic),
            "lambert" => Ok(MaterialKind::Lambert),
            "phong" => Ok(MaterialKind::Phong),
            "standard" => Ok(MaterialKind::Standard),
            "toon" => Ok(MaterialKind::Toon),
            _ => Err(ViewerError::UnknownName {
                kind: "material",
                name: s.to_string(),
            }),
        }
    }
}

/// Parameters that only make sense for one material kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialParams {
    None,
    Phong { shininess: f32 },
    Standard { metalness: f32, roughness: f32 },
    Toon { steps: u32 },
}

impl MaterialParams {
    pub fn defaults_for(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Basic | MaterialKind::Lambert => MaterialParams::None,
            MaterialKind::Phong => MaterialParams::Phong { shininess: 30.0 },
            MaterialKind::Standard => MaterialParams::Standard {
                metalness: 0.0,
                roughness: 1.0,
            },
            MaterialKind::Toon => MaterialParams::Toon { steps: 3 },
        }
    }
}

/// The one material shared by whatever object is on screen
///
/// Survives object swaps; only [`Material::with_kind`] replaces it, carrying the
/// common properties over.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// 24-bit RGB
    pub color: u32,
    pub opacity: f32,
    pub wireframe: bool,
    pub params: MaterialParams,
}

impl Material {
    pub fn new(kind: MaterialKind, color: u32, opacity: f32) -> Self {
        Self {
            kind,
            color: color & 0xFF_FFFF,
            opacity,
            wireframe: false,
            params: MaterialParams::defaults_for(kind),
        }
    }

    /// New material of another kind with the same color, opacity and wireframe flag
    pub fn with_kind(&self, kind: MaterialKind) -> Self {
        Self {
            kind,
            color: self.color,
            opacity: self.opacity,
            wireframe: self.wireframe,
            params: MaterialParams::defaults_for(kind),
        }
    }

    /// Material is blended when not fully opaque
    pub fn transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Linear-ish RGB in `0..=1`, as the shader expects
    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }

    pub fn uniform(&self) -> MaterialUniform {
        let [r, g, b] = self.rgb();
        let (shininess, metalness, roughness, steps) = match self.params {
            MaterialParams::None => (0.0, 0.0, 1.0, 0.0),
            MaterialParams::Phong { shininess } => (shininess, 0.0, 1.0, 0.0),
            MaterialParams::Standard { metalness, roughness } => (0.0, metalness, roughness, 0.0),
            MaterialParams::Toon { steps } => (0.0, 0.0, 1.0, steps as f32),
        };
        MaterialUniform {
            base_color: [r, g, b, self.opacity.clamp(0.0, 1.0)],
            shininess,
            metalness,
            roughness,
            toon_steps: steps,
            kind: self.kind.shader_id(),
            _padding: [0; 3],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::new(MaterialKind::Standard, 0x00ff00, 0.75)
    }
}

pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub fn rgb_to_hex(rgb: [f32; 3]) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(rgb[0]) << 16) | (channel(rgb[1]) << 8) | channel(rgb[2])
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub shininess: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub toon_steps: f32,
    pub kind: u32,
    _padding: [u32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_kind_carries_common_properties() {
        let mut material = Material::new(MaterialKind::Standard, 0x123456, 0.3);
        material.wireframe = true;
        material.params = MaterialParams::Standard {
            metalness: 0.9,
            roughness: 0.1,
        };

        let phong = material.with_kind(MaterialKind::Phong);
        assert_eq!(phong.color, 0x123456);
        assert_eq!(phong.opacity, 0.3);
        assert!(phong.wireframe);
        assert_eq!(phong.params, MaterialParams::Phong { shininess: 30.0 });

        // back to standard resets the extra params
        let standard = phong.with_kind(MaterialKind::Standard);
        assert_eq!(
            standard.params,
            MaterialParams::Standard {
                metalness: 0.0,
                roughness: 1.0
            }
        );
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Phong".parse::<MaterialKind>().unwrap(), MaterialKind::Phong);
        assert_eq!(" toon ".parse::<MaterialKind>().unwrap(), MaterialKind::Toon);
        assert!("matte".parse::<MaterialKind>().is_err());
        for kind in MaterialKind::ALL {
            assert_eq!(kind.as_str().parse::<MaterialKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(hex_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb_to_hex([0.0, 1.0, 0.0]), 0x00ff00);
        assert_eq!(rgb_to_hex(hex_to_rgb(0x3c7fa2)), 0x3c7fa2);
        assert_eq!(Material::new(MaterialKind::Basic, 0xAB123456, 1.0).color, 0x123456);
    }

    #[test]
    fn test_uniform_layout() {
        // 16-byte aligned for a WGSL uniform struct
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
        let uniform = Material::default().uniform();
        assert_eq!(uniform.kind, MaterialKind::Standard.shader_id());
        assert_eq!(uniform.base_color[3], 0.75);
    }
}
