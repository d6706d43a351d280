//! Scene lights: one ambient term plus at most one replaceable key light

use std::fmt;
use std::str::FromStr;

use cgmath::{InnerSpace, Vector3};

use super::material::hex_to_rgb;
use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Ambient,
    Directional,
    Point,
    Spot,
}

impl LightType {
    pub const ALL: [LightType; 4] = [
        LightType::Ambient,
        LightType::Directional,
        LightType::Point,
        LightType::Spot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LightType::Ambient => "ambient",
            LightType::Directional => "directional",
            LightType::Point => "point",
            LightType::Spot => "spot",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightType {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LightType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewerError::UnknownName {
                kind: "light type",
                name: s.to_string(),
            })
    }
}

/// The non-ambient light of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyLight {
    pub kind: LightType,
    pub color: u32,
    pub intensity: f32,
    pub position: Vector3<f32>,
    /// Half-angle of the cone in radians, spot lights only
    pub angle: f32,
}

impl KeyLight {
    /// Builds the key light for a non-ambient type; `None` for ambient
    pub fn of_type(kind: LightType, intensity: f32) -> Option<Self> {
        let (position, angle) = match kind {
            LightType::Ambient => return None,
            LightType::Directional => (Vector3::new(1.0, 1.0, 1.0), 0.0),
            LightType::Point => (Vector3::new(2.0, 2.0, 2.0), 0.0),
            LightType::Spot => (Vector3::new(2.0, 3.0, 2.0), std::f32::consts::FRAC_PI_6),
        };
        Some(Self {
            kind,
            color: 0xffffff,
            intensity,
            position,
            angle,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub key: Option<KeyLight>,
}

impl LightRig {
    pub const DEFAULT_AMBIENT: u32 = 0x404040;

    /// Replaces the key light; `Ambient` removes it and drives the ambient
    /// intensity instead
    pub fn set_type(&mut self, kind: LightType, intensity: f32) {
        self.key = KeyLight::of_type(kind, intensity);
        if kind == LightType::Ambient {
            self.ambient_intensity = intensity;
        }
    }

    /// Type of the light the intensity control currently drives
    pub fn active_type(&self) -> LightType {
        self.key.map_or(LightType::Ambient, |key| key.kind)
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        match self.key.as_mut() {
            Some(key) => key.intensity = intensity,
            None => self.ambient_intensity = intensity,
        }
    }

    /// Number of lights in the scene, ambient included
    pub fn light_count(&self) -> usize {
        1 + self.key.is_some() as usize
    }

    pub fn uniform(&self) -> LightUniform {
        let scaled = |hex: u32, intensity: f32| {
            let [r, g, b] = hex_to_rgb(hex);
            [r * intensity, g * intensity, b * intensity, 1.0]
        };

        let mut uniform = LightUniform {
            ambient: scaled(self.ambient_color, self.ambient_intensity),
            key_position: [0.0; 4],
            key_color: [0.0; 4],
            spot_direction: [0.0, -1.0, 0.0, -1.0],
        };
        if let Some(key) = &self.key {
            let kind = match key.kind {
                LightType::Ambient => 0.0,
                LightType::Directional => 1.0,
                LightType::Point => 2.0,
                LightType::Spot => 3.0,
            };
            uniform.key_position = [key.position.x, key.position.y, key.position.z, kind];
            uniform.key_color = scaled(key.color, key.intensity);
            // spot lights aim at the origin
            let direction = (-key.position).normalize();
            uniform.spot_direction = [direction.x, direction.y, direction.z, key.angle.cos()];
        }
        uniform
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: Self::DEFAULT_AMBIENT,
            ambient_intensity: 1.0,
            key: KeyLight::of_type(LightType::Directional, 1.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// rgb premultiplied by intensity
    pub ambient: [f32; 4],
    /// xyz position, w light kind (0 none, 1 directional, 2 point, 3 spot)
    pub key_position: [f32; 4],
    pub key_color: [f32; 4],
    /// xyz direction, w cosine of the spot cutoff
    pub spot_direction: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rig() {
        let rig = LightRig::default();
        assert_eq!(rig.light_count(), 2);
        assert_eq!(rig.active_type(), LightType::Directional);
        assert_eq!(rig.ambient_color, 0x404040);
    }

    #[test]
    fn test_replacing_key_light() {
        let mut rig = LightRig::default();
        rig.set_type(LightType::Spot, 0.4);
        assert_eq!(rig.light_count(), 2);
        let key = rig.key.unwrap();
        assert_eq!(key.kind, LightType::Spot);
        assert_eq!(key.intensity, 0.4);

        rig.set_type(LightType::Ambient, 0.7);
        assert_eq!(rig.light_count(), 1);
        assert_eq!(rig.ambient_intensity, 0.7);
        assert_eq!(rig.active_type(), LightType::Ambient);
    }

    #[test]
    fn test_intensity_follows_active_light() {
        let mut rig = LightRig::default();
        rig.set_intensity(2.0);
        assert_eq!(rig.key.unwrap().intensity, 2.0);
        assert_eq!(rig.ambient_intensity, 1.0);
    }

    #[test]
    fn test_uniform_encodes_kind() {
        let mut rig = LightRig::default();
        rig.set_type(LightType::Point, 1.0);
        assert_eq!(rig.uniform().key_position[3], 2.0);
        rig.set_type(LightType::Ambient, 1.0);
        assert_eq!(rig.uniform().key_position[3], 0.0);
    }

    #[test]
    fn test_parse_light_type() {
        assert_eq!("Spot".parse::<LightType>().unwrap(), LightType::Spot);
        assert!("area".parse::<LightType>().is_err());
    }
}
