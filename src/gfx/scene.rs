use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::camera::OrbitCamera;
use super::geometry::GeometryData;
use super::lighting::LightRig;
use super::material::Material;
use super::transform::Transform;
use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// The mesh instance currently on screen
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub geometry: Arc<GeometryData>,
    pub transform: Transform,
}

impl SceneObject {
    pub fn new(id: ObjectId, name: impl Into<String>, geometry: Arc<GeometryData>) -> Self {
        Self {
            id,
            name: name.into(),
            geometry,
            transform: Transform::identity(),
        }
    }
}

/// Scene helpers and effects that can be switched on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    Grid,
    Axes,
    Bloom,
    DepthOfField,
    Shadows,
    /// Mouse orbit controls
    Orbit,
}

impl Helper {
    pub const ALL: [Helper; 6] = [
        Helper::Grid,
        Helper::Axes,
        Helper::Bloom,
        Helper::DepthOfField,
        Helper::Shadows,
        Helper::Orbit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Helper::Grid => "grid",
            Helper::Axes => "axes",
            Helper::Bloom => "bloom",
            Helper::DepthOfField => "depth_of_field",
            Helper::Shadows => "shadows",
            Helper::Orbit => "orbit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Helper::Grid => "Grid",
            Helper::Axes => "Axes",
            Helper::Bloom => "Bloom",
            Helper::DepthOfField => "Depth of field",
            Helper::Shadows => "Shadows",
            Helper::Orbit => "Orbit controls",
        }
    }
}

impl fmt::Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Helper {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "dof" => Ok(Helper::DepthOfField),
            other => Helper::ALL
                .into_iter()
                .find(|h| h.as_str() == other)
                .ok_or_else(|| ViewerError::UnknownName {
                    kind: "helper",
                    name: s.to_string(),
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Helpers {
    pub grid: bool,
    pub axes: bool,
    pub bloom: bool,
    pub depth_of_field: bool,
    pub shadows: bool,
    pub orbit: bool,
}

impl Helpers {
    pub fn get(&self, helper: Helper) -> bool {
        match helper {
            Helper::Grid => self.grid,
            Helper::Axes => self.axes,
            Helper::Bloom => self.bloom,
            Helper::DepthOfField => self.depth_of_field,
            Helper::Shadows => self.shadows,
            Helper::Orbit => self.orbit,
        }
    }

    pub fn set(&mut self, helper: Helper, enabled: bool) {
        let flag = match helper {
            Helper::Grid => &mut self.grid,
            Helper::Axes => &mut self.axes,
            Helper::Bloom => &mut self.bloom,
            Helper::DepthOfField => &mut self.depth_of_field,
            Helper::Shadows => &mut self.shadows,
            Helper::Orbit => &mut self.orbit,
        };
        *flag = enabled;
    }

    /// Flips a flag and returns its new value
    pub fn toggle(&mut self, helper: Helper) -> bool {
        let enabled = !self.get(helper);
        self.set(helper, enabled);
        enabled
    }
}

impl Default for Helpers {
    fn default() -> Self {
        Self {
            grid: false,
            axes: false,
            bloom: false,
            depth_of_field: false,
            shadows: false,
            orbit: true,
        }
    }
}

/// Everything a backend needs to draw one frame, borrowed from the viewer
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub object: Option<&'a SceneObject>,
    pub material: &'a Material,
    pub camera: &'a OrbitCamera,
    pub lights: &'a LightRig,
    pub helpers: &'a Helpers,
    pub background: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_toggle_round_trip() {
        let mut helpers = Helpers::default();
        for helper in Helper::ALL {
            let before = helpers.get(helper);
            assert_eq!(helpers.toggle(helper), !before);
            helpers.toggle(helper);
            assert_eq!(helpers.get(helper), before);
        }
    }

    #[test]
    fn test_parse_helper_names() {
        assert_eq!("depth-of-field".parse::<Helper>().unwrap(), Helper::DepthOfField);
        assert_eq!("DoF".parse::<Helper>().unwrap(), Helper::DepthOfField);
        assert_eq!("Grid".parse::<Helper>().unwrap(), Helper::Grid);
        assert!("fog".parse::<Helper>().is_err());
    }
}
