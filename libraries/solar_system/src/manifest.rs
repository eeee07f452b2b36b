use crate::error::ManifestError;
use crate::registry::{finite, spin_rate_from_sidereal_day, Body, BodyRegistry, Moon, Ring, Shading};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BodyManifest {
    pub name: String,
    pub radius: f32,
    /// Signed, in simulated days. Negative for retrograde rotation.
    pub sidereal_day: f32,
    #[serde(default)]
    pub distance: f32,
    pub texture: String,
    #[serde(default)]
    pub shading: Shading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring: Option<Ring>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MoonManifest {
    pub name: String,
    pub host: usize,
    pub radius: f32,
    pub sidereal_day: f32,
    /// Radians per second, applied to the elapsed time as-is
    pub orbital_rate: f32,
    pub distance_from_host: f32,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemManifest {
    pub bodies: Vec<BodyManifest>,
    pub moon: MoonManifest,
}

impl SystemManifest {
    pub fn from_yaml_str(input: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&input)
    }

    pub fn to_yaml_string(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn spin_rate(name: &str, sidereal_day: f32) -> Result<f32, ManifestError> {
    finite(name, "sidereal day", sidereal_day)?;
    if sidereal_day == 0.0 {
        return Err(ManifestError::ZeroSiderealDay(name.to_string()));
    }
    Ok(spin_rate_from_sidereal_day(sidereal_day))
}

impl TryFrom<BodyManifest> for Body {
    type Error = ManifestError;

    fn try_from(manifest: BodyManifest) -> Result<Self, Self::Error> {
        Ok(Self {
            spin_rate: spin_rate(&manifest.name, manifest.sidereal_day)?,
            name: manifest.name,
            radius: manifest.radius,
            orbital_distance: manifest.distance,
            texture: manifest.texture,
            shading: manifest.shading,
            ring: manifest.ring,
        })
    }
}

impl TryFrom<MoonManifest> for Moon {
    type Error = ManifestError;

    fn try_from(manifest: MoonManifest) -> Result<Self, Self::Error> {
        Ok(Self {
            spin_rate: spin_rate(&manifest.name, manifest.sidereal_day)?,
            name: manifest.name,
            radius: manifest.radius,
            orbital_rate: manifest.orbital_rate,
            distance_from_host: manifest.distance_from_host,
            host: manifest.host,
            texture: manifest.texture,
        })
    }
}

impl TryFrom<SystemManifest> for BodyRegistry {
    type Error = ManifestError;

    fn try_from(manifest: SystemManifest) -> Result<Self, Self::Error> {
        let bodies = manifest
            .bodies
            .into_iter()
            .map(Body::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let moon = Moon::try_from(manifest.moon)?;
        BodyRegistry::new(bodies, moon)
    }
}

impl From<&BodyRegistry> for SystemManifest {
    fn from(registry: &BodyRegistry) -> Self {
        let bodies = registry
            .bodies()
            .iter()
            .map(|body| BodyManifest {
                name: body.name.clone(),
                radius: body.radius,
                sidereal_day: TAU / body.spin_rate,
                distance: body.orbital_distance,
                texture: body.texture.clone(),
                shading: body.shading,
                ring: body.ring.clone(),
            })
            .collect();
        let moon = registry.moon();
        Self {
            bodies,
            moon: MoonManifest {
                name: moon.name.clone(),
                host: moon.host,
                radius: moon.radius,
                sidereal_day: TAU / moon.spin_rate,
                orbital_rate: moon.orbital_rate,
                distance_from_host: moon.distance_from_host,
                texture: moon.texture.clone(),
            },
        }
    }
}

impl BodyRegistry {
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        SystemManifest::from_path(path)?.try_into()
    }
}
