use crate::error::ManifestError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

pub struct RegistryPlugin(pub BodyRegistry);

impl Plugin for RegistryPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BodyRegistry>()
            .insert_resource(self.0.clone());
    }
}

pub(crate) mod serialize_as_degrees {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &f32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_degrees().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f32, D::Error>
    where
        D: Deserializer<'de>,
    {
        f32::deserialize(deserializer).map(|v| v.to_radians())
    }
}

/// Converts a signed sidereal day (in simulated days) into an angular velocity.
///
/// One simulated day lasts one second, so a body with a 1-day sidereal day
/// spins a full turn every second. Retrograde bodies have negative days.
pub fn spin_rate_from_sidereal_day(days: f32) -> f32 {
    TAU / days
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shading {
    #[default]
    Lit,
    Unlit,
}

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ring {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Rotation about the X axis
    #[serde(with = "serialize_as_degrees")]
    pub tilt: f32,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Body {
    pub name: String,
    pub radius: f32,
    pub spin_rate: f32,
    pub orbital_distance: f32,
    pub texture: String,
    pub shading: Shading,
    pub ring: Option<Ring>,
}

impl Body {
    /// Bodies sit on the +Z axis at their orbital distance and never revolve.
    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.orbital_distance)
    }
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Moon {
    pub name: String,
    pub radius: f32,
    pub spin_rate: f32,
    /// Radians per second of elapsed time
    pub orbital_rate: f32,
    pub distance_from_host: f32,
    pub host: usize,
    pub texture: String,
}

/// Ordered, immutable set of bodies. Index 0 is the central star.
#[derive(Debug, Clone, PartialEq, Resource, Reflect)]
#[reflect(Resource)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    moon: Moon,
}

impl BodyRegistry {
    pub fn new(bodies: Vec<Body>, moon: Moon) -> Result<Self, ManifestError> {
        use ManifestError::*;
        let Some(central) = bodies.first() else {
            return Err(NoBodies);
        };
        if central.orbital_distance != 0.0 {
            return Err(CentralBodyOffset {
                name: central.name.clone(),
                distance: central.orbital_distance,
            });
        }
        for body in &bodies {
            finite(&body.name, "radius", body.radius)?;
            finite(&body.name, "spin rate", body.spin_rate)?;
            finite(&body.name, "orbital distance", body.orbital_distance)?;
            if body.radius <= 0.0 {
                return Err(NonPositiveRadius {
                    name: body.name.clone(),
                    radius: body.radius,
                });
            }
            if body.orbital_distance < 0.0 {
                return Err(NegativeDistance {
                    name: body.name.clone(),
                    distance: body.orbital_distance,
                });
            }
        }
        finite(&moon.name, "radius", moon.radius)?;
        finite(&moon.name, "spin rate", moon.spin_rate)?;
        finite(&moon.name, "orbital rate", moon.orbital_rate)?;
        finite(&moon.name, "distance from host", moon.distance_from_host)?;
        if moon.radius <= 0.0 {
            return Err(NonPositiveRadius {
                name: moon.name.clone(),
                radius: moon.radius,
            });
        }
        if moon.distance_from_host < 0.0 {
            return Err(NegativeDistance {
                name: moon.name.clone(),
                distance: moon.distance_from_host,
            });
        }
        if moon.host >= bodies.len() {
            return Err(MoonHostOutOfRange {
                host: moon.host,
                count: bodies.len(),
            });
        }
        Ok(Self { bodies, moon })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn moon(&self) -> &Moon {
        &self.moon
    }

    pub fn body_position(&self, index: usize) -> Option<Vec3> {
        self.body(index).map(Body::position)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|body| body.name.as_str())
    }
}

pub(crate) fn finite(name: &str, field: &'static str, value: f32) -> Result<f32, ManifestError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ManifestError::NonFinite {
            name: name.to_string(),
            field,
            value,
        })
    }
}

// name, radius, sidereal day, distance
const BODIES: [(&str, f32, f32, f32); 10] = [
    ("Sun", 696.434, 25.05, 0.0),
    ("Mercury", 2.4397, 58.646, 1000.0),
    ("Venus", 6.0518, -243.0226, 1100.0),
    ("Earth", 6.371, 0.99726968, 1200.0),
    ("Mars", 3.3895, 1.025957, 1250.0),
    ("Jupiter", 69.911, 0.41354167, 1400.0),
    ("Saturn", 58.232, 0.43958333, 1700.0),
    ("Uranus", 25.362, 0.708, 2000.0),
    ("Neptune", 24.622, 0.6713, 2200.0),
    ("Pluto", 1.1883, -6.38723, 2300.0),
];

fn default_ring(name: &str) -> Option<Ring> {
    match name {
        "Saturn" => Some(Ring {
            inner_radius: 67.3,
            outer_radius: 140.3,
            tilt: PI * 0.45,
            texture: "textures/saturn/ringColor.png".to_string(),
        }),
        "Uranus" => Some(Ring {
            inner_radius: 42.0,
            outer_radius: 63.93,
            tilt: PI * 0.2,
            texture: "textures/uranus/ringColor.png".to_string(),
        }),
        _ => None,
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        let bodies = BODIES
            .iter()
            .enumerate()
            .map(|(index, &(name, radius, sidereal_day, distance))| Body {
                name: name.to_string(),
                radius,
                spin_rate: spin_rate_from_sidereal_day(sidereal_day),
                orbital_distance: distance,
                texture: format!("textures/{}/color.jpg", name.to_lowercase()),
                shading: if index == 0 {
                    Shading::Unlit
                } else {
                    Shading::Lit
                },
                ring: default_ring(name),
            })
            .collect();
        let moon = Moon {
            name: "Moon".to_string(),
            radius: 1.773174,
            spin_rate: spin_rate_from_sidereal_day(27.321661),
            orbital_rate: 1.0 / 29.530589,
            distance_from_host: 10.0,
            host: 3,
            texture: "textures/moon/color.jpg".to_string(),
        };
        Self { bodies, moon }
    }
}
