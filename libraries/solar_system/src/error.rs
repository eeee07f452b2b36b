use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Manifest declares no bodies")]
    NoBodies,
    #[error("Body {name:?} has a non-finite {field} ({value})")]
    NonFinite {
        name: String,
        field: &'static str,
        value: f32,
    },
    #[error("Body {name:?} has a non-positive radius ({radius})")]
    NonPositiveRadius { name: String, radius: f32 },
    #[error("Body {name:?} has a negative orbital distance ({distance})")]
    NegativeDistance { name: String, distance: f32 },
    #[error("Central body {name:?} must sit at the origin, found distance {distance}")]
    CentralBodyOffset { name: String, distance: f32 },
    #[error("Body {0:?} has a zero-length sidereal day")]
    ZeroSiderealDay(String),
    #[error("Moon host index {host} is out of range for {count} bodies")]
    MoonHostOutOfRange { host: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum CubemapError {
    #[error("Expected 6 cube faces, found {0}")]
    FaceCount(usize),
    #[error("Cube faces must be square, found {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("Cube face {0} differs in size or format from the first face")]
    MismatchedFace(usize),
}
