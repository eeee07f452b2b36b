use crate::app;
use bevy::window::WindowResolution;
use clap::ArgAction;
use solar_system::error::ManifestError;
use solar_system::manifest::SystemManifest;
use solar_system::BodyRegistry;
use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Initial camera azimuth, looking at the sun from its dim side.
const DEFAULT_VIEW_ANGLE: f32 = 3.86;

#[derive(clap::Parser)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: CliCommand,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), CliError> {
        self.command.run()
    }
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the body registry as a YAML manifest
    Dump {
        /// Manifest to load instead of the built-in solar system
        #[clap(long)]
        system: Option<PathBuf>,
    },
    Run {
        #[clap(short, long)]
        resolution: Option<Resolution>,
        #[clap(long, action = ArgAction::SetTrue)]
        inspector: bool,
        /// Manifest to load instead of the built-in solar system
        #[clap(long)]
        system: Option<PathBuf>,
        /// Index of the body to focus first (clamped to the registry)
        #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
        focus: i64,
        /// Initial camera azimuth in radians
        #[clap(long, default_value_t = DEFAULT_VIEW_ANGLE, allow_negative_numbers = true)]
        view_angle: f32,
    },
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Resolution {
    width: f32,
    height: f32,
}

impl FromStr for Resolution {
    type Err = ResolutionInvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or(ResolutionInvalidFormat)?;
        let width = w.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        let height = h.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        Ok(Self { width, height })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid format for resolution; expected <width>x<height>")]
struct ResolutionInvalidFormat;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("Cannot load manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Brings an azimuth into `[0, TAU)`, the range of the view-angle slider.
fn wrap_view_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn load_registry(path: Option<&Path>) -> Result<BodyRegistry, ManifestError> {
    match path {
        Some(path) => BodyRegistry::from_manifest_path(path),
        None => Ok(BodyRegistry::default()),
    }
}

impl CliCommand {
    fn run(self) -> Result<(), CliError> {
        match self {
            Self::Dump { system } => {
                let registry = load_registry(system.as_deref())?;
                let manifest = SystemManifest::from(&registry);
                print!("{}", manifest.to_yaml_string()?);
            }
            Self::Run {
                resolution,
                inspector,
                system,
                focus,
                view_angle,
            } => {
                let registry = load_registry(system.as_deref())?;
                app::get_app(app::AppSettings {
                    resolution: resolution
                        .map(|r| WindowResolution::new(r.width, r.height))
                        .unwrap_or_default(),
                    with_inspector: inspector,
                    registry,
                    initial_focus: app::InitialFocus {
                        index: focus,
                        view_angle: wrap_view_angle(view_angle),
                    },
                })
                .run();
            }
        }
        Ok(())
    }
}
