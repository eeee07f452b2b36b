use crate::error::CubemapError;
use crate::scene::SceneTextures;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureViewDescriptor, TextureViewDimension,
};

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTextures>()
            .add_systems(Startup, load_environment)
            .add_systems(
                Update,
                assemble_environment.run_if(resource_exists::<Environment>),
            );
    }
}

pub const ENVIRONMENT_DIRECTORY: &str = "textures/env";

/// Cube faces in layer order: +X, -X, +Y, -Y, +Z, -Z.
pub const ENVIRONMENT_FACES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

/// Background cubemap. The handle is reserved up front and filled once all
/// six faces have loaded.
#[derive(Debug, Clone, Resource)]
pub struct Environment {
    faces: Vec<Handle<Image>>,
    cubemap: Handle<Image>,
    assembled: bool,
}

impl Environment {
    pub fn faces(&self) -> &[Handle<Image>] {
        &self.faces
    }

    pub fn cubemap(&self) -> Handle<Image> {
        self.cubemap.clone()
    }

    pub fn is_assembled(&self) -> bool {
        self.assembled
    }
}

pub fn load_environment(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut textures: ResMut<SceneTextures>,
) {
    let faces = ENVIRONMENT_FACES
        .iter()
        .map(|face| textures.load(&asset_server, &format!("{ENVIRONMENT_DIRECTORY}/{face}")))
        .collect();
    debug!("Loading environment cubemap from {ENVIRONMENT_DIRECTORY}");
    commands.insert_resource(Environment {
        faces,
        cubemap: images.reserve_handle(),
        assembled: false,
    });
}

fn assemble_environment(mut environment: ResMut<Environment>, mut images: ResMut<Assets<Image>>) {
    if environment.assembled {
        return;
    }
    let stitched = {
        let Some(faces) = environment
            .faces
            .iter()
            .map(|face| images.get(face))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };
        stitch_cubemap(&faces)
    };
    environment.assembled = true;
    match stitched {
        Ok(cubemap) => {
            images.insert(environment.cubemap.id(), cubemap);
            info!("Environment cubemap assembled");
        }
        Err(err) => warn!("Cannot assemble environment cubemap: {err}"),
    }
}

/// Stacks six square faces of equal size and format into one cube texture.
pub fn stitch_cubemap(faces: &[&Image]) -> Result<Image, CubemapError> {
    let [first, ..] = faces else {
        return Err(CubemapError::FaceCount(0));
    };
    if faces.len() != ENVIRONMENT_FACES.len() {
        return Err(CubemapError::FaceCount(faces.len()));
    }
    let size = first.texture_descriptor.size;
    let format = first.texture_descriptor.format;
    if size.width != size.height {
        return Err(CubemapError::NotSquare {
            width: size.width,
            height: size.height,
        });
    }
    for (index, face) in faces.iter().enumerate() {
        if face.texture_descriptor.size != size || face.texture_descriptor.format != format {
            return Err(CubemapError::MismatchedFace(index));
        }
    }

    let data = faces
        .iter()
        .flat_map(|face| face.data.iter().copied())
        .collect();
    let mut cubemap = Image::new(
        Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: faces.len() as u32,
        },
        TextureDimension::D2,
        data,
        format,
        RenderAssetUsages::RENDER_WORLD,
    );
    cubemap.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(cubemap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::render_resource::TextureFormat;

    fn face(size: u32, shade: u8) -> Image {
        Image::new_fill(
            Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[shade, shade, shade, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::all(),
        )
    }

    #[test]
    fn stitched_cubemap_keeps_face_order() {
        let faces = (0..6).map(|i| face(2, i * 10)).collect::<Vec<_>>();
        let refs = faces.iter().collect::<Vec<_>>();
        let cubemap = stitch_cubemap(&refs).unwrap();

        assert_eq!(cubemap.texture_descriptor.size.depth_or_array_layers, 6);
        assert_eq!(
            cubemap
                .texture_view_descriptor
                .as_ref()
                .and_then(|view| view.dimension),
            Some(TextureViewDimension::Cube)
        );
        let layer_len = 2 * 2 * 4;
        assert_eq!(cubemap.data.len(), 6 * layer_len);
        for (layer, pixels) in cubemap.data.chunks(layer_len).enumerate() {
            assert_eq!(pixels[0], layer as u8 * 10);
        }
    }

    #[test]
    fn mismatched_faces_are_rejected() {
        let mut faces = (0..6).map(|_| face(2, 0)).collect::<Vec<_>>();
        faces[4] = face(4, 0);
        let refs = faces.iter().collect::<Vec<_>>();
        assert!(matches!(
            stitch_cubemap(&refs),
            Err(CubemapError::MismatchedFace(4))
        ));
        assert!(matches!(
            stitch_cubemap(&refs[..3]),
            Err(CubemapError::FaceCount(3))
        ));
    }

    #[test]
    fn environment_faces_count_toward_load_progress() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .add_plugins(EnvironmentPlugin);
        app.update();

        let environment = app.world().resource::<Environment>();
        let textures = app.world().resource::<SceneTextures>();
        assert_eq!(environment.faces().len(), ENVIRONMENT_FACES.len());
        assert_eq!(textures.len(), ENVIRONMENT_FACES.len());
        assert!(!environment.is_assembled());
    }

    #[test]
    fn cubemap_is_assembled_once_faces_are_available() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .add_systems(Update, assemble_environment);

        let mut images = app.world_mut().resource_mut::<Assets<Image>>();
        let faces = (0..6).map(|i| images.add(face(2, i))).collect();
        let cubemap = images.reserve_handle();
        app.insert_resource(Environment {
            faces,
            cubemap: cubemap.clone(),
            assembled: false,
        });
        app.update();

        assert!(app.world().resource::<Environment>().is_assembled());
        let images = app.world().resource::<Assets<Image>>();
        let image = images.get(&cubemap).unwrap();
        assert_eq!(image.texture_descriptor.size.depth_or_array_layers, 6);
    }
}
