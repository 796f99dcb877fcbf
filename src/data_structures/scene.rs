//! The static table of everything drawn each frame.
//!
//! Entries are drawn in table order: ground, sky, the seven towers, then the
//! six bushes. Every entry pairs a shape with a texture and a placement. The
//! towers and bushes share the one texture coordinate scale that the keyboard
//! can adjust at runtime.

use cgmath::{Deg, Vector2, Vector3};

use crate::data_structures::{
    instance::{Instance, InstanceRaw},
    shape::ShapeId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureId {
    GlassOne,
    GlassTwo,
    Ground,
    Sky,
    Bush,
}

impl TextureId {
    pub const ALL: [TextureId; 5] = [
        TextureId::GlassOne,
        TextureId::GlassTwo,
        TextureId::Ground,
        TextureId::Sky,
        TextureId::Bush,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TextureId::GlassOne => "Glass.jpg",
            TextureId::GlassTwo => "GlassTwo.jpg",
            TextureId::Ground => "natural-stone-aged-paviment.jpg",
            TextureId::Sky => "Sky3.jpg",
            TextureId::Bush => "Bush.jpg",
        }
    }
}

/// Texture coordinate scale of an entry: baked in, or the shared adjustable value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UvScale {
    Fixed(Vector2<f32>),
    Adjustable,
}

impl UvScale {
    pub fn resolve(self, adjustable: Vector2<f32>) -> Vector2<f32> {
        match self {
            UvScale::Fixed(scale) => scale,
            UvScale::Adjustable => adjustable,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneEntry {
    pub name: &'static str,
    pub shape: ShapeId,
    pub texture: TextureId,
    pub instance: Instance,
    pub uv_scale: UvScale,
}

impl SceneEntry {
    fn new(name: &'static str, shape: ShapeId, texture: TextureId, instance: Instance, uv_scale: UvScale) -> Self {
        Self {
            name,
            shape,
            texture,
            instance,
            uv_scale,
        }
    }

    fn prop(name: &'static str, shape: ShapeId, texture: TextureId, position: [f32; 3], scale: f32) -> Self {
        Self::new(name, shape, texture, Instance::placed(position, scale), UvScale::Adjustable)
    }

    pub fn to_raw(&self, adjustable: Vector2<f32>) -> InstanceRaw {
        self.instance.to_raw(self.uv_scale.resolve(adjustable))
    }
}

/// Starting value of the adjustable texture coordinate scale.
pub const INITIAL_UV_SCALE: Vector2<f32> = Vector2::new(2.0, 2.0);

const BUSH_POSITIONS: [[f32; 3]; 6] = [
    [-0.7, -0.3, 1.0],
    [-0.9, -0.3, 0.3],
    [0.7, -0.3, 1.0],
    [0.9, -0.3, 0.3],
    [-0.5, -0.3, 1.7],
    [0.5, -0.3, 1.7],
];

/// The diorama: a paved ground, a sky backdrop, seven glass towers and six bushes.
pub fn diorama() -> Vec<SceneEntry> {
    use ShapeId::*;
    use TextureId as T;

    let mut entries = vec![
        SceneEntry::new(
            "ground",
            Ground,
            T::Ground,
            Instance::placed([0.0, 0.0, 0.0], 3.0),
            UvScale::Fixed(Vector2::new(10.0, 10.0)),
        ),
        SceneEntry::new(
            "sky",
            Sky,
            T::Sky,
            Instance::rotated_then_translated(Vector3::unit_x(), Deg(90.0), Vector3::new(0.0, -2.7, -2.7), 1.0),
            UvScale::Fixed(Vector2::new(1.0, 1.0)),
        ),
        SceneEntry::prop("skinny tower", TowerSkinny, T::GlassOne, [1.6, 1.5, -2.2], 0.4),
        SceneEntry::prop("wide tower", TowerWide, T::GlassTwo, [0.8, 1.58, -2.2], 0.75),
        SceneEntry::prop("tall skinny tower", TowerTallSkinny, T::GlassOne, [-0.6, 2.3, -2.2], 0.4),
        SceneEntry::prop("second tall skinny tower", TowerTallSkinny, T::GlassOne, [0.1, 2.1, -2.2], 0.37),
        SceneEntry::prop("cap tower", TowerCap, T::GlassTwo, [-1.4, 1.5, -2.2], 0.4),
        SceneEntry::prop("small tower", TowerSmall, T::GlassTwo, [-1.0, 0.45, -2.4], 0.3),
        SceneEntry::prop("second small tower", TowerSmall, T::GlassTwo, [-0.27, 0.21, -2.5], 0.2),
    ];
    entries.extend(
        BUSH_POSITIONS
            .into_iter()
            .map(|position| SceneEntry::prop("bush", Bush, T::Bush, position, 0.2)),
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_order() {
        let shapes: Vec<ShapeId> = diorama().iter().map(|e| e.shape).collect();
        assert_eq!(shapes.len(), 15);
        assert_eq!(shapes[0], ShapeId::Ground);
        assert_eq!(shapes[1], ShapeId::Sky);
        assert_eq!(
            &shapes[2..9],
            &[
                ShapeId::TowerSkinny,
                ShapeId::TowerWide,
                ShapeId::TowerTallSkinny,
                ShapeId::TowerTallSkinny,
                ShapeId::TowerCap,
                ShapeId::TowerSmall,
                ShapeId::TowerSmall,
            ]
        );
        assert!(shapes[9..].iter().all(|s| *s == ShapeId::Bush));
    }

    #[test]
    fn lamp_is_not_part_of_the_scene() {
        assert!(diorama().iter().all(|e| e.shape != ShapeId::Lamp));
    }

    #[test]
    fn only_ground_and_sky_have_fixed_uv_scale() {
        let scene = diorama();
        assert_eq!(scene[0].uv_scale, UvScale::Fixed(Vector2::new(10.0, 10.0)));
        assert_eq!(scene[1].uv_scale, UvScale::Fixed(Vector2::new(1.0, 1.0)));
        assert!(scene[2..].iter().all(|e| e.uv_scale == UvScale::Adjustable));
    }

    #[test]
    fn adjustable_scale_reaches_towers_and_bushes_only() {
        let scene = diorama();
        let scale = Vector2::new(2.3, 2.3);
        assert_eq!(scene[0].to_raw(scale).uv_scale, [10.0, 10.0]);
        assert_eq!(scene[1].to_raw(scale).uv_scale, [1.0, 1.0]);
        for entry in &scene[2..] {
            assert_eq!(entry.to_raw(scale).uv_scale, [2.3, 2.3], "{}", entry.name);
        }
    }

    #[test]
    fn every_texture_is_used() {
        let scene = diorama();
        for texture in TextureId::ALL {
            assert!(scene.iter().any(|e| e.texture == texture), "{texture:?} unused");
        }
    }

    #[test]
    fn sky_stands_upright_behind_the_towers() {
        let sky = &diorama()[1];
        let matrix = sky.instance.to_matrix();
        // the plane normal (0, 1, 0) is rotated onto +z
        let normal = matrix * cgmath::Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert!(normal.y.abs() < 1e-5);
        assert!((normal.z - 1.0).abs() < 1e-5);
        let centre = matrix * cgmath::Vector4::new(0.0, -0.3, 0.0, 1.0);
        assert!((centre.y - 2.7).abs() < 1e-5);
        assert!((centre.z + 3.0).abs() < 1e-5);
    }
}
