//! The fixed catalogue of procedural meshes.
//!
//! Every shape is a non-indexed triangle list in object space. Face order,
//! winding and texture coordinates are fixed per shape, including the negative
//! side-face coordinates of the towers that rely on repeat wrapping.

use crate::data_structures::model::ModelVertex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Ground,
    Sky,
    TowerWide,
    TowerSkinny,
    TowerTallSkinny,
    TowerCap,
    TowerSmall,
    Bush,
    Lamp,
}

impl ShapeId {
    pub const ALL: [ShapeId; 9] = [
        ShapeId::Ground,
        ShapeId::Sky,
        ShapeId::TowerWide,
        ShapeId::TowerSkinny,
        ShapeId::TowerTallSkinny,
        ShapeId::TowerCap,
        ShapeId::TowerSmall,
        ShapeId::Bush,
        ShapeId::Lamp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeId::Ground => "ground",
            ShapeId::Sky => "sky",
            ShapeId::TowerWide => "tower wide",
            ShapeId::TowerSkinny => "tower skinny",
            ShapeId::TowerTallSkinny => "tower tall skinny",
            ShapeId::TowerCap => "tower cap",
            ShapeId::TowerSmall => "tower small",
            ShapeId::Bush => "bush",
            ShapeId::Lamp => "lamp",
        }
    }

    pub fn vertices(self) -> Vec<ModelVertex> {
        match self {
            ShapeId::Ground => plane(1.0, -0.1),
            ShapeId::Sky => plane(3.0, -0.3),
            ShapeId::TowerWide => cuboid(2.5),
            ShapeId::TowerSkinny => cuboid(4.5),
            ShapeId::TowerTallSkinny => cuboid(6.5),
            ShapeId::TowerCap => {
                let mut vertices = cuboid(4.5);
                vertices.extend_from_slice(&ROOF);
                vertices
            }
            ShapeId::TowerSmall => cuboid(2.5),
            ShapeId::Bush => octagonal_prism(),
            ShapeId::Lamp => cuboid(0.5),
        }
    }

    /// Vertices per draw, `floats / 8` of the authored table.
    pub fn vertex_count(self) -> u32 {
        match self {
            ShapeId::Ground | ShapeId::Sky => 6,
            ShapeId::TowerCap => 48,
            ShapeId::Bush => 96,
            _ => 36,
        }
    }
}

/// Corners of a two-triangle quad in (a, b) face coordinates.
const QUAD: [(f32, f32); 6] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
];

/// Horizontal square at height `y`, facing up.
fn plane(half_extent: f32, y: f32) -> Vec<ModelVertex> {
    const CORNERS: [([f32; 2], [f32; 2]); 6] = [
        ([-1.0, 1.0], [0.0, 0.0]),
        ([1.0, -1.0], [1.0, 1.0]),
        ([-1.0, -1.0], [0.0, 1.0]),
        ([-1.0, 1.0], [0.0, 0.0]),
        ([1.0, -1.0], [1.0, 1.0]),
        ([1.0, 1.0], [1.0, 0.0]),
    ];
    CORNERS
        .iter()
        .map(|&([x, z], uv)| {
            ModelVertex::new([x * half_extent, y, z * half_extent], [0.0, 1.0, 0.0], uv)
        })
        .collect()
}

/// Box with a 1x1 footprint spanning `-half_height..half_height` on y.
///
/// Faces come in the order back, front, left, right, bottom, top.
fn cuboid(half_height: f32) -> Vec<ModelVertex> {
    let (w, h) = (0.5, half_height);
    let mut vertices = Vec::with_capacity(36);
    for (z, nz) in [(-w, -1.0), (w, 1.0)] {
        vertices.extend(QUAD.iter().map(|&(a, b)| {
            ModelVertex::new([a * w, b * h, z], [0.0, 0.0, nz], [(a + 1.0) / 2.0, (b + 1.0) / 2.0])
        }));
    }
    for (x, nx) in [(-w, -1.0), (w, 1.0)] {
        vertices.extend(QUAD.iter().map(|&(a, b)| {
            ModelVertex::new([x, -b * h, -a * w], [nx, 0.0, 0.0], [(-a - 1.0) / 2.0, (-b - 1.0) / 2.0])
        }));
    }
    for (y, ny) in [(-h, -1.0), (h, 1.0)] {
        vertices.extend(QUAD.iter().map(|&(a, b)| {
            ModelVertex::new([a * w, y, b * w], [0.0, ny, 0.0], [(a + 1.0) / 2.0, (1.0 - b) / 2.0])
        }));
    }
    vertices
}

const APEX: [f32; 3] = [0.0, 5.5, 0.0];

/// Pyramid roof sitting on the 4.5 high box of the cap tower.
const ROOF: [ModelVertex; 12] = [
    ModelVertex::new([-0.5, 4.5, 0.5], [0.0, 0.0, 0.0], [0.0, 0.0]),
    ModelVertex::new(APEX, [0.0, 0.0, 1.0], [0.0, 1.0]),
    ModelVertex::new([0.5, 4.5, 0.5], [0.0, 0.0, 1.0], [1.0, 0.0]),
    ModelVertex::new([-0.5, 4.5, -0.5], [0.0, 0.0, -1.0], [0.0, 0.0]),
    ModelVertex::new(APEX, [0.0, 0.0, -1.0], [0.0, 1.0]),
    ModelVertex::new([0.5, 4.5, -0.5], [0.0, 0.0, -1.0], [1.0, 0.0]),
    ModelVertex::new([0.5, 4.5, -0.5], [0.0, 1.0, 0.0], [0.0, 0.0]),
    ModelVertex::new([0.5, 4.5, 0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
    ModelVertex::new(APEX, [0.0, 1.0, 0.0], [0.0, 1.0]),
    ModelVertex::new([-0.5, 4.5, 0.5], [-1.0, 0.0, 0.0], [0.0, 0.0]),
    ModelVertex::new([-0.5, 4.5, -0.5], [-1.0, 0.0, 0.0], [1.0, 0.0]),
    ModelVertex::new(APEX, [-1.0, 0.0, 0.0], [0.0, 1.0]),
];

/// Ring of the bush in (x, z), starting on -x and turning towards -z.
const RING: [[f32; 2]; 8] = [
    [-1.0, 0.0],
    [-0.7, -0.7],
    [0.0, -1.0],
    [0.7, -0.7],
    [1.0, 0.0],
    [0.7, 0.7],
    [0.0, 1.0],
    [-0.7, 0.7],
];

/// Outward normal of each side quad, matched to `RING[i]..RING[i + 1]`.
const SIDE_NORMALS: [[f32; 3]; 8] = [
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
];

/// Unit high octagonal prism: base fan, side quads, top fan.
fn octagonal_prism() -> Vec<ModelVertex> {
    let fan = |y: f32, normal: [f32; 3]| {
        (0..RING.len()).flat_map(move |i| {
            let [x0, z0] = RING[i];
            let [x1, z1] = RING[(i + 1) % RING.len()];
            [
                ModelVertex::new([x0, y, z0], normal, [0.0, 0.0]),
                ModelVertex::new([x1, y, z1], normal, [0.0, 1.0]),
                ModelVertex::new([0.0, y, 0.0], normal, [1.0, 1.0]),
            ]
        })
    };
    let sides = (0..RING.len()).flat_map(|i| {
        let [x0, z0] = RING[i];
        let [x1, z1] = RING[(i + 1) % RING.len()];
        let n = SIDE_NORMALS[i];
        [
            ModelVertex::new([x0, 0.0, z0], n, [0.0, 0.0]),
            ModelVertex::new([x0, 1.0, z0], n, [0.0, 1.0]),
            ModelVertex::new([x1, 1.0, z1], n, [1.0, 1.0]),
            ModelVertex::new([x0, 0.0, z0], n, [0.0, 0.0]),
            ModelVertex::new([x1, 0.0, z1], n, [0.0, 1.0]),
            ModelVertex::new([x1, 1.0, z1], n, [1.0, 1.0]),
        ]
    });

    fan(0.0, [0.0, 0.0, 0.0])
        .chain(sides)
        .chain(fan(1.0, [0.0, 1.0, 0.0]))
        .collect()
}
