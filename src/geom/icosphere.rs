//! Geodesic sphere generation by recursive icosahedron subdivision.
//!
//! Every round splits each triangle into four using its three edge midpoints.
//! Midpoints are welded through a per-round cache keyed by the normalized edge
//! pair, so two triangles sharing an edge also share the midpoint vertex and the
//! result stays a closed, vertex-shared mesh. Vertices are projected onto the
//! sphere once, after the last round.
//!
//! # Example
//! ```ignore
//! use segspace_engine::geom::IcosphereMesh;
//!
//! let mesh = IcosphereMesh::build(120.0, 5)?;
//! assert_eq!(mesh.faces().len(), 20 * 4usize.pow(5));
//! ```

use std::collections::{HashMap, HashSet};

use super::core::Vec3;
use super::diagnostics::{MeshDiagnostics, MeshStats, normalized_edge_pair};

/// Golden ratio used for the icosahedron corner coordinates.
const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Highest accepted subdivision level. Level 10 already holds ~10.5M vertices
/// (about 250 MB of positions and faces); each further level quadruples that.
pub const MAX_SUBDIVISIONS: u32 = 10;

const BASE_TRIANGLES: [[u32; 3]; 20] = [
    // cap around vertex 0
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    // upper belt
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    // lower belt
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    // cap around vertex 3
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Errors raised for geometry inputs that have no valid sphere.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IcosphereError {
    #[error("icosphere radius must be finite and > 0, got {0}")]
    InvalidRadius(f64),
    #[error("icosphere subdivision level {requested} exceeds the maximum of {max}")]
    TooManySubdivisions { requested: u32, max: u32 },
}

/// Triangulated sphere with shared vertices.
///
/// Invariants: every face index is a valid vertex index and no edge midpoint
/// exists twice. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct IcosphereMesh {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    radius: f64,
    subdivisions: u32,
}

impl IcosphereMesh {
    /// Build a sphere of `radius` with `subdivisions` rounds of 4-way splitting.
    ///
    /// # Errors
    /// [`IcosphereError::InvalidRadius`] for a non-finite or non-positive radius,
    /// [`IcosphereError::TooManySubdivisions`] above [`MAX_SUBDIVISIONS`].
    pub fn build(radius: f64, subdivisions: u32) -> Result<Self, IcosphereError> {
        Self::build_with_diagnostics(radius, subdivisions).map(|(mesh, _)| mesh)
    }

    /// Same as [`IcosphereMesh::build`], also returning topology diagnostics.
    ///
    /// # Errors
    /// See [`IcosphereMesh::build`].
    pub fn build_with_diagnostics(
        radius: f64,
        subdivisions: u32,
    ) -> Result<(Self, MeshDiagnostics), IcosphereError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(IcosphereError::InvalidRadius(radius));
        }
        if subdivisions > MAX_SUBDIVISIONS {
            return Err(IcosphereError::TooManySubdivisions {
                requested: subdivisions,
                max: MAX_SUBDIVISIONS,
            });
        }

        // Always Some: the level is bounded by MAX_SUBDIVISIONS above.
        let (expected_vertices, expected_faces) =
            expected_counts(subdivisions).unwrap_or_default();
        let mut vertices = Vec::with_capacity(expected_vertices);
        vertices.extend(base_vertices());
        let mut faces = BASE_TRIANGLES.to_vec();
        let mut welded = 0usize;

        for _ in 0..subdivisions {
            let mut cache: HashMap<(u32, u32), u32> = HashMap::with_capacity(faces.len() * 3 / 2);
            let mut next_faces = Vec::with_capacity(faces.len() * 4);

            for &[a, b, c] in &faces {
                let ab = midpoint_index(a, b, &mut vertices, &mut cache, &mut welded);
                let bc = midpoint_index(b, c, &mut vertices, &mut cache, &mut welded);
                let ca = midpoint_index(c, a, &mut vertices, &mut cache, &mut welded);

                next_faces.push([a, ab, ca]);
                next_faces.push([b, bc, ab]);
                next_faces.push([c, ca, bc]);
                next_faces.push([ab, bc, ca]);
            }

            faces = next_faces;
        }

        // None only for the origin, which no icosahedron midpoint can reach.
        for vertex in &mut vertices {
            if let Some(unit) = vertex.normalized() {
                *vertex = unit * radius;
            }
        }

        debug_assert_eq!(vertices.len(), expected_vertices);
        debug_assert_eq!(faces.len(), expected_faces);

        let mut diagnostics = MeshDiagnostics::analyze(&vertices, &faces);
        diagnostics.welded_midpoint_count = welded;
        log::debug!("built {diagnostics}");

        let mesh = Self {
            vertices,
            faces,
            radius,
            subdivisions,
        };
        Ok((mesh, diagnostics))
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    #[must_use]
    pub fn stats(&self) -> MeshStats {
        MeshStats::compute(&self.vertices, self.faces.len())
    }

    /// Every undirected edge once, smaller index first, in face traversal order.
    #[must_use]
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut seen = HashSet::with_capacity(self.faces.len() * 3 / 2);
        let mut edges = Vec::with_capacity(self.faces.len() * 3 / 2);
        for &[a, b, c] in &self.faces {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let edge = normalized_edge_pair(u, v);
                if seen.insert(edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    /// Vertex positions as `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    /// Triangle indices as `[a0, b0, c0, a1, ...]`.
    #[must_use]
    pub fn indices_flat(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

/// Vertex and face counts after `subdivisions` rounds: `(10·4^s + 2, 20·4^s)`.
///
/// `None` when the counts do not fit `usize`.
#[must_use]
pub fn expected_counts(subdivisions: u32) -> Option<(usize, usize)> {
    let growth = 4usize.checked_pow(subdivisions)?;
    let faces = growth.checked_mul(20)?;
    let vertices = growth.checked_mul(10)?.checked_add(2)?;
    Some((vertices, faces))
}

fn base_vertices() -> [Vec3; 12] {
    let t = GOLDEN_RATIO;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Index of the midpoint of edge `(i, j)`, creating it on first use.
fn midpoint_index(
    i: u32,
    j: u32,
    vertices: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    welded: &mut usize,
) -> u32 {
    let key = normalized_edge_pair(i, j);
    if let Some(&existing) = cache.get(&key) {
        *welded += 1;
        return existing;
    }

    let midpoint = vertices[i as usize].midpoint(vertices[j as usize]);
    // Bounded by MAX_SUBDIVISIONS, so the count fits in u32.
    let index = vertices.len() as u32;
    vertices.push(midpoint);
    cache.insert(key, index);
    index
}
