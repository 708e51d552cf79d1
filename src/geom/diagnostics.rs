//! Mesh diagnostics for the icosphere generator.
//!
//! Diagnostics are collected while a mesh is built and can be used for:
//!
//! - Validating topology (closed, manifold, welded midpoints)
//! - Reporting mesh statistics (counts and radius spread)
//!
//! # Example
//!
//! ```ignore
//! use segspace_engine::geom::IcosphereMesh;
//!
//! let (mesh, diagnostics) = IcosphereMesh::build_with_diagnostics(120.0, 5)?;
//!
//! if diagnostics.is_valid_solid() {
//!     println!("{} vertices, {} faces", diagnostics.vertex_count, diagnostics.face_count);
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use super::core::Vec3;

/// Summary statistics of a built sphere mesh.
///
/// `radius_*` are distances of the vertices from the origin; for a freshly
/// built icosphere all three equal the requested radius up to rounding.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub face_count: usize,
    pub radius_min: f64,
    pub radius_max: f64,
    pub radius_mean: f64,
}

impl MeshStats {
    /// Compute statistics for a vertex set and a face count.
    #[must_use]
    pub fn compute(vertices: &[Vec3], face_count: usize) -> Self {
        if vertices.is_empty() {
            return Self {
                face_count,
                ..Self::default()
            };
        }

        let mut radius_min = f64::INFINITY;
        let mut radius_max = f64::NEG_INFINITY;
        let mut radius_sum = 0.0;
        for vertex in vertices {
            let r = vertex.length();
            radius_min = radius_min.min(r);
            radius_max = radius_max.max(r);
            radius_sum += r;
        }

        Self {
            vertex_count: vertices.len(),
            face_count,
            radius_min,
            radius_max,
            radius_mean: radius_sum / vertices.len() as f64,
        }
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Icosphere: {} vertices, {} faces | Radius: {:.3}-{:.3} AU (avg: {:.3})",
            self.vertex_count, self.face_count, self.radius_min, self.radius_max, self.radius_mean
        )
    }
}

/// Topology diagnostics collected during icosphere construction.
///
/// # Topology Metrics
///
/// - `open_edge_count`: Edges with only one adjacent triangle (holes in mesh)
/// - `non_manifold_edge_count`: Edges with more than two adjacent triangles
///
/// # Welding
///
/// - `welded_midpoint_count`: Edge midpoints that were reused instead of being
///   created a second time by the neighbouring triangle
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshDiagnostics {
    pub stats: MeshStats,

    /// Total number of unique undirected edges.
    pub edge_count: usize,

    /// Number of open (boundary) edges in the mesh.
    ///
    /// A closed sphere has zero open edges. Open edges indicate that two
    /// neighbouring triangles did not share their midpoint vertex.
    pub open_edge_count: usize,

    /// Number of edges shared by more than two triangles.
    pub non_manifold_edge_count: usize,

    /// Number of midpoint lookups answered from the per-round weld cache.
    pub welded_midpoint_count: usize,

    /// Human-readable warnings about mesh issues.
    pub warnings: Vec<String>,
}

impl MeshDiagnostics {
    /// Analyse the edge topology of a triangle list.
    #[must_use]
    pub fn analyze(vertices: &[Vec3], faces: &[[u32; 3]]) -> Self {
        let mut edge_use: HashMap<(u32, u32), usize> = HashMap::new();
        for face in faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                *edge_use.entry(normalized_edge_pair(a, b)).or_default() += 1;
            }
        }

        let open_edge_count = edge_use.values().filter(|&&count| count == 1).count();
        let non_manifold_edge_count = edge_use.values().filter(|&&count| count > 2).count();

        let mut diagnostics = Self {
            stats: MeshStats::compute(vertices, faces.len()),
            edge_count: edge_use.len(),
            open_edge_count,
            non_manifold_edge_count,
            ..Self::default()
        };

        if open_edge_count > 0 {
            diagnostics.add_warning("mesh has open edges");
        }
        if non_manifold_edge_count > 0 {
            diagnostics.add_warning("mesh has non-manifold edges");
        }
        diagnostics
    }

    /// Returns `true` if the mesh is watertight (no open edges).
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    /// Returns `true` if the mesh is manifold (no non-manifold edges).
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Returns `true` if the mesh is both watertight and manifold.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold()
    }

    /// Euler characteristic `V - E + F`; 2 for any closed genus-0 surface.
    #[must_use]
    pub fn euler_characteristic(&self) -> i64 {
        self.stats.vertex_count as i64 - self.edge_count as i64 + self.stats.face_count as i64
    }

    /// Adds a warning message to the diagnostics.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl fmt::Display for MeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | edges: {} (open: {}, non-manifold: {}) | welded midpoints: {}",
            self.stats,
            self.edge_count,
            self.open_edge_count,
            self.non_manifold_edge_count,
            self.welded_midpoint_count
        )
    }
}

/// Normalize an edge pair so that the smaller index comes first.
#[inline]
pub(crate) fn normalized_edge_pair(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}
