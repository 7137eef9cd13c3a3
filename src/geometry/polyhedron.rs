//! Convex cell represented as a set of bounded faces, clipped one
//! half-space at a time. Every face keeps its vertex polygon in order, so
//! areas and volumes fall out without a separate hull pass.

/// Vertices closer than this (per edge) are merged when the cap face of a
/// clip is rebuilt.
const MERGE_TOL: f64 = 1e-7;

/// Signed-distance slack for the in/out classification during clipping.
const CLIP_EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub(crate) struct Face {
    /// Outward unit normal.
    pub normal: [f64; 3],
    /// Distance from the origin to the face plane (positive).
    pub offset: f64,
    /// Candidate index of the bisector that produced this face; `None` for
    /// the initial bounding-cube faces.
    pub source: Option<usize>,
    /// Vertex polygon, in order around the face.
    pub verts: Vec<[f64; 3]>,
}

impl Face {
    /// Polygon area via a centroid fan. Exact for the convex, ordered
    /// polygons the clipper produces.
    pub fn area(&self) -> f64 {
        if self.verts.len() < 3 {
            return 0.0;
        }
        let c = centroid(&self.verts);
        let n = self.verts.len();
        let mut total = 0.0;
        for i in 0..n {
            let a = sub(self.verts[i], c);
            let b = sub(self.verts[(i + 1) % n], c);
            total += 0.5 * norm(cross(a, b));
        }
        total
    }
}

/// Convex polyhedron containing the origin.
#[derive(Debug, Clone)]
pub(crate) struct ConvexCell {
    pub faces: Vec<Face>,
}

impl ConvexCell {
    /// Axis-aligned cube of half-extent `h` centered on the origin.
    pub fn cube(h: f64) -> Self {
        let mut faces = Vec::with_capacity(6);
        for axis in 0..3 {
            for sign in [1.0f64, -1.0] {
                let mut normal = [0.0; 3];
                normal[axis] = sign;
                // Corners of the face, ordered around the outward normal.
                let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
                let mut verts = Vec::with_capacity(4);
                for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                    let mut p = [0.0; 3];
                    p[axis] = sign * h;
                    p[u] = su * h;
                    p[v] = sv * h;
                    verts.push(p);
                }
                faces.push(Face {
                    normal,
                    offset: h,
                    source: None,
                    verts,
                });
            }
        }
        ConvexCell { faces }
    }

    /// Clips the cell against the half-space `dot(normal, x) <= offset`.
    ///
    /// `normal` must be a unit vector and `offset` positive, so the origin
    /// stays inside. A new cap face tagged with `source` is added whenever
    /// the plane actually cuts the cell.
    pub fn clip(&mut self, normal: [f64; 3], offset: f64, source: usize) {
        let outside = |p: &[f64; 3]| dot(normal, *p) - offset;

        if !self
            .faces
            .iter()
            .flat_map(|f| f.verts.iter())
            .any(|v| outside(v) > CLIP_EPS)
        {
            return;
        }

        let mut cap: Vec<[f64; 3]> = Vec::new();
        for face in &mut self.faces {
            let n = face.verts.len();
            let mut kept: Vec<[f64; 3]> = Vec::with_capacity(n);
            for i in 0..n {
                let a = face.verts[i];
                let b = face.verts[(i + 1) % n];
                let da = outside(&a);
                let db = outside(&b);
                if da <= CLIP_EPS {
                    kept.push(a);
                    // On-plane vertices seed the cap polygon directly.
                    if da >= -CLIP_EPS {
                        push_merged(&mut cap, a);
                    }
                }
                if (da > CLIP_EPS && db < -CLIP_EPS) || (da < -CLIP_EPS && db > CLIP_EPS) {
                    let t = da / (da - db);
                    let p = [
                        a[0] + t * (b[0] - a[0]),
                        a[1] + t * (b[1] - a[1]),
                        a[2] + t * (b[2] - a[2]),
                    ];
                    kept.push(p);
                    push_merged(&mut cap, p);
                }
            }
            face.verts = kept;
        }
        self.faces.retain(|f| f.verts.len() >= 3);

        // A tangent plane can graze the cell at a vertex or edge; such caps
        // have fewer than three distinct vertices and are dropped.
        if cap.len() >= 3 {
            order_polygon(&mut cap, normal);
            self.faces.push(Face {
                normal,
                offset,
                source: Some(source),
                verts: cap,
            });
        }
    }

    /// Cell volume as the sum of face pyramids apexed at the origin.
    pub fn volume(&self) -> f64 {
        self.faces.iter().map(|f| f.area() * f.offset / 3.0).sum()
    }
}

fn push_merged(verts: &mut Vec<[f64; 3]>, p: [f64; 3]) {
    if !verts.iter().any(|v| norm(sub(*v, p)) < MERGE_TOL) {
        verts.push(p);
    }
}

/// Orders an unordered convex polygon by angle around its centroid, in the
/// plane perpendicular to `normal`.
fn order_polygon(verts: &mut [[f64; 3]], normal: [f64; 3]) {
    let c = centroid(verts);
    // In-plane basis: pick the axis least aligned with the normal.
    let mut axis = [0.0; 3];
    let least = (0..3)
        .min_by(|&a, &b| normal[a].abs().total_cmp(&normal[b].abs()))
        .unwrap_or(0);
    axis[least] = 1.0;
    let u = normalize(cross(normal, axis));
    let w = cross(normal, u);
    verts.sort_by(|a, b| {
        let ra = sub(*a, c);
        let rb = sub(*b, c);
        let ta = dot(ra, w).atan2(dot(ra, u));
        let tb = dot(rb, w).atan2(dot(rb, u));
        ta.total_cmp(&tb)
    });
}

fn centroid(verts: &[[f64; 3]]) -> [f64; 3] {
    let n = verts.len() as f64;
    let mut c = [0.0; 3];
    for v in verts {
        c[0] += v[0];
        c[1] += v[1];
        c[2] += v[2];
    }
    [c[0] / n, c[1] / n, c[2] / n]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn normalize(a: [f64; 3]) -> [f64; 3] {
    let n = norm(a);
    [a[0] / n, a[1] / n, a[2] / n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_area_and_volume() {
        let cell = ConvexCell::cube(1.0);
        assert_eq!(cell.faces.len(), 6);
        for face in &cell.faces {
            assert!((face.area() - 4.0).abs() < 1e-12);
        }
        assert!((cell.volume() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn clip_halves_the_cube() {
        let mut cell = ConvexCell::cube(1.0);
        cell.clip([1.0, 0.0, 0.0], 0.0, 7);
        assert!((cell.volume() - 4.0).abs() < 1e-12);
        let cap = cell
            .faces
            .iter()
            .find(|f| f.source == Some(7))
            .expect("cap face");
        assert!((cap.area() - 4.0).abs() < 1e-12);
        assert_eq!(cap.verts.len(), 4);
    }

    #[test]
    fn corner_clip_produces_triangle() {
        let mut cell = ConvexCell::cube(1.0);
        let n = [1.0 / 3f64.sqrt(); 3];
        // Plane through (1, 1, 0), (1, 0, 1), (0, 1, 1): cuts off the
        // (1, 1, 1) corner tetrahedron of volume 1/6.
        cell.clip(n, 2.0 / 3f64.sqrt(), 0);
        assert!((cell.volume() - (8.0 - 1.0 / 6.0)).abs() < 1e-10);
        let cap = cell.faces.iter().find(|f| f.source == Some(0)).unwrap();
        assert_eq!(cap.verts.len(), 3);
        assert!((cap.area() - 3f64.sqrt() / 2.0).abs() < 1e-10);
    }

    #[test]
    fn tangent_plane_is_a_no_op() {
        let mut cell = ConvexCell::cube(1.0);
        cell.clip([1.0, 0.0, 0.0], 1.0, 3);
        assert_eq!(cell.faces.len(), 6);
        assert!(cell.faces.iter().all(|f| f.source.is_none()));
    }
}
