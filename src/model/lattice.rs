use std::fmt;

/// Periodic lattice described by three row vectors in Ångströms.
///
/// The row convention matches the common structure-file layout: cartesian
/// coordinates are `frac · matrix`, i.e. `r = a·A + b·B + c·C`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    matrix: [[f64; 3]; 3],
    inverse: [[f64; 3]; 3],
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingularLatticeError;

impl fmt::Display for SingularLatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("lattice matrix is singular (zero cell volume)")
    }
}

impl std::error::Error for SingularLatticeError {}

impl Lattice {
    /// Builds a lattice from three row vectors.
    ///
    /// # Errors
    ///
    /// Fails with [`SingularLatticeError`] if the vectors do not span a
    /// nonzero volume.
    pub fn new(matrix: [[f64; 3]; 3]) -> Result<Self, SingularLatticeError> {
        let det = det3(&matrix);
        if det.abs() < 1e-12 {
            return Err(SingularLatticeError);
        }
        let m = &matrix;
        let inv_det = 1.0 / det;
        // Adjugate transpose, row-vector convention.
        let inverse = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ];
        Ok(Self {
            matrix,
            inverse,
        })
    }

    /// Cubic lattice with edge length `a`.
    ///
    /// # Panics
    ///
    /// Panics if `a` is zero or not finite.
    pub fn cubic(a: f64) -> Self {
        Self::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
            .expect("cubic lattice with nonzero edge is never singular")
    }

    #[inline]
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        det3(&self.matrix).abs()
    }

    /// Converts fractional to cartesian coordinates.
    pub fn cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// Converts cartesian to fractional coordinates.
    pub fn fractional(&self, cart: [f64; 3]) -> [f64; 3] {
        let m = &self.inverse;
        [
            cart[0] * m[0][0] + cart[1] * m[1][0] + cart[2] * m[2][0],
            cart[0] * m[0][1] + cart[1] * m[1][1] + cart[2] * m[2][1],
            cart[0] * m[0][2] + cart[1] * m[1][2] + cart[2] * m[2][2],
        ]
    }

    /// Cartesian displacement of the lattice translation `n1·A + n2·B + n3·C`.
    pub fn translation(&self, image: [i32; 3]) -> [f64; 3] {
        self.cartesian([image[0] as f64, image[1] as f64, image[2] as f64])
    }

    /// Whether two fractional positions coincide up to a lattice translation.
    pub fn is_periodic_image(&self, a: [f64; 3], b: [f64; 3], tol: f64) -> bool {
        (0..3).all(|k| {
            let d = a[k] - b[k];
            (d - d.round()).abs() <= tol
        })
    }

    /// Per-axis number of lattice images needed so that every point within
    /// `radius` of the cell is covered. Derived from the column norms of the
    /// inverse matrix (the gradient of fractional coordinates in space).
    pub fn image_bounds(&self, radius: f64) -> [i32; 3] {
        let m = &self.inverse;
        let mut bounds = [0i32; 3];
        for (k, bound) in bounds.iter_mut().enumerate() {
            let norm =
                (m[0][k] * m[0][k] + m[1][k] * m[1][k] + m[2][k] * m[2][k]).sqrt();
            *bound = (radius * norm).ceil() as i32 + 1;
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cubic_volume_and_roundtrip() {
        let lat = Lattice::cubic(4.0);
        assert!(approx(lat.volume(), 64.0));

        let cart = lat.cartesian([0.25, 0.5, 0.75]);
        assert!(approx(cart[0], 1.0));
        assert!(approx(cart[1], 2.0));
        assert!(approx(cart[2], 3.0));

        let frac = lat.fractional(cart);
        assert!(approx(frac[0], 0.25));
        assert!(approx(frac[1], 0.5));
        assert!(approx(frac[2], 0.75));
    }

    #[test]
    fn triclinic_roundtrip() {
        let lat = Lattice::new([
            [4.599305652662459, 0.0098015076998823, 3.1052612865443736],
            [1.6553257726204653, 4.291108475854712, 3.1052602938979565],
            [0.0142541214919749, 0.0098025099996131, 5.549419141866351],
        ])
        .unwrap();
        assert!((lat.volume() - 109.15484625642743).abs() < 1e-6);

        let frac = [0.2738784872669924, 0.2738784872670407, 0.2738784872673032];
        let back = lat.fractional(lat.cartesian(frac));
        for k in 0..3 {
            assert!(approx(frac[k], back[k]));
        }
    }

    #[test]
    fn singular_matrix_rejected() {
        let res = Lattice::new([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(res.is_err());
    }

    #[test]
    fn periodic_image_detection() {
        let lat = Lattice::cubic(3.0);
        assert!(lat.is_periodic_image([0.1, 0.2, 0.3], [1.1, -0.8, 0.3], 1e-8));
        assert!(!lat.is_periodic_image([0.1, 0.2, 0.3], [0.4, 0.2, 0.3], 1e-8));
    }

    #[test]
    fn image_bounds_cover_radius() {
        let lat = Lattice::cubic(3.0);
        let bounds = lat.image_bounds(10.0);
        // 10 / 3 -> ceil 4, plus margin 1
        assert_eq!(bounds, [5, 5, 5]);
    }
}
