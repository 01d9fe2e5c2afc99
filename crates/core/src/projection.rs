use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Width of the drawing surface every front end maps onto.
pub const SURFACE_WIDTH: f64 = 800.0;
/// Height of the drawing surface every front end maps onto.
pub const SURFACE_HEIGHT: f64 = 600.0;

const JAPAN_CENTER: (f64, f64) = (137.0, 35.0);
const JAPAN_SCALE: f64 = 1000.0;

/// Spherical Mercator fitted so that `center` lands on `translate`.
///
/// Screen y grows downwards, matching every surface we draw on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Mercator {
    pub fn new(center: (f64, f64), scale: f64, translate: (f64, f64)) -> Self {
        let (cx, cy) = raw_forward(center.0, center.1);
        Self {
            scale,
            offset_x: scale.mul_add(-cx, translate.0),
            offset_y: scale.mul_add(cy, translate.1),
        }
    }

    /// The projection used for the prefecture map.
    pub fn japan() -> Self {
        Self::new(
            JAPAN_CENTER,
            JAPAN_SCALE,
            (SURFACE_WIDTH / 2.0, SURFACE_HEIGHT / 2.0),
        )
    }

    /// Longitude/latitude in degrees to surface coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = raw_forward(lon, lat);
        (
            self.scale.mul_add(x, self.offset_x),
            self.scale.mul_add(-y, self.offset_y),
        )
    }

    /// Surface coordinates back to longitude/latitude in degrees.
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let lambda = (x - self.offset_x) / self.scale;
        let merc_y = (self.offset_y - y) / self.scale;
        let phi = merc_y.exp().atan().mul_add(2.0, -FRAC_PI_2);
        (lambda.to_degrees(), phi.to_degrees())
    }
}

fn raw_forward(lon: f64, lat: f64) -> (f64, f64) {
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-6, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn center_projects_to_surface_middle() {
        let projection = Mercator::japan();
        let (x, y) = projection.project(137.0, 35.0);
        assert_close(x, 400.0);
        assert_close(y, 300.0);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let projection = Mercator::japan();
        let (x_east, _) = projection.project(140.0, 35.0);
        let (_, y_north) = projection.project(137.0, 40.0);
        assert!(x_east > 400.0);
        assert!(y_north < 300.0);
    }

    #[test]
    fn one_degree_of_longitude_spans_scale_radians() {
        let projection = Mercator::japan();
        let (x0, _) = projection.project(137.0, 35.0);
        let (x1, _) = projection.project(138.0, 35.0);
        assert_close(x1 - x0, 1000.0 * 1.0_f64.to_radians());
    }

    #[test]
    fn invert_undoes_project() {
        let projection = Mercator::japan();
        for &(lon, lat) in &[(141.35, 43.06), (130.4, 33.6), (127.68, 26.21)] {
            let (x, y) = projection.project(lon, lat);
            let (lon_back, lat_back) = projection.invert(x, y);
            assert_close(lon_back, lon);
            assert_close(lat_back, lat);
        }
    }
}
