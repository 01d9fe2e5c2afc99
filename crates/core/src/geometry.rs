use geo::{BoundingRect, Contains, MultiPolygon, Point};

use crate::domain::RegionFeature;
use crate::projection::Mercator;

/// Axis-aligned box on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    fn include(&mut self, (x, y): (f64, f64)) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let mut bounds = Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        };
        for point in points {
            bounds.include(point);
        }
        Some(bounds)
    }
}

/// A ring already run through the projection.
pub type ProjectedRing = Vec<(f64, f64)>;

/// A loaded region together with the data derived from it once at load time.
#[derive(Debug, Clone)]
pub struct ProjectedRegion {
    pub feature: RegionFeature,
    /// Exterior and interior rings of every part, in surface coordinates.
    pub rings: Vec<ProjectedRing>,
    pub bounds: BoundingBox,
    geo_bounds: Option<geo::Rect<f64>>,
}

impl ProjectedRegion {
    pub fn new(feature: RegionFeature, projection: &Mercator) -> Option<Self> {
        let rings = project_rings(&feature.geometry, projection);
        let bounds = BoundingBox::from_points(rings.iter().flatten().copied())?;
        let geo_bounds = feature.geometry.bounding_rect();
        Some(Self {
            feature,
            rings,
            bounds,
            geo_bounds,
        })
    }

    /// Point-in-polygon in longitude/latitude, holes excluded.
    pub fn contains_lon_lat(&self, lon: f64, lat: f64) -> bool {
        if let Some(rect) = self.geo_bounds {
            let (min, max) = (rect.min(), rect.max());
            if lon < min.x || lon > max.x || lat < min.y || lat > max.y {
                return false;
            }
        }
        self.feature.geometry.contains(&Point::new(lon, lat))
    }
}

fn project_rings(geometry: &MultiPolygon<f64>, projection: &Mercator) -> Vec<ProjectedRing> {
    geometry
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(|ring| {
            ring.coords()
                .map(|coord| projection.project(coord.x, coord.y))
                .collect()
        })
        .collect()
}

/// Horizontal spans covered by the rings at height `y` (even-odd rule).
///
/// Used by front ends that have no polygon fill primitive.
pub fn scanline_spans(rings: &[ProjectedRing], y: f64) -> Vec<(f64, f64)> {
    let mut crossings = Vec::new();
    for ring in rings {
        for edge in ring.windows(2) {
            let ((x0, y0), (x1, y1)) = (edge[0], edge[1]);
            if (y0 <= y && y < y1) || (y1 <= y && y < y0) {
                let t = (y - y0) / (y1 - y0);
                crossings.push(t.mul_add(x1 - x0, x0));
            }
        }
    }
    crossings.sort_by(f64::total_cmp);
    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::RegionKey;
    use geo::{LineString, Polygon};

    pub fn square_feature(key: &str, name: &str, lon: f64, lat: f64, size: f64) -> RegionFeature {
        let exterior = LineString::from(vec![
            (lon, lat),
            (lon + size, lat),
            (lon + size, lat + size),
            (lon, lat + size),
            (lon, lat),
        ]);
        RegionFeature {
            key: RegionKey::from(key),
            display_name: name.to_string(),
            code: None,
            geometry: MultiPolygon::new(vec![Polygon::new(exterior, vec![])]),
        }
    }

    #[test]
    fn bounds_cover_projected_square() {
        let projection = Mercator::japan();
        let region =
            ProjectedRegion::new(square_feature("A", "A", 137.0, 35.0, 1.0), &projection)
                .expect("non-empty geometry");

        let (left, bottom) = projection.project(137.0, 35.0);
        let (right, top) = projection.project(138.0, 36.0);
        assert!((region.bounds.min_x - left).abs() < 1e-9);
        assert!((region.bounds.max_x - right).abs() < 1e-9);
        assert!((region.bounds.min_y - top).abs() < 1e-9);
        assert!((region.bounds.max_y - bottom).abs() < 1e-9);
    }

    #[test]
    fn holes_are_not_inside() {
        let exterior = LineString::from(vec![
            (130.0, 30.0),
            (134.0, 30.0),
            (134.0, 34.0),
            (130.0, 34.0),
            (130.0, 30.0),
        ]);
        let hole = LineString::from(vec![
            (131.0, 31.0),
            (133.0, 31.0),
            (133.0, 33.0),
            (131.0, 33.0),
            (131.0, 31.0),
        ]);
        let feature = RegionFeature {
            key: RegionKey::from("Ring"),
            display_name: "Ring".to_string(),
            code: None,
            geometry: MultiPolygon::new(vec![Polygon::new(exterior, vec![hole])]),
        };
        let region = ProjectedRegion::new(feature, &Mercator::japan()).expect("geometry");

        assert!(region.contains_lon_lat(130.5, 30.5));
        assert!(!region.contains_lon_lat(132.0, 32.0));
        assert!(!region.contains_lon_lat(140.0, 40.0));
        assert_eq!(region.rings.len(), 2);
    }

    #[test]
    fn scanline_through_square_gives_one_span() {
        let ring = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
        let spans = scanline_spans(&[ring], 5.0);
        assert_eq!(spans, vec![(0.0, 10.0)]);
    }

    #[test]
    fn scanline_skips_the_hole() {
        let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
        let inner = vec![(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)];
        let spans = scanline_spans(&[outer, inner], 5.0);
        assert_eq!(spans, vec![(0.0, 3.0), (7.0, 10.0)]);
    }
}
