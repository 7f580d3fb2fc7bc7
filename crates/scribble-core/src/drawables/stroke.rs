//! Freehand marker stroke.

use kurbo::{BezPath, Point};

/// A freehand marker line: the points the pointer passed through, in order,
/// plus the line thickness picked when the stroke started.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    thickness: f64,
}

impl Stroke {
    /// Start a stroke at `start`.
    pub fn new(start: Point, thickness: f64) -> Self {
        Self {
            points: vec![start],
            thickness,
        }
    }

    /// Append a point to the end of the line.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A single point has no segment to draw.
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Polyline through every point. Empty when the stroke is not renderable.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if !self.is_renderable() {
            return path;
        }

        path.move_to(self.points[0]);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn test_new_stroke_has_start_point() {
        let stroke = Stroke::new(Point::new(3.0, 4.0), 2.0);
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.points()[0], Point::new(3.0, 4.0));
        assert!((stroke.thickness() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_point_is_not_renderable() {
        let stroke = Stroke::new(Point::new(1.0, 1.0), 5.0);
        assert!(!stroke.is_renderable());
        assert_eq!(stroke.to_path().elements().len(), 0);
    }

    #[test]
    fn test_path_visits_points_in_order() {
        let mut stroke = Stroke::new(Point::new(0.0, 0.0), 2.0);
        stroke.add_point(Point::new(10.0, 0.0));
        stroke.add_point(Point::new(10.0, 10.0));

        let path = stroke.to_path();
        let els = path.elements();
        assert_eq!(els.len(), 3);
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(els[1], PathEl::LineTo(Point::new(10.0, 0.0)));
        assert_eq!(els[2], PathEl::LineTo(Point::new(10.0, 10.0)));
    }

}
