use kurbo::{Affine, BezPath, PathEl, Point, QuadBez, Rect};

use crate::metrics::control_bounds;

/// Interface for accepting a sequence of path commands.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);

    /// Replay every element of a kurbo path into this pen
    fn draw_path(&mut self, path: &BezPath)
    where
        Self: Sized,
    {
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.quad_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c0, c1, p) => self.curve_to(c0.x, c0.y, c1.x, c1.y, p.x, p.y),
                PathEl::ClosePath => self.close(),
            }
        }
    }
}

/// A single closed outline
///
/// Always starts with a move, holds at least one drawing segment, and ends
/// with a close. The closing segment back to the start point is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour(BezPath);

impl Contour {
    /// The contour as path elements, starting with the move and ending with the close
    pub fn elements(&self) -> &[PathEl] {
        self.0.elements()
    }

    /// The first on-curve point
    pub fn start(&self) -> Point {
        match self.0.elements().first() {
            Some(PathEl::MoveTo(p)) => *p,
            _ => Point::ZERO,
        }
    }

    /// Every point of the contour, on-curve and off-curve, in drawing order
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.0.elements().iter().flat_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
            PathEl::QuadTo(c, p) => vec![c, p],
            PathEl::CurveTo(c0, c1, p) => vec![c0, c1, p],
            PathEl::ClosePath => vec![],
        })
    }

    /// Bounds of all points including control points
    pub fn control_bounds(&self) -> Rect {
        // A contour always has at least its start point
        control_bounds(self.points())
            .unwrap_or_else(|| Rect::from_points(self.start(), self.start()))
    }

    /// Number of drawing segments, not counting the implicit closing segment
    pub fn segment_count(&self) -> usize {
        self.0
            .elements()
            .iter()
            .filter(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath))
            .count()
    }

    pub fn transformed(&self, affine: Affine) -> Contour {
        let mut path = self.0.clone();
        path.apply_affine(affine);
        Contour(path)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Contour {
        self.transformed(Affine::translate((dx, dy)))
    }

    /// Replace every quadratic segment with the equivalent cubic
    pub fn raise_quadratics(&self) -> Contour {
        let mut path = BezPath::new();
        let mut current = self.start();
        for el in self.0.elements() {
            match *el {
                PathEl::QuadTo(c, p) => {
                    let cubic = QuadBez::new(current, c, p).raise();
                    path.curve_to(cubic.p1, cubic.p2, cubic.p3);
                    current = p;
                }
                PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) => {
                    path.push(*el);
                    current = p;
                }
                PathEl::ClosePath => path.close_path(),
            }
        }
        Contour(path)
    }

    /// SVG path data for this contour
    pub fn to_svg(&self) -> String {
        self.0.to_svg()
    }
}

/// A pen which splits drawing commands into closed contours
///
/// Every move starts a new contour, whether or not the previous one was
/// explicitly closed. Subpaths with no drawing segments are dropped.
///
/// ```rust
/// use svgfont::{OutlinePen, ContourBuilder};
/// let mut pen = ContourBuilder::new();
/// pen.move_to(0.0, 0.0);
/// pen.line_to(100.0, 0.0);
/// pen.line_to(100.0, 100.0);
/// pen.move_to(200.0, 0.0);
/// pen.line_to(300.0, 0.0);
/// pen.line_to(300.0, 100.0);
/// pen.close();
/// let contours = pen.build();
/// assert_eq!(contours.len(), 2);
/// assert_eq!(contours[0].segment_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContourBuilder {
    contours: Vec<Contour>,
    current_path: Option<BezPath>,
    subpath_start: Point,
}

impl ContourBuilder {
    /// Create a new ContourBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish any open subpath and return the contours
    pub fn build(mut self) -> Vec<Contour> {
        self.finish_current();
        self.contours
    }

    fn finish_current(&mut self) {
        if let Some(mut path) = self.current_path.take() {
            if path.elements().len() > 1 {
                path.close_path();
                self.contours.push(Contour(path));
            }
        }
    }

    fn current_path_mut(&mut self) -> &mut BezPath {
        // Drawing after a close carries on from the closed subpath's start
        let start = self.subpath_start;
        self.current_path.get_or_insert_with(|| {
            let mut path = BezPath::new();
            path.move_to(start);
            path
        })
    }
}

impl OutlinePen for ContourBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.finish_current();
        self.subpath_start = Point::new(x, y);
        self.current_path_mut();
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current_path_mut().line_to((x, y));
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        self.current_path_mut().quad_to((cx0, cy0), (x, y));
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        self.current_path_mut()
            .curve_to((cx0, cy0), (cx1, cy1), (x, y));
    }

    fn close(&mut self) {
        self.finish_current();
    }
}

/// A glyph's outlines in design space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphShape {
    pub contours: Vec<Contour>,
    /// Bounds of the artwork before it was transformed
    pub artwork_bounds: Option<Rect>,
    /// Bounds of `contours`
    pub design_bounds: Option<Rect>,
}

impl GlyphShape {
    /// Build a shape from design-space contours and the bounds they had in the artwork
    pub fn new(contours: Vec<Contour>, artwork_bounds: Option<Rect>) -> Self {
        let design_bounds = shape_bounds(&contours);
        GlyphShape {
            contours,
            artwork_bounds,
            design_bounds,
        }
    }

    /// An intentionally blank glyph
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Move every contour horizontally; the artwork bounds are unchanged
    pub(crate) fn shift_x(&mut self, dx: f64) {
        if dx == 0.0 {
            return;
        }
        self.contours = self.contours.iter().map(|c| c.translated(dx, 0.0)).collect();
        self.design_bounds = shape_bounds(&self.contours);
    }
}

/// Union of the control bounds of a set of contours
pub(crate) fn shape_bounds(contours: &[Contour]) -> Option<Rect> {
    control_bounds(contours.iter().flat_map(|c| c.points()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_move_without_close_starts_new_contour() {
        let mut pen = ContourBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(10.0, 0.0);
        pen.line_to(10.0, 10.0);
        pen.move_to(20.0, 0.0);
        pen.line_to(30.0, 0.0);
        pen.line_to(30.0, 10.0);
        let contours = pen.build();
        assert_eq!(contours.len(), 2);
        for contour in &contours {
            assert!(matches!(contour.elements().first(), Some(PathEl::MoveTo(_))));
            assert_eq!(contour.elements().last(), Some(&PathEl::ClosePath));
        }
        assert_eq!(contours[1].start(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_lone_moves_make_no_contours() {
        let mut pen = ContourBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.move_to(5.0, 5.0);
        pen.close();
        assert!(pen.build().is_empty());
    }

    #[test]
    fn test_drawing_after_close_restarts_at_subpath_start() {
        let mut pen = ContourBuilder::new();
        pen.move_to(5.0, 5.0);
        pen.line_to(15.0, 5.0);
        pen.line_to(15.0, 15.0);
        pen.close();
        pen.line_to(0.0, 15.0);
        pen.line_to(0.0, 0.0);
        let contours = pen.build();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[1].start(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_points_include_control_points() {
        let mut pen = ContourBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.curve_to(0.0, 100.0, 100.0, 100.0, 100.0, 0.0);
        pen.quad_to(50.0, -50.0, 0.0, 0.0);
        pen.close();
        let contour = pen.build().remove(0);
        assert_eq!(contour.points().count(), 6);
        assert_eq!(contour.control_bounds(), Rect::new(0.0, -50.0, 100.0, 100.0));
    }

    #[test]
    fn test_raise_quadratics() {
        let mut pen = ContourBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.quad_to(30.0, 60.0, 60.0, 0.0);
        pen.close();
        let raised = pen.build().remove(0).raise_quadratics();
        let PathEl::CurveTo(c0, c1, end) = raised.elements()[1] else {
            panic!("Should be a cubic, got {:?}", raised.elements());
        };
        assert!((c0 - Point::new(20.0, 40.0)).hypot() < 1e-9);
        assert!((c1 - Point::new(40.0, 40.0)).hypot() < 1e-9);
        assert_eq!(end, Point::new(60.0, 0.0));
        assert_eq!(raised.segment_count(), 1);
        assert_eq!(raised.elements().last(), Some(&PathEl::ClosePath));
    }
}
