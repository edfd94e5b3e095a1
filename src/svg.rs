//! Reading glyph outlines out of SVG artwork.
//!
//! Only geometry is read: `path`, `rect`, `circle`, `ellipse`, `polygon` and
//! `polyline` elements, wherever they sit in the document tree. Styling,
//! gradients, filters, clipping and text are ignored, as is anything inside
//! `defs` and similar non-rendering containers. Coordinates are returned as
//! they appear in the artwork; see [`crate::transform`] for the move into
//! design space.

use std::f64::consts::FRAC_PI_2;

use kurbo::{Arc, BezPath, Circle, Ellipse, Point, Rect, Shape, Vec2};
use roxmltree::{Document, Node};

use crate::{
    error::GeometryError,
    shape::{Contour, ContourBuilder, OutlinePen},
};

/// Flattening tolerance used when converting basic shapes to paths
const SHAPE_TOLERANCE: f64 = 0.1;

/// Elements whose children are never drawn directly
const NON_RENDERING: &[&str] = &["defs", "clipPath", "mask", "symbol", "pattern", "marker"];

/// Parse an SVG document into closed contours in artwork coordinates
///
/// A document with no drawable geometry yields no contours; that is a blank
/// glyph, not an error.
pub fn parse_svg(source: &str) -> Result<Vec<Contour>, GeometryError> {
    let document = Document::parse(source)?;
    let root = document.root_element();
    if root.tag_name().name() != "svg" {
        return Err(GeometryError::NotSvg(root.tag_name().name().to_string()));
    }
    let mut pen = ContourBuilder::new();
    draw_children(root, &mut pen)?;
    Ok(pen.build())
}

fn draw_children(node: Node, pen: &mut ContourBuilder) -> Result<(), GeometryError> {
    for child in node.children().filter(|n| n.is_element()) {
        let name = child.tag_name().name();
        if NON_RENDERING.contains(&name) || child.attribute("display") == Some("none") {
            log::trace!("Skipping <{name}> subtree");
            continue;
        }
        if child.has_attribute("transform") {
            log::warn!("Ignoring transform on <{name}>; artwork should be flattened");
        }
        if let Some(path) = element_path(child)? {
            log::trace!("<{name}>: {} path elements", path.elements().len());
            pen.draw_path(&path);
        }
        draw_children(child, pen)?;
    }
    Ok(())
}

/// The outline of a single element, if it draws one
fn element_path(node: Node) -> Result<Option<BezPath>, GeometryError> {
    let path = match node.tag_name().name() {
        "path" => match node.attribute("d") {
            Some(d) if !d.trim().is_empty() => Some(BezPath::from_svg(d)?),
            _ => None,
        },
        "rect" => {
            let x = length(node, "x")?.unwrap_or(0.0);
            let y = length(node, "y")?.unwrap_or(0.0);
            let width = non_negative(node, "width")?;
            let height = non_negative(node, "height")?;
            // A missing rx takes the value of ry and vice versa
            let rx = length(node, "rx")?;
            let ry = length(node, "ry")?;
            let radii = Vec2::new(
                rx.or(ry).unwrap_or(0.0).max(0.0).min(width / 2.0),
                ry.or(rx).unwrap_or(0.0).max(0.0).min(height / 2.0),
            );
            let rect = Rect::new(x, y, x + width, y + height);
            if width == 0.0 || height == 0.0 {
                None
            } else if radii.x > 0.0 && radii.y > 0.0 {
                Some(rounded_rect(rect, radii))
            } else {
                Some(rect.to_path(SHAPE_TOLERANCE))
            }
        }
        "circle" => {
            let center = Point::new(
                length(node, "cx")?.unwrap_or(0.0),
                length(node, "cy")?.unwrap_or(0.0),
            );
            let r = non_negative(node, "r")?;
            (r > 0.0).then(|| Circle::new(center, r).to_path(SHAPE_TOLERANCE))
        }
        "ellipse" => {
            let center = Point::new(
                length(node, "cx")?.unwrap_or(0.0),
                length(node, "cy")?.unwrap_or(0.0),
            );
            let rx = non_negative(node, "rx")?;
            let ry = non_negative(node, "ry")?;
            (rx > 0.0 && ry > 0.0)
                .then(|| Ellipse::new(center, (rx, ry), 0.0).to_path(SHAPE_TOLERANCE))
        }
        "polygon" | "polyline" => {
            let points = point_list(node)?;
            (points.len() > 1).then(|| {
                let mut path = BezPath::new();
                path.move_to(points[0]);
                for point in &points[1..] {
                    path.line_to(*point);
                }
                path.close_path();
                path
            })
        }
        _ => None,
    };
    Ok(path)
}

/// A rectangle with elliptical corners, clockwise from the top edge in y-down artwork
fn rounded_rect(rect: Rect, radii: Vec2) -> BezPath {
    let (rx, ry) = (radii.x, radii.y);
    let corners = [
        (Point::new(rect.x1 - rx, rect.y0 + ry), -FRAC_PI_2),
        (Point::new(rect.x1 - rx, rect.y1 - ry), 0.0),
        (Point::new(rect.x0 + rx, rect.y1 - ry), FRAC_PI_2),
        (Point::new(rect.x0 + rx, rect.y0 + ry), 2.0 * FRAC_PI_2),
    ];
    let mut path = BezPath::new();
    path.move_to((rect.x0 + rx, rect.y0));
    for (center, start) in corners {
        let arc = Arc::new(center, radii, start, FRAC_PI_2, 0.0);
        path.line_to(center + Vec2::new(rx * start.cos(), ry * start.sin()));
        path.extend(arc.append_iter(SHAPE_TOLERANCE));
    }
    path.close_path();
    path
}

fn invalid(node: Node, attribute: &str, value: &str) -> GeometryError {
    GeometryError::Attribute {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn length(node: Node, attribute: &str) -> Result<Option<f64>, GeometryError> {
    node.attribute(attribute)
        .map(|value| parse_number(value).ok_or_else(|| invalid(node, attribute, value)))
        .transpose()
}

/// A size attribute; missing means zero, negative is an error
fn non_negative(node: Node, attribute: &str) -> Result<f64, GeometryError> {
    let value = length(node, attribute)?.unwrap_or(0.0);
    if value < 0.0 {
        return Err(invalid(
            node,
            attribute,
            node.attribute(attribute).unwrap_or_default(),
        ));
    }
    Ok(value)
}

fn point_list(node: Node) -> Result<Vec<Point>, GeometryError> {
    let Some(raw) = node.attribute("points") else {
        return Ok(vec![]);
    };
    let numbers = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| parse_number(s).ok_or_else(|| invalid(node, "points", raw)))
        .collect::<Result<Vec<f64>, _>>()?;
    if numbers.len() % 2 != 0 {
        return Err(invalid(node, "points", raw));
    }
    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}
