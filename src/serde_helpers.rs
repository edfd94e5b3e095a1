use serde::ser::SerializeSeq as _;

use crate::shape::GlyphShape;

/// Serialize a glyph's contours as a list of SVG path data strings
pub(crate) fn shape_as_svg<S>(shape: &GlyphShape, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut seq = serializer.serialize_seq(Some(shape.contours.len()))?;
    for contour in &shape.contours {
        seq.serialize_element(&contour.to_svg())?;
    }
    seq.end()
}
