use super::{free_threaded_count, percentage};
use crate::Result;
use crate::wheels::AnnotatedPackage;
use core::f64::consts::{PI, TAU};
use core::fmt::Write;
use std::borrow::Cow;

const PADDING: f64 = 10.0;
const OUTER_RADIUS: f64 = 180.0;
const INNER_RADIUS: f64 = OUTER_RADIUS / 2.0;
const CENTER: f64 = PADDING + OUTER_RADIUS;

/// Vertical distance of the numerator and denominator from the center.
const OFFSET: f64 = 20.0;
const FRACTION_LINE: f64 = 80.0;

const HEADER: &str = r#"<?xml version="1.0" standalone="no"?>
<?xml-stylesheet href="wheel.css" type="text/css"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN"
"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
"#;

const FONT_FAMILY: &str = "&quot;Helvetica Neue&quot;,Helvetica,Arial,sans-serif";

/// Start and stop angles, in radians, of wedge `index` out of `total`.
///
/// Wedge 0 starts at twelve o'clock and wedges advance clockwise in screen coordinates.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "package counts are far below 2^52")]
pub fn wedge_angles(index: usize, total: usize) -> (f64, f64) {
    let per_wedge = TAU / total as f64;
    let start = index as f64 * per_wedge - TAU / 4.0;
    (start, start + per_wedge)
}

/// Path data for the annulus segment between `start` and `stop`.
///
/// The outer arc runs clockwise from `start` to `stop`, a radial edge drops to the inner
/// circle, and the inner arc runs back. A full turn is drawn as two concentric rings.
#[must_use]
pub fn annular_sector_path(start: f64, stop: f64) -> String {
    let span = stop - start;
    if span >= TAU - 1e-9 {
        return full_ring_path(start);
    }

    let large_arc = u8::from(span > PI);
    let (outer_start_x, outer_start_y) = point(OUTER_RADIUS, start);
    let (outer_end_x, outer_end_y) = point(OUTER_RADIUS, stop);
    let (inner_start_x, inner_start_y) = point(INNER_RADIUS, stop);
    let (inner_end_x, inner_end_y) = point(INNER_RADIUS, start);

    format!(
        "M{outer_start_x},{outer_start_y} A{r},{r} 0 {large_arc} 1 {outer_end_x},{outer_end_y} \
         L{inner_start_x},{inner_start_y} A{ir},{ir} 0 {large_arc} 0 {inner_end_x},{inner_end_y} Z",
        r = coord(OUTER_RADIUS),
        ir = coord(INNER_RADIUS),
    )
}

fn full_ring_path(start: f64) -> String {
    let (outer_x, outer_y) = point(OUTER_RADIUS, start);
    let (outer_opposite_x, outer_opposite_y) = point(OUTER_RADIUS, start + PI);
    let (inner_x, inner_y) = point(INNER_RADIUS, start);
    let (inner_opposite_x, inner_opposite_y) = point(INNER_RADIUS, start + PI);

    // Opposite winding on the inner ring leaves the hole unfilled.
    format!(
        "M{outer_x},{outer_y} A{r},{r} 0 1 1 {outer_opposite_x},{outer_opposite_y} A{r},{r} 0 1 1 {outer_x},{outer_y} \
         M{inner_x},{inner_y} A{ir},{ir} 0 1 0 {inner_opposite_x},{inner_opposite_y} A{ir},{ir} 0 1 0 {inner_x},{inner_y} Z",
        r = coord(OUTER_RADIUS),
        ir = coord(INNER_RADIUS),
    )
}

fn point(radius: f64, angle: f64) -> (String, String) {
    (coord(CENTER + radius * angle.cos()), coord(CENTER + radius * angle.sin()))
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn coord(value: f64) -> String {
    // Adding zero turns a negative zero into a positive one.
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn xml_escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Render the wheel chart as a standalone SVG document.
pub fn generate<W: Write>(packages: &[AnnotatedPackage], writer: &mut W) -> Result<()> {
    let total = packages.len();
    let size = coord(2.0 * CENTER);

    writer.write_str(HEADER)?;
    writeln!(writer, r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 {size} {size}">"#)?;

    for (index, package) in packages.iter().enumerate() {
        let (start, stop) = wedge_angles(index, total);
        writeln!(
            writer,
            r#"<path class="{}" d="{}"><title>{} {}</title></path>"#,
            package.css_class,
            annular_sector_path(start, stop),
            xml_escape(&package.name),
            package.icon
        )?;
    }

    let free_threaded = free_threaded_count(packages);
    let share = format!("{:.0}%", percentage(free_threaded, total));
    let center = coord(CENTER);

    write_fraction_text(writer, &coord(CENTER - OFFSET), free_threaded, &share)?;
    writeln!(
        writer,
        r#"<line class="wheel-line" x1="{}" y1="{center}" x2="{}" y2="{center}" stroke-width="2"/>"#,
        coord(CENTER - FRACTION_LINE / 2.0),
        coord(CENTER + FRACTION_LINE / 2.0),
    )?;
    write_fraction_text(writer, &coord(CENTER + OFFSET), total, &share)?;

    writeln!(writer, "</svg>")?;
    Ok(())
}

fn write_fraction_text<W: Write>(writer: &mut W, y: &str, value: usize, share: &str) -> Result<()> {
    writeln!(
        writer,
        r#"<text class="wheel-text" x="{}" y="{y}" text-anchor="middle" dominant-baseline="central" font-size="{}" font-family="{FONT_FAMILY}">{value}<title>{share}</title></text>"#,
        coord(CENTER),
        coord(2.0 * OFFSET),
    )?;
    Ok(())
}
