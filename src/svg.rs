//! SVG preview of a rendered collage frame.
//!
//! Draws the background, then every instruction inside one rotated group,
//! exactly as a raster surface would. Cells become tinted rectangles, or
//! `<image>` elements when the caller can supply an href per handle.
//!
//! # Example
//!
//! ```
//! use covergrid::{CollageSettings, ImagePool, generate, svg::render_frame_svg};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let pool = ImagePool::new((0..30).collect::<Vec<u32>>()).unwrap();
//! let frame = generate(&pool, &CollageSettings::default(), &mut StdRng::seed_from_u64(1)).unwrap();
//!
//! let svg = render_frame_svg(&frame);
//! assert!(svg.starts_with("<svg"));
//! ```

use crate::collage::Frame;
use crate::render::CellKind;

/// Hue step between consecutive pool indices in placeholder tints.
const HUE_STEP: u32 = 47;

/// Render a frame with placeholder tiles, tinted by pool index.
pub fn render_frame_svg<H>(frame: &Frame<H>) -> String {
    render_frame_svg_with(frame, |_| None)
}

/// Render a frame, drawing `<image>` elements for handles that `href`
/// resolves and placeholder tiles for the rest.
pub fn render_frame_svg_with<H, F>(frame: &Frame<H>, href: F) -> String
where
    F: Fn(&H) -> Option<String>,
{
    let size = frame.canvas_size;
    let center = frame.center();
    let mut svg = String::with_capacity(256 + frame.instructions.len() * 96);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    ));
    svg.push('\n');

    svg.push_str(
        r##"<style>
  .small { stroke: #00000033; stroke-width: 1; }
  .large { stroke: #00000055; stroke-width: 2; }
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; font-size: 11px; fill: #ffffffcc; }
</style>
"##,
    );

    svg.push_str(&format!(
        r#"<rect width="{size}" height="{size}" fill="{}" fill-opacity="{:.3}"/>"#,
        background_fill(frame),
        frame.background.opacity()
    ));
    svg.push('\n');

    svg.push_str(&format!(
        r#"<g transform="rotate({:.3} {center:.1} {center:.1})">"#,
        frame.rotation_degrees
    ));
    svg.push('\n');

    for d in &frame.instructions {
        let class = match d.kind {
            CellKind::Small => "small",
            CellKind::Large => "large",
        };
        match href(&d.image) {
            Some(link) => svg.push_str(&format!(
                r#"<image x="{}" y="{}" width="{}" height="{}" href="{}" preserveAspectRatio="xMidYMid slice" class="{class}"/>"#,
                d.x,
                d.y,
                d.size,
                d.size,
                escape_xml(&link)
            )),
            None => {
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" class="{class}"/>"#,
                    d.x,
                    d.y,
                    d.size,
                    d.size,
                    tint(d.pool_index)
                ));
                svg.push('\n');
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}">{}</text>"#,
                    d.x + 4,
                    d.y + 14,
                    d.pool_index
                ));
            }
        }
        svg.push('\n');
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

fn background_fill<H>(frame: &Frame<H>) -> String {
    let hex = frame.background.to_hex();
    // SVG fill takes #RRGGBB; alpha goes to fill-opacity.
    hex[..7].to_string()
}

/// Stable, distinguishable color per pool index.
fn tint(pool_index: usize) -> String {
    let hue = (pool_index as u32).wrapping_mul(HUE_STEP) % 360;
    format!("hsl({hue}, 55%, 45%)")
}

/// Escape special characters for XML attribute values.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CanvasColor;
    use crate::grid::CellAnchor;
    use crate::render::DrawInstruction;

    fn frame(rotation: f32) -> Frame<&'static str> {
        Frame {
            canvas_size: 640,
            rotation_degrees: rotation,
            background: CanvasColor::slate(),
            instructions: vec![
                DrawInstruction {
                    x: -97,
                    y: -97,
                    size: 97,
                    kind: CellKind::Small,
                    cell: CellAnchor::new(-1, -1),
                    pool_index: 0,
                    image: "a.jpg",
                },
                DrawInstruction {
                    x: 8,
                    y: 8,
                    size: 202,
                    kind: CellKind::Large,
                    cell: CellAnchor::new(0, 0),
                    pool_index: 1,
                    image: "b&c.jpg",
                },
            ],
        }
    }

    #[test]
    fn document_shape() {
        let svg = render_frame_svg(&frame(-15.0));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains(r#"width="640""#));
        assert!(svg.contains(r##"fill="#2C2C3C""##));
        assert!(svg.contains("rotate(-15.000 320.0 320.0)"));
    }

    #[test]
    fn placeholder_tiles() {
        let svg = render_frame_svg(&frame(0.0));
        assert!(svg.contains(r#"<rect x="-97" y="-97" width="97" height="97""#));
        assert!(svg.contains(r#"width="202" height="202""#));
        assert!(svg.contains(r#"class="large""#));
        assert_eq!(svg.matches("<text").count(), 2);
    }

    #[test]
    fn images_with_escaped_hrefs() {
        let svg = render_frame_svg_with(&frame(10.0), |name| Some(format!("covers/{name}")));
        assert_eq!(svg.matches("<image").count(), 2);
        assert!(svg.contains(r#"href="covers/b&amp;c.jpg""#));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn transparent_background() {
        let mut f = frame(0.0);
        f.background = CanvasColor::Transparent;
        let svg = render_frame_svg(&f);
        assert!(svg.contains(r##"fill="#000000" fill-opacity="0.000""##));
    }

    #[test]
    fn tints_are_stable() {
        assert_eq!(tint(0), "hsl(0, 55%, 45%)");
        assert_eq!(tint(1), "hsl(47, 55%, 45%)");
        assert_eq!(tint(1), tint(1));
    }
}
