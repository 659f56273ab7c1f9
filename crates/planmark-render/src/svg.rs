//! SVG document renderer.
//!
//! The image, strokes and notes are written in image space inside a single
//! group carrying the view transform, so the document stays editable and
//! the strokes remain attached to the plan.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use planmark_core::{PenColor, Stroke};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashMap;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

type SvgWriter = Writer<Vec<u8>>;

/// Writes frames as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    output: String,
    /// Per-image `href` overrides; the image name is used otherwise.
    image_hrefs: HashMap<usize, String>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `href` for the background image at `index`.
    pub fn set_image_href(&mut self, index: usize, href: impl Into<String>) {
        self.image_hrefs.insert(index, href.into());
    }

    /// The document produced by the last `build_scene`.
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    /// Render one frame and return the document.
    pub fn render_to_string(&mut self, ctx: &RenderContext) -> RenderResult<String> {
        self.build_scene(ctx)?;
        Ok(self.output.clone())
    }

    fn write_stroke(writer: &mut SvgWriter, stroke: &Stroke) -> RenderResult<()> {
        let color = stroke.color;
        let fill = hex_rgb(color);
        let element = if stroke.is_dot() {
            let p = stroke.points()[0];
            let mut circle = BytesStart::new("circle");
            circle.push_attribute(("cx", p.x.to_string().as_str()));
            circle.push_attribute(("cy", p.y.to_string().as_str()));
            circle.push_attribute(("r", (stroke.width / 2.0).to_string().as_str()));
            circle.push_attribute(("fill", fill.as_str()));
            if let Some(opacity) = opacity(color) {
                circle.push_attribute(("fill-opacity", opacity.as_str()));
            }
            circle
        } else {
            let mut path = BytesStart::new("path");
            path.push_attribute(("d", stroke.to_path().to_svg().as_str()));
            path.push_attribute(("stroke", fill.as_str()));
            path.push_attribute(("stroke-width", stroke.width.to_string().as_str()));
            path.push_attribute(("fill", "none"));
            path.push_attribute(("stroke-linecap", "round"));
            path.push_attribute(("stroke-linejoin", "round"));
            if let Some(opacity) = opacity(color) {
                path.push_attribute(("stroke-opacity", opacity.as_str()));
            }
            path
        };
        write(writer, Event::Empty(element))
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        let frame = &ctx.frame;
        let size = ctx.physical_size();
        let background = PenColor::from(self.background_color(ctx));
        let zoom = frame.view.scale * ctx.scale_factor;
        let translate = frame.view.translate * ctx.scale_factor;
        let (width, height) = (size.width.to_string(), size.height.to_string());

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let view_box = format!("0 0 {} {}", width, height);
        let svg = BytesStart::new("svg").with_attributes([
            ("xmlns", SVG_NS),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("viewBox", view_box.as_str()),
        ]);
        write(&mut writer, Event::Start(svg))?;

        let fill = hex_rgb(background);
        let rect = BytesStart::new("rect").with_attributes([
            ("width", "100%"),
            ("height", "100%"),
            ("fill", fill.as_str()),
        ]);
        write(&mut writer, Event::Empty(rect))?;

        let transform = format!("translate({}, {}) scale({})", translate.x, translate.y, zoom);
        let group = BytesStart::new("g").with_attributes([("transform", transform.as_str())]);
        write(&mut writer, Event::Start(group))?;

        let href = self
            .image_hrefs
            .get(&frame.image_index)
            .map(String::as_str)
            .unwrap_or(&frame.image.name);
        let (image_width, image_height) = (
            frame.image.extent.width.to_string(),
            frame.image.extent.height.to_string(),
        );
        let image = BytesStart::new("image").with_attributes([
            ("x", "0"),
            ("y", "0"),
            ("width", image_width.as_str()),
            ("height", image_height.as_str()),
            ("href", href),
            ("preserveAspectRatio", "none"),
        ]);
        write(&mut writer, Event::Empty(image))?;

        for stroke in frame.strokes {
            Self::write_stroke(&mut writer, stroke)?;
        }
        if ctx.show_current_stroke {
            if let Some(stroke) = frame.current_stroke {
                Self::write_stroke(&mut writer, stroke)?;
            }
        }
        let font_size = ctx.note_font_size.to_string();
        for note in frame.notes {
            let (x, y) = (note.position.x.to_string(), note.position.y.to_string());
            let text = BytesStart::new("text").with_attributes([
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("font-size", font_size.as_str()),
                ("fill", "black"),
            ]);
            write(&mut writer, Event::Start(text))?;
            write(&mut writer, Event::Text(BytesText::new(&note.text)))?;
            write(&mut writer, Event::End(BytesEnd::new("text")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("g")))?;
        write(&mut writer, Event::End(BytesEnd::new("svg")))?;

        let mut output = String::from_utf8(writer.into_inner())
            .map_err(|_| RendererError::RenderFailed("SVG output is not valid UTF-8".into()))?;
        output.push('\n');
        self.output = output;
        Ok(())
    }
}

fn write(writer: &mut SvgWriter, event: Event<'_>) -> RenderResult<()> {
    writer
        .write_event(event)
        .map_err(|e| RendererError::Xml(e.into()))
}

fn hex_rgb(color: PenColor) -> String {
    PenColor { a: 255, ..color }.to_hex()
}

/// Opacity attribute value for translucent colors.
fn opacity(color: PenColor) -> Option<String> {
    (color.a != 255).then(|| format!("{:.3}", f64::from(color.a) / 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use planmark_core::{CanvasEngine, EngineConfig, ImageAsset, Mode, PointerEvent};

    fn engine() -> CanvasEngine {
        CanvasEngine::new(
            EngineConfig::with_viewport(1000.0, 800.0),
            vec![
                ImageAsset::new("floorplan.png", 1000.0, 800.0),
                ImageAsset::new("T1.png", 600.0, 400.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_svg_structure() {
        let mut engine = engine();
        engine.set_mode(Mode::Annotate);
        engine.set_pen_color(PenColor::RED);
        engine.handle_pointer(PointerEvent::down(Point::new(100.0, 100.0), 0));
        engine.handle_pointer(PointerEvent::moved(Point::new(150.0, 160.0), 0));
        engine.handle_pointer(PointerEvent::up(Point::new(150.0, 160.0), 0));

        let mut renderer = SvgRenderer::new();
        let svg = renderer.render_to_string(&RenderContext::new(engine.frame())).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.contains(r#"width="1000" height="800""#));
        assert!(svg.contains(r#"<g transform="translate(0, 0) scale(1)">"#));
        assert!(svg.contains(r#"href="floorplan.png""#));
        assert!(svg.contains("M100,100"));
        assert!(svg.contains("L150,160"));
        assert!(svg.contains(r##"stroke="#ff0000""##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_group_uses_view() {
        let mut engine = engine();
        engine.set_active_image(1).unwrap();
        let mut renderer = SvgRenderer::new();
        renderer.set_image_href(1, "assets/T1.png");
        renderer.build_scene(&RenderContext::new(engine.frame())).unwrap();
        assert!(renderer.svg().contains(r#"translate(200, 200) scale(1)"#));
        assert!(renderer.svg().contains(r#"href="assets/T1.png""#));
    }

    #[test]
    fn test_svg_attribute_values_escaped() {
        let engine = engine();
        let mut renderer = SvgRenderer::new();
        renderer.set_image_href(0, r#"plans/a&b "v2".png"#);
        let svg = renderer
            .render_to_string(&RenderContext::new(engine.frame()))
            .unwrap();
        assert!(svg.contains(r#"href="plans/a&amp;b &quot;v2&quot;.png""#));
    }

    #[test]
    fn test_svg_dot_and_escaped_note() {
        let mut engine = engine();
        engine.set_mode(Mode::Annotate);
        engine.handle_pointer(PointerEvent::down(Point::new(40.0, 50.0), 0));
        engine.handle_pointer(PointerEvent::up(Point::new(40.0, 50.0), 0));
        engine.add_note(Point::new(10.0, 10.0), "A & <B>");

        let svg = SvgRenderer::new()
            .render_to_string(&RenderContext::new(engine.frame()))
            .unwrap();
        assert!(svg.contains(r#"<circle cx="40" cy="50" r="1""#));
        assert!(svg.contains("A &amp; &lt;B&gt;"));
    }

    #[test]
    fn test_translucent_color_opacity() {
        let color = PenColor::new(0, 0, 255, 128);
        assert_eq!(hex_rgb(color), "#0000ff");
        assert_eq!(opacity(color).as_deref(), Some("0.502"));
        assert_eq!(opacity(PenColor::BLUE), None);
    }
}
