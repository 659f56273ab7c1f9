//! Backend-neutral list of draw commands in screen space.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use planmark_core::Stroke;

/// One drawing operation, already transformed to physical pixels.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear { color: Color },
    Image { index: usize, name: String, rect: Rect },
    Stroke { path: BezPath, color: Color, width: f64, in_progress: bool },
    /// A single-point stroke, drawn as a filled circle.
    Dot { center: Point, radius: f64, color: Color, in_progress: bool },
    Note { position: Point, text: String, font_size: f64 },
}

/// Records the commands for the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push_stroke(&mut self, ctx: &RenderContext, stroke: &Stroke, in_progress: bool) {
        let transform = ctx.transform();
        let zoom = ctx.frame.view.scale * ctx.scale_factor;
        let color = Color::from(stroke.color);
        if stroke.is_dot() {
            self.commands.push(DrawCommand::Dot {
                center: transform * stroke.points()[0],
                radius: stroke.width * zoom / 2.0,
                color,
                in_progress,
            });
        } else {
            self.commands.push(DrawCommand::Stroke {
                path: transform * stroke.to_path(),
                color,
                width: stroke.width * zoom,
                in_progress,
            });
        }
    }
}

impl Renderer for DisplayList {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        self.commands.clear();

        let frame = &ctx.frame;
        let transform = ctx.transform();
        self.commands.push(DrawCommand::Clear {
            color: self.background_color(ctx),
        });
        self.commands.push(DrawCommand::Image {
            index: frame.image_index,
            name: frame.image.name.clone(),
            rect: transform.transform_rect_bbox(Rect::from_origin_size(Point::ZERO, frame.image.extent)),
        });

        for stroke in frame.strokes {
            self.push_stroke(ctx, stroke, false);
        }
        if ctx.show_current_stroke {
            if let Some(stroke) = frame.current_stroke {
                self.push_stroke(ctx, stroke, true);
            }
        }

        let zoom = frame.view.scale * ctx.scale_factor;
        for note in frame.notes {
            self.commands.push(DrawCommand::Note {
                position: transform * note.position,
                text: note.text.clone(),
                font_size: ctx.note_font_size * zoom,
            });
        }

        log::trace!("Display list rebuilt: {} commands (revision {})", self.commands.len(), frame.revision);
        Ok(())
    }
}
