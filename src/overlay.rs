// overlay.rs — Drawing collaborator contract.
//
// Annotation is rendered by the board's display library. The pipeline only
// issues three kinds of calls:
//
//   draw_bounding_box(left, top, right, bottom, fill, color)
//   draw_line(x0, y0, x1, y1, color)
//   draw_string(x, y, text, size, color)
//
// `DrawList` records the calls instead of rendering them. Hosts without a
// display use it to inspect what would have been drawn; tests use it to
// check the pipeline's annotations.

/// Colour tokens understood by the display library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
    Black,
}

/// Font size class for `draw_string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Tiny,
    Small,
    Large,
}

/// Sink for annotation primitives.
pub trait Overlay {
    /// Rectangle with inclusive corners; `fill` paints the interior too.
    fn draw_bounding_box(
        &mut self,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        fill: bool,
        color: DrawColor,
    );

    fn draw_line(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: DrawColor);

    fn draw_string(&mut self, x: usize, y: usize, text: &str, size: TextSize, color: DrawColor);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BoundingBox {
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        fill: bool,
        color: DrawColor,
    },
    Line {
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
        color: DrawColor,
    },
    Text {
        x: usize,
        y: usize,
        text: String,
        size: TextSize,
        color: DrawColor,
    },
}

/// Overlay that records every call in order.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of bounding boxes recorded.
    pub fn box_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::BoundingBox { .. }))
            .count()
    }
}

impl Overlay for DrawList {
    fn draw_bounding_box(
        &mut self,
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        fill: bool,
        color: DrawColor,
    ) {
        self.commands.push(DrawCommand::BoundingBox {
            left,
            top,
            right,
            bottom,
            fill,
            color,
        });
    }

    fn draw_line(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: DrawColor) {
        self.commands.push(DrawCommand::Line { x0, y0, x1, y1, color });
    }

    fn draw_string(&mut self, x: usize, y: usize, text: &str, size: TextSize, color: DrawColor) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_owned(),
            size,
            color,
        });
    }
}

/// Overlay that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    fn draw_bounding_box(&mut self, _: usize, _: usize, _: usize, _: usize, _: bool, _: DrawColor) {}
    fn draw_line(&mut self, _: usize, _: usize, _: usize, _: usize, _: DrawColor) {}
    fn draw_string(&mut self, _: usize, _: usize, _: &str, _: TextSize, _: DrawColor) {}
}
