/// Draw commands: the per-frame render output of the animation.
///
/// `compose()` turns the current `WordFall` into a flat list of commands in
/// world units. Whatever surface consumes the list decides how to rasterize
/// it; the terminal renderer is one such surface.
///
/// Paint order: floor strip (while visible), falling words, stacked words.

use crate::sim::world::WordFall;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid band from `y` down to the canvas bottom.
    Floor { y: f32, width: f32, height: f32, gray: u8 },
    /// Filled, stroked rounded rectangle rotated about its center.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        rotation: f32,
        fill: u8,
        stroke: u8,
        stroke_width: f32,
    },
    /// Text whose top-left corner is at `(x, y)`, rotated about `pivot`.
    Text {
        x: f32,
        y: f32,
        text: String,
        gray: u8,
        rotation: f32,
        pivot: (f32, f32),
    },
}

const STROKE_WIDTH: f32 = 1.0;

pub fn compose(world: &WordFall) -> Vec<DrawCommand> {
    let look = &world.look;
    let mut out = Vec::with_capacity(1 + 2 * (world.falling.len() + world.stacked.len()));

    if world.floor_visible() {
        out.push(DrawCommand::Floor {
            y: world.floor_level,
            width: world.width,
            height: (world.height - world.floor_level).max(0.0),
            gray: look.floor_gray,
        });
    }

    for f in &world.falling {
        push_word(&mut out, world, &f.text, f.x, f.y, f.width, f.height, f.rotation, f.gray);
    }
    for s in world.stacked.iter() {
        push_word(&mut out, world, &s.text, s.x, s.y, s.width, s.height, 0.0, s.gray);
    }

    out
}

fn push_word(
    out: &mut Vec<DrawCommand>,
    world: &WordFall,
    text: &str,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    rotation: f32,
    fill: u8,
) {
    let look = &world.look;
    out.push(DrawCommand::Rect {
        x,
        y,
        w,
        h,
        radius: look.corner_radius,
        rotation,
        fill,
        stroke: look.stroke_gray,
        stroke_width: STROKE_WIDTH,
    });
    out.push(DrawCommand::Text {
        x: x + look.text_inset,
        y: y + look.text_inset,
        text: text.to_owned(),
        gray: look.text_gray,
        rotation,
        pivot: (x + w / 2.0, y + h / 2.0),
    });
}
