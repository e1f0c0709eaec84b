use kurbo::{Cap, Ellipse, Join, Shape as _, Stroke, StrokeOpts};

use crate::{
    animation::pose::{local_bounds, normalized_path, pose_at},
    dancer::model::Dancer,
    foundation::{
        core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Tick},
        error::{DiscoError, DiscoResult},
    },
    render::frame::FrameRGBA,
};

/// Outline width of every dancer, in stroke units before scaling.
pub const DANCER_LINE_WIDTH: f64 = 10.0;
/// Spacing of the floor grid in pixels.
pub const GRID_SPACING: f64 = 40.0;

const FLOOR_BG: Rgba8 = Rgba8::opaque(0, 0, 0);
const GRID_COLOR: Rgba8 = Rgba8 {
    r: 255,
    g: 0,
    b: 255,
    a: 26,
};
const SHADOW_COLOR: Rgba8 = Rgba8 {
    r: 236,
    g: 72,
    b: 153,
    a: 51,
};
const FLASH_COLOR: Rgba8 = Rgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 13,
};
const SPOT_CYAN: Rgba8 = Rgba8 {
    r: 0,
    g: 255,
    b: 255,
    a: 20,
};
const SPOT_MAGENTA: Rgba8 = Rgba8 {
    r: 255,
    g: 0,
    b: 255,
    a: 20,
};

const TOLERANCE: f64 = 0.1;

/// Rasterizes the dance floor on the CPU. The render context is reused across frames.
pub struct FloorRenderer {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: Option<vello_cpu::RenderContext>,
    line: Stroke,
}

impl std::fmt::Debug for FloorRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorRenderer")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl FloorRenderer {
    pub fn new(canvas: Canvas) -> DiscoResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(DiscoError::validation("floor width/height must be > 0"));
        }
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| DiscoError::render("floor width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| DiscoError::render("floor height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: None,
            line: Stroke::new(DANCER_LINE_WIDTH)
                .with_caps(Cap::Round)
                .with_join(Join::Round),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Draw every dancer at `tick` over the animated floor.
    pub fn render(&mut self, dancers: &[Dancer], tick: Tick) -> DiscoResult<FrameRGBA> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();

        let full = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(&mut ctx, FLOOR_BG);
        ctx.fill_rect(&rect_to_cpu(full));

        self.draw_grid(&mut ctx, tick);

        let center = self.canvas.center();
        for dancer in dancers {
            self.draw_dancer(&mut ctx, dancer, tick, center);
        }

        self.draw_lights(&mut ctx, tick, full);

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Horizontal lines scroll towards the viewer one grid cell every 40 ticks.
    fn draw_grid(&self, ctx: &mut vello_cpu::RenderContext, tick: Tick) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let scroll = (tick.0 % GRID_SPACING as u64) as f64;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(ctx, GRID_COLOR);

        let mut y = scroll - GRID_SPACING;
        while y < h {
            ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, y, w, y + 1.0)));
            y += GRID_SPACING;
        }
        let mut x = 0.0;
        while x < w {
            ctx.fill_rect(&rect_to_cpu(Rect::new(x, 0.0, x + 1.0, h)));
            x += GRID_SPACING;
        }
    }

    fn draw_dancer(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        dancer: &Dancer,
        tick: Tick,
        center: Point,
    ) {
        let pose = pose_at(dancer, tick);
        let transform = affine_to_cpu(pose.to_affine(center, dancer));
        let size = local_bounds(dancer.points()).size();
        ctx.set_transform(transform);

        // Shadow sits just below the outline and narrows while the dancer is airborne.
        let rx = (size.width / 2.0 * pose.shadow_scale).max(0.0);
        if rx > 0.0 {
            let shadow = Ellipse::new(
                Point::new(size.width / 2.0, size.height + DANCER_LINE_WIDTH + 6.0),
                (rx, 8.0),
                0.0,
            );
            set_color(ctx, SHADOW_COLOR);
            ctx.fill_path(&bezpath_to_cpu(&shadow.to_path(TOLERANCE)));
        }

        let outline = kurbo::stroke(
            normalized_path(dancer.points()),
            &self.line,
            &StrokeOpts::default(),
            TOLERANCE,
        );
        set_color(ctx, dancer.color());
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }

    /// Drifting colour wash that swaps hue every 50 ticks, plus a strobe on 2 ticks out of 10.
    fn draw_lights(&self, ctx: &mut vello_cpu::RenderContext, tick: Tick, full: Rect) {
        let t = tick.as_f64();
        let spot = if tick.0 % 100 > 50 {
            SPOT_CYAN
        } else {
            SPOT_MAGENTA
        };
        let center = self.canvas.center()
            + kurbo::Vec2::new(
                (t * 0.02).sin() * full.width() * 0.1,
                (t * 0.02).cos() * full.height() * 0.1,
            );
        let radius = full.width().max(full.height()) * 0.7;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(ctx, spot);
        ctx.fill_path(&bezpath_to_cpu(
            &kurbo::Circle::new(center, radius).to_path(TOLERANCE),
        ));

        if tick.0 % 10 < 2 {
            set_color(ctx, FLASH_COLOR);
            ctx.fill_rect(&rect_to_cpu(full));
        }
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/floor.rs"]
mod tests;
