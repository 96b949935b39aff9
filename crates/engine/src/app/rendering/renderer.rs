use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::tools::{draw_banner, draw_overlay, write_pixel_rgba, OverlayData};
use crate::app::{Banner, Camera2D, RenderableDesc, RenderableKind, SceneWorld, Transform};

use super::transform::world_to_screen;
use super::{Viewport, PIXELS_PER_WORLD};

const CLEAR_COLOR: [u8; 4] = [135, 206, 235, 255];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(
        &mut self,
        world: &SceneWorld,
        banner: Option<&Banner>,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        for entity in world.entities() {
            draw_renderable(
                frame,
                self.viewport,
                world.camera(),
                entity.transform,
                &entity.renderable,
            );
        }

        if let Some(banner) = banner {
            draw_banner(frame, self.viewport.width, self.viewport.height, banner);
        }
        if let Some(overlay) = overlay {
            draw_overlay(frame, self.viewport.width, self.viewport.height, overlay);
        }

        self.pixels.render()
    }
}

fn draw_renderable(
    frame: &mut [u8],
    viewport: Viewport,
    camera: &Camera2D,
    transform: Transform,
    renderable: &RenderableDesc,
) {
    let center = world_to_screen(transform.position, camera, viewport, PIXELS_PER_WORLD);
    draw_shape(
        frame,
        viewport,
        center,
        transform.rotation_radians,
        renderable.kind,
        renderable.color,
    );
}

/// Rasterize one rotated shape by inverse-rotating each candidate pixel
/// into the shape's local frame and testing containment there.
fn draw_shape(
    frame: &mut [u8],
    viewport: Viewport,
    center: (i32, i32),
    rotation_radians: f32,
    kind: RenderableKind,
    color: [u8; 4],
) {
    if viewport.width == 0 || viewport.height == 0 {
        return;
    }

    let bound = shape_bound_px(kind).ceil() as i32 + 1;
    let (cx, cy) = center;
    let min_x = (cx - bound).max(0);
    let max_x = (cx + bound).min(viewport.width as i32 - 1);
    let min_y = (cy - bound).max(0);
    let max_y = (cy + bound).min(viewport.height as i32 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let (sin, cos) = rotation_radians.sin_cos();
    let width_usize = viewport.width as usize;
    for py in min_y..=max_y {
        for px in min_x..=max_x {
            // Screen y grows downward; flip into the y-up local frame first.
            let dx = (px - cx) as f32;
            let dy = (cy - py) as f32;
            let local_x = dx * cos + dy * sin;
            let local_y = -dx * sin + dy * cos;
            if shape_contains(kind, local_x, local_y) {
                write_pixel_rgba(frame, width_usize, px as usize, py as usize, color);
            }
        }
    }
}

fn shape_bound_px(kind: RenderableKind) -> f32 {
    let bound_world = match kind {
        RenderableKind::Circle { radius } => radius,
        RenderableKind::Rect { half_extents } => {
            (half_extents.x * half_extents.x + half_extents.y * half_extents.y).sqrt()
        }
        RenderableKind::Triangle { circumradius } => circumradius,
    };
    bound_world * PIXELS_PER_WORLD
}

fn shape_contains(kind: RenderableKind, local_x: f32, local_y: f32) -> bool {
    match kind {
        RenderableKind::Circle { radius } => {
            let radius_px = radius * PIXELS_PER_WORLD;
            local_x * local_x + local_y * local_y <= radius_px * radius_px
        }
        RenderableKind::Rect { half_extents } => {
            local_x.abs() <= half_extents.x * PIXELS_PER_WORLD
                && local_y.abs() <= half_extents.y * PIXELS_PER_WORLD
        }
        RenderableKind::Triangle { circumradius } => {
            let radius_px = circumradius * PIXELS_PER_WORLD;
            let half_base = radius_px * 0.866_025_4;
            let vertices = [
                (0.0, radius_px),
                (-half_base, -0.5 * radius_px),
                (half_base, -0.5 * radius_px),
            ];
            point_in_convex_ccw(&vertices, local_x, local_y)
        }
    }
}

fn point_in_convex_ccw(vertices: &[(f32, f32)], x: f32, y: f32) -> bool {
    let count = vertices.len();
    for index in 0..count {
        let (ax, ay) = vertices[index];
        let (bx, by) = vertices[(index + 1) % count];
        let cross = (bx - ax) * (y - ay) - (by - ay) * (x - ax);
        if cross < 0.0 {
            return false;
        }
    }
    true
}
