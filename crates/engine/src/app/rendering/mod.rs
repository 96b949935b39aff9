mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{world_to_screen, Viewport};

/// Fixed render scale. The level is authored against this, so it is a
/// compile-time constant rather than a camera property.
pub const PIXELS_PER_WORLD: f32 = 50.0;
