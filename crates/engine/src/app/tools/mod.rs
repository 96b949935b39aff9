mod overlay;

pub(crate) use overlay::{draw_banner, draw_overlay, write_pixel_rgba, OverlayData};
