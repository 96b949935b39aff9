use crate::app::{Banner, BannerStyle, LoopMetricsSnapshot};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

const OVERLAY_TEXT_SCALE: i32 = 2;
const OVERLAY_PADDING: i32 = 12;
const OVERLAY_PANEL_INSET_X: i32 = 8;
const OVERLAY_PANEL_INSET_Y: i32 = 6;
const OVERLAY_TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

const BANNER_TITLE_SCALE: i32 = 5;
const BANNER_LINE_SCALE: i32 = 2;
const BANNER_PANEL_INSET_X: i32 = 24;
const BANNER_PANEL_INSET_Y: i32 = 18;

const fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

const fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub entity_count: usize,
    pub extra_lines: Vec<String>,
}

/// Debug overlay in the top-left corner, toggled from the loop.
pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_chars = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .max()
        .unwrap_or(0);
    let panel_width =
        longest_line_chars * glyph_advance(OVERLAY_TEXT_SCALE) + OVERLAY_PANEL_INSET_X * 2;
    let panel_height = lines.len() as i32 * line_advance(OVERLAY_TEXT_SCALE)
        + OVERLAY_PANEL_INSET_Y * 2;
    let panel_left = OVERLAY_PADDING - OVERLAY_PANEL_INSET_X;
    let panel_top = OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y;
    draw_filled_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let mut y = OVERLAY_PADDING;
    for line in lines {
        draw_text_clipped(
            frame,
            width,
            height,
            OVERLAY_PADDING,
            y,
            &line,
            OVERLAY_TEXT_SCALE,
            OVERLAY_TEXT_COLOR,
        );
        y += line_advance(OVERLAY_TEXT_SCALE);
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        format!("FPS: {:.1}", data.metrics.fps),
        format!("TPS: {:.1}", data.metrics.tps),
        format!(
            "FRAME: {:.2}/{:.2} MS",
            data.metrics.frame_time_ms, data.metrics.max_frame_time_ms
        ),
        format!("ENTITIES: {}", data.entity_count),
    ];
    lines.extend(data.extra_lines.iter().cloned());
    lines
}

/// Centered outcome/start panel. Color scheme follows the banner style.
pub(crate) fn draw_banner(frame: &mut [u8], width: u32, height: u32, banner: &Banner) {
    if width == 0 || height == 0 {
        return;
    }

    let (bg_color, text_color, border_color) = banner_colors(banner.style);

    let title_width = text_width_px(banner.title, BANNER_TITLE_SCALE);
    let lines_width = banner
        .lines
        .iter()
        .map(|line| text_width_px(line, BANNER_LINE_SCALE))
        .max()
        .unwrap_or(0);
    let content_width = title_width.max(lines_width);
    let title_block = line_advance(BANNER_TITLE_SCALE);
    let line_block = line_advance(BANNER_LINE_SCALE);

    let panel_width = content_width + BANNER_PANEL_INSET_X * 2;
    let panel_height = BANNER_PANEL_INSET_Y * 2
        + title_block
        + line_block
        + banner.lines.len() as i32 * line_block;
    let panel_left = (width as i32 - panel_width) / 2;
    let panel_top = (height as i32 - panel_height) / 2;

    draw_filled_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        bg_color,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        border_color,
    );

    let mut y = panel_top + BANNER_PANEL_INSET_Y;
    let title_x = panel_left + (panel_width - title_width) / 2;
    draw_text_clipped(
        frame,
        width,
        height,
        title_x,
        y,
        banner.title,
        BANNER_TITLE_SCALE,
        text_color,
    );
    y += title_block + line_block;

    for line in banner.lines {
        let line_x = panel_left + (panel_width - text_width_px(line, BANNER_LINE_SCALE)) / 2;
        draw_text_clipped(
            frame,
            width,
            height,
            line_x,
            y,
            line,
            BANNER_LINE_SCALE,
            text_color,
        );
        y += line_block;
    }
}

fn banner_colors(style: BannerStyle) -> ([u8; 4], [u8; 4], [u8; 4]) {
    match style {
        BannerStyle::Start => (
            [244, 248, 252, 235],
            [30, 34, 44, 255],
            [92, 106, 126, 255],
        ),
        BannerStyle::Lose => (
            [196, 24, 24, 235],
            [255, 255, 255, 255],
            [255, 228, 228, 255],
        ),
        BannerStyle::Win => (
            [22, 152, 48, 235],
            [255, 255, 255, 255],
            [226, 255, 226, 255],
        ),
    }
}

fn text_width_px(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * glyph_advance(scale)
}

#[allow(clippy::too_many_arguments)]
fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: [u8; 4],
) {
    for ch in text.chars() {
        let glyph = glyph_for(ch).unwrap_or(SPACE_GLYPH);
        draw_glyph_clipped(frame, width, height, x, y, glyph, scale, color);
        x += glyph_advance(scale);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    scale: i32,
    color: [u8; 4],
) {
    if width == 0 || height == 0 || scale <= 0 {
        return;
    }

    let height_i32 = height as i32;
    let width_i32 = width as i32;

    for (row_index, row_bits) in glyph.rows.iter().enumerate() {
        let glyph_y = y + row_index as i32 * scale;

        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }

            let glyph_x = x + col * scale;
            for sy in 0..scale {
                let pixel_y = glyph_y + sy;
                if pixel_y < 0 || pixel_y >= height_i32 {
                    continue;
                }
                for sx in 0..scale {
                    let pixel_x = glyph_x + sx;
                    if pixel_x < 0 || pixel_x >= width_i32 {
                        continue;
                    }
                    write_pixel_rgba(
                        frame,
                        width as usize,
                        pixel_x as usize,
                        pixel_y as usize,
                        color,
                    );
                }
            }
        }
    }
}

pub(crate) fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}

#[allow(clippy::too_many_arguments)]
fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + rect_width).min(width as i32);
    let end_y = (y + rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width_usize, px as usize, py as usize, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    draw_filled_rect(frame, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x,
        y + rect_height - 1,
        rect_width,
        1,
        color,
    );
    draw_filled_rect(frame, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x + rect_width - 1,
        y,
        1,
        rect_height,
        color,
    );
}

#[derive(Debug, Clone, Copy)]
struct Glyph {
    rows: [u8; GLYPH_HEIGHT as usize],
}

const SPACE_GLYPH: Glyph = Glyph {
    rows: [0, 0, 0, 0, 0],
};

/// 3x5 uppercase-only font; lowercase input is folded before lookup.
fn glyph_for(ch: char) -> Option<Glyph> {
    let ch = ch.to_ascii_uppercase();
    let rows = match ch {
        ' ' => [0, 0, 0, 0, 0],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        _ => return None,
    };
    Some(Glyph { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_overlay_data() -> OverlayData {
        OverlayData {
            metrics: LoopMetricsSnapshot::default(),
            entity_count: 15,
            extra_lines: vec!["PHASE: RUNNING".to_string()],
        }
    }

    #[test]
    fn glyphs_cover_every_character_the_game_prints() {
        let samples = [
            "POGO GAUNTLET",
            "WASTED!",
            "YOU WIN!",
            "LEFT/RIGHT: TILT AND MOVE",
            "SPACE: BOUNCE",
            "REACH THE GREEN FLAG, AVOID THE SPIKES",
            "PRESS A CONTROL KEY TO START",
            "PRESS R TO RESTART",
            "PRESS R TO PLAY AGAIN",
            "FPS: 59.9",
            "FRAME: 1.23/4.56 MS",
            "ENTITIES: 15",
        ];
        for sample in samples {
            for ch in sample.chars() {
                assert!(glyph_for(ch).is_some(), "missing glyph for '{ch}'");
            }
        }
    }

    #[test]
    fn lowercase_folds_to_uppercase_glyphs() {
        for code in b'a'..=b'z' {
            let lower = char::from(code);
            let upper = lower.to_ascii_uppercase();
            let lower_glyph = glyph_for(lower).expect("lowercase glyph");
            let upper_glyph = glyph_for(upper).expect("uppercase glyph");
            assert_eq!(lower_glyph.rows, upper_glyph.rows);
        }
    }

    #[test]
    fn unsupported_character_draws_like_space() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        draw_text_clipped(&mut frame, 16, 16, 0, 0, "\u{1f3ae}", 1, [255; 4]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn clipped_text_with_negative_origin_is_safe() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_text_clipped(&mut frame, 8, 8, -20, -20, "FPS", 3, [255; 4]);
        assert_eq!(frame.len(), 8 * 8 * 4);
    }

    #[test]
    fn clipped_text_beyond_bounds_writes_nothing() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_text_clipped(&mut frame, 8, 8, 64, 64, "TPS", 2, [255; 4]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn zero_sized_viewports_never_panic() {
        let mut empty = vec![];
        draw_overlay(&mut empty, 0, 8, &test_overlay_data());
        draw_overlay(&mut empty, 8, 0, &test_overlay_data());
        draw_banner(
            &mut empty,
            0,
            0,
            &Banner {
                title: "X",
                lines: &[],
                style: BannerStyle::Start,
            },
        );
    }

    #[test]
    fn overlay_writes_backing_panel_pixels() {
        let mut frame = vec![0u8; 320 * 180 * 4];
        draw_overlay(&mut frame, 320, 180, &test_overlay_data());

        let has_backing_pixel = frame.chunks_exact(4).any(|px| {
            px[0] == OVERLAY_PANEL_BG_COLOR[0]
                && px[1] == OVERLAY_PANEL_BG_COLOR[1]
                && px[2] == OVERLAY_PANEL_BG_COLOR[2]
                && px[3] == OVERLAY_PANEL_BG_COLOR[3]
        });
        assert!(has_backing_pixel);
    }

    #[test]
    fn banner_panel_is_centered_and_filled() {
        let banner = Banner {
            title: "WASTED!",
            lines: &["PRESS R TO RESTART"],
            style: BannerStyle::Lose,
        };
        let width = 300u32;
        let height = 200u32;
        let mut frame = vec![0u8; (width * height * 4) as usize];
        draw_banner(&mut frame, width, height, &banner);

        let (bg, _, _) = banner_colors(BannerStyle::Lose);
        let center_offset = (((height / 2) * width + width / 2) * 4) as usize;
        assert_eq!(&frame[center_offset..center_offset + 4], &bg);

        // corners stay untouched
        assert_eq!(&frame[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn banner_styles_have_distinct_backgrounds() {
        let (start_bg, _, _) = banner_colors(BannerStyle::Start);
        let (lose_bg, _, _) = banner_colors(BannerStyle::Lose);
        let (win_bg, _, _) = banner_colors(BannerStyle::Win);
        assert_ne!(start_bg, lose_bg);
        assert_ne!(lose_bg, win_bg);
        assert_ne!(start_bg, win_bg);
    }

    #[test]
    fn text_width_scales_linearly() {
        assert_eq!(text_width_px("AB", 1), 2 * glyph_advance(1));
        assert_eq!(text_width_px("AB", 3), 2 * glyph_advance(3));
        assert_eq!(glyph_advance(3), 12);
        assert_eq!(line_advance(3), 21);
    }
}
