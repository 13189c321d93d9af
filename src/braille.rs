//! Downsamples the pixel surface into braille glyphs. Every terminal cell
//! holds a 2-wide, 4-tall block of dots, so the canvas resolves eight
//! surface samples per character.

use dla_accretion::{PixelBuffer, Rgb, Surface};
use ratatui::style::Color;

/// Code point of the empty braille glyph; dot bits are added to it
const GLYPH_ORIGIN: u32 = 0x2800;

/// Bit for each dot, indexed `[column][row]`
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Surface pixels per braille dot, keeping the aspect ratio
fn dot_scale(surface: &PixelBuffer, canvas_width: u16, canvas_height: u16) -> f32 {
    let braille_width = (canvas_width as f32 * 2.0).max(1.0);
    let braille_height = (canvas_height as f32 * 4.0).max(1.0);
    let scale_x = surface.width() as f32 / braille_width;
    let scale_y = surface.height() as f32 / braille_height;
    scale_x.max(scale_y).max(f32::EPSILON)
}

/// Render the painted surface to Braille characters
pub fn render_to_braille(surface: &PixelBuffer, canvas_width: u16, canvas_height: u16) -> Vec<BrailleCell> {
    let scale = dot_scale(surface, canvas_width, canvas_height);
    let mut cells = Vec::new();

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut sum = [0u32; 3];
            let mut dot_count = 0u32;

            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let sx = ((base_bx + dx) as f32 * scale) as i32;
                    let sy = ((base_by + dy) as f32 * scale) as i32;

                    if let Some(Rgb { r, g, b }) = surface.pixel(sx, sy) {
                        pattern |= DOT_BITS[dx][dy];
                        sum[0] += r as u32;
                        sum[1] += g as u32;
                        sum[2] += b as u32;
                        dot_count += 1;
                    }
                }
            }

            if pattern != 0 {
                let braille_char = char::from_u32(GLYPH_ORIGIN + pattern as u32).unwrap_or(' ');
                let color = Color::Rgb(
                    (sum[0] / dot_count) as u8,
                    (sum[1] / dot_count) as u8,
                    (sum[2] / dot_count) as u8,
                );
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color,
                });
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_block_and_corner_dots() {
        let gold = Rgb::new(0xF5, 0xC8, 0x42);
        let mut surface = PixelBuffer::new(8, 8);
        // Fill the character at (0, 0)
        for x in 0..2 {
            for y in 0..4 {
                surface.set_pixel(x, y, gold);
            }
        }
        // Top-left dot of (2, 0) and bottom-right dot of (3, 1)
        surface.set_pixel(4, 0, gold);
        surface.set_pixel(7, 7, gold);

        let cells = render_to_braille(&surface, 4, 2);
        let glyph_at = |x: u16, y: u16| cells.iter().find(|c| (c.x, c.y) == (x, y)).map(|c| c.char);

        assert_eq!(cells.len(), 3);
        assert_eq!(glyph_at(0, 0), Some('\u{28FF}'));
        assert_eq!(glyph_at(2, 0), Some('\u{2801}'));
        assert_eq!(glyph_at(3, 1), Some('\u{2880}'));
    }

    #[test]
    fn test_dot_colors_are_averaged() {
        let mut surface = PixelBuffer::new(8, 8);
        surface.set_pixel(0, 0, Rgb::new(0, 100, 200));
        surface.set_pixel(1, 3, Rgb::new(100, 200, 0));

        let cells = render_to_braille(&surface, 4, 2);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, '\u{2881}');
        assert_eq!(cells[0].color, Color::Rgb(50, 150, 100));
    }

    #[test]
    fn test_single_pixel_at_unit_scale() {
        let gold = Rgb::new(0xF5, 0xC8, 0x42);
        let mut surface = PixelBuffer::new(8, 8);
        surface.set_pixel(3, 5, gold);

        // 4x2 canvas = 8x8 dots, one surface pixel per dot
        let cells = render_to_braille(&surface, 4, 2);
        assert_eq!(cells.len(), 1);

        let cell = cells[0];
        assert_eq!((cell.x, cell.y), (1, 1));
        // x=3 is the right column, y=5 is row 1 of the second character row
        assert_eq!(cell.char, char::from_u32(GLYPH_ORIGIN + 0x10).unwrap());
        assert_eq!(cell.color, Color::Rgb(0xF5, 0xC8, 0x42));
    }

    #[test]
    fn test_empty_surface_renders_nothing() {
        let surface = PixelBuffer::new(320, 250);
        assert!(render_to_braille(&surface, 40, 20).is_empty());
        assert!(render_to_braille(&PixelBuffer::new(0, 0), 0, 0).is_empty());
    }
}
