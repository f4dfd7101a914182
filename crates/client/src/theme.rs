use ratatui::style::Color;

use botshell_core::severity::Rgb;

pub const STATUS_WAKEUP_COLOR: Rgb = Rgb(0x2F, 0x4F, 0x4F); // dark slate gray
pub const STATUS_RUNNING_COLOR: Rgb = Rgb(0x2E, 0x8B, 0x57); // sea green
pub const STATUS_ERROR_COLOR: Rgb = Rgb(0xDC, 0x14, 0x3C); // crimson
pub const STATUS_DEFAULT_COLOR: Rgb = Rgb(0x2E, 0xCC, 0x71);
pub const BUTTON_BG_COLOR: Rgb = Rgb(0xFF, 0x63, 0x47); // tomato

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}
