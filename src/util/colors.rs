use ratatui::style::Color;

pub const PRIMARY: Color = Color::Rgb(30, 215, 96);
pub const SECONDARY: Color = Color::Rgb(235, 235, 235);
pub const NEUTRAL: Color = Color::Rgb(140, 140, 140);
pub const ERROR: Color = Color::Rgb(224, 82, 82);
