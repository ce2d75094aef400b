pub mod details;
pub mod overview;
pub mod panels;
pub mod plot;

use eframe::egui::Color32;

/// Header band colour.
pub const BRAND_PURPLE: Color32 = Color32::from_rgb(0x8E, 0x44, 0xAD);
/// Tab bar colour.
pub const BRAND_TEAL: Color32 = Color32::from_rgb(0x05, 0x7B, 0x8D);
/// Selected tab colour.
pub const BRAND_TEAL_DARK: Color32 = Color32::from_rgb(0x04, 0x5A, 0x64);
