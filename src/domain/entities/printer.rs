use serde::{Deserialize, Serialize};

/// Receipt formatting preferences, persisted as their own storage key.
/// Dimensions are millimeters for an 80mm thermal roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    pub paper_width: u32,
    pub paper_height: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub font_size: u32,
    pub show_logo: bool,
    pub show_footer: bool,
    pub custom_header: String,
    pub custom_footer: String,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            paper_width: 80,
            paper_height: 297,
            margin_top: 10,
            margin_bottom: 10,
            margin_left: 5,
            margin_right: 5,
            font_size: 12,
            show_logo: true,
            show_footer: true,
            custom_header: String::new(),
            custom_footer: String::new(),
        }
    }
}
