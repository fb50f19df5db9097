//! Pen definitions: the export/render grouping identity paths are
//! assigned to. Dedupe and SVG grouping are scoped per pen.

pub use csscolorparser::parse as parse_css_color;
pub use csscolorparser::Color as CssColor;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pen {
    #[serde(default)]
    pub pen_id: usize,
    #[serde(default)]
    pub name: String,
    pub stroke_width: f64,
    pub color: CssColor,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            pen_id: 0,
            name: "Default Pen".to_string(),
            stroke_width: 0.5,
            color: CssColor::from_rgba8(0, 0, 0, 255),
        }
    }
}

impl Pen {
    pub fn new(pen_id: usize, name: impl Into<String>, stroke_width: f64, css: &str) -> Pen {
        Pen {
            pen_id,
            name: name.into(),
            stroke_width,
            color: parse_css_color(css).unwrap_or_else(|_| CssColor::from_rgba8(0, 0, 0, 255)),
        }
    }
}
