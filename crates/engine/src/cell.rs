use serde::{Deserialize, Serialize};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Visual attributes of a cell.
///
/// Field names serialize in the camelCase wire form so a persisted sheet
/// blob round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub font_size: f32,
    pub color: String,
    pub background_color: String,
    pub text_align: TextAlign,
    pub font_family: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            font_size: 14.0,
            color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            text_align: TextAlign::Left,
            font_family: "Arial, sans-serif".to_string(),
        }
    }
}

/// A partial style: only the set fields are applied on merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub font_size: Option<f32>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub font_family: Option<String>,
}

impl StylePatch {
    /// Merge the set fields over an existing style.
    pub fn apply(&self, style: &mut CellStyle) {
        if let Some(bold) = self.bold {
            style.bold = bold;
        }
        if let Some(italic) = self.italic {
            style.italic = italic;
        }
        if let Some(underline) = self.underline {
            style.underline = underline;
        }
        if let Some(strikethrough) = self.strikethrough {
            style.strikethrough = strikethrough;
        }
        if let Some(font_size) = self.font_size {
            style.font_size = font_size;
        }
        if let Some(color) = &self.color {
            style.color = color.clone();
        }
        if let Some(background_color) = &self.background_color {
            style.background_color = background_color.clone();
        }
        if let Some(text_align) = self.text_align {
            style.text_align = text_align;
        }
        if let Some(font_family) = &self.font_family {
            style.font_family = font_family.clone();
        }
    }
}

/// One cell of the sheet.
///
/// `value` is the display string: the literal text as entered, or, for a
/// formula cell, the result computed when the formula was written. `formula`
/// is empty for literal cells and starts with `=` otherwise. Evaluation is
/// eager at write time; the stored value is not recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cell {
    pub value: String,
    pub formula: String,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            value: String::new(),
            formula: String::new(),
            style: CellStyle::default(),
        }
    }
}

impl Cell {
    /// A literal cell holding the given text, default style.
    pub fn literal(value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Self::default()
        }
    }

    pub fn is_formula(&self) -> bool {
        !self.formula.is_empty()
    }
}
