use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: f32, // points
    pub align: Alignment,
}

impl Column {
    pub fn new(header: impl Into<String>, width: f32) -> Self {
        Self {
            header: header.into(),
            width,
            align: Alignment::Left,
        }
    }

    pub fn aligned(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }
}

/// One cell per column, in column order.
pub type Row = Vec<String>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderMeta {
    pub title: String,
    pub subtitle: Option<String>,
    pub date_range_label: Option<String>,
    pub report_id: Option<String>,
    pub prepared_by: Option<String>,
}

impl HeaderMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Everything a report generator hands to the rendering engine.
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub meta: HeaderMeta,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageSetup {
    pub const A4_WIDTH: f32 = 595.28;
    pub const A4_HEIGHT: f32 = 841.89;

    pub fn a4() -> Self {
        Self {
            width: Self::A4_WIDTH,
            height: Self::A4_HEIGHT,
            margins: Margins {
                top: 56.0,
                bottom: 56.0,
                left: 44.0,
                right: 44.0,
            },
        }
    }

    pub fn printable_top(&self) -> f32 {
        self.margins.top
    }

    pub fn printable_bottom(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn printable_left(&self) -> f32 {
        self.margins.left
    }

    pub fn printable_right(&self) -> f32 {
        self.width - self.margins.right
    }

    pub fn printable_width(&self) -> f32 {
        self.printable_right() - self.printable_left()
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}
