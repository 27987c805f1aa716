//! Cursor-based PDF page layout: cells, wrapped text, borders, fills,
//! images, automatic page breaks with page-start/page-end hooks, and a
//! total-page alias resolved when the document is finished.

pub mod canvas;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod writer;
mod wrap;

pub use canvas::{
    Align, Border, Canvas, CellStyle, CursorMove, PageHook, PageSize, PT_PER_MM,
    TOTAL_PAGES_ALIAS,
};
pub use fonts::FontStyle;
pub use graphics::Color;
pub use images::{ImageError, ImageId};
