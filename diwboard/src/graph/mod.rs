//! Radial layout and SVG rendering of the storyboard relationship graph.

mod layout;
pub mod svg;

pub use layout::{
    layout, wrap_text, Canvas, EdgePath, GraphLayout, NodeLayout, Point, DEFAULT_LABEL_WRAP,
    LABEL_MARGIN,
};
pub use svg::render_svg;
