mod svg_renderer;

pub use svg_renderer::SvgRenderer;
