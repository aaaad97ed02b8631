use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::LayoutResult;
use crate::routing::RoutedConnection;
use anyhow::Result;
use std::path::Path;

/// Preview of node boxes, routed curves and labels.
///
/// The canvas covers the configured viewport and grows to fit nodes that fall outside it.
pub fn render_svg(
    layout: &LayoutResult,
    connections: &[RoutedConnection],
    render: &RenderConfig,
    config: &LayoutConfig,
) -> String {
    let mut svg = String::new();
    let bounds = &layout.bounds;
    let width = render.width.max(bounds.max_x).max(200.0);
    let height = render.height.max(bounds.max_y).max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render.background
    ));

    for conn in connections {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.6\" stroke-linecap=\"round\"/>",
            conn.path.to_svg_path(),
            render.line_color
        ));
        if let Some(label) = conn.label.as_deref().filter(|l| !l.is_empty()) {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                conn.path.label.x,
                conn.path.label.y,
                render.font_family,
                render.font_size * 0.85,
                render.text_color,
                escape_xml(label)
            ));
        }
    }

    for node in &layout.nodes {
        let rect = node.rect(config.node_width, config.node_height);
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            render.node_fill,
            render.node_stroke
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            node.x,
            node.y,
            render.font_family,
            render.font_size,
            render.text_color,
            escape_xml(&node.id)
        ));
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
