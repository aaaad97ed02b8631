use mindmap_layout::config::{Config, ensure_non_negative, ensure_positive, parse_config};
use mindmap_layout::layout_dump::LayoutDump;
use mindmap_layout::render::render_svg;
use mindmap_layout::{Graph, LayoutOptions, LayoutStrategy, Viewport, compute_layout, route_connections};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmLayoutOptions {
    strategy: Option<String>,
    spacing: Option<f32>,
    padding: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    /// json5 overrides, same shape as the CLI config file
    config: Option<String>,
}

struct Prepared {
    graph: Graph,
    options: LayoutOptions,
    viewport: Viewport,
    config: Config,
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn prepare(graph_json: &str, options_json: Option<String>) -> Result<Prepared, String> {
    let raw = match options_json {
        Some(raw) => serde_json::from_str::<WasmLayoutOptions>(&raw).map_err(|e| e.to_string())?,
        None => WasmLayoutOptions::default(),
    };
    let graph = Graph::from_json(graph_json).map_err(|e| e.to_string())?;
    let mut config = match raw.config.as_deref() {
        Some(text) => parse_config(text).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    if let Some(width) = raw.width {
        config.render.width = width;
    }
    if let Some(height) = raw.height {
        config.render.height = height;
    }
    let strategy = match raw.strategy.as_deref() {
        Some(token) => token.parse::<LayoutStrategy>().map_err(|e| e.to_string())?,
        None => LayoutStrategy::default(),
    };
    let mut options = LayoutOptions::new(strategy);
    if let Some(spacing) = raw.spacing {
        ensure_positive("spacing", spacing).map_err(|e| e.to_string())?;
        options = options.with_spacing(spacing);
    }
    if let Some(padding) = raw.padding {
        ensure_non_negative("padding", padding).map_err(|e| e.to_string())?;
        options = options.with_padding(padding);
    }
    let viewport = Viewport::new(config.render.width, config.render.height);
    Ok(Prepared {
        graph,
        options,
        viewport,
        config,
    })
}

fn layout_dump(graph_json: &str, options_json: Option<String>) -> Result<String, String> {
    let p = prepare(graph_json, options_json)?;
    let layout = compute_layout(&p.graph, &p.options, p.viewport, &p.config.layout);
    let placed = p.graph.with_nodes(layout.nodes.clone());
    let connections = route_connections(&placed, &p.config.layout, &p.config.routing);
    let dump = LayoutDump::from_layout(p.options.strategy, &layout, &connections, &p.config.layout);
    serde_json::to_string(&dump).map_err(|e| e.to_string())
}

/// Lays out the graph and routes its edges; returns the layout dump as JSON.
#[wasm_bindgen]
pub fn compute_layout_json(graph_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_dump(graph_json, options_json).map_err(js_error)
}

/// Routes the edges of an already positioned graph.
#[wasm_bindgen]
pub fn route_connections_json(graph_json: &str, config_json5: Option<String>) -> Result<String, JsValue> {
    let graph = Graph::from_json(graph_json).map_err(js_error)?;
    let config = match config_json5.as_deref() {
        Some(text) => parse_config(text).map_err(js_error)?,
        None => Config::default(),
    };
    let connections = route_connections(&graph, &config.layout, &config.routing);
    serde_json::to_string(&connections).map_err(js_error)
}

#[wasm_bindgen]
pub fn render_preview_svg(graph_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let p = prepare(graph_json, options_json).map_err(js_error)?;
    let layout = compute_layout(&p.graph, &p.options, p.viewport, &p.config.layout);
    let placed = p.graph.with_nodes(layout.nodes.clone());
    let connections = route_connections(&placed, &p.config.layout, &p.config.routing);
    Ok(render_svg(&layout, &connections, &p.config.render, &p.config.layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"{
        "nodes": [
            { "id": "root", "x": 0, "y": 0 },
            { "id": "a", "x": 0, "y": 0 },
            { "id": "b", "x": 0, "y": 0 }
        ],
        "edges": [
            { "from": "root", "to": "a" },
            { "from": "root", "to": "b", "label": "why" },
            { "from": "root", "to": "missing" }
        ]
    }"#;

    #[test]
    fn lays_out_and_routes_from_json() {
        let out = layout_dump(GRAPH, Some(r#"{"strategy":"radial","width":800,"height":600}"#.into()))
            .expect("layout should succeed");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["strategy"], "radial");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["connections"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn unknown_strategy_is_reported() {
        let err = layout_dump(GRAPH, Some(r#"{"strategy":"spiral"}"#.into())).unwrap_err();
        assert!(err.contains("spiral"));
    }

    #[test]
    fn spacing_and_padding_are_validated() {
        let err = layout_dump(GRAPH, Some(r#"{"spacing":0}"#.into())).unwrap_err();
        assert!(err.contains("spacing"), "{err}");
        let err = layout_dump(GRAPH, Some(r#"{"padding":-4}"#.into())).unwrap_err();
        assert!(err.contains("padding"), "{err}");
        assert!(layout_dump(GRAPH, Some(r#"{"spacing":80,"padding":0}"#.into())).is_ok());
    }
}
