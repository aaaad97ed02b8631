use crate::config::LayoutConfig;
use crate::geometry::BoundingBox;
use crate::layout::{LayoutResult, LayoutStrategy};
use crate::routing::{RoutedConnection, Side};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub strategy: LayoutStrategy,
    pub bounds: BoundingBox,
    pub nodes: Vec<NodeDump>,
    pub connections: Vec<ConnectionDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct ConnectionDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub start_side: Side,
    pub end_side: Side,
    /// start, control 1, control 2, end
    pub points: [[f32; 2]; 4],
    pub label_anchor: [f32; 2],
    pub label: Option<String>,
    pub path: String,
}

impl LayoutDump {
    pub fn from_layout(
        strategy: LayoutStrategy,
        layout: &LayoutResult,
        connections: &[RoutedConnection],
        config: &LayoutConfig,
    ) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| {
                let (width, height) = node.size(config.node_width, config.node_height);
                NodeDump {
                    id: node.id.clone(),
                    x: node.x,
                    y: node.y,
                    width,
                    height,
                }
            })
            .collect();

        let connections = connections
            .iter()
            .map(|conn| {
                let curve = &conn.path.curve;
                ConnectionDump {
                    id: conn.edge_id.clone(),
                    from: conn.from.clone(),
                    to: conn.to.clone(),
                    start_side: conn.path.start_side,
                    end_side: conn.path.end_side,
                    points: [curve.start, curve.control1, curve.control2, curve.end]
                        .map(|p| [p.x, p.y]),
                    label_anchor: [conn.path.label.x, conn.path.label.y],
                    label: conn.label.clone(),
                    path: conn.path.to_svg_path(),
                }
            })
            .collect();

        LayoutDump {
            strategy,
            bounds: layout.bounds,
            nodes,
            connections,
        }
    }
}

/// Pretty JSON to `path`, or stdout when no path is given.
pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> crate::error::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, dump)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}
