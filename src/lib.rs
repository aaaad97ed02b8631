#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod placement;
pub mod render;
pub mod routing;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, PlacementConfig, RouterConfig};
pub use error::{Error, Result};
pub use geometry::{BoundingBox, Point, Rect};
pub use ir::{Edge, Graph, Node};
pub use layout::{LayoutOptions, LayoutResult, LayoutStrategy, Viewport, compute_layout};
pub use routing::{ConnectionPath, RouteContext, RoutedConnection, route_connection, route_connections};
