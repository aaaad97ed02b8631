use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceConfig {
    pub iterations: usize,
    pub repulsion: f32,
    pub spring: f32,
    pub rest_length: f32,
    pub damping: f32,
    pub clearance_margin: f32,
    pub overlap_boost: f32,
    pub max_step: f32,
    pub separation_passes: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            repulsion: 50_000.0,
            spring: 0.02,
            rest_length: 220.0,
            damping: 0.85,
            clearance_margin: 40.0,
            overlap_boost: 0.5,
            max_step: 30.0,
            separation_passes: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    pub sibling_spacing: f32,
    pub level_spacing: f32,
    pub subtree_gap: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            sibling_spacing: 200.0,
            level_spacing: 150.0,
            subtree_gap: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialConfig {
    pub level_spacing: f32,
    /// Arc length reserved per node on a ring.
    pub arc_width: f32,
    pub root_ring_radius: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            level_spacing: 220.0,
            arc_width: 200.0,
            root_ring_radius: 120.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircularConfig {
    pub radius: f32,
    pub arc_width: f32,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            radius: 250.0,
            arc_width: 200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 50.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub padding: f32,
    pub force: ForceConfig,
    pub tree: TreeConfig,
    pub radial: RadialConfig,
    pub circular: CircularConfig,
    pub grid: GridConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 60.0,
            padding: 0.0,
            force: ForceConfig::default(),
            tree: TreeConfig::default(),
            radial: RadialConfig::default(),
            circular: CircularConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Control handle length as a ratio of the anchor distance.
    pub handle_ratio: f32,
    pub min_handle: f32,
    pub max_handle: f32,
    /// Share of the exit edge used to fan out siblings.
    pub fan_ratio: f32,
    /// Base perpendicular bow as a ratio of the anchor distance.
    pub bow_ratio: f32,
    /// Extra bow per sibling step away from the fan center.
    pub bow_step: f32,
    pub max_bow: f32,
    pub samples: usize,
    pub endpoint_skip: usize,
    pub obstacle_buffer: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            handle_ratio: 0.4,
            min_handle: 20.0,
            max_handle: 160.0,
            fan_ratio: 0.7,
            bow_ratio: 0.06,
            bow_step: 0.35,
            max_bow: 80.0,
            samples: 50,
            endpoint_skip: 2,
            obstacle_buffer: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementConfig {
    pub collision_threshold: f32,
    pub spider_base_radius: f32,
    pub spider_growth: f32,
    pub spider_rings: usize,
    pub fallback_offset_x: f32,
    pub fallback_offset_y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub stack_gap: f32,
    pub child_offset_y: f32,
    pub sibling_step_x: f32,
    pub row_spacing: f32,
    pub column_spacing: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            collision_threshold: 100.0,
            spider_base_radius: 150.0,
            spider_growth: 1.5,
            spider_rings: 6,
            fallback_offset_x: 250.0,
            fallback_offset_y: 250.0,
            origin_x: 0.0,
            origin_y: 0.0,
            stack_gap: 120.0,
            child_offset_y: 150.0,
            sibling_step_x: 220.0,
            row_spacing: 220.0,
            column_spacing: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub line_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            node_fill: "#F8FAFF".to_string(),
            node_stroke: "#C7D2E5".to_string(),
            line_color: "#7A8AA6".to_string(),
            text_color: "#1C2430".to_string(),
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub routing: RouterConfig,
    pub placement: PlacementConfig,
    pub render: RenderConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let positive = [
            ("layout.nodeWidth", layout.node_width),
            ("layout.nodeHeight", layout.node_height),
            ("force.restLength", layout.force.rest_length),
            ("tree.siblingSpacing", layout.tree.sibling_spacing),
            ("tree.levelSpacing", layout.tree.level_spacing),
            ("radial.levelSpacing", layout.radial.level_spacing),
            ("radial.arcWidth", layout.radial.arc_width),
            ("circular.arcWidth", layout.circular.arc_width),
            ("grid.cellSize", layout.grid.cell_size),
            ("placement.collisionThreshold", self.placement.collision_threshold),
            ("placement.rowSpacing", self.placement.row_spacing),
            ("placement.columnSpacing", self.placement.column_spacing),
        ];
        for (field, value) in positive {
            ensure_positive(field, value)?;
        }
        let non_negative = [
            ("layout.padding", layout.padding),
            ("force.clearanceMargin", layout.force.clearance_margin),
            ("tree.subtreeGap", layout.tree.subtree_gap),
            ("radial.rootRingRadius", layout.radial.root_ring_radius),
            ("circular.radius", layout.circular.radius),
            ("routing.obstacleBuffer", self.routing.obstacle_buffer),
        ];
        for (field, value) in non_negative {
            ensure_non_negative(field, value)?;
        }
        let damping = layout.force.damping;
        if !(damping > 0.0 && damping < 1.0) {
            return Err(Error::InvalidConfig {
                field: "force.damping",
                value: damping,
            });
        }
        Ok(())
    }
}

/// Rejects zero, negative and non-finite spacing values.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

/// Rejects negative and non-finite padding or margin values.
pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig { field, value })
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutSection {
    node_width: Option<f32>,
    node_height: Option<f32>,
    padding: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutSection>,
    force: Option<ForceConfig>,
    tree: Option<TreeConfig>,
    radial: Option<RadialConfig>,
    circular: Option<CircularConfig>,
    grid: Option<GridConfig>,
    routing: Option<RouterConfig>,
    placement: Option<PlacementConfig>,
    render: Option<RenderConfig>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Applies a json5 document of overrides on top of the defaults.
pub fn parse_config(contents: &str) -> Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
    }
    if let Some(force) = parsed.force {
        config.layout.force = force;
    }
    if let Some(tree) = parsed.tree {
        config.layout.tree = tree;
    }
    if let Some(radial) = parsed.radial {
        config.layout.radial = radial;
    }
    if let Some(circular) = parsed.circular {
        config.layout.circular = circular;
    }
    if let Some(grid) = parsed.grid {
        config.layout.grid = grid;
    }
    if let Some(routing) = parsed.routing {
        config.routing = routing;
    }
    if let Some(placement) = parsed.placement {
        config.placement = placement;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn parses_partial_overrides() {
        let config = parse_config(
            r#"{
                // json5 allows comments and trailing commas
                layout: { nodeWidth: 120 },
                radial: { arcWidth: 180, },
                grid: { cellSize: 25 },
            }"#,
        )
        .unwrap();
        assert_eq!(config.layout.node_width, 120.0);
        assert_eq!(config.layout.node_height, 60.0);
        assert_eq!(config.layout.radial.arc_width, 180.0);
        assert_eq!(config.layout.radial.level_spacing, 220.0);
        assert_eq!(config.layout.grid.cell_size, 25.0);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let err = parse_config("{ tree: { siblingSpacing: 0 } }").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "tree.siblingSpacing",
                ..
            }
        ));
    }

    #[test]
    fn rejects_damping_outside_unit_interval() {
        let err = parse_config("{ force: { damping: 1.5 } }").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "force.damping",
                ..
            }
        ));
    }

    #[test]
    fn missing_file_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.tree.level_spacing, 150.0);
    }
}
