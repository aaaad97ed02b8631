use crate::config::{Config, load_config};
use crate::ir::Graph;
use crate::layout::{LayoutOptions, LayoutStrategy, Viewport, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::render::{render_svg, write_output_svg};
use crate::routing::route_connections;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mmlayout", version, about = "Mind-map layout and connection routing")]
pub struct Args {
    /// Graph JSON file ({ nodes, edges }) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON and SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Layout strategy (force-directed, tree-vertical, tree-horizontal, radial, grid, circular)
    #[arg(short = 's', long = "strategy", default_value = "force-directed")]
    pub strategy: LayoutStrategy,

    /// Overrides the strategy's primary spacing
    #[arg(long = "spacing")]
    pub spacing: Option<f32>,

    /// Extra room around the reported bounding box
    #[arg(long = "padding")]
    pub padding: Option<f32>,

    /// Config json5 file of layout/routing/placement/render overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Viewport height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = resolve_config(&args)?;
    let options = layout_options(&args)?;

    let input = read_input(args.input.as_deref())?;
    let graph = Graph::from_json(&input)?;
    let viewport = Viewport::new(config.render.width, config.render.height);

    let layout = compute_layout(&graph, &options, viewport, &config.layout);
    let placed = graph.with_nodes(layout.nodes.clone());
    let connections = route_connections(&placed, &config.layout, &config.routing);
    tracing::info!(
        nodes = layout.nodes.len(),
        connections = connections.len(),
        strategy = %options.strategy,
        "layout complete"
    );

    match args.output_format {
        OutputFormat::Json => {
            let dump = LayoutDump::from_layout(options.strategy, &layout, &connections, &config.layout);
            write_layout_dump(args.output.as_deref(), &dump)?;
        }
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &connections, &config.render, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&args, &layout, &connections, &config)?,
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

fn layout_options(args: &Args) -> Result<LayoutOptions> {
    let mut options = LayoutOptions::new(args.strategy);
    if let Some(spacing) = args.spacing {
        crate::config::ensure_positive("spacing", spacing)?;
        options = options.with_spacing(spacing);
    }
    if let Some(padding) = args.padding {
        crate::config::ensure_non_negative("padding", padding)?;
        options = options.with_padding(padding);
    }
    Ok(options)
}

#[cfg(feature = "png")]
fn write_png(
    args: &Args,
    layout: &crate::layout::LayoutResult,
    connections: &[crate::routing::RoutedConnection],
    config: &Config,
) -> Result<()> {
    let output = ensure_output(&args.output, "png")?;
    let svg = render_svg(layout, connections, &config.render, &config.layout);
    crate::render::write_output_png(&svg, &output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(
    _args: &Args,
    _layout: &crate::layout::LayoutResult,
    _connections: &[crate::routing::RoutedConnection],
    _config: &Config,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
