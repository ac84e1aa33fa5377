use crate::config::load_config;
use crate::layout_dump::write_layout_dump;
use crate::render::write_output_svg;
use crate::store::FileSource;
use crate::viewer::Viewer;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pwviz", version, about = "Layered pathway-module diagrams with path highlighting")]
pub struct Args {
    /// Module key to draw (exactly 6 characters)
    #[arg(short = 'm', long = "module")]
    pub module: String,

    /// Nodes document: module key -> node list
    #[arg(long = "nodes")]
    pub nodes: PathBuf,

    /// Adjacency document: module key -> { links }
    #[arg(long = "adjacency")]
    pub adjacency: PathBuf,

    /// CSV with `KO` and `E-value` columns used to recolor nodes
    #[arg(short = 'a', long = "annotations")]
    pub annotations: Option<PathBuf>,

    /// Node ids to select. The first acts as a plain click, the rest as
    /// modifier clicks.
    #[arg(short = 's', long = "select")]
    pub select: Vec<String>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (layout, path sentinels, themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width of the viewport the canvas should fit
    #[arg(short = 'w', long = "viewport-width", default_value_t = 1770.0)]
    pub viewport_width: f32,

    /// Write node positions and highlight state as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let config = load_config(args.config.as_deref())?;
    let mut viewer = Viewer::new(config, args.viewport_width);

    if let Some(path) = args.annotations.as_deref() {
        viewer
            .load_annotations(path)
            .with_context(|| format!("annotations not applied from {}", path.display()))?;
    }

    let source = FileSource::new(&args.nodes, &args.adjacency);
    viewer.search(&source, &args.module)?;

    for (idx, node_id) in args.select.iter().enumerate() {
        let known = viewer
            .module()
            .map(|module| module.node(node_id).is_some())
            .unwrap_or(false);
        if !known {
            warn!("selected node {node_id} is not part of module {}", args.module.trim());
        }
        viewer.click(node_id, idx > 0);
    }
    if !args.select.is_empty() {
        info!(
            "{} paths highlighted through {} selected nodes",
            viewer.path_count(),
            viewer.selection().len()
        );
    }

    let scene = viewer
        .scene()
        .ok_or_else(|| anyhow::anyhow!("No module loaded"))?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &scene)?;
    }

    let svg = crate::render::render_svg(&scene, &viewer.config().theme);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(args.output.as_deref(), "png")?;
            write_png(&svg, output, &viewer)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, viewer: &Viewer) -> Result<()> {
    let mut render = viewer.config().render.clone();
    if let Some(layout) = viewer.layout() {
        (render.width, render.height) = crate::render::document_size(layout);
    }
    crate::render::write_output_png(svg, output, &render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _viewer: &Viewer) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_selection() {
        let args = Args::try_parse_from([
            "pwviz",
            "-m",
            "M00001",
            "--nodes",
            "n.json",
            "--adjacency",
            "a.json",
            "-s",
            "K00844_1",
            "-s",
            "K00845_2",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.select, vec!["K00844_1", "K00845_2"]);
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.output_format, OutputFormat::Svg));
    }

    #[test]
    fn png_needs_output_path() {
        assert!(ensure_output(None, "png").is_err());
        assert!(ensure_output(Some(Path::new("out.png")), "png").is_ok());
    }
}
