use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use point_cloud_viewer::{self as pcv, glam::*};

/// The command line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "\
    Pick points of a point cloud without a window.\n\
    \n\
    The cloud is framed as the viewer would, then each click is replayed \
    and the picked point is highlighted.\
    "
)]
struct Args {
    /// Path to the .ply file.
    #[arg(short, long)]
    model: String,

    /// The viewport size, as WIDTHxHEIGHT.
    #[arg(short, long, default_value = "1280x720", value_parser = parse_viewport)]
    viewport: UVec2,

    /// A click in pixel coordinates, as X,Y. Defaults to the viewport center.
    #[arg(short, long, value_parser = parse_click)]
    click: Vec<Vec2>,

    /// The pick threshold in world units.
    #[arg(short, long, default_value_t = pcv::DEFAULT_PICK_THRESHOLD)]
    threshold: f32,

    /// Path to write the highlighted .ply file to.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_viewport(s: &str) -> Result<UVec2, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s}"))?;
    Ok(uvec2(
        w.trim().parse().map_err(|e| format!("{e}"))?,
        h.trim().parse().map_err(|e| format!("{e}"))?,
    ))
}

fn parse_click(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s}"))?;
    Ok(vec2(
        x.trim().parse().map_err(|e| format!("{e}"))?,
        y.trim().parse().map_err(|e| format!("{e}"))?,
    ))
}

/// A renderer only reporting what would be uploaded.
#[derive(Debug, Default)]
struct LogRenderer {
    frames: u32,
}

impl pcv::Renderer for LogRenderer {
    fn render(&mut self, scene: &pcv::Scene, camera: &pcv::Camera) -> Result<(), pcv::Error> {
        self.frames += 1;

        let uploads = scene
            .groups()
            .iter()
            .filter(|g| !g.updates().is_empty())
            .map(|g| format!("{} {:?}", g.name, g.updates()))
            .collect::<Vec<_>>();

        log::info!(
            "Frame {} from {} towards {}, uploads: [{}]",
            self.frames,
            camera.pos,
            camera.target,
            uploads.join(", ")
        );

        Ok(())
    }

    fn resize(&mut self, size: UVec2) {
        log::info!("Render target resized to {size}");
    }
}

fn main() -> Result<(), pcv::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = pcv::ViewerConfig {
        pick_threshold: args.threshold,
        ..Default::default()
    };

    log::debug!("Creating viewer");
    let mut viewer = pcv::Viewer::new_with(
        pcv::PlyFileLoader::new(""),
        LogRenderer::default(),
        args.viewport,
        config,
    );

    pollster::block_on(viewer.load(args.model.as_str()))?;
    viewer.frame()?;

    let clicks = match args.click.is_empty() {
        true => vec![args.viewport.as_vec2() / 2.0],
        false => args.click,
    };

    for pointer in clicks {
        match viewer.click(pointer)? {
            Some(pick) => println!(
                "{} {pointer} -> point {} of group {} at {} (distance {:.3}, off ray {:.4})",
                "hit".green().bold(),
                pick.index,
                pick.group,
                pick.point,
                pick.distance,
                pick.distance_to_ray,
            ),
            None => println!("{} {pointer}", "miss".yellow()),
        }

        viewer.frame()?;
    }

    if let (Some(path), Some(asset)) = (args.output, viewer.asset()) {
        log::info!("Writing {}", path.display());
        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        asset.write_ply(&mut writer)?;
    }

    Ok(())
}
