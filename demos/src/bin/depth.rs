//! Renders the depth and height maps of a mesh as grayscale images.

use std::path::PathBuf;

use anyhow::{Context as _, Result, ensure};
use clap::{Parser, Subcommand};
use log::info;

use mc::prelude::*;
use mc::util::pnm::save_pgm;
use mc_geom::{io::load_obj, tess::triangulate};

#[derive(Parser, Debug)]
#[command(about = "Render depth and height maps of a mesh")]
struct Args {
    /// OBJ file of the mesh
    mesh: PathBuf,

    /// Prefix of the output files `<PREFIX>-depth.pgm` and `<PREFIX>-height.pgm`
    #[arg(short, long, default_value = "out")]
    output: String,

    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    #[command(subcommand)]
    camera: Cam,
}

#[derive(Subcommand, Debug)]
enum Cam {
    /// Perspective camera at EYE looking at TARGET
    Perspective {
        #[arg(long, value_parser = parse_triple, default_value = "0,0,10")]
        eye: [f64; 3],
        #[arg(long, value_parser = parse_triple, default_value = "0,0,0")]
        target: [f64; 3],
        /// World direction that appears up in the image
        #[arg(long, value_parser = parse_triple, default_value = "0,1,0")]
        up: [f64; 3],
        /// Focal length in pixels
        #[arg(long, default_value_t = 500.0)]
        focal: f64,
    },
    /// Top-down orthographic camera fitted to the extent of the mesh
    Ortho,
}

fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let vals = s
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    vals.try_into()
        .map_err(|v: Vec<_>| format!("expected 3 values, got {}", v.len()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();
    let args = Args::parse();
    let dims = (args.width, args.height);
    ensure!(dims.0 > 0 && dims.1 > 0, "image size must be positive");

    let mut mesh = load_obj(&args.mesh)
        .with_context(|| format!("failed to read {}", args.mesh.display()))?;
    if mesh.regularity() != Some(3) {
        triangulate(&mut mesh);
    }

    let cam: Box<dyn Camera> = match args.camera {
        Cam::Perspective { eye, target, up, focal } => {
            let [ex, ey, ez] = eye;
            let [tx, ty, tz] = target;
            let [ux, uy, uz] = up;
            Box::new(Perspective::look_at(
                dims,
                focal,
                pt3(ex, ey, ez),
                pt3(tx, ty, tz),
                vec3(ux, uy, uz),
            ))
        }
        Cam::Ortho => Box::new(fit_ortho(&mesh, dims)?),
    };

    let ctx = Context::default();
    let depth = render_depth_map(&mesh, cam.as_ref(), &ctx)?;
    let height = render_height_map(&mesh, cam.as_ref(), &ctx)?;

    for (what, buf) in [("depth", &depth), ("height", &height)] {
        let path = format!("{}-{what}.pgm", args.output);
        save_pgm(&path, buf).with_context(|| format!("failed to write {path}"))?;
        info!("wrote {what} map {path}");
    }
    info!("\n{}", ctx.stats.borrow());
    Ok(())
}

/// Returns a top-down camera whose image covers the xy extent of `mesh`.
fn fit_ortho(mesh: &Mesh, dims: Dims) -> Result<Orthographic> {
    ensure!(!mesh.verts.is_empty(), "the mesh has no vertices");
    let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
    for v in &mesh.verts {
        lo = [lo[0].min(v.x()), lo[1].min(v.y())];
        hi = [hi[0].max(v.x()), hi[1].max(v.y())];
    }
    let (w, h) = (hi[0] - lo[0], hi[1] - lo[1]);
    let aspect = dims.0 as f64 / dims.1 as f64;
    let width = w.max(h * aspect);
    ensure!(width > 0.0, "the mesh has no extent in x or y");
    Ok(Orthographic::covering(dims, pt2(lo[0], hi[1]), width))
}
