//! Textures meshes with the colors of a point cloud.
//!
//! For every mesh file in a directory, triangulates the mesh if needed,
//! generates texture coordinates, bakes a texture from the nearest points
//! of the cloud, and writes the texture, a material library, and the
//! textured mesh into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, ensure};
use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use mc::prelude::*;
use mc::render::Collision;
use mc::util::pnm::save_ppm;
use mc_geom::{
    cloud::load_xyz,
    io::{load_obj, save_mtl, save_obj},
    knn::KdIndex,
    tess::triangulate,
    unwrap::unwrap,
};

#[derive(Parser, Debug)]
#[command(about = "Bake textures for meshes from a colored point cloud")]
struct Args {
    /// Directory that holds the mesh files
    mesh_dir: Option<PathBuf>,

    /// File that contains the point cloud, as `x y z r g b` lines
    point_cloud: Option<PathBuf>,

    /// Directory where the textured meshes are written
    output_dir: Option<PathBuf>,

    /// Configuration file for the tool
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dump the effective configuration to this file and exit
    #[arg(short, long)]
    output_config: Option<PathBuf>,

    /// Mesh file extension [default: obj]
    #[arg(short, long)]
    mesh_ext: Option<String>,

    /// Texture width in pixels [default: 500]
    #[arg(long)]
    width: Option<u32>,

    /// Texture height in pixels [default: 500]
    #[arg(long)]
    height: Option<u32>,

    /// Let later faces overwrite texels of earlier ones instead of failing
    #[arg(long)]
    overwrite: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    mesh_directory: Option<PathBuf>,
    point_cloud_file: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    mesh_extension: String,
    texture_width: u32,
    texture_height: u32,
    overwrite_collisions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mesh_directory: None,
            point_cloud_file: None,
            output_directory: None,
            mesh_extension: "obj".into(),
            texture_width: 500,
            texture_height: 500,
            overwrite_collisions: false,
        }
    }
}

/// Input and output locations of a validated configuration.
struct Paths {
    meshes: PathBuf,
    cloud: PathBuf,
    output: PathBuf,
}

impl Config {
    /// Reads a configuration from a JSON file. Missing keys get their
    /// default values.
    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Overrides settings with those given on the command line.
    fn merge(&mut self, args: &Args) {
        if let Some(d) = &args.mesh_dir {
            self.mesh_directory = Some(d.clone());
        }
        if let Some(f) = &args.point_cloud {
            self.point_cloud_file = Some(f.clone());
        }
        if let Some(d) = &args.output_dir {
            self.output_directory = Some(d.clone());
        }
        if let Some(ext) = &args.mesh_ext {
            self.mesh_extension = ext.clone();
        }
        if let Some(w) = args.width {
            self.texture_width = w;
        }
        if let Some(h) = args.height {
            self.texture_height = h;
        }
        self.overwrite_collisions |= args.overwrite;
    }

    fn check(&self) -> Result<Paths> {
        let meshes = self
            .mesh_directory
            .clone()
            .context("mesh directory not given")?;
        let cloud = self
            .point_cloud_file
            .clone()
            .context("point cloud file not given")?;
        let output = self
            .output_directory
            .clone()
            .context("output directory not given")?;

        ensure!(meshes.is_dir(), "not a directory: {}", meshes.display());
        ensure!(cloud.is_file(), "not a file: {}", cloud.display());
        ensure!(
            !output.exists() || output.is_dir(),
            "not a directory: {}",
            output.display()
        );
        ensure!(
            self.texture_width > 0 && self.texture_height > 0,
            "texture size must be positive, got {}×{}",
            self.texture_width,
            self.texture_height
        );
        Ok(Paths { meshes, cloud, output })
    }

    fn render_context(&self) -> Context {
        Context {
            texture_dims: (self.texture_width, self.texture_height),
            collision: if self.overwrite_collisions {
                Collision::Overwrite
            } else {
                Collision::Fail
            },
            ..Context::default()
        }
    }

    fn extension(&self) -> &str {
        self.mesh_extension.trim_start_matches('.')
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::load(path).with_context(|| {
            format!("failed to read config file {}", path.display())
        })?,
        None => Config::default(),
    };
    cfg.merge(&args);
    let paths = cfg.check();

    if let Some(path) = &args.output_config {
        let json = serde_json::to_string_pretty(&cfg)?;
        fs::write(path, json + "\n").with_context(|| {
            format!("failed to write config file {}", path.display())
        })?;
        info!("wrote configuration to {}", path.display());
        if let Err(e) = paths {
            warn!("configuration is not valid: {e}");
        }
        return Ok(());
    }

    let paths = paths.context("invalid configuration")?;
    run(&cfg, &paths)
}

fn run(cfg: &Config, paths: &Paths) -> Result<()> {
    let cloud = load_xyz(&paths.cloud).with_context(|| {
        format!("failed to read point cloud {}", paths.cloud.display())
    })?;
    let index = KdIndex::build(cloud.positions()).with_context(|| {
        format!("failed to index point cloud {}", paths.cloud.display())
    })?;
    fs::create_dir_all(&paths.output)?;

    let mut meshes = fs::read_dir(&paths.meshes)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    meshes.retain(|p| p.extension().is_some_and(|e| e == cfg.extension()));
    meshes.sort();
    if meshes.is_empty() {
        warn!(
            "no .{} files in {}",
            cfg.extension(),
            paths.meshes.display()
        );
    }

    let ctx = cfg.render_context();
    for mesh in &meshes {
        texture_mesh(mesh, &cloud, &index, &ctx, &paths.output)
            .with_context(|| format!("failed to texture {}", mesh.display()))?;
    }
    info!("textured {} meshes\n{}", meshes.len(), ctx.stats.borrow());
    Ok(())
}

fn texture_mesh(
    path: &Path,
    cloud: &PointCloud,
    index: &KdIndex,
    ctx: &Context,
    out: &Path,
) -> Result<()> {
    let stem = path
        .file_stem()
        .context("mesh file has no name")?
        .to_string_lossy();

    let mut mesh = load_obj(path)?;
    if mesh.regularity() != Some(3) {
        triangulate(&mut mesh);
    }
    unwrap(&mut mesh, ctx.texture_dims)?;
    let texture = bake(&mesh, cloud, index, ctx)?;

    let image = format!("{stem}.ppm");
    let mtl = format!("{stem}.mtl");
    save_ppm(out.join(&image), &texture)?;
    save_mtl(out.join(&mtl), &image)?;
    save_obj(out.join(format!("{stem}.obj")), &mesh, Some(&mtl))?;

    info!(
        "{}: {} faces, texture {}",
        path.display(),
        mesh.faces.len(),
        out.join(&image).display()
    );
    Ok(())
}
