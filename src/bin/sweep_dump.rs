//! Dump the cells a view frustum overlaps in a uniform grid.
//!
//! ```text
//! cargo run --bin sweep_dump -- --eye -4,8,8 --dir 1,0,0 --far 24 -v
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::{DVec2, DVec3, IVec3, dvec3, ivec3};
use gridsweep::{ConvexVolume, GridBounds, GridSweep, SweepTrace};

#[derive(Parser)]
#[command(about = "Enumerate the grid cells a view frustum overlaps, front to back")]
struct Args {
    /// Grid cell count per axis, `nx,ny,nz`
    #[arg(long, default_value = "16,16,16", value_parser = parse_ivec3)]
    cells: IVec3,

    /// Cell edge lengths, `dx,dy,dz`
    #[arg(long, default_value = "1,1,1", value_parser = parse_dvec3)]
    cell_size: DVec3,

    /// Camera position, `x,y,z`
    #[arg(long, default_value = "-4,8,8", value_parser = parse_dvec3)]
    eye: DVec3,

    /// View direction, `x,y,z`
    #[arg(long, default_value = "1,0,0", value_parser = parse_dvec3)]
    dir: DVec3,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f64,

    /// Near plane distance
    #[arg(long, default_value_t = 0.5)]
    near: f64,

    /// Far plane distance
    #[arg(long, default_value_t = 24.0)]
    far: f64,

    /// Print per-slice cross-sections while sweeping
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dvec3(s: &str) -> Result<DVec3, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse().map_err(|e| format!("{e}: {p:?}")))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(dvec3(x, y, z)),
        _ => Err(format!("expected `x,y,z`, got {s:?}")),
    }
}

fn parse_ivec3(s: &str) -> Result<IVec3, String> {
    let v = parse_dvec3(s)?;
    Ok(v.as_ivec3())
}

/// Square frustum corners for a camera at `eye` looking along `dir`.
fn frustum_corners(eye: DVec3, dir: DVec3, fov_deg: f64, near: f64, far: f64) -> [DVec3; 8] {
    let forward = dir.normalize();
    let hint = if forward.z.abs() < 0.9 {
        DVec3::Z
    } else {
        DVec3::Y
    };
    let right = forward.cross(hint).normalize();
    let up = right.cross(forward);
    let half = (fov_deg.to_radians() / 2.0).tan();

    let quad = |dist: f64| {
        let c = eye + forward * dist;
        let r = right * half * dist;
        let u = up * half * dist;
        [c - r - u, c + r - u, c - r + u, c + r + u]
    };
    let n = quad(near);
    let f = quad(far);
    [n[0], n[1], n[2], n[3], f[0], f[1], f[2], f[3]]
}

struct PrintTrace;

impl SweepTrace for PrintTrace {
    fn slice(&mut self, slice: i32, left: &[DVec2], right: &[DVec2]) {
        println!("slice {slice}: left chain {left:.3?}, right chain {right:.3?}");
    }
    fn row(&mut self, row: i32, cols: (i32, i32)) {
        println!("  row {row}: columns {}..={}", cols.0, cols.1);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.near <= 0.0 || args.far <= args.near {
        bail!("need 0 < near < far, got near={} far={}", args.near, args.far);
    }
    if args.cells.min_element() < 1 {
        bail!("grid needs at least one cell per axis, got {}", args.cells);
    }

    let corners = frustum_corners(args.eye, args.dir, args.fov, args.near, args.far);
    let volume = ConvexVolume::frustum(corners).context("building frustum volume")?;
    let bounds = GridBounds::new(IVec3::ZERO, args.cells - ivec3(1, 1, 1));

    let mut count = 0usize;
    if args.verbose {
        let mut sweep =
            GridSweep::with_trace(&volume, args.dir, bounds, args.cell_size, PrintTrace)?;
        while !sweep.at_end() {
            println!("    {}", sweep.position());
            count += 1;
            sweep.forward();
        }
    } else {
        for cell in GridSweep::new(&volume, args.dir, bounds, args.cell_size)?.cells() {
            println!("{cell}");
            count += 1;
        }
    }
    println!("{count} cells");
    Ok(())
}
