//! Front-to-back enumeration of the grid cells a convex volume overlaps.
//!
//! Given a convex polyhedron — typically a view frustum — and a uniform
//! 3D grid, [`GridSweep`] visits exactly the cells whose boxes the
//! volume overlaps, ordered front to back along a sweep direction. The
//! traversal is incremental: construction costs a slice setup, each
//! [`GridSweep::forward`] is a constant-time step within the current row
//! plus occasional row and slice transitions.
//!
//! ```
//! use glam::{dvec3, ivec3};
//! use gridsweep::{ConvexVolume, GridBounds, GridSweep};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let volume = ConvexVolume::cuboid(dvec3(0.0, 0.0, 0.0), dvec3(2.0, 2.0, 2.0))?;
//! let bounds = GridBounds::new(ivec3(0, 0, 0), ivec3(3, 3, 3));
//! let sweep = GridSweep::new(&volume, dvec3(1.0, 0.5, 0.25), bounds, dvec3(1.0, 1.0, 1.0))?;
//! assert_eq!(sweep.cells().count(), 8);
//! # Ok(())
//! # }
//! ```

pub mod geom;
pub mod sweep;
pub mod volume;

pub use geom::grid::GridBounds;
pub use sweep::{GridSweep, NoTrace, SweepError, SweepTrace};
pub use volume::{ConvexVolume, Edge, VolumeError};
