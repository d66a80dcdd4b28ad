//! Pure game model: no I/O, no terminal, no clocks.

pub mod camera;
pub mod geom;
pub mod physics;
pub mod tile;
