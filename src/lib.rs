// polytess: polygon tessellation with winding rules and boundary extraction
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod arrangement;
pub mod csg;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod sink;
pub mod sweep;
pub mod tess;
pub mod vertex;

pub use error::TessError;
pub use geom::Real;
pub use sink::{PrimitiveKind, TessSink};
pub use tess::{TessOption, Tessellator, WindingRule};
pub use vertex::{Position, Vertex, VertexKind};
