//! Fluid cavity extraction for closed triangle meshes.
//!
//! Given the boundary surface of a solid part, this crate finds the facets
//! that face into internal cavities, closes any openings with cap facets and
//! returns a clean, watertight surface of the cavity itself:
//!
//! - **Loading/Saving**: ASCII and binary STL, keeping stored facet normals
//! - **Classification**: even-hit ray test per facet
//! - **Capping**: boundary loop tracing and fan triangulation
//! - **Cleaning**: exact vertex welding, duplicate and degenerate removal
//! - **Auditing**: watertightness, winding against stored normals, volume
//!
//! # Example
//!
//! ```no_run
//! use mesh_cavity::{audit, extract_fluid, load_stl, save_stl, ClassifyParams, IndexedMesh};
//!
//! // Load and index the solid
//! let soup = load_stl("part.stl").unwrap();
//! let solid = IndexedMesh::build(&soup);
//!
//! // Extract the cavity surface
//! let fluid = extract_fluid(&solid, &ClassifyParams::default()).unwrap();
//! println!("{}", fluid.clean);
//!
//! // Audit and save it
//! println!("{}", audit(&fluid.mesh()));
//! save_stl(&fluid.soup, "fluid_volume.stl").unwrap();
//! ```

mod error;
mod types;

pub mod adjacency;
pub mod caps;
pub mod classify;
pub mod clean;
pub mod intersect;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod validate;
pub mod weld;
pub mod winding;

// Re-export core types at crate root
pub use error::{MeshError, MeshResult};
pub use mesh::IndexedMesh;
pub use types::{Facet, Triangle, TriangleSoup, DEGENERATE_EPSILON};

// Re-export commonly used functions
pub use adjacency::{EdgeKey, MeshAdjacency};
pub use caps::{add_caps, CappedSoup};
pub use classify::{classify_interior, ClassifyParams};
pub use clean::{clean_mesh, clean_soup, CleanReport};
pub use intersect::{ray_triangle_intersect, RAY_EPSILON};
pub use io::{load_stl, save_soup, save_stl, save_stl_ascii, volume_from_file, StlEncoding};
pub use pipeline::{extract_fluid, FluidExtraction};
pub use validate::{audit, check_watertight, QualityReport, WatertightReport};
pub use weld::{VertexKey, VertexWelder};
pub use winding::{check_winding, OppositeWinding, WindingReport, DEFAULT_WINDING_TOLERANCE};
