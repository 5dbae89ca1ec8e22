//! STL file I/O for triangle soups.
//!
//! Both encodings read through `stl_io`, which detects ASCII vs binary from
//! the file contents. Facet normals are kept as stored so winding can be
//! audited against them. Positions are single precision on disk.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::error::{MeshError, MeshResult};
use crate::mesh::IndexedMesh;
use crate::types::{Facet, TriangleSoup};

/// STL flavour to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlEncoding {
    #[default]
    Binary,
    Ascii,
}

/// Load every facet of an ASCII or binary STL file.
///
/// Files with an extension other than `.stl` are rejected. A file that parses
/// but holds no facets is an [`MeshError::EmptyMesh`].
pub fn load_stl(path: impl AsRef<Path>) -> MeshResult<TriangleSoup> {
    let path = path.as_ref();
    check_extension(path)?;

    info!("Loading mesh from {:?}", path);

    let file = File::open(path).map_err(|e| MeshError::read(path, e))?;
    let mut reader = BufReader::new(file);

    let parse_error = |e: std::io::Error| MeshError::ParseError {
        path: path.to_path_buf(),
        details: e.to_string(),
    };

    let triangles = stl_io::create_stl_reader(&mut reader).map_err(parse_error)?;

    let mut soup = TriangleSoup::new();
    for triangle in triangles {
        let triangle = triangle.map_err(parse_error)?;
        let [a, b, c] = triangle.vertices;
        soup.push(Facet::new(
            to_point(&a),
            to_point(&b),
            to_point(&c),
            Vector3::new(
                triangle.normal.0[0] as f64,
                triangle.normal.0[1] as f64,
                triangle.normal.0[2] as f64,
            ),
        ));
    }

    if soup.is_empty() {
        return Err(MeshError::EmptyMesh {
            details: format!("{} contains no facets", path.display()),
        });
    }

    info!("Loaded {} facets", soup.len());
    Ok(soup)
}

/// Write `soup` as binary STL.
pub fn save_stl(soup: &TriangleSoup, path: impl AsRef<Path>) -> MeshResult<()> {
    let path = path.as_ref();
    info!("Saving mesh to {:?}", path);

    let file = File::create(path).map_err(|e| MeshError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = soup
        .iter()
        .map(|f| stl_io::Triangle {
            normal: stl_io::Normal::new([f.normal.x as f32, f.normal.y as f32, f.normal.z as f32]),
            vertices: [to_stl_vertex(&f.v0), to_stl_vertex(&f.v1), to_stl_vertex(&f.v2)],
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::write(path, e))?;
    writer.flush().map_err(|e| MeshError::write(path, e))?;

    info!("Saved {} triangles to {:?}", soup.len(), path);
    Ok(())
}

/// Write `soup` as ASCII STL under the solid name `name`.
///
/// An empty or blank name becomes `triangles`.
pub fn save_stl_ascii(soup: &TriangleSoup, path: impl AsRef<Path>, name: &str) -> MeshResult<()> {
    let path = path.as_ref();
    info!("Saving mesh to {:?} (ASCII)", path);

    let name = match name.trim() {
        "" => "triangles",
        trimmed => trimmed,
    };

    let file = File::create(path).map_err(|e| MeshError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_ascii(&mut writer, soup, name).map_err(|e| MeshError::write(path, e))?;

    info!("Saved {} triangles to {:?}", soup.len(), path);
    Ok(())
}

fn write_ascii<W: Write>(w: &mut W, soup: &TriangleSoup, name: &str) -> std::io::Result<()> {
    writeln!(w, "solid {name}")?;
    for f in soup {
        writeln!(
            w,
            "  facet normal {} {} {}",
            f.normal.x as f32, f.normal.y as f32, f.normal.z as f32
        )?;
        writeln!(w, "    outer loop")?;
        for v in f.positions() {
            writeln!(w, "      vertex {} {} {}", v.x as f32, v.y as f32, v.z as f32)?;
        }
        writeln!(w, "    endloop")?;
        writeln!(w, "  endfacet")?;
    }
    writeln!(w, "endsolid {name}")?;
    w.flush()
}

/// Write `soup` in the given encoding. ASCII files are named after the file
/// stem.
pub fn save_soup(soup: &TriangleSoup, path: impl AsRef<Path>, encoding: StlEncoding) -> MeshResult<()> {
    let path = path.as_ref();
    match encoding {
        StlEncoding::Binary => save_stl(soup, path),
        StlEncoding::Ascii => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            save_stl_ascii(soup, path, name)
        }
    }
}

/// Load an STL file, index it and return its enclosed volume.
pub fn volume_from_file(path: impl AsRef<Path>) -> MeshResult<f64> {
    let soup = load_stl(path)?;
    let volume = IndexedMesh::build(&soup).volume();
    debug!("Volume {:.10}", volume);
    Ok(volume)
}

fn check_extension(path: &Path) -> MeshResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        None => {
            warn!("{:?} has no extension, reading as STL", path);
            Ok(())
        }
        Some(ext) if ext.eq_ignore_ascii_case("stl") => Ok(()),
        Some(ext) => Err(MeshError::UnsupportedFormat {
            extension: Some(ext.to_string()),
        }),
    }
}

#[inline]
fn to_point(v: &stl_io::Vertex) -> Point3<f64> {
    Point3::new(v.0[0] as f64, v.0[1] as f64, v.0[2] as f64)
}

#[inline]
fn to_stl_vertex(p: &Point3<f64>) -> stl_io::Vertex {
    stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
}
