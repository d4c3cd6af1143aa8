//! Mesh file I/O for JIGSAW `.msh` and JSON.
//!
//! The `.msh` reader understands the ASCII subset used for planar meshes:
//!
//! ```text
//! # comment
//! MSHID=3;EUCLIDEAN-MESH
//! NDIMS=2
//! POINT=3
//! 0;0;0
//! 1;0;0
//! 0;1;0
//! TRIA3=1
//! 0;1;2;0
//! VALUE=3;1
//! 0.5
//! 0.7
//! 0.9
//! ```
//!
//! Indices are 0-based. A point tag of 0 means "untagged". Sections other
//! than the ones above are skipped with a warning.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{MeshError, MeshResult};
use crate::{Mesh, Triangle, Vertex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Msh,
    Json,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "msh" => Some(MeshFormat::Msh),
                "json" => Some(MeshFormat::Json),
                _ => None,
            })
    }
}

fn unsupported(path: &Path) -> MeshError {
    MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    }
}

/// Load a mesh from file, auto-detecting format from extension.
pub fn load_mesh(path: &Path) -> MeshResult<Mesh> {
    let format = MeshFormat::from_path(path).ok_or_else(|| unsupported(path))?;

    info!("Loading mesh from {:?} (format: {:?})", path, format);

    let mesh = match format {
        MeshFormat::Msh => load_msh(path)?,
        MeshFormat::Json => load_json(path)?,
    };

    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh {
            details: "mesh has no vertices or triangles".to_string(),
        });
    }
    mesh.check_topology()?;

    info!(
        "Loaded mesh: {} vertices, {} triangles{}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        if mesh.has_values() { ", with values" } else { "" }
    );
    if let Some((min, max)) = mesh.bounds() {
        debug!(
            "Bounding box: [{:.3}, {:.3}] to [{:.3}, {:.3}]",
            min.x, min.y, max.x, max.y
        );
    }

    Ok(mesh)
}

/// Save mesh to file, auto-detecting format from extension.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let format = MeshFormat::from_path(path).ok_or_else(|| unsupported(path))?;

    match format {
        MeshFormat::Msh => save_msh(mesh, path),
        MeshFormat::Json => save_json(mesh, path),
    }
}

fn load_json(path: &Path) -> MeshResult<Mesh> {
    let file = File::open(path).map_err(|e| MeshError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| MeshError::ParseError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

/// Save mesh as pretty-printed JSON.
pub fn save_json(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    info!("Saving mesh to {:?} (JSON)", path);

    let file = File::create(path).map_err(|e| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, mesh).map_err(|e| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    writer.flush().map_err(|e| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn load_msh(path: &Path) -> MeshResult<Mesh> {
    let text = std::fs::read_to_string(path).map_err(|e| MeshError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_msh(&text).map_err(|details| MeshError::ParseError {
        path: path.to_path_buf(),
        details,
    })
}

/// Line cursor over the significant lines of a `.msh` file.
struct MshLines<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> MshLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }

    /// Next non-blank, non-comment line with its 1-based number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines.by_ref().find_map(|(n, line)| {
            let line = line.trim();
            (!line.is_empty() && !line.starts_with('#')).then_some((n + 1, line))
        })
    }

    /// Next line split on `;`, or an error naming the section.
    fn record(&mut self, section: &str) -> Result<(usize, Vec<&'a str>), String> {
        let (n, line) = self
            .next_line()
            .ok_or_else(|| format!("unexpected end of file in {} section", section))?;
        Ok((n, line.split(';').map(str::trim).collect()))
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&&str>, line: usize) -> Result<T, String> {
    let field = field.ok_or_else(|| format!("line {}: missing field", line))?;
    field
        .parse()
        .map_err(|_| format!("line {}: invalid number '{}'", line, field))
}

/// Parse the ASCII `.msh` format.
fn parse_msh(text: &str) -> Result<Mesh, String> {
    let mut mesh = Mesh::new();
    let mut lines = MshLines::new(text);

    while let Some((n, line)) = lines.next_line() {
        let (key, rest) = line
            .split_once('=')
            .ok_or_else(|| format!("line {}: expected KEY=VALUE, got '{}'", n, line))?;
        let args: Vec<&str> = rest.split(';').map(str::trim).collect();

        match key.trim().to_uppercase().as_str() {
            "MSHID" => {
                if let Some(kind) = args.get(1) {
                    mesh.kind = kind.parse()?;
                }
            }
            "NDIMS" => {
                let ndims: usize = parse_field(args.first(), n)?;
                if ndims != 2 {
                    return Err(format!("line {}: only 2D meshes are supported, got NDIMS={}", n, ndims));
                }
            }
            "POINT" => {
                let count: usize = parse_field(args.first(), n)?;
                mesh.vertices.reserve(count);
                for _ in 0..count {
                    let (n, fields) = lines.record("POINT")?;
                    let x: f64 = parse_field(fields.first(), n)?;
                    let y: f64 = parse_field(fields.get(1), n)?;
                    let tag = match fields.get(2) {
                        Some(_) => parse_field::<i32>(fields.get(2), n)?,
                        None => 0,
                    };
                    let mut vertex = Vertex::from_coords(x, y);
                    vertex.tag = (tag != 0).then_some(tag);
                    mesh.vertices.push(vertex);
                }
            }
            "TRIA3" => {
                let count: usize = parse_field(args.first(), n)?;
                mesh.triangles.reserve(count);
                for _ in 0..count {
                    let (n, fields) = lines.record("TRIA3")?;
                    let indices = [
                        parse_field(fields.first(), n)?,
                        parse_field(fields.get(1), n)?,
                        parse_field(fields.get(2), n)?,
                    ];
                    let tag = match fields.get(3) {
                        Some(_) => parse_field(fields.get(3), n)?,
                        None => 0,
                    };
                    mesh.triangles.push(Triangle { indices, tag });
                }
            }
            "VALUE" => {
                let count: usize = parse_field(args.first(), n)?;
                let columns: usize = match args.get(1) {
                    Some(_) => parse_field(args.get(1), n)?,
                    None => 1,
                };
                if columns > 1 {
                    warn!("VALUE section has {} columns; keeping the first", columns);
                }
                mesh.values.reserve(count);
                for _ in 0..count {
                    let (n, fields) = lines.record("VALUE")?;
                    mesh.values.push(parse_field(fields.first(), n)?);
                }
            }
            other => {
                let skip: usize = args.last().and_then(|s| s.parse().ok()).unwrap_or(0);
                warn!("Skipping unsupported .msh section {} ({} records)", other, skip);
                for _ in 0..skip {
                    lines.record(other)?;
                }
            }
        }
    }

    debug!(
        ".msh parsed: {} points, {} triangles, {} values",
        mesh.vertices.len(),
        mesh.triangles.len(),
        mesh.values.len()
    );

    Ok(mesh)
}

fn format_msh(mesh: &Mesh) -> String {
    let mut out = String::with_capacity(mesh.vertices.len() * 32 + mesh.triangles.len() * 24);
    out.push_str("# mesh-topology output\n");
    out.push_str(&format!("MSHID=3;{}\n", mesh.kind.as_str().to_uppercase()));
    out.push_str("NDIMS=2\n");

    out.push_str(&format!("POINT={}\n", mesh.vertices.len()));
    for v in &mesh.vertices {
        out.push_str(&format!(
            "{};{};{}\n",
            v.position.x,
            v.position.y,
            v.tag.unwrap_or(0)
        ));
    }

    out.push_str(&format!("TRIA3={}\n", mesh.triangles.len()));
    for t in &mesh.triangles {
        let [a, b, c] = t.indices;
        out.push_str(&format!("{};{};{};{}\n", a, b, c, t.tag));
    }

    if mesh.has_values() {
        out.push_str(&format!("VALUE={};1\n", mesh.values.len()));
        for value in &mesh.values {
            out.push_str(&format!("{}\n", value));
        }
    }

    out
}

/// Save mesh in JIGSAW ASCII `.msh` format.
pub fn save_msh(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    info!("Saving mesh to {:?} (MSH)", path);

    let file = File::create(path).map_err(|e| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(format_msh(mesh).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| MeshError::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(
        "Saved {} vertices and {} triangles to {:?}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        path
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::MeshKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(MeshFormat::from_path(Path::new("a.msh")), Some(MeshFormat::Msh));
        assert_eq!(MeshFormat::from_path(Path::new("a.MSH")), Some(MeshFormat::Msh));
        assert_eq!(MeshFormat::from_path(Path::new("a.json")), Some(MeshFormat::Json));
        assert_eq!(MeshFormat::from_path(Path::new("a.stl")), None);
        assert_eq!(MeshFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_msh() {
        let file = write_temp(
            ".msh",
            "# test mesh\n\
             MSHID=3;EUCLIDEAN-MESH\n\
             NDIMS=2\n\
             POINT=3\n\
             0;0;0\n\
             1;0;5\n\
             0;1;0\n\
             \n\
             EDGE2=1\n\
             0;1;0\n\
             TRIA3=1\n\
             0;1;2;7\n\
             VALUE=3;1\n\
             0.5\n\
             0.7\n\
             0.9\n",
        );

        let mesh = load_mesh(file.path()).unwrap();
        assert_eq!(mesh.kind, MeshKind::EuclideanMesh);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices[0].tag, None);
        assert_eq!(mesh.vertices[1].tag, Some(5));
        assert_eq!(mesh.triangles, vec![Triangle { indices: [0, 1, 2], tag: 7 }]);
        assert_eq!(mesh.values, vec![0.5, 0.7, 0.9]);
    }

    #[test]
    fn test_msh_round_trip_keeps_tags_and_values() {
        let mut mesh = fixtures::annulus();
        mesh.values = (0..mesh.vertex_count()).map(|i| i as f64 / 3.0).collect();
        crate::repair::put_id_tags(&mut mesh);

        let file = NamedTempFile::with_suffix(".msh").unwrap();
        save_mesh(&mesh, file.path()).unwrap();
        let loaded = load_mesh(file.path()).unwrap();
        assert_eq!(loaded, mesh);
    }

    #[test]
    fn test_json_round_trip() {
        let mut mesh = fixtures::square_grid(2);
        mesh.kind = MeshKind::EllipsoidMesh;

        let file = NamedTempFile::with_suffix(".json").unwrap();
        save_mesh(&mesh, file.path()).unwrap();
        let loaded = load_mesh(file.path()).unwrap();
        assert_eq!(loaded, mesh);
    }

    #[test]
    fn test_load_rejects_bad_index() {
        let file = write_temp(
            ".msh",
            "MSHID=3;EUCLIDEAN-MESH\nNDIMS=2\nPOINT=3\n0;0;0\n1;0;0\n0;1;0\nTRIA3=1\n0;1;3;0\n",
        );
        assert!(matches!(
            load_mesh(file.path()),
            Err(MeshError::InvalidTopology { .. })
        ));
    }

    #[test]
    fn test_load_rejects_truncated_section() {
        let file = write_temp(".msh", "NDIMS=2\nPOINT=3\n0;0;0\n1;0;0\n");
        let err = load_mesh(file.path()).unwrap_err();
        assert!(matches!(err, MeshError::ParseError { .. }));
        assert!(err.to_string().contains("POINT"));
    }

    #[test]
    fn test_load_rejects_3d() {
        let file = write_temp(".msh", "MSHID=3;EUCLIDEAN-MESH\nNDIMS=3\n");
        assert!(matches!(
            load_mesh(file.path()),
            Err(MeshError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_empty_mesh() {
        let file = write_temp(".msh", "MSHID=3;EUCLIDEAN-MESH\nNDIMS=2\nPOINT=0\n");
        assert!(matches!(
            load_mesh(file.path()),
            Err(MeshError::EmptyMesh { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let mesh = fixtures::square_grid(2);
        let err = save_mesh(&mesh, Path::new("out.stl")).unwrap_err();
        assert!(matches!(
            err,
            MeshError::UnsupportedFormat { extension: Some(ref e) } if e == "stl"
        ));
    }
}
