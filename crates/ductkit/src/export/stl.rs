//! Binary STL export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ductkit_kernel::TriangleMesh;
use tracing::info;

use crate::error::CadError;
use crate::shape::Shape;

const HEADER: &[u8] = b"ductkit STL export";

/// Merge every shape into one mesh.
pub fn to_mesh(shapes: &[Shape]) -> Result<TriangleMesh, CadError> {
    let mut mesh = TriangleMesh::new();
    for shape in shapes {
        for solid in shape.solids()? {
            mesh.merge(&solid.to_mesh());
        }
    }
    Ok(mesh)
}

/// Serialize `shapes` as one binary STL.
pub fn to_stl_bytes(shapes: &[Shape]) -> Result<Vec<u8>, CadError> {
    let mesh = to_mesh(shapes)?;
    let num_triangles = mesh.num_triangles();
    if num_triangles == 0 {
        return Err(CadError::EmptyGeometry);
    }

    let mut data = Vec::with_capacity(84 + num_triangles * 50);
    let mut header = [b' '; 80];
    header[..HEADER.len()].copy_from_slice(HEADER);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.triangles() {
        for value in tri.normal {
            data.extend_from_slice(&value.to_le_bytes());
        }
        for corner in tri.corners {
            for value in corner {
                data.extend_from_slice(&value.to_le_bytes());
            }
        }
        // attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }
    Ok(data)
}

/// Write `shapes` to `path` as binary STL.
pub fn export_stl(shapes: &[Shape], path: impl AsRef<Path>) -> Result<(), CadError> {
    let path = path.as_ref();
    let data = to_stl_bytes(shapes)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&data)?;
    writer.flush()?;
    info!(path = %path.display(), bytes = data.len(), "wrote STL");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ductkit_kernel::Solid;
    use ductkit_math::Vec3;

    fn cube() -> Shape {
        Solid::cuboid(&Vec3::new(1.0, 1.0, 1.0)).unwrap().into()
    }

    #[test]
    fn test_layout() {
        let bytes = to_stl_bytes(&[cube()]).unwrap();
        // six quads, two triangles each
        assert_eq!(&bytes[..HEADER.len()], HEADER);
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 12);
        assert_eq!(bytes.len(), 84 + 12 * 50);
    }

    #[test]
    fn test_multiple_shapes_merge() {
        let bytes = to_stl_bytes(&[cube(), cube()]).unwrap();
        assert_eq!(bytes.len(), 84 + 24 * 50);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            to_stl_bytes(&[Shape::from(Solid::empty())]),
            Err(CadError::EmptyGeometry)
        ));
        assert!(matches!(to_stl_bytes(&[]), Err(CadError::EmptyGeometry)));
    }

    #[test]
    fn test_export_writes_file() {
        let path = std::env::temp_dir().join(format!("ductkit-{}.stl", std::process::id()));
        export_stl(&[cube()], &path).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(len, 84 + 12 * 50);
    }
}
