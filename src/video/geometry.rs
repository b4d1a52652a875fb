//! Indexed triangle meshes resident on the GPU.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tobj;

use crate::errors::*;

use super::backends::GeometryObject;
use super::vertex::Vertex;
use super::Device;

/// A vertex buffer, an index buffer and the vertex array object that ties
/// them to the `Vertex` layout. The all-zero value is the freed state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    object: GeometryObject,
    size: u32,
}

impl Geometry {
    /// Returns the number of indices.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn object(&self) -> GeometryObject {
        self.object
    }

    #[inline]
    pub fn vao(&self) -> u32 {
        self.object.vao
    }

    #[inline]
    pub fn vbo(&self) -> u32 {
        self.object.vbo
    }

    #[inline]
    pub fn ibo(&self) -> u32 {
        self.object.ibo
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.object == GeometryObject::default()
    }
}

/// Vertices and indices of a mesh in CPU memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Uploads `vertices` and `indices` into static buffers.
pub fn make_geometry(video: &mut Device, vertices: &[Vertex], indices: &[u32]) -> Result<Geometry> {
    if let Some(&i) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(Error::IndexOutOfBounds(i, vertices.len()));
    }

    let object = unsafe {
        video.visitor().create_geometry(
            bytemuck::cast_slice(vertices),
            indices,
            &Vertex::layout(),
            Vertex::stride(),
        )?
    };

    debug!(
        "[Geometry] creates {:?} ({} vertices, {} indices).",
        object,
        vertices.len(),
        indices.len()
    );

    Ok(Geometry {
        object,
        size: indices.len() as u32,
    })
}

/// Parses a Wavefront OBJ file and uploads it with `make_geometry`.
pub fn load_geometry<P: AsRef<Path>>(video: &mut Device, path: P) -> Result<Geometry> {
    let path = path.as_ref();
    let mesh = parse_obj(path)?;

    info!(
        "[Geometry] loads {:?} ({} triangles).",
        path,
        mesh.indices.len() / 3
    );

    make_geometry(video, &mesh.vertices, &mesh.indices)
}

/// Releases the GPU objects and resets `geometry` to the freed state. Freeing
/// twice is a no-op.
pub fn free_geometry(video: &mut Device, geometry: &mut Geometry) -> Result<()> {
    if geometry.is_null() {
        return Ok(());
    }

    unsafe { video.visitor().delete_geometry(geometry.object)? };
    debug!("[Geometry] deletes {:?}.", geometry.object);

    *geometry = Geometry::default();
    Ok(())
}

/// Reads a Wavefront OBJ file into flat vertex and index arrays. Every face
/// corner becomes its own white vertex, so face `f` owns indices `3f..3f+3`.
/// All models of the file are concatenated.
pub fn parse_obj(path: &Path) -> Result<MeshData> {
    let file = File::open(path)
        .map_err(|err| Error::ResourceNotFound(path.to_owned(), format!("{}", err)))?;

    let options = tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ..Default::default()
    };

    let (models, _) = tobj::load_obj_buf(&mut BufReader::new(file), &options, |_| {
        Ok(Default::default())
    })
    .map_err(|err| Error::Decode(path.to_owned(), format!("{}", err)))?;

    let mut data = MeshData::default();
    for model in &models {
        expand(&model.mesh, &mut data).map_err(|err| match err {
            Error::Decode(_, reason) => Error::Decode(path.to_owned(), reason),
            err => err,
        })?;
    }

    Ok(data)
}

fn expand(mesh: &tobj::Mesh, data: &mut MeshData) -> Result<()> {
    let faces = if mesh.face_arities.is_empty() {
        mesh.indices.len() / 3
    } else {
        mesh.face_arities.len()
    };

    if let Some((face, &arity)) = mesh.face_arities.iter().enumerate().find(|v| *v.1 != 3) {
        return Err(Error::FaceArity(face, arity));
    }

    let position = |i: usize| -> Result<[f32; 4]> {
        let v = mesh.indices[i] as usize;
        match mesh.positions.get(3 * v..3 * v + 3) {
            Some(p) => Ok([p[0], p[1], p[2], 1.0]),
            None => Err(Error::Decode(
                Default::default(),
                format!("position {} is out of bounds", v),
            )),
        }
    };

    let uv = |i: usize| -> [f32; 2] {
        mesh.texcoord_indices
            .get(i)
            .and_then(|&v| mesh.texcoords.get(2 * v as usize..2 * v as usize + 2))
            .map(|t| [t[0], t[1]])
            .unwrap_or_default()
    };

    let normal = |i: usize| -> [f32; 4] {
        mesh.normal_indices
            .get(i)
            .and_then(|&v| mesh.normals.get(3 * v as usize..3 * v as usize + 3))
            .map(|n| [n[0], n[1], n[2], 0.0])
            .unwrap_or_default()
    };

    data.vertices.reserve(faces * 3);
    data.indices.reserve(faces * 3);

    for i in 0..faces * 3 {
        data.indices.push(data.vertices.len() as u32);
        data.vertices
            .push(Vertex::new(position(i)?, [1.0; 4], uv(i), normal(i)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    const TRIANGLES: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn expands_triangles() {
        let path = write("pastel_geometry_expands_triangles.obj", TRIANGLES);
        let mesh = parse_obj(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, [0, 1, 2, 3, 4, 5]);

        let v = mesh.vertices[4];
        assert_eq!(v.position, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(v.color, [1.0; 4]);
        assert_eq!(v.uv, [1.0, 1.0]);
        assert_eq!(v.normal, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn rejects_quads() {
        let path = write(
            "pastel_geometry_rejects_quads.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 2 3 4\n",
        );

        let result = parse_obj(&path);
        fs::remove_file(&path).unwrap();

        match result {
            Err(Error::FaceArity(1, 4)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_streams_are_zero() {
        let path = write(
            "pastel_geometry_missing_streams.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );

        let mesh = parse_obj(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.0; 2]));
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 4]));
    }

    #[test]
    fn missing_file() {
        match parse_obj(Path::new("no/such/model.obj")) {
            Err(Error::ResourceNotFound(_, _)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
