//! # GLB (binary glTF) I/O
//!
//! Reads the subset of glTF 2.0 that reference frame models use: one
//! embedded binary buffer, triangle-list primitives with float VEC3
//! positions and optional unsigned indices, and a node hierarchy with
//! TRS or matrix transforms. Node transforms are baked into the geometry;
//! each mesh node becomes one [`ModelPart`] named after the node (or its
//! mesh when the node is unnamed).
//!
//! The writer produces the same subset, one node per part with the part
//! offset as node translation.

use crate::error::{GlbError, GlbResult};
use crate::mesh::Mesh3D;
use crate::reference::ModelPart;
use nalgebra::{Matrix4, Point3, Quaternion, UnitQuaternion, Vector3};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// GLB magic number: "glTF"
const GLB_MAGIC: u32 = 0x46546C67;
const GLB_VERSION: u32 = 2;
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;
const CHUNK_TYPE_BIN: u32 = 0x004E4942;

/// glTF component types
const UNSIGNED_BYTE: u32 = 5121;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;
const FLOAT: u32 = 5126;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

const MODE_TRIANGLES: u32 = 4;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    meshes: Vec<Mesh>,
    #[serde(default)]
    accessors: Vec<Accessor>,
    #[serde(default, rename = "bufferViews")]
    buffer_views: Vec<BufferView>,
    #[serde(default)]
    buffers: Vec<Buffer>,
}

#[derive(Debug, Deserialize)]
struct Scene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct Node {
    name: Option<String>,
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    translation: Option<[f32; 3]>,
    rotation: Option<[f32; 4]>,
    scale: Option<[f32; 3]>,
    matrix: Option<[f32; 16]>,
}

impl Node {
    fn local_matrix(&self) -> Matrix4<f32> {
        if let Some(m) = self.matrix {
            return Matrix4::from_column_slice(&m);
        }
        let translation = self.translation.map(Vector3::from).unwrap_or_else(Vector3::zeros);
        let rotation = self
            .rotation
            .map(|[x, y, z, w]| UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)))
            .unwrap_or_else(UnitQuaternion::identity);
        let scale = self.scale.map(Vector3::from).unwrap_or_else(|| Vector3::repeat(1.0));
        Matrix4::new_translation(&translation)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&scale)
    }
}

#[derive(Debug, Deserialize)]
struct Mesh {
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<Primitive>,
}

#[derive(Debug, Deserialize)]
struct Primitive {
    attributes: HashMap<String, usize>,
    indices: Option<usize>,
    mode: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    buffer_view: Option<usize>,
    #[serde(default)]
    byte_offset: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
    sparse: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    #[serde(default)]
    byte_offset: usize,
    byte_length: usize,
    byte_stride: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    byte_length: usize,
    uri: Option<String>,
}

fn le_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(at..at.checked_add(4)?)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}

fn le_f32(bytes: &[u8], at: usize) -> Option<f32> {
    le_u32(bytes, at).map(f32::from_bits)
}

/// Bytes of element `i` of an accessor, `None` past the end or on overflow
fn element<'a>(
    data: &'a [u8],
    accessor: &Accessor,
    i: usize,
    stride: usize,
    size: usize,
) -> Option<&'a [u8]> {
    let at = i.checked_mul(stride)?.checked_add(accessor.byte_offset)?;
    data.get(at..at.checked_add(size)?)
}

/// Split a GLB container into its JSON and (optional) BIN chunks
fn split_chunks(bytes: &[u8]) -> GlbResult<(&[u8], Option<&[u8]>)> {
    let magic = le_u32(bytes, 0).ok_or(GlbError::Truncated(bytes.len()))?;
    if magic != GLB_MAGIC {
        return Err(GlbError::BadMagic(magic));
    }
    let version = le_u32(bytes, 4).ok_or(GlbError::Truncated(bytes.len()))?;
    if version != GLB_VERSION {
        return Err(GlbError::UnsupportedVersion(version));
    }
    let declared = le_u32(bytes, 8).ok_or(GlbError::Truncated(bytes.len()))? as usize;
    if declared > bytes.len() {
        return Err(GlbError::Truncated(bytes.len()));
    }

    let mut json = None;
    let mut bin = None;
    let mut offset = 12;
    while offset + 8 <= declared {
        let length = le_u32(bytes, offset).ok_or(GlbError::Truncated(bytes.len()))? as usize;
        let kind = le_u32(bytes, offset + 4).ok_or(GlbError::Truncated(bytes.len()))?;
        let data = bytes
            .get(offset + 8..offset + 8 + length)
            .ok_or(GlbError::Truncated(bytes.len()))?;
        match kind {
            CHUNK_TYPE_JSON if json.is_none() => json = Some(data),
            CHUNK_TYPE_BIN if bin.is_none() => bin = Some(data),
            // unknown chunks must be skipped
            _ => {}
        }
        offset += 8 + length;
    }

    Ok((json.ok_or(GlbError::MissingChunk("JSON"))?, bin))
}

struct Reader<'a> {
    doc: Document,
    bin: Option<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn view(&self, accessor: &Accessor) -> GlbResult<(&'a [u8], Option<usize>)> {
        if accessor.sparse.is_some() {
            return Err(GlbError::Unsupported("sparse accessors".to_string()));
        }
        let index = accessor
            .buffer_view
            .ok_or_else(|| GlbError::Unsupported("accessor without bufferView".to_string()))?;
        let view = self.doc.buffer_views.get(index).ok_or(GlbError::DanglingIndex {
            what: "bufferView",
            index,
        })?;
        let buffer = self.doc.buffers.get(view.buffer).ok_or(GlbError::DanglingIndex {
            what: "buffer",
            index: view.buffer,
        })?;
        if let Some(uri) = &buffer.uri {
            return Err(GlbError::Unsupported(format!("external buffer {}", uri)));
        }
        if view.buffer != 0 {
            return Err(GlbError::Unsupported(
                "more than one embedded buffer".to_string(),
            ));
        }
        let bin = self.bin.ok_or(GlbError::MissingChunk("BIN"))?;
        if buffer.byte_length > bin.len() {
            return Err(GlbError::OutOfBounds("buffer"));
        }
        let data = view
            .byte_offset
            .checked_add(view.byte_length)
            .and_then(|end| bin.get(view.byte_offset..end))
            .ok_or(GlbError::OutOfBounds("bufferView"))?;
        Ok((data, view.byte_stride))
    }

    fn accessor(&self, index: usize) -> GlbResult<&Accessor> {
        self.doc.accessors.get(index).ok_or(GlbError::DanglingIndex {
            what: "accessor",
            index,
        })
    }

    fn read_positions(&self, index: usize) -> GlbResult<Vec<Point3<f32>>> {
        let accessor = self.accessor(index)?;
        if accessor.component_type != FLOAT || accessor.kind != "VEC3" {
            return Err(GlbError::Unsupported(format!(
                "POSITION as {} {}",
                accessor.component_type, accessor.kind
            )));
        }
        let (data, stride) = self.view(accessor)?;
        let stride = stride.unwrap_or(12);

        (0..accessor.count)
            .map(|i| {
                let raw = element(data, accessor, i, stride, 12)
                    .ok_or(GlbError::OutOfBounds("POSITION accessor"))?;
                match (le_f32(raw, 0), le_f32(raw, 4), le_f32(raw, 8)) {
                    (Some(x), Some(y), Some(z)) => Ok(Point3::new(x, y, z)),
                    _ => Err(GlbError::OutOfBounds("POSITION accessor")),
                }
            })
            .collect()
    }

    fn read_indices(&self, index: usize) -> GlbResult<Vec<u32>> {
        let accessor = self.accessor(index)?;
        if accessor.kind != "SCALAR" {
            return Err(GlbError::Unsupported(format!("indices as {}", accessor.kind)));
        }
        let size = match accessor.component_type {
            UNSIGNED_BYTE => 1,
            UNSIGNED_SHORT => 2,
            UNSIGNED_INT => 4,
            other => {
                return Err(GlbError::Unsupported(format!(
                    "index component type {}",
                    other
                )))
            }
        };
        let (data, stride) = self.view(accessor)?;
        let stride = stride.unwrap_or(size);

        (0..accessor.count)
            .map(|i| -> GlbResult<u32> {
                let raw = element(data, accessor, i, stride, size)
                    .ok_or(GlbError::OutOfBounds("index accessor"))?;
                Ok(match size {
                    1 => raw[0] as u32,
                    2 => u16::from_le_bytes([raw[0], raw[1]]) as u32,
                    _ => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
                })
            })
            .collect()
    }

    /// All primitives of a mesh merged into one indexed mesh
    fn read_mesh(&self, index: usize) -> GlbResult<Mesh3D> {
        let mesh = self.doc.meshes.get(index).ok_or(GlbError::DanglingIndex {
            what: "mesh",
            index,
        })?;

        let mut positions = Vec::new();
        let mut triangles = Vec::new();
        for primitive in &mesh.primitives {
            let mode = primitive.mode.unwrap_or(MODE_TRIANGLES);
            if mode != MODE_TRIANGLES {
                return Err(GlbError::Unsupported(format!("primitive mode {}", mode)));
            }
            let position_index = *primitive
                .attributes
                .get("POSITION")
                .ok_or_else(|| GlbError::Unsupported("primitive without POSITION".to_string()))?;
            let vertices = self.read_positions(position_index)?;
            let indices = match primitive.indices {
                Some(i) => self.read_indices(i)?,
                None => (0..vertices.len() as u32).collect(),
            };
            if indices.len() % 3 != 0 {
                return Err(GlbError::Unsupported(format!(
                    "{} indices do not form triangles",
                    indices.len()
                )));
            }
            if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(GlbError::DanglingIndex {
                    what: "vertex",
                    index: bad as usize,
                });
            }

            let base = positions.len() as u32;
            positions.extend(vertices);
            triangles.extend(
                indices
                    .chunks_exact(3)
                    .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
            );
        }

        Ok(Mesh3D::new(positions, triangles))
    }

    fn root_nodes(&self) -> Vec<usize> {
        let scene = self.doc.scene.unwrap_or(0);
        if let Some(scene) = self.doc.scenes.get(scene) {
            return scene.nodes.clone();
        }
        let children: HashSet<usize> = self
            .doc
            .nodes
            .iter()
            .flat_map(|n| n.children.iter().copied())
            .collect();
        (0..self.doc.nodes.len())
            .filter(|i| !children.contains(i))
            .collect()
    }

    fn collect(
        &self,
        index: usize,
        parent: &Matrix4<f32>,
        visited: &mut HashSet<usize>,
        parts: &mut Vec<ModelPart>,
    ) -> GlbResult<()> {
        if !visited.insert(index) {
            return Err(GlbError::Unsupported(format!(
                "node {} is referenced twice",
                index
            )));
        }
        let node = self.doc.nodes.get(index).ok_or(GlbError::DanglingIndex {
            what: "node",
            index,
        })?;
        let world = parent * node.local_matrix();

        if let Some(mesh_index) = node.mesh {
            let mut mesh = self.read_mesh(mesh_index)?;
            if !mesh.is_empty() {
                mesh.transform(&world);
                let name = node
                    .name
                    .clone()
                    .or_else(|| self.doc.meshes.get(mesh_index).and_then(|m| m.name.clone()))
                    .unwrap_or_else(|| format!("node{}", index));
                parts.push(ModelPart::from_model_space(name, mesh));
            }
        }

        for &child in &node.children {
            self.collect(child, &world, visited, parts)?;
        }
        Ok(())
    }
}

/// Read every mesh node of a GLB container as a model part
pub fn read_glb(bytes: &[u8]) -> GlbResult<Vec<ModelPart>> {
    let (json, bin) = split_chunks(bytes)?;
    let doc: Document = serde_json::from_slice(json)?;
    let reader = Reader { doc, bin };

    let mut parts = Vec::new();
    let mut visited = HashSet::new();
    for root in reader.root_nodes() {
        reader.collect(root, &Matrix4::identity(), &mut visited, &mut parts)?;
    }

    if parts.is_empty() {
        return Err(GlbError::NoMeshes);
    }
    debug!("Read {} parts from GLB ({} bytes)", parts.len(), bytes.len());
    Ok(parts)
}

/// Write parts as a GLB container, one node and mesh per part
pub fn write_glb(parts: &[ModelPart]) -> GlbResult<Vec<u8>> {
    let parts: Vec<&ModelPart> = parts.iter().filter(|p| !p.mesh.is_empty()).collect();
    if parts.is_empty() {
        return Err(GlbError::NoMeshes);
    }

    let mut bin: Vec<u8> = Vec::new();
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();
    let mut meshes = Vec::new();
    let mut nodes = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        let mesh = &part.mesh;

        let pos_offset = bin.len();
        for p in &mesh.positions {
            for c in [p.x, p.y, p.z] {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let pos_length = bin.len() - pos_offset;

        let idx_offset = bin.len();
        for tri in &mesh.indices {
            for v in tri {
                bin.extend_from_slice(&v.to_le_bytes());
            }
        }
        let idx_length = bin.len() - idx_offset;

        buffer_views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": pos_offset,
            "byteLength": pos_length,
            "target": ARRAY_BUFFER
        }));
        buffer_views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": idx_offset,
            "byteLength": idx_length,
            "target": ELEMENT_ARRAY_BUFFER
        }));

        let min = mesh.bounds_min;
        let max = mesh.bounds_max;
        accessors.push(serde_json::json!({
            "bufferView": i * 2,
            "componentType": FLOAT,
            "count": mesh.positions.len(),
            "type": "VEC3",
            "min": [min.x, min.y, min.z],
            "max": [max.x, max.y, max.z]
        }));
        accessors.push(serde_json::json!({
            "bufferView": i * 2 + 1,
            "componentType": UNSIGNED_INT,
            "count": mesh.indices.len() * 3,
            "type": "SCALAR"
        }));

        meshes.push(serde_json::json!({
            "name": part.name,
            "primitives": [{
                "attributes": { "POSITION": i * 2 },
                "indices": i * 2 + 1,
                "mode": MODE_TRIANGLES
            }]
        }));
        nodes.push(serde_json::json!({
            "name": part.name,
            "mesh": i,
            "translation": [part.position.x, part.position.y, part.position.z]
        }));
    }

    let document = serde_json::json!({
        "asset": { "version": "2.0", "generator": concat!("framecut ", env!("CARGO_PKG_VERSION")) },
        "scene": 0,
        "scenes": [{ "nodes": (0..parts.len()).collect::<Vec<_>>() }],
        "nodes": nodes,
        "meshes": meshes,
        "accessors": accessors,
        "bufferViews": buffer_views,
        "buffers": [{ "byteLength": bin.len() }]
    });

    let mut json = serde_json::to_vec(&document)?;
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
    glb.extend_from_slice(&bin);

    debug!("Wrote {} parts as GLB ({} bytes)", parts.len(), glb.len());
    Ok(glb)
}
