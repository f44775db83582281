use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::math::Vec3;

/// 頂点構造体
/// 位置、法線、選択フラグを含む
/// ホストの頂点バッファをそのままキャストできるように `repr(C)` で定義
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// 0 = 非選択, それ以外 = 選択
    pub select: u32,
}

impl Vertex {
    /// 非選択の頂点を作成
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            select: 0,
        }
    }

    /// 選択済みの頂点を作成
    pub fn selected(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            select: 1,
        }
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.select != 0
    }

    #[inline]
    pub fn set_selected(&mut self, selected: bool) {
        self.select = u32::from(selected);
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// メッシュ構造体
/// 頂点、三角形インデックス、コーナーごとのUVを含む
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// インデックスと同じ長さ（コーナー単位）。未展開なら空
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
}

impl Mesh {
    /// 空のメッシュを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 頂点とインデックスから検証付きで作成
    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> MeshResult<Self> {
        let mesh = Self {
            vertices,
            indices,
            uvs: Vec::new(),
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// ホストの生の頂点バッファから作成
    /// JS側のバッファはアライメントが保証されないため、頂点ごとに読み出す
    pub fn from_vertex_bytes(bytes: &[u8], indices: Vec<u32>) -> MeshResult<Self> {
        let stride = std::mem::size_of::<Vertex>();
        if bytes.len() % stride != 0 {
            return Err(MeshError::VertexLayout(bytemuck::PodCastError::OutputSliceWouldHaveSlop));
        }

        let vertices = bytes
            .chunks_exact(stride)
            .map(bytemuck::try_pod_read_unaligned::<Vertex>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(MeshError::VertexLayout)?;

        Self::from_parts(vertices, indices)
    }

    /// フラットな属性配列から作成（位置・法線はxyzの並び）
    pub fn from_flat(positions: &[f32], normals: &[f32], indices: Vec<u32>) -> MeshResult<Self> {
        if positions.len() % 3 != 0 || positions.len() != normals.len() {
            return Err(MeshError::AttributeLength {
                details: format!(
                    "{} position floats, {} normal floats",
                    positions.len(),
                    normals.len()
                ),
            });
        }

        let vertices = positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| Vertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
            .collect();

        Self::from_parts(vertices, indices)
    }

    /// JSONスナップショットから作成
    pub fn from_json(json: &str) -> MeshResult<Self> {
        let mesh: Self = serde_json::from_str(json)?;
        mesh.validate()?;
        Ok(mesh)
    }

    /// インデックスの整合性を検証
    pub fn validate(&self) -> MeshResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }

        let vertex_count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        if !self.uvs.is_empty() && self.uvs.len() != self.indices.len() {
            return Err(MeshError::AttributeLength {
                details: format!("{} uvs for {} corners", self.uvs.len(), self.indices.len()),
            });
        }

        Ok(())
    }

    /// キューブメッシュを生成（原点中心、一辺 `size`）
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;

        // (法線, 面上の4頂点)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // +X
            ([1.0, 0.0, 0.0], [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]]),
            // -X
            ([-1.0, 0.0, 0.0], [[-h, -h, h], [-h, h, h], [-h, h, -h], [-h, -h, -h]]),
            // +Y
            ([0.0, 1.0, 0.0], [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]]),
            // -Y
            ([0.0, -1.0, 0.0], [[-h, -h, h], [-h, -h, -h], [h, -h, -h], [h, -h, h]]),
            // +Z
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            // -Z
            ([0.0, 0.0, -1.0], [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            vertices.extend(corners.iter().map(|&p| Vertex::new(p, normal)));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            vertices,
            indices,
            uvs: Vec::new(),
        }
    }

    /// 頂点数を取得
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 三角形数を取得
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 選択中の頂点数を取得
    pub fn selected_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_selected()).count()
    }

    /// 全頂点の選択状態を一括設定
    pub fn select_all(&mut self, selected: bool) {
        for vertex in &mut self.vertices {
            vertex.set_selected(selected);
        }
    }

    /// 指定インデックスの頂点だけを選択
    pub fn select_only(&mut self, selection: &[u32]) -> MeshResult<()> {
        let vertex_count = self.vertices.len();
        if let Some(&index) = selection.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        self.select_all(false);
        for &index in selection {
            self.vertices[index as usize].set_selected(true);
        }
        Ok(())
    }

    /// UVが展開済みか
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// 三角形をイテレート
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
