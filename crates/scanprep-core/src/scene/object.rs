use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::components::{Name, Transform};
use crate::mesh::Mesh;

use super::material::MaterialId;

/// シーンオブジェクト識別子（世代番号付き）
/// - index: スロット配列のインデックス
/// - generation: スロット再利用時の世代番号（削除済みオブジェクトとの区別用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    index: u32,
    generation: NonZeroU32,
}

impl ObjectId {
    const INDEX_BITS: u32 = 20;
    const INDEX_MASK: u32 = (1 << Self::INDEX_BITS) - 1;
    const GENERATION_MASK: u32 = 0xFFF;

    /// 世代番号0は無効値として予約されているため、1に切り上げる
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation: NonZeroU32::new(generation).unwrap_or(NonZeroU32::MIN),
        }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation.get()
    }

    /// JS用ID（上位12bit: generation, 下位20bit: index）
    #[inline]
    pub fn to_u32(&self) -> u32 {
        ((self.generation.get() & Self::GENERATION_MASK) << Self::INDEX_BITS)
            | (self.index & Self::INDEX_MASK)
    }

    /// JS用IDから復元
    #[inline]
    pub fn from_u32(id: u32) -> Self {
        Self::new(
            id & Self::INDEX_MASK,
            (id >> Self::INDEX_BITS) & Self::GENERATION_MASK,
        )
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// 表示タイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayType {
    #[default]
    Solid,
    /// バウンディングボックスのみ表示（切り抜き用キューブ）
    Bounds,
}

/// シーン内のオブジェクト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: Name,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub display: DisplayType,
    /// マテリアルスロット（順序付き）
    pub materials: Vec<MaterialId>,
}

impl SceneObject {
    /// 空のオブジェクトを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Name::new(name),
            transform: Transform::identity(),
            mesh: None,
            display: DisplayType::Solid,
            materials: Vec::new(),
        }
    }

    /// メッシュ付きのオブジェクトを作成
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::new(name)
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Mesh::vertex_count)
    }
}
