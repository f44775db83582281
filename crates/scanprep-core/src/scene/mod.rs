pub mod material;
pub mod object;

pub use material::{Image, ImageId, Material, MaterialId};
pub use object::{DisplayType, ObjectId, SceneObject};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// 操作モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Object,
    Edit,
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionMode::Object => f.write_str("object"),
            InteractionMode::Edit => f.write_str("edit"),
        }
    }
}

/// オブジェクトスロット
struct Slot {
    /// 現在の世代番号
    generation: u32,
    /// 生存中ならSome
    object: Option<SceneObject>,
}

/// シーン
/// オブジェクト、選択状態、マテリアル、画像を管理する
#[derive(Default)]
pub struct Scene {
    slots: Vec<Slot>,
    /// 再利用可能なインデックス
    free_list: Vec<u32>,
    /// 選択順を保持
    selection: Vec<ObjectId>,
    active: Option<ObjectId>,
    mode: InteractionMode,
    materials: Vec<Material>,
    images: Vec<Image>,
}

impl Scene {
    /// 空のシーンを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// オブジェクトを追加
    pub fn spawn(&mut self, object: SceneObject) -> ObjectId {
        let id = if let Some(index) = self.free_list.pop() {
            // 再利用: 世代番号をインクリメント
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.object = Some(object);
            ObjectId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                object: Some(object),
            });
            ObjectId::new(index, 1)
        };

        debug!(%id, "Spawned object");
        id
    }

    /// オブジェクトを削除し、選択状態からも外す
    pub fn despawn(&mut self, id: ObjectId) -> Option<SceneObject> {
        let slot = self.slot_mut(id)?;
        let object = slot.object.take()?;
        self.free_list.push(id.index());

        self.selection.retain(|&selected| selected != id);
        if self.active == Some(id) {
            self.active = None;
        }

        debug!(%id, name = %object.name, "Despawned object");
        Some(object)
    }

    /// オブジェクトを複製（名前、トランスフォーム、メッシュ、表示、マテリアルスロット）
    pub fn duplicate(&mut self, id: ObjectId) -> Option<ObjectId> {
        let copy = self.get(id)?.clone();
        Some(self.spawn(copy))
    }

    /// オブジェクトが生存しているか確認
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slot_mut(id)?.object.as_mut()
    }

    /// 生存オブジェクトをイテレート
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object
                .as_ref()
                .map(|object| (ObjectId::new(index as u32, slot.generation), object))
        })
    }

    /// 生存オブジェクト数
    pub fn object_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.object.is_some()).count()
    }

    /// 名前で検索（最初に見つかったもの）
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.iter()
            .find(|(_, object)| object.name.as_str() == name)
            .map(|(id, _)| id)
    }

    fn slot_mut(&mut self, id: ObjectId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// 選択に追加（既に選択済みなら何もしない）
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        true
    }

    /// 選択から外す
    pub fn deselect(&mut self, id: ObjectId) {
        self.selection.retain(|&selected| selected != id);
    }

    /// 全選択解除（アクティブは維持）
    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// アクティブオブジェクトを設定（選択にも追加）
    pub fn set_active(&mut self, id: ObjectId) -> bool {
        if !self.select(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// 指定オブジェクトのみを選択してアクティブにする
    pub fn make_sole_selection(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection.clear();
        self.set_active(id)
    }

    /// アクティブオブジェクトを取得（削除済みならNone）
    pub fn active(&self) -> Option<ObjectId> {
        self.active.filter(|&id| self.contains(id))
    }

    /// 選択中のオブジェクト（選択順）
    pub fn selected(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    // ========================================================================
    // Mode
    // ========================================================================

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "Switching interaction mode");
            self.mode = mode;
        }
    }

    // ========================================================================
    // Materials & images
    // ========================================================================

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)
    }

    pub fn add_image(&mut self, image: Image) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() as u32 - 1)
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(id.0 as usize)
    }

    pub fn image_mut(&mut self, id: ImageId) -> Option<&mut Image> {
        self.images.get_mut(id.0 as usize)
    }
}
