// crates/scanprep-wasm/src/lib.rs

use serde::Serialize;
use wasm_bindgen::prelude::*;

use glam::{Mat4, Quat, Vec3};
use scanprep_core::{
    DisplayType, EulerOrder, ImageId, MaterialId, Mesh, ObjectId, Rotation, Scene, SceneObject,
    Vertex,
};
use scanprep_ops::{CenterMode, CpuEngine, UvOutcome, WorkflowConfig};

mod utils;

use utils::{console_log, console_warn, to_js_error};

// パニック時のスタックトレース表示
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// 選択頂点の法線を +Z に向ける回転を計算
///
/// `normals` は xyz の並び、`selected` は頂点ごとの 0/1、`world` は列優先の 4x4 行列。
/// 戻り値は `[x, y, z, w]` のクォータニオン。
#[wasm_bindgen]
pub fn compute_alignment_rotation(
    normals: &[f32],
    selected: &[u8],
    world: &[f32],
) -> Result<Vec<f32>, JsValue> {
    let rotation = alignment_rotation(normals, selected, world).map_err(to_js_error)?;
    Ok(rotation.to_array().to_vec())
}

fn alignment_rotation(normals: &[f32], selected: &[u8], world: &[f32]) -> Result<Quat, String> {
    if normals.len() % 3 != 0 {
        return Err(format!("normal buffer length {} is not a multiple of 3", normals.len()));
    }
    if selected.len() != normals.len() / 3 {
        return Err(format!(
            "selection length {} does not match {} normals",
            selected.len(),
            normals.len() / 3
        ));
    }
    if world.len() != 16 {
        return Err(format!("world matrix needs 16 values, got {}", world.len()));
    }

    let vertices: Vec<Vertex> = normals
        .chunks_exact(3)
        .zip(selected)
        .map(|(n, &flag)| {
            let mut vertex = Vertex::new([0.0; 3], [n[0], n[1], n[2]]);
            vertex.set_selected(flag != 0);
            vertex
        })
        .collect();

    scanprep_core::compute_alignment_rotation(&vertices, Mat4::from_cols_slice(world))
        .map_err(|err| err.to_string())
}

/// describe_object の戻り値
#[derive(Serialize)]
struct ObjectSummary {
    id: u32,
    name: String,
    display: &'static str,
    position: [f32; 3],
    rotation: [f32; 4],
    scale: [f32; 3],
    vertex_count: usize,
    triangle_count: usize,
    selected_vertices: usize,
    has_uvs: bool,
    materials: Vec<u32>,
    selected: bool,
    active: bool,
}

/// describe_material の戻り値
#[derive(Serialize)]
struct MaterialSummary {
    index: u32,
    name: String,
    base_color: Option<u32>,
    active_image: Option<u32>,
}

/// describe_image の戻り値（ピクセルは image_pixels で取得）
#[derive(Serialize)]
struct ImageSummary {
    index: u32,
    name: String,
    width: u32,
    height: u32,
    alpha: bool,
}

/// スキャン整形のワークスペース
///
/// シーンと設定を保持し、CPU エンジンで向き合わせ・切り抜き・UV 展開を実行する
#[wasm_bindgen]
pub struct Workspace {
    scene: Scene,
    config: WorkflowConfig,
    engine: CpuEngine,
}

#[wasm_bindgen]
impl Workspace {
    /// 設定 JSON（省略可）からワークスペースを作成
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Workspace, JsValue> {
        let config = match config_json {
            Some(json) => WorkflowConfig::from_json_str(&json).map_err(to_js_error)?,
            None => WorkflowConfig::default(),
        };

        console_log!("Workspace created (uv limit: {})", config.uv.max_vertices);
        Ok(Self {
            scene: Scene::new(),
            config,
            engine: CpuEngine::new(),
        })
    }

    /// 現在の設定を JSON で取得
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.config.to_json_string().map_err(to_js_error)
    }

    /// メッシュ付きオブジェクトを追加
    pub fn add_mesh_object(
        &mut self,
        name: &str,
        positions: &[f32],
        normals: &[f32],
        indices: &[u32],
    ) -> Result<u32, JsValue> {
        let mesh = Mesh::from_flat(positions, normals, indices.to_vec()).map_err(to_js_error)?;
        let vertex_count = mesh.vertex_count();
        let id = self.scene.spawn(SceneObject::with_mesh(name, mesh));

        console_log!("Added object: {} (id: {}, vertices: {})", name, id, vertex_count);
        Ok(id.to_u32())
    }

    /// オブジェクトを削除
    pub fn delete_object(&mut self, id: u32) -> bool {
        self.scene.despawn(ObjectId::from_u32(id)).is_some()
    }

    pub fn object_count(&self) -> usize {
        self.scene.object_count()
    }

    /// オブジェクトを選択に追加
    pub fn select(&mut self, id: u32) -> bool {
        self.scene.select(ObjectId::from_u32(id))
    }

    pub fn deselect_all(&mut self) {
        self.scene.deselect_all();
    }

    /// アクティブオブジェクトを設定（選択にも追加される）
    pub fn set_active(&mut self, id: u32) -> bool {
        self.scene.set_active(ObjectId::from_u32(id))
    }

    pub fn active(&self) -> Option<u32> {
        self.scene.active().map(|id| id.to_u32())
    }

    /// 選択された頂点インデックスを設定
    pub fn set_selected_vertices(&mut self, id: u32, indices: &[u32]) -> Result<(), JsValue> {
        let mesh = self.mesh_mut(id)?;
        mesh.select_only(indices).map_err(to_js_error)
    }

    /// 位置を設定
    pub fn set_position(&mut self, id: u32, x: f32, y: f32, z: f32) -> bool {
        self.with_object(id, |object| object.transform.position = Vec3::new(x, y, z))
    }

    /// クォータニオンで回転を設定
    pub fn set_rotation_quat(&mut self, id: u32, x: f32, y: f32, z: f32, w: f32) -> bool {
        let rotation = Quat::from_xyzw(x, y, z, w).normalize();
        self.with_object(id, |object| {
            object.transform.rotation = Rotation::Quaternion(rotation)
        })
    }

    /// オイラー角（XYZ、ラジアン）で回転を設定
    pub fn set_rotation_euler(&mut self, id: u32, x: f32, y: f32, z: f32) -> bool {
        self.with_object(id, |object| {
            object.transform.rotation = Rotation::Euler {
                order: EulerOrder::XYZ,
                angles: Vec3::new(x, y, z),
            }
        })
    }

    /// スケールを設定
    pub fn set_scale(&mut self, id: u32, x: f32, y: f32, z: f32) -> bool {
        self.with_object(id, |object| object.transform.scale = Vec3::new(x, y, z))
    }

    /// 回転を `[x, y, z, w]` で取得
    pub fn get_rotation(&self, id: u32) -> Option<Vec<f32>> {
        self.scene
            .get(ObjectId::from_u32(id))
            .map(|object| object.transform.quat().to_array().to_vec())
    }

    /// アクティブオブジェクトを選択頂点の法線で上向きに回転
    pub fn orient_by_normals(&mut self) -> Result<Vec<f32>, JsValue> {
        let rotation = scanprep_ops::orient_by_normals(&mut self.scene).map_err(to_js_error)?;
        Ok(rotation.to_array().to_vec())
    }

    /// アクティブオブジェクトのメッシュを原点に移動
    ///
    /// `keep_world_position` が true の場合はオブジェクトの位置を動かし、ワールド上の形状を保つ。
    /// 取り除いたローカルオフセットを返す。
    pub fn center_origin(&mut self, keep_world_position: bool) -> Result<Vec<f32>, JsValue> {
        let mode = if keep_world_position {
            CenterMode::OriginToGeometry
        } else {
            CenterMode::GeometryToOrigin
        };
        let offset = scanprep_ops::center_origin(&mut self.scene, mode).map_err(to_js_error)?;
        Ok(offset.to_array().to_vec())
    }

    /// 切り抜き用のバウンディングキューブを追加
    pub fn add_cut_bounds(&mut self) -> u32 {
        scanprep_ops::add_cut_bounds(&mut self.scene, &self.config.cut).to_u32()
    }

    /// アクティブオブジェクトをもう一方の選択オブジェクトで切り抜く
    pub fn cut_object(&mut self) -> Result<u32, JsValue> {
        let id = scanprep_ops::cut_object(&mut self.scene, &mut self.engine, &self.config.cut)
            .map_err(to_js_error)?;
        Ok(id.to_u32())
    }

    /// アクティブオブジェクトの UV を展開
    ///
    /// 頂点数が上限を超える場合はスキップされ、結果オブジェクトで通知する
    pub fn uv_project(&mut self) -> Result<JsValue, JsValue> {
        let outcome = scanprep_ops::uv_project(&mut self.scene, &mut self.engine, &self.config.uv)
            .map_err(to_js_error)?;

        if let UvOutcome::Skipped {
            vertex_count,
            limit,
        } = outcome
        {
            console_warn!(
                "UV projection skipped: {} vertices (limit {})",
                vertex_count,
                limit
            );
        }
        serde_wasm_bindgen::to_value(&outcome).map_err(to_js_error)
    }

    /// アクティブオブジェクトのローポリ複製を作成
    ///
    /// CPU エンジンは減数化に対応していないため、ホストエンジンなしではエラーになる
    pub fn create_low_poly(&mut self) -> Result<u32, JsValue> {
        let id = scanprep_ops::create_low_poly(
            &mut self.scene,
            &mut self.engine,
            &self.config.low_poly,
        )
        .map_err(to_js_error)?;
        Ok(id.to_u32())
    }

    /// ハイポリからアクティブなローポリへディフューズをベイク
    ///
    /// 作成したマテリアルのインデックスを返す
    pub fn bake_diffuse(&mut self) -> Result<u32, JsValue> {
        let material =
            scanprep_ops::bake_diffuse(&mut self.scene, &mut self.engine, &self.config.bake)
                .map_err(to_js_error)?;
        Ok(material.index())
    }

    /// マテリアルの概要を取得
    pub fn describe_material(&self, index: u32) -> Result<JsValue, JsValue> {
        let summary = self.material_summary(index).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&summary).map_err(to_js_error)
    }

    /// 画像の概要を取得
    pub fn describe_image(&self, index: u32) -> Result<JsValue, JsValue> {
        let summary = self.image_summary(index).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&summary).map_err(to_js_error)
    }

    /// 画像のピクセルを RGBA8 の並びで取得
    pub fn image_pixels(&self, index: u32) -> Option<Vec<u8>> {
        self.scene
            .image(ImageId::from_index(index))
            .map(|image| image.pixels.as_flattened().to_vec())
    }

    /// オブジェクトの概要を取得
    pub fn describe_object(&self, id: u32) -> Result<JsValue, JsValue> {
        let summary = self.summary(ObjectId::from_u32(id)).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&summary).map_err(to_js_error)
    }
}

impl Workspace {
    fn with_object(&mut self, id: u32, f: impl FnOnce(&mut SceneObject)) -> bool {
        match self.scene.get_mut(ObjectId::from_u32(id)) {
            Some(object) => {
                f(object);
                true
            }
            None => false,
        }
    }

    fn mesh_mut(&mut self, id: u32) -> Result<&mut Mesh, JsValue> {
        let object = self
            .scene
            .get_mut(ObjectId::from_u32(id))
            .ok_or_else(|| to_js_error(format!("object {id} does not exist")))?;
        let name = object.name.to_string();
        object
            .mesh
            .as_mut()
            .ok_or_else(|| to_js_error(format!("object {name} has no mesh")))
    }

    fn summary(&self, id: ObjectId) -> Result<ObjectSummary, String> {
        let object = self
            .scene
            .get(id)
            .ok_or_else(|| format!("object {id} does not exist"))?;
        let mesh = object.mesh.as_ref();

        Ok(ObjectSummary {
            id: id.to_u32(),
            name: object.name.to_string(),
            display: match object.display {
                DisplayType::Solid => "solid",
                DisplayType::Bounds => "bounds",
            },
            position: object.transform.position.to_array(),
            rotation: object.transform.quat().to_array(),
            scale: object.transform.scale.to_array(),
            vertex_count: mesh.map_or(0, Mesh::vertex_count),
            triangle_count: mesh.map_or(0, Mesh::triangle_count),
            selected_vertices: mesh.map_or(0, Mesh::selected_count),
            has_uvs: mesh.is_some_and(Mesh::has_uvs),
            materials: object.materials.iter().map(|id| id.index()).collect(),
            selected: self.scene.is_selected(id),
            active: self.scene.active() == Some(id),
        })
    }

    fn material_summary(&self, index: u32) -> Result<MaterialSummary, String> {
        let material = self
            .scene
            .material(MaterialId::from_index(index))
            .ok_or_else(|| format!("material {index} does not exist"))?;

        Ok(MaterialSummary {
            index,
            name: material.name.clone(),
            base_color: material.base_color.map(ImageId::index),
            active_image: material.active_image.map(ImageId::index),
        })
    }

    fn image_summary(&self, index: u32) -> Result<ImageSummary, String> {
        let image = self
            .scene
            .image(ImageId::from_index(index))
            .ok_or_else(|| format!("image {index} does not exist"))?;

        Ok(ImageSummary {
            index,
            name: image.name.clone(),
            width: image.width,
            height: image.height,
            alpha: image.alpha,
        })
    }
}
