//! 文档：实体与图层的有序集合
//!
//! 文档是不可变值。所有修改都返回新的文档（写时复制），原文档保持不变，
//! 撤销/重做只需保留历史文档值。

use crate::entity::{Entity, EntityId};
use crate::layer::{Layer, LayerId};
use crate::math::Point2;
use crate::transform::ViewTransform;
use serde::{Deserialize, Serialize};

/// 默认网格间距
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// 网格设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub size: f64,
    pub show: bool,
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            show: true,
            snap: false,
        }
    }
}

/// 文档
///
/// 反序列化经过 [`Document::from_parts`]，保证至少有一个图层。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentParts")]
pub struct Document {
    entities: Vec<Entity>,
    layers: Vec<Layer>,
    active_layer: LayerId,
    grid: GridSettings,
}

/// 未经修复的文档字段
#[derive(Deserialize)]
struct DocumentParts {
    #[serde(default)]
    entities: Vec<Entity>,
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default = "LayerId::default_layer")]
    active_layer: LayerId,
    #[serde(default)]
    grid: GridSettings,
}

impl From<DocumentParts> for Document {
    fn from(parts: DocumentParts) -> Self {
        Document::from_parts(parts.layers, parts.entities, parts.active_layer, parts.grid)
    }
}

impl Document {
    /// 创建只含默认图层的空文档
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            layers: vec![Layer::default_layer()],
            active_layer: LayerId::default_layer(),
            grid: GridSettings::default(),
        }
    }

    /// 从已加载的数据重建文档，修复缺失图层与无效的活动图层
    pub fn from_parts(
        layers: Vec<Layer>,
        entities: Vec<Entity>,
        active_layer: LayerId,
        grid: GridSettings,
    ) -> Self {
        let layers = if layers.is_empty() {
            tracing::warn!("Document has no layers, adding default layer");
            vec![Layer::default_layer()]
        } else {
            layers
        };
        let grid = if grid.size > 0.0 && grid.size.is_finite() {
            grid
        } else {
            GridSettings {
                size: DEFAULT_GRID_SIZE,
                ..grid
            }
        };
        let doc = Self {
            entities,
            layers,
            active_layer: active_layer.clone(),
            grid,
        };
        doc.with_active_layer(&active_layer)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    /// 第一个图层；文档至少有一个图层
    fn first_layer(&self) -> &Layer {
        &self.layers[0]
    }

    /// 按标识查找图层，找不到时回退到第一个图层
    pub fn resolve_layer(&self, id: &LayerId) -> &Layer {
        self.layer(id).unwrap_or_else(|| self.first_layer())
    }

    pub fn active_layer(&self) -> &Layer {
        self.resolve_layer(&self.active_layer)
    }

    pub fn active_layer_id(&self) -> &LayerId {
        &self.active_layer().id
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn grid_size(&self) -> f64 {
        self.grid.size
    }

    pub fn show_grid(&self) -> bool {
        self.grid.show
    }

    pub fn snap_to_grid(&self) -> bool {
        self.grid.snap
    }

    pub fn is_visible(&self, entity: &Entity) -> bool {
        self.resolve_layer(&entity.layer).visible
    }

    /// 所在图层可见的实体，保持绘制顺序
    pub fn visible_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(|e| self.is_visible(e))
    }

    /// 点击测试，返回最上层（最后绘制）的可见实体
    pub fn hit_test(
        &self,
        screen_point: &Point2,
        view: &ViewTransform,
        tolerance: f64,
    ) -> Option<&Entity> {
        self.entities
            .iter()
            .rev()
            .filter(|e| self.is_visible(e))
            .find(|e| e.hit_test(screen_point, view, tolerance))
    }

    /// 添加实体；标识已存在时替换原实体
    pub fn with_entity(&self, entity: Entity) -> Self {
        let mut doc = self.clone();
        match doc.entities.iter().position(|e| e.id() == entity.id()) {
            Some(index) => doc.entities[index] = entity,
            None => doc.entities.push(entity),
        }
        doc
    }

    /// 替换同标识的实体；标识不存在时返回未修改的文档
    pub fn with_replaced_entity(&self, entity: Entity) -> Self {
        self.with_entities_replaced(&entity.id().clone(), vec![entity])
    }

    pub fn without_entity(&self, id: &EntityId) -> Self {
        self.with_entities_replaced(id, Vec::new())
    }

    /// 以一组实体替换指定实体，新实体插入到原位置
    pub fn with_entities_replaced(&self, id: &EntityId, replacements: Vec<Entity>) -> Self {
        let Some(index) = self.entities.iter().position(|e| e.id() == id) else {
            tracing::warn!("Entity not found: {}", id);
            return self.clone();
        };
        let mut doc = self.clone();
        doc.entities.splice(index..=index, replacements);
        doc
    }

    /// 添加图层；标识已存在时替换
    pub fn with_layer(&self, layer: Layer) -> Self {
        let mut doc = self.clone();
        match doc.layers.iter().position(|l| l.id == layer.id) {
            Some(index) => doc.layers[index] = layer,
            None => doc.layers.push(layer),
        }
        doc
    }

    /// 删除图层；删除最后一个图层是空操作，活动图层被删除时改用剩余的第一个图层
    pub fn without_layer(&self, id: &LayerId) -> Self {
        if self.layers.len() <= 1 || self.layer(id).is_none() {
            return self.clone();
        }
        let mut doc = self.clone();
        doc.layers.retain(|l| &l.id != id);
        if &doc.active_layer == id {
            doc.active_layer = doc.first_layer().id.clone();
        }
        doc
    }

    /// 设置活动图层；标识不存在时回退到第一个图层
    pub fn with_active_layer(&self, id: &LayerId) -> Self {
        let mut doc = self.clone();
        doc.active_layer = match self.layer(id) {
            Some(layer) => layer.id.clone(),
            None => {
                tracing::warn!("Layer not found: {}, falling back to first layer", id);
                self.first_layer().id.clone()
            }
        };
        doc
    }

    /// 设置网格；非正的间距被忽略
    pub fn with_grid(&self, size: f64, show: bool, snap: bool) -> Self {
        let mut doc = self.clone();
        if size > 0.0 && size.is_finite() {
            doc.grid.size = size;
        } else {
            tracing::warn!("Ignoring invalid grid size {}", size);
        }
        doc.grid.show = show;
        doc.grid.snap = snap;
        doc
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Line};

    fn line(x: f64) -> Entity {
        Entity::new(Geometry::Line(Line::new(
            Point2::new(x, 0.0),
            Point2::new(x, 10.0),
        )))
    }

    #[test]
    fn test_new_document_has_default_layer() {
        let doc = Document::new();
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.active_layer().id, LayerId::default_layer());
        assert_eq!(doc.entity_count(), 0);
    }

    #[test]
    fn test_copy_on_write() {
        let doc = Document::new();
        let e = line(0.0);
        let doc2 = doc.with_entity(e.clone());
        assert_eq!(doc.entity_count(), 0);
        assert_eq!(doc2.entity_count(), 1);

        let moved = e.with_geometry(Geometry::Line(Line::new(
            Point2::new(5.0, 0.0),
            Point2::new(5.0, 1.0),
        )));
        let doc3 = doc2.with_replaced_entity(moved.clone());
        assert_eq!(doc3.entity(e.id()), Some(&moved));
        assert_eq!(doc2.entity(e.id()), Some(&e));
    }

    #[test]
    fn test_replace_keeps_position() {
        let a = line(0.0);
        let b = line(1.0);
        let c = line(2.0);
        let doc = Document::new()
            .with_entity(a.clone())
            .with_entity(b.clone())
            .with_entity(c.clone());
        let b1 = b.with_selected(true);
        let b2 = line(9.0);
        let doc = doc.with_entities_replaced(b.id(), vec![b1.clone(), b2.clone()]);
        let ids: Vec<_> = doc.entities().iter().map(|e| e.id().clone()).collect();
        assert_eq!(ids, vec![a.id().clone(), b1.id().clone(), b2.id().clone(), c.id().clone()]);
    }

    #[test]
    fn test_unknown_entity_is_noop() {
        let doc = Document::new().with_entity(line(0.0));
        let same = doc.without_entity(&EntityId::new("missing"));
        assert_eq!(same, doc);
    }

    #[test]
    fn test_removing_last_layer_is_noop() {
        let doc = Document::new();
        let same = doc.without_layer(&LayerId::default_layer());
        assert_eq!(same.layers().len(), 1);
    }

    #[test]
    fn test_active_layer_reassigned_on_removal() {
        let doc = Document::new()
            .with_layer(Layer::new(LayerId::new("walls"), "Walls"))
            .with_active_layer(&LayerId::new("walls"));
        assert_eq!(doc.active_layer_id(), &LayerId::new("walls"));

        let doc = doc.without_layer(&LayerId::new("walls"));
        assert_eq!(doc.active_layer_id(), &LayerId::default_layer());
    }

    #[test]
    fn test_unknown_active_layer_falls_back() {
        let doc = Document::new().with_active_layer(&LayerId::new("nope"));
        assert_eq!(doc.active_layer_id(), &LayerId::default_layer());
    }

    #[test]
    fn test_visible_entities_follow_layer_visibility() {
        let hidden = Layer::new(LayerId::new("hidden"), "Hidden").with_visible(false);
        let a = line(0.0);
        let b = line(1.0).on_layer(hidden.id.clone());
        let doc = Document::new()
            .with_layer(hidden)
            .with_entity(a.clone())
            .with_entity(b);
        let visible: Vec<_> = doc.visible_entities().map(|e| e.id().clone()).collect();
        assert_eq!(visible, vec![a.id().clone()]);
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let a = line(0.0);
        let b = line(0.0);
        let doc = Document::new().with_entity(a).with_entity(b.clone());
        let view = ViewTransform::default();
        let screen = view.world_to_screen(&Point2::new(0.0, 5.0));
        assert_eq!(doc.hit_test(&screen, &view, 1.0).map(|e| e.id()), Some(b.id()));
    }

    #[test]
    fn test_deserialize_repairs_layers_and_grid() {
        let json = r#"{
            "entities": [],
            "layers": [],
            "active_layer": "missing",
            "grid": { "size": -5.0, "show": true, "snap": true }
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.active_layer_id(), &LayerId::default_layer());
        assert_eq!(doc.grid_size(), DEFAULT_GRID_SIZE);
        assert!(doc.snap_to_grid());
    }

    #[test]
    fn test_serde_round_trip() {
        let doc = Document::new()
            .with_layer(Layer::new(LayerId::new("walls"), "Walls"))
            .with_active_layer(&LayerId::new("walls"))
            .with_entity(line(3.0));
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_invalid_grid_size_ignored() {
        let doc = Document::new().with_grid(-1.0, false, true);
        assert_eq!(doc.grid_size(), DEFAULT_GRID_SIZE);
        assert!(doc.snap_to_grid());
        assert!(!doc.show_grid());
    }
}
