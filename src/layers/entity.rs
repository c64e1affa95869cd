//! Entities placed on the map (buildings, units, props).

use crate::core::geo::{Point, TileCoord};
use serde::{Deserialize, Serialize};

/// One placed instance of a sprite asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique per instance
    pub id: String,
    /// Asset code of the sprite sheet used to draw it
    pub code: u32,
    /// Tile the entity stands on
    pub anchor: TileCoord,
    /// Footprint in tiles (rows, cols)
    #[serde(default = "Entity::unit_size")]
    pub size: (u32, u32),
    /// Pixel nudge to seat the artwork on its anchor
    #[serde(default)]
    pub offset_px: Point,
    /// Animation to play, `None` for the sheet default
    #[serde(default)]
    pub animation: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, code: u32, anchor: TileCoord) -> Self {
        Self {
            id: id.into(),
            code,
            anchor,
            size: Self::unit_size(),
            offset_px: Point::default(),
            animation: None,
        }
    }

    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset_px = Point::new(dx, dy);
        self
    }

    /// Footprint of `rows` x `cols` tiles extending down and right from
    /// the anchor
    pub fn with_size(mut self, rows: u32, cols: u32) -> Self {
        self.size = (rows, cols);
        self
    }

    fn unit_size() -> (u32, u32) {
        (1, 1)
    }

    /// Tile of the footprint nearest the viewer. A zero size counts as one.
    pub fn front(&self) -> TileCoord {
        let extent = |tiles: u32| i32::try_from(tiles.max(1) - 1).unwrap_or(i32::MAX);
        TileCoord::new(
            self.anchor.row.saturating_add(extent(self.size.0)),
            self.anchor.col.saturating_add(extent(self.size.1)),
        )
    }

    pub fn covers(&self, tile: TileCoord) -> bool {
        let front = self.front();
        (self.anchor.row..=front.row).contains(&tile.row) && (self.anchor.col..=front.col).contains(&tile.col)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityLayer {
    entities: Vec<Entity>,
}

impl EntityLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace by id; returns the replaced entity
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        match self.entities.iter_mut().find(|existing| existing.id == entity.id) {
            Some(existing) => Some(std::mem::replace(existing, entity)),
            None => {
                self.entities.push(entity);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Entities whose footprint covers `tile`
    pub fn at(&self, tile: TileCoord) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |entity| entity.covers(tile))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    /// Back-to-front draw order keyed on each footprint's front tile: by
    /// depth (row + col), then row, then id
    pub fn painter_order(&self) -> Vec<&Entity> {
        let mut ordered: Vec<&Entity> = self.entities.iter().collect();
        ordered.sort_by_cached_key(|entity| {
            let front = entity.front();
            (front.depth(), front.row, entity.id.clone())
        });
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_painter_order() {
        let mut layer = EntityLayer::new();
        layer.insert(Entity::new("front", 1, TileCoord::new(3, 3)));
        layer.insert(Entity::new("b", 1, TileCoord::new(1, 0)));
        layer.insert(Entity::new("a", 1, TileCoord::new(0, 1)));
        layer.insert(Entity::new("back", 1, TileCoord::new(0, 0)));
        layer.insert(Entity::new("c", 1, TileCoord::new(1, 0)));

        let ids: Vec<&str> = layer.painter_order().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["back", "a", "b", "c", "front"]);
    }

    #[test]
    fn test_large_footprint_sorts_by_front_tile() {
        let mut layer = EntityLayer::new();
        let barn = Entity::new("barn", 1, TileCoord::new(0, 0)).with_size(2, 2);
        assert_eq!(barn.front(), TileCoord::new(1, 1));
        layer.insert(barn);
        layer.insert(Entity::new("cart", 1, TileCoord::new(0, 2)));
        layer.insert(Entity::new("well", 1, TileCoord::new(2, 2)));

        // the cart's tile is behind the barn's front corner
        let ids: Vec<&str> = layer.painter_order().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["cart", "barn", "well"]);

        assert_eq!(layer.at(TileCoord::new(1, 0)).next().map(|e| e.id.as_str()), Some("barn"));
        assert_eq!(layer.at(TileCoord::new(2, 1)).count(), 0);
    }

    #[test]
    fn test_zero_size_counts_as_one_tile() {
        let shed = Entity::new("shed", 1, TileCoord::new(4, 4)).with_size(0, 3);
        assert_eq!(shed.front(), TileCoord::new(4, 6));
        assert!(shed.covers(TileCoord::new(4, 5)));
        assert!(!shed.covers(TileCoord::new(5, 4)));
    }

    #[test]
    fn test_insert_replaces_by_id() {
        let mut layer = EntityLayer::new();
        assert!(layer.insert(Entity::new("tree", 1, TileCoord::new(0, 0))).is_none());
        let old = layer.insert(Entity::new("tree", 2, TileCoord::new(1, 1))).unwrap();
        assert_eq!(old.code, 1);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.at(TileCoord::new(1, 1)).count(), 1);
        assert!(layer.remove("tree").is_some());
        assert!(layer.remove("tree").is_none());
    }

    #[test]
    fn test_entity_json_defaults() {
        let entity: Entity =
            serde_json::from_str(r#"{ "id": "house-1", "code": 12, "anchor": { "row": 2, "col": 4 } }"#).unwrap();
        assert_eq!(entity.size, (1, 1));
        assert_eq!(entity.offset_px, Point::default());
        assert!(entity.animation.is_none());
    }
}
