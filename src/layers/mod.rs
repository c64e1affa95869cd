pub mod entity;
pub mod ground;

pub use entity::{Entity, EntityLayer};
pub use ground::{AppliedStroke, GroundLayer, TileStack};
