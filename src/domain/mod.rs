pub mod collision;
pub mod entity;
pub mod field;
pub mod physics;
