//! Domain module
pub mod events;
pub mod stock;
pub mod value_objects;
