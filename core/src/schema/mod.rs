//! Entity descriptors and the association registry.

mod association;
mod entity;
mod namespace;
mod registry;

pub use association::{Association, AssociationKind};
pub use entity::{Attribute, DEFAULT_PRIMARY_KEY, Entity, EntityBuilder};
pub use namespace::Namespace;
pub use registry::Registry;
