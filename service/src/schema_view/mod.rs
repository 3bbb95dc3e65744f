//! SchemaView - introspection of LinkML schemas
//!
//! Resolves class ancestry, class slots and induced slots over a schema with
//! its imports merged, the way template analysis needs them.

pub mod navigation;
pub mod view;

pub use navigation::{NavigationCache, SlotResolution};
pub use view::{SchemaView, SchemaViewError};
