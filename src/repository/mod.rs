//! Resource repositories.
//!
//! One generic [`Repository`] per resource type turns typed drafts into
//! store rows and classifies store failures into [`crate::error::SyncError`].

mod resource;
mod rows;


pub use resource::{Authored, Resource};
pub use rows::{patch, Repository};
