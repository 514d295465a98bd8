//! Skill catalog: per-skill views, directory discovery, and the registry.

pub mod discovery;
pub mod info;
pub mod registry;
