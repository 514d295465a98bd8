//! Skilldeck -- Local Skill Catalog and Dashboard
//!
//! Catalogs skill packages (directories holding a `SKILL.md` manifest and a
//! `references/` folder) under configured search paths, tracks their
//! metadata sidecars, and drives batch runs of the external quality-checker
//! and updater tools.

pub mod bulk;
pub mod config;
pub mod manager;
pub mod skills;
pub mod ui;
