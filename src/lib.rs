//! Load job listing exports, normalize them, and filter/sort them.
//!
//! Data flows `load` -> `normalizer` (with `posted`) -> `store` -> `query`,
//! and the result is handed to a `render::Presenter`. `session` drives that
//! pipeline from user events.

pub mod config;
pub mod error;
pub mod load;
pub mod normalizer;
pub mod posted;
pub mod query;
pub mod record;
pub mod render;
pub mod session;
pub mod store;
