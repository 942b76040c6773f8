pub mod content_map;
pub mod project;

pub use content_map::ContentMap;
pub use project::{GenerationRequest, ProjectData};
