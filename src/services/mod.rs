//! Business logic layer

pub mod context;
pub mod pages;
pub mod render;

pub use pages::{PageError, PageService};
pub use render::TemplateEngine;
