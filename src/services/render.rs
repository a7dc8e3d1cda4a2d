//! HTML rendering
//!
//! Thin wrapper over Tera with the site templates embedded in the binary,
//! so the deployed artifact is a single executable with no template
//! directory to ship alongside it.

use anyhow::{Context as _, Result};
use serde::Serialize;
use tera::Tera;

/// Template engine with the site templates preloaded
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create the engine and register all embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("index.html", include_str!("../../templates/index.html")),
            (
                "post-details.html",
                include_str!("../../templates/post-details.html"),
            ),
            (
                "posts-list.html",
                include_str!("../../templates/posts-list.html"),
            ),
            ("contacts.html", include_str!("../../templates/contacts.html")),
        ])
        .context("Failed to register templates")?;

        Ok(Self { tera })
    }

    /// Render a template with the given serializable context
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let context = tera::Context::from_serialize(data)
            .with_context(|| format!("Failed to build context for template {}", template))?;
        self.tera
            .render(template, &context)
            .with_context(|| format!("Failed to render template {}", template))
    }

}
