//! Template rendering with Tera

use anyhow::Result;
use tera::{Context, Tera};
use tracing::debug;

/// Immutable template registry, built once at startup
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("../templates/layout.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("results.html", include_str!("../templates/results.html")),
        ])?;

        let templates = Self { tera };
        debug!("Loaded templates: {:?}", templates.names());
        Ok(templates)
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }

    /// Names of all registered templates
    pub fn names(&self) -> Vec<&str> {
        self.tera.get_template_names().collect()
    }
}
