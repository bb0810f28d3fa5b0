//! Tera implementation of the template rendering port.

use tera::{Context, Tera};

use quill_core::ports::{RenderError, TemplateRenderer};

/// Tera-backed renderer. Templates are loaded once at startup from a glob.
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Load every template matching the glob, e.g. `templates/**/*.html`.
    pub fn from_glob(glob: &str) -> Result<Self, RenderError> {
        let tera = Tera::new(glob).map_err(|e| RenderError::Template(e.to_string()))?;

        tracing::info!(
            templates = tera.get_template_names().count(),
            "Templates loaded"
        );

        Ok(Self { tera })
    }
}

impl From<Tera> for TeraRenderer {
    fn from(tera: Tera) -> Self {
        Self { tera }
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, view: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let context =
            Context::from_serialize(data).map_err(|e| RenderError::Context(e.to_string()))?;

        self.tera
            .render(view, &context)
            .map_err(|e| RenderError::Template(e.to_string()))
    }
}
