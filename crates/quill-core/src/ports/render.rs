//! Template rendering port. The engine behind it is an external collaborator;
//! handlers only ever see `render(view, data) -> markup`.

/// Renders a named view with a JSON context into markup.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, view: &str, data: &serde_json::Value) -> Result<String, RenderError>;
}

/// Rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid template context: {0}")]
    Context(String),
}
