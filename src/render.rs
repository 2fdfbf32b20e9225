use askama::Template;
use chrono::{DateTime, Local};
use thiserror::Error;

use crate::item::DisplayItem;

#[derive(Debug, Error)]
#[error("failed to render page: {0}")]
pub struct RenderError(#[from] askama::Error);

#[derive(Template)]
#[template(path = "index.html")]
pub struct PageTemplate {
    pub title: String,
    pub generated_at: String,
    pub items: Vec<DisplayItem>,
}

impl PageTemplate {
    pub fn new(title: impl Into<String>, items: Vec<DisplayItem>) -> Self {
        Self::with_timestamp(title, items, Local::now())
    }

    pub fn with_timestamp(
        title: impl Into<String>,
        items: Vec<DisplayItem>,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at: at.format("%Y-%m-%d %H:%M").to_string(),
            items,
        }
    }
}

/// Renders the complete HTML document.
pub fn render(page: &PageTemplate) -> Result<String, RenderError> {
    Ok(page.render()?)
}
