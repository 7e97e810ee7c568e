//! HTML table renderer

use crate::config::RenderSettings;
use crate::error::{RankingError, Result};
use crate::render::Renderer;
use crate::types::StandingEntry;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::debug;

/// Element id of the rendered table
pub const TABLE_ID: &str = "rankings-table";

/// Renders rankings as an HTML table, one row per team
#[derive(Debug)]
pub struct HtmlTableRenderer {
    output_path: Option<PathBuf>,
    highlight_top: usize,
    highlight_class: String,
    last_output: RwLock<Option<String>>,
}

impl HtmlTableRenderer {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            output_path: settings.output_path.clone(),
            highlight_top: settings.highlight_top,
            highlight_class: settings.highlight_class.clone(),
            last_output: RwLock::new(None),
        }
    }

    /// The most recently rendered document, if any
    pub fn last_output(&self) -> Option<String> {
        self.last_output
            .read()
            .map(|output| output.clone())
            .unwrap_or_default()
    }

    /// Build the table markup without writing it anywhere
    pub fn render_to_string(&self, rankings: &[StandingEntry]) -> String {
        let mut html = String::new();
        let _ = writeln!(html, "<table id=\"{}\">", TABLE_ID);
        html.push_str("  <thead><tr><th>Pos</th><th>Team</th><th>Pts</th></tr></thead>\n");
        html.push_str("  <tbody>\n");

        for (index, entry) in rankings.iter().enumerate() {
            let class = if index < self.highlight_top {
                format!(" class=\"{}\"", html_escape::encode_double_quoted_attribute(&self.highlight_class))
            } else {
                String::new()
            };

            let _ = writeln!(
                html,
                "    <tr{}><td>{}</td><td>{}</td><td>{}</td></tr>",
                class,
                entry.position,
                html_escape::encode_text(&entry.team.name),
                entry.points
            );
        }

        html.push_str("  </tbody>\n</table>\n");
        html
    }
}

impl Default for HtmlTableRenderer {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}

impl Renderer for HtmlTableRenderer {
    fn render(&self, rankings: &[StandingEntry]) -> Result<()> {
        let html = self.render_to_string(rankings);

        if let Some(path) = &self.output_path {
            std::fs::write(path, &html).map_err(|e| RankingError::InternalError {
                message: format!("Failed to write rankings table to {}: {}", path.display(), e),
            })?;
            debug!("Rendered {} rows to {}", rankings.len(), path.display());
        }

        if let Ok(mut last) = self.last_output.write() {
            *last = Some(html);
        }

        Ok(())
    }
}
