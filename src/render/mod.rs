//! Rendering of the rankings table
//!
//! Renderers consume a read-only snapshot of the rankings. Nothing in the
//! ranking logic ever reads rendering state back.

pub mod html;

pub use html::HtmlTableRenderer;

use crate::error::Result;
use crate::types::StandingEntry;

/// Trait for anything that displays the current rankings
pub trait Renderer: Send + Sync {
    /// Render the full table; called after every persisted change
    fn render(&self, rankings: &[StandingEntry]) -> Result<()>;
}

/// Renderer that discards its input, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _rankings: &[StandingEntry]) -> Result<()> {
        Ok(())
    }
}
