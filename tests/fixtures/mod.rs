//! Test fixtures and mock implementations for integration testing

use pulseball::error::Result;
use pulseball::storage::MockStorage;
use pulseball::render::Renderer;
use pulseball::{MatchProcessor, RankingStore, Rankings, StandingEntry};
use std::sync::{Arc, Mutex};

/// Mock renderer that captures every table it is asked to draw
#[derive(Debug, Default)]
pub struct MockRenderer {
    renders: Arc<Mutex<Vec<Rankings>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all rendered snapshots (for testing)
    pub fn get_renders(&self) -> Vec<Rankings> {
        self.renders
            .lock()
            .map(|renders| renders.clone())
            .unwrap_or_default()
    }

    pub fn render_count(&self) -> usize {
        self.get_renders().len()
    }

    pub fn last_render(&self) -> Option<Rankings> {
        self.get_renders().pop()
    }
}

impl Renderer for MockRenderer {
    fn render(&self, rankings: &[StandingEntry]) -> Result<()> {
        if let Ok(mut renders) = self.renders.lock() {
            renders.push(rankings.to_vec());
        }
        Ok(())
    }
}

/// Store wired to recording collaborators
pub fn create_test_store() -> (RankingStore, Arc<MockStorage>, Arc<MockRenderer>) {
    let storage = Arc::new(MockStorage::new());
    let renderer = Arc::new(MockRenderer::new());

    let store = RankingStore::new(
        storage.clone(),
        renderer.clone(),
        MatchProcessor::default(),
    )
    .unwrap();

    (store, storage, renderer)
}

/// Team names in table order
pub fn names(rankings: &[StandingEntry]) -> Vec<&str> {
    rankings.iter().map(|e| e.team.name.as_str()).collect()
}
