//! Ranking store: owns the table, persists it and keeps the renderer current
//!
//! The store is constructed once at startup. If the storage provider already
//! holds a table under the configured key, that table becomes the initial state.

use crate::config::{AppConfig, StorageBackend, DEFAULT_STORAGE_KEY};
use crate::error::{RankingError, Result};
use crate::rating::calculator::MarginPointsCalculator;
use crate::storage::{FileStorage, InMemoryStorage, StorageProvider};
use crate::ranking::processor::MatchProcessor;
use crate::render::{HtmlTableRenderer, Renderer};
use crate::types::{MatchApplication, MatchRecord, Rankings, StandingEntry, TeamId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Owns the rankings table and its collaborators
pub struct RankingStore {
    rankings: Rankings,
    storage: Arc<dyn StorageProvider>,
    renderer: Arc<dyn Renderer>,
    processor: MatchProcessor,
    storage_key: String,
}

impl RankingStore {
    /// Create a store under the default key, restoring any persisted table
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        renderer: Arc<dyn Renderer>,
        processor: MatchProcessor,
    ) -> Result<Self> {
        Self::with_key(storage, renderer, processor, DEFAULT_STORAGE_KEY)
    }

    /// Create a store persisting under `key`, restoring any persisted table
    pub fn with_key(
        storage: Arc<dyn StorageProvider>,
        renderer: Arc<dyn Renderer>,
        processor: MatchProcessor,
        key: impl Into<String>,
    ) -> Result<Self> {
        let mut store = Self {
            rankings: Vec::new(),
            storage,
            renderer,
            processor,
            storage_key: key.into(),
        };
        store.load_persisted()?;
        Ok(store)
    }

    /// Build the store and its collaborators from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let storage: Arc<dyn StorageProvider> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
            StorageBackend::File => Arc::new(FileStorage::new(&config.storage.directory)),
        };
        let renderer = Arc::new(HtmlTableRenderer::new(&config.render));
        let calculator = Arc::new(MarginPointsCalculator::new(config.rating.clone())?);

        Self::with_key(
            storage,
            renderer,
            MatchProcessor::new(calculator),
            config.storage.key.clone(),
        )
    }

    fn load_persisted(&mut self) -> Result<()> {
        let Some(raw) = self.storage.get(&self.storage_key)? else {
            debug!("No persisted rankings under '{}'", self.storage_key);
            return Ok(());
        };

        let rankings: Rankings =
            serde_json::from_str(&raw).map_err(|e| RankingError::Serialization {
                message: format!(
                    "Persisted rankings under '{}' are unreadable: {}",
                    self.storage_key, e
                ),
            })?;

        validate_rankings(&rankings).map_err(|e| RankingError::Serialization {
            message: format!(
                "Persisted rankings under '{}' are invalid: {}",
                self.storage_key, e
            ),
        })?;
        warn_on_position_mismatch(&rankings);

        info!(
            "Restored {} ranking entries from '{}'",
            rankings.len(),
            self.storage_key
        );
        self.rankings = rankings;
        self.render();
        Ok(())
    }

    /// Replace the table with `rankings`, persist it and return the stored list
    pub fn initialize(&mut self, rankings: Rankings) -> Result<&[StandingEntry]> {
        validate_rankings(&rankings)?;
        warn_on_position_mismatch(&rankings);

        self.persist(&rankings)?;
        self.rankings = rankings;

        info!("Initialized rankings with {} teams", self.rankings.len());
        for entry in &self.rankings {
            debug!("  {:>3}. {} {}", entry.position, entry.team.name, entry.points);
        }

        self.render();
        Ok(&self.rankings)
    }

    /// Current table, highest points first
    pub fn rankings(&self) -> &[StandingEntry] {
        &self.rankings
    }

    /// Look up one team's row
    pub fn entry(&self, team_id: TeamId) -> Option<&StandingEntry> {
        self.rankings.iter().find(|entry| entry.team.id == team_id)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Apply a match to the table
    ///
    /// Rejected matches are logged and returned as errors; the table, the
    /// persisted copy and the rendered view are left untouched.
    pub fn apply_match(&mut self, record: &MatchRecord) -> Result<MatchApplication> {
        let mut working = self.rankings.clone();

        let application = match self.processor.process(&mut working, record) {
            Ok(application) => application,
            Err(e) => {
                log_rejection(record, &e);
                return Err(e);
            }
        };

        if let MatchApplication::Updated {
            team_a, team_b, ..
        } = &application
        {
            self.persist(&working)?;
            self.rankings = working;

            info!(
                "Applied match {}: team {} {} -> {} (pos {}), team {} {} -> {} (pos {})",
                record.label(),
                team_a.team_id,
                team_a.old_points,
                team_a.new_points,
                team_a.new_position,
                team_b.team_id,
                team_b.old_points,
                team_b.new_points,
                team_b.new_position
            );

            self.render();
        }

        Ok(application)
    }

    fn persist(&self, rankings: &[StandingEntry]) -> Result<()> {
        let raw = serde_json::to_string(rankings).map_err(|e| RankingError::Serialization {
            message: format!("Failed to serialize rankings: {}", e),
        })?;

        self.storage.set(&self.storage_key, &raw)?;
        debug!(
            "Persisted {} ranking entries under '{}'",
            rankings.len(),
            self.storage_key
        );
        Ok(())
    }

    fn render(&self) {
        if let Err(e) = self.renderer.render(&self.rankings) {
            warn!("Failed to render rankings: {}", e);
        }
    }
}

/// Reject tables that break the one-row-per-team invariant or carry unusable points
pub fn validate_rankings(rankings: &[StandingEntry]) -> Result<()> {
    let mut seen = HashSet::new();

    for entry in rankings {
        if !seen.insert(entry.team.id) {
            return Err(RankingError::InvalidRankings {
                reason: format!("team {} appears more than once", entry.team.id),
            }
            .into());
        }

        if !entry.points.is_finite() {
            return Err(RankingError::InvalidRankings {
                reason: format!("team {} has non-finite points", entry.team.id),
            }
            .into());
        }
    }

    Ok(())
}

fn warn_on_position_mismatch(rankings: &[StandingEntry]) {
    for (index, entry) in rankings.iter().enumerate() {
        if entry.position as usize != index + 1 {
            warn!(
                "Team {} is listed at index {} with position {}",
                entry.team, index, entry.position
            );
        }
    }
}

fn log_rejection(record: &MatchRecord, err: &anyhow::Error) {
    match err.downcast_ref::<RankingError>() {
        Some(e) if e.is_warning() => warn!("Match {} not applied: {}", record.label(), e),
        _ => error!("Match {} rejected: {}", record.label(), err),
    }
}

/// Thread-safe handle around a [`RankingStore`]
///
/// Each call holds the lock for the whole read-modify-write, so concurrent
/// matches are applied one at a time.
#[derive(Clone)]
pub struct SharedRankingStore {
    inner: Arc<Mutex<RankingStore>>,
}

impl SharedRankingStore {
    pub fn new(store: RankingStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RankingStore>> {
        self.inner.lock().map_err(|_| {
            RankingError::InternalError {
                message: "Failed to acquire ranking store lock".to_string(),
            }
            .into()
        })
    }

    pub fn initialize(&self, rankings: Rankings) -> Result<Rankings> {
        let mut store = self.lock()?;
        Ok(store.initialize(rankings)?.to_vec())
    }

    pub fn apply_match(&self, record: &MatchRecord) -> Result<MatchApplication> {
        self.lock()?.apply_match(record)
    }

    /// Snapshot of the current table
    pub fn rankings(&self) -> Result<Rankings> {
        Ok(self.lock()?.rankings().to_vec())
    }
}
