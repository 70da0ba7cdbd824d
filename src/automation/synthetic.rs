use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{AutomationEngine, AutomationError};
use crate::config::AutomationConfig;
use crate::credentials::CredentialHasher;
use crate::models::{ProfileDraft, ProfileSeed};

/// Local engine that fabricates drafts from the seed without any network I/O.
///
/// Each attempt opens a session guard that is released on every exit path,
/// including when the caller drops the attempt mid-flight.
#[derive(Debug, Clone)]
pub struct SyntheticEngine {
    config: AutomationConfig,
    hasher: CredentialHasher,
    open_sessions: Arc<AtomicUsize>,
}

impl SyntheticEngine {
    pub fn new(config: AutomationConfig) -> Self {
        Self {
            config,
            hasher: CredentialHasher::new(),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sessions currently held by in-flight attempts
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    fn build_draft(&self, seed: &ProfileSeed) -> Result<ProfileDraft, AutomationError> {
        let Some((local, _)) = seed.email_hint.split_once('@') else {
            return Err(AutomationError::UnexpectedPageState(format!(
                "email hint rejected: {}",
                seed.email_hint
            )));
        };

        let profile_base = self.config.profile_base_url.trim_end_matches('/');
        let media_base = self.config.media_base_url.trim_end_matches('/');

        Ok(ProfileDraft {
            email: seed.email_hint.clone(),
            profile_url: format!("{profile_base}/{local}"),
            avatar_url: format!("{media_base}/avatars/{local}.jpg"),
            cover_url: format!("{media_base}/covers/{local}.jpg"),
            raw_password: self
                .config
                .supply_password
                .then(|| self.hasher.generate_secure_password()),
        })
    }
}

#[async_trait]
impl AutomationEngine for SyntheticEngine {
    #[instrument(skip(self, seed), fields(engine = "synthetic", headless = self.config.headless))]
    async fn attempt(&self, seed: &ProfileSeed) -> Result<ProfileDraft, AutomationError> {
        let _session = SessionGuard::open(self.open_sessions.clone());

        if self.config.simulated_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.simulated_latency_ms)).await;
        }

        self.build_draft(seed)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

struct SessionGuard {
    open_sessions: Arc<AtomicUsize>,
}

impl SessionGuard {
    fn open(open_sessions: Arc<AtomicUsize>) -> Self {
        open_sessions.fetch_add(1, Ordering::SeqCst);
        debug!("Automation session opened");
        Self { open_sessions }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        debug!("Automation session released");
    }
}
