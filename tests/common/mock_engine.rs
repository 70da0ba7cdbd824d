use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use profile_provisioner::automation::{AutomationEngine, AutomationError};
use profile_provisioner::models::{ProfileDraft, ProfileSeed};

/// What one `attempt` call does
#[derive(Debug, Clone)]
pub enum Behaviour {
    Succeed,
    /// Succeed with the given raw password
    SucceedWithPassword(String),
    Fail(AutomationError),
    /// Sleep, then succeed
    Delay(Duration),
    /// Succeed with an empty email
    Incomplete,
    Panic,
}

/// Engine that plays back one behaviour per call, in call order.
///
/// Calls past the end of the script use the fallback behaviour. Emails are
/// unique per call so stores never see duplicates by accident.
#[derive(Debug)]
pub struct ScriptedEngine {
    script: Vec<Behaviour>,
    fallback: Behaviour,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(script: Vec<Behaviour>) -> Self {
        Self {
            script,
            fallback: Behaviour::Succeed,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn always(behaviour: Behaviour) -> Self {
        Self {
            script: Vec::new(),
            fallback: behaviour,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Attempts that ran to their end without being dropped
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn draft(call: usize, password: Option<String>) -> ProfileDraft {
        ProfileDraft {
            email: format!("user{call}@example.com"),
            profile_url: format!("https://profiles.example.com/user{call}"),
            avatar_url: format!("https://media.example.com/avatars/user{call}.jpg"),
            cover_url: format!("https://media.example.com/covers/user{call}.jpg"),
            raw_password: password,
        }
    }
}

#[async_trait]
impl AutomationEngine for ScriptedEngine {
    async fn attempt(&self, _seed: &ProfileSeed) -> Result<ProfileDraft, AutomationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let behaviour = self
            .script
            .get(call)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());

        let result = match behaviour {
            Behaviour::Succeed => Ok(Self::draft(call, None)),
            Behaviour::SucceedWithPassword(password) => Ok(Self::draft(call, Some(password))),
            Behaviour::Fail(error) => Err(error),
            Behaviour::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(Self::draft(call, None))
            }
            Behaviour::Incomplete => {
                let mut draft = Self::draft(call, None);
                draft.email.clear();
                Ok(draft)
            }
            Behaviour::Panic => panic!("scripted engine panic on call {call}"),
        };

        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
