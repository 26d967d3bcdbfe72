use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::credential::CredentialHolder;
use crate::models::career::CareerRecommendation;
use crate::models::profile::Profile;
use crate::models::question::Question;
use crate::quiz::countdown::CountdownHandle;
use crate::quiz::runner::{QuizOutcome, QuizRunner};

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Credential,
    Profile,
    Quiz,
    Results,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Credential => "credential",
            WizardStep::Profile => "profile",
            WizardStep::Quiz => "quiz",
            WizardStep::Results => "results",
        };
        f.write_str(name)
    }
}

/// Everything one student's run through the wizard holds in memory.
/// Fields are crate-visible so the controller can drive transitions.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub(crate) step: WizardStep,
    pub(crate) credential: CredentialHolder,
    pub(crate) profile: Option<Profile>,
    pub(crate) questions: Vec<Question>,
    pub(crate) runner: Option<Arc<Mutex<QuizRunner>>>,
    pub(crate) countdown: Option<CountdownHandle>,
    pub(crate) outcome: Option<QuizOutcome>,
    pub(crate) recommendations: Vec<CareerRecommendation>,
    /// A generation call is outstanding; submissions are refused meanwhile.
    pub(crate) generating: bool,
    pub(crate) notice: Option<String>,
    /// Bumped on restart so late generation results from before it are dropped.
    pub(crate) epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            step: WizardStep::Credential,
            credential: CredentialHolder::new(),
            profile: None,
            questions: Vec::new(),
            runner: None,
            countdown: None,
            outcome: None,
            recommendations: Vec::new(),
            generating: false,
            notice: None,
            epoch: 0,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn has_credential(&self) -> bool {
        self.credential.has_credential()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    pub fn recommendations(&self) -> &[CareerRecommendation] {
        &self.recommendations
    }

    /// Drops per-run state. The credential survives.
    pub(crate) fn reset_run(&mut self) {
        // dropping the handle aborts the ticker; dropping the runner closes
        // the completion channel so its watcher exits
        self.countdown = None;
        self.runner = None;
        self.profile = None;
        self.questions.clear();
        self.outcome = None;
        self.recommendations.clear();
        self.generating = false;
        self.notice = None;
        self.epoch += 1;
    }

    pub fn view(&self, backend: &'static str) -> SessionView {
        SessionView {
            session_id: self.id,
            created_at: self.created_at,
            step: self.step(),
            has_credential: self.has_credential(),
            generating: self.is_generating(),
            notice: self.notice().map(str::to_string),
            backend,
            profile: self.profile().cloned(),
            score: self.outcome().map(|o| o.score),
            total_questions: self.questions().len(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot returned by `GET /api/v1/sessions/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub step: WizardStep,
    pub has_credential: bool,
    pub generating: bool,
    pub notice: Option<String>,
    pub backend: &'static str,
    pub profile: Option<Profile>,
    pub score: Option<u32>,
    pub total_questions: usize,
}
