//! Wizard Controller: drives one session through
//! `credential → profile → quiz → results → (restart) profile`.
//!
//! Generation calls run without holding the session lock. The `generating`
//! flag refuses duplicate submissions while one is outstanding, and the
//! session epoch discards results that land after a restart.
//!
//! Lock order is always session → runner. The countdown task only takes the
//! runner lock, and quiz completion reaches the controller through a oneshot
//! channel, so neither path ever waits on the session while holding the runner.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};

use crate::credential::check_token_shape;
use crate::errors::AppError;
use crate::generation::generator::Generator;
use crate::models::question::Question;
use crate::profile::collector::ProfileCollector;
use crate::quiz::countdown::{spawn_countdown, TICK_PERIOD};
use crate::quiz::runner::{QuizOutcome, QuizRunner, QuizView};
use crate::results::ResultsView;
use crate::wizard::session::{Session, SessionHandle, SessionView, WizardStep};

#[derive(Clone)]
pub struct Wizard {
    generator: Arc<dyn Generator>,
    credential_prefix: String,
    quiz_duration_secs: u32,
    tick_period: Duration,
}

impl Wizard {
    pub fn new(
        generator: Arc<dyn Generator>,
        credential_prefix: String,
        quiz_duration_secs: u32,
    ) -> Self {
        Self {
            generator,
            credential_prefix,
            quiz_duration_secs,
            tick_period: TICK_PERIOD,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.generator.backend()
    }

    pub async fn view(&self, session: &SessionHandle) -> SessionView {
        session.lock().await.view(self.backend())
    }

    // ────────────────────────────────────────────────────────────────────
    // credential
    // ────────────────────────────────────────────────────────────────────

    /// Shape-checks and stores the token. Allowed at any step so a student can
    /// replace a rejected token; only the first acceptance moves the wizard on.
    pub async fn accept_credential(
        &self,
        session: &SessionHandle,
        raw_token: &str,
    ) -> Result<(), AppError> {
        let token = check_token_shape(raw_token, &self.credential_prefix)?;
        let mut s = session.lock().await;
        s.credential.set(token);
        if s.step == WizardStep::Credential {
            s.step = WizardStep::Profile;
        }
        info!("Session {}: credential accepted", s.id);
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────
    // profile → quiz
    // ────────────────────────────────────────────────────────────────────

    /// Generates the quiz for a complete profile and starts it. On failure the
    /// session stays at the profile step with the error as its notice.
    pub async fn submit_profile(
        &self,
        session: &SessionHandle,
        collector: ProfileCollector,
    ) -> Result<(), AppError> {
        let Some(profile) = collector.submit() else {
            return Err(AppError::Validation(
                "Please fill in your name, age, grade, at least one interest, and at least one subject mark."
                    .to_string(),
            ));
        };

        let (credential, epoch) = {
            let mut s = session.lock().await;
            expect_step(&s, WizardStep::Profile)?;
            begin_generation(&mut s)?;
            (s.credential.clone(), s.epoch)
        };

        info!("Generating quiz via {} backend", self.backend());
        let result = self
            .generator
            .generate_questions(&credential, &profile.interests, &profile.marks)
            .await;

        let mut s = session.lock().await;
        if s.epoch != epoch {
            return Err(AppError::Conflict(
                "session was restarted while the quiz was being generated".to_string(),
            ));
        }
        s.generating = false;

        let questions = match result {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Session {}: quiz generation failed: {e}", s.id);
                if e.is_generation_failure() {
                    s.notice = Some(e.to_string());
                }
                return Err(e);
            }
        };

        self.start_quiz(session, &mut s, questions)?;
        s.profile = Some(profile);
        Ok(())
    }

    fn start_quiz(
        &self,
        handle: &SessionHandle,
        s: &mut Session,
        questions: Vec<Question>,
    ) -> Result<(), AppError> {
        let (tx, rx) = oneshot::channel::<QuizOutcome>();
        let runner = QuizRunner::new(
            questions.clone(),
            self.quiz_duration_secs,
            Box::new(move |outcome| {
                // receiver is gone only if the session was reset or removed
                let _ = tx.send(outcome);
            }),
        )?;
        let runner = Arc::new(Mutex::new(runner));

        s.countdown = Some(spawn_countdown(Arc::clone(&runner), self.tick_period));
        s.runner = Some(runner);
        s.questions = questions;
        s.outcome = None;
        s.recommendations.clear();
        s.notice = None;
        s.step = WizardStep::Quiz;

        self.spawn_completion_watcher(Arc::downgrade(handle), rx, s.epoch);
        info!(
            "Session {}: quiz started with {} questions, {}s on the clock",
            s.id,
            s.questions.len(),
            self.quiz_duration_secs
        );
        Ok(())
    }

    /// Waits for the quiz to complete (manually or by timeout) and requests
    /// recommendations. Holds only a weak reference so a removed session is
    /// not kept alive.
    fn spawn_completion_watcher(
        &self,
        session: Weak<Mutex<Session>>,
        rx: oneshot::Receiver<QuizOutcome>,
        epoch: u64,
    ) {
        let wizard = self.clone();
        tokio::spawn(async move {
            let Ok(outcome) = rx.await else {
                return;
            };
            let Some(session) = session.upgrade() else {
                return;
            };
            {
                let mut s = session.lock().await;
                if s.epoch != epoch {
                    return;
                }
                s.outcome = Some(outcome);
                s.countdown = None;
            }
            // failures are already recorded as the session notice
            let _ = wizard.generate_results(&session, epoch).await;
        });
    }

    // ────────────────────────────────────────────────────────────────────
    // quiz
    // ────────────────────────────────────────────────────────────────────

    async fn runner(&self, session: &SessionHandle) -> Result<Arc<Mutex<QuizRunner>>, AppError> {
        let s = session.lock().await;
        expect_step(&s, WizardStep::Quiz)?;
        s.runner
            .clone()
            .ok_or_else(|| AppError::Conflict("no quiz in progress".to_string()))
    }

    pub async fn quiz_view(&self, session: &SessionHandle) -> Result<QuizView, AppError> {
        let runner = self.runner(session).await?;
        let view = runner.lock().await.view();
        Ok(view)
    }

    pub async fn select_option(
        &self,
        session: &SessionHandle,
        option: &str,
    ) -> Result<QuizView, AppError> {
        let runner = self.runner(session).await?;
        let mut r = runner.lock().await;
        r.select_option(option)?;
        Ok(r.view())
    }

    /// Moves to the next question. Completing the last one hands the outcome
    /// to the completion watcher, which requests recommendations.
    pub async fn advance(&self, session: &SessionHandle) -> Result<QuizView, AppError> {
        let runner = self.runner(session).await?;
        let mut r = runner.lock().await;
        r.advance()?;
        Ok(r.view())
    }

    // ────────────────────────────────────────────────────────────────────
    // quiz → results
    // ────────────────────────────────────────────────────────────────────

    /// Resubmits the recommendation request after a failure.
    pub async fn retry_results(&self, session: &SessionHandle) -> Result<(), AppError> {
        let epoch = {
            let s = session.lock().await;
            expect_step(&s, WizardStep::Quiz)?;
            if s.outcome.is_none() {
                return Err(AppError::Validation(
                    "finish the quiz before requesting results".to_string(),
                ));
            }
            s.epoch
        };
        self.generate_results(session, epoch).await
    }

    async fn generate_results(&self, session: &SessionHandle, epoch: u64) -> Result<(), AppError> {
        let (credential, interests, marks, outcome) = {
            let mut s = session.lock().await;
            if s.epoch != epoch {
                return Ok(());
            }
            let (Some(profile), Some(outcome)) = (s.profile.clone(), s.outcome.clone()) else {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "quiz completed without a profile or outcome"
                )));
            };
            begin_generation(&mut s)?;
            (s.credential.clone(), profile.interests, profile.marks, outcome)
        };

        info!(
            "Generating recommendations for score {}/{}",
            outcome.score, outcome.total_questions
        );
        let result = self
            .generator
            .generate_recommendations(
                &credential,
                &interests,
                &marks,
                outcome.score,
                outcome.total_questions,
            )
            .await;

        let mut s = session.lock().await;
        if s.epoch != epoch {
            return Ok(());
        }
        s.generating = false;

        match result {
            Ok(recommendations) => {
                s.recommendations = recommendations;
                s.runner = None;
                s.notice = None;
                s.step = WizardStep::Results;
                info!("Session {}: results ready", s.id);
                Ok(())
            }
            Err(e) => {
                warn!("Session {}: recommendation generation failed: {e}", s.id);
                if e.is_generation_failure() {
                    s.notice = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    pub async fn results_view(&self, session: &SessionHandle) -> Result<ResultsView, AppError> {
        let s = session.lock().await;
        expect_step(&s, WizardStep::Results)?;
        let outcome = s
            .outcome()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("results step without outcome")))?;
        Ok(ResultsView::build(
            s.profile().map(|p| p.name.as_str()),
            outcome.score,
            outcome.total_questions,
            s.recommendations(),
        ))
    }

    // ────────────────────────────────────────────────────────────────────
    // restart / notices
    // ────────────────────────────────────────────────────────────────────

    /// Clears profile, quiz and results and returns to the profile step.
    /// The credential is kept.
    pub async fn restart(&self, session: &SessionHandle) -> Result<(), AppError> {
        let mut s = session.lock().await;
        if s.step == WizardStep::Credential {
            return Err(AppError::Conflict(
                "enter a credential before starting".to_string(),
            ));
        }
        s.reset_run();
        s.step = WizardStep::Profile;
        info!("Session {}: restarted", s.id);
        Ok(())
    }

    pub async fn dismiss_notice(&self, session: &SessionHandle) {
        session.lock().await.notice = None;
    }
}

fn expect_step(s: &Session, step: WizardStep) -> Result<(), AppError> {
    if s.step != step {
        return Err(AppError::Conflict(format!(
            "session is at the {} step, not {}",
            s.step, step
        )));
    }
    Ok(())
}

fn begin_generation(s: &mut Session) -> Result<(), AppError> {
    if s.generating {
        return Err(AppError::Conflict(
            "generation already in progress".to_string(),
        ));
    }
    s.generating = true;
    Ok(())
}

#[cfg(test)]
impl Wizard {
    /// Same wizard with a custom countdown period.
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }
}
