//! Conversation state machine.
//!
//! The engine owns a single registry slot for the active session. Network
//! calls run without holding the registry lock; when a response arrives it
//! is applied only if the session it was issued for is still the active one.

use super::generation::{GenerationClient, GenerationRequest, GenerationResponse};
use super::model::{ConversationSession, Scenario, ScenarioKind, SessionId, SessionState, Turn};
use super::prompts::{PersonaConfig, PromptBuilder, SessionContext};
use super::safety::SafetyScanner;
use crate::config::AmigoConfig;
use crate::error::{AmigoError, Result};
use crate::ledger::{RewardCategory, RewardSink};
use crate::scripted;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tunables for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Answered user turns needed to complete a session.
    pub completion_threshold: u32,
    /// When false, a failed opening request aborts the session instead of
    /// falling back to a scripted opening.
    pub allow_degraded_start: bool,
    pub practice_reward: u32,
    pub decoder_reward: u32,
    pub request_timeout: Duration,
    pub persona: PersonaConfig,
}

impl EngineOptions {
    pub fn from_config(config: &AmigoConfig) -> Self {
        Self {
            completion_threshold: config.engine.completion_threshold,
            allow_degraded_start: config.engine.allow_degraded_start,
            practice_reward: config.engine.practice_reward,
            decoder_reward: config.engine.decoder_reward,
            request_timeout: Duration::from_secs(config.generation.timeout_secs),
            persona: PersonaConfig {
                temperature: config.generation.temperature,
                ..PersonaConfig::default()
            },
        }
    }

    pub fn reward_for(&self, kind: ScenarioKind) -> u32 {
        match kind {
            ScenarioKind::Roleplay => self.practice_reward,
            ScenarioKind::Decoder => self.decoder_reward,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&AmigoConfig::default())
    }
}

/// Result of [`ConversationEngine::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The model produced the opening line.
    Started { session_id: SessionId, opening: String },
    /// The opening request failed and a scripted line was used.
    Degraded { session_id: SessionId, opening: String },
    /// The opening itself was an escalation.
    SafetyHold { session_id: SessionId, message: String },
    /// The opening request failed and degraded starts are disabled.
    Aborted { session_id: SessionId, reason: String },
    /// The session was ended before the opening arrived.
    Stale,
}

impl StartOutcome {
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            StartOutcome::Started { session_id, .. }
            | StartOutcome::Degraded { session_id, .. }
            | StartOutcome::SafetyHold { session_id, .. }
            | StartOutcome::Aborted { session_id, .. } => Some(*session_id),
            StartOutcome::Stale => None,
        }
    }
}

/// Result of [`ConversationEngine::submit_user_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied { reply: String, turn_count: u32 },
    /// The reply reached the completion threshold. `reward` is the amount
    /// credited by this call.
    Completed { reply: String, reward: Option<u32> },
    /// The reply escalated; show `message` verbatim with only an exit action.
    SafetyHold { message: String },
    /// The request failed; `reply` is the filler line appended instead.
    Fallback { reply: String },
    /// Another request for this session is still outstanding.
    InProgress,
    /// The session is not accepting turns.
    Ignored { state: SessionState },
    /// The session was ended while the request was in flight.
    Stale,
}

struct ActiveSession {
    session: ConversationSession,
    context: SessionContext,
    system_instruction: String,
    in_flight: bool,
}

#[derive(Default)]
struct Registry {
    active: Option<ActiveSession>,
}

impl Registry {
    /// The active session, if `id` still names it.
    fn current(&mut self, id: SessionId) -> Option<&mut ActiveSession> {
        self.active.as_mut().filter(|active| active.session.id == id)
    }
}

pub struct ConversationEngine {
    client: Arc<dyn GenerationClient>,
    rewards: Arc<dyn RewardSink>,
    prompts: PromptBuilder,
    safety: SafetyScanner,
    options: EngineOptions,
    registry: Mutex<Registry>,
}

impl ConversationEngine {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        rewards: Arc<dyn RewardSink>,
        options: EngineOptions,
    ) -> Self {
        Self {
            client,
            rewards,
            prompts: PromptBuilder::new(options.persona.clone()),
            safety: SafetyScanner::new(),
            options,
            registry: Mutex::new(Registry::default()),
        }
    }

    pub fn with_safety_scanner(mut self, scanner: SafetyScanner) -> Self {
        self.safety = scanner;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn state(&self) -> SessionState {
        self.registry()
            .active
            .as_ref()
            .map(|active| active.session.state)
            .unwrap_or(SessionState::Idle)
    }

    /// Copy of the active session.
    pub fn session(&self) -> Option<ConversationSession> {
        self.registry()
            .active
            .as_ref()
            .map(|active| active.session.clone())
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.registry().active.as_ref().map(|active| active.session.id)
    }

    pub fn is_busy(&self) -> bool {
        self.registry()
            .active
            .as_ref()
            .is_some_and(|active| active.in_flight)
    }

    /// Starts a session for `scenario` and waits for its opening line.
    ///
    /// Fails with [`AmigoError::InvalidState`] unless the engine is idle.
    pub async fn start(&self, scenario: Scenario, context: SessionContext) -> Result<StartOutcome> {
        let system_instruction = self.prompts.system_instruction(&scenario, &context)?;
        let opening_message = self.prompts.opening_message(&context)?;

        let (session_id, language) = {
            let mut registry = self.registry();
            if let Some(active) = registry.active.as_ref() {
                return Err(AmigoError::invalid_state("start", active.session.state));
            }
            let session = ConversationSession::new(scenario, context.language);
            let ids = (session.id, session.language);
            info!(
                session_id = %session.id,
                scenario = %session.scenario.id,
                language = %session.language,
                "Starting conversation session"
            );
            registry.active = Some(ActiveSession {
                session,
                context,
                system_instruction: system_instruction.clone(),
                in_flight: true,
            });
            ids
        };

        let request = GenerationRequest::new(system_instruction, opening_message)
            .with_temperature(self.options.persona.temperature);
        let result = self.call(request).await;

        let mut registry = self.registry();
        let Some(active) = registry.current(session_id) else {
            debug!(session_id = %session_id, "Discarding opening for ended session");
            return Ok(StartOutcome::Stale);
        };
        active.in_flight = false;
        let session = &mut active.session;

        let outcome = match result {
            Ok(response) => {
                let opening = response.text.trim().to_string();
                session.transcript.push(Turn::ai(opening.clone()));
                if let Some(found) = self.safety.scan(language, &opening) {
                    info!(session_id = %session_id, marker = %found.marker, "Opening escalated to safety hold");
                    session.state = SessionState::SafetyHold;
                    StartOutcome::SafetyHold {
                        session_id,
                        message: opening,
                    }
                } else {
                    session.state = SessionState::ActiveTurn;
                    StartOutcome::Started { session_id, opening }
                }
            }
            Err(e) if !self.options.allow_degraded_start => {
                warn!(session_id = %session_id, error = %e, "Opening failed, aborting session");
                session.state = SessionState::Aborted;
                StartOutcome::Aborted {
                    session_id,
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Opening failed, using scripted line");
                let opening = match session.scenario.kind {
                    ScenarioKind::Roleplay => {
                        scripted::opening_line(language, &active.context.user_name)
                    }
                    ScenarioKind::Decoder => scripted::decoder_opening(language).to_string(),
                };
                session.transcript.push(Turn::ai(opening.clone()));
                session.state = SessionState::ActiveTurn;
                StartOutcome::Degraded { session_id, opening }
            }
        };
        Ok(outcome)
    }

    /// Sends a user message and waits for the reply.
    ///
    /// Blank messages are rejected with [`AmigoError::InvalidInput`]. Every
    /// other precondition failure is reported through [`TurnOutcome`] and
    /// leaves the transcript untouched.
    pub async fn submit_user_turn(&self, text: &str) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AmigoError::invalid_input("message must not be empty"));
        }

        let (session_id, language, request) = {
            let mut registry = self.registry();
            let Some(active) = registry.active.as_mut() else {
                return Ok(TurnOutcome::Ignored {
                    state: SessionState::Idle,
                });
            };
            if active.in_flight {
                debug!(session_id = %active.session.id, "Rejecting turn while a request is in flight");
                return Ok(TurnOutcome::InProgress);
            }
            if active.session.state != SessionState::ActiveTurn {
                return Ok(TurnOutcome::Ignored {
                    state: active.session.state,
                });
            }

            let prior_turns = active.session.transcript.clone();
            active.session.transcript.push(Turn::user(text));
            active.in_flight = true;
            let request = GenerationRequest::new(active.system_instruction.clone(), text)
                .with_prior_turns(prior_turns)
                .with_temperature(self.options.persona.temperature);
            (active.session.id, active.session.language, request)
        };

        let result = self.call(request).await;

        let (outcome, credit) = {
            let mut registry = self.registry();
            let Some(active) = registry.current(session_id) else {
                debug!(session_id = %session_id, "Discarding reply for ended session");
                return Ok(TurnOutcome::Stale);
            };
            active.in_flight = false;

            match result {
                Ok(response) => {
                    let reply = response.text.trim().to_string();
                    active.session.transcript.push(Turn::ai(reply.clone()));
                    active.session.turn_count += 1;

                    if let Some(found) = self.safety.scan(language, &reply) {
                        info!(session_id = %session_id, marker = %found.marker, "Reply escalated to safety hold");
                        active.session.state = SessionState::SafetyHold;
                        (TurnOutcome::SafetyHold { message: reply }, None)
                    } else {
                        let credit = self.settle_completion(active);
                        if active.session.state == SessionState::Completed {
                            (TurnOutcome::Completed { reply, reward: None }, credit)
                        } else {
                            let turn_count = active.session.turn_count;
                            (TurnOutcome::Replied { reply, turn_count }, None)
                        }
                    }
                }
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Turn request failed, appending filler");
                    let reply = scripted::filler_line(language).to_string();
                    active.session.transcript.push(Turn::ai(reply.clone()));
                    (TurnOutcome::Fallback { reply }, None)
                }
            }
        };

        Ok(match (outcome, credit) {
            (TurnOutcome::Completed { reply, .. }, Some(credit)) => TurnOutcome::Completed {
                reply,
                reward: self.credit(session_id, credit),
            },
            (outcome, _) => outcome,
        })
    }

    /// Re-evaluates the completion rule for the active session.
    ///
    /// Returns the amount credited by this call. The reward is paid at most
    /// once per session no matter how often this is called.
    pub fn check_completion(&self) -> Option<u32> {
        let (session_id, credit) = {
            let mut registry = self.registry();
            let active = registry.active.as_mut()?;
            (active.session.id, self.settle_completion(active)?)
        };
        self.credit(session_id, credit)
    }

    /// Returns to idle from any state and hands back the final session.
    ///
    /// A request still in flight keeps running but its result is dropped.
    pub fn end(&self) -> Option<ConversationSession> {
        let ended = self.registry().active.take().map(|active| active.session);
        if let Some(session) = &ended {
            info!(
                session_id = %session.id,
                state = %session.state,
                turns = session.turn_count,
                "Ended conversation session"
            );
        }
        ended
    }

    fn settle_completion(&self, active: &mut ActiveSession) -> Option<(RewardCategory, u32)> {
        let session = &mut active.session;
        if session.state == SessionState::ActiveTurn
            && session.turn_count >= self.options.completion_threshold
        {
            info!(session_id = %session.id, turns = session.turn_count, "Conversation completed");
            session.state = SessionState::Completed;
        }
        if session.state == SessionState::Completed && session.mark_rewarded() {
            let kind = session.scenario.kind;
            Some((kind.reward_category(), self.options.reward_for(kind)))
        } else {
            None
        }
    }

    fn credit(&self, session_id: SessionId, (category, amount): (RewardCategory, u32)) -> Option<u32> {
        match self.rewards.credit(category, amount) {
            Ok(total) => {
                info!(session_id = %session_id, %category, amount, total, "Credited session reward");
                Some(amount)
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to credit session reward");
                None
            }
        }
    }

    async fn call(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let timeout = self.options.request_timeout;
        match tokio::time::timeout(timeout, self.client.generate(request)).await {
            Ok(Ok(response)) if response.text.trim().is_empty() => {
                Err(AmigoError::generation("empty response"))
            }
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) if e.is_generation_failure() => Err(e),
            Ok(Err(e)) => Err(AmigoError::generation(e.to_string())),
            Err(_) => Err(AmigoError::generation(format!(
                "request timed out after {}s",
                timeout.as_secs_f32()
            ))),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
