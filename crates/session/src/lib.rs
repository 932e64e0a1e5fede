//! Session state and turn orchestration.
//!
//! A [`Session`] owns the mutable per-conversation state: mode configuration
//! and the bounded context window. The design snapshot is NOT session state —
//! the host supplies it fresh on every turn and it is never cached past one
//! orchestrator invocation.
//!
//! The [`TurnOrchestrator`] drives one user turn end to end:
//!
//! 1. append the user turn to the window (before compiling, so the turn is
//!    part of its own prompt's recap and survives even a failed turn)
//! 2. optionally run a bounded pricing lookup when the message asks for it
//! 3. compile the system prompt
//! 4. run inference under a deadline
//! 5. append the assistant turn
//!
//! Pricing failures degrade to demo data inside the pricing client and never
//! fail the turn. Inference failures are the one error surfaced to the
//! caller; the user turn stays in the window so a retry sees it.

pub mod intent;

use kicai_config::AssistantConfig;
use kicai_context::ContextWindow;
use kicai_core::design::DesignSnapshot;
use kicai_core::error::InferenceError;
use kicai_core::inference::{InferenceProvider, InferenceRequest};
use kicai_core::mode::{AnalysisContext, InteractionMode, Language, ModeConfig};
use kicai_core::pricing::{PricingQuery, PricingResult};
use kicai_core::turn::Turn;
use kicai_pricing::PricingClient;
use kicai_prompt::PromptCompiler;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use intent::{IntentDetector, KeywordIntentDetector};

/// Cap on components priced per turn. Keeps the tool call and the rendered
/// pricing section bounded on large boards.
pub const MAX_PRICING_QUERIES: usize = 10;

/// Default deadline for one inference call.
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(90);

/// Default bound on waiting for an in-flight pricing quote.
pub const DEFAULT_PRICING_WAIT: Duration = Duration::from_secs(8);

/// One conversation with its state.
pub struct Session {
    pub id: Uuid,
    pub config: AssistantConfig,
    mode: ModeConfig,
    context: ContextWindow,
}

impl Session {
    pub fn new(config: AssistantConfig) -> Self {
        let mode = ModeConfig {
            mode: config.ai_mode,
            language: config.language,
            context: AnalysisContext::default(),
        };
        let context = ContextWindow::with_capacity(config.context_capacity);
        Self {
            id: Uuid::new_v4(),
            config,
            mode,
            context,
        }
    }

    pub fn mode(&self) -> ModeConfig {
        self.mode
    }

    /// Switch interaction mode. The context window is kept: mode switches
    /// mid-conversation are a normal workflow, not a new conversation.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        tracing::info!(session = %self.id, mode = %mode, "Interaction mode changed");
        self.mode.mode = mode;
    }

    pub fn set_language(&mut self, language: Language) {
        self.mode.language = language;
    }

    pub fn set_analysis_context(&mut self, context: AnalysisContext) {
        self.mode.context = context;
    }

    /// The conversation window, oldest first.
    pub fn window(&self) -> Vec<Turn> {
        self.context.window()
    }

    pub fn turn_count(&self) -> usize {
        self.context.len()
    }

    /// Explicitly start the conversation over. The mode stays.
    pub fn reset(&mut self) {
        self.context.reset();
    }
}

/// A completed turn's output.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub content: String,
    pub model: String,
    /// Pricing attached to this turn, when a lookup ran and its results were
    /// still current at prompt time.
    pub pricing: Option<Vec<PricingResult>>,
}

/// Drives user turns through pricing, prompt compilation, and inference.
pub struct TurnOrchestrator {
    provider: Arc<dyn InferenceProvider>,
    pricing: Arc<PricingClient>,
    compiler: PromptCompiler,
    intent: Box<dyn IntentDetector>,
    inference_timeout: Duration,
    pricing_wait: Duration,
}

impl TurnOrchestrator {
    pub fn new(provider: Arc<dyn InferenceProvider>, pricing: Arc<PricingClient>) -> Self {
        Self {
            provider,
            pricing,
            compiler: PromptCompiler::new(),
            intent: Box::new(KeywordIntentDetector::new()),
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
            pricing_wait: DEFAULT_PRICING_WAIT,
        }
    }

    pub fn with_intent_detector(mut self, intent: Box<dyn IntentDetector>) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn with_pricing_wait(mut self, wait: Duration) -> Self {
        self.pricing_wait = wait;
        self
    }

    /// Run one user turn against the given design snapshot.
    ///
    /// The snapshot is consumed for this turn only and never cached. On error
    /// the user turn remains in the window and no assistant turn is appended,
    /// so the caller can retry the same question.
    pub async fn handle_user_message(
        &self,
        session: &mut Session,
        message: &str,
        snapshot: &DesignSnapshot,
    ) -> Result<AssistantReply, InferenceError> {
        session.context.append(Turn::user(message));

        let pricing = self.maybe_fetch_pricing(session, message, snapshot).await;

        let window = session.context.window();
        let prompt = self
            .compiler
            .compile(&session.mode, &window, snapshot, pricing.as_deref());

        let mut request = InferenceRequest::new(prompt, window);
        request.temperature = session.config.temperature;

        let response = match tokio::time::timeout(
            self.inference_timeout,
            self.provider.infer(request),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                tracing::warn!(session = %session.id, %error, "Inference failed");
                return Err(error);
            }
            Err(_) => {
                let timeout_secs = self.inference_timeout.as_secs();
                tracing::warn!(session = %session.id, timeout_secs, "Inference deadline hit");
                return Err(InferenceError::Timeout { timeout_secs });
            }
        };

        session.context.append(Turn::assistant(response.content.clone()));

        Ok(AssistantReply {
            content: response.content,
            model: response.model,
            pricing,
        })
    }

    /// Run a pricing lookup if the message asks for one and the design has
    /// components to price. Results from a superseded quote are discarded.
    async fn maybe_fetch_pricing(
        &self,
        session: &Session,
        message: &str,
        snapshot: &DesignSnapshot,
    ) -> Option<Vec<PricingResult>> {
        if !self.intent.wants_pricing(message) {
            return None;
        }
        let queries = derive_queries(snapshot);
        if queries.is_empty() {
            return None;
        }

        let handle = self.pricing.quote(queries);
        let generation = handle.generation();
        let results = match handle.wait(self.pricing_wait).await {
            Some(results) => results,
            None => {
                tracing::warn!(session = %session.id, "Pricing quote did not arrive in time");
                return None;
            }
        };

        if generation < self.pricing.current_generation() {
            tracing::debug!(
                session = %session.id,
                generation,
                "Discarding superseded pricing quote"
            );
            return None;
        }
        Some(results)
    }
}

/// Derive pricing queries from a snapshot, capped at
/// [`MAX_PRICING_QUERIES`] in board order.
pub fn derive_queries(snapshot: &DesignSnapshot) -> Vec<PricingQuery> {
    snapshot
        .components
        .iter()
        .take(MAX_PRICING_QUERIES)
        .map(|component| PricingQuery {
            component_ref: component.reference.clone(),
            value: component.value.clone(),
            footprint: component.footprint.clone(),
        })
        .collect()
}
