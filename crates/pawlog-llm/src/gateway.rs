//! AI gateway: prompt, call, strict parse, fallback.
//!
//! No operation here returns an error. A missing credential, a transport
//! failure or an unusable reply all yield the language-appropriate fallback,
//! logged at `warn` and reported as a warning notice when a notifier is attached.

use std::sync::Arc;

use pawlog_core::clock::Clock;
use pawlog_core::models::{Cat, ChatMessage, Conversation, HealthLog};
use pawlog_core::notify::Notifier;
use pawlog_core::repo::{ChatHistoryRepository, ConversationRepository};
use pawlog_core::state::NoticeDraft;
use pawlog_core::store::StoreResult;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{GeminiClient, GenerativeModel, LlmError};
use crate::config::GatewayConfig;
use crate::extraction::{
    parse_chat_reply, parse_symptom_analysis, parse_voice_reply, ChatReply, ExtractionError,
    SymptomAnalysis, VoiceParse,
};
use crate::language::Language;
use crate::prompts::{
    make_chat_prompt, make_symptom_prompt, make_voice_prompt, ChatContext, MAX_HISTORY_TURNS,
};

/// Notice type for an unreachable or unconfigured model.
pub const AI_UNAVAILABLE: &str = "ai.unavailable";

/// Notice type for a reply that did not match the expected shape.
pub const AI_PARSE_FAILED: &str = "ai.parse_failed";

/// Characters of the opening message used as a new conversation's title.
pub const CONVERSATION_TITLE_CHARS: usize = 40;

/// A chat turn to answer.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub cat: Option<&'a Cat>,
    /// Newest first
    pub recent_logs: &'a [HealthLog],
    /// Oldest first
    pub history: &'a [ChatMessage],
    pub language: Language,
}

pub struct AiGateway {
    model: Option<Box<dyn GenerativeModel>>,
    notifier: Option<Arc<Notifier>>,
}

impl AiGateway {
    /// Gateway over `model`; `None` means unconfigured.
    pub fn new(model: Option<Box<dyn GenerativeModel>>) -> Self {
        Self {
            model,
            notifier: None,
        }
    }

    /// Gemini-backed gateway, or an unconfigured one if the client cannot be built.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let model: Option<Box<dyn GenerativeModel>> = match GeminiClient::new(config) {
            Ok(client) => {
                debug!(model = %client.model(), "AI gateway configured");
                Some(Box::new(client))
            }
            Err(LlmError::MissingApiKey) => {
                warn!("no AI credential configured, replies will use fallbacks");
                None
            }
            Err(e) => {
                warn!(error = %e, "AI client setup failed, replies will use fallbacks");
                None
            }
        };
        Self::new(model)
    }

    pub fn with_notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn chat(&self, request: &ChatRequest<'_>) -> ChatReply {
        let prompt = make_chat_prompt(&ChatContext {
            message: request.message,
            cat: request.cat,
            recent_logs: request.recent_logs,
            history: request.history,
            language: request.language,
        });

        let Some(reply) = self.complete("chat", &prompt) else {
            return ChatReply::fallback(request.language);
        };
        parse_chat_reply(&reply).unwrap_or_else(|e| {
            self.report_parse_failure("chat", &e);
            ChatReply::fallback(request.language)
        })
    }

    pub fn analyze_symptoms(
        &self,
        symptoms: &str,
        cat: Option<&Cat>,
        language: Language,
    ) -> SymptomAnalysis {
        let prompt = make_symptom_prompt(symptoms, cat, language);

        let Some(reply) = self.complete("symptoms", &prompt) else {
            return SymptomAnalysis::fallback(language);
        };
        parse_symptom_analysis(&reply).unwrap_or_else(|e| {
            self.report_parse_failure("symptoms", &e);
            SymptomAnalysis::fallback(language)
        })
    }

    pub fn parse_voice_transcript(
        &self,
        transcript: &str,
        cat_name: Option<&str>,
        language: Language,
    ) -> VoiceParse {
        if transcript.trim().is_empty() {
            return VoiceParse::Failed;
        }
        let prompt = make_voice_prompt(transcript, cat_name, language);

        let Some(reply) = self.complete("voice", &prompt) else {
            return VoiceParse::Failed;
        };
        parse_voice_reply(&reply).unwrap_or_else(|e| {
            self.report_parse_failure("voice", &e);
            VoiceParse::Failed
        })
    }

    /// Answer `message` in the stored conversation of `cat` (global if `None`),
    /// then append both turns to the chat history.
    pub fn chat_with_history(
        &self,
        history: &ChatHistoryRepository,
        clock: &dyn Clock,
        message: &str,
        cat: Option<&Cat>,
        recent_logs: &[HealthLog],
        language: Language,
    ) -> StoreResult<ChatReply> {
        let cat_id = cat.map(|c| c.id.as_str());
        let turns = history.last_turns(cat_id, MAX_HISTORY_TURNS);

        let reply = self.chat(&ChatRequest {
            message,
            cat,
            recent_logs,
            history: &turns,
            language,
        });

        history.add(ChatMessage::user(cat_id, message, clock.now_millis()))?;
        history.add(ChatMessage::assistant(
            cat_id,
            reply.answer.clone(),
            clock.now_millis(),
        ))?;
        Ok(reply)
    }

    /// Answer `message` inside a saved conversation and save both turns.
    /// An unknown or absent `conversation_id` starts a new conversation.
    #[allow(clippy::too_many_arguments)]
    pub fn chat_in_conversation(
        &self,
        conversations: &ConversationRepository,
        clock: &dyn Clock,
        conversation_id: Option<&str>,
        message: &str,
        cat: Option<&Cat>,
        recent_logs: &[HealthLog],
        language: Language,
    ) -> StoreResult<(Conversation, ChatReply)> {
        let cat_id = cat.map(|c| c.id.as_str());
        let mut conversation = conversation_id
            .and_then(|id| conversations.get(id))
            .unwrap_or_else(|| {
                let title: String =
                    message.trim().chars().take(CONVERSATION_TITLE_CHARS).collect();
                Conversation::new(cat_id, title, clock.now_millis())
            });

        let start = conversation.messages.len().saturating_sub(MAX_HISTORY_TURNS);
        let reply = self.chat(&ChatRequest {
            message,
            cat,
            recent_logs,
            history: &conversation.messages[start..],
            language,
        });

        conversation.push(ChatMessage::user(cat_id, message, clock.now_millis()));
        conversation.push(ChatMessage::assistant(
            cat_id,
            reply.answer.clone(),
            clock.now_millis(),
        ));
        conversations.save(conversation.clone())?;
        Ok((conversation, reply))
    }

    fn complete(&self, operation: &str, prompt: &str) -> Option<String> {
        let result = match &self.model {
            Some(model) => model.generate(prompt),
            None => Err(LlmError::MissingApiKey),
        };

        match result {
            Ok(reply) => {
                debug!(operation, reply_len = reply.len(), "model replied");
                Some(reply)
            }
            Err(e) => {
                warn!(operation, reason = e.kind(), error = %e, "model call failed");
                self.publish(
                    NoticeDraft::warning(AI_UNAVAILABLE)
                        .with_translation("notifications.aiUnavailable")
                        .with_metadata(json!({ "operation": operation, "reason": e.kind() })),
                );
                None
            }
        }
    }

    fn report_parse_failure(&self, operation: &str, error: &ExtractionError) {
        warn!(operation, error = %error, "unusable model reply");
        self.publish(
            NoticeDraft::warning(AI_PARSE_FAILED)
                .with_translation("notifications.aiParseFailed")
                .with_metadata(json!({ "operation": operation, "reason": error.kind() })),
        );
    }

    fn publish(&self, draft: NoticeDraft) {
        if let Some(notifier) = &self.notifier {
            notifier.publish(draft);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawlog_core::clock::ManualClock;
    use pawlog_core::models::{Role, Urgency};
    use pawlog_core::store::MemoryKv;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records prompts.
    #[derive(Default)]
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn replying(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::default(),
            })
        }
    }

    impl GenerativeModel for ScriptedModel {
        fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }

    fn gateway(model: &Arc<ScriptedModel>) -> (Arc<Notifier>, AiGateway) {
        let notifier = Arc::new(Notifier::new(Arc::new(ManualClock::new(0))));
        let gateway = AiGateway::new(Some(Box::new(Arc::clone(model))))
            .with_notifier(notifier.clone());
        (notifier, gateway)
    }

    fn request(message: &str, language: Language) -> ChatRequest<'_> {
        ChatRequest {
            message,
            cat: None,
            recent_logs: &[],
            history: &[],
            language,
        }
    }

    fn notice_kinds(notifier: &Notifier) -> Vec<String> {
        notifier.active().into_iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_chat_parses_fenced_reply() {
        let model = ScriptedModel::replying(vec![Ok(
            "```json\n{\"answer\":\"ok\",\"followUpQuestions\":[\"a\"],\"sources\":[]}\n```".into(),
        )]);
        let (notifier, gateway) = gateway(&model);

        let reply = gateway.chat(&request("hi", Language::English));
        assert_eq!(reply.answer, "ok");
        assert_eq!(reply.follow_up_questions, vec!["a".to_string()]);
        assert!(reply.sources.is_empty());
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_unparseable_reply_falls_back_in_language() {
        let model = ScriptedModel::replying(vec![Ok("Cats are great!".into())]);
        let (notifier, gateway) = gateway(&model);

        let reply = gateway.chat(&request("hi", Language::Korean));
        assert_eq!(reply, ChatReply::fallback(Language::Korean));
        assert!(reply.follow_up_questions.is_empty());
        assert_eq!(notice_kinds(&notifier), vec![AI_PARSE_FAILED.to_string()]);
    }

    #[test]
    fn test_transport_failure_falls_back() {
        let model = ScriptedModel::replying(vec![Err(LlmError::Http {
            status: 503,
            body: "overloaded".into(),
        })]);
        let (notifier, gateway) = gateway(&model);

        let analysis = gateway.analyze_symptoms("vomiting", None, Language::English);
        assert_eq!(analysis, SymptomAnalysis::fallback(Language::English));
        assert_eq!(notice_kinds(&notifier), vec![AI_UNAVAILABLE.to_string()]);
    }

    #[test]
    fn test_unreachable_endpoint_keeps_credential_out_of_notices() {
        let config = GatewayConfig {
            api_key: Some("SUPER-SECRET-KEY".to_string()),
            model: "m".to_string(),
            base_url: "http://127.0.0.1:1/v1beta".to_string(),
            timeout: std::time::Duration::from_secs(2),
        };
        let notifier = Arc::new(Notifier::new(Arc::new(ManualClock::new(0))));
        let gateway = AiGateway::from_config(&config).with_notifier(notifier.clone());
        assert!(gateway.is_available());

        let reply = gateway.chat(&request("hi", Language::English));
        assert_eq!(reply, ChatReply::fallback(Language::English));

        let notices = notifier.active();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, AI_UNAVAILABLE);
        let metadata = notices[0].metadata.clone().unwrap();
        assert_eq!(metadata["reason"], "transport");
        assert_eq!(metadata["operation"], "chat");
        assert!(!metadata.to_string().contains("SUPER-SECRET-KEY"));
    }

    #[test]
    fn test_unconfigured_gateway_never_calls_out() {
        let gateway = AiGateway::from_config(&GatewayConfig::default());
        assert!(!gateway.is_available());

        assert_eq!(
            gateway.chat(&request("hi", Language::English)),
            ChatReply::fallback(Language::English)
        );
        assert_eq!(
            gateway.parse_voice_transcript("ate 50g", None, Language::English),
            VoiceParse::Failed
        );
    }

    #[test]
    fn test_analyze_symptoms() {
        let model = ScriptedModel::replying(vec![Ok(
            r#"{"urgency":"mild","analysis":"Hairball likely.","recommendations":["Brush daily"]}"#
                .into(),
        )]);
        let (_, gateway) = gateway(&model);

        let analysis = gateway.analyze_symptoms("coughing once", None, Language::English);
        assert_eq!(analysis.urgency, Urgency::Mild);
        assert!(model.prompts.lock().unwrap()[0].contains("\"coughing once\""));
    }

    #[test]
    fn test_voice_transcript() {
        let model = ScriptedModel::replying(vec![
            Ok(r#"{"success":true,"type":"water","waterAmount":120}"#.into()),
            Ok(r#"{"success":false}"#.into()),
        ]);
        let (notifier, gateway) = gateway(&model);

        let parsed = gateway.parse_voice_transcript("drank 120ml", Some("Nabi"), Language::English);
        assert_eq!(parsed.log().and_then(|l| l.water_amount), Some(120.0));

        let failed = gateway.parse_voice_transcript("hmm", None, Language::English);
        assert!(!failed.is_success());
        assert!(notifier.active().is_empty());

        assert_eq!(
            gateway.parse_voice_transcript("   ", None, Language::English),
            VoiceParse::Failed
        );
        assert_eq!(model.prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_chat_with_history_records_turns() {
        let kv = Arc::new(MemoryKv::new());
        let history = ChatHistoryRepository::new(kv);
        let clock = ManualClock::new(1_000);
        for i in 0..6 {
            history
                .add(ChatMessage::user(Some("c1"), format!("old-{}", i), i))
                .unwrap();
        }
        history.add(ChatMessage::user(Some("c2"), "other cat", 0)).unwrap();

        let model = ScriptedModel::replying(vec![Ok(r#"{"answer":"Keep an eye on it."}"#.into())]);
        let (_, gateway) = gateway(&model);
        let mut cat = Cat::new("Nabi", 0);
        cat.id = "c1".to_string();

        let reply = gateway
            .chat_with_history(&history, &clock, "she sneezed", Some(&cat), &[], Language::English)
            .unwrap();
        assert_eq!(reply.answer, "Keep an eye on it.");

        let prompt = model.prompts.lock().unwrap()[0].clone();
        assert!(!prompt.contains("old-0"));
        assert!(prompt.contains("old-1") && prompt.contains("old-5"));
        assert!(!prompt.contains("other cat"));

        let stored = history.get_by_cat(Some("c1"));
        assert_eq!(stored.len(), 8);
        assert_eq!(stored[6].role, Role::User);
        assert_eq!(stored[7].role, Role::Assistant);
        assert_eq!(stored[7].content, "Keep an eye on it.");
    }

    #[test]
    fn test_chat_in_conversation_saves_and_caps() {
        let conversations = ConversationRepository::new(Arc::new(MemoryKv::new()));
        let clock = ManualClock::new(1_000);
        let model = ScriptedModel::replying(
            (0..7)
                .map(|i| Ok(format!(r#"{{"answer":"reply-{}"}}"#, i)))
                .collect(),
        );
        let (_, gateway) = gateway(&model);

        let (first, reply) = gateway
            .chat_in_conversation(
                &conversations,
                &clock,
                None,
                "Why does she knead blankets?",
                None,
                &[],
                Language::English,
            )
            .unwrap();
        assert_eq!(reply.answer, "reply-0");
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.title, "Why does she knead blankets?");

        clock.advance(1_000);
        let (second, _) = gateway
            .chat_in_conversation(
                &conversations,
                &clock,
                Some(&first.id),
                "Is it normal?",
                None,
                &[],
                Language::English,
            )
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.messages.len(), 4);
        assert!(model.prompts.lock().unwrap()[1].contains("reply-0"));

        for _ in 0..5 {
            clock.advance(1_000);
            gateway
                .chat_in_conversation(
                    &conversations,
                    &clock,
                    None,
                    "new topic",
                    None,
                    &[],
                    Language::English,
                )
                .unwrap();
        }
        let saved = conversations.get_all();
        assert_eq!(saved.len(), 5);
        assert!(saved.iter().all(|c| c.id != first.id));
    }
}
