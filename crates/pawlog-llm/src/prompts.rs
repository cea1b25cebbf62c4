//! Prompts for cat health chat, symptom triage and voice logging.
//!
//! Every prompt asks for a single JSON object; replies are parsed by
//! [`crate::extraction`].

use pawlog_core::models::{Cat, ChatMessage, HealthLog, Role};
use serde::Serialize;

use crate::language::Language;

/// Most recent history turns included in a chat prompt.
pub const MAX_HISTORY_TURNS: usize = 5;

/// Health logs summarized in a chat prompt.
pub const MAX_CONTEXT_LOGS: usize = 7;

/// Instruction template for open-ended chat.
pub const CHAT_INSTRUCTIONS: &str = r#"You are a friendly veterinary assistant helping a cat owner.

Answer the owner's question using the cat profile and recent health logs when they are relevant.
Give practical, general guidance. You are not a replacement for a veterinarian: when symptoms
could be serious, say so clearly and recommend a vet visit.

Reply with a single JSON object and nothing else:
{"answer": string, "followUpQuestions": [string], "sources": [string]}
- answer: your reply to the owner
- followUpQuestions: up to 3 short questions the owner might ask next
- sources: general references you relied on (may be empty)"#;

/// Instruction template for symptom triage.
pub const SYMPTOM_INSTRUCTIONS: &str = r#"You are a veterinary triage assistant for cats.

Classify the reported symptoms into exactly one urgency level:
- "emergency": potentially life-threatening, the cat must see a veterinarian immediately
  (e.g. difficulty breathing, no urination for 24 hours, seizures, suspected poisoning)
- "warning": needs close observation, a vet visit within a day or two is advisable
- "mild": can be monitored at home

Reply with a single JSON object and nothing else:
{"urgency": "emergency" | "warning" | "mild", "analysis": string, "recommendations": [string]}"#;

/// Instruction template for voice-transcript extraction.
pub const VOICE_INSTRUCTIONS: &str = r#"You convert a cat owner's spoken note into a structured health log.

Extract only what the owner actually said. Use null for anything not mentioned.
Amounts are numbers only: food in grams, water in millilitres.

Reply with a single JSON object and nothing else:
{
  "success": true,
  "type": "general" | "meal" | "water" | "litter" | "weight" | "symptom",
  "wetFoodAmount": number | null,
  "dryFoodAmount": number | null,
  "snackAmount": number | null,
  "snackType": string | null,
  "waterAmount": number | null,
  "litterCount": integer | null,
  "activityLevel": "active" | "normal" | "lazy" | null,
  "mood": "happy" | "normal" | "sad" | "angry" | null,
  "notes": string | null,
  "symptom": {"symptomType": string, "severity": "mild" | "moderate" | "severe", "description": string} | null
}
If the note contains nothing that can be logged, reply {"success": false}."#;

/// One-line profile summary.
pub fn summarize_cat(cat: &Cat) -> String {
    let mut parts = vec![format!("Name: {}", cat.name)];
    if !cat.breed.is_empty() {
        parts.push(format!("Breed: {}", cat.breed));
    }
    if let Some(weight) = cat.weight {
        parts.push(format!("Weight: {}kg", weight));
    }
    if let Some(gender) = &cat.gender {
        parts.push(format!("Gender: {}", gender));
    }
    if let Some(birth_date) = &cat.birth_date {
        parts.push(format!("Born: {}", birth_date));
    }
    parts.push(format!(
        "Neutered: {}",
        if cat.neutered { "yes" } else { "no" }
    ));
    parts.push(format!(
        "Chronic conditions: {}",
        if cat.has_chronic_conditions() {
            cat.chronic_conditions.join(", ")
        } else {
            "none".to_string()
        }
    ));
    parts.join(", ")
}

/// One-line health log summary; fields that were not recorded are left out.
pub fn summarize_log(log: &HealthLog) -> String {
    let mut parts = Vec::new();

    if let Some(wet) = log.wet_food_amount {
        parts.push(format!("wet food {}g", wet));
    }
    if let Some(dry) = log.dry_food_amount {
        parts.push(format!("dry food {}g", dry));
    }
    if let Some(snack) = log.snack_amount {
        match &log.snack_type {
            Some(kind) => parts.push(format!("snack {}g ({})", snack, kind)),
            None => parts.push(format!("snack {}g", snack)),
        }
    }
    if let Some(water) = log.water_amount {
        parts.push(format!("water {}ml", water));
    }
    if let Some(count) = log.litter_count {
        parts.push(format!("litter {}x", count));
    }
    if let Some(activity) = &log.activity_level {
        parts.push(format!("activity {}", label(activity)));
    }
    if let Some(mood) = &log.mood {
        parts.push(format!("mood {}", label(mood)));
    }
    if let Some(notes) = log.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        parts.push(format!("notes: {}", notes.trim()));
    }

    let when = match &log.time {
        Some(time) => format!("{} {}", log.date, time),
        None => log.date.clone(),
    };
    let detail = if parts.is_empty() {
        "no details".to_string()
    } else {
        parts.join(", ")
    };
    format!("{} [{}] {}", when, label(&log.log_type), detail)
}

/// Lowercase serialized label of a unit enum.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Everything a chat prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct ChatContext<'a> {
    pub message: &'a str,
    pub cat: Option<&'a Cat>,
    /// Newest first; only the first [`MAX_CONTEXT_LOGS`] are used
    pub recent_logs: &'a [HealthLog],
    /// Oldest first; only the last [`MAX_HISTORY_TURNS`] are used
    pub history: &'a [ChatMessage],
    pub language: Language,
}

pub fn make_chat_prompt(ctx: &ChatContext<'_>) -> String {
    let mut sections = vec![CHAT_INSTRUCTIONS.to_string()];

    if let Some(cat) = ctx.cat {
        sections.push(format!("Cat profile:\n{}", summarize_cat(cat)));
    }

    if !ctx.recent_logs.is_empty() {
        let logs: Vec<String> = ctx
            .recent_logs
            .iter()
            .take(MAX_CONTEXT_LOGS)
            .map(|log| format!("- {}", summarize_log(log)))
            .collect();
        sections.push(format!("Recent health logs:\n{}", logs.join("\n")));
    }

    let start = ctx.history.len().saturating_sub(MAX_HISTORY_TURNS);
    let turns = &ctx.history[start..];
    if !turns.is_empty() {
        let lines: Vec<String> = turns
            .iter()
            .map(|m| {
                let who = match m.role {
                    Role::User => "Owner",
                    Role::Assistant => "Assistant",
                };
                format!("{}: {}", who, m.content)
            })
            .collect();
        sections.push(format!("Conversation so far:\n{}", lines.join("\n")));
    }

    sections.push(format!("Owner's question:\n\"{}\"", ctx.message));
    sections.push(ctx.language.directive().to_string());
    sections.join("\n\n")
}

pub fn make_symptom_prompt(symptoms: &str, cat: Option<&Cat>, language: Language) -> String {
    let mut sections = vec![SYMPTOM_INSTRUCTIONS.to_string()];
    if let Some(cat) = cat {
        sections.push(format!("Cat profile:\n{}", summarize_cat(cat)));
    }
    sections.push(format!("Reported symptoms:\n\"{}\"", symptoms));
    sections.push(language.directive().to_string());
    sections.join("\n\n")
}

pub fn make_voice_prompt(transcript: &str, cat_name: Option<&str>, language: Language) -> String {
    let mut sections = vec![VOICE_INSTRUCTIONS.to_string()];
    if let Some(name) = cat_name.filter(|n| !n.trim().is_empty()) {
        sections.push(format!("The note is about a cat named {}.", name.trim()));
    }
    sections.push(format!("Transcript:\n\"{}\"", transcript));
    sections.push(format!(
        "{} Keep JSON keys and enum values in English.",
        language.directive()
    ));
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawlog_core::models::{ActivityLevel, LogType, Mood};

    fn cat() -> Cat {
        Cat::new("Nabi", 0)
            .with_breed("Korean Shorthair")
            .with_weight(4.2)
            .with_neutered(true)
            .with_chronic_conditions(vec!["CKD".to_string()])
    }

    fn log(i: usize) -> HealthLog {
        let mut log = HealthLog::new("c1", LogType::Meal, 0);
        log.date = "2024-01-15".to_string();
        log.time = Some("09:30".to_string());
        log.notes = Some(format!("log-{}", i));
        log
    }

    #[test]
    fn test_summarize_cat() {
        let summary = summarize_cat(&cat());
        assert!(summary.starts_with("Name: Nabi, Breed: Korean Shorthair, Weight: 4.2kg"));
        assert!(summary.contains("Neutered: yes"));
        assert!(summary.ends_with("Chronic conditions: CKD"));
    }

    #[test]
    fn test_summarize_log_skips_unset_fields() {
        let mut log = log(0);
        log.notes = None;
        log.wet_food_amount = Some(80.0);
        log.activity_level = Some(ActivityLevel::Lazy);
        log.mood = Some(Mood::Happy);
        assert_eq!(
            summarize_log(&log),
            "2024-01-15 09:30 [meal] wet food 80g, activity lazy, mood happy"
        );
    }

    #[test]
    fn test_chat_prompt_limits_history_and_logs() {
        let history: Vec<ChatMessage> = (0..8)
            .map(|i| ChatMessage::user(None, format!("turn-{}", i), i))
            .collect();
        let logs: Vec<HealthLog> = (0..10).map(log).collect();
        let cat = cat();

        let prompt = make_chat_prompt(&ChatContext {
            message: "Is she drinking enough?",
            cat: Some(&cat),
            recent_logs: &logs,
            history: &history,
            language: Language::Korean,
        });

        assert!(!prompt.contains("turn-2"));
        assert!(prompt.contains("turn-3") && prompt.contains("turn-7"));
        assert!(prompt.contains("log-6"));
        assert!(!prompt.contains("log-7"));
        assert!(prompt.contains("Name: Nabi"));
        assert!(prompt.ends_with(Language::Korean.directive()));
    }

    #[test]
    fn test_chat_prompt_without_context() {
        let prompt = make_chat_prompt(&ChatContext {
            message: "hello",
            cat: None,
            recent_logs: &[],
            history: &[],
            language: Language::English,
        });
        assert!(!prompt.contains("Cat profile"));
        assert!(!prompt.contains("Conversation so far"));
        assert!(prompt.contains("\"hello\""));
    }

    #[test]
    fn test_voice_prompt_names_cat() {
        let prompt = make_voice_prompt("ate 50 grams", Some("Nabi"), Language::English);
        assert!(prompt.contains("cat named Nabi"));
        assert!(prompt.contains("\"ate 50 grams\""));
    }
}
