//! Reply language and the fixed fallback texts.

use serde::{Deserialize, Serialize};

/// Display language of AI replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Korean,
}

impl Language {
    /// Parse a locale code such as `ko`, `ko-KR` or `en_US`. Unknown codes are English.
    pub fn from_code(code: &str) -> Self {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ko" | "kr" | "korean" => Language::Korean,
            _ => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
        }
    }

    /// Closing prompt line telling the model which language to answer in.
    pub fn directive(&self) -> &'static str {
        match self {
            Language::English => "Respond in English.",
            Language::Korean => "Respond in Korean (한국어로 답변하세요).",
        }
    }

    pub fn chat_fallback(&self) -> &'static str {
        match self {
            Language::English => {
                "Sorry, the AI assistant is unavailable right now. Please try again later, \
                 and consult a veterinarian if you are worried about your cat."
            }
            Language::Korean => {
                "죄송합니다. 지금은 AI 상담을 이용할 수 없습니다. 잠시 후 다시 시도해 주시고, \
                 걱정되는 증상이 있다면 수의사와 상담해 주세요."
            }
        }
    }

    pub fn symptom_fallback(&self) -> &'static str {
        match self {
            Language::English => {
                "The symptoms could not be analyzed automatically. Please consult a veterinarian."
            }
            Language::Korean => "증상을 자동으로 분석하지 못했습니다. 수의사와 상담해 주세요.",
        }
    }

    pub fn symptom_fallback_recommendations(&self) -> Vec<String> {
        let items: [&str; 2] = match self {
            Language::English => [
                "Monitor your cat closely and note any changes.",
                "Contact a veterinarian if the symptoms persist or worsen.",
            ],
            Language::Korean => [
                "고양이의 상태를 주의 깊게 관찰하고 변화를 기록하세요.",
                "증상이 계속되거나 악화되면 수의사에게 연락하세요.",
            ],
        };
        items.iter().map(|s| s.to_string()).collect()
    }

    pub fn voice_fallback(&self) -> &'static str {
        match self {
            Language::English => "The recording could not be understood. Please try manual input.",
            Language::Korean => "음성 내용을 이해하지 못했습니다. 직접 입력해 주세요.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ko"), Language::Korean);
        assert_eq!(Language::from_code("ko-KR"), Language::Korean);
        assert_eq!(Language::from_code("en_US"), Language::English);
        assert_eq!(Language::from_code(""), Language::English);
        assert_eq!(Language::from_code("fr"), Language::English);
    }

    #[test]
    fn test_fallbacks_differ_per_language() {
        assert_ne!(Language::English.chat_fallback(), Language::Korean.chat_fallback());
        assert_eq!(Language::Korean.symptom_fallback_recommendations().len(), 2);
    }
}
