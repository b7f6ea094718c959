use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_SUGGESTION_COUNT: u32 = 5;
pub const MAX_SUGGESTION_COUNT: u32 = 20;

#[derive(Deserialize, Validate)]
pub struct SummarizeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
    pub prompt: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SummaryResponse {
    pub summary: String,
    pub model: String,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One prior turn of a chat. Any role other than `model` is treated as `user`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default, alias = "content")]
    pub text: String,
}

impl ChatTurn {
    pub fn role(&self) -> ChatRole {
        if self.role == "model" {
            ChatRole::Model
        } else {
            ChatRole::User
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize, Debug)]
pub struct ChatResponse {
    pub text: String,
    pub model: String,
}

#[derive(Deserialize, Validate, Default, Debug)]
pub struct SuggestArticlesRequest {
    #[serde(default, alias = "q")]
    pub query: String,
    #[serde(alias = "yearFrom")]
    pub year_from: Option<i32>,
    pub year: Option<i32>,
    pub num: Option<u32>,
}

impl SuggestArticlesRequest {
    pub fn count(&self) -> u32 {
        match self.num {
            Some(n) if n >= 1 => n.min(MAX_SUGGESTION_COUNT),
            _ => DEFAULT_SUGGESTION_COUNT,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuggestedArticle {
    pub result_id: String,
    pub title: String,
    pub link: Option<String>,
    pub authors: String,
    pub summary: Option<String>,
    pub year: Option<i32>,
    pub pdf_url: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SuggestedArticles {
    pub results: Vec<SuggestedArticle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_chat_roles_become_user() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(turn.role(), ChatRole::User);
        assert_eq!(turn.text, "hi");

        let turn: ChatTurn = serde_json::from_str(r#"{"role":"model","text":"yo"}"#).unwrap();
        assert_eq!(turn.role(), ChatRole::Model);
    }

    #[test]
    fn suggestion_count_is_bounded() {
        let mut req = SuggestArticlesRequest::default();
        assert_eq!(req.count(), 5);
        req.num = Some(0);
        assert_eq!(req.count(), 5);
        req.num = Some(100);
        assert_eq!(req.count(), 20);
    }
}
