use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::db::models::ai::SuggestedArticle;
use crate::error::{AppError, AppResult};

pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Scholarly search through the SerpAPI `google_scholar` engine.
#[derive(Clone)]
pub struct ScholarSearchClient {
    http: Client,
    config: SearchConfig,
}

/// `year` counts back from the current year ("last N years", current included);
/// an explicit `year_from` wins.
pub fn resolve_year_from(year_from: Option<i32>, year: Option<i32>, current_year: i32) -> Option<i32> {
    match (year_from, year) {
        (Some(from), _) if from > 0 => Some(from),
        (_, Some(n)) if n > 0 => Some(current_year - n + 1),
        _ => None,
    }
}

/// Maps one `organic_results` entry. `fallback_id` is used when the provider
/// gives neither `result_id` nor `position`.
pub fn map_result(item: &Value, fallback_id: String) -> SuggestedArticle {
    let str_at = |pointer: &str| item.pointer(pointer).and_then(Value::as_str).map(str::to_string);

    let publication_summary = str_at("/publication_info/summary").unwrap_or_default();

    let authors = item
        .pointer("/publication_info/authors")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    let pdf_url = item
        .get("resources")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|r| {
            r.get("file_format")
                .and_then(Value::as_str)
                .is_some_and(|f| f.eq_ignore_ascii_case("pdf"))
                && r.get("link").and_then(Value::as_str).is_some()
        })
        .and_then(|r| r.get("link").and_then(Value::as_str))
        .map(str::to_string);

    let result_id = str_at("/result_id")
        .or_else(|| match item.get("position") {
            Some(Value::String(p)) => Some(p.clone()),
            Some(Value::Number(p)) => Some(p.to_string()),
            _ => None,
        })
        .unwrap_or(fallback_id);

    let snippet = str_at("/snippet").filter(|s| !s.is_empty());
    let summary = snippet.or_else(|| Some(publication_summary.clone()).filter(|s| !s.is_empty()));

    let link = str_at("/link")
        .filter(|l| !l.is_empty())
        .or_else(|| pdf_url.clone());

    SuggestedArticle {
        result_id,
        title: str_at("/title").unwrap_or_default(),
        link,
        authors,
        summary,
        year: year_in_parentheses(&publication_summary),
        pdf_url,
    }
}

fn year_in_parentheses(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    bytes.windows(6).find_map(|w| {
        if w[0] == b'(' && w[5] == b')' && w[1..5].iter().all(u8::is_ascii_digit) {
            std::str::from_utf8(&w[1..5]).ok()?.parse().ok()
        } else {
            None
        }
    })
}

impl ScholarSearchClient {
    pub fn new(http: Client, config: SearchConfig) -> Self {
        Self { http, config }
    }

    pub async fn search(
        &self,
        query: &str,
        year_from: Option<i32>,
        num: usize,
    ) -> AppResult<Vec<SuggestedArticle>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::internal("Search provider API key is not configured"))?;

        let url = format!("{}/search.json", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![
            ("engine", "google_scholar".to_string()),
            ("q", query.to_string()),
            ("api_key", api_key.to_string()),
        ];
        if let Some(from) = year_from {
            params.push(("as_ylo", from.to_string()));
        }

        debug!(query = %query, year_from = ?year_from, "Searching scholarly articles");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                warn!("Search request failed: {}", e);
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Search provider returned an error status");
            return Err(AppError::upstream(format!(
                "Search provider returned {}",
                status
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Invalid search response: {}", e)))?;

        if let Some(error) = data.get("error").and_then(Value::as_str) {
            warn!("Search provider error: {}", error);
            return Err(AppError::upstream(format!("Search provider: {}", error)));
        }

        let now_ms = chrono::Utc::now().timestamp_millis();
        let results = data
            .get("organic_results")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .take(num)
                    .enumerate()
                    .map(|(idx, item)| map_result(item, format!("res_{}_{}", idx, now_ms)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_n_years_includes_current() {
        assert_eq!(resolve_year_from(None, Some(5), 2026), Some(2022));
        assert_eq!(resolve_year_from(Some(2019), Some(5), 2026), Some(2019));
        assert_eq!(resolve_year_from(None, Some(0), 2026), None);
        assert_eq!(resolve_year_from(None, None, 2026), None);
    }

    #[test]
    fn maps_provider_fields() {
        let item = json!({
            "result_id": "abc",
            "title": "Graph Neural Networks",
            "link": "https://example.org/gnn",
            "snippet": "We study...",
            "publication_info": {
                "summary": "A Author, B Author - Journal (2021) - example.org",
                "authors": [{"name": "A Author"}, {"name": "B Author"}]
            },
            "resources": [
                {"file_format": "HTML", "link": "https://x"},
                {"file_format": "PDF", "link": "https://example.org/gnn.pdf"}
            ]
        });
        let article = map_result(&item, "fallback".into());
        assert_eq!(article.result_id, "abc");
        assert_eq!(article.authors, "A Author, B Author");
        assert_eq!(article.year, Some(2021));
        assert_eq!(article.summary.as_deref(), Some("We study..."));
        assert_eq!(article.pdf_url.as_deref(), Some("https://example.org/gnn.pdf"));
    }

    #[test]
    fn falls_back_to_position_then_generated_id() {
        let by_position = map_result(&json!({"position": 3, "title": "T"}), "gen".into());
        assert_eq!(by_position.result_id, "3");

        let generated = map_result(&json!({"title": "T"}), "gen".into());
        assert_eq!(generated.result_id, "gen");
        assert_eq!(generated.link, None);
        assert_eq!(generated.year, None);
    }

    #[test]
    fn link_falls_back_to_pdf() {
        let item = json!({
            "title": "T",
            "resources": [{"file_format": "pdf", "link": "https://p.pdf"}]
        });
        assert_eq!(map_result(&item, "g".into()).link.as_deref(), Some("https://p.pdf"));
    }
}
