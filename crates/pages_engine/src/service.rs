use pages_logging::{pages_debug, pages_warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{ApiClient, ApiError, Endpoint};

pub const NO_SUMMARY: &str = "(No summary)";
pub const NO_ANSWER: &str = "(No answer)";

#[derive(Debug, Default, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QaResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    sources: Option<Vec<String>>,
}

/// Answer text plus any source snippets the service returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub markdown: String,
    pub sources: Vec<String>,
}

/// Calls `/summary` and returns the summary Markdown, or the placeholder when
/// the service sent none.
pub async fn fetch_summary(client: &dyn ApiClient, url: &str) -> Result<String, ApiError> {
    let body = json!({ "url": url });
    let reply = client.post_json(Endpoint::Summary.path(), &body).await?;
    let response: SummaryResponse = parse_reply(reply, Endpoint::Summary);
    Ok(non_empty_or(response.summary, NO_SUMMARY))
}

/// Calls `/qa` for one question about `url`.
pub async fn fetch_answer(
    client: &dyn ApiClient,
    url: &str,
    question: &str,
) -> Result<Answer, ApiError> {
    let body = json!({ "url": url, "question": question });
    let reply = client.post_json(Endpoint::Qa.path(), &body).await?;
    let response: QaResponse = parse_reply(reply, Endpoint::Qa);
    let sources = response.sources.unwrap_or_default();
    pages_debug!("answer for {} came with {} sources", url, sources.len());
    Ok(Answer {
        markdown: non_empty_or(response.answer, NO_ANSWER),
        sources,
    })
}

// A reply of the wrong shape degrades to "field missing" rather than failing.
fn parse_reply<T: Default + for<'de> Deserialize<'de>>(reply: Value, endpoint: Endpoint) -> T {
    match serde_json::from_value(reply) {
        Ok(parsed) => parsed,
        Err(err) => {
            pages_warn!("unexpected {} reply shape: {}", endpoint.path(), err);
            T::default()
        }
    }
}

fn non_empty_or(value: Option<String>, placeholder: &str) -> String {
    value
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}
