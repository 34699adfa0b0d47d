//! AI research assistant used by `propose value --search`.
//!
//! Asks a web-search-grounded completion model for the answer to a request's
//! question, in a fixed JSON shape (`value`, `sources`, `why`). The model
//! signals unanswerable questions with sentinel values.

use crate::core::error::GooError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
pub const FUTURE_QUESTION: &str = "FUTURE_QUESTION_ERROR";
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT DATA";
pub const MAX_SOURCES: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const SOURCE_TIMEOUT: Duration = Duration::from_secs(5);
const PLAIN_VALUE_LIMIT: usize = 200;
const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResearchAnswer {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub why: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchOutcome {
    Answer(ResearchAnswer),
    /// The question is about something that has not happened yet.
    FutureQuestion { why: String },
    InsufficientData { why: String },
}

impl ResearchOutcome {
    pub fn from_answer(answer: ResearchAnswer) -> Self {
        match answer.value.trim() {
            FUTURE_QUESTION => ResearchOutcome::FutureQuestion { why: answer.why },
            INSUFFICIENT_DATA => ResearchOutcome::InsufficientData { why: answer.why },
            _ => ResearchOutcome::Answer(answer),
        }
    }
}

pub trait Researcher {
    fn research(&self, question: &str) -> Result<ResearchOutcome, GooError>;
}

/// Turn the model's answer into the value submitted on chain.
///
/// Yes/no questions take `Yes`/`No` (any case) and become `1`/`0`. Numeric
/// questions need a plain decimal: optional sign, digits, at most one `.`.
pub fn normalize_answer(answer: &str, is_yes_no: bool) -> Result<String, GooError> {
    let trimmed = answer.trim();
    if is_yes_no {
        return match trimmed.to_ascii_lowercase().as_str() {
            "yes" => Ok("1".to_string()),
            "no" => Ok("0".to_string()),
            _ => Err(GooError::ValidationError(format!(
                "invalid yes/no answer '{}': expected 'Yes' or 'No'",
                trimmed
            ))),
        };
    }
    if is_plain_number(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(GooError::ValidationError(format!(
            "invalid numeric answer '{}': expected a plain number like '3874' or '3874.50'",
            trimmed
        )))
    }
}

fn is_plain_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next();
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match frac {
        None => all_digits(whole),
        Some(f) => all_digits(whole) && all_digits(f),
    }
}

/// Pull the answer object out of the model text: the whole text, a fenced
/// ```json block, or the outermost `{...}`.
pub fn parse_answer_json(text: &str) -> Option<ResearchAnswer> {
    if let Ok(answer) = serde_json::from_str(text.trim()) {
        return Some(answer);
    }
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            if let Ok(answer) = serde_json::from_str(rest[..end].trim()) {
                return Some(answer);
            }
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Fallback when the model ignored the JSON format.
pub fn plain_text_answer(text: &str, sources: Vec<String>) -> ResearchAnswer {
    let trimmed = text.trim();
    let value = match trimmed.find('.') {
        Some(idx) if idx < PLAIN_VALUE_LIMIT => trimmed[..idx].trim().to_string(),
        _ => trimmed
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(PLAIN_VALUE_LIMIT)
            .collect(),
    };
    ResearchAnswer {
        value,
        sources,
        why: trimmed.to_string(),
    }
}

pub fn system_prompt(current_date: &str) -> String {
    format!(
        r#"You are an AI research agent answering questions for an optimistic oracle proposer.

TODAY'S DATE: {date}. Use it to decide whether a question is about the past or the future.

Perform real web research with Google Search, find reliable factual information and return:
1. the proposed value (the answer),
2. the sources (real URLs from your search results only, never invented),
3. the justification (short reasoning with quotes from the sources).

Questions about events that already happened are answerable even if they mention future
dates. Questions about events that have not happened yet as of {date} are not: answer them with
{{"value": "{future}", "sources": [], "why": "<why the data does not exist yet>"}}.
If no definitive answer exists for a past question after searching, use "{insufficient}" as the value.

VALUE FORMAT:
- Numeric questions: only a plain number such as "3874", "3874.50", "-42" or "0.5".
  No currency symbols, no thousand separators, no units, no surrounding text.
- Yes/no questions: exactly "Yes" or "No".
The value is parsed programmatically; put explanations in "why".

Respond with ONLY this JSON object and nothing before or after it:
{{"value": "...", "sources": ["url1", "url2"], "why": "explanation with quotes"}}"#,
        date = current_date,
        future = FUTURE_QUESTION,
        insufficient = INSUFFICIENT_DATA,
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: String,
}

fn metadata_sources(candidate: &Candidate) -> Vec<String> {
    candidate
        .grounding_metadata
        .iter()
        .flat_map(|m| m.grounding_chunks.iter())
        .filter_map(|chunk| chunk.web.as_ref())
        .filter(|web| !web.uri.is_empty())
        .map(|web| web.uri.clone())
        .collect()
}

pub struct GeminiResearcher {
    api_key: String,
    url: String,
    client: reqwest::blocking::Client,
    probe: reqwest::blocking::Client,
    verbose: bool,
}

impl GeminiResearcher {
    pub fn new(api_key: &str, verbose: bool) -> Result<Self, GooError> {
        if api_key.trim().is_empty() {
            return Err(GooError::ConfigError(
                "Google API key not configured. Run 'goo config init' or set google_api_key in ~/.goo/config.toml".to_string(),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GooError::ResearchError(format!("failed to build HTTP client: {}", e)))?;
        let probe = reqwest::blocking::Client::builder()
            .timeout(SOURCE_TIMEOUT)
            .user_agent(BROWSER_AGENT)
            .build()
            .map_err(|e| GooError::ResearchError(format!("failed to build HTTP client: {}", e)))?;
        Ok(GeminiResearcher {
            api_key: api_key.trim().to_string(),
            url: GEMINI_URL.to_string(),
            client,
            probe,
            verbose,
        })
    }

    /// Keep up to `MAX_SOURCES` URLs that answer a GET with 200.
    fn validate_sources(&self, sources: Vec<String>) -> Vec<String> {
        let found = sources.len();
        let mut valid = Vec::new();
        for url in sources {
            if valid.len() >= MAX_SOURCES {
                break;
            }
            let ok = self
                .probe
                .get(&url)
                .send()
                .map(|resp| resp.status() == reqwest::StatusCode::OK)
                .unwrap_or(false);
            debug!(url = %url, ok, "source check");
            if ok {
                valid.push(url);
            }
        }
        if found > 0 {
            eprintln!("✓ {} valid sources (out of {} found)", valid.len(), found);
        }
        valid
    }
}

impl Researcher for GeminiResearcher {
    fn research(&self, question: &str) -> Result<ResearchOutcome, GooError> {
        if question.trim().is_empty() {
            return Err(GooError::ResearchError("question cannot be empty".to_string()));
        }
        let date = Utc::now().format("%B %-d, %Y").to_string();
        let prompt = system_prompt(&date);
        let body = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part { text: &prompt }],
            },
            contents: vec![Content {
                parts: vec![Part { text: question }],
            }],
            tools: vec![Tool {
                google_search: serde_json::Map::new(),
            }],
        };
        info!(date = %date, "querying research model");
        if self.verbose {
            eprintln!("Querying Gemini with Google Search...\n  Question: {}\n  Date: {}", question, date);
        }

        let resp = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| GooError::ResearchError(format!("failed to send request: {}", e)))?;
        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| GooError::ResearchError(format!("failed to read response: {}", e)))?;
        if self.verbose {
            eprintln!("Response status: {}\n{}", status, text);
        }
        if !status.is_success() {
            return Err(GooError::ResearchError(format!(
                "API error (status {}): {}",
                status.as_u16(),
                text
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        let candidate = parsed
            .candidates
            .first()
            .ok_or_else(|| GooError::ResearchError("no response from model".to_string()))?;
        let answer_text = candidate
            .content
            .parts
            .first()
            .map(|p| p.text.as_str())
            .ok_or_else(|| GooError::ResearchError("empty response from model".to_string()))?;

        let answer = match parse_answer_json(answer_text) {
            Some(mut answer) => {
                if answer.sources.is_empty() {
                    answer.sources = metadata_sources(candidate);
                }
                answer.sources = self.validate_sources(answer.sources);
                answer
            }
            None => {
                warn!("research response is not JSON, using plain text");
                let sources = self.validate_sources(metadata_sources(candidate));
                plain_text_answer(answer_text, sources)
            }
        };
        Ok(ResearchOutcome::from_answer(answer))
    }
}
