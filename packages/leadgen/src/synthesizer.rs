//! Query synthesis: one LLM call per run, parsed and validated into a small
//! set of diverse search phrases, with a deterministic template fallback so
//! a run always has at least one query.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::traits::QueryGenerator;
use crate::types::{CandidateQuery, QuerySource, SearchRequest};

/// Longest phrase worth sending to a map search.
const MAX_PHRASE_CHARS: usize = 60;
const MAX_PHRASE_WORDS: usize = 6;

/// Produce the ordered query list for a run. Never fails and never returns
/// an empty list: LLM failure or an unusable response falls back to
/// deterministic templates built from the sector and keyword.
pub async fn synthesize(
    request: &SearchRequest,
    config: &EngineConfig,
    generator: &dyn QueryGenerator,
) -> Vec<CandidateQuery> {
    let prompt = build_prompt(request, config.max_queries);

    let (phrases, source) = match generator.generate(&prompt).await {
        Ok(raw) => {
            let parsed = parse_phrases(&raw, request, config.max_queries);
            if parsed.is_empty() {
                warn!("LLM response contained no usable phrases, using template fallback");
                (fallback_phrases(request, config.max_queries), QuerySource::Template)
            } else {
                (parsed, QuerySource::Generated)
            }
        }
        Err(e) => {
            warn!(error = %e, "Query generation failed, using template fallback");
            (fallback_phrases(request, config.max_queries), QuerySource::Template)
        }
    };

    let suffix = location_suffix(request);
    let queries: Vec<CandidateQuery> = phrases
        .into_iter()
        .map(|phrase| CandidateQuery {
            text: match &suffix {
                Some(suffix) => format!("{} {}", phrase, suffix),
                None => phrase.clone(),
            },
            phrase,
            source,
        })
        .collect();

    info!(count = queries.len(), source = ?source, "Synthesized search queries");
    queries
}

/// Build the single generation prompt from sector, keyword and location.
pub fn build_prompt(request: &SearchRequest, max_queries: usize) -> String {
    let sector = request.sector;
    let focus = match request.trimmed_keyword() {
        Some(keyword) => format!("with a focus on \"{}\"", keyword),
        None => format!(
            "covering businesses such as {}",
            sector.default_keywords().join(", ")
        ),
    };
    let location = request.location_fields().join(" ");
    let location = if location.is_empty() {
        "anywhere".to_string()
    } else {
        location
    };

    format!(
        "Generate between 3 and {max} short search phrases a person would type into a map \
         service to find {sector} businesses {focus}, near: {location}.\n\
         For example for dermatology the phrases would be like: dermatologists, skin clinics.\n\
         Each phrase must be at most {words} words.\n\
         Return one phrase per line. No numbering, no bullet points, no commentary.",
        max = max_queries.max(3),
        sector = sector,
        focus = focus,
        location = location,
        words = MAX_PHRASE_WORDS,
    )
}

/// Parse a free-text LLM response into usable, distinct phrases. Strips
/// list markers and quotes, drops anything too long, conversational, or
/// with no token overlap with the request vocabulary, and dedups
/// case-insensitively. Pure; tested without any client.
pub fn parse_phrases(raw: &str, request: &SearchRequest, max: usize) -> Vec<String> {
    let vocabulary = relevance_vocabulary(request);
    let mut phrases: Vec<String> = Vec::new();

    for line in raw.lines() {
        let Some(phrase) = usable_phrase(line) else {
            continue;
        };
        if !is_relevant(&phrase, &vocabulary) {
            debug!(phrase = %phrase, "Discarding phrase unrelated to the request");
            continue;
        }
        if phrases.iter().any(|p| normalize(p) == normalize(&phrase)) {
            continue;
        }
        phrases.push(phrase);
        if phrases.len() == max {
            break;
        }
    }

    phrases
}

/// Tokens a phrase must overlap with to count as related to the request:
/// the sector name, the sector's default keywords, and the user keyword.
fn relevance_vocabulary(request: &SearchRequest) -> Vec<String> {
    let mut vocabulary: Vec<String> = tokens(request.sector.name()).collect();
    for keyword in request.sector.default_keywords() {
        vocabulary.extend(tokens(keyword));
    }
    if let Some(keyword) = request.trimmed_keyword() {
        vocabulary.extend(tokens(keyword));
    }
    vocabulary
}

/// A phrase relates to the request when any of its tokens overlaps the
/// vocabulary. A keyword-overlap check, not semantic verification:
/// conversational filler has no overlap, while stem-level agreement
/// ("dermatology" / "dermatologists") still counts.
fn is_relevant(phrase: &str, vocabulary: &[String]) -> bool {
    tokens(phrase).any(|token| vocabulary.iter().any(|v| tokens_match(&token, v)))
}

/// Shared prefix long enough to treat two tokens as the same stem.
const STEM_PREFIX_CHARS: usize = 6;

fn tokens_match(a: &str, b: &str) -> bool {
    if a == b || a.starts_with(b) || b.starts_with(a) {
        return true;
    }
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
        >= STEM_PREFIX_CHARS
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(|t| t.to_lowercase())
}

/// Clean one response line and check it plausibly is a search phrase.
/// A format check, not semantic verification.
fn usable_phrase(line: &str) -> Option<String> {
    let mut s = line.trim();

    // List markers: "1.", "2)", "-", "*", "•"
    s = s.trim_start_matches(['-', '*', '•']).trim_start();
    if let Some((head, rest)) = s.split_once(['.', ')']) {
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) {
            s = rest.trim_start();
        }
    }
    s = s.trim_matches(['"', '\'', '`']).trim().trim_end_matches('.');

    if s.is_empty() || s.len() > MAX_PHRASE_CHARS {
        return None;
    }
    if s.split_whitespace().count() > MAX_PHRASE_WORDS {
        return None;
    }
    // Prose markers: an apology or meta-commentary is not a search phrase.
    let lower = s.to_lowercase();
    if lower.contains("sorry") || lower.contains("as an ai") {
        return None;
    }
    if !s
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '&' | '-' | '\'' | ','))
    {
        return None;
    }

    Some(lower)
}

/// Deterministic templates from {keyword, sector defaults}. Always
/// non-empty: every sector carries at least one default keyword.
pub fn fallback_phrases(request: &SearchRequest, max: usize) -> Vec<String> {
    let mut phrases: Vec<String> = Vec::new();

    if let Some(keyword) = request.trimmed_keyword() {
        let keyword = keyword.to_lowercase();
        phrases.push(keyword.clone());
        phrases.push(format!("best {}", keyword));
        phrases.push(format!("{} near me", keyword));
    }
    for default in request.sector.default_keywords() {
        phrases.push(default.to_lowercase());
    }

    let mut distinct: Vec<String> = Vec::new();
    for phrase in phrases {
        if !distinct.iter().any(|p| normalize(p) == normalize(&phrase)) {
            distinct.push(phrase);
        }
        if distinct.len() == max {
            break;
        }
    }
    distinct
}

/// Location qualifiers in specificity order, most specific last.
fn location_suffix(request: &SearchRequest) -> Option<String> {
    let fields = request.location_fields();
    if fields.is_empty() {
        None
    } else {
        Some(format!("in {}", fields.join(" ")))
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sector;
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl QueryGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl QueryGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow!("timeout"))
        }
    }

    fn chennai_request() -> SearchRequest {
        let mut request = SearchRequest::new(Sector::Healthcare);
        request.city = Some("Chennai".into());
        request.keyword = Some("Dermatologist".into());
        request
    }

    #[test]
    fn parse_strips_list_markers_and_quotes() {
        let raw = "1. Dermatologists\n- \"Skin Clinics\"\n* cosmetic dermatology\n";
        assert_eq!(
            parse_phrases(raw, &chennai_request(), 5),
            vec!["dermatologists", "skin clinics", "cosmetic dermatology"]
        );
    }

    #[test]
    fn parse_drops_prose_and_overlong_lines() {
        let raw = "Here are some phrases you could use:\n\
                   Sorry, I cannot help with that\n\
                   a phrase that rambles on far too long to ever be typed into a map search box\n\
                   skin clinics";
        assert_eq!(parse_phrases(raw, &chennai_request(), 5), vec!["skin clinics"]);
    }

    #[test]
    fn parse_discards_phrases_unrelated_to_the_request() {
        // Short, punctuation-free filler and off-sector phrases share no
        // token with the sector name, its default keywords, or the user
        // keyword, so they must not become paid search calls.
        let raw = "I can help with that\nHappy to assist today\ncar dealers\nskin clinics";
        assert_eq!(parse_phrases(raw, &chennai_request(), 5), vec!["skin clinics"]);
    }

    #[test]
    fn parse_accepts_stem_variants_of_the_user_keyword() {
        let request = chennai_request(); // keyword "Dermatologist"
        let raw = "dermatology clinics\npediatric dermatologists";
        assert_eq!(
            parse_phrases(raw, &request, 5),
            vec!["dermatology clinics", "pediatric dermatologists"]
        );
    }

    #[test]
    fn parse_dedups_case_insensitively_and_truncates() {
        let raw = "dermatologists\nDermatologists\nskin clinics\nskin  clinics\ndoctors\ndentists";
        assert_eq!(
            parse_phrases(raw, &chennai_request(), 3),
            vec!["dermatologists", "skin clinics", "doctors"]
        );
    }

    #[test]
    fn fallback_prefers_user_keyword_templates() {
        let phrases = fallback_phrases(&chennai_request(), 5);
        assert_eq!(phrases[0], "dermatologist");
        assert_eq!(phrases[1], "best dermatologist");
        assert_eq!(phrases[2], "dermatologist near me");
        assert_eq!(phrases.len(), 5);
    }

    #[test]
    fn fallback_is_never_empty_for_any_sector() {
        for sector in Sector::ALL {
            let request = SearchRequest::new(sector);
            assert!(!fallback_phrases(&request, 5).is_empty(), "{}", sector);
        }
    }

    #[tokio::test]
    async fn generation_failure_falls_back_to_templates() {
        let queries = synthesize(&chennai_request(), &EngineConfig::default(), &FailingGenerator).await;

        assert!(!queries.is_empty());
        assert!(queries.iter().all(|q| q.source == QuerySource::Template));
        assert_eq!(queries[0].text, "dermatologist in Chennai");
    }

    #[tokio::test]
    async fn unusable_response_falls_back_to_templates() {
        let generator = FixedGenerator("I'm sorry, I cannot generate search queries right now:");
        let queries = synthesize(&chennai_request(), &EngineConfig::default(), &generator).await;

        assert!(!queries.is_empty());
        assert!(queries.iter().all(|q| q.source == QuerySource::Template));
    }

    #[tokio::test]
    async fn generated_queries_carry_location_suffix_most_specific_last() {
        let mut request = chennai_request();
        request.country = Some("India".into());
        request.postcode = Some("600001".into());

        let generator = FixedGenerator("dermatologists\nskin clinics");
        let queries = synthesize(&request, &EngineConfig::default(), &generator).await;

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].source, QuerySource::Generated);
        assert_eq!(queries[0].text, "dermatologists in India Chennai 600001");
        assert_eq!(queries[1].phrase, "skin clinics");
    }

    #[tokio::test]
    async fn queries_are_distinct_after_normalization() {
        let generator = FixedGenerator("skin clinics\nSKIN   CLINICS\nskin clinics\nderm clinics");
        let queries = synthesize(&chennai_request(), &EngineConfig::default(), &generator).await;

        let mut normalized: Vec<String> = queries.iter().map(|q| normalize(&q.text)).collect();
        normalized.sort();
        normalized.dedup();
        assert_eq!(normalized.len(), queries.len());
    }
}
