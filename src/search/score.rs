//! Lexical relevance scoring and top-K selection.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ScoringWeights;
use crate::models::CandidateChunk;
use crate::search::tokenize::{normalize, QueryTerms};

static DOC_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"readme|overview|architecture|guide").expect("valid doc-path regex"));

/// Score one chunk against the query.
///
/// Per term: a content hit plus a capped frequency bonus, a path hit, and a
/// basename hit (path and basename bonuses stack). Then a one-off bonus when
/// the whole normalized query appears in the content, and a small bias for
/// documentation-looking paths.
pub fn score_chunk(
    weights: &ScoringWeights,
    query: &QueryTerms,
    file_path: &str,
    content: &str,
) -> f64 {
    let normalized_path = normalize(file_path);
    let normalized_content = normalize(content);
    let basename = normalized_path.rsplit('/').next().unwrap_or_default();

    let mut score = 0.0;

    for term in &query.terms {
        let term = term.as_str();
        if normalized_content.contains(term) {
            let freq = normalized_content.matches(term).count().min(weights.frequency_cap);
            score += weights.content_hit + freq as f64 * weights.frequency_step;
        }
        if normalized_path.contains(term) {
            score += weights.path_hit;
        }
        if basename.contains(term) {
            score += weights.basename_hit;
        }
    }

    if !query.normalized.is_empty() && normalized_content.contains(&query.normalized) {
        score += weights.whole_query;
    }

    if DOC_PATH.is_match(&normalized_path) {
        score += weights.doc_bias;
    }

    score
}

/// Pick the top `k` chunks.
///
/// Candidates are stable-sorted by descending score, so ties keep encounter
/// order. Only a buffer of `3k` is considered; positive scores win. With no
/// positive score at all, `zero_score_fallback` decides between the top `k`
/// anyway and nothing.
pub fn rank_chunks(
    mut candidates: Vec<CandidateChunk>,
    k: usize,
    zero_score_fallback: bool,
) -> Vec<CandidateChunk> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(k.saturating_mul(3).max(k));

    let has_match = candidates.iter().any(|c| c.score > 0.0);
    if has_match {
        candidates.retain(|c| c.score > 0.0);
    } else if !zero_score_fallback {
        return Vec::new();
    }

    candidates.truncate(k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn chunk(path: &str, score: f64) -> CandidateChunk {
        CandidateChunk {
            score,
            file_path: path.into(),
            start_line: 1,
            end_line: 1,
            content: String::new(),
        }
    }

    #[test]
    fn test_score_content_hit_with_frequency() {
        let w = ScoringWeights::default();
        let q = QueryTerms::parse("token");
        // one occurrence: 1 + 0.2
        assert!(approx(score_chunk(&w, &q, "src/a.rs", "a token here"), 1.2 + 3.0));
        // frequency caps at six occurrences
        let many = "token ".repeat(10);
        assert!(approx(score_chunk(&w, &q, "src/a.rs", &many), 1.0 + 1.2 + 3.0));
    }

    #[test]
    fn test_score_path_and_basename_stack() {
        let w = ScoringWeights::default();
        let q = QueryTerms::parse("zq auth");
        // "auth" in dir only: path hit
        assert!(approx(score_chunk(&w, &q, "auth/mod.rs", "nothing"), 1.5));
        // "auth" in basename: path + basename
        assert!(approx(score_chunk(&w, &q, "src/auth.rs", "nothing"), 2.5));
    }

    #[test]
    fn test_score_whole_query_bonus() {
        let w = ScoringWeights::default();
        let q = QueryTerms::parse("refresh token");
        let with = score_chunk(&w, &q, "x.rs", "we refresh token values");
        let without = score_chunk(&w, &q, "x.rs", "token we refresh");
        assert!(approx(with - without, 3.0));
    }

    #[test]
    fn test_score_doc_bias() {
        let w = ScoringWeights::default();
        let q = QueryTerms::parse("zzz");
        assert!(approx(score_chunk(&w, &q, "docs/Architecture.md", "text"), 0.4));
        assert!(approx(score_chunk(&w, &q, "src/main.rs", "text"), 0.0));
    }

    #[test]
    fn test_score_monotonic_in_hits() {
        let w = ScoringWeights::default();
        let q = QueryTerms::parse("jwt authentication");
        let one = score_chunk(&w, &q, "src/x.rs", "uses jwt");
        let two = score_chunk(&w, &q, "src/x.rs", "uses jwt for authentication");
        let path = score_chunk(&w, &q, "src/jwt.rs", "uses jwt for authentication");
        assert!(one > 0.0);
        assert!(two > one);
        assert!(path > two);
    }

    #[test]
    fn test_score_custom_weights() {
        let w = ScoringWeights {
            doc_bias: 0.0,
            whole_query: 0.0,
            ..ScoringWeights::default()
        };
        let q = QueryTerms::parse("guide");
        assert!(approx(score_chunk(&w, &q, "notes.txt", "guide"), 1.2));
    }

    #[test]
    fn test_rank_keeps_positive_top_k() {
        let candidates = vec![
            chunk("a", 0.0),
            chunk("b", 2.0),
            chunk("c", 5.0),
            chunk("d", 2.0),
            chunk("e", 0.0),
        ];
        let ranked = rank_chunks(candidates, 2, true);
        let paths: Vec<&str> = ranked.iter().map(|c| c.file_path.as_str()).collect();
        assert_eq!(paths, vec!["c", "b"]);
    }

    #[test]
    fn test_rank_drops_zero_scores_when_some_match() {
        let candidates = vec![chunk("a", 0.0), chunk("b", 1.0), chunk("c", 0.0)];
        let ranked = rank_chunks(candidates, 3, true);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].file_path, "b");
    }

    #[test]
    fn test_rank_zero_score_fallback_keeps_encounter_order() {
        let candidates: Vec<_> = (0..5).map(|i| chunk(&format!("f{i}"), 0.0)).collect();
        let ranked = rank_chunks(candidates, 3, true);
        let paths: Vec<&str> = ranked.iter().map(|c| c.file_path.as_str()).collect();
        assert_eq!(paths, vec!["f0", "f1", "f2"]);
    }

    #[test]
    fn test_rank_zero_score_fallback_disabled() {
        let candidates: Vec<_> = (0..5).map(|i| chunk(&format!("f{i}"), 0.0)).collect();
        assert!(rank_chunks(candidates, 3, false).is_empty());
    }

    #[test]
    fn test_rank_k_zero() {
        assert!(rank_chunks(vec![chunk("a", 1.0)], 0, true).is_empty());
    }
}
