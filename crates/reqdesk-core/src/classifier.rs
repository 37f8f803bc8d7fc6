use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Product reported when no catalog keyword matched.
pub const UNKNOWN_PRODUCT: &str = "unknown";

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClassificationResult (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Display name of the winning product, or [`UNKNOWN_PRODUCT`].
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_key: Option<String>,
    pub confidence: Confidence,
    pub matched_keyword_count: u32,
    /// Keywords of the winning product found in the text, in catalog order.
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    /// Raw score of every catalog entry, keyed by product key.
    pub per_product_scores: BTreeMap<String, u32>,
}

impl ClassificationResult {
    pub fn is_unknown(&self) -> bool {
        self.product_key.is_none()
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Keyword-evidence classifier over a shared, immutable catalog.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: Arc<Catalog>,
}

impl Classifier {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Score `text` against every catalog entry.
    ///
    /// Each distinct keyword found as a substring of the lowercased text adds
    /// one point to its product. The strictly highest score wins; ties go to
    /// the entry declared first. Scores live in a map owned by this call.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let normalized = text.to_lowercase();

        let mut scores = BTreeMap::new();
        let mut best: Option<(usize, u32)> = None;

        for (idx, entry) in self.catalog.entries().iter().enumerate() {
            let score = entry
                .keywords
                .iter()
                .filter(|kw| normalized.contains(kw.as_str()))
                .count() as u32;
            scores.insert(entry.key.clone(), score);

            let beats = match best {
                Some((_, top)) => score > top,
                None => score > 0,
            };
            if beats {
                best = Some((idx, score));
            }
        }

        let Some((idx, score)) = best else {
            tracing::debug!(len = text.len(), "no catalog keyword matched");
            return ClassificationResult {
                product: UNKNOWN_PRODUCT.to_string(),
                product_key: None,
                confidence: Confidence::Low,
                matched_keyword_count: 0,
                matched_keywords: Vec::new(),
                per_product_scores: scores,
            };
        };

        let winner = &self.catalog.entries()[idx];
        let matched_keywords: Vec<String> = winner
            .keywords
            .iter()
            .filter(|kw| normalized.contains(kw.as_str()))
            .cloned()
            .collect();

        tracing::debug!(product = %winner.display_name, score, "classified request");

        ClassificationResult {
            product: winner.display_name.clone(),
            product_key: Some(winner.key.clone()),
            confidence: Confidence::High,
            matched_keyword_count: score,
            matched_keywords,
            per_product_scores: scores,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::builtin()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
