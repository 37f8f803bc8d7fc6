use crate::catalog::{RelatedSpecs, UNDETERMINED_PRODUCT};
use crate::error::{ReqdeskError, Result};
use crate::questions::QuestionId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Stands in for any clarification answer that has not been supplied.
pub const ANSWER_PENDING: &str = "（情報収集中）";

// ---------------------------------------------------------------------------
// DocumentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Draft,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
        }
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// Caller-supplied clarification answers keyed by question id. Unknown ids
/// are kept but never rendered; null and blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(HashMap<String, Option<String>>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(id.into(), Some(value.into()));
    }

    pub fn with(mut self, id: QuestionId, value: impl Into<String>) -> Self {
        self.insert(id.as_str(), value);
        self
    }

    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.0
            .get(id.as_str())
            .and_then(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Answer for `id`, or [`ANSWER_PENDING`].
    pub fn resolve(&self, id: QuestionId) -> &str {
        self.get(id).unwrap_or(ANSWER_PENDING)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// GenerateRequest
// ---------------------------------------------------------------------------

/// Inbound document-generation request. Fields are optional at the wire
/// level so absence is reported as `InvalidInput` rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub answers: Option<Answers>,
}

impl GenerateRequest {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ReqdeskError::InvalidInput(e.to_string()))
    }

    /// Both `request` and `product` must be present.
    pub fn validate(&self) -> Result<()> {
        if self.request.is_none() {
            return Err(ReqdeskError::InvalidInput(
                "missing field `request`".to_string(),
            ));
        }
        if self.product.is_none() {
            return Err(ReqdeskError::InvalidInput(
                "missing field `product`".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RequirementDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDocument {
    pub id: String,
    pub request_text: String,
    pub product: String,
    /// All four question ids, with placeholders already applied.
    pub answers: BTreeMap<QuestionId, String>,
    pub created_at: NaiveDate,
    pub status: DocumentStatus,
    /// Rendered Markdown.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Synthesizer {
    related: Arc<RelatedSpecs>,
}

impl Synthesizer {
    pub fn new(related: Arc<RelatedSpecs>) -> Self {
        Self { related }
    }

    pub fn related_specs(&self) -> &RelatedSpecs {
        &self.related
    }

    /// Validate a generation request and render it under `id`.
    ///
    /// `request` and `product` must be present; a blank product renders as
    /// [`UNDETERMINED_PRODUCT`].
    pub fn synthesize_request(
        &self,
        id: &str,
        req: GenerateRequest,
        created_at: NaiveDate,
    ) -> Result<RequirementDocument> {
        req.validate()?;
        let request = req.request.unwrap_or_default();
        let product = req.product.unwrap_or_default();
        let product = match product.trim() {
            "" => UNDETERMINED_PRODUCT,
            p => p,
        };
        let answers = req.answers.unwrap_or_default();
        Ok(self.synthesize(id, &request, product, &answers, created_at))
    }

    /// Render the requirement document. Output depends only on the arguments
    /// and the related-specs table, so identical inputs give identical text.
    pub fn synthesize(
        &self,
        id: &str,
        request_text: &str,
        product: &str,
        answers: &Answers,
        created_at: NaiveDate,
    ) -> RequirementDocument {
        let resolved: BTreeMap<QuestionId, String> = QuestionId::all()
            .iter()
            .map(|&q| (q, answers.resolve(q).to_string()))
            .collect();

        let status = DocumentStatus::Draft;
        let date = created_at.format("%Y-%m-%d");
        let mut md = String::from("# 📋 要件定義書\n\n");

        md.push_str("## 基本情報\n");
        md.push_str(&format!("- **ID**: {id}\n"));
        md.push_str(&format!("- **作成日**: {date}\n"));
        md.push_str(&format!("- **対象製品**: {product}\n"));
        md.push_str(&format!("- **ステータス**: {}\n\n", status.as_str()));

        md.push_str("## 要望概要\n**元の要望**: \n");
        md.push_str(&format!("{request_text}\n\n"));

        md.push_str("## 詳細情報\n\n");
        for q in QuestionId::all() {
            md.push_str(&format!("### {}\n{}\n\n", q.question().label, resolved[q]));
        }

        md.push_str("## 分析結果\n\n### 製品判定\n");
        md.push_str(&format!("- **対象製品**: {product}\n"));
        md.push_str("- **判定理由**: 要望内容のキーワード分析による自動判定\n\n");
        md.push_str(&format!("### 関連仕様\n{}\n\n", self.related.render(product)));

        md.push_str("## 対応方針\n（経営判断待ち）\n\n");
        md.push_str("## 備考\n");
        md.push_str("- この要件定義書は自動生成されました\n");
        md.push_str("- 追加情報が必要な場合は担当者にお問い合わせください\n\n");
        md.push_str("---\n*Generated by 要望管理Bot*");

        tracing::debug!(id, product, "synthesized requirement document");

        RequirementDocument {
            id: id.to_string(),
            request_text: request_text.to_string(),
            product: product.to_string(),
            answers: resolved,
            created_at,
            status,
            content: md,
        }
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(Arc::new(RelatedSpecs::builtin()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
