use crate::error::{ReqdeskError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Display name used when a generation request carries a blank product.
pub const UNDETERMINED_PRODUCT: &str = "undetermined";

// ---------------------------------------------------------------------------
// ProductCatalogEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalogEntry {
    /// Stable internal identifier, e.g. `recho-platform-dashboard`.
    pub key: String,
    /// Short name shown to users and embedded in documents.
    pub display_name: String,
    pub keywords: Vec<String>,
}

impl ProductCatalogEntry {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        keywords: &[&str],
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Lowercase and trim every keyword, dropping duplicates while keeping
    /// first-seen order. Fails on a keyword that normalizes to nothing.
    fn normalized(mut self) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut keywords = Vec::with_capacity(self.keywords.len());
        for raw in &self.keywords {
            let kw = raw.trim().to_lowercase();
            if kw.is_empty() {
                return Err(ReqdeskError::InvalidCatalog(format!(
                    "product '{}' has an empty keyword",
                    self.key
                )));
            }
            if seen.insert(kw.clone()) {
                keywords.push(kw);
            }
        }
        self.keywords = keywords;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered product table. Iteration follows declaration order, which is also
/// the classifier's tie-break order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<ProductCatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<ProductCatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ReqdeskError::InvalidCatalog(
                "catalog has no products".to_string(),
            ));
        }
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.key.trim().is_empty() {
                return Err(ReqdeskError::InvalidCatalog(
                    "product key must not be empty".to_string(),
                ));
            }
            if !keys.insert(entry.key.clone()) {
                return Err(ReqdeskError::InvalidCatalog(format!(
                    "duplicate product key '{}'",
                    entry.key
                )));
            }
            // Related specs and documents refer to products by display name.
            if !names.insert(entry.display_name.clone()) {
                return Err(ReqdeskError::InvalidCatalog(format!(
                    "duplicate display name '{}'",
                    entry.display_name
                )));
            }
            normalized.push(entry.normalized()?);
        }
        Ok(Self {
            entries: normalized,
        })
    }

    /// The built-in product table. Its keywords are already normalized.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    pub fn entries(&self) -> &[ProductCatalogEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&ProductCatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn by_display_name(&self, name: &str) -> Option<&ProductCatalogEntry> {
        self.entries.iter().find(|e| e.display_name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn builtin_entries() -> Vec<ProductCatalogEntry> {
    vec![
        ProductCatalogEntry::new(
            "recho-platform-dashboard",
            "dashboard",
            &[
                "ログイン",
                "画面",
                "ui",
                "表示",
                "ボタン",
                "レイアウト",
                "デザイン",
                "グラフ",
                "ダッシュボード",
            ],
        ),
        ProductCatalogEntry::new(
            "recho-platform-dashboard-api",
            "dashboard-api",
            &[
                "api",
                "認証",
                "データベース",
                "サーバー",
                "バックエンド",
                "権限",
                "セキュリティ",
            ],
        ),
        ProductCatalogEntry::new(
            "recho-platform-call-runner",
            "call-runner",
            &["通話", "架電", "スケジュール", "csv", "電話番号", "発信"],
        ),
        ProductCatalogEntry::new(
            "recho-platform-voiceagent-server",
            "voiceagent-server",
            &["音声", "ai", "対話", "認識", "合成", "会話"],
        ),
        ProductCatalogEntry::new(
            "recho-corporate-site",
            "corporate-site",
            &["サイト", "ホームページ", "お問い合わせ", "ニュース", "採用"],
        ),
    ]
}

// ---------------------------------------------------------------------------
// RelatedSpecs
// ---------------------------------------------------------------------------

/// Rendered in place of the list when a product has no entry.
pub const RELATED_SPECS_PENDING: &str = "（関連仕様を調査中）";

/// Reference items listed in a document's "関連仕様" block, keyed by product
/// display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelatedSpecs {
    specs: HashMap<String, Vec<String>>,
}

impl RelatedSpecs {
    pub fn new(specs: HashMap<String, Vec<String>>) -> Self {
        Self { specs }
    }

    pub fn builtin() -> Self {
        let table: [(&str, &[&str]); 6] = [
            (
                "dashboard",
                &["features/sign-in", "features/view-dashboard", "routes/home"],
            ),
            (
                "dashboard-api",
                &["api/auth", "api/organization", "api/project"],
            ),
            ("call-runner", &["通話実行機能", "スケジューリング機能"]),
            ("voiceagent-server", &["音声処理機能", "AI対話機能"]),
            (
                "corporate-site",
                &["features/view-contact", "features/view-news-list"],
            ),
            (UNDETERMINED_PRODUCT, &["（製品特定後に追加）"]),
        ];
        let specs = table
            .iter()
            .map(|(product, items)| {
                (
                    product.to_string(),
                    items.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { specs }
    }

    pub fn for_product(&self, product: &str) -> Option<&[String]> {
        self.specs.get(product).map(|v| v.as_slice())
    }

    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(|k| k.as_str())
    }

    /// Markdown bullet list for `product`, or the pending placeholder.
    pub fn render(&self, product: &str) -> String {
        match self.for_product(product) {
            Some(items) if !items.is_empty() => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => format!("- {RELATED_SPECS_PENDING}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
