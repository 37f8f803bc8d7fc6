use crate::catalog::{self, Catalog, ProductCatalogEntry, RelatedSpecs};
use crate::error::Result;
use crate::id::IdPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "reqdesk.yaml";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// IdConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default)]
    pub policy: IdPolicy,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ids: IdConfig,
    /// Replaces the built-in catalog when present. Order is significant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<ProductCatalogEntry>>,
    /// Replaces the built-in related-specs table when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_specs: Option<HashMap<String, Vec<String>>>,
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Config with the built-in tables written out, as a starting point for
    /// customization.
    pub fn with_builtin_tables() -> Self {
        let related = RelatedSpecs::builtin();
        let related_specs = related
            .products()
            .filter_map(|p| {
                related
                    .for_product(p)
                    .map(|items| (p.to_string(), items.to_vec()))
            })
            .collect();
        Self {
            catalog: Some(catalog::builtin_entries()),
            related_specs: Some(related_specs),
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(entries) => Catalog::new(entries.clone()),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn related_specs(&self) -> RelatedSpecs {
        match &self.related_specs {
            Some(specs) => RelatedSpecs::new(specs.clone()),
            None => RelatedSpecs::builtin(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.port is 0; the OS will pick a port".to_string(),
            });
        }

        // 1. Catalog shape
        if let Some(entries) = &self.catalog {
            if entries.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "catalog is empty".to_string(),
                });
            }
            let mut keys = HashSet::new();
            let mut names = HashSet::new();
            for entry in entries {
                if !keys.insert(entry.key.as_str()) {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!("duplicate product key '{}'", entry.key),
                    });
                }
                if !names.insert(entry.display_name.as_str()) {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!(
                            "duplicate display name '{}' (product '{}')",
                            entry.display_name, entry.key
                        ),
                    });
                }
                if entry.keywords.is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "product '{}' has no keywords and can never be selected",
                            entry.key
                        ),
                    });
                }
                let mut seen = HashSet::new();
                for kw in &entry.keywords {
                    let norm = kw.trim().to_lowercase();
                    if norm.is_empty() {
                        warnings.push(ConfigWarning {
                            level: WarnLevel::Error,
                            message: format!("product '{}' has an empty keyword", entry.key),
                        });
                    } else if !seen.insert(norm) {
                        warnings.push(ConfigWarning {
                            level: WarnLevel::Warning,
                            message: format!(
                                "product '{}' lists keyword '{}' more than once",
                                entry.key, kw
                            ),
                        });
                    }
                }
            }
        }

        // 2. Related specs must point at a known display name. An invalid
        // catalog is already reported above.
        if let (Some(specs), Ok(catalog)) = (&self.related_specs, self.catalog()) {
            let mut products: Vec<&String> = specs.keys().collect();
            products.sort();
            for product in products {
                if product != catalog::UNDETERMINED_PRODUCT
                    && catalog.by_display_name(product).is_none()
                {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "related_specs entry '{product}' does not match any product display name"
                        ),
                    });
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.ids.policy, IdPolicy::Sequential);
        assert_eq!(cfg.catalog().unwrap().len(), 5);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "server:\n  port: 8080\nids:\n  policy: random\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.ids.policy, IdPolicy::Random);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn custom_catalog_preserves_order() {
        let yaml = r#"
catalog:
  - key: mobile-app
    display_name: mobile
    keywords: [iOS, Android]
  - key: web-app
    display_name: web
    keywords: [browser]
related_specs:
  mobile: [screens/home]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let catalog = cfg.catalog().unwrap();
        assert_eq!(catalog.entries()[0].key, "mobile-app");
        assert_eq!(catalog.entries()[0].keywords, vec!["ios", "android"]);
        assert_eq!(cfg.related_specs().render("mobile"), "- screens/home");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let cfg = Config::with_builtin_tables();
        cfg.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(
            loaded.catalog().unwrap().entries(),
            Catalog::builtin().entries()
        );
        assert_eq!(loaded.related_specs(), RelatedSpecs::builtin());
        assert!(loaded.validate().is_empty());
    }

    #[test]
    fn validate_reports_catalog_problems() {
        let cfg = Config {
            catalog: Some(vec![
                ProductCatalogEntry::new("a", "A", &["x", "X"]),
                ProductCatalogEntry::new("a", "B", &[]),
            ]),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("duplicate product key")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("more than once")));
        assert!(warnings.iter().any(|w| w.message.contains("no keywords")));
    }

    #[test]
    fn validate_rejects_duplicate_display_names() {
        let cfg = Config {
            catalog: Some(vec![
                ProductCatalogEntry::new("web-a", "web", &["browser"]),
                ProductCatalogEntry::new("web-b", "web", &["html"]),
            ]),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("duplicate display name 'web'"));
        assert!(cfg.catalog().is_err());
    }

    #[test]
    fn invalid_catalog_skips_related_specs_check() {
        let mut specs = HashMap::new();
        specs.insert("mobile".to_string(), vec!["screens/home".to_string()]);
        let cfg = Config {
            catalog: Some(vec![ProductCatalogEntry::new("mobile-app", "mobile", &["ios", " "])]),
            related_specs: Some(specs),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].message.contains("empty keyword"));
    }

    #[test]
    fn validate_flags_orphan_related_specs() {
        let mut specs = HashMap::new();
        specs.insert("ghost".to_string(), vec!["x".to_string()]);
        let cfg = Config {
            related_specs: Some(specs),
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("ghost"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "server: [unclosed").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
