use super::load_config;
use crate::output::{print_json, print_table};
use anyhow::Context;
use reqdesk_core::classifier::Classifier;
use std::path::Path;
use std::sync::Arc;

pub fn run(config_path: &Path, words: &[String], json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = config.catalog().context("invalid catalog in config")?;
    let classifier = Classifier::new(Arc::new(catalog));

    let text = words.join(" ");
    let result = classifier.classify(&text);

    if json {
        return print_json(&result);
    }

    println!("Product:     {}", result.product);
    println!("Confidence:  {}", result.confidence);
    println!("Matched:     {}", result.matched_keyword_count);
    if !result.matched_keywords.is_empty() {
        println!("Keywords:    {}", result.matched_keywords.join(", "));
    }
    println!();

    // Catalog order, not the sorted score map, so ties read top-down.
    let rows = classifier
        .catalog()
        .entries()
        .iter()
        .map(|e| {
            let score = result.per_product_scores.get(&e.key).copied().unwrap_or(0);
            vec![e.key.clone(), e.display_name.clone(), score.to_string()]
        })
        .collect();
    print_table(&["KEY", "PRODUCT", "SCORE"], rows);
    Ok(())
}
