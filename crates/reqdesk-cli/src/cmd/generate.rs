use super::load_config;
use crate::output::print_json;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use reqdesk_core::document::{Answers, GenerateRequest, Synthesizer};
use reqdesk_core::id::{IdAllocator, IdPolicy, RequirementId};
use reqdesk_core::questions::QuestionId;
use std::path::Path;
use std::sync::Arc;

pub struct GenerateArgs {
    pub request: Option<String>,
    pub product: Option<String>,
    pub answers: Vec<String>,
    pub date: Option<NaiveDate>,
    pub id: Option<String>,
}

pub fn run(config_path: &Path, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let req = GenerateRequest {
        request: args.request,
        product: args.product,
        answers: Some(parse_answers(&args.answers)?),
    };
    req.validate().context("document generation failed")?;

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let id = match args.id {
        Some(id) => id
            .parse::<RequirementId>()
            .context("--id must look like REQ-YYYYMM-NNN")?,
        None => allocate_id(config.ids.policy, date),
    };

    let synthesizer = Synthesizer::new(Arc::new(config.related_specs()));
    let doc = synthesizer
        .synthesize_request(&id.to_string(), req, date)
        .context("document generation failed")?;

    tracing::info!(id = %doc.id, product = %doc.product, "generated requirement document");

    if json {
        print_json(&doc)?;
    } else {
        println!("{}", doc.content);
    }
    Ok(())
}

/// A CLI run has no counter state to continue from, so a sequential policy
/// would restart at 001 every time. One-shot allocation always draws a
/// random suffix; pass `--id` for a specific number.
fn allocate_id(policy: IdPolicy, date: NaiveDate) -> RequirementId {
    if policy == IdPolicy::Sequential {
        tracing::debug!("sequential ids need a running server; drawing a random suffix");
    }
    IdAllocator::new(IdPolicy::Random).next(date)
}

/// Parse repeated `--answer id=value` flags.
fn parse_answers(raw: &[String]) -> anyhow::Result<Answers> {
    let mut answers = Answers::new();
    for item in raw {
        let Some((id, value)) = item.split_once('=') else {
            bail!("--answer expects id=value, got '{item}'");
        };
        let (id, value) = (id.trim(), value.trim());
        if QuestionId::parse(id).is_none() {
            let known: Vec<&str> = QuestionId::all().iter().map(|q| q.as_str()).collect();
            bail!("unknown question id '{id}' (expected one of: {})", known.join(", "));
        }
        answers.insert(id, value);
    }
    Ok(answers)
}
