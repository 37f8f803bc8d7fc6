use crate::output::{print_json, print_table};
use reqdesk_core::questions::questions;

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&questions());
    }
    let rows = questions()
        .iter()
        .map(|q| {
            vec![
                q.id.to_string(),
                q.label.to_string(),
                q.prompt.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "LABEL", "QUESTION"], rows);
    Ok(())
}
