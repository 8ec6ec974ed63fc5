//! Tools → search index migration
//!
//! Two-phase replace: everything is written to `{index}_staging` first and
//! the staging index is then moved over the live one in a single
//! operation. A failure before the move leaves the live index untouched.

use serde_json::{json, Map, Value};

use crate::client::{IndexSettings, SearchClient};
use crate::document::{flatten_tool, SearchDocument};
use crate::error::{Result, SearchError};

const PROBE_OBJECT_ID: &str = "__tooldir_connectivity_probe__";

/// Outcome of one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records read from the source
    pub total: usize,
    /// Documents written to the index
    pub indexed: usize,
    /// Records dropped for lacking a `unique_id`
    pub skipped: usize,
    /// Batch requests sent
    pub batches: usize,
}

/// Write, find and delete a probe record on the staging index.
pub async fn check_connectivity(client: &SearchClient) -> Result<()> {
    let index = client.config().staging_index();
    let probe = json!({ "objectID": PROBE_OBJECT_ID, "name": "connectivity probe" });

    let task = client.save_object(&index, PROBE_OBJECT_ID, &probe).await?;
    client.wait_task(&index, task).await?;

    let found = client.search(&index, "connectivity probe").await?;
    let seen = found
        .hits
        .iter()
        .any(|hit| hit.get("objectID").and_then(Value::as_str) == Some(PROBE_OBJECT_ID));
    if !seen {
        return Err(SearchError::Connectivity(format!(
            "probe record not found in '{index}'"
        )));
    }

    let task = client.delete_object(&index, PROBE_OBJECT_ID).await?;
    client.wait_task(&index, task).await?;

    tracing::info!(index = %index, "search connectivity verified");
    Ok(())
}

/// Flatten every record, dropping those without a `unique_id`.
pub fn prepare_documents(tools: &[Map<String, Value>]) -> (Vec<SearchDocument>, usize) {
    let mut skipped = 0;
    let docs = tools
        .iter()
        .filter_map(|record| {
            let doc = flatten_tool(record);
            if doc.is_none() {
                skipped += 1;
                let name = record
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("<unnamed>");
                tracing::warn!(name, "skipping tool without unique_id");
            }
            doc
        })
        .collect();
    (docs, skipped)
}

/// Replace the live index with `tools`.
pub async fn migrate(client: &SearchClient, tools: &[Map<String, Value>]) -> Result<MigrationReport> {
    let config = client.config();
    if config.batch_size == 0 {
        return Err(SearchError::InvalidConfig("batch_size must be at least 1".into()));
    }

    let live = config.index_name.clone();
    let staging = config.staging_index();

    check_connectivity(client).await?;

    let task = client.clear(&staging).await?;
    client.wait_task(&staging, task).await?;
    let task = client.set_settings(&staging, &IndexSettings::default()).await?;
    client.wait_task(&staging, task).await?;

    let (docs, skipped) = prepare_documents(tools);
    let mut report = MigrationReport {
        total: tools.len(),
        skipped,
        ..Default::default()
    };

    for chunk in docs.chunks(config.batch_size) {
        let task = client.batch_add(&staging, chunk).await?;
        client.wait_task(&staging, task).await?;
        report.batches += 1;
        report.indexed += chunk.len();
        tracing::info!(
            batch = report.batches,
            indexed = report.indexed,
            of = docs.len(),
            "batch indexed"
        );
    }

    // move tasks are tracked on the source index
    let task = client.move_index(&staging, &live).await?;
    client.wait_task(&staging, task).await?;

    tracing::info!(
        index = %live,
        indexed = report.indexed,
        skipped = report.skipped,
        "search index replaced"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_counts_skipped() {
        let tools: Vec<Map<String, Value>> = [
            json!({"unique_id": "a", "name": "A"}),
            json!({"name": "orphan"}),
            json!({"unique_id": "b", "name": "B"}),
            json!({"tags": ["no name either"]}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();

        let (docs, skipped) = prepare_documents(&tools);
        assert_eq!(skipped, 2);
        let ids: Vec<&str> = docs.iter().map(SearchDocument::object_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
