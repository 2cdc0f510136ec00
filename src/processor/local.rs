use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{OutputMode, ProcessOutcome, QueryContext, SampleRecord};
use super::{HashProcessor, ProcessorError};

const REPORT_HEADER: &str = "hash_type,hash";

/// Processor that records a batch without contacting any lookup service.
///
/// Text mode writes a report into `report_dir`; display mode echoes one record per
/// hash, stamped with the query tag and submission time.
#[derive(Debug, Clone)]
pub struct LocalProcessor {
    report_dir: PathBuf,
}

impl LocalProcessor {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    async fn write_report(
        &self,
        ctx: &QueryContext,
        hashes: &[String],
    ) -> Result<PathBuf, ProcessorError> {
        tokio::fs::create_dir_all(&self.report_dir).await?;

        let file_name = format!("{}-{}.txt", sanitize_tag(&ctx.query_tag), Uuid::now_v7());
        let path = self.report_dir.join(file_name);

        let mut contents = String::with_capacity(REPORT_HEADER.len() + hashes.len() * 72);
        contents.push_str(REPORT_HEADER);
        contents.push('\n');
        for hash in hashes {
            contents.push_str(&ctx.hash_type);
            contents.push(',');
            contents.push_str(hash);
            contents.push('\n');
        }

        tokio::fs::write(&path, contents).await?;
        info!(path = %path.display(), hashes = hashes.len(), "Report written");

        Ok(path)
    }
}

#[async_trait]
impl HashProcessor for LocalProcessor {
    async fn process(
        &self,
        ctx: &QueryContext,
        hashes: &[String],
    ) -> Result<ProcessOutcome, ProcessorError> {
        debug!(query_tag = %ctx.query_tag, mode = ?ctx.output_mode, "Processing hash batch locally");

        match ctx.output_mode {
            OutputMode::Text => self.write_report(ctx, hashes).await.map(ProcessOutcome::Report),
            OutputMode::Display => {
                let submitted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
                let records = hashes
                    .iter()
                    .map(|hash| {
                        SampleRecord::new(hash.as_str())
                            .with_field("hash_type", ctx.hash_type.as_str())
                            .with_field("query_tag", ctx.query_tag.as_str())
                            .with_field("submitted_at", submitted_at.as_str())
                    })
                    .collect();
                Ok(ProcessOutcome::Records(records))
            }
        }
    }
}

/// Keeps report names to `[A-Za-z0-9_-]`; anything else becomes `_`.
fn sanitize_tag(tag: &str) -> String {
    let cleaned: String = tag
        .chars()
        .take(64)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "query".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hashes() -> Vec<String> {
        vec!["aaa".to_string(), "bbb".to_string()]
    }

    #[tokio::test]
    async fn text_mode_writes_report_into_report_dir() {
        let temp_dir = TempDir::new().unwrap();
        let processor = LocalProcessor::new(temp_dir.path().join("reports"));
        let ctx = QueryContext::new("case 7/alpha", "text", "sha256");

        let outcome = processor.process(&ctx, &hashes()).await.unwrap();
        let ProcessOutcome::Report(path) = outcome else {
            panic!("expected a report");
        };

        assert!(path.starts_with(processor.report_dir()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("case_7_alpha-"));
        assert!(name.ends_with(".txt"));

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body, "hash_type,hash\nsha256,aaa\nsha256,bbb\n");
    }

    #[tokio::test]
    async fn display_mode_returns_one_record_per_hash() {
        let processor = LocalProcessor::new("unused");
        let ctx = QueryContext::new("tag-1", "display", "md5");

        let outcome = processor.process(&ctx, &hashes()).await.unwrap();
        let ProcessOutcome::Records(records) = outcome else {
            panic!("expected records");
        };

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hash, "aaa");
        assert_eq!(records[1].fields["query_tag"], "tag-1");
        assert_eq!(records[1].fields["hash_type"], "md5");
        assert!(records[0].fields.contains_key("submitted_at"));
    }

    #[test]
    fn sanitize_tag_falls_back_for_empty_input() {
        assert_eq!(sanitize_tag(""), "query");
        assert_eq!(sanitize_tag("../etc"), "___etc");
    }
}
