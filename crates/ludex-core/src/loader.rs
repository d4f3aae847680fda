//! Idempotent bulk load into the search index.
//!
//! The loader only runs after a harvest has fully completed: a crash
//! mid-harvest yields a partial in-memory result, never a partial index.

use tokio::time::sleep;

use crate::config::LoadConfig;
use crate::error::{AppError, IndexError};
use crate::models::{CanonicalRecord, Dataset};
use crate::progress::{HarvestEvent, ProgressReporter, SilentReporter};
use crate::stats::LoadStats;
use crate::traits::SearchIndex;

/// One searchable field of the index schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    /// Search weight; 0 means stored but not searchable.
    pub weight: f32,
}

/// Field layout of the full-text index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSchema {
    pub fields: Vec<SchemaField>,
}

impl IndexSchema {
    /// Builds the schema for a dataset: `name` and one slot per alternate
    /// name at full weight, `summary` at low weight, and both image urls
    /// stored unsearchable. The alternate-name width is the widest list
    /// observed in the dataset; records with fewer entries stay sparse.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let mut fields = vec![SchemaField {
            name: "name".to_string(),
            weight: 10.0,
        }];
        for slot in 0..dataset.max_alternative_names() {
            fields.push(SchemaField {
                name: alt_name_field(slot),
                weight: 10.0,
            });
        }
        fields.push(SchemaField {
            name: "summary".to_string(),
            weight: 1.0,
        });
        fields.push(SchemaField {
            name: "cover_image_url".to_string(),
            weight: 0.0,
        });
        fields.push(SchemaField {
            name: "thumbnail_image_url".to_string(),
            weight: 0.0,
        });
        Self { fields }
    }
}

/// Schema field name of the alternate-name slot at `slot`.
pub fn alt_name_field(slot: usize) -> String {
    format!("alt_name_{slot}")
}

/// Maps a canonical record onto the schema's field names.
///
/// Alternate names beyond the record's own count are omitted (sparse).
pub fn document_fields(record: &CanonicalRecord) -> Vec<(String, String)> {
    let mut fields = vec![("name".to_string(), record.name.clone())];
    for (slot, alt) in record.alternative_names.iter().enumerate() {
        fields.push((alt_name_field(slot), alt.clone()));
    }
    fields.push(("summary".to_string(), record.summary.clone()));
    fields.push(("cover_image_url".to_string(), record.cover_image_url.clone()));
    fields.push((
        "thumbnail_image_url".to_string(),
        record.thumbnail_image_url.clone(),
    ));
    fields
}

/// Loads a harvested dataset into a search index.
///
/// Schema creation is retried per the configured [`RetryPolicy`]; document
/// writes are isolated per record, so one failure never aborts the load.
///
/// [`RetryPolicy`]: crate::config::RetryPolicy
pub struct IndexLoader<I>
where
    I: SearchIndex,
{
    index: I,
    config: LoadConfig,
}

impl<I> IndexLoader<I>
where
    I: SearchIndex,
{
    /// Creates a loader with default retry configuration (unbounded).
    pub fn new(index: I) -> Self {
        Self {
            index,
            config: LoadConfig::default(),
        }
    }

    /// Creates a loader with custom retry configuration.
    pub fn with_config(index: I, config: LoadConfig) -> Self {
        Self { index, config }
    }

    /// Ensures the index schema exists, then upserts every record.
    ///
    /// # Errors
    ///
    /// Fails when schema creation exhausts a bounded retry policy. A
    /// failed document write is recorded in the returned [`LoadStats`]
    /// and skipped; the load continues with the next record.
    pub async fn load(&self, dataset: &Dataset) -> Result<LoadStats, AppError> {
        self.load_with_progress(dataset, &SilentReporter).await
    }

    /// Same as [`load`](Self::load), but emits progress events through the
    /// provided reporter.
    pub async fn load_with_progress<R: ProgressReporter>(
        &self,
        dataset: &Dataset,
        reporter: &R,
    ) -> Result<LoadStats, AppError> {
        let mut stats = LoadStats::default();

        let schema = IndexSchema::for_dataset(dataset);
        loop {
            stats.schema_attempts += 1;
            match self.index.ensure_schema(&schema).await {
                // The backend treats recreation of an existing index as a
                // no-op failure, not a correctness hazard.
                Ok(()) | Err(IndexError::AlreadyExists) => break,
                Err(err) => {
                    if !self.config.retry.allows(stats.schema_attempts) {
                        return Err(err.into());
                    }
                    let reason = err.to_string();
                    reporter.report(HarvestEvent::SchemaRetry {
                        attempt: stats.schema_attempts,
                        reason: &reason,
                    });
                    sleep(self.config.backoff).await;
                }
            }
        }

        reporter.report(HarvestEvent::LoadStarted {
            documents: dataset.len(),
        });

        for (key, record) in dataset.iter() {
            match self.index.upsert(key, &document_fields(record)).await {
                Ok(()) => stats.written += 1,
                Err(err) => {
                    stats.failed += 1;
                    let reason = err.to_string();
                    reporter.report(HarvestEvent::DocumentFailed {
                        key,
                        reason: &reason,
                    });
                }
            }
        }

        reporter.report(HarvestEvent::LoadCompleted { stats: &stats });
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Test double: fails `ensure_schema` a scripted number of times, then
    /// succeeds; fails upserts for scripted keys.
    struct FlakyIndex {
        schema_failures: AtomicU32,
        already_exists: bool,
        failing_keys: Vec<String>,
        upserts: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FlakyIndex {
        fn reliable() -> Self {
            Self {
                schema_failures: AtomicU32::new(0),
                already_exists: false,
                failing_keys: Vec::new(),
                upserts: Mutex::new(Vec::new()),
            }
        }

        fn unavailable_for(attempts: u32) -> Self {
            Self {
                schema_failures: AtomicU32::new(attempts),
                ..Self::reliable()
            }
        }
    }

    impl SearchIndex for FlakyIndex {
        async fn ensure_schema(&self, _schema: &IndexSchema) -> Result<(), IndexError> {
            if self.already_exists {
                return Err(IndexError::AlreadyExists);
            }
            let remaining = self.schema_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.schema_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(IndexError::Unavailable("scripted outage".to_string()));
            }
            Ok(())
        }

        async fn upsert(&self, key: &str, fields: &[(String, String)]) -> Result<(), IndexError> {
            if self.failing_keys.iter().any(|k| k == key) {
                return Err(IndexError::Write("scripted write failure".to_string()));
            }
            self.upserts
                .lock()
                .unwrap()
                .push((key.to_string(), fields.to_vec()));
            Ok(())
        }
    }

    fn record(key: &str, name: &str, alts: &[&str]) -> CanonicalRecord {
        CanonicalRecord {
            key: key.to_string(),
            name: name.to_string(),
            alternative_names: alts.iter().map(|s| s.to_string()).collect(),
            summary: "s".to_string(),
            cover_image_url: "//img/t_cover_big/x.jpg".to_string(),
            thumbnail_image_url: "//img/t_thumb/x.jpg".to_string(),
        }
    }

    fn dataset(records: Vec<CanonicalRecord>) -> Dataset {
        let mut dataset = Dataset::new();
        for r in records {
            dataset.insert(r);
        }
        dataset
    }

    fn fast_retry(policy: RetryPolicy) -> LoadConfig {
        LoadConfig {
            retry: policy,
            backoff: Duration::from_millis(0),
        }
    }

    #[test]
    fn test_schema_width_follows_widest_record() {
        let data = dataset(vec![
            record("a", "A", &["x"]),
            record("b", "B", &["x", "y", "z"]),
        ]);
        let schema = IndexSchema::for_dataset(&data);

        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "alt_name_0",
                "alt_name_1",
                "alt_name_2",
                "summary",
                "cover_image_url",
                "thumbnail_image_url"
            ]
        );
    }

    #[test]
    fn test_schema_weights() {
        let data = dataset(vec![record("a", "A", &["x"])]);
        let schema = IndexSchema::for_dataset(&data);

        for field in &schema.fields {
            let expected = match field.name.as_str() {
                "name" => 10.0,
                "summary" => 1.0,
                name if name.starts_with("alt_name_") => 10.0,
                _ => 0.0,
            };
            assert_eq!(field.weight, expected, "field {}", field.name);
        }
    }

    #[test]
    fn test_document_fields_are_sparse() {
        let fields = document_fields(&record("a", "A", &["only-one"]));
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();

        assert!(names.contains(&"alt_name_0"));
        assert!(!names.contains(&"alt_name_1"));
        assert!(names.contains(&"summary"));
    }

    #[tokio::test]
    async fn test_already_exists_is_success() {
        let index = FlakyIndex {
            already_exists: true,
            ..FlakyIndex::reliable()
        };
        let loader = IndexLoader::with_config(index, fast_retry(RetryPolicy::Limited(1)));

        let stats = loader.load(&dataset(vec![record("a", "A", &[])])).await.unwrap();

        assert_eq!(stats.schema_attempts, 1);
        assert_eq!(stats.written, 1);
    }

    #[tokio::test]
    async fn test_schema_retries_until_available() {
        let index = FlakyIndex::unavailable_for(2);
        let loader = IndexLoader::with_config(index, fast_retry(RetryPolicy::Unbounded));

        let stats = loader.load(&dataset(vec![record("a", "A", &[])])).await.unwrap();

        assert_eq!(stats.schema_attempts, 3);
        assert_eq!(stats.written, 1);
    }

    #[tokio::test]
    async fn test_bounded_retry_exhaustion_fails() {
        let index = FlakyIndex::unavailable_for(5);
        let loader = IndexLoader::with_config(index, fast_retry(RetryPolicy::Limited(2)));

        let result = loader.load(&dataset(vec![record("a", "A", &[])])).await;

        assert!(matches!(
            result,
            Err(AppError::Index(IndexError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_write_failure_skips_and_continues() {
        let index = FlakyIndex {
            failing_keys: vec!["b".to_string()],
            ..FlakyIndex::reliable()
        };
        let loader = IndexLoader::new(index);

        let stats = loader
            .load(&dataset(vec![
                record("a", "A", &[]),
                record("b", "B", &[]),
                record("c", "C", &[]),
            ]))
            .await
            .unwrap();

        assert_eq!(stats.written, 2);
        assert_eq!(stats.failed, 1);
        let written: Vec<_> = loader
            .index
            .upserts
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(written, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_empty_dataset_writes_no_documents() {
        let index = FlakyIndex::reliable();
        let loader = IndexLoader::new(index);

        let stats = loader.load(&Dataset::new()).await.unwrap();

        assert_eq!(stats.written, 0);
        assert!(loader.index.upserts.lock().unwrap().is_empty());
    }
}
