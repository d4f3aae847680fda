use redis::aio::ConnectionManager;

use ludex_core::config::IndexConfig;
use ludex_core::error::IndexError;
use ludex_core::loader::IndexSchema;
use ludex_core::traits::SearchIndex;

/// Reply fragment RediSearch returns when the index is already present.
const ALREADY_EXISTS_REPLY: &str = "Index already exists";

/// RediSearch-backed search index.
///
/// Documents live as Redis hashes under `{key_prefix}:{record key}`; the
/// full-text index is created with `FT.CREATE … ON HASH` over that prefix,
/// so a plain `HSET` is an indexed upsert. Writing a key twice overwrites
/// the previous document, which is what makes repeated loads converge.
#[derive(Clone)]
pub struct RediSearchIndex {
    manager: ConnectionManager,
    index_name: String,
    key_prefix: String,
}

impl RediSearchIndex {
    /// Connects to the Redis backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Unavailable` if the URL is rejected or the
    /// initial connection fails.
    pub async fn connect(config: &IndexConfig) -> Result<Self, IndexError> {
        let url = format!("redis://{}:{}/", config.hostname, config.port);
        let client = redis::Client::open(url)
            .map_err(|e| IndexError::Unavailable(format!("redis client open: {e}")))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| IndexError::Unavailable(format!("redis connect: {e}")))?;

        Ok(Self {
            manager,
            index_name: config.index_name.clone(),
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn document_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl SearchIndex for RediSearchIndex {
    async fn ensure_schema(&self, schema: &IndexSchema) -> Result<(), IndexError> {
        let mut conn = self.manager.clone();

        let mut cmd = redis::cmd("FT.CREATE");
        for arg in create_args(&self.index_name, &self.key_prefix, schema) {
            cmd.arg(arg);
        }

        let result: Result<(), redis::RedisError> = cmd.query_async(&mut conn).await;
        result.map_err(|e| {
            let reason = e.to_string();
            if reason.contains(ALREADY_EXISTS_REPLY) {
                IndexError::AlreadyExists
            } else {
                IndexError::Unavailable(reason)
            }
        })
    }

    async fn upsert(&self, key: &str, fields: &[(String, String)]) -> Result<(), IndexError> {
        let mut conn = self.manager.clone();

        let mut cmd = redis::cmd("HSET");
        cmd.arg(self.document_key(key));
        for (field, value) in fields {
            cmd.arg(field).arg(value);
        }

        let result: Result<(), redis::RedisError> = cmd.query_async(&mut conn).await;
        result.map_err(|e| IndexError::Write(e.to_string()))
    }
}

/// Argument list of the `FT.CREATE` call for the given schema.
fn create_args(index_name: &str, key_prefix: &str, schema: &IndexSchema) -> Vec<String> {
    let mut args = vec![
        index_name.to_string(),
        "ON".to_string(),
        "HASH".to_string(),
        "PREFIX".to_string(),
        "1".to_string(),
        format!("{key_prefix}:"),
        "SCHEMA".to_string(),
    ];
    for field in &schema.fields {
        args.push(field.name.clone());
        args.push("TEXT".to_string());
        args.push("WEIGHT".to_string());
        args.push(field.weight.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludex_core::loader::SchemaField;

    fn schema() -> IndexSchema {
        IndexSchema {
            fields: vec![
                SchemaField {
                    name: "name".to_string(),
                    weight: 10.0,
                },
                SchemaField {
                    name: "alt_name_0".to_string(),
                    weight: 10.0,
                },
                SchemaField {
                    name: "summary".to_string(),
                    weight: 1.0,
                },
                SchemaField {
                    name: "cover_image_url".to_string(),
                    weight: 0.0,
                },
            ],
        }
    }

    #[test]
    fn test_create_args_layout() {
        let args = create_args("games", "game", &schema());

        assert_eq!(
            args,
            vec![
                "games",
                "ON",
                "HASH",
                "PREFIX",
                "1",
                "game:",
                "SCHEMA",
                "name",
                "TEXT",
                "WEIGHT",
                "10",
                "alt_name_0",
                "TEXT",
                "WEIGHT",
                "10",
                "summary",
                "TEXT",
                "WEIGHT",
                "1",
                "cover_image_url",
                "TEXT",
                "WEIGHT",
                "0",
            ]
        );
    }

    #[test]
    fn test_weights_render_without_fraction() {
        let args = create_args("games", "game", &schema());
        assert!(!args.iter().any(|a| a.contains('.')));
    }
}
