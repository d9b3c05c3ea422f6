//! Document store gateway: collection-scoped create/delete/list/query/
//! merge-update over a JSON-backed document store. Payload shape is the
//! caller's business; the gateway never validates `fields`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Collection holding saved favorites.
pub const FAVORITES: &str = "favorites";
/// Collection holding watchlist entries.
pub const WATCHLIST: &str = "watchlist";

/// Opaque document payload.
pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {id} not found in collection {collection}")]
    NotFound { collection: String, id: String },
    #[error("failed to read or write store file: {0}")]
    Io(#[from] std::io::Error),
    #[error("store data is not valid JSON: {0}")]
    Data(#[from] serde_json::Error),
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

/// Comparison operators accepted by [`DocumentStore::list_by_query`].
///
/// A closed set: equality, inequality, the four orderings, and
/// membership. `In` expects the probe value to be an array and matches
/// documents whose field value appears in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
}

impl QueryOp {
    fn matches(self, field: Option<&Value>, probe: &Value) -> bool {
        match self {
            QueryOp::Eq => field == Some(probe),
            // A document without the field does not match; inequality
            // filters on a value, it does not select absence.
            QueryOp::Ne => field.map(|f| f != probe).unwrap_or(false),
            QueryOp::In => match (field, probe) {
                (Some(f), Value::Array(options)) => options.contains(f),
                _ => false,
            },
            op @ (QueryOp::Lt | QueryOp::Le | QueryOp::Gt | QueryOp::Ge) => {
                let Some(field) = field else { return false };
                let Some(ord) = compare(field, probe) else {
                    return false;
                };
                matches!(
                    (op, ord),
                    (QueryOp::Lt, Ordering::Less)
                        | (QueryOp::Le, Ordering::Less | Ordering::Equal)
                        | (QueryOp::Gt, Ordering::Greater)
                        | (QueryOp::Ge, Ordering::Greater | Ordering::Equal)
                )
            }
        }
    }
}

/// Orders two JSON scalars of the same shape; mixed or non-scalar
/// values do not compare.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// One stored document: a store-assigned id plus the caller's payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StoreData {
    #[serde(default)]
    collections: HashMap<String, Vec<Document>>,
}

/// JSON-file-backed document store. All state lives in an in-memory
/// cache behind a mutex and is written out whole after every mutation.
pub struct DocumentStore {
    path: PathBuf,
    cache: Mutex<StoreData>,
}

impl DocumentStore {
    /// Opens the store file at `path`, creating parent directories as
    /// needed. A missing file starts empty; an unreadable one is logged
    /// and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(data) => data,
                Err(err) => {
                    warn!(path = %path.display(), %err, "store file unreadable, starting empty");
                    StoreData::default()
                }
            }
        } else {
            StoreData::default()
        };

        Ok(DocumentStore {
            path,
            cache: Mutex::new(data),
        })
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Adds a document to `collection`; the store assigns its id.
    pub fn create(&self, collection: &str, fields: Fields) -> Result<(), StoreError> {
        let mut data = self.cache.lock();
        let id = Uuid::new_v4().to_string();
        debug!(collection, %id, "create document");
        data.collections
            .entry(collection.to_string())
            .or_default()
            .push(Document { id, fields });
        self.persist(&data)
    }

    /// Removes the document with `id` from `collection`.
    pub fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut data = self.cache.lock();
        let docs = data
            .collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        if docs.len() == before {
            return Err(not_found(collection, id));
        }
        debug!(collection, id, "deleted document");
        self.persist(&data)
    }

    /// Raw payloads of every document in `collection`, ids not
    /// attached. An unknown collection is just empty.
    pub fn list_all(&self, collection: &str) -> Result<Vec<Fields>, StoreError> {
        let data = self.cache.lock();
        Ok(data
            .collections
            .get(collection)
            .map(|docs| docs.iter().map(|doc| doc.fields.clone()).collect())
            .unwrap_or_default())
    }

    /// Documents in `collection` whose `field` matches `value` under
    /// `op`, with their ids attached.
    pub fn list_by_query(
        &self,
        collection: &str,
        field: &str,
        op: QueryOp,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let data = self.cache.lock();
        Ok(data
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| op.matches(doc.fields.get(field), value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Merges `fields` into an existing document: untouched fields
    /// survive, supplied ones overwrite.
    pub fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut data = self.cache.lock();
        {
            let doc = data
                .collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
                .ok_or_else(|| not_found(collection, id))?;
            for (key, value) in fields {
                doc.fields.insert(key, value);
            }
        }
        debug!(collection, id, "merged document update");
        self.persist(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn open_temp() -> (tempfile::TempDir, DocumentStore) {
        let dir = tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("store.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn query_op_equality_and_membership() {
        let field = json!("watched");
        assert!(QueryOp::Eq.matches(Some(&field), &json!("watched")));
        assert!(!QueryOp::Eq.matches(Some(&field), &json!("queued")));
        assert!(QueryOp::Ne.matches(Some(&field), &json!("queued")));
        assert!(!QueryOp::Ne.matches(None, &json!("queued")));
        assert!(QueryOp::In.matches(Some(&field), &json!(["queued", "watched"])));
        assert!(!QueryOp::In.matches(Some(&field), &json!(["queued"])));
        assert!(!QueryOp::In.matches(Some(&field), &json!("watched")));
    }

    #[test]
    fn query_op_orders_numbers_and_strings() {
        let seven = json!(7.5);
        assert!(QueryOp::Gt.matches(Some(&seven), &json!(7)));
        assert!(QueryOp::Le.matches(Some(&seven), &json!(7.5)));
        assert!(!QueryOp::Lt.matches(Some(&seven), &json!(7)));
        assert!(QueryOp::Ge.matches(Some(&json!("b")), &json!("a")));
        // Mixed types never compare.
        assert!(!QueryOp::Gt.matches(Some(&seven), &json!("7")));
        assert!(!QueryOp::Lt.matches(None, &json!(7)));
    }

    #[test]
    fn unknown_collection_lists_empty() {
        let (_dir, store) = open_temp();
        assert!(store.list_all("nothing-here").unwrap().is_empty());
        assert!(store
            .list_by_query("nothing-here", "x", QueryOp::Eq, &json!(1))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn delete_and_update_report_missing_documents() {
        let (_dir, store) = open_temp();
        store
            .create(FAVORITES, fields(&[("movieId", json!(1))]))
            .unwrap();

        let err = store.delete(FAVORITES, "no-such-id").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        let err = store
            .update(FAVORITES, "no-such-id", fields(&[("a", json!(1))]))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn corrupt_store_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        let store = DocumentStore::open(&path).unwrap();
        assert!(store.list_all(FAVORITES).unwrap().is_empty());
    }
}
