use crate::error::IngestError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Keyed lookup from document id to caller-supplied descriptive metadata.
///
/// Lives independently of the vector index: a document can carry metadata
/// before, after, or without ever being embedded. Re-adding a document id
/// replaces the prior record wholesale.
#[derive(Default)]
pub struct MetadataStore {
    records: RwLock<HashMap<String, Value>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, doc_id: &str, metadata: Value) -> Result<(), IngestError> {
        if doc_id.is_empty() {
            return Err(IngestError::EmptyDocumentId);
        }

        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(doc_id.to_string(), metadata);
        Ok(())
    }

    pub fn get(&self, doc_id: &str) -> Option<Value> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(doc_id)
            .cloned()
    }

    /// All known document ids, sorted for deterministic output.
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn second_add_overwrites_instead_of_merging() {
        let store = MetadataStore::new();
        store.add("X", json!({"a": 1})).unwrap();
        store.add("X", json!({"a": 2})).unwrap();

        assert_eq!(store.get("X"), Some(json!({"a": 2})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_document_yields_none() {
        let store = MetadataStore::new();
        assert_eq!(store.get("absent"), None);
    }

    #[test]
    fn empty_doc_id_is_rejected() {
        let store = MetadataStore::new();
        let result = store.add("", json!({"type": "Invoice"}));
        assert!(matches!(result, Err(IngestError::EmptyDocumentId)));
        assert!(store.is_empty());
    }

    #[test]
    fn list_is_sorted() {
        let store = MetadataStore::new();
        store.add("doc_po_445", json!({"type": "Purchase Order"})).unwrap();
        store.add("doc_contract_100", json!({"type": "Contract"})).unwrap();
        store.add("doc_invoice_001", json!({"type": "Invoice"})).unwrap();

        assert_eq!(
            store.list(),
            vec!["doc_contract_100", "doc_invoice_001", "doc_po_445"]
        );
    }
}
