use super::{Collection, Document};
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

pub(crate) struct Collections {
    expenses: RwLock<CollectionState>,
    todo_items: RwLock<CollectionState>,
}

impl Collections {
    pub(crate) fn new(expenses: Vec<Document>, todo_items: Vec<Document>) -> Self {
        Collections {
            expenses: RwLock::new(CollectionState::new(expenses)),
            todo_items: RwLock::new(CollectionState::new(todo_items)),
        }
    }

    pub(crate) fn get(&self, collection: Collection) -> &RwLock<CollectionState> {
        match collection {
            Collection::Expenses => &self.expenses,
            Collection::TodoItems => &self.todo_items,
        }
    }
}

/// Contents of one collection plus the channel its subscribers listen on.
pub(crate) struct CollectionState {
    docs: Vec<Document>,
    sender: watch::Sender<Vec<Document>>,
}

impl CollectionState {
    pub(crate) fn new(docs: Vec<Document>) -> Self {
        let (sender, _) = watch::channel(docs.clone());
        CollectionState { docs, sender }
    }

    pub(crate) fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Vec<Document>> {
        self.sender.subscribe()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Replaces the contents and notifies subscribers. Must be called while
    /// the caller still holds the collection lock so delivery order matches
    /// commit order.
    pub(crate) fn commit(&mut self, docs: Vec<Document>) {
        self.docs = docs;
        self.sender.send_replace(self.docs.clone());
    }
}

pub(crate) fn new_document(fields: Map<String, Value>) -> Document {
    Document {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        fields,
    }
}

pub(crate) fn find(docs: &[Document], id: &str) -> Option<Document> {
    docs.iter().find(|d| d.id == id).cloned()
}

/// Merges `partial` into the document; `None` if the id is unknown.
pub(crate) fn apply_update(docs: &mut [Document], id: &str, partial: Map<String, Value>) -> Option<Document> {
    let doc = docs.iter_mut().find(|d| d.id == id)?;
    for (key, value) in partial {
        doc.fields.insert(key, value);
    }
    Some(doc.clone())
}

pub(crate) fn apply_delete(docs: &mut Vec<Document>, ids: &[String]) -> usize {
    let before = docs.len();
    docs.retain(|d| !ids.contains(&d.id));
    before - docs.len()
}

pub(crate) fn matching(docs: &[Document], field: &str, value: &Value) -> Vec<Document> {
    docs.iter()
        .filter(|d| d.fields.get(field) == Some(value))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(text: &str) -> Document {
        let mut fields = Map::new();
        fields.insert("text".into(), json!(text));
        new_document(fields)
    }

    #[test]
    fn delete_removes_only_listed_ids() {
        let mut docs = vec![doc("a"), doc("b"), doc("c")];
        let ids = vec![docs[0].id.clone(), "missing".to_string()];
        assert_eq!(apply_delete(&mut docs, &ids), 1);
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn update_merges_fields() {
        let mut docs = vec![doc("a")];
        let id = docs[0].id.clone();
        let mut partial = Map::new();
        partial.insert("extra".into(), json!(1));
        let updated = apply_update(&mut docs, &id, partial).unwrap();
        assert_eq!(updated.fields.get("text"), Some(&json!("a")));
        assert_eq!(updated.fields.get("extra"), Some(&json!(1)));
        assert!(apply_update(&mut docs, "nope", Map::new()).is_none());
    }

    #[test]
    fn matching_compares_exact_values() {
        let docs = vec![doc("Sušička"), doc("sušička"), doc("Sušička")];
        assert_eq!(matching(&docs, "text", &json!("Sušička")).len(), 2);
    }
}
