//! Declaration store: one ordered collection per declaration kind
//!
//! The store is a plain sink. The classifier appends in source order, the
//! output collaborator reads each collection back, and the caller clears it
//! once output is done.

pub mod record;

use serde::Serialize;

pub use record::{DeclarationKind, DeclarationRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclarationStore {
    constants: Vec<DeclarationRecord>,
    variables: Vec<DeclarationRecord>,
    functions: Vec<DeclarationRecord>,
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, kind: DeclarationKind) -> &Vec<DeclarationRecord> {
        match kind {
            DeclarationKind::Constant => &self.constants,
            DeclarationKind::Variable => &self.variables,
            DeclarationKind::Function => &self.functions,
        }
    }

    /// Tail-append to the collection for `record.kind`. Duplicates are kept.
    pub fn append(&mut self, record: DeclarationRecord) {
        let collection = match record.kind {
            DeclarationKind::Constant => &mut self.constants,
            DeclarationKind::Variable => &mut self.variables,
            DeclarationKind::Function => &mut self.functions,
        };
        collection.push(record);
    }

    /// Records of one kind in insertion order. The store is not modified.
    pub fn drain(&self, kind: DeclarationKind) -> &[DeclarationRecord] {
        self.collection(kind)
    }

    pub fn texts(&self, kind: DeclarationKind) -> impl Iterator<Item = &str> + '_ {
        self.collection(kind).iter().map(|r| r.text.as_str())
    }

    pub fn count(&self, kind: DeclarationKind) -> usize {
        self.collection(kind).len()
    }

    pub fn len(&self) -> usize {
        self.constants.len() + self.variables.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear_all(&mut self) {
        self.constants.clear();
        self.variables.clear();
        self.functions.clear();
    }

    /// All records merged back into source order
    pub fn in_source_order(&self) -> Vec<&DeclarationRecord> {
        let mut records: Vec<&DeclarationRecord> = DeclarationKind::ALL
            .iter()
            .flat_map(|kind| self.collection(*kind).iter())
            .collect();
        records.sort_by_key(|r| r.span.start.offset);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    fn record(kind: DeclarationKind, text: &str, offset: usize, line: u32) -> DeclarationRecord {
        let start = Position::new(offset, line, 1);
        DeclarationRecord::new(kind, text, Span::new(start, start.advance_str(text)))
    }

    #[test]
    fn test_append_routes_by_kind() {
        let mut store = DeclarationStore::new();
        store.append(record(DeclarationKind::Constant, "const int A = 1;", 0, 1));
        store.append(record(DeclarationKind::Variable, "int b;", 17, 2));
        store.append(record(DeclarationKind::Function, "void f() {}", 24, 3));

        assert_eq!(store.count(DeclarationKind::Constant), 1);
        assert_eq!(store.count(DeclarationKind::Variable), 1);
        assert_eq!(store.count(DeclarationKind::Function), 1);
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.texts(DeclarationKind::Variable).collect::<Vec<_>>(),
            vec!["int b;"]
        );
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let mut store = DeclarationStore::new();
        store.append(record(DeclarationKind::Variable, "int x;", 0, 1));
        store.append(record(DeclarationKind::Variable, "int x;", 7, 2));

        let lines: Vec<u32> = store
            .drain(DeclarationKind::Variable)
            .iter()
            .map(|r| r.line)
            .collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_drain_does_not_mutate() {
        let mut store = DeclarationStore::new();
        store.append(record(DeclarationKind::Function, "void f() {}", 0, 1));

        assert_eq!(store.drain(DeclarationKind::Function).len(), 1);
        assert_eq!(store.drain(DeclarationKind::Function).len(), 1);
        assert!(store.drain(DeclarationKind::Constant).is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut store = DeclarationStore::new();
        store.append(record(DeclarationKind::Constant, "const int A;", 0, 1));
        store.append(record(DeclarationKind::Function, "int g() {}", 13, 2));
        store.clear_all();

        assert!(store.is_empty());
        for kind in DeclarationKind::ALL {
            assert_eq!(store.count(kind), 0);
        }
    }

    #[test]
    fn test_in_source_order_interleaves_kinds() {
        let mut store = DeclarationStore::new();
        store.append(record(DeclarationKind::Variable, "int a;", 0, 1));
        store.append(record(DeclarationKind::Function, "void f() {}", 7, 2));
        store.append(record(DeclarationKind::Variable, "int b;", 19, 3));

        let lines: Vec<u32> = store.in_source_order().iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_logical_names() {
        assert_eq!(DeclarationKind::Constant.logical_name(), "constants");
        assert_eq!(DeclarationKind::Variable.logical_name(), "variables");
        assert_eq!(DeclarationKind::Function.logical_name(), "functions");
    }
}
