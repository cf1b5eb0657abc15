//! Property-based tests for the registry invariants.
//!
//! For all sequences of create/rename/delete/reorder/set-active operations:
//!  - the document list is never empty
//!  - the active pointer always resolves to a member of the list
//!  - reorder preserves the set of documents, only the order changes

use proptest::prelude::*;
use snippet_registry::{DocumentRegistry, RegistryError};
use snippet_store::MemoryStorage;
use std::sync::Arc;

/// A randomly chosen registry operation. Ids are picked by index modulo the
/// current length so most operations hit existing documents, with a few
/// guaranteed misses mixed in.
#[derive(Clone, Debug)]
enum Op {
    Create,
    Rename(usize, String),
    Delete(usize),
    Reorder(usize, usize),
    SetActive(usize),
    RenameUnknown(String),
    DeleteUnknown,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        2 => (0usize..8, "[a-z ]{0,6}").prop_map(|(i, name)| Op::Rename(i, name)),
        3 => (0usize..8).prop_map(Op::Delete),
        3 => (0usize..8, 0usize..8).prop_map(|(a, b)| Op::Reorder(a, b)),
        2 => (0usize..8).prop_map(Op::SetActive),
        1 => "[a-z]{1,4}".prop_map(Op::RenameUnknown),
        1 => Just(Op::DeleteUnknown),
    ]
}

fn nth_id(registry: &DocumentRegistry<MemoryStorage>, index: usize) -> snippet_registry::DocumentId {
    let docs = registry.documents();
    docs[index % docs.len()].id.clone()
}

proptest! {
    #[test]
    fn invariants_hold_under_all_op_sequences(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let storage = Arc::new(MemoryStorage::new());
        let mut registry = DocumentRegistry::open(storage.clone()).unwrap();

        for op in ops {
            match op {
                Op::Create => {
                    registry.create().unwrap();
                }
                Op::Rename(i, name) => {
                    let id = nth_id(&registry, i);
                    registry.rename(&id, &name).unwrap();
                }
                Op::Delete(i) => {
                    let id = nth_id(&registry, i);
                    match registry.delete(&id) {
                        Ok(()) => {}
                        Err(RegistryError::LastDocument) => {
                            prop_assert_eq!(registry.len(), 1);
                        }
                        Err(e) => panic!("unexpected delete error: {e}"),
                    }
                }
                Op::Reorder(a, b) => {
                    let dragged = nth_id(&registry, a);
                    let target = nth_id(&registry, b);
                    let before: Vec<_> = registry
                        .documents()
                        .iter()
                        .map(|d| d.id.clone())
                        .collect();
                    registry.reorder(&dragged, &target).unwrap();
                    let mut after: Vec<_> = registry
                        .documents()
                        .iter()
                        .map(|d| d.id.clone())
                        .collect();
                    let mut sorted_before = before;
                    sorted_before.sort();
                    after.sort();
                    prop_assert_eq!(sorted_before, after);
                }
                Op::SetActive(i) => {
                    let id = nth_id(&registry, i);
                    registry.set_active(&id).unwrap();
                }
                Op::RenameUnknown(name) => {
                    let id = snippet_registry::DocumentId::from_string("no-such-id");
                    registry.rename(&id, &name).unwrap();
                }
                Op::DeleteUnknown => {
                    let id = snippet_registry::DocumentId::from_string("no-such-id");
                    registry.delete(&id).unwrap();
                }
            }

            // Core invariants after every single operation.
            prop_assert!(!registry.is_empty());
            let active = registry.active_id().clone();
            prop_assert!(registry.contains(&active));
            prop_assert!(registry.active().is_ok());
        }

        // The persisted copy reloads to the same order and active pointer.
        let reopened = DocumentRegistry::open(storage).unwrap();
        let live: Vec<_> = registry.documents().iter().map(|d| d.id.clone()).collect();
        let persisted: Vec<_> = reopened.documents().iter().map(|d| d.id.clone()).collect();
        prop_assert_eq!(live, persisted);
        prop_assert_eq!(registry.active_id(), reopened.active_id());
    }

    #[test]
    fn adjacent_reorder_round_trips(extra in 1usize..5) {
        let storage = Arc::new(MemoryStorage::new());
        let mut registry = DocumentRegistry::open(storage).unwrap();
        for _ in 0..extra {
            registry.create().unwrap();
        }

        let order: Vec<_> = registry.documents().iter().map(|d| d.id.clone()).collect();
        // Drag each document onto its right neighbor and back.
        for pair in order.windows(2) {
            let (a, b) = (pair[0].clone(), pair[1].clone());
            registry.reorder(&a, &b).unwrap();
            registry.reorder(&b, &a).unwrap();
            let now: Vec<_> = registry.documents().iter().map(|d| d.id.clone()).collect();
            prop_assert_eq!(&now, &order);
        }
    }
}
