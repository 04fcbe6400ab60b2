//! Property tests for the document store, views and sync reconciliation.

use docstore_core::{AckPolicy, Document, DocumentFilter, DocumentId, DocumentsState};
use docstore_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn ids_of<'a>(docs: impl Iterator<Item = &'a Document>) -> Vec<DocumentId> {
    docs.map(|d| d.id.clone()).collect()
}

fn arbitrary_state() -> impl Strategy<Value = DocumentsState> {
    store_ops_strategy(32).prop_map(|ops| {
        let mut state = DocumentsState::new();
        apply_ops(&mut state, ops, AckPolicy::default());
        state
    })
}

fn ack_policy_strategy() -> impl Strategy<Value = AckPolicy> {
    prop_oneof![
        Just(AckPolicy::RequireUnchanged),
        Just(AckPolicy::TrustAcknowledged),
    ]
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn set_filter_accepts_only_known_names(
        initial in filter_strategy(),
        name in filter_name_strategy(),
    ) {
        let mut state = DocumentsState::new();
        state.set_filter(initial);

        let accepted = state.set_filter_name(&name);
        match name.parse::<DocumentFilter>() {
            Ok(filter) => {
                prop_assert!(accepted);
                prop_assert_eq!(state.filter(), filter);
            }
            Err(_) => {
                prop_assert!(!accepted);
                prop_assert_eq!(state.filter(), initial);
            }
        }
    }

    #[test]
    fn added_document_is_stored_exactly_once(
        mut state in arbitrary_state(),
        doc in document_strategy(),
    ) {
        state.add_document(doc.clone());

        prop_assert_eq!(state.store().get(&doc.id), Some(&doc));
        let copies = state.view().all().filter(|d| d.id == doc.id).count();
        prop_assert_eq!(copies, 1);
    }

    #[test]
    fn edit_overwrites_present_fields_and_dirties(
        mut state in arbitrary_state(),
        doc in document_strategy(),
        patch in patch_strategy(),
    ) {
        state.add_document(doc.clone());
        let edited = state.edit_document(&doc.id, patch.clone()).unwrap().clone();

        prop_assert!(edited.is_dirty);
        prop_assert_eq!(&edited.id, &doc.id);
        prop_assert_eq!(&edited.title, patch.title.as_ref().unwrap_or(&doc.title));
        prop_assert_eq!(&edited.content, patch.content.as_ref().unwrap_or(&doc.content));
        prop_assert_eq!(&edited.author, patch.author.as_ref().unwrap_or(&doc.author));
        prop_assert_eq!(edited.created_at, doc.created_at);
        if let Some(at) = patch.updated_at {
            prop_assert_eq!(edited.updated_at, at);
        }
    }

    #[test]
    fn acknowledged_clean_and_unacknowledged_stay_dirty(
        mut state in arbitrary_state(),
        acks in prop::collection::vec(document_id_strategy(), 0..8),
        policy in ack_policy_strategy(),
    ) {
        let dirty_before: HashSet<_> = ids_of(state.view().dirty()).into_iter().collect();
        let acked: HashSet<_> = acks.iter().cloned().collect();

        let (ticket, snapshot) = state.begin_sync();
        let report = state.complete_sync(ticket, &snapshot, acks, policy);

        for id in &dirty_before {
            let doc = state.store().get(id).unwrap();
            prop_assert_eq!(doc.is_dirty, !acked.contains(id), "document {}", id);
        }
        prop_assert_eq!(report.submitted, dirty_before.len());
        prop_assert_eq!(report.remaining_dirty, state.view().dirty_count());
        prop_assert!(report.stale.is_empty());
        prop_assert!(!state.is_loading());
    }

    #[test]
    fn fenced_acks_never_clear_later_edits(
        mut state in arbitrary_state(),
        mid_flight in prop::collection::vec((document_id_strategy(), patch_strategy()), 0..6),
    ) {
        let (ticket, snapshot) = state.begin_sync();
        let acks = ids_of(snapshot.documents().iter());

        let mut edited = HashSet::new();
        for (id, patch) in mid_flight {
            if state.edit_document(&id, patch).is_ok() {
                edited.insert(id);
            }
        }

        let report = state.complete_sync(ticket, &snapshot, acks, AckPolicy::RequireUnchanged);

        for id in &edited {
            prop_assert!(state.store().get(id).unwrap().is_dirty, "document {}", id);
        }
        for id in &report.cleaned {
            prop_assert!(!edited.contains(id));
        }
    }

    #[test]
    fn dirty_and_clean_partition_all(state in arbitrary_state()) {
        let view = state.view();
        let all = ids_of(view.all());
        let dirty = ids_of(view.subset(DocumentFilter::OnlyDirty));
        let clean = ids_of(view.subset(DocumentFilter::OnlyClean));

        prop_assert_eq!(dirty.len() + clean.len(), all.len());
        prop_assert_eq!(view.dirty_count() + view.clean_count(), view.all_count());

        let mut union: HashSet<_> = dirty.iter().cloned().collect();
        prop_assert!(clean.iter().all(|id| union.insert(id.clone())), "subsets overlap");
        prop_assert_eq!(union, all.iter().cloned().collect::<HashSet<_>>());

        // Each subset keeps store order.
        let in_order = |subset: &[DocumentId]| {
            let mut positions = subset.iter().map(|id| all.iter().position(|x| x == id));
            let mut last = None;
            positions.all(|pos| {
                let ordered = pos > last;
                last = pos;
                ordered
            })
        };
        prop_assert!(in_order(&dirty));
        prop_assert!(in_order(&clean));
    }

    #[test]
    fn filtered_view_matches_subset(state in arbitrary_state(), filter in filter_strategy()) {
        let mut state = state;
        state.set_filter(filter);
        let view = state.view();

        prop_assert_eq!(ids_of(view.filtered()), ids_of(view.subset(filter)));
        prop_assert_eq!(view.filtered_count(), view.subset(filter).count());
    }

    #[test]
    fn store_ids_are_unique(state in arbitrary_state()) {
        let ids = state.store().ids();
        let unique: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(ids.len(), state.view().all_count());
        prop_assert!(ids.iter().all(|id| state.store().contains(id)));
    }
}
