//! End-to-end pipeline tests: upload through classification, approval, and
//! promotion into the knowledge base.

use std::sync::Arc;

use bomrec::{
    ActionPath, ApprovalQueue, ApprovalStatus, ComparisonMode, EngineConfig, KnowledgeBase,
    RawLineItem, RecordSource, WorkflowEngine, WorkflowState,
};

fn line(name: &str, part: &str) -> RawLineItem {
    RawLineItem {
        material_name: name.into(),
        part_number: part.into(),
        item_type: "Consumable".into(),
        qty: "1".into(),
        uom: "EA".into(),
        ..Default::default()
    }
}

fn engine_with_kb(seed: &[RawLineItem]) -> (WorkflowEngine, Arc<KnowledgeBase>) {
    let kb = Arc::new(KnowledgeBase::with_records(seed));
    let queue = Arc::new(ApprovalQueue::new(kb.clone()));
    (
        WorkflowEngine::new(EngineConfig::default(), kb.clone(), queue),
        kb,
    )
}

#[test]
fn known_part_number_auto_registers() {
    let (engine, _kb) = engine_with_kb(&[line("O-Ring", "PN-100")]);
    let id = engine
        .create(
            "wi-batch-1",
            ComparisonMode::KbOnly,
            vec![line("O-Ring", "PN-100")],
            None,
        )
        .unwrap();
    engine.run(id).unwrap();

    let wf = engine.get_results(id).unwrap();
    assert_eq!(wf.state, WorkflowState::ResultsReady);
    assert_eq!(wf.results[0].action_path, ActionPath::AutoRegister);
    assert_eq!(wf.summary.auto_register, 1);
}

#[test]
fn unknown_material_goes_to_review_and_queues_an_approval() {
    let (engine, _kb) = engine_with_kb(&[line("O-Ring", "PN-100")]);
    let id = engine
        .create(
            "wi-batch-2",
            ComparisonMode::KbOnly,
            vec![line("Sealant X", "")],
            None,
        )
        .unwrap();
    engine.run(id).unwrap();

    let wf = engine.get_results(id).unwrap();
    assert_eq!(wf.results[0].action_path, ActionPath::HumanReview);

    let pending = engine.approval_queue().list_pending(Some(id));
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, ApprovalStatus::Pending);
    assert_eq!(pending[0].fields.material_name, "Sealant X");
}

#[test]
fn approving_a_pending_item_promotes_it_and_drains_the_queue() {
    let (engine, kb) = engine_with_kb(&[]);
    let id = engine
        .create(
            "wi-batch-3",
            ComparisonMode::KbOnly,
            vec![line("Sealant X", "SX-9")],
            None,
        )
        .unwrap();
    engine.run(id).unwrap();

    let pending = engine.approval_queue().list_pending(Some(id));
    assert_eq!(pending.len(), 1);
    let kb_before = kb.len();

    let ids: Vec<u64> = pending.iter().map(|item| item.id).collect();
    let outcome = engine.approval_queue().approve(&ids);
    assert_eq!(outcome.applied, 1);

    assert_eq!(kb.len(), kb_before + 1);
    let promoted = kb
        .snapshot()
        .into_iter()
        .find(|record| record.material_name == "Sealant X")
        .unwrap();
    assert_eq!(promoted.source, RecordSource::KnowledgeBase);
    assert!(engine.approval_queue().list_pending(Some(id)).is_empty());
}

#[test]
fn approved_material_auto_registers_on_the_next_workflow() {
    let (engine, _kb) = engine_with_kb(&[]);
    let first = engine
        .create(
            "wi-batch-4a",
            ComparisonMode::KbOnly,
            vec![line("Sealant X", "SX-9")],
            None,
        )
        .unwrap();
    engine.run(first).unwrap();
    let ids: Vec<u64> = engine
        .approval_queue()
        .list_pending(Some(first))
        .iter()
        .map(|item| item.id)
        .collect();
    engine.approval_queue().approve(&ids);

    let second = engine
        .create(
            "wi-batch-4b",
            ComparisonMode::KbOnly,
            vec![line("Sealant X", "SX-9")],
            None,
        )
        .unwrap();
    engine.run(second).unwrap();

    let wf = engine.get_results(second).unwrap();
    assert_eq!(wf.results[0].action_path, ActionPath::AutoRegister);
}

#[test]
fn kb_only_upload_succeeds_without_an_item_master() {
    let (engine, _kb) = engine_with_kb(&[line("O-Ring", "PN-100")]);
    let id = engine
        .create(
            "wi-batch-5",
            ComparisonMode::KbOnly,
            vec![line("O-Ring", "PN-100"), line("Sealant X", "")],
            None,
        )
        .unwrap();
    engine.run(id).unwrap();

    let wf = engine.get_results(id).unwrap();
    assert_eq!(wf.results.len(), 2);
    // Nothing in a kb_only run can have come from an item master.
    assert!(wf
        .results
        .iter()
        .all(|row| !row.reasoning.contains("item master")));
}

#[test]
fn full_mode_uses_the_item_master_for_review_routing() {
    let (engine, _kb) = engine_with_kb(&[]);
    let master = vec![line("Torque Wrench", "TW-55")];
    let id = engine
        .create(
            "wi-batch-6",
            ComparisonMode::Full,
            vec![line("Torque Wrench", "TW-55")],
            Some(master),
        )
        .unwrap();
    engine.run(id).unwrap();

    // Item master hits are reference-only: they route to review, never
    // straight to auto-register, because the knowledge base has no record.
    let wf = engine.get_results(id).unwrap();
    assert_eq!(wf.results[0].action_path, ActionPath::HumanReview);
}

#[test]
fn non_material_lines_are_rejected() {
    let (engine, _kb) = engine_with_kb(&[]);
    let mut header = RawLineItem::default();
    header.qc_process_or_wi_step = "Step 10: visual inspection".into();
    let id = engine
        .create("wi-batch-7", ComparisonMode::KbOnly, vec![header], None)
        .unwrap();
    engine.run(id).unwrap();

    let wf = engine.get_results(id).unwrap();
    assert_eq!(wf.results[0].action_path, ActionPath::Reject);
    assert_eq!(wf.summary.reject, 1);
}
