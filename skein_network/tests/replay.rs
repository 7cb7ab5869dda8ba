use skein_network::network::change::*;
use skein_network::prelude::*;
use std::rc::Rc;

mod utils;
use utils::*;

use pretty_assertions::assert_eq;

#[test]
fn mirror_matches_authority_through_records() {
    init_logging();

    let saved = Rc::new(SavedChanges::new());
    let mut authority = Replicator::new();
    authority.add_sink(Rc::clone(&saved));

    for op in sample_operations() {
        let _ = authority.apply(op);
    }

    // Records cross the boundary as JSON text
    let wire: Vec<String> = saved
        .drain()
        .iter()
        .map(|op| stringify(&op.to_record().unwrap()))
        .collect();

    let mut mirror = Mirror::new();
    for line in &wire {
        let record: ChangeRecord = serde_json::from_str(line).unwrap();
        mirror.apply_record(&record);
    }

    assert_eq!(stringify(authority.state()), stringify(mirror.state()));
}

#[test]
fn unknown_records_do_not_disturb_mirror() {
    init_logging();

    let saved = Rc::new(SavedChanges::new());
    let mut authority = Replicator::new();
    authority.add_sink(Rc::clone(&saved));

    let mut mirror = Mirror::new();
    for op in sample_operations() {
        let _ = authority.apply(op);
        for replicated in saved.drain() {
            mirror.apply_record(&replicated.to_record().unwrap());
            mirror.apply_record(&ChangeRecord {
                name: "SomethingNewer".to_string(),
                args: vec![serde_json::json!({ "anything": true })],
            });
        }
    }

    assert_eq!(authority.state(), mirror.state());
}

#[test]
fn replay_is_order_sensitive_but_deterministic() {
    let ops = sample_operations();

    let mut first = SessionState::new();
    let mut second = SessionState::new();
    for op in &ops {
        let a = first.apply(op);
        let b = second.apply(op);
        assert_eq!(a, b);
    }
    assert_eq!(stringify(&first), stringify(&second));

    let network = first.network(0).unwrap();
    assert_eq!(network.nick.as_str(), "me_");
    assert!(network.channels[0].members.is_empty());
    assert_eq!(network.channels[0].topic.as_deref(), Some("welcome"));
    assert_eq!(first.networks().len(), 1);
}
