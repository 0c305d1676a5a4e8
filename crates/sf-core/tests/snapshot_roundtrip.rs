//! Snapshot capture → restore round-trips, checked on the observable state:
//! texts, positions, kinds, lock/order flags, and connection endpoints by
//! sequence position.

use pretty_assertions::assert_eq;
use sf_core::{BubbleKind, Diagram, Snapshot};

fn build_diagram() -> Diagram {
    let mut d = Diagram::new();
    let a = d.add_bubble("Central idea", 10.0, 20.0, BubbleKind::Idea);
    let b = d.add_bubble("Ship it", 400.0, -30.0, BubbleKind::Task);
    let c = d.add_bubble("What could break", -120.0, 250.0, BubbleKind::Question);
    d.get_mut(b).unwrap().locked = true;
    d.get_mut(c).unwrap().order = Some(0);
    d.connect(a, b, "leads to");
    d.connect(a, c, "");
    d.connect(c, b, "answers");
    d
}

/// Observable projection used for equality: everything a user can see,
/// with connection endpoints as sequence positions.
fn observe(d: &Diagram) -> (Vec<(String, f32, f32, BubbleKind, bool, Option<u32>)>, Vec<(usize, usize, String)>) {
    let bubbles = d
        .bubbles()
        .iter()
        .map(|b| (b.text.clone(), b.x, b.y, b.kind, b.locked, b.order))
        .collect();
    let connections = d
        .connections()
        .iter()
        .map(|c| {
            (
                d.index_of(c.from).unwrap(),
                d.index_of(c.to).unwrap(),
                c.label.clone(),
            )
        })
        .collect();
    (bubbles, connections)
}

#[test]
fn restore_of_own_capture_is_identity() {
    let mut d = build_diagram();
    let before = observe(&d);

    let snap = Snapshot::capture(&d);
    snap.restore(&mut d);

    assert_eq!(observe(&d), before);
}

#[test]
fn json_round_trip_preserves_everything() {
    let mut d = build_diagram();
    let before = observe(&d);

    let json = Snapshot::capture(&d).to_json().unwrap();
    let snap = Snapshot::from_json(&json).unwrap();
    snap.restore(&mut d);

    assert_eq!(observe(&d), before);
}

#[test]
fn restore_after_reorder_keeps_endpoint_identity() {
    let mut d = build_diagram();

    // Move the first bubble to the end; connections must follow identity,
    // and a capture taken now must encode the *new* positions.
    assert!(d.reorder(0, 2));
    let before = observe(&d);

    let snap = Snapshot::capture(&d);
    snap.restore(&mut d);

    assert_eq!(observe(&d), before);
}

#[test]
fn restore_replaces_rather_than_merges() {
    let mut d = build_diagram();
    let snap = Snapshot::capture(&d);

    d.add_bubble("Extra noise", 0.0, 0.0, BubbleKind::Note);
    assert_eq!(d.len(), 4);

    snap.restore(&mut d);
    assert_eq!(d.len(), 3);
    assert_eq!(d.connections().len(), 3);
}

#[test]
fn restored_ids_are_fresh() {
    let mut d = build_diagram();
    let old_ids: Vec<_> = d.bubbles().iter().map(|b| b.id).collect();

    let snap = Snapshot::capture(&d);
    snap.restore(&mut d);

    for b in d.bubbles() {
        assert!(!old_ids.contains(&b.id), "id {:?} was reused", b.id);
    }
}
