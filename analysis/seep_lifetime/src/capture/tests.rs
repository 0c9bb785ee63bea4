use pretty_assertions::assert_eq;

use super::*;

fn instance(pc: u32) -> ResourceInstance {
    ResourceInstance::new(
        "java.io.InputStream",
        OperationIdentity::new("java.io.FileInputStream", "<init>", "(Ljava/lang/String;)V"),
        Location::at_pc(pc),
    )
}

fn pcs(instances: &[&ResourceInstance]) -> Vec<u32> {
    instances.iter().map(|i| i.location.pc()).collect()
}

#[test]
fn test_pending_binds_to_next_store() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(3));
    assert_eq!(cap.pending_len(), 1);
    assert!(!cap.holds(1));

    assert_eq!(cap.mark_store_target(1), None);
    assert!(cap.holds(1));
    assert!(cap.is_tracked(1));
    assert_eq!(cap.pending_len(), 0);
    assert_eq!(cap.len(), 1);
}

#[test]
fn test_store_without_pending_clears_slot() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(3));
    cap.mark_store_target(1);

    let dropped = cap.mark_store_target(1);
    assert_eq!(dropped.map(|i| i.location.pc()), Some(3));
    assert!(!cap.holds(1));
    assert!(cap.is_tracked(1));
    assert!(cap.is_empty());
}

#[test]
fn test_store_replaces_previous_instance() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(3));
    cap.mark_store_target(1);
    cap.bind_instance(instance(9));

    let dropped = cap.mark_store_target(1);
    assert_eq!(dropped.map(|i| i.location.pc()), Some(3));
    assert_eq!(pcs(&cap.remaining()), vec![9]);
}

#[test]
fn test_release() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(3));
    cap.mark_store_target(2);

    assert_eq!(cap.release(5), None);
    assert_eq!(cap.release(2).map(|i| i.location.pc()), Some(3));
    assert_eq!(cap.release(2), None);
    assert!(cap.is_empty());
}

#[test]
fn test_remaining_order() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(1));
    cap.mark_store_target(4);
    cap.bind_instance(instance(2));
    cap.mark_store_target(2);
    cap.bind_instance(instance(7));

    assert_eq!(pcs(&cap.remaining()), vec![2, 1, 7]);

    let drained: Vec<u32> = cap.take_remaining().iter().map(|i| i.location.pc()).collect();
    assert_eq!(drained, vec![2, 1, 7]);
    assert!(cap.is_empty());
    assert!(!cap.is_tracked(4));
}

#[test]
fn test_clear() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(1));
    cap.mark_store_target(1);
    cap.bind_instance(instance(2));
    cap.clear();
    assert!(cap.is_empty());
    assert!(!cap.is_tracked(1));
    assert!(cap.remaining().is_empty());
}

#[test]
fn test_pop_pending() {
    let mut cap = ResourceInstanceCapturer::new();
    cap.bind_instance(instance(1));
    cap.bind_instance(instance(2));
    assert_eq!(cap.pop_pending().map(|i| i.location.pc()), Some(2));
    cap.mark_store_target(3);
    assert_eq!(pcs(&cap.remaining()), vec![1]);
    assert_eq!(cap.pop_pending(), None);
}
