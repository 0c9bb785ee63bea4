use pretty_assertions::assert_eq;

use super::*;
use crate::{lookahead_skipped, resource_not_released};

fn leak(class: &str, method: &str, pc: u32) -> Diagnostic {
    resource_not_released(class, method, Location::at_pc(pc), "X.<init>()V", "java.io.InputStream")
}

#[test]
fn test_duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(leak("demo.A", "m", 3)));
    assert!(!queue.add(leak("demo.A", "m", 3)));
    assert!(queue.add(leak("demo.A", "m", 4)));
    assert!(queue.add(leak("demo.A", "n", 3)));
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.error_count(), 3);
}

#[test]
fn test_unlimited_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(QueueConfig::unlimited());
    queue.extend([leak("demo.A", "m", 3), leak("demo.A", "m", 3)]);
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_limit() {
    let mut queue = DiagnosticQueue::with_config(QueueConfig {
        limit: 2,
        deduplicate: true,
    });
    queue.extend((0..5).map(|pc| leak("demo.A", "m", pc)));
    assert_eq!(queue.len(), 2);
    assert!(queue.limit_reached());
}

#[test]
fn test_flush_sorts_and_resets() {
    let mut queue = DiagnosticQueue::new();
    queue.extend([
        leak("demo.B", "m", 1),
        leak("demo.A", "z", 9),
        leak("demo.A", "a", 7),
        leak("demo.A", "a", 2),
    ]);
    queue.add(lookahead_skipped(
        "demo.A",
        "a",
        Location::at_pc(5),
        "lib.X.open()Ljava/io/Reader;",
        "class not found",
    ));
    assert_eq!(queue.error_count(), 4);

    let flushed = queue.flush();
    let order: Vec<(String, String, u32)> = flushed
        .iter()
        .map(|d| {
            (
                d.class_name.clone(),
                d.method_name.clone(),
                d.primary_location().map_or(0, Location::pc),
            )
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("demo.A".to_string(), "a".to_string(), 2),
            ("demo.A".to_string(), "a".to_string(), 5),
            ("demo.A".to_string(), "a".to_string(), 7),
            ("demo.A".to_string(), "z".to_string(), 9),
            ("demo.B".to_string(), "m".to_string(), 1),
        ]
    );

    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);
    // Dedup state is reset too.
    assert!(queue.add(leak("demo.B", "m", 1)));
}
