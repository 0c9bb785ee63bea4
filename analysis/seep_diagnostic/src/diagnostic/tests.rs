use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_resource_not_released_shape() {
    let diag = resource_not_released(
        "demo.Files",
        "read",
        Location::new(4, 12),
        "java.io.FileInputStream.<init>(Ljava/lang/String;)V",
        "java.io.InputStream",
    );

    assert_eq!(diag.code, ErrorCode::E1001);
    assert!(diag.is_error());
    assert_eq!(diag.class_name, "demo.Files");
    assert_eq!(diag.method_name, "read");
    assert_eq!(diag.primary_location(), Some(Location::new(4, 12)));
    assert!(diag.message.contains("java.io.InputStream"));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn test_lookahead_skipped_is_a_note() {
    let diag = lookahead_skipped(
        "demo.Files",
        "read",
        Location::at_pc(3),
        "lib.Pool.borrow()Ljava/sql/Connection;",
        "class `lib.Pool` not found",
    );
    assert_eq!(diag.code, ErrorCode::W1001);
    assert_eq!(diag.severity, Severity::Note);
    assert!(!diag.is_error());
}

#[test]
fn test_primary_location_skips_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_secondary_label(Location::at_pc(1), "context")
        .with_label(Location::at_pc(9), "here");
    assert_eq!(diag.primary_location(), Some(Location::at_pc(9)));

    let bare = Diagnostic::warning(ErrorCode::W1001);
    assert_eq!(bare.primary_location(), None);
}

#[test]
fn test_display_format() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("stream opened here is never released")
        .in_method("demo.Files", "read")
        .with_source_file(Some("Files.java".to_string()))
        .with_label(Location::new(4, 12), "opened")
        .with_note("close it");

    let rendered = diag.to_string();
    assert_eq!(
        rendered,
        "error [E1001]: stream opened here is never released\n  \
         in demo.Files.read (Files.java)\n  \
         --> line 12 (pc 4): opened\n  \
         = note: close it"
    );
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::Error < Severity::Warning);
    assert!(Severity::Warning < Severity::Note);
    assert_eq!(Severity::Note.to_string(), "note");
}
