use pretty_assertions::assert_eq;
use seep_ir::MethodRef;

use super::*;

#[test]
fn test_identity_normalizes_class_name() {
    let id = OperationIdentity::new("java/io/FileInputStream", "<init>", "(Ljava/lang/String;)V");
    assert_eq!(id.declaring_class, "java.io.FileInputStream");
    assert!(id.is_constructor());
    assert_eq!(
        id.to_string(),
        "java.io.FileInputStream.<init>(Ljava/lang/String;)V"
    );
}

#[test]
fn test_identity_from_method_ref() {
    let target = MethodRef::new("demo/Files", "wrap", "(Ljava/lang/String;)Ljava/io/InputStream;");
    let id = OperationIdentity::from(&target);
    assert_eq!(
        id,
        OperationIdentity::new("demo.Files", "wrap", "(Ljava/lang/String;)Ljava/io/InputStream;")
    );
    assert!(!id.is_constructor());
}

#[test]
fn test_identity_from_hand_built_method_ref() {
    // Fields are public, so a reference can carry an internal name.
    let target = MethodRef {
        class_name: "java/io/Reader".to_string(),
        name: "close".to_string(),
        descriptor: "()V".to_string(),
    };
    assert_eq!(
        OperationIdentity::from(&target),
        OperationIdentity::new("java.io.Reader", "close", "()V")
    );
}

#[test]
fn test_identity_distinguishes_descriptor() {
    let a = OperationIdentity::new("demo.A", "open", "()Ljava/io/Reader;");
    let b = OperationIdentity::new("demo.A", "open", "(I)Ljava/io/Reader;");
    assert_ne!(a, b);
}

#[test]
fn test_malformed_descriptor_is_none() {
    let id = OperationIdentity::new("demo.A", "m", "(Lbroken");
    assert!(id.descriptor().is_none());

    let ok = OperationIdentity::new("demo.A", "m", "()V");
    assert!(ok.descriptor().is_some_and(|d| d.is_void()));
}

#[test]
fn test_classification_from_verdict() {
    assert_eq!(Classification::from_verdict(true), Classification::Whitelisted);
    assert_eq!(Classification::from_verdict(false), Classification::Blacklisted);
    assert!(Classification::Whitelisted.is_whitelisted());
    assert!(!Classification::Blacklisted.is_whitelisted());
    assert_eq!(OperationRole::Close.to_string(), "close");
}
