use pretty_assertions::assert_eq;

use super::*;

#[test]
fn internal_names_become_dotted() {
    assert_eq!(to_binary_name("java/io/FileInputStream"), "java.io.FileInputStream");
    assert_eq!(to_binary_name("Foo$Bar"), "Foo$Bar");
}

#[test]
fn dotted_names_are_borrowed() {
    assert!(matches!(to_binary_name("java.io.File"), Cow::Borrowed(_)));
    assert!(matches!(to_binary_name("java/io/File"), Cow::Owned(_)));
}

#[test]
fn simple_and_package_names() {
    assert_eq!(simple_name("java.io.File"), "File");
    assert_eq!(simple_name("java/io/File"), "File");
    assert_eq!(simple_name("File"), "File");

    assert_eq!(package_name("java.io.File"), "java.io");
    assert_eq!(package_name("java/sql/Connection"), "java/sql");
    assert_eq!(package_name("File"), "");
}
