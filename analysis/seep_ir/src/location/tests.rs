use super::*;

#[test]
fn line_zero_means_unknown() {
    assert_eq!(Location::at_pc(7).line(), None);
    assert_eq!(Location::new(7, 0).line(), None);
    assert_eq!(Location::new(7, 42).line(), Some(42));
}

#[test]
fn display_includes_line_when_known() {
    assert_eq!(Location::new(12, 30).to_string(), "line 30 (pc 12)");
    assert_eq!(Location::at_pc(12).to_string(), "pc 12");
}

#[test]
fn default_is_method_entry() {
    let loc = Location::default();
    assert_eq!(loc.pc(), 0);
    assert_eq!(loc.line(), None);
}

#[test]
fn location_hash() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(Location::new(0, 10));
    set.insert(Location::new(0, 10)); // duplicate
    set.insert(Location::new(4, 10));
    assert_eq!(set.len(), 2);
}
