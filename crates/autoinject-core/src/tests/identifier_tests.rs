use crate::identifier::make_legal_identifier;

#[test]
fn test_keypath_alias() {
    assert_eq!(make_legal_identifier("$inject_process.env"), "$inject_process_env");
    assert_eq!(
        make_legal_identifier("$inject_a.b.c"),
        "$inject_a_b_c"
    );
}

#[test]
fn test_dash_camel_cases() {
    assert_eq!(make_legal_identifier("es6-promise"), "es6Promise");
    assert_eq!(make_legal_identifier("a-b-c"), "aBC");
    // a trailing dash has nothing to capitalize
    assert_eq!(make_legal_identifier("a-"), "a_");
}

#[test]
fn test_illegal_characters_replaced() {
    assert_eq!(make_legal_identifier("@scope/pkg"), "_scope_pkg");
    assert_eq!(make_legal_identifier("café"), "caf_");
}

#[test]
fn test_leading_digit_prefixed() {
    assert_eq!(make_legal_identifier("2d"), "_2d");
}

#[test]
fn test_reserved_and_builtin_names_prefixed() {
    assert_eq!(make_legal_identifier("class"), "_class");
    assert_eq!(make_legal_identifier("await"), "_await");
    assert_eq!(make_legal_identifier("Promise"), "_Promise");
    assert_eq!(make_legal_identifier("undefined"), "_undefined");
    assert_eq!(make_legal_identifier("classy"), "classy");
}

#[test]
fn test_empty_string() {
    assert_eq!(make_legal_identifier(""), "_");
}
