use crate::error::PatchError;
use crate::patch::{MapOptions, TextPatch};

fn map_options() -> MapOptions {
    MapOptions {
        source: "input.js".to_string(),
        file: None,
        include_content: false,
    }
}

#[test]
fn test_untouched_patch_reproduces_original() {
    let patch = TextPatch::new("let a = 1;\nlet b = 2;\n");
    assert!(!patch.has_changes());
    assert_eq!(patch.to_code(), "let a = 1;\nlet b = 2;\n");
    assert_eq!(patch.original(), "let a = 1;\nlet b = 2;\n");
}

#[test]
fn test_overwrite_and_prepend() {
    let mut patch = TextPatch::new("log(process.env)");
    patch.overwrite(4, 15, "$inject_process_env", true).unwrap();
    patch.prepend("import x from 'y';\n\n");
    assert!(patch.has_changes());
    assert_eq!(
        patch.to_code(),
        "import x from 'y';\n\nlog($inject_process_env)"
    );
    assert_eq!(patch.to_string(), patch.to_code());
}

#[test]
fn test_prepend_goes_before_earlier_prepends() {
    let mut patch = TextPatch::new("body");
    patch.prepend("second\n");
    patch.prepend("first\n");
    assert_eq!(patch.to_code(), "first\nsecond\nbody");
}

#[test]
fn test_edits_apply_in_position_order() {
    let mut patch = TextPatch::new("a + b + c");
    patch.overwrite(8, 9, "C", false).unwrap();
    patch.overwrite(0, 1, "A", false).unwrap();
    patch.overwrite(4, 5, "B", false).unwrap();
    assert_eq!(patch.to_code(), "A + B + C");
}

#[test]
fn test_adjacent_edits_allowed() {
    let mut patch = TextPatch::new("abcd");
    patch.overwrite(0, 2, "X", false).unwrap();
    patch.overwrite(2, 4, "Y", false).unwrap();
    assert_eq!(patch.to_code(), "XY");
}

#[test]
fn test_overlapping_edit_rejected() {
    let mut patch = TextPatch::new("abcdef");
    patch.overwrite(1, 4, "X", false).unwrap();
    assert_eq!(
        patch.overwrite(3, 5, "Y", false),
        Err(PatchError::Overlap {
            start: 3,
            end: 5,
            other_start: 1,
            other_end: 4,
        })
    );
    assert!(matches!(
        patch.overwrite(0, 2, "Z", false),
        Err(PatchError::Overlap { .. })
    ));
    assert_eq!(patch.to_code(), "aXef");
}

#[test]
fn test_invalid_ranges_rejected() {
    let mut patch = TextPatch::new("héllo");
    assert_eq!(
        patch.overwrite(2, 10, "x", false),
        Err(PatchError::OutOfBounds {
            start: 2,
            end: 10,
            len: 6
        })
    );
    assert_eq!(
        patch.overwrite(3, 3, "x", false),
        Err(PatchError::EmptyRange { start: 3 })
    );
    // `é` occupies bytes 1..3
    assert_eq!(
        patch.overwrite(2, 4, "x", false),
        Err(PatchError::NotCharBoundary { start: 2, end: 4 })
    );
}

#[test]
fn test_identity_map_is_hires() {
    let patch = TextPatch::new("ab\nc");
    let map = patch.generate_map(&map_options());
    assert_eq!(map.version, 3);
    assert_eq!(map.sources, vec!["input.js".to_string()]);
    assert!(map.names.is_empty());
    assert!(map.sources_content.is_empty());
    // a, b on line 0; c on line 1 at original line 1
    assert_eq!(map.mappings, "AAAA,CAAC;AACD");
}

#[test]
fn test_header_lines_have_no_mappings() {
    let mut patch = TextPatch::new("x");
    patch.prepend("import a from 'a';\n\n");
    let map = patch.generate_map(&map_options());
    assert_eq!(map.mappings, ";;AAAA");
}

#[test]
fn test_overwrite_records_name() {
    let mut patch = TextPatch::new("f(a.b)");
    patch.overwrite(2, 5, "$inject_a_b", true).unwrap();
    let map = patch.generate_map(&map_options());
    assert_eq!(map.names, vec!["a.b".to_string()]);
    // f, (, rewritten span (named), )
    assert_eq!(map.mappings, "AAAA,CAAC,CAACA,WAAG");
}

#[test]
fn test_include_content() {
    let patch = TextPatch::new("code");
    let map = patch.generate_map(&MapOptions {
        include_content: true,
        file: Some("out.js".to_string()),
        ..map_options()
    });
    assert_eq!(map.sources_content, vec![Some("code".to_string())]);
    assert_eq!(map.file.as_deref(), Some("out.js"));
}
