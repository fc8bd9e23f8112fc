use crate::config::{FilterPattern, Pattern};
use crate::filter::FileFilter;
use std::path::Path;

fn filter(include: Vec<Pattern>, exclude: Vec<Pattern>) -> FileFilter {
    FileFilter::new(
        &FilterPattern::new(include),
        &FilterPattern::new(exclude),
        Path::new("/project"),
        '/',
    )
    .unwrap()
}

#[test]
fn test_empty_include_accepts_everything() {
    let f = filter(vec![], vec![]);
    assert!(f.matches("/project/src/a.js"));
    assert!(f.matches("/elsewhere/b.ts"));
}

#[test]
fn test_virtual_modules_never_match() {
    let f = filter(vec![], vec![]);
    assert!(!f.matches("\0virtual:entry"));
    assert!(!FileFilter::accept_all().matches("\0commonjs-helpers"));
}

#[test]
fn test_relative_globs_anchor_at_base_dir() {
    let f = filter(vec![Pattern::glob("src/**/*.js")], vec![]);
    assert!(f.matches("/project/src/a.js"));
    assert!(f.matches("/project/src/nested/b.js"));
    assert!(!f.matches("/other/src/a.js"));
    assert!(!f.matches("/project/src/a.ts"));

    let dotted = filter(vec![Pattern::glob("./src/*.js")], vec![]);
    assert!(dotted.matches("/project/src/a.js"));
}

#[test]
fn test_single_star_does_not_cross_directories() {
    let f = filter(vec![Pattern::glob("src/*.js")], vec![]);
    assert!(f.matches("/project/src/a.js"));
    assert!(!f.matches("/project/src/nested/a.js"));
}

#[test]
fn test_double_star_globs_are_not_anchored() {
    let f = filter(vec![Pattern::glob("**/*.mjs")], vec![]);
    assert!(f.matches("/anywhere/at/all.mjs"));
    assert!(!f.matches("/anywhere/at/all.js"));
}

#[test]
fn test_exclude_wins_over_include() {
    let f = filter(
        vec![Pattern::glob("src/**")],
        vec![Pattern::glob("src/vendor/**")],
    );
    assert!(f.matches("/project/src/app.js"));
    assert!(!f.matches("/project/src/vendor/lib.js"));
}

#[test]
fn test_exclude_only() {
    let f = filter(vec![], vec![Pattern::glob("**/node_modules/**")]);
    assert!(f.matches("/project/src/app.js"));
    assert!(!f.matches("/project/node_modules/pkg/index.js"));
}

#[test]
fn test_regex_patterns() {
    let f = filter(vec![Pattern::regex(r"\.m?js$")], vec![Pattern::regex("legacy")]);
    assert!(f.matches("/project/a.mjs"));
    assert!(f.matches("/x/b.js"));
    assert!(!f.matches("/x/b.ts"));
    assert!(!f.matches("/x/legacy/b.js"));
}

#[test]
fn test_windows_ids_are_normalized() {
    let f = FileFilter::new(
        &FilterPattern::from(Pattern::glob("src/**")),
        &FilterPattern::default(),
        Path::new(r"C:\project"),
        '\\',
    )
    .unwrap();
    assert!(f.matches(r"C:\project\src\a.js"));
    assert!(!f.matches(r"C:\project\lib\a.js"));
}

#[test]
fn test_invalid_patterns_are_config_errors() {
    let err = FileFilter::new(
        &FilterPattern::from(Pattern::glob("src/[")),
        &FilterPattern::default(),
        Path::new("/project"),
        '/',
    )
    .unwrap_err();
    assert!(err.to_string().contains("src/["));

    let err = FileFilter::new(
        &FilterPattern::from(Pattern::regex("(")),
        &FilterPattern::default(),
        Path::new("/project"),
        '/',
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("invalid regular expression"));
}
