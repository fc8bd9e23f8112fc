//! End-to-end transform behaviour.

use autoinject_core::error::WarningCode;
use autoinject_core::{
    ConfigError, InjectConfig, InjectOptions, InjectWarning, Injector, Pattern, TransformOutput,
};
use serde_json::json;

fn injector(options: InjectOptions) -> Injector {
    Injector::new(options.source_map(false)).expect("valid options")
}

fn run(injector: &Injector, code: &str, id: &str) -> (Option<TransformOutput>, Vec<InjectWarning>) {
    let mut warnings = Vec::new();
    let output = injector.transform(code, id, &mut warnings);
    (output, warnings)
}

fn transformed(injector: &Injector, code: &str) -> String {
    let (output, warnings) = run(injector, code, "/project/src/main.js");
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    let output = output.expect("transform output");
    assert!(output.changed, "expected a change for {code:?}");
    output.code
}

#[test]
fn test_named_import_injected() {
    let injector = injector(InjectOptions::new().module("Promise", ("es6-promise", "Promise")));
    let code = transformed(&injector, "Promise.resolve(1);");
    assert_eq!(
        code,
        "import { Promise as Promise } from 'es6-promise';\n\nPromise.resolve(1);"
    );
}

#[test]
fn test_local_binding_leaves_file_unchanged() {
    let injector = injector(InjectOptions::new().module("$", "jquery"));
    let code = "function f(){ var $ = 1; return $ }";
    let (output, warnings) = run(&injector, code, "/project/src/main.js");
    assert!(warnings.is_empty());
    let output = output.expect("parsed output");
    assert!(!output.changed);
    assert_eq!(output.code, code);
    assert!(output.map.is_none());
}

#[test]
fn test_keypath_rewritten_to_alias() {
    let injector = injector(InjectOptions::new().module("process.env", ("my-env", "default")));
    let code = transformed(&injector, "console.log(process.env)");
    assert_eq!(
        code,
        "import { default as $inject_process_env } from 'my-env';\n\nconsole.log($inject_process_env)"
    );
}

#[test]
fn test_module_never_imports_itself() {
    let injector = injector(InjectOptions::new().module("Buffer", ("buffer-lib", "Buffer")));
    let (output, warnings) = run(&injector, "export const b = Buffer.alloc(1);", "buffer-lib");
    assert!(warnings.is_empty());
    assert!(!output.expect("parsed output").changed);

    let (output, _) = run(&injector, "export const b = Buffer.alloc(1);", "other.js");
    assert!(output.expect("output").changed);
}

#[test]
fn test_namespace_import() {
    let injector = injector(InjectOptions::new().module("fs", ("node:fs", "*")));
    let code = transformed(&injector, "fs.readFileSync('a')");
    assert!(code.starts_with("import * as fs from 'node:fs';\n\n"));
}

#[test]
fn test_default_export_for_bare_specifier() {
    let injector = injector(InjectOptions::new().module("$", "jquery"));
    let code = transformed(&injector, "$('body')");
    assert!(code.starts_with("import { default as $ } from 'jquery';\n\n"));
}

#[test]
fn test_imports_deduplicated_in_first_seen_order() {
    let injector = injector(
        InjectOptions::new()
            .module("process.env", "env")
            .module("Buffer", ("buffer", "Buffer")),
    );
    let code = transformed(
        &injector,
        "a(process.env); Buffer.from(x); b(process.env.HOME); Buffer;",
    );
    assert_eq!(
        code,
        "import { default as $inject_process_env } from 'env';\n\n\
         import { Buffer as Buffer } from 'buffer';\n\n\
         a($inject_process_env); Buffer.from(x); b($inject_process_env.HOME); Buffer;"
    );
}

#[test]
fn test_shadowing_is_scoped() {
    let injector = injector(InjectOptions::new().module("Buffer", "buffer"));
    let code = transformed(
        &injector,
        "function f(Buffer) { return Buffer; }\ntry {} catch (Buffer) {}\nBuffer;",
    );
    assert!(code.starts_with("import { default as Buffer } from 'buffer';\n\n"));
}

#[test]
fn test_explicit_import_takes_precedence() {
    let injector = injector(InjectOptions::new().module("Promise", "es6-promise"));
    let code = "import Promise from 'bluebird';\nPromise.resolve();";
    let (output, warnings) = run(&injector, code, "/project/src/main.js");
    assert!(warnings.is_empty());
    let output = output.expect("parsed output");
    assert!(!output.changed);
    assert_eq!(output.code, code);
}

#[test]
fn test_module_specifier_is_escaped() {
    let injector = injector(InjectOptions::new().module("q", r"it's\here"));
    let code = transformed(&injector, "q()");
    assert!(code.starts_with(r"import { default as q } from 'it\'s\\here';"));
}

#[test]
fn test_prefilter_skips_parse() {
    let injector = injector(InjectOptions::new().module("Promise", "es6-promise"));
    // invalid syntax, but no keypath in the text: never parsed, no warning
    let (output, warnings) = run(&injector, "let = = ;", "/project/src/main.js");
    assert!(output.is_none());
    assert!(warnings.is_empty());
    assert!(!injector.should_transform("let = = ;", "/project/src/main.js"));
}

#[test]
fn test_parse_failure_warns_and_passes_through() {
    let injector = injector(InjectOptions::new().module("Promise", "es6-promise"));
    let (output, warnings) = run(&injector, "Promise.resolve(", "/project/src/broken.js");
    assert!(output.is_none());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::ParseError);
    assert_eq!(warnings[0].code.as_str(), "PARSE_ERROR");
    assert_eq!(
        warnings[0].message,
        "failed to parse /project/src/broken.js. Consider restricting the plugin to particular files via options.include"
    );
}

#[test]
fn test_filtered_files_are_untouched() {
    let options = InjectOptions::new()
        .module("Promise", "es6-promise")
        .include(Pattern::glob("/project/src/**"))
        .exclude(Pattern::glob("**/*.test.js"));
    let injector = injector(options);

    let (output, _) = run(&injector, "Promise.resolve(", "/project/lib/a.js");
    assert!(output.is_none());
    let (output, warnings) = run(&injector, "Promise.resolve(", "/project/src/a.test.js");
    assert!(output.is_none());
    assert!(warnings.is_empty());
    let (output, _) = run(&injector, "Promise.resolve()", "\0virtual");
    assert!(output.is_none());
    let (output, _) = run(&injector, "Promise.resolve()", "/project/src/a.js");
    assert!(output.is_some());
}

#[test]
fn test_empty_mapping_passes_everything_through() {
    let injector = Injector::from_json_str(r#"{ "include": "**/*.js" }"#).unwrap();
    assert!(injector.config().modules.is_empty());
    let (output, warnings) = run(&injector, "Promise.resolve(", "a.js");
    assert!(output.is_none());
    assert!(warnings.is_empty());
}

#[test]
fn test_typescript_source() {
    let injector = injector(InjectOptions::new().module("Buffer", ("buffer", "Buffer")));
    let code = "const size: number = Buffer.byteLength('x');\nlet b: Buffer;";
    let (output, warnings) = run(&injector, code, "/project/src/main.ts");
    assert!(warnings.is_empty());
    let output = output.expect("output");
    assert!(output.changed);
    assert!(output.code.starts_with("import { Buffer as Buffer } from 'buffer';\n\n"));
    assert!(output.code.ends_with(code));
}

#[test]
fn test_json_options_round_trip() {
    let config = InjectConfig::normalize(Some(
        InjectOptions::from_json_value(Some(&json!({
            "sourceMap": false,
            "Promise": ["es6-promise", "Promise"],
            "process.env": "env",
        })))
        .unwrap(),
    ))
    .unwrap();
    let injector = Injector::from_config(config).unwrap();
    let code = transformed(&injector, "Promise.all([process.env])");
    assert_eq!(
        code,
        "import { Promise as Promise } from 'es6-promise';\n\n\
         import { default as $inject_process_env } from 'env';\n\n\
         Promise.all([$inject_process_env])"
    );
}

#[test]
fn test_config_errors_surface_at_construction() {
    assert!(matches!(
        Injector::from_json_str("[]"),
        Err(ConfigError::NotAnObject { .. })
    ));
    assert!(matches!(
        Injector::from_json_str(r#"{ "include": "src/[", "a": "b" }"#),
        Err(ConfigError::InvalidGlob { .. })
    ));
}

#[test]
fn test_injector_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Injector>();
}
