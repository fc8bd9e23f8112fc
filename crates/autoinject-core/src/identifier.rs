//! Legal JavaScript identifier generation for injected aliases.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

const RESERVED_WORDS: &str = "break case class catch const continue debugger default delete do else export extends finally for function if import in instanceof let new return super switch this throw try typeof var void while with yield enum await implements package protected static interface private public";

const BUILTINS: &str = "arguments Infinity NaN undefined null true false eval uneval isFinite isNaN parseFloat parseInt decodeURI decodeURIComponent encodeURI encodeURIComponent escape unescape Object Function Boolean Symbol Error EvalError InternalError RangeError ReferenceError SyntaxError TypeError URIError Number Math Date String RegExp Array Int8Array Uint8Array Uint8ClampedArray Int16Array Uint16Array Int32Array Uint32Array Float32Array Float64Array Map Set WeakMap WeakSet SIMD ArrayBuffer DataView JSON Promise Generator GeneratorFunction Reflect Proxy Intl";

static FORBIDDEN_IDENTIFIERS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    RESERVED_WORDS
        .split(' ')
        .chain(BUILTINS.split(' '))
        .chain(std::iter::once(""))
        .collect()
});

/// Turn an arbitrary string into a valid binding name.
///
/// `-x` becomes `X`, any other character outside `[$_a-zA-Z0-9]` becomes
/// `_`, and a result that starts with a digit or collides with a reserved
/// word or builtin gets a leading `_`.
///
/// ```
/// use autoinject_core::make_legal_identifier;
/// assert_eq!(make_legal_identifier("$inject_process.env"), "$inject_process_env");
/// assert_eq!(make_legal_identifier("foo-bar"), "fooBar");
/// assert_eq!(make_legal_identifier("1up"), "_1up");
/// ```
pub fn make_legal_identifier(text: &str) -> String {
    let mut identifier = String::with_capacity(text.len() + 1);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '-' {
            if let Some(&next) = chars.peek()
                && is_word_char(next)
            {
                chars.next();
                identifier.extend(next.to_uppercase());
                continue;
            }
        }

        if ch == '$' || ch == '_' || ch.is_ascii_alphanumeric() {
            identifier.push(ch);
        } else {
            identifier.push('_');
        }
    }

    let starts_with_digit = identifier.starts_with(|c: char| c.is_ascii_digit());
    if starts_with_digit || FORBIDDEN_IDENTIFIERS.contains(identifier.as_str()) {
        identifier.insert(0, '_');
    }

    identifier
}

// `\w` in the regex sense
fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}
