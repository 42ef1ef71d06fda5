use alloc::{
    borrow::ToOwned as _,
    string::String,
    vec::{self, Vec},
};
use core::slice;

use crate::{
    scanner::strip_comments,
    tokenizer::{tokenize, Token, TokenKind},
};

/// Per-delimiter nesting counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Depth {
    paren: i32,
    curly: i32,
    bracket: i32,
}

impl Depth {
    /// Applies a token to the counters, returns `true` if it was a delimiter
    fn apply(&mut self, token: &Token<'_>) -> bool {
        if token.kind != TokenKind::Punctuator {
            return false;
        }
        match token.text {
            "(" => self.paren += 1,
            ")" => self.paren -= 1,
            "{" => self.curly += 1,
            "}" => self.curly -= 1,
            "[" => self.bracket += 1,
            "]" => self.bracket -= 1,
            _ => return false,
        }
        true
    }

    #[inline]
    const fn is_top(&self) -> bool {
        self.paren == 0 && self.curly == 0 && self.bracket == 0
    }
}

const CLASS_BODY: Depth = Depth {
    paren: 0,
    curly: 1,
    bracket: 0,
};

const PARAMETER_LIST: Depth = Depth {
    paren: 1,
    curly: 0,
    bracket: 0,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Trimmed default value text. `undefined` and empty defaults are stored as `None`.
    pub default: Option<String>,
}

impl Parameter {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, default: Option<String>) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    /// Key the parameter is injected with.
    /// The default value text overrides the name: `a = logger` is injected with `logger`.
    #[inline]
    #[must_use]
    pub fn injection_key(&self) -> &str {
        self.default.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered parameters of a callable or a class constructor
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Signature(Vec<Parameter>);

impl Signature {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Extracts the signature from source text.
    ///
    /// Supports function declarations and expressions, methods, arrow functions
    /// with and without parens, and classes, which take the parameters of their `constructor`.
    /// Malformed text doesn't fail: the result is empty or holds the parameters found before the text broke off.
    #[must_use]
    pub fn extract(source: &str) -> Self {
        let source = strip_comments(source);

        if let Some(name) = shorthand_parameter(&source) {
            return Self(Vec::from([Parameter::new(name, None)]));
        }

        let source = if is_class(&source) { constructor_source(&source) } else { source.as_str() };
        split_parameters(source).into_iter().map(parse_parameter).collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|parameter| parameter.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|parameter| parameter.name.as_str()).collect()
    }

    #[must_use]
    pub fn injection_keys(&self) -> Vec<&str> {
        self.0.iter().map(Parameter::injection_key).collect()
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Signature {
    type Item = Parameter;
    type IntoIter = vec::IntoIter<Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Parameter;
    type IntoIter = slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Shorthand `x => ...` arrow function parameter.
/// Holds only when a top level `=>` comes before any top level `(`.
fn shorthand_parameter(source: &str) -> Option<&str> {
    let tokens: Vec<_> = tokenize(source).collect();
    let mut depth = Depth::default();

    for (index, token) in tokens.iter().enumerate() {
        let top = depth.is_top();
        if depth.apply(token) {
            if top && token.text == "(" {
                return None;
            }
            continue;
        }
        if top && token.is_punctuator("=>") {
            return tokens[..index].iter().rev().find(|token| !token.is_trivia()).map(|token| token.text);
        }
    }
    None
}

fn is_class(source: &str) -> bool {
    tokenize(source)
        .find(|token| !token.is_trivia())
        .is_some_and(|token| token.kind == TokenKind::Identifier && token.text == "class")
}

/// Source of the `constructor` method of a class body, empty if the class doesn't declare one.
/// Only a `constructor` followed by a parameter list counts, member accesses like `this.constructor` don't.
fn constructor_source(source: &str) -> &str {
    let tokens: Vec<_> = tokenize(source).collect();
    let mut depth = Depth::default();
    let mut start = None;

    for (index, token) in tokens.iter().enumerate() {
        let in_body = depth == CLASS_BODY;
        if depth.apply(token) {
            match start {
                Some(start) if token.text == "}" && depth == CLASS_BODY => return &source[start..token.end()],
                _ => continue,
            }
        }
        if in_body
            && start.is_none()
            && token.kind == TokenKind::Identifier
            && token.text == "constructor"
            && !next_significant(tokens[..index].iter().rev()).is_some_and(|token| token.is_punctuator("."))
            && next_significant(tokens[index + 1..].iter()).is_some_and(|token| token.is_punctuator("("))
        {
            start = Some(token.start);
        }
    }

    start.map_or("", |start| &source[start..])
}

#[inline]
fn next_significant<'a, 'b>(mut tokens: impl Iterator<Item = &'b Token<'a>>) -> Option<&'b Token<'a>> {
    tokens.find(|token| !token.is_trivia())
}

/// Raw, trimmed parameters of the first parameter list in source.
/// Commas split parameters only outside nested parens, braces and brackets.
fn split_parameters(source: &str) -> Vec<&str> {
    let mut tokens = tokenize(source).skip_while(|token| !token.is_punctuator("("));
    let Some(open) = tokens.next() else {
        return Vec::new();
    };

    let mut parameters = Vec::new();
    let mut depth = PARAMETER_LIST;
    let mut current = open.end();

    for token in tokens {
        depth.apply(&token);

        if depth.paren == 0 {
            parameters.push(&source[current..token.start]);
            current = source.len();
            break;
        }
        if token.is_punctuator(",") && depth == PARAMETER_LIST {
            parameters.push(&source[current..token.start]);
            current = token.end();
        }
    }
    // unterminated list
    if current < source.len() {
        parameters.push(&source[current..]);
    }

    parameters.into_iter().map(str::trim).filter(|parameter| !parameter.is_empty()).collect()
}

/// Splits a raw parameter at its first top level `=`
fn parse_parameter(raw: &str) -> Parameter {
    let mut depth = Depth::default();
    let equals = tokenize(raw).find(|token| {
        let top = depth.is_top();
        !depth.apply(token) && top && token.is_punctuator("=")
    });

    match equals {
        Some(equals) => {
            let default = raw[equals.end()..].trim();
            let default = (!default.is_empty() && default != "undefined").then(|| default.to_owned());
            Parameter::new(raw[..equals.start].trim(), default)
        }
        None => Parameter::new(raw.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use alloc::{borrow::ToOwned as _, vec::Vec};

    use super::{constructor_source, split_parameters, Parameter, Signature};

    fn defaults(signature: &Signature) -> Vec<(&str, Option<&str>)> {
        signature
            .iter()
            .map(|parameter| (parameter.name.as_str(), parameter.default.as_deref()))
            .collect()
    }

    #[test]
    fn test_function_defaults() {
        let signature = Signature::extract("function fn(hello = world) {}");

        assert_eq!(signature.names(), ["hello"]);
        assert_eq!(defaults(&signature), [("hello", Some("world"))]);
    }

    #[test]
    fn test_function_without_parameters() {
        assert!(Signature::extract("function fn() { return 1; }").is_empty());
        assert!(Signature::extract("() => 1").is_empty());
    }

    #[test]
    fn test_arrow_function_shorthand() {
        let signature = Signature::extract(
            "response => {
                response.status(200).json({ success: true });
            }",
        );

        assert_eq!(defaults(&signature), [("response", None)]);
    }

    #[test]
    fn test_arrow_function_shorthand_starting_with_class() {
        let signature = Signature::extract("classyLady  => { console.log(classyLady); }");

        assert_eq!(signature.names(), ["classyLady"]);
    }

    #[test]
    fn test_arrow_function_with_parens() {
        let signature = Signature::extract("(a, b = c) => a + b");

        assert_eq!(defaults(&signature), [("a", None), ("b", Some("c"))]);
    }

    #[test]
    fn test_single_line_comments() {
        let signature = Signature::extract(
            "function myFn(a // Ignore me
                = // .. and me
                    b, // and me
                c // aaand me
                    = // aaaand me
                        d // aaaaand me
            ) {}",
        );

        assert_eq!(defaults(&signature), [("a", Some("b")), ("c", Some("d"))]);
    }

    #[test]
    fn test_block_comments() {
        let signature = Signature::extract("function /* ({[ */ fn /* ({[ */ ( /* ([{ */ a /* = */ = /**/ 10 ) {}");
        assert_eq!(defaults(&signature), [("a", Some("10"))]);

        let signature = Signature::extract("/* => { */ (a /* ({[// */ = 10) => {}");
        assert_eq!(defaults(&signature), [("a", Some("10"))]);

        let signature = Signature::extract("/* => { */ a /* ({[// */ => {}");
        assert_eq!(defaults(&signature), [("a", None)]);
    }

    #[test]
    fn test_comments_within_strings() {
        let signature = Signature::extract("function fn(x = '/*', y = '*/', z = '//', w) { /* ... */ }");

        assert_eq!(signature.names(), ["x", "y", "z", "w"]);
        assert_eq!(signature.get("y").unwrap().default.as_deref(), Some("'*/'"));
    }

    #[test]
    fn test_string_default_with_comment() {
        let signature = Signature::extract(r#"function fn(a = "/* not a comment */") {}"#);

        assert_eq!(defaults(&signature), [("a", Some(r#""/* not a comment */""#))]);
    }

    #[test]
    fn test_nested_defaults() {
        let signature = Signature::extract("function fn(a = [1, 2], b = { c: 1, d: [3] }, e = (f, g) => { return f(g, 1); }, h) {}");

        assert_eq!(
            defaults(&signature),
            [
                ("a", Some("[1, 2]")),
                ("b", Some("{ c: 1, d: [3] }")),
                ("e", Some("(f, g) => { return f(g, 1); }")),
                ("h", None),
            ]
        );
    }

    #[test]
    fn test_string_default_with_delimiters() {
        let signature = Signature::extract("function fn(a = ',)', b) {}");

        assert_eq!(defaults(&signature), [("a", Some("',)'")), ("b", None)]);
    }

    #[test]
    fn test_undefined_default() {
        let signature = Signature::extract("function fn(a = undefined, b = ) {}");

        assert_eq!(defaults(&signature), [("a", None), ("b", None)]);
    }

    #[test]
    fn test_first_equals_splits() {
        let signature = Signature::extract("function fn(a = b == c, d = e => e) {}");

        assert_eq!(defaults(&signature), [("a", Some("b == c")), ("d", Some("e => e"))]);
    }

    #[test]
    fn test_regex_defaults() {
        let signature = Signature::extract("function f(a = /,/, b = /[)]\\//g, c) {}");

        assert_eq!(defaults(&signature), [("a", Some("/,/")), ("b", Some("/[)]\\//g")), ("c", None)]);
        assert_eq!(Signature::extract("(a = /'/, b) => a").names(), ["a", "b"]);
    }

    #[test]
    fn test_class_constructor() {
        let signature = Signature::extract(
            "class MyClass {
                someMethod() {
                }

                constructor(a = b, c = d) {
                }
            }",
        );

        assert_eq!(defaults(&signature), [("a", Some("b")), ("c", Some("d"))]);
    }

    #[test]
    fn test_class_with_comments() {
        let signature = Signature::extract(
            "class MyClass {
                // ({[{(
                /* ({[{( */
                someMethod() {
                }
                /**/constructor(a /* Ignore me,
                                   I should be removed*/
                            =  /* .. and me */
                            b, // and me
                            c /* aaand me */
                            = /* aaaand me */
                            d /* aaaaand me */
                           ) {
                }
            }",
        );

        assert_eq!(defaults(&signature), [("a", Some("b")), ("c", Some("d"))]);
    }

    #[test]
    fn test_class_strings_kept() {
        let signature = Signature::extract(
            r#"class MyClass {
                constructor(a = "/* Do not ignore",
                            c = '// We don\'t like being ignored */'
                           ) {
                }
            }"#,
        );

        assert_eq!(
            defaults(&signature),
            [("a", Some(r#""/* Do not ignore""#)), ("c", Some(r"'// We don\'t like being ignored */'"))]
        );
    }

    #[test]
    fn test_class_without_constructor() {
        assert!(Signature::extract("class MyClass { func(a, b, c) {} }").is_empty());
        assert!(Signature::extract("class MyClass {}").is_empty());
    }

    #[test]
    fn test_class_nested_constructor_ignored() {
        let source = "class A { method() { return { constructor(x) {} }; } constructor(y) { this.y = y; } }";

        assert_eq!(constructor_source(source), "constructor(y) { this.y = y; }");
        assert_eq!(Signature::extract(source).names(), ["y"]);
    }

    #[test]
    fn test_class_constructor_member_access_ignored() {
        let source = "class A { kind = this.constructor; handle(req) {} constructor(a) {} }";

        assert_eq!(constructor_source(source), "constructor(a) {}");
        assert_eq!(Signature::extract(source).names(), ["a"]);

        let source = "class A { copy = () => new this.constructor(1); constructor(b) {} }";
        assert_eq!(Signature::extract(source).names(), ["b"]);
    }

    #[test]
    fn test_class_field_arrow_ignored() {
        let signature = Signature::extract("class A { handler = event => event; constructor(logger) {} }");

        assert_eq!(signature.names(), ["logger"]);
    }

    #[test]
    fn test_malformed() {
        assert!(Signature::extract("").is_empty());
        assert!(Signature::extract("not a function").is_empty());
        assert_eq!(split_parameters("function fn(a, b"), ["a", "b"]);
    }

    #[test]
    fn test_injection_key() {
        assert_eq!(Parameter::new("a", None).injection_key(), "a");
        assert_eq!(Parameter::new("a", Some("logger".to_owned())).injection_key(), "logger");

        let signature = Signature::extract("function fn(a = realDependencyName, b) {}");
        assert_eq!(signature.injection_keys(), ["realDependencyName", "b"]);
    }
}
