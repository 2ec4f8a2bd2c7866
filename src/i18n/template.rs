//! Template lexing for `t()`.
//!
//! Two independent passes, each a small lexer:
//!
//! 1. `scan_references` splits text into literals and `{{Identifier.key}}`
//!    component references. Whitespace inside the braces and around the dot
//!    is tolerated; identifiers and keys are kept verbatim.
//! 2. `substitute_variables` replaces `{name}` placeholders from a variable
//!    table and leaves unknown names untouched.
//!
//! Anything that does not lex as a reference or placeholder stays literal
//! text, so malformed braces never cause an error.

use super::value::Variables;

/// A piece of template text produced by the reference pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Reference {
        identifier: &'a str,
        key: &'a str,
    },
}

/// Split `text` into literals and component references.
///
/// Runs in linear time. A reference body never contains `{`, so when the
/// text between an opening `{{` and the next `}}` holds another brace, only
/// the `{{` ending at the last such brace can still open a reference.
pub fn scan_references(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("{{") {
        let open = cursor + offset;
        let inner_start = open + 2;
        let Some(close_offset) = text[inner_start..].find("}}") else {
            break;
        };
        let inner_end = inner_start + close_offset;
        let inner = &text[inner_start..inner_end];

        if let Some(brace) = inner.rfind('{') {
            // Retry from the brace pair that ends at `brace`
            cursor = inner_start + brace - 1;
            continue;
        }

        match parse_reference(inner) {
            Some((identifier, key)) => {
                if literal_start < open {
                    segments.push(Segment::Literal(&text[literal_start..open]));
                }
                segments.push(Segment::Reference { identifier, key });
                cursor = inner_end + 2;
                literal_start = cursor;
            }
            None => cursor = inner_end,
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(&text[literal_start..]));
    }
    segments
}

/// Parse the inside of `{{ ... }}` as `Identifier.key`.
fn parse_reference(inner: &str) -> Option<(&str, &str)> {
    let (identifier, key) = inner.split_once('.')?;
    let identifier = identifier.trim();
    let key = key.trim();
    if is_reference_part(identifier) && is_reference_part(key) {
        Some((identifier, key))
    } else {
        None
    }
}

fn is_reference_part(part: &str) -> bool {
    !part.is_empty()
        && !part
            .chars()
            .any(|c| c.is_whitespace() || c == '{' || c == '}')
}

fn is_variable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every `{name}` whose name is in `variables`.
pub fn substitute_variables(text: &str, variables: &Variables) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let name_len = after
            .char_indices()
            .find(|(_, c)| !is_variable_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        let name = &after[..name_len];

        let closed = after[name_len..].starts_with('}');
        match variables.get(name) {
            Some(value) if closed && !name.is_empty() => {
                output.push_str(&value.render());
                rest = &after[name_len + 1..];
            }
            _ => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

/// Whether a key's value is eligible for variable substitution.
pub fn is_template_key(key: &str) -> bool {
    key.ends_with("Template") || key.ends_with("template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference<'a>(identifier: &'a str, key: &'a str) -> Segment<'a> {
        Segment::Reference { identifier, key }
    }

    // ==================== Reference Pass Tests ====================

    #[test]
    fn test_scan_plain_text() {
        assert_eq!(scan_references("no refs"), vec![Segment::Literal("no refs")]);
    }

    #[test]
    fn test_scan_single_reference() {
        assert_eq!(scan_references("{{app.welcome}}"), vec![reference("app", "welcome")]);
    }

    #[test]
    fn test_scan_reference_with_surrounding_text() {
        assert_eq!(
            scan_references("Say {{app.welcome}} now"),
            vec![
                Segment::Literal("Say "),
                reference("app", "welcome"),
                Segment::Literal(" now"),
            ]
        );
    }

    #[test]
    fn test_scan_tolerates_whitespace() {
        assert_eq!(
            scan_references("{{ app . welcome }}"),
            vec![reference("app", "welcome")]
        );
    }

    #[test]
    fn test_scan_keeps_case() {
        assert_eq!(
            scan_references("{{App.WelcomeMessage}}"),
            vec![reference("App", "WelcomeMessage")]
        );
    }

    #[test]
    fn test_scan_key_may_contain_dots() {
        assert_eq!(
            scan_references("{{app.menu.file}}"),
            vec![reference("app", "menu.file")]
        );
    }

    #[test]
    fn test_scan_without_dot_is_literal() {
        assert_eq!(scan_references("{{name}}"), vec![Segment::Literal("{{name}}")]);
    }

    #[test]
    fn test_scan_unclosed_is_literal() {
        assert_eq!(
            scan_references("{{app.welcome"),
            vec![Segment::Literal("{{app.welcome")]
        );
    }

    #[test]
    fn test_scan_triple_brace() {
        assert_eq!(
            scan_references("{{{app.welcome}}"),
            vec![Segment::Literal("{"), reference("app", "welcome")]
        );
    }

    #[test]
    fn test_scan_nested_opening_braces() {
        assert_eq!(
            scan_references("{{ {{x {{app.welcome}}"),
            vec![Segment::Literal("{{ {{x "), reference("app", "welcome")]
        );
        assert_eq!(
            scan_references("{{a}b.c}} {{app.k}}"),
            vec![Segment::Literal("{{a}b.c}} "), reference("app", "k")]
        );
    }

    #[test]
    fn test_scan_long_run_of_opening_braces() {
        let text = format!("{}}}}}", "{".repeat(100_000));
        assert_eq!(scan_references(&text), vec![Segment::Literal(text.as_str())]);

        let text = format!("{}app.welcome}}}}", "{".repeat(100_000));
        let segments = scan_references(&text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], reference("app", "welcome"));
    }

    #[test]
    fn test_scan_multiple_references() {
        assert_eq!(
            scan_references("{{a.x}}{{b.y}}"),
            vec![reference("a", "x"), reference("b", "y")]
        );
    }

    // ==================== Variable Pass Tests ====================

    #[test]
    fn test_substitute_known_variable() {
        let vars = Variables::new().with("name", "Ada");
        assert_eq!(substitute_variables("Hi {name}!", &vars), "Hi Ada!");
    }

    #[test]
    fn test_substitute_unknown_left_verbatim() {
        let vars = Variables::new();
        assert_eq!(substitute_variables("Hi {name}!", &vars), "Hi {name}!");
    }

    #[test]
    fn test_substitute_stray_braces() {
        let vars = Variables::new().with("a", "1");
        assert_eq!(substitute_variables("{ a } {} { {a", &vars), "{ a } {} { {a");
        assert_eq!(substitute_variables("}{a}{", &vars), "}1{");
    }

    #[test]
    fn test_substitute_inside_double_braces() {
        let vars = Variables::new().with("name", "Ada");
        assert_eq!(substitute_variables("{{name}}", &vars), "{Ada}");
    }

    #[test]
    fn test_substitute_repeated() {
        let vars = Variables::new().with("x", 7i64);
        assert_eq!(substitute_variables("{x}+{x}", &vars), "7+7");
    }

    #[test]
    fn test_substitute_multibyte_text() {
        let vars = Variables::new().with("nombre", "Añá");
        assert_eq!(substitute_variables("¡Hola {nombre}! {ñ}", &vars), "¡Hola Añá! {ñ}");
    }

    // ==================== Template Key Tests ====================

    #[test]
    fn test_is_template_key() {
        assert!(is_template_key("greetingTemplate"));
        assert!(is_template_key("greeting_template"));
        assert!(!is_template_key("greeting"));
        assert!(!is_template_key("TemplateGreeting"));
        assert!(!is_template_key("greetingTEMPLATE"));
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_brace_free_text_is_unchanged(text in "[^{}]*") {
            let vars = Variables::new().with("a", "1");
            prop_assert_eq!(substitute_variables(&text, &vars), text.clone());
            let segments = scan_references(&text);
            if text.is_empty() {
                prop_assert!(segments.is_empty());
            } else {
                prop_assert_eq!(segments, vec![Segment::Literal(text.as_str())]);
            }
        }

        #[test]
        fn prop_empty_table_is_identity(text in ".*") {
            prop_assert_eq!(substitute_variables(&text, &Variables::new()), text.clone());
        }
    }
}
