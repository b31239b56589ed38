//! Script declaration scanner
//!
//! Finds the public `class` or `struct` a script file declares under its
//! own file stem, and the namespace enclosing it. This is a lexical scan,
//! not a parser: comments and string literals are blanked out first so
//! braces and keywords inside them are ignored, then namespace bodies are
//! located by brace matching.

use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bpublic\s+(?:(?:static|sealed|abstract|partial|unsafe|readonly|ref|new)\s+)*(?:class|struct)\s+([A-Za-z_]\w*)",
    )
    .expect("valid regex")
});

static NAMESPACE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnamespace\s+([A-Za-z_][\w.]*)\s*([;{])").expect("valid regex")
});

/// A type declaration found in a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Enclosing namespace, dotted; empty for the global namespace
    pub namespace: String,
    /// Simple type name
    pub name: String,
}

/// Find the public type named `type_name` declared in `source`
pub fn find_declaration(source: &str, type_name: &str) -> Option<Declaration> {
    let code = blank_comments_and_strings(source);
    let at = TYPE_DECL
        .captures_iter(&code)
        .filter_map(|c| c.get(1))
        .find(|m| m.as_str() == type_name)?
        .start();

    let mut parts: Vec<&str> = Vec::new();
    for caps in NAMESPACE_DECL.captures_iter(&code) {
        let (Some(name), Some(terminator)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if terminator.start() >= at {
            break;
        }
        if terminator.as_str() == ";" {
            // file-scoped: applies to the rest of the file
            parts.push(name.as_str());
        } else if matching_brace(&code, terminator.start()).map_or(true, |close| close > at) {
            parts.push(name.as_str());
        }
    }

    Some(Declaration {
        namespace: parts.join("."),
        name: type_name.to_string(),
    })
}

/// Index of the `}` closing the `{` at `open`
fn matching_brace(code: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in code.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    LineComment,
    BlockComment,
    Str,
    Verbatim,
    Char,
}

/// Replace comment and literal contents with spaces, keeping byte offsets
/// of everything else.
fn blank_comments_and_strings(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = Lex::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        let (emitted, advance, state_after) = match state {
            Lex::Code => match (b, next) {
                (b'/', Some(b'/')) => (b' ', 1, Lex::LineComment),
                (b'/', Some(b'*')) => (b' ', 2, Lex::BlockComment),
                (b'@', Some(b'"')) => (b' ', 2, Lex::Verbatim),
                (b'"', _) => (b' ', 1, Lex::Str),
                (b'\'', _) => (b' ', 1, Lex::Char),
                _ => (b, 1, Lex::Code),
            },
            Lex::LineComment if b == b'\n' => (b, 1, Lex::Code),
            Lex::BlockComment if b == b'*' && next == Some(b'/') => (b' ', 2, Lex::Code),
            Lex::Str | Lex::Char if b == b'\\' => (b' ', 2, state),
            Lex::Str if b == b'"' => (b' ', 1, Lex::Code),
            Lex::Char if b == b'\'' => (b' ', 1, Lex::Code),
            Lex::Verbatim if b == b'"' && next == Some(b'"') => (b' ', 2, Lex::Verbatim),
            Lex::Verbatim if b == b'"' => (b' ', 1, Lex::Code),
            _ if b == b'\n' => (b, 1, state),
            _ => (b' ', 1, state),
        };

        out.push(emitted);
        for k in 1..advance {
            if i + k < bytes.len() {
                out.push(if bytes[i + k] == b'\n' { b'\n' } else { b' ' });
            }
        }
        i += advance;
        state = state_after;
    }

    // every character is either kept whole or blanked byte by byte
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(ns: &str, name: &str) -> Option<Declaration> {
        Some(Declaration {
            namespace: ns.to_string(),
            name: name.to_string(),
        })
    }

    #[test]
    fn global_namespace() {
        assert_eq!(
            find_declaration("using System;\npublic class Foo : Base {}\n", "Foo"),
            decl("", "Foo")
        );
    }

    #[test]
    fn block_scoped_namespace() {
        let src = "namespace Toolkit.Input\n{\n    public sealed class Foo\n    {\n    }\n}\n";
        assert_eq!(find_declaration(src, "Foo"), decl("Toolkit.Input", "Foo"));
    }

    #[test]
    fn file_scoped_namespace() {
        let src = "namespace Toolkit;\n\npublic struct Foo { }\n";
        assert_eq!(find_declaration(src, "Foo"), decl("Toolkit", "Foo"));
    }

    #[test]
    fn nested_namespaces_join() {
        let src = "namespace A {\n  namespace B {\n    public class Foo {}\n  }\n}\n";
        assert_eq!(find_declaration(src, "Foo"), decl("A.B", "Foo"));
    }

    #[test]
    fn closed_namespace_does_not_apply() {
        let src = "namespace A { class Helper {} }\npublic class Foo {}\n";
        assert_eq!(find_declaration(src, "Foo"), decl("", "Foo"));
    }

    #[test]
    fn only_the_named_type_counts() {
        let src = "namespace N {\n public class Other {}\n public class Foo {}\n}\n";
        assert_eq!(find_declaration(src, "Foo"), decl("N", "Foo"));
        assert_eq!(find_declaration(src, "Missing"), None);
    }

    #[test]
    fn non_public_types_are_ignored() {
        assert_eq!(find_declaration("internal class Foo {}", "Foo"), None);
        assert_eq!(find_declaration("class Foo {}", "Foo"), None);
        // FooBar is not Foo
        assert_eq!(find_declaration("public class FooBar {}", "Foo"), None);
    }

    #[test]
    fn modifiers_are_allowed() {
        assert_eq!(
            find_declaration("public static partial class Foo {}", "Foo"),
            decl("", "Foo")
        );
        assert_eq!(
            find_declaration("public readonly struct Foo {}", "Foo"),
            decl("", "Foo")
        );
    }

    #[test]
    fn comments_and_strings_are_ignored() {
        let src = concat!(
            "// public class Foo {}\n",
            "/* namespace Wrong { */\n",
            "namespace Right {\n",
            "  public class Foo {\n",
            "    string s = \"}\";\n",
            "    string v = @\"a \"\"}\"\" b\";\n",
            "    char c = '}';\n",
            "  }\n",
            "}\n",
        );
        assert_eq!(find_declaration(src, "Foo"), decl("Right", "Foo"));
    }

    #[test]
    fn brace_in_string_does_not_close_namespace() {
        let src = "namespace N {\n  class A { string s = \"}}\"; }\n  public class Foo {}\n}\n";
        assert_eq!(find_declaration(src, "Foo"), decl("N", "Foo"));
    }

    #[test]
    fn blanking_keeps_offsets() {
        let src = "a // x\nb /* y */ c \"z\" d";
        let out = blank_comments_and_strings(src);
        assert_eq!(out.len(), src.len());
        assert_eq!(out.find('b'), src.find('b'));
        assert_eq!(out.find('d'), src.find('d'));
        assert!(!out.contains('x'));
        assert!(!out.contains('z'));
    }
}
