/* Line classifier for the definition language.
 *
 * The language is strictly line oriented: every construct lives on one line,
 * optionally followed by a `//` comment. Classification is context free; the
 * parser decides what a kind means inside or outside a struct body. */

use regex::Regex;
use std::sync::LazyLock;

static MACRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#define\s+([A-Za-z_]\w*)\s+(\S.*?)\s*(?://.*)?$").unwrap());

static STRUCT_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*struct\s+([A-Za-z_]\w*)\s*\{\s*(?://.*)?$").unwrap());

static STRUCT_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\}\s*;\s*(?://.*)?$").unwrap());

static STRUCT_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*struct\s+([A-Za-z_]\w*)\s+([A-Za-z_]\w*)\s*(?:\[\s*(\w+)\s*\])?\s*;\s*(?://.*)?$")
        .unwrap()
});

static PRIMITIVE_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Za-z_]\w*)\s+([A-Za-z_]\w*)\s*(?:\[\s*(\w+)\s*\])?\s*(?:=\s*([^;\s]+))?\s*;\s*(?://.*)?$",
    )
    .unwrap()
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*//").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Macro {
        name: &'a str,
        value: &'a str,
    },
    StructOpen {
        name: &'a str,
    },
    StructEnd,
    /// `struct TYPE NAME;` or `struct TYPE NAME[SIZE];`
    StructDecl {
        struct_name: &'a str,
        name: &'a str,
        array_size: Option<&'a str>,
    },
    /// `TYPE NAME;`, `TYPE NAME[SIZE];` or `TYPE NAME = VALUE;`
    PrimitiveDecl {
        type_name: &'a str,
        name: &'a str,
        array_size: Option<&'a str>,
        initializer: Option<&'a str>,
    },
    Comment,
    Blank,
    Unrecognized,
}

pub fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if COMMENT_RE.is_match(line) {
        return Line::Comment;
    }
    if let Some(caps) = MACRO_RE.captures(line) {
        let (_, [name, value]) = caps.extract();
        return Line::Macro { name, value };
    }
    if let Some(caps) = STRUCT_OPEN_RE.captures(line) {
        let (_, [name]) = caps.extract();
        return Line::StructOpen { name };
    }
    if STRUCT_END_RE.is_match(line) {
        return Line::StructEnd;
    }
    if let Some(caps) = STRUCT_DECL_RE.captures(line) {
        return Line::StructDecl {
            struct_name: caps.get(1).map_or("", |m| m.as_str()),
            name: caps.get(2).map_or("", |m| m.as_str()),
            array_size: caps.get(3).map(|m| m.as_str()),
        };
    }
    if let Some(caps) = PRIMITIVE_DECL_RE.captures(line) {
        let type_name = caps.get(1).map_or("", |m| m.as_str());
        /* `struct X;` is a forward declaration, not a variable of type `struct` */
        if type_name == "struct" {
            return Line::Unrecognized;
        }
        return Line::PrimitiveDecl {
            type_name,
            name: caps.get(2).map_or("", |m| m.as_str()),
            array_size: caps.get(3).map(|m| m.as_str()),
            initializer: caps.get(4).map(|m| m.as_str()),
        };
    }
    Line::Unrecognized
}
