//! Variable-name guessing for generated parameters, locals and accessors.

use mend_syntax::ast::Expr;
use mend_types::{simple_name, PrimitiveType, Type};

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false",
    "final", "finally", "float", "for", "goto", "if", "implements", "import", "instanceof",
    "int", "interface", "long", "native", "new", "null", "package", "private", "protected",
    "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized",
    "this", "throw", "throws", "transient", "true", "try", "void", "volatile", "while",
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// `true` for `SOME_CONSTANT`-style names.
pub fn is_constant_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// `MAX_VALUE` → `maxValue`.
pub fn camel_case_constant(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (idx, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
        let lower = part.to_ascii_lowercase();
        if idx == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&capitalize(&lower));
        }
    }
    out
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn decapitalize(name: &str) -> String {
    // `URL` stays `url`, `URLConnection` becomes `urlConnection`.
    let upper_run = name.chars().take_while(char::is_ascii_uppercase).count();
    if upper_run > 1 {
        let split = if upper_run == name.len() {
            upper_run
        } else {
            upper_run - 1
        };
        return format!("{}{}", name[..split].to_ascii_lowercase(), &name[split..]);
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A base name derived from the expression itself: variable and field names, getter
/// calls, camel-cased constants.
pub fn name_from_expression(expr: &Expr) -> Option<String> {
    let name = match expr.unparenthesized() {
        Expr::Name(name) => name.name.clone(),
        Expr::FieldAccess(access) => access.name.clone(),
        Expr::Call(call) => {
            let stripped = ["get", "is", "to"].iter().find_map(|prefix| {
                call.name
                    .strip_prefix(prefix)
                    .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
            })?;
            decapitalize(stripped)
        }
        Expr::Cast(cast) => return name_from_expression(&cast.expr),
        _ => return None,
    };
    if is_constant_name(&name) {
        return Some(camel_case_constant(&name));
    }
    Some(name)
}

/// A base name derived from a type: the decapitalized simple name, the first letter of a
/// primitive keyword, plural for arrays.
pub fn name_from_type(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => primitive_name(*p).to_string(),
        Type::Array(elem) => {
            let base = name_from_type(elem);
            if elem.is_primitive() {
                format!("{base}s")
            } else {
                pluralize(&base)
            }
        }
        Type::Class(class) => decapitalize(simple_name(&class.name)),
        Type::TypeVar(name) => decapitalize(name),
        Type::Wildcard(_) | Type::Null | Type::Unknown | Type::Void => "object".to_string(),
    }
}

fn primitive_name(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Boolean => "b",
        PrimitiveType::Byte => "b",
        PrimitiveType::Short => "s",
        PrimitiveType::Char => "c",
        PrimitiveType::Int => "i",
        PrimitiveType::Long => "l",
        PrimitiveType::Float => "f",
        PrimitiveType::Double => "d",
    }
}

fn pluralize(name: &str) -> String {
    if name.ends_with('s') || name.ends_with('x') {
        format!("{name}es")
    } else if let Some(stem) = name.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{name}s")
    }
}

/// Guess a parameter name for an argument: from the expression when possible, else from
/// its type.
pub fn guess_argument_name(expr: &Expr, ty: &Type) -> String {
    let base = name_from_expression(expr).unwrap_or_else(|| name_from_type(ty));
    avoid_keyword(base)
}

pub fn avoid_keyword(name: String) -> String {
    if is_keyword(&name) {
        format!("{name}1")
    } else {
        name
    }
}

/// Suffix style used when a guessed name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    /// `name2`, `name3`, ... (generated parameters).
    FromTwo,
    /// `name1`, `name2`, ... (catch variables, locals).
    FromOne,
}

/// `base`, or `base` with the first numeric suffix not in `taken`.
pub fn unique_name(base: &str, taken: &[&str], suffix: Suffix) -> String {
    if !taken.contains(&base) {
        return base.to_string();
    }
    let start = match suffix {
        Suffix::FromTwo => 2,
        Suffix::FromOne => 1,
    };
    (start..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !taken.contains(&candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

/// Deduplicate a list of guessed names against each other and `taken`, in order.
pub fn unique_names(bases: &[String], taken: &[&str], suffix: Suffix) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(bases.len());
    for base in bases {
        let mut all: Vec<&str> = taken.to_vec();
        all.extend(out.iter().map(String::as_str));
        out.push(unique_name(base, &all, suffix));
    }
    out
}

/// Getter name for a field: `isActive` for `boolean`, `getCount` otherwise.
pub fn getter_name(field: &str, ty: &Type) -> String {
    let base = capitalize(field);
    if matches!(ty, Type::Primitive(PrimitiveType::Boolean)) {
        format!("is{base}")
    } else {
        format!("get{base}")
    }
}

pub fn setter_name(field: &str) -> String {
    format!("set{}", capitalize(field))
}
