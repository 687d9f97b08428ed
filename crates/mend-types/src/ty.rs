use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn from_keyword(keyword: &str) -> Option<PrimitiveType> {
        Some(match keyword {
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "short" => PrimitiveType::Short,
            "char" => PrimitiveType::Char,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Fully qualified name of the wrapper class.
    pub fn box_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_box_name(name: &str) -> Option<PrimitiveType> {
        PrimitiveType::ALL.into_iter().find(|p| p.box_name() == name)
    }

    pub fn is_numeric(self) -> bool {
        self != PrimitiveType::Boolean
    }

    fn numeric_rank(self) -> u8 {
        match self {
            PrimitiveType::Boolean => 0,
            PrimitiveType::Byte => 1,
            PrimitiveType::Short | PrimitiveType::Char => 2,
            PrimitiveType::Int => 3,
            PrimitiveType::Long => 4,
            PrimitiveType::Float => 5,
            PrimitiveType::Double => 6,
        }
    }

    /// Identity or widening primitive conversion (JLS 5.1.2).
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        if self == target {
            return true;
        }
        if !self.is_numeric() || !target.is_numeric() {
            return false;
        }
        match (self, target) {
            (_, PrimitiveType::Char) => false,
            (PrimitiveType::Char, PrimitiveType::Short) => false,
            _ => self.numeric_rank() < target.numeric_rank(),
        }
    }

    /// Result type of binary numeric promotion.
    pub fn promote(self, other: PrimitiveType) -> PrimitiveType {
        let widest = if self.numeric_rank() >= other.numeric_rank() {
            self
        } else {
            other
        };
        if widest.numeric_rank() < PrimitiveType::Int.numeric_rank() {
            PrimitiveType::Int
        } else {
            widest
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    /// Fully qualified name with `.` between nesting levels, or the simple name when the
    /// reference could not be resolved.
    pub name: String,
    pub args: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    TypeVar(String),
    Wildcard(WildcardBound),
    /// The type of the `null` literal.
    Null,
    Unknown,
}

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";

impl Type {
    pub fn class(name: impl Into<String>, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            name: name.into(),
            args,
        })
    }

    pub fn object() -> Type {
        Type::class(OBJECT, Vec::new())
    }

    pub fn string() -> Type {
        Type::class(STRING, Vec::new())
    }

    pub fn array_of(elem: Type) -> Type {
        Type::Array(Box::new(elem))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Class(_) | Type::Array(_) | Type::TypeVar(_) | Type::Null | Type::Wildcard(_)
        )
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Boolean))
            || self.class_name() == Some("java.lang.Boolean")
    }

    pub fn is_string(&self) -> bool {
        self.class_name() == Some(STRING)
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(class) => Some(&class.name),
            _ => None,
        }
    }

    pub fn type_args(&self) -> &[Type] {
        match self {
            Type::Class(class) => &class.args,
            _ => &[],
        }
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// `true` if the type mentions nothing unresolved.
    pub fn is_known(&self) -> bool {
        match self {
            Type::Unknown => false,
            Type::Class(class) => class.args.iter().all(Type::is_known),
            Type::Array(elem) => elem.is_known(),
            Type::Wildcard(WildcardBound::Extends(b) | WildcardBound::Super(b)) => b.is_known(),
            _ => true,
        }
    }

    /// Type arguments dropped, type variables replaced by `Object`.
    pub fn erasure(&self) -> Type {
        match self {
            Type::Class(class) => Type::class(class.name.clone(), Vec::new()),
            Type::Array(elem) => Type::array_of(elem.erasure()),
            Type::TypeVar(_) | Type::Wildcard(_) => Type::object(),
            other => other.clone(),
        }
    }

    /// The type a value of this type is read as: wildcards become their upper bound.
    pub fn upper_bound(&self) -> Type {
        match self {
            Type::Wildcard(WildcardBound::Extends(bound)) => bound.upper_bound(),
            Type::Wildcard(_) => Type::object(),
            other => other.clone(),
        }
    }

    /// Boxed counterpart of a primitive, or the type itself.
    pub fn boxed(&self) -> Type {
        match self {
            Type::Primitive(p) => Type::class(p.box_name(), Vec::new()),
            other => other.clone(),
        }
    }

    /// Primitive counterpart of a wrapper class, or the type itself.
    pub fn unboxed(&self) -> Type {
        match self
            .class_name()
            .and_then(PrimitiveType::from_box_name)
        {
            Some(p) => Type::Primitive(p),
            None => self.clone(),
        }
    }

    /// Java source text of the default value (`0`, `false`, `null`); `None` for `void`.
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Type::Void => None,
            Type::Primitive(PrimitiveType::Boolean) => Some("false"),
            Type::Primitive(_) => Some("0"),
            _ => Some("null"),
        }
    }

    /// Source form with simple class names (`List<String>`, `? extends Number`).
    pub fn simple_display(&self) -> String {
        let mut out = String::new();
        write_type(&mut out, self, true);
        out
    }

    /// Every class name mentioned, outermost first.
    pub fn class_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_class_names(self, &mut out);
        out
    }

    /// Replace class names through `resolve`: `Some(Type::Class)` renames the class while
    /// keeping its type arguments, any other `Some` replaces the reference (type variables).
    pub fn resolve_names(&self, resolve: &impl Fn(&str) -> Option<Type>) -> Type {
        match self {
            Type::Class(class) => {
                let args: Vec<Type> = class.args.iter().map(|a| a.resolve_names(resolve)).collect();
                match resolve(&class.name) {
                    Some(Type::Class(resolved)) => Type::class(resolved.name, args),
                    Some(other) => other,
                    None => Type::class(class.name.clone(), args),
                }
            }
            Type::Array(elem) => Type::array_of(elem.resolve_names(resolve)),
            Type::Wildcard(WildcardBound::Extends(bound)) => {
                Type::Wildcard(WildcardBound::Extends(Box::new(bound.resolve_names(resolve))))
            }
            Type::Wildcard(WildcardBound::Super(bound)) => {
                Type::Wildcard(WildcardBound::Super(Box::new(bound.resolve_names(resolve))))
            }
            other => other.clone(),
        }
    }
}

/// The last segment of a dotted name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Everything before the last `.`, empty for unqualified names.
pub fn qualifier(qualified: &str) -> &str {
    qualified.rsplit_once('.').map(|(q, _)| q).unwrap_or("")
}

fn collect_class_names<'a>(ty: &'a Type, out: &mut Vec<&'a str>) {
    match ty {
        Type::Class(class) => {
            out.push(&class.name);
            for arg in &class.args {
                collect_class_names(arg, out);
            }
        }
        Type::Array(elem) => collect_class_names(elem, out),
        Type::Wildcard(WildcardBound::Extends(b) | WildcardBound::Super(b)) => {
            collect_class_names(b, out)
        }
        _ => {}
    }
}

fn write_type(out: &mut String, ty: &Type, simple: bool) {
    match ty {
        Type::Void => out.push_str("void"),
        Type::Primitive(p) => out.push_str(p.keyword()),
        Type::Class(class) => {
            if simple {
                out.push_str(simple_name(&class.name));
            } else {
                out.push_str(&class.name);
            }
            if !class.args.is_empty() {
                out.push('<');
                for (idx, arg) in class.args.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    write_type(out, arg, simple);
                }
                out.push('>');
            }
        }
        Type::Array(elem) => {
            write_type(out, elem, simple);
            out.push_str("[]");
        }
        Type::TypeVar(name) => out.push_str(name),
        Type::Wildcard(WildcardBound::Unbounded) => out.push('?'),
        Type::Wildcard(WildcardBound::Extends(bound)) => {
            out.push_str("? extends ");
            write_type(out, bound, simple);
        }
        Type::Wildcard(WildcardBound::Super(bound)) => {
            out.push_str("? super ");
            write_type(out, bound, simple);
        }
        Type::Null => out.push_str("null"),
        Type::Unknown => out.push_str("Object"),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_type(&mut out, self, false);
        f.write_str(&out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type")]
    Empty,
    #[error("unexpected `{found}` at offset {offset} in `{text}`")]
    Unexpected {
        text: String,
        offset: usize,
        found: char,
    },
    #[error("unterminated type arguments in `{0}`")]
    Unterminated(String),
}

impl FromStr for Type {
    type Err = TypeParseError;

    fn from_str(text: &str) -> Result<Type, TypeParseError> {
        parse_type(text)
    }
}

/// Parse Java type syntax. Class names are kept as written; see [`Type::resolve_names`].
pub fn parse_type(text: &str) -> Result<Type, TypeParseError> {
    let mut parser = TypeTextParser { text, pos: 0 };
    parser.skip_ws();
    if parser.pos >= text.len() {
        return Err(TypeParseError::Empty);
    }
    let ty = parser.parse()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(ty),
        Some(found) => Err(TypeParseError::Unexpected {
            text: text.to_string(),
            offset: parser.pos,
            found,
        }),
    }
}

struct TypeTextParser<'a> {
    text: &'a str,
    pos: usize,
}

impl TypeTextParser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.text[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> TypeParseError {
        match self.peek() {
            Some(found) => TypeParseError::Unexpected {
                text: self.text.to_string(),
                offset: self.pos,
                found,
            },
            None => TypeParseError::Unterminated(self.text.to_string()),
        }
    }

    fn keyword(&mut self, kw: &str) -> bool {
        let rest = &self.text[self.pos..];
        if !rest.starts_with(kw) {
            return false;
        }
        let follows_ident = rest[kw.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if !follows_ident {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&str> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.pos += self.peek().map(char::len_utf8).unwrap_or(1);
        }
        (self.pos > start).then(|| &self.text[start..self.pos])
    }

    fn parse(&mut self) -> Result<Type, TypeParseError> {
        self.skip_ws();
        if self.eat("?") {
            self.skip_ws();
            if self.keyword("extends") {
                let bound = self.parse()?;
                return Ok(Type::Wildcard(WildcardBound::Extends(Box::new(bound))));
            }
            if self.keyword("super") {
                let bound = self.parse()?;
                return Ok(Type::Wildcard(WildcardBound::Super(Box::new(bound))));
            }
            return Ok(Type::Wildcard(WildcardBound::Unbounded));
        }

        let mut name = String::new();
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            let Some(part) = self.ident() else {
                return Err(self.unexpected());
            };
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(part);
            self.skip_ws();
            if self.eat("<") {
                args = self.parse_args()?;
                self.skip_ws();
            }
            if self.peek() == Some('.') && !self.text[self.pos..].starts_with("...") {
                self.pos += 1;
                continue;
            }
            break;
        }

        let mut ty = match name.as_str() {
            "void" => Type::Void,
            "null" => Type::Null,
            other => match PrimitiveType::from_keyword(other) {
                Some(p) => Type::Primitive(p),
                None => Type::class(name, args),
            },
        };

        loop {
            self.skip_ws();
            if self.eat("[") {
                self.skip_ws();
                if !self.eat("]") {
                    return Err(self.unexpected());
                }
                ty = Type::array_of(ty);
            } else if self.eat("...") {
                ty = Type::array_of(ty);
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn parse_args(&mut self) -> Result<Vec<Type>, TypeParseError> {
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(">") {
                return Ok(args);
            }
            args.push(self.parse()?);
            self.skip_ws();
            if self.eat(",") {
                continue;
            }
            if self.eat(">") {
                return Ok(args);
            }
            return Err(self.unexpected());
        }
    }
}
