use mend_core::Span;
use serde::Serialize;

use crate::ast::{CompilationUnit, MemberDecl, TypeDecl};

/// A declaration summary suitable for printing as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineItem {
    pub kind: &'static str,
    pub name: String,
    pub range: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineItem>,
}

pub fn outline(unit: &CompilationUnit) -> Vec<OutlineItem> {
    unit.types.iter().map(type_item).collect()
}

fn type_item(ty: &TypeDecl) -> OutlineItem {
    let mut children: Vec<OutlineItem> = ty
        .enum_constants
        .iter()
        .map(|constant| OutlineItem {
            kind: "enum-constant",
            name: constant.name.clone(),
            range: constant.range,
            detail: None,
            children: Vec::new(),
        })
        .collect();

    for member in &ty.members {
        match member {
            MemberDecl::Field(field) => {
                children.extend(field.declarators.iter().map(|decl| OutlineItem {
                    kind: "field",
                    name: decl.name.clone(),
                    range: field.range,
                    detail: Some(field.ty.text.clone()),
                    children: Vec::new(),
                }));
            }
            MemberDecl::Method(method) => {
                let params: Vec<&str> = method.params.iter().map(|p| p.ty.text.as_str()).collect();
                let detail = match &method.return_ty {
                    Some(ret) => format!("({}) -> {}", params.join(", "), ret.text),
                    None => format!("({})", params.join(", ")),
                };
                children.push(OutlineItem {
                    kind: if method.is_constructor() { "constructor" } else { "method" },
                    name: method.name.clone(),
                    range: method.range,
                    detail: Some(detail),
                    children: Vec::new(),
                });
            }
            MemberDecl::Initializer(init) => children.push(OutlineItem {
                kind: "initializer",
                name: if init.is_static { "static".into() } else { String::new() },
                range: init.range,
                detail: None,
                children: Vec::new(),
            }),
            MemberDecl::Type(nested) => children.push(type_item(nested)),
        }
    }

    OutlineItem {
        kind: ty.kind.keyword(),
        name: ty.name.clone(),
        range: ty.range,
        detail: None,
        children,
    }
}
