//! Compact source rendering of expressions for proposal labels.
//!
//! Binary and `instanceof` operators are spaced; everything else is printed without
//! whitespace (`vec.get(0)`, `(float)x`, `new String[]{}`).

use crate::ast::{Expr, LambdaBody, LiteralKind};

pub fn flatten_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_list(out: &mut String, exprs: &[Expr]) {
    for (idx, expr) in exprs.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_expr(out, expr);
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Name(name) => out.push_str(&name.name),
        Expr::Literal(lit) => out.push_str(&lit.value),
        Expr::Call(call) => {
            if let Some(receiver) = &call.receiver {
                write_expr(out, receiver);
                out.push('.');
            }
            out.push_str(&call.name);
            out.push('(');
            write_list(out, &call.args);
            out.push(')');
        }
        Expr::FieldAccess(access) => {
            write_expr(out, &access.receiver);
            out.push('.');
            out.push_str(&access.name);
        }
        Expr::New(new) => {
            out.push_str("new ");
            out.push_str(&new.ty.text);
            out.push('(');
            write_list(out, &new.args);
            out.push(')');
            if new.body.is_some() {
                out.push_str("{...}");
            }
        }
        Expr::NewArray(array) => {
            out.push_str("new ");
            out.push_str(&array.elem_ty.text);
            for dim in &array.dims {
                out.push('[');
                if let Some(dim) = dim {
                    write_expr(out, dim);
                }
                out.push(']');
            }
            if let Some(init) = &array.init {
                out.push('{');
                write_list(out, &init.elements);
                out.push('}');
            }
        }
        Expr::ArrayInit(init) => {
            out.push('{');
            write_list(out, &init.elements);
            out.push('}');
        }
        Expr::Cast(cast) => {
            out.push('(');
            out.push_str(&cast.ty.text);
            out.push(')');
            write_expr(out, &cast.expr);
        }
        Expr::Paren(paren) => {
            out.push('(');
            write_expr(out, &paren.inner);
            out.push(')');
        }
        Expr::Assign(assign) => {
            write_expr(out, &assign.lhs);
            out.push_str(&assign.op);
            write_expr(out, &assign.rhs);
        }
        Expr::Binary(bin) => {
            write_expr(out, &bin.lhs);
            out.push(' ');
            out.push_str(bin.op.as_str());
            out.push(' ');
            write_expr(out, &bin.rhs);
        }
        Expr::Unary(unary) => {
            if unary.prefix {
                out.push_str(&unary.op);
                write_expr(out, &unary.operand);
            } else {
                write_expr(out, &unary.operand);
                out.push_str(&unary.op);
            }
        }
        Expr::Conditional(cond) => {
            write_expr(out, &cond.cond);
            out.push('?');
            write_expr(out, &cond.then_expr);
            out.push(':');
            write_expr(out, &cond.else_expr);
        }
        Expr::InstanceOf(inst) => {
            write_expr(out, &inst.expr);
            out.push_str(" instanceof ");
            out.push_str(&inst.ty.text);
        }
        Expr::This(_) => out.push_str("this"),
        Expr::Super(_) => out.push_str("super"),
        Expr::ArrayAccess(access) => {
            write_expr(out, &access.array);
            out.push('[');
            write_expr(out, &access.index);
            out.push(']');
        }
        Expr::Lambda(lambda) => {
            out.push('(');
            for (idx, param) in lambda.params.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                if let Some(ty) = &param.ty {
                    out.push_str(&ty.text);
                    out.push(' ');
                }
                out.push_str(&param.name);
            }
            out.push_str(") -> ");
            match &lambda.body {
                LambdaBody::Expr(body) => write_expr(out, body),
                LambdaBody::Block(_) => out.push_str("{...}"),
            }
        }
        Expr::MethodRef(mref) => {
            write_expr(out, &mref.target);
            out.push_str("::");
            out.push_str(&mref.name);
        }
        Expr::ClassLit(lit) => {
            out.push_str(&lit.ty.text);
            out.push_str(".class");
        }
        Expr::Missing(_) => {}
    }
}

/// The literal's Java type keyword, `String` for string literals and `null` for `null`.
pub fn literal_type_name(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Int => "int",
        LiteralKind::Long => "long",
        LiteralKind::Float => "float",
        LiteralKind::Double => "double",
        LiteralKind::Char => "char",
        LiteralKind::String => "String",
        LiteralKind::Bool => "boolean",
        LiteralKind::Null => "null",
    }
}
