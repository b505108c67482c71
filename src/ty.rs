//! Semantic type model.
//!
//! `Ty` is the canonical representation of Go types that the unifier,
//! collector, and sorter operate on. Ground types never contain `Var`;
//! `Var` appears only in template patterns lifted from case clauses whose
//! type expression mentions an all-uppercase identifier.
//!
//! `Display` produces the canonical source form (matching `go/types`
//! conventions) and is the deduplication key for generated clauses.

use go_syntax::ast::{self, AstArena, Interner, SignatureId, TypeId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Named (possibly package-qualified) type, e.g. `io.Reader`, `xxx`.
    Named(String),
    Basic(BasicKind),
    Pointer(Box<Ty>),
    Slice(Box<Ty>),
    Array(u64, Box<Ty>),
    Map(Box<Ty>, Box<Ty>),
    Chan(ChanDir, Box<Ty>),
    Func(FuncTy),
    Struct(Vec<StructField>),
    /// Interface by its direct method list; the empty list is `interface{}`.
    Interface(Vec<Method>),
    /// Template type variable. Never present in ground types.
    Var(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Byte,
    Rune,
}

impl BasicKind {
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => BasicKind::Bool,
            "int" => BasicKind::Int,
            "int8" => BasicKind::Int8,
            "int16" => BasicKind::Int16,
            "int32" => BasicKind::Int32,
            "int64" => BasicKind::Int64,
            "uint" => BasicKind::Uint,
            "uint8" => BasicKind::Uint8,
            "uint16" => BasicKind::Uint16,
            "uint32" => BasicKind::Uint32,
            "uint64" => BasicKind::Uint64,
            "uintptr" => BasicKind::Uintptr,
            "float32" => BasicKind::Float32,
            "float64" => BasicKind::Float64,
            "complex64" => BasicKind::Complex64,
            "complex128" => BasicKind::Complex128,
            "string" => BasicKind::String,
            "byte" => BasicKind::Byte,
            "rune" => BasicKind::Rune,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FuncTy {
    pub params: Vec<Ty>,
    pub results: Vec<Ty>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructField {
    /// Embedded fields carry their type's base name.
    pub name: String,
    pub ty: Ty,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    pub name: String,
    pub sig: FuncTy,
}

impl Ty {
    /// True if `predicate` holds for this type or any nested child.
    pub fn any(&self, predicate: &impl Fn(&Ty) -> bool) -> bool {
        if predicate(self) {
            return true;
        }
        match self {
            Ty::Pointer(elem) | Ty::Slice(elem) | Ty::Array(_, elem) | Ty::Chan(_, elem) => {
                elem.any(predicate)
            }
            Ty::Map(key, val) => key.any(predicate) || val.any(predicate),
            Ty::Func(sig) => {
                sig.params.iter().any(|t| t.any(predicate))
                    || sig.results.iter().any(|t| t.any(predicate))
            }
            Ty::Struct(fields) => fields.iter().any(|f| f.ty.any(predicate)),
            Ty::Interface(methods) => methods.iter().any(|m| {
                m.sig.params.iter().any(|t| t.any(predicate))
                    || m.sig.results.iter().any(|t| t.any(predicate))
            }),
            Ty::Named(_) | Ty::Basic(_) | Ty::Var(_) => false,
        }
    }

    /// A ground type contains no template variables.
    pub fn is_ground(&self) -> bool {
        !self.any(&|t| matches!(t, Ty::Var(_)))
    }

    pub fn is_empty_interface(&self) -> bool {
        matches!(self, Ty::Interface(methods) if methods.is_empty())
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Ty::Interface(_))
    }
}

/// Syntactic type-variable criterion: nonempty, uppercase ASCII letters and
/// digits only.
pub fn is_type_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

// =============================================================================
// Lifting AST type expressions
// =============================================================================

/// Lift a syntactic type expression to the semantic model.
///
/// Bare identifiers matching the variable criterion become `Var`;
/// predeclared basic names become `Basic`; `any` becomes the empty
/// interface; anything else is `Named`.
pub fn lift(arena: &AstArena, interner: &Interner, id: TypeId) -> Ty {
    match arena.types[id] {
        ast::Type::Named { pkg, name } => {
            let name = interner.resolve(name);
            match pkg {
                Some(pkg) => Ty::Named(format!("{}.{}", interner.resolve(pkg), name)),
                None => {
                    if is_type_var_name(name) {
                        Ty::Var(name.to_string())
                    } else if name == "any" {
                        Ty::Interface(Vec::new())
                    } else if let Some(kind) = BasicKind::from_name(name) {
                        Ty::Basic(kind)
                    } else {
                        Ty::Named(name.to_string())
                    }
                }
            }
        }
        ast::Type::Pointer(elem) => Ty::Pointer(Box::new(lift(arena, interner, elem))),
        ast::Type::Slice(elem) => Ty::Slice(Box::new(lift(arena, interner, elem))),
        ast::Type::Array { len, elem } => {
            let n = match len {
                ast::ArrayLen::Expr(e) => const_len(arena, interner, e).unwrap_or(0),
                ast::ArrayLen::Ellipsis => 0,
            };
            Ty::Array(n, Box::new(lift(arena, interner, elem)))
        }
        ast::Type::Map { key, val } => Ty::Map(
            Box::new(lift(arena, interner, key)),
            Box::new(lift(arena, interner, val)),
        ),
        ast::Type::Chan { dir, elem } => {
            let dir = match dir {
                ast::ChanDir::Both => ChanDir::Both,
                ast::ChanDir::Send => ChanDir::Send,
                ast::ChanDir::Recv => ChanDir::Recv,
            };
            Ty::Chan(dir, Box::new(lift(arena, interner, elem)))
        }
        ast::Type::Struct { fields } => {
            let fields = arena
                .fields_list(fields)
                .iter()
                .map(|&fid| lift_struct_field(arena, interner, fid))
                .collect::<Vec<_>>()
                .concat();
            Ty::Struct(fields)
        }
        ast::Type::Interface { elems } => {
            let mut methods = Vec::new();
            for &elem in arena.iface_elems(elems) {
                if let ast::InterfaceElem::Method { name, sig } = elem {
                    methods.push(Method {
                        name: interner.resolve(name).to_string(),
                        sig: lift_signature(arena, interner, sig),
                    });
                }
            }
            Ty::Interface(methods)
        }
        ast::Type::Func(sig) => Ty::Func(lift_signature(arena, interner, sig)),
        ast::Type::Paren(inner) => lift(arena, interner, inner),
    }
}

fn lift_struct_field(arena: &AstArena, interner: &Interner, id: ast::FieldId) -> Vec<StructField> {
    let field = arena.fields[id];
    let ty = lift(arena, interner, field.typ);
    let tag = field.tag.map(|t| interner.resolve(t).to_string());

    let names = arena.ident_names(field.names);
    if names.is_empty() {
        // Embedded field: named after the base type.
        let name = embedded_name(&ty).unwrap_or_default();
        return vec![StructField { name, ty, tag }];
    }
    names
        .iter()
        .map(|n| StructField {
            name: interner.resolve(n.sym).to_string(),
            ty: ty.clone(),
            tag: tag.clone(),
        })
        .collect()
}

fn embedded_name(ty: &Ty) -> Option<String> {
    match ty {
        Ty::Named(name) => Some(name.rsplit('.').next().unwrap_or(name).to_string()),
        Ty::Basic(kind) => Some(kind.name().to_string()),
        Ty::Pointer(elem) => embedded_name(elem),
        Ty::Var(name) => Some(name.clone()),
        _ => None,
    }
}

pub fn lift_signature(arena: &AstArena, interner: &Interner, id: SignatureId) -> FuncTy {
    let sig = arena.signatures[id];
    let mut params = Vec::new();
    let mut variadic = false;
    for &fid in arena.fields_list(sig.params) {
        let field = arena.fields[fid];
        let mut ty = lift(arena, interner, field.typ);
        // A `...T` parameter has static type `[]T`.
        if field.variadic {
            variadic = true;
            ty = Ty::Slice(Box::new(ty));
        }
        let count = arena.ident_names(field.names).len().max(1);
        for _ in 0..count {
            params.push(ty.clone());
        }
    }
    let mut results = Vec::new();
    for &fid in arena.fields_list(sig.results) {
        let field = arena.fields[fid];
        let ty = lift(arena, interner, field.typ);
        let count = arena.ident_names(field.names).len().max(1);
        for _ in 0..count {
            results.push(ty.clone());
        }
    }
    FuncTy {
        params,
        results,
        variadic,
    }
}

fn const_len(arena: &AstArena, interner: &Interner, id: ast::ExprId) -> Option<u64> {
    match arena.exprs[id] {
        ast::Expr::BasicLit(lit) if lit.kind == ast::BasicLitKind::Int => {
            let text = interner.resolve(lit.text).replace('_', "");
            if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                u64::from_str_radix(hex, 16).ok()
            } else {
                text.parse().ok()
            }
        }
        _ => None,
    }
}

// =============================================================================
// Canonical printing
// =============================================================================

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Named(name) => write!(f, "{name}"),
            Ty::Basic(kind) => write!(f, "{}", kind.name()),
            Ty::Pointer(elem) => write!(f, "*{elem}"),
            Ty::Slice(elem) => write!(f, "[]{elem}"),
            Ty::Array(n, elem) => write!(f, "[{n}]{elem}"),
            Ty::Map(key, val) => write!(f, "map[{key}]{val}"),
            Ty::Chan(dir, elem) => match dir {
                ChanDir::Both => {
                    if matches!(**elem, Ty::Chan(ChanDir::Recv, _)) {
                        write!(f, "chan ({elem})")
                    } else {
                        write!(f, "chan {elem}")
                    }
                }
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Ty::Func(sig) => {
                write!(f, "func")?;
                write_func_ty(f, sig)
            }
            Ty::Struct(fields) => {
                write!(f, "struct{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                    if let Some(tag) = &field.tag {
                        write!(f, " {tag}")?;
                    }
                }
                write!(f, "}}")
            }
            Ty::Interface(methods) => {
                write!(f, "interface{{")?;
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", method.name)?;
                    write_func_ty(f, &method.sig)?;
                }
                write!(f, "}}")
            }
            Ty::Var(name) => write!(f, "{name}"),
        }
    }
}

fn write_func_ty(f: &mut fmt::Formatter<'_>, sig: &FuncTy) -> fmt::Result {
    write!(f, "(")?;
    for (i, param) in sig.params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if sig.variadic && i == sig.params.len() - 1 {
            match param {
                Ty::Slice(elem) => write!(f, "...{elem}")?,
                other => write!(f, "...{other}")?,
            }
        } else {
            write!(f, "{param}")?;
        }
    }
    write!(f, ")")?;
    match sig.results.as_slice() {
        [] => Ok(()),
        [single] => write!(f, " {single}"),
        results => {
            write!(f, " (")?;
            for (i, result) in results.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{result}")?;
            }
            write!(f, ")")
        }
    }
}
