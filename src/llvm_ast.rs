// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.
//
// The shapes the LLVM front end hands to the type lifter. Parsing LLVM text or
// bitcode happens upstream; these types only mirror the parsed module surface the
// lifter consumes.

use std::fmt::{Display, Formatter, Result};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// The name of a type declared at module level.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Ident(Rc<str>);

impl Ident {
    pub fn new(name: &str) -> Ident {
        Ident(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum FloatType {
    Half,
    Float,
    Double,
    Fp128,
    X86Fp80,
    PpcFp128,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum PrimType {
    Label,
    Void,
    Integer(u32),
    FloatType(FloatType),
    X86mmx,
    Metadata,
}

/// A type as it appears in the parsed module, before lifting.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum RawType {
    Prim(PrimType),
    Alias(Ident),
    Array(u64, Box<RawType>),
    /// Return type, argument types, and whether the function is variadic.
    FunTy(Box<RawType>, Vec<RawType>, bool),
    PtrTo(Box<RawType>),
    Struct(Vec<RawType>),
    PackedStruct(Vec<RawType>),
    Vector(u64, Box<RawType>),
    Opaque,
}

/// A named type declaration from the module.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub decl_type: RawType,
}

/// An unnamed metadata value attached to the module. Only stored and looked up at
/// this layer.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum ValMd {
    String(String),
    Node(Vec<Option<ValMd>>),
}

impl Display for FloatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            FloatType::Half => "half",
            FloatType::Float => "float",
            FloatType::Double => "double",
            FloatType::Fp128 => "fp128",
            FloatType::X86Fp80 => "x86_fp80",
            FloatType::PpcFp128 => "ppc_fp128",
        };
        name.fmt(f)
    }
}

impl Display for PrimType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            PrimType::Label => "label".fmt(f),
            PrimType::Void => "void".fmt(f),
            PrimType::Integer(width) => write!(f, "i{width}"),
            PrimType::FloatType(ft) => ft.fmt(f),
            PrimType::X86mmx => "x86_mmx".fmt(f),
            PrimType::Metadata => "metadata".fmt(f),
        }
    }
}

impl Display for RawType {
    /// Renders the type in LLVM assembly syntax, for error reports.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            RawType::Prim(pt) => pt.fmt(f),
            RawType::Alias(id) => id.fmt(f),
            RawType::Array(n, elem) => write!(f, "[{n} x {elem}]"),
            RawType::FunTy(ret, args, var_args) => {
                write!(f, "{ret} (")?;
                write_comma_separated(f, args)?;
                if *var_args {
                    if args.is_empty() {
                        write!(f, "...")?;
                    } else {
                        write!(f, ", ...")?;
                    }
                }
                write!(f, ")")
            }
            RawType::PtrTo(pointee) => write!(f, "{pointee}*"),
            RawType::Struct(fields) => {
                write!(f, "{{ ")?;
                write_comma_separated(f, fields)?;
                write!(f, " }}")
            }
            RawType::PackedStruct(fields) => {
                write!(f, "<{{ ")?;
                write_comma_separated(f, fields)?;
                write!(f, " }}>")
            }
            RawType::Vector(n, elem) => write!(f, "<{n} x {elem}>"),
            RawType::Opaque => "opaque".fmt(f),
        }
    }
}

fn write_comma_separated(f: &mut Formatter<'_>, types: &[RawType]) -> Result {
    for (i, tp) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        tp.fmt(f)?;
    }
    Ok(())
}
