// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

use crate::data_layout::StructInfo;
use crate::llvm_ast::{Ident, RawType};

/// The lifted, symbolic form of an LLVM type.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum SymType {
    /// A type with a concrete in-memory representation.
    Mem(MemType),
    /// A reference to a named type, left unexpanded. Lookup through the context
    /// that produced it expands the reference; leaving pointees unexpanded is what
    /// lets recursive types resolve.
    Alias(Ident),
    /// A function signature. Functions have no in-memory representation of their
    /// own; only pointers to them do.
    Fun(FunDecl),
    Void,
    /// A named type with no known structure. Legal to form pointers to.
    Opaque,
    /// A sentinel recording that lifting the recorded raw type failed. Carried in
    /// the context so that one bad declaration does not poison the rest.
    Unsupported(RawType),
}

/// A type describing something with a concrete in-memory representation.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum MemType {
    /// An integer with the given width in bits.
    Int(u32),
    Float,
    Double,
    /// A pointer. The pointee is a SymType, not a MemType: pointers to opaque
    /// types, functions, and not-yet-resolved aliases are all representable, and
    /// the pointer's own layout does not depend on the pointee.
    Ptr(Box<SymType>),
    Array(u64, Box<MemType>),
    Vec(u64, Box<MemType>),
    Struct(StructInfo),
    Metadata,
}

/// A function return type; None models void.
pub type RetType = Option<MemType>;

/// A lifted function signature.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct FunDecl {
    pub ret_type: RetType,
    pub arg_types: Vec<MemType>,
    pub var_args: bool,
}

/// Structural equality of in-memory types at the bit level: widths, lengths and
/// packedness must agree, but all pointers are mutually compatible regardless of
/// pointee. Aliases are not expanded here; resolve them through the context first.
pub fn compat_mem_types(x: &MemType, y: &MemType) -> bool {
    match (x, y) {
        (MemType::Int(wx), MemType::Int(wy)) => wx == wy,
        (MemType::Float, MemType::Float) => true,
        (MemType::Double, MemType::Double) => true,
        (MemType::Ptr(_), MemType::Ptr(_)) => true,
        (MemType::Array(nx, ex), MemType::Array(ny, ey)) => nx == ny && compat_mem_types(ex, ey),
        (MemType::Vec(nx, ex), MemType::Vec(ny, ey)) => nx == ny && compat_mem_types(ex, ey),
        (MemType::Struct(sx), MemType::Struct(sy)) => {
            sx.packed == sy.packed
                && sx.fields.len() == sy.fields.len()
                && sx
                    .fields
                    .iter()
                    .zip(sy.fields.iter())
                    .all(|(fx, fy)| compat_mem_types(&fx.mem_type, &fy.mem_type))
        }
        (MemType::Metadata, MemType::Metadata) => true,
        _ => false,
    }
}

/// Bit-level compatibility of return types: void matches only void.
pub fn compat_ret_types(x: &RetType, y: &RetType) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(mx), Some(my)) => compat_mem_types(mx, my),
        _ => false,
    }
}
