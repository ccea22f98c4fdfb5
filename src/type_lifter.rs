// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeSet, HashMap};

use log_derive::logfn_inputs;
use rpds::HashTrieMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_layout::DataLayout;
use crate::k_limits;
use crate::llvm_ast::{FloatType, Ident, PrimType, RawType, TypeDecl, ValMd};
use crate::mem_types::{FunDecl, MemType, RetType, SymType};

/// A problem found while lifting the module's type declarations. Errors are
/// accumulated, never thrown: lifting always completes and reports everything it
/// found in one pass.
#[derive(Error, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum TypeError {
    /// A raw type constructor that no symbolic type can represent: an unknown
    /// primitive, or a composite whose element is itself unsupported.
    #[error("unsupported type: {0}")]
    Unsupported(RawType),
    /// An alias that refers to a missing declaration, or participates in a
    /// reference cycle that no pointer indirection breaks.
    #[error("could not resolve type name: {0}")]
    Unresolvable(Ident),
}

/// The resolution state of one named type.
#[derive(Clone, Debug)]
enum IdentStatus {
    /// Declared but not visited yet.
    Pending(RawType),
    /// Resolution of this name is on the current resolution path. Reaching an
    /// Active binding again means the declarations form a cycle.
    Active,
    Resolved(SymType),
}

/// Transient state for one lifting pass. Lives for a single mk_context call, or
/// for a single query against a finished context.
#[derive(Debug)]
struct TypeResolver<'a> {
    data_layout: &'a DataLayout,
    bindings: HashMap<Ident, IdentStatus>,
    unsupported: BTreeSet<RawType>,
    unresolvable: BTreeSet<Ident>,
}

impl<'a> TypeResolver<'a> {
    fn new(data_layout: &'a DataLayout, decls: &[TypeDecl]) -> TypeResolver<'a> {
        let bindings = decls
            .iter()
            .map(|decl| {
                (
                    decl.name.clone(),
                    IdentStatus::Pending(decl.decl_type.clone()),
                )
            })
            .collect();
        TypeResolver {
            data_layout,
            bindings,
            unsupported: BTreeSet::new(),
            unresolvable: BTreeSet::new(),
        }
    }

    /// A resolver over an already finished alias map, for query-mode lifting.
    fn for_queries(
        data_layout: &'a DataLayout,
        alias_map: &HashTrieMap<Ident, SymType>,
    ) -> TypeResolver<'a> {
        let bindings = alias_map
            .iter()
            .map(|(id, tp)| (id.clone(), IdentStatus::Resolved(tp.clone())))
            .collect();
        TypeResolver {
            data_layout,
            bindings,
            unsupported: BTreeSet::new(),
            unresolvable: BTreeSet::new(),
        }
    }

    fn has_errors(&self) -> bool {
        !self.unsupported.is_empty() || !self.unresolvable.is_empty()
    }

    fn errors(&self) -> Vec<TypeError> {
        let mut errors: Vec<TypeError> = self
            .unsupported
            .iter()
            .map(|tp| TypeError::Unsupported(tp.clone()))
            .collect();
        errors.extend(
            self.unresolvable
                .iter()
                .map(|id| TypeError::Unresolvable(id.clone())),
        );
        errors
    }

    fn record_unsupported(&mut self, raw: &RawType) -> SymType {
        self.unsupported.insert(raw.clone());
        SymType::Unsupported(raw.clone())
    }

    /// Resolves a named type, memoizing the result. The Active marker is the cycle
    /// detector: re-entering a name that is currently being resolved means the
    /// declarations are mutually recursive with no pointer edge in between, which
    /// has no in-memory representation.
    #[logfn_inputs(TRACE)]
    fn tc_ident(&mut self, id: &Ident) -> SymType {
        match self.bindings.get(id) {
            Some(IdentStatus::Resolved(tp)) => tp.clone(),
            Some(IdentStatus::Pending(raw)) => {
                let raw = raw.clone();
                self.bindings.insert(id.clone(), IdentStatus::Active);
                let resolved = self.tc_type(&raw);
                if let SymType::Unsupported(RawType::Alias(_)) = &resolved {
                    // The body was an alias chain that bottomed out, so this
                    // declaration is unresolvable as well.
                    self.unresolvable.insert(id.clone());
                }
                self.bindings
                    .insert(id.clone(), IdentStatus::Resolved(resolved.clone()));
                resolved
            }
            Some(IdentStatus::Active) | None => {
                self.unresolvable.insert(id.clone());
                SymType::Unsupported(RawType::Alias(id.clone()))
            }
        }
    }

    /// Structurally lifts a raw type to its symbolic form. Aliases are chased
    /// eagerly except directly under a pointer; unsupported constructs become
    /// sentinels and a recorded error rather than failures.
    #[logfn_inputs(TRACE)]
    fn tc_type(&mut self, raw: &RawType) -> SymType {
        match raw {
            RawType::Prim(pt) => match pt {
                PrimType::Integer(width) => SymType::Mem(MemType::Int(*width)),
                PrimType::FloatType(FloatType::Float) => SymType::Mem(MemType::Float),
                PrimType::FloatType(FloatType::Double) => SymType::Mem(MemType::Double),
                PrimType::Void => SymType::Void,
                PrimType::Metadata => SymType::Mem(MemType::Metadata),
                _ => self.record_unsupported(raw),
            },
            RawType::Alias(id) => self.tc_ident(id),
            RawType::Array(n, elem) => match self.tc_mem_type(elem) {
                Some(elem_type) => SymType::Mem(MemType::Array(*n, Box::new(elem_type))),
                None => self.record_unsupported(raw),
            },
            RawType::Vector(n, elem) => match self.tc_mem_type(elem) {
                Some(elem_type) => SymType::Mem(MemType::Vec(*n, Box::new(elem_type))),
                None => self.record_unsupported(raw),
            },
            RawType::PtrTo(pointee) => {
                SymType::Mem(MemType::Ptr(Box::new(self.tc_pointee(pointee))))
            }
            RawType::Struct(fields) => self.tc_struct(raw, false, fields),
            RawType::PackedStruct(fields) => self.tc_struct(raw, true, fields),
            RawType::FunTy(ret, args, var_args) => {
                let ret_type = {
                    let lifted = self.tc_type(ret);
                    self.resolve_ret_type(lifted)
                };
                // Lift every argument before judging the whole signature, so that
                // one pass reports every problem the signature has.
                let arg_types: Vec<Option<MemType>> =
                    args.iter().map(|arg| self.tc_mem_type(arg)).collect();
                match (ret_type, arg_types.into_iter().collect::<Option<Vec<_>>>()) {
                    (Some(ret_type), Some(arg_types)) => SymType::Fun(FunDecl {
                        ret_type,
                        arg_types,
                        var_args: *var_args,
                    }),
                    _ => self.record_unsupported(raw),
                }
            }
            RawType::Opaque => SymType::Opaque,
        }
    }

    /// Lifts the target of a pointer type. A directly named pointee stays an
    /// unexpanded Alias: the pointer's layout does not depend on its target, and
    /// not chasing the name here is what lets recursive types resolve.
    fn tc_pointee(&mut self, raw: &RawType) -> SymType {
        match raw {
            RawType::Alias(id) => SymType::Alias(id.clone()),
            _ => self.tc_type(raw),
        }
    }

    fn tc_struct(&mut self, raw: &RawType, packed: bool, fields: &[RawType]) -> SymType {
        let field_types: Vec<Option<MemType>> = fields
            .iter()
            .map(|field| self.tc_mem_type(field))
            .collect();
        match field_types.into_iter().collect::<Option<Vec<_>>>() {
            Some(field_types) => SymType::Mem(MemType::Struct(
                self.data_layout.mk_struct_info(packed, field_types),
            )),
            None => self.record_unsupported(raw),
        }
    }

    /// Lifts a raw type that must have an in-memory representation, e.g. an array
    /// element or a struct field.
    fn tc_mem_type(&mut self, raw: &RawType) -> Option<MemType> {
        let lifted = self.tc_type(raw);
        self.resolve_mem_type(lifted)
    }

    fn resolve_mem_type(&mut self, tp: SymType) -> Option<MemType> {
        let mut current = tp;
        for _ in 0..k_limits::MAX_ALIAS_CHAIN_LENGTH {
            match current {
                SymType::Mem(mem_type) => return Some(mem_type),
                SymType::Alias(id) => current = self.tc_ident(&id),
                _ => return None,
            }
        }
        None
    }

    fn resolve_ret_type(&mut self, tp: SymType) -> Option<RetType> {
        let mut current = tp;
        for _ in 0..k_limits::MAX_ALIAS_CHAIN_LENGTH {
            match current {
                SymType::Mem(mem_type) => return Some(Some(mem_type)),
                SymType::Void => return Some(None),
                SymType::Alias(id) => current = self.tc_ident(&id),
                _ => return None,
            }
        }
        None
    }
}

/// The lifted type information of one LLVM module: its data layout, its unnamed
/// metadata, and every named type declaration resolved to a symbolic type.
/// Immutable after construction; queries run a fresh resolver seeded from the
/// alias map and never write back, so a context can be shared freely.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LlvmContext {
    data_layout: DataLayout,
    metadata_map: HashTrieMap<u64, ValMd>,
    alias_map: HashTrieMap<Ident, SymType>,
}

/// Resolves the module's named type declarations into a context. Declarations are
/// visited in input order, but the result does not depend on the order because
/// dependencies are chased eagerly. Every problem found is reported in the
/// returned list; every declared name gets an entry in the context's alias map,
/// with an unsupported sentinel standing in where lifting failed.
#[logfn_inputs(TRACE)]
pub fn mk_context(
    data_layout: DataLayout,
    metadata: HashMap<u64, ValMd>,
    decls: &[TypeDecl],
) -> (Vec<TypeError>, LlvmContext) {
    let mut resolver = TypeResolver::new(&data_layout, decls);
    for decl in decls {
        resolver.tc_ident(&decl.name);
    }
    let mut alias_map = HashTrieMap::new();
    for decl in decls {
        if let Some(IdentStatus::Resolved(tp)) = resolver.bindings.get(&decl.name) {
            alias_map.insert_mut(decl.name.clone(), tp.clone());
        }
    }
    let errors = resolver.errors();
    let mut metadata_map = HashTrieMap::new();
    for (index, md) in metadata {
        metadata_map.insert_mut(index, md);
    }
    (
        errors,
        LlvmContext {
            data_layout,
            metadata_map,
            alias_map,
        },
    )
}

impl LlvmContext {
    pub fn data_layout(&self) -> &DataLayout {
        &self.data_layout
    }

    /// The symbolic type a module-level name resolved to, if the name was declared.
    pub fn lookup_alias(&self, id: &Ident) -> Option<&SymType> {
        self.alias_map.get(id)
    }

    pub fn lookup_metadata(&self, index: u64) -> Option<&ValMd> {
        self.metadata_map.get(&index)
    }

    /// Lifts a raw type against this context. Degrades to None if the lift records
    /// any error, so callers see either a clean symbolic type or nothing.
    #[logfn_inputs(TRACE)]
    pub fn lift_type(&self, raw: &RawType) -> Option<SymType> {
        let mut resolver = TypeResolver::for_queries(&self.data_layout, &self.alias_map);
        let lifted = resolver.tc_type(raw);
        if resolver.has_errors() {
            None
        } else {
            Some(lifted)
        }
    }

    /// Lifts a raw type that must have an in-memory representation.
    pub fn lift_mem_type(&self, raw: &RawType) -> Option<MemType> {
        self.lift_type(raw).and_then(|tp| self.as_mem_type(&tp))
    }

    /// Lifts a raw type used in return position.
    pub fn lift_ret_type(&self, raw: &RawType) -> Option<RetType> {
        self.lift_type(raw).and_then(|tp| self.as_ret_type(&tp))
    }

    /// Follows alias references through this context until an in-memory type is
    /// reached, or gives up. The walk is bounded: alias maps built by mk_context
    /// cannot cycle, but hand-assembled or deserialized ones can.
    pub fn as_mem_type(&self, tp: &SymType) -> Option<MemType> {
        let mut current = tp;
        for _ in 0..k_limits::MAX_ALIAS_CHAIN_LENGTH {
            match current {
                SymType::Mem(mem_type) => return Some(mem_type.clone()),
                SymType::Alias(id) => current = self.alias_map.get(id)?,
                _ => return None,
            }
        }
        None
    }

    /// Follows alias references until a type usable in return position is reached.
    pub fn as_ret_type(&self, tp: &SymType) -> Option<RetType> {
        let mut current = tp;
        for _ in 0..k_limits::MAX_ALIAS_CHAIN_LENGTH {
            match current {
                SymType::Mem(mem_type) => return Some(Some(mem_type.clone())),
                SymType::Void => return Some(None),
                SymType::Alias(id) => current = self.alias_map.get(id)?,
                _ => return None,
            }
        }
        None
    }
}
