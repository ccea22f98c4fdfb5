// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.
//
// Mirage supplies the two foundations a symbolic execution engine for LLVM
// programs builds on: a lifter that turns a module's named type declarations into
// a closed symbolic type system suitable for memory-model reasoning, and an
// algebra of abstract values over the base sorts the simulator computes with.
// Parsing LLVM, simulating programs, and discharging queries to a solver all
// happen in the surrounding engine; this crate stays a pure library with no I/O
// and no global state.

#[macro_use]
extern crate log;

pub mod abstract_value;
pub mod bool_domain;
pub mod bv_domain;
pub mod data_layout;
pub mod interval_domain;
pub mod k_limits;
pub mod known_names;
pub mod llvm_ast;
pub mod mem_types;
pub mod nat_domain;
pub mod real_domain;
pub mod smt_solver;
pub mod type_lifter;
