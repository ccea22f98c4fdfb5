// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::mem_types::MemType;

lazy_static! {
    /// ABI alignments (in bytes, keyed by width in bits) that LLVM assumes when the
    /// data layout string leaves them out.
    static ref DEFAULT_INT_ALIGNMENTS: BTreeMap<u32, u32> =
        [(1, 1), (8, 1), (16, 2), (32, 4), (64, 8)].iter().copied().collect();
    static ref DEFAULT_FLOAT_ALIGNMENTS: BTreeMap<u32, u32> =
        [(16, 2), (32, 4), (64, 8), (128, 16)].iter().copied().collect();
    static ref DEFAULT_VECTOR_ALIGNMENTS: BTreeMap<u32, u32> =
        [(64, 8), (128, 16)].iter().copied().collect();
}

/// Target-specific sizes and alignments for primitive types, as described by an
/// LLVM data layout string. Sizes and alignments are in bytes.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct DataLayout {
    pub big_endian: bool,
    pub ptr_size: u64,
    pub ptr_align: u32,
    int_aligns: BTreeMap<u32, u32>,
    float_aligns: BTreeMap<u32, u32>,
    vector_aligns: BTreeMap<u32, u32>,
    pub aggregate_align: u32,
}

impl Default for DataLayout {
    fn default() -> DataLayout {
        DataLayout {
            big_endian: false,
            ptr_size: 8,
            ptr_align: 8,
            int_aligns: DEFAULT_INT_ALIGNMENTS.clone(),
            float_aligns: DEFAULT_FLOAT_ALIGNMENTS.clone(),
            vector_aligns: DEFAULT_VECTOR_ALIGNMENTS.clone(),
            aggregate_align: 1,
        }
    }
}

/// Parses an LLVM data layout string, e.g.
/// "e-m:e-p:64:64-i64:64-f80:128-n8:16:32:64-S128". Specifications this layer has
/// no use for (mangling, native widths, stack alignment) are accepted and ignored;
/// anything unrecognized is logged and skipped so that one bad specification does
/// not discard the rest.
pub fn parse_data_layout(text: &str) -> DataLayout {
    let mut layout = DataLayout::default();
    for spec in text.split('-').filter(|s| !s.is_empty()) {
        layout.apply_spec(spec);
    }
    layout
}

impl DataLayout {
    fn apply_spec(&mut self, spec: &str) {
        let mut parts = spec.split(':');
        let head = parts.next().unwrap_or_default();
        match head.bytes().next() {
            Some(b'e') if head == "e" => self.big_endian = false,
            Some(b'E') if head == "E" => self.big_endian = true,
            Some(b'p') => {
                // Only the default address space describes the pointers this layer
                // lays out.
                if head != "p" && head != "p0" {
                    return;
                }
                match (number(parts.next()), number(parts.next())) {
                    (Some(size), Some(abi)) => {
                        self.ptr_size = u64::from(bytes(size));
                        self.ptr_align = bytes(abi);
                    }
                    _ => warn!("malformed pointer layout spec {}", spec),
                }
            }
            Some(b'i') | Some(b'f') | Some(b'v') => {
                match (number(Some(&head[1..])), number(parts.next())) {
                    (Some(width), Some(abi)) => {
                        let table = match head.as_bytes()[0] {
                            b'i' => &mut self.int_aligns,
                            b'f' => &mut self.float_aligns,
                            _ => &mut self.vector_aligns,
                        };
                        table.insert(width, bytes(abi).max(1));
                    }
                    _ => warn!("malformed alignment spec {}", spec),
                }
            }
            Some(b'a') if head == "a" => match number(parts.next()) {
                Some(abi) => self.aggregate_align = bytes(abi).max(1),
                None => warn!("malformed aggregate alignment spec {}", spec),
            },
            // Mangling, native integer widths, and stack specifications do not
            // affect type layout.
            Some(b'm') | Some(b'n') | Some(b'S') | Some(b's') => {}
            _ => warn!("unrecognized data layout spec {}", spec),
        }
    }

    /// The ABI alignment of an integer of the given width in bits. A width without
    /// its own specification gets the alignment of the next larger specified width,
    /// or of the largest specified width when there is none.
    pub fn int_align(&self, width: u32) -> u32 {
        if let Some(align) = self.int_aligns.get(&width) {
            return *align;
        }
        if let Some((_, align)) = self.int_aligns.range(width + 1..).next() {
            return *align;
        }
        self.int_aligns
            .values()
            .next_back()
            .copied()
            .unwrap_or(1)
    }

    /// The ABI alignment of a float of the given width in bits.
    pub fn float_align(&self, width: u32) -> u32 {
        self.float_aligns
            .get(&width)
            .copied()
            .unwrap_or_else(|| ((width + 7) / 8).max(1))
    }

    /// The number of bytes a value of the given type occupies in memory.
    pub fn mem_type_size(&self, tp: &MemType) -> u64 {
        match tp {
            MemType::Int(width) => u64::from((width + 7) / 8),
            MemType::Float => 4,
            MemType::Double => 8,
            MemType::Ptr(_) => self.ptr_size,
            MemType::Array(n, elem) => {
                // Array elements are laid out at the element's aligned stride.
                n * align_up(self.mem_type_size(elem), self.mem_type_align(elem))
            }
            MemType::Vec(n, elem) => n * self.mem_type_size(elem),
            MemType::Struct(si) => si.size,
            MemType::Metadata => 0,
        }
    }

    /// The ABI alignment in bytes of a value of the given type.
    pub fn mem_type_align(&self, tp: &MemType) -> u32 {
        match tp {
            MemType::Int(width) => self.int_align(*width),
            MemType::Float => self.float_align(32),
            MemType::Double => self.float_align(64),
            MemType::Ptr(_) => self.ptr_align,
            MemType::Array(_, elem) => self.mem_type_align(elem),
            MemType::Vec(n, elem) => {
                let bits = (n * self.mem_type_size(elem) * 8) as u32;
                self.vector_aligns
                    .get(&bits)
                    .copied()
                    .unwrap_or_else(|| self.mem_type_align(elem))
            }
            MemType::Struct(si) => si.alignment,
            MemType::Metadata => 1,
        }
    }

    /// Lays out a struct with the given field types. Unpacked structs pad each
    /// field up to its ABI alignment and the whole struct up to the largest field
    /// alignment; packed structs place every field back to back.
    pub fn mk_struct_info(&self, packed: bool, field_types: Vec<MemType>) -> StructInfo {
        let mut offset = 0u64;
        let mut alignment = self.aggregate_align;
        let mut placed = Vec::with_capacity(field_types.len());
        for field_type in field_types {
            let align = if packed {
                1
            } else {
                self.mem_type_align(&field_type)
            };
            alignment = alignment.max(align);
            offset = align_up(offset, align);
            let size = self.mem_type_size(&field_type);
            placed.push((offset, size, field_type));
            offset += size;
        }
        let alignment = if packed { 1 } else { alignment };
        let size = align_up(offset, alignment);
        let mut fields = Vec::with_capacity(placed.len());
        let mut iter = placed.into_iter().peekable();
        while let Some((offset, field_size, mem_type)) = iter.next() {
            let next_offset = iter.peek().map(|(o, _, _)| *o).unwrap_or(size);
            fields.push(FieldInfo {
                offset,
                mem_type,
                padding: next_offset - (offset + field_size),
            });
        }
        StructInfo {
            packed,
            size,
            alignment,
            fields,
        }
    }
}

/// The layout of one struct field.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct FieldInfo {
    /// Byte offset of the field from the start of the struct.
    pub offset: u64,
    pub mem_type: MemType,
    /// Bytes of padding between the end of this field and the next field, or the
    /// end of the struct for the last field.
    pub padding: u64,
}

/// The computed layout of a struct type.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct StructInfo {
    pub packed: bool,
    /// Total size in bytes, including trailing padding.
    pub size: u64,
    pub alignment: u32,
    pub fields: Vec<FieldInfo>,
}

fn number(token: Option<&str>) -> Option<u32> {
    token.and_then(|t| t.parse().ok())
}

fn bytes(bits: u32) -> u32 {
    (bits + 7) / 8
}

fn align_up(offset: u64, align: u32) -> u64 {
    let align = u64::from(align.max(1));
    (offset + align - 1) / align * align
}
