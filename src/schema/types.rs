// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The schema tree and per-column descriptors.

use std::sync::Arc;

use crate::basic::{ConvertedType, Repetition, Type};
use crate::errors::{ParquetError, Result};
use crate::thrift::{FieldType, ThriftSliceReader};

/// One element of the flat schema list stored in the file metadata.
///
/// The flat list is a depth-first serialization of the schema tree: an
/// element with `num_children` set is a group whose children are the next
/// `num_children` subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaElement {
    /// Physical type. Not set for group nodes.
    pub physical_type: Option<Type>,
    /// Byte length of FIXED_LEN_BYTE_ARRAY values.
    pub type_length: Option<i32>,
    /// Repetition of the field. The schema root carries none.
    pub repetition: Option<Repetition>,
    /// Name of the field.
    pub name: String,
    /// Number of children for group nodes. Not set for primitives.
    pub num_children: Option<i32>,
    /// Converted type driving logical value conversion.
    pub converted_type: Option<ConvertedType>,
    /// DECIMAL scale.
    pub scale: Option<i32>,
    /// DECIMAL precision.
    pub precision: Option<i32>,
    /// Original field id, when the source schema supports them.
    pub field_id: Option<i32>,
}

impl SchemaElement {
    /// Decode one `SchemaElement` struct from Thrift input.
    pub(crate) fn read_thrift(prot: &mut ThriftSliceReader<'_>) -> Result<Self> {
        let mut physical_type = None;
        let mut type_length = None;
        let mut repetition = None;
        let mut name: Option<String> = None;
        let mut num_children = None;
        let mut converted_type = None;
        let mut scale = None;
        let mut precision = None;
        let mut field_id = None;

        let mut last_field_id = 0i16;
        loop {
            let field_ident = prot.read_field_begin(last_field_id)?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => physical_type = Some(Type::read_thrift(prot)?),
                2 => type_length = Some(prot.read_i32()?),
                3 => repetition = Some(Repetition::read_thrift(prot)?),
                4 => name = Some(prot.read_string()?.to_owned()),
                5 => num_children = Some(prot.read_i32()?),
                6 => converted_type = Some(ConvertedType::read_thrift(prot)?),
                7 => scale = Some(prot.read_i32()?),
                8 => precision = Some(prot.read_i32()?),
                9 => field_id = Some(prot.read_i32()?),
                _ => prot.skip(field_ident.field_type)?,
            }
            last_field_id = field_ident.id;
        }

        let Some(name) = name else {
            return Err(general_err!("Required field name is missing"));
        };
        Ok(Self {
            physical_type,
            type_length,
            repetition,
            name,
            num_children,
            converted_type,
            scale,
            precision,
            field_id,
        })
    }

    fn is_group(&self) -> bool {
        self.num_children.map(|n| n > 0).unwrap_or(false)
    }
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// The schema element this node was built from.
    pub element: SchemaElement,
    /// Child nodes, in write order.
    pub children: Vec<SchemaNode>,
    /// Number of schema elements in this subtree, including this node.
    pub count: usize,
    /// Names from the root to this node, excluding the root.
    pub path: Vec<String>,
}

impl SchemaNode {
    /// Name of the field this node represents.
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Whether this node is a leaf, i.e. corresponds to exactly one column
    /// chunk per row group.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A leaf column of the schema, with the levels that drive page decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// The primitive schema element.
    pub primitive: SchemaElement,
    /// Names from the root to the leaf.
    pub path: Vec<String>,
    /// Maximum definition level: the number of non-REQUIRED nodes on the
    /// path.
    pub max_def_level: u16,
    /// Maximum repetition level: the number of REPEATED nodes on the path.
    pub max_rep_level: u16,
    /// Whether any node on the path is OPTIONAL. Drives the null/empty-list
    /// discrimination during record assembly.
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// The physical type of the column.
    pub fn physical_type(&self) -> Type {
        // leaves always carry a physical type; `build` rejects others
        self.primitive.physical_type.unwrap()
    }

    /// The converted type of the column, `NONE` when absent.
    pub fn converted_type(&self) -> ConvertedType {
        self.primitive.converted_type.unwrap_or(ConvertedType::NONE)
    }

    /// Byte length of FIXED_LEN_BYTE_ARRAY values, zero otherwise.
    pub fn type_length(&self) -> usize {
        self.primitive.type_length.unwrap_or(0).max(0) as usize
    }

    /// The dotted column path, e.g. `a.b.list.element`.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Leaf field name.
    pub fn name(&self) -> &str {
        &self.primitive.name
    }

    /// True when every node on the path is REQUIRED. Such columns store no
    /// definition levels.
    pub fn is_required(&self) -> bool {
        self.max_def_level == 0
    }
}

/// A schema tree built from the flat schema list, along with flattened
/// descriptors for each leaf column.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    root: SchemaNode,
    leaves: Vec<Arc<ColumnDescriptor>>,
}

impl SchemaDescriptor {
    /// Build the tree by a depth-first walk of the flat schema list: the
    /// element at the cursor consumes the next `num_children` subtrees.
    pub fn try_new(elements: Vec<SchemaElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(general_err!("Schema is empty"));
        }
        let mut pos = 0usize;
        let root = build_node(&elements, &mut pos, &[], true)?;
        if pos != elements.len() {
            return Err(general_err!(
                "Schema tree consumed {} of {} schema elements",
                pos,
                elements.len()
            ));
        }
        if root.element.repetition.unwrap_or(Repetition::REQUIRED) != Repetition::REQUIRED {
            return Err(general_err!("Schema root must be REQUIRED"));
        }

        let mut leaves = Vec::new();
        collect_leaves(&root, 0, 0, false, &mut leaves)?;
        Ok(Self { root, leaves })
    }

    /// The root of the schema tree.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Number of leaf columns.
    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// Descriptor of the `i`th leaf column, in schema order.
    pub fn column(&self, i: usize) -> Arc<ColumnDescriptor> {
        self.leaves[i].clone()
    }

    /// All leaf column descriptors, in schema order.
    pub fn columns(&self) -> &[Arc<ColumnDescriptor>] {
        &self.leaves
    }

    /// Find a leaf column by its dotted path, falling back to a unique leaf
    /// field name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(i) = self
            .leaves
            .iter()
            .position(|leaf| leaf.path_string() == name)
        {
            return Some(i);
        }
        let mut by_name = self.leaves.iter().enumerate().filter(|(_, l)| l.name() == name);
        match (by_name.next(), by_name.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    }
}

fn build_node(
    elements: &[SchemaElement],
    pos: &mut usize,
    parent_path: &[String],
    is_root: bool,
) -> Result<SchemaNode> {
    let element = elements
        .get(*pos)
        .ok_or_else(|| general_err!("Schema tree refers past the end of the flat schema"))?
        .clone();
    *pos += 1;

    if !is_root && element.repetition.is_none() {
        return Err(general_err!(
            "Schema element {} has no repetition type",
            element.name
        ));
    }

    let mut path = parent_path.to_vec();
    if !is_root {
        path.push(element.name.clone());
    }

    let num_children = element.num_children.unwrap_or(0);
    if num_children < 0 {
        return Err(general_err!(
            "Schema element {} has negative child count",
            element.name
        ));
    }
    if !element.is_group() && element.physical_type.is_none() && !is_root {
        return Err(general_err!(
            "Schema leaf {} has no physical type",
            element.name
        ));
    }

    let mut children = Vec::with_capacity(num_children as usize);
    let mut count = 1usize;
    for _ in 0..num_children {
        let child = build_node(elements, pos, &path, false)?;
        count += child.count;
        children.push(child);
    }

    Ok(SchemaNode {
        element,
        children,
        count,
        path,
    })
}

fn collect_leaves(
    node: &SchemaNode,
    def_level: u16,
    rep_level: u16,
    nullable: bool,
    leaves: &mut Vec<Arc<ColumnDescriptor>>,
) -> Result<()> {
    for child in &node.children {
        // the root is REQUIRED by invariant and does not contribute to levels
        let repetition = child.element.repetition.unwrap_or(Repetition::REQUIRED);
        let def_level = match repetition {
            Repetition::REQUIRED => def_level,
            Repetition::OPTIONAL | Repetition::REPEATED => def_level + 1,
        };
        let rep_level = match repetition {
            Repetition::REPEATED => rep_level + 1,
            _ => rep_level,
        };
        let nullable = nullable || repetition == Repetition::OPTIONAL;
        if child.is_leaf() {
            leaves.push(Arc::new(ColumnDescriptor {
                primitive: child.element.clone(),
                path: child.path.clone(),
                max_def_level: def_level,
                max_rep_level: rep_level,
                nullable,
            }));
        } else {
            collect_leaves(child, def_level, rep_level, nullable, leaves)?;
        }
    }
    Ok(())
}
