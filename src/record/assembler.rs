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

//! Record assembly: folding flat (value, definition level, repetition level)
//! triples back into nested records.
//!
//! The assembler keeps a stack of open list containers, the record list at
//! the bottom. A repetition level below the maximum closes containers down to
//! that depth; the definition level then decides how deep to open new
//! containers and whether to place a value, a null, or an empty list.
//!
//! For nullable paths the target depth is derived from the definition level
//! by parity, which assumes alternating OPTIONAL/REPEATED ancestors. Schemas
//! with several consecutive OPTIONAL ancestors may fold a missing ancestor to
//! the wrong depth; resolving that requires walking the schema path per
//! level.

use crate::errors::{ParquetError, Result};
use crate::record::value::Value;

/// Assembles the triples of one column into top-level records.
///
/// For a repeated column each record is a (possibly nested) [`Value::List`];
/// for flat columns each record is the value itself, with `Null` standing in
/// at definition levels below the maximum.
pub(crate) struct RecordAssembler {
    max_def_level: u16,
    max_rep_level: u16,
    /// Whether any node on the column path is OPTIONAL. Purely-REPEATED
    /// paths place values at the full nesting depth instead of by parity.
    nullable: bool,
}

impl RecordAssembler {
    pub(crate) fn new(max_def_level: u16, max_rep_level: u16, nullable: bool) -> Self {
        Self {
            max_def_level,
            max_rep_level,
            nullable,
        }
    }

    /// Fold the parallel level/value sequences into records.
    ///
    /// `rep_levels` may be empty for non-repeated columns and `def_levels`
    /// may be empty for required paths; both default to zero. `num_values` is
    /// the triple count including nulls.
    pub(crate) fn assemble(
        &self,
        rep_levels: &[u16],
        def_levels: &[u16],
        num_values: usize,
        values: Vec<Value>,
    ) -> Result<Vec<Value>> {
        if !rep_levels.is_empty() && rep_levels.len() != num_values {
            return Err(internal_err!(
                "Repetition level count {} does not match {} values",
                rep_levels.len(),
                num_values
            ));
        }
        if !def_levels.is_empty() && def_levels.len() != num_values {
            return Err(internal_err!(
                "Definition level count {} does not match {} values",
                def_levels.len(),
                num_values
            ));
        }

        // stack of open containers; index 0 collects finished records
        let mut stack: Vec<Vec<Value>> = vec![vec![]];
        let mut next_value = values.into_iter();

        for i in 0..num_values {
            let rep = rep_levels.get(i).copied().unwrap_or(0);
            let def = def_levels.get(i).copied().unwrap_or(self.max_def_level);

            // a lower repetition level closes lists down to that depth
            if rep < self.max_rep_level {
                while stack.len() > (rep + 1) as usize {
                    close_top(&mut stack)?;
                }
            }

            // how deep this entry lives: full depth for defined values on
            // non-null paths, else inferred from the definition level parity
            let open_while = |depth: usize| {
                if self.nullable {
                    depth * 2 < (def + 1) as usize
                } else {
                    depth < (self.max_rep_level + 1) as usize
                }
            };
            while open_while(stack.len()) {
                stack.push(vec![]);
            }

            let current = stack
                .last_mut()
                .ok_or_else(|| internal_err!("Record assembly stack underflow"))?;
            if def == self.max_def_level {
                let value = next_value
                    .next()
                    .ok_or_else(|| internal_err!("Ran out of values during record assembly"))?;
                current.push(value);
            } else if self.nullable {
                // even levels mark a null ancestor, odd levels an empty list
                if def % 2 == 0 {
                    current.push(Value::Null);
                } else {
                    current.push(Value::List(vec![]));
                }
            }
        }

        while stack.len() > 1 {
            close_top(&mut stack)?;
        }
        Ok(stack.pop().unwrap_or_default())
    }
}

fn close_top(stack: &mut Vec<Vec<Value>>) -> Result<()> {
    let finished = stack
        .pop()
        .ok_or_else(|| internal_err!("Record assembly stack underflow"))?;
    let parent = stack
        .last_mut()
        .ok_or_else(|| internal_err!("Record assembly stack underflow"))?;
    parent.push(Value::List(finished));
    Ok(())
}
