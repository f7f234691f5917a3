//! In-memory representation of a decoded allocation profile.
//!
//! A profile is a function table (id <-> name) plus the captured
//! call-stack samples, in decode order. Nothing downstream mutates it.

use crate::utils::config::UNRESOLVED_FUNCTION_NAME;
use crate::utils::error::ReportError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Opaque function identifier assigned by the capturing process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionId(pub u64);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FunctionId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Bidirectional mapping between function ids and display names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionTable {
    id_to_name: BTreeMap<FunctionId, String>,
    name_to_id: HashMap<String, FunctionId>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function.
    ///
    /// Every id keeps its own name. Several ids may share a name (dumps
    /// truncate long symbols), in which case `id_of` returns the id inserted
    /// last under that name.
    pub fn insert(&mut self, id: FunctionId, name: impl Into<String>) {
        let name = name.into();
        if let Some(previous) = self.id_to_name.insert(id, name.clone()) {
            if previous != name && self.name_to_id.get(&previous) == Some(&id) {
                self.name_to_id.remove(&previous);
                let fallback = self
                    .id_to_name
                    .iter()
                    .rev()
                    .find(|(_, other)| **other == previous)
                    .map(|(other_id, _)| *other_id);
                if let Some(other_id) = fallback {
                    self.name_to_id.insert(previous, other_id);
                }
            }
        }
        self.name_to_id.insert(name, id);
    }

    pub fn name_of(&self, id: FunctionId) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<FunctionId> {
        self.name_to_id.get(name).copied()
    }

    /// Look up a name, failing for ids the table does not know
    pub fn resolve(&self, id: FunctionId) -> Result<&str, ReportError> {
        self.name_of(id).ok_or(ReportError::UnresolvedFunctionId(id))
    }

    /// Name for display; unresolved ids get a placeholder instead of failing
    pub fn display_name(&self, id: FunctionId) -> Cow<'_, str> {
        match self.resolve(id) {
            Ok(name) => Cow::Borrowed(name),
            Err(e) => {
                debug!("{}", e);
                Cow::Owned(format!("{} {:#x}", UNRESOLVED_FUNCTION_NAME, id.0))
            }
        }
    }

    pub fn contains(&self, id: FunctionId) -> bool {
        self.id_to_name.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    /// Entries ordered by ascending id
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, &str)> {
        self.id_to_name.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// One captured call-stack snapshot with its allocation counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub alloc_objects: u32,
    pub alloc_bytes: u32,
    pub free_objects: u32,
    pub free_bytes: u32,

    /// Leaf-first: index 0 is the allocating frame, the last entry is the root
    pub stack: Vec<FunctionId>,
}

impl Sample {
    pub fn new(
        alloc_objects: u32,
        alloc_bytes: u32,
        free_objects: u32,
        free_bytes: u32,
        stack: Vec<FunctionId>,
    ) -> Self {
        Self {
            alloc_objects,
            alloc_bytes,
            free_objects,
            free_bytes,
            stack,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost frame, if the stack is not empty
    pub fn leaf(&self) -> Option<FunctionId> {
        self.stack.first().copied()
    }

    /// Bytes still live: allocated minus freed. Negative when frees exceed allocations.
    pub fn net_bytes(&self) -> i64 {
        i64::from(self.alloc_bytes) - i64::from(self.free_bytes)
    }

    pub fn net_objects(&self) -> i64 {
        i64::from(self.alloc_objects) - i64::from(self.free_objects)
    }

    /// Stack from the root frame down to the leaf
    pub fn frames_outermost_first(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.stack.iter().rev().copied()
    }
}

/// A decoded profile: function table plus samples in decode order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub functions: FunctionTable,
    pub samples: Vec<Sample>,
}

impl Profile {
    pub fn new(functions: FunctionTable, samples: Vec<Sample>) -> Self {
        Self { functions, samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Ids referenced by some stack but absent from the function table
    pub fn unresolved_ids(&self) -> BTreeSet<FunctionId> {
        self.samples
            .iter()
            .flat_map(|sample| sample.stack.iter().copied())
            .filter(|id| !self.functions.contains(*id))
            .collect()
    }
}
