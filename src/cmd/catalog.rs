/*!
Operation catalog types and lookup.

Each remote capability is described by one immutable `OperationDescriptor`
(group, command name, method class, endpoint path, parameter specs, paging
style). The full table lives in `operations.rs`; this module only defines the
shape of an entry and the read-only `(group, name)` index over the table.
*/

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::error::CliError;

/// Whether an operation only reads or also mutates remote state.
///
/// Every Outline endpoint is a POST with a JSON body, so this is a semantic
/// class rather than an HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Read,
    Mutate,
}

impl Method {
    pub fn is_mutating(self) -> bool {
        matches!(self, Method::Mutate)
    }
}

/// Declared type of a parameter; raw flag values are coerced to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    /// Opaque identifier, must be non-empty.
    Id,
    /// Arbitrary JSON document.
    Json,
    /// Comma-separated values, sent as an array of strings.
    List,
    /// Path to a file whose contents are sent as a string.
    File,
}

impl ParamKind {
    /// Placeholder shown in help output.
    pub fn value_name(self) -> &'static str {
        match self {
            ParamKind::String => "TEXT",
            ParamKind::Integer => "N",
            ParamKind::Boolean => "BOOL",
            ParamKind::Id => "ID",
            ParamKind::Json => "JSON",
            ParamKind::List => "A,B,...",
            ParamKind::File => "PATH",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Id => "id",
            ParamKind::Json => "JSON",
            ParamKind::List => "comma-separated list",
            ParamKind::File => "readable file path",
        };
        f.write_str(s)
    }
}

/// One request parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// CLI flag without the leading dashes, e.g. `collection-id`.
    pub flag: &'static str,
    /// Key in the request body, e.g. `collectionId`.
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub help: &'static str,
}

/// How a paginated operation lays out its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Not paginated: `--limit/--offset/--all` are rejected.
    None,
    /// Offset/limit pages whose `data` is an array.
    Offset,
    /// Offset/limit pages whose `data` is an object of parallel arrays; the
    /// named key counts the page length.
    Nested(&'static str),
}

/// Immutable description of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub group: &'static str,
    pub name: &'static str,
    pub method: Method,
    /// Endpoint path relative to the API base, e.g. `/documents.list`.
    pub path: &'static str,
    pub summary: &'static str,
    pub params: &'static [ParamSpec],
    pub paging: Paging,
}

impl OperationDescriptor {
    pub fn is_paginated(&self) -> bool {
        !matches!(self.paging, Paging::None)
    }

    pub fn param(&self, flag: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.flag == flag)
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.group, self.name)
    }
}

/// A top-level command group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    pub name: &'static str,
    pub about: &'static str,
}

/// Read-only index over a table of operations.
#[derive(Debug)]
pub struct Catalog {
    groups: &'static [GroupInfo],
    operations: &'static [OperationDescriptor],
    index: HashMap<&'static str, HashMap<&'static str, &'static OperationDescriptor>>,
}

static BUILTIN: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(super::operations::GROUPS, super::operations::OPERATIONS));

impl Catalog {
    /// Index a table. The first entry wins should a `(group, name)` pair repeat;
    /// the built-in table is checked for duplicates by its tests.
    pub fn new(
        groups: &'static [GroupInfo],
        operations: &'static [OperationDescriptor],
    ) -> Self {
        let mut index: HashMap<_, HashMap<_, _>> = HashMap::new();
        for op in operations {
            index.entry(op.group).or_default().entry(op.name).or_insert(op);
        }
        Catalog {
            groups,
            operations,
            index,
        }
    }

    /// The Outline catalog, loaded once per process.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn lookup(&self, group: &str, name: &str) -> Result<&'static OperationDescriptor, CliError> {
        self.index
            .get(group)
            .and_then(|ops| ops.get(name))
            .copied()
            .ok_or_else(|| CliError::Validation(format!("unknown command `{group} {name}`")))
    }

    pub fn groups(&self) -> &'static [GroupInfo] {
        self.groups
    }

    pub fn operations(&self) -> &'static [OperationDescriptor] {
        self.operations
    }

    /// Operations of one group, in table order.
    pub fn operations_in<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'static OperationDescriptor> + 'a {
        self.operations.iter().filter(move |op| op.group == group)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
