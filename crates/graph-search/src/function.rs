//! Table functions and their registry.
//!
//! A host query engine resolves an invocation such as
//! `graph_reachable_dfs(edges, 5)` to a [`TableFunction`] by name, passes the
//! evaluated arguments as [`Argument`]s and receives a [`Table`] it can join,
//! filter or return.
//!
//! ## Column contracts
//!
//! | Function | Input columns | Output columns |
//! |----------|---------------|----------------|
//! | `graph_reachable_dfs` | `source_node_id`, `dest_node_id` + start scalar | `node_id`, `parent_node_id` |
//! | `graph_reachable_dfs_multiroot` | `source_node_id`, `dest_node_id` + roots `node_id` | `node_id`, `parent_node_id` |
//! | `graph_next_sibling` | `node_id`, `node_parent_id`, `sort_key` | `node_id`, `next_node_id` |
//!
//! Extra input columns are ignored. Edge endpoints, tree `node_id` and
//! `sort_key` must not be NULL; `node_parent_id` may be.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::adjacency::{Adjacency, SiblingGroups};
use crate::error::{Error, Result};
use crate::table::{Column, Table, Value};
use crate::types::{Edge, NodeId, ParentRow, SiblingRow, TreeRow};
use crate::{dfs, sibling};

/// Column names shared by the built-in functions.
pub mod columns {
    /// Edge source.
    pub const SOURCE_NODE_ID: &str = "source_node_id";
    /// Edge destination.
    pub const DEST_NODE_ID: &str = "dest_node_id";
    /// Node identity, in tree, roots and result relations.
    pub const NODE_ID: &str = "node_id";
    /// Parent reference in a tree relation.
    pub const NODE_PARENT_ID: &str = "node_parent_id";
    /// Sibling order key in a tree relation.
    pub const SORT_KEY: &str = "sort_key";
    /// Discovering node in a DFS result.
    pub const PARENT_NODE_ID: &str = "parent_node_id";
    /// Successor in a next-sibling result.
    pub const NEXT_NODE_ID: &str = "next_node_id";
}

use columns::{
    DEST_NODE_ID, NEXT_NODE_ID, NODE_ID, NODE_PARENT_ID, PARENT_NODE_ID, SORT_KEY,
    SOURCE_NODE_ID,
};

/// Name of the single-start reachability function.
pub const GRAPH_REACHABLE_DFS: &str = "graph_reachable_dfs";
/// Name of the multi-root reachability function.
pub const GRAPH_REACHABLE_DFS_MULTIROOT: &str = "graph_reachable_dfs_multiroot";
/// Name of the next-sibling function.
pub const GRAPH_NEXT_SIBLING: &str = "graph_next_sibling";

/// An evaluated argument to a table function.
#[derive(Debug, Clone, Copy)]
pub enum Argument<'a> {
    /// A relation.
    Table(&'a Table),
    /// A single value, possibly NULL.
    Scalar(Value),
}

impl From<Value> for Argument<'_> {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl<'a> From<&'a Table> for Argument<'a> {
    fn from(table: &'a Table) -> Self {
        Self::Table(table)
    }
}

/// Whether a parameter takes a relation or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A relation with at least the listed columns.
    Table(&'static [&'static str]),
    /// A nullable integer.
    Scalar,
}

impl ParameterKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Scalar => "scalar",
        }
    }
}

/// A declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, for display.
    pub name: &'static str,
    /// What the parameter accepts.
    pub kind: ParameterKind,
}

/// The calling convention of a table function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Function name.
    pub name: &'static str,
    /// Parameters in call order.
    pub parameters: &'static [Parameter],
    /// Columns of the result relation.
    pub output: &'static [&'static str],
}

impl Signature {
    /// Columns required by the table parameter at `index`, or `None` if
    /// there is no such parameter or it is a scalar.
    #[must_use]
    pub fn table_columns(&self, index: usize) -> Option<&'static [&'static str]> {
        match self.parameters.get(index)?.kind {
            ParameterKind::Table(columns) => Some(columns),
            ParameterKind::Scalar => None,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match param.kind {
                ParameterKind::Table(cols) => write!(f, "{} TABLE({})", param.name, cols.join(", "))?,
                ParameterKind::Scalar => write!(f, "{} INTEGER", param.name)?,
            }
        }
        write!(f, ") -> TABLE({})", self.output.join(", "))
    }
}

/// A function invocable from a query that consumes and produces relations.
///
/// Implementations are stateless: every call builds its own working state
/// and hands the result back by value.
pub trait TableFunction: Send + Sync {
    /// The calling convention.
    fn signature(&self) -> &'static Signature;

    /// Bind `args` and run the function.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not match [`signature`](Self::signature)
    /// or an input table violates its column contract.
    fn invoke(&self, args: &[Argument<'_>]) -> Result<Table>;

    /// The name the function is registered under.
    fn name(&self) -> &'static str {
        self.signature().name
    }
}

/// Checks arguments against a signature and extracts typed inputs.
struct Binder<'a, 'b> {
    signature: &'static Signature,
    args: &'b [Argument<'a>],
}

impl<'a, 'b> Binder<'a, 'b> {
    fn bind(signature: &'static Signature, args: &'b [Argument<'a>]) -> Result<Self> {
        if args.len() != signature.parameters.len() {
            return Err(Error::ArgumentCount {
                function: signature.name.to_string(),
                expected: signature.parameters.len(),
                actual: args.len(),
            });
        }

        let binder = Self { signature, args };
        for (index, param) in signature.parameters.iter().enumerate() {
            match param.kind {
                ParameterKind::Table(required) => {
                    let table = binder.table(index)?;
                    for column in required {
                        binder.column(table, column)?;
                    }
                }
                ParameterKind::Scalar => {
                    binder.scalar(index)?;
                }
            }
        }
        Ok(binder)
    }

    fn kind_error(&self, index: usize) -> Error {
        Error::ArgumentKind {
            function: self.signature.name.to_string(),
            index,
            expected: self
                .signature
                .parameters
                .get(index)
                .map_or("parameter", |p| p.kind.describe()),
        }
    }

    fn table(&self, index: usize) -> Result<&'a Table> {
        match self.args.get(index) {
            Some(Argument::Table(table)) => Ok(*table),
            _ => Err(self.kind_error(index)),
        }
    }

    fn scalar(&self, index: usize) -> Result<Value> {
        match self.args.get(index) {
            Some(Argument::Scalar(value)) => Ok(*value),
            _ => Err(self.kind_error(index)),
        }
    }

    fn column<'t>(&self, table: &'t Table, name: &str) -> Result<&'t Column> {
        table.column(name).ok_or_else(|| Error::MissingColumn {
            function: self.signature.name.to_string(),
            column: name.to_string(),
        })
    }

    fn non_null(&self, column: &Column) -> Result<Vec<i64>> {
        column
            .values()
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| Error::NullValue {
                    function: self.signature.name.to_string(),
                    column: column.name().to_string(),
                    row,
                })
            })
            .collect()
    }

    fn edges(&self, index: usize) -> Result<Vec<Edge>> {
        let table = self.table(index)?;
        let sources = self.non_null(self.column(table, SOURCE_NODE_ID)?)?;
        let dests = self.non_null(self.column(table, DEST_NODE_ID)?)?;
        Ok(sources.into_iter().zip(dests).map(Edge::from).collect())
    }

    fn tree_rows(&self, index: usize) -> Result<Vec<TreeRow>> {
        let table = self.table(index)?;
        let nodes = self.non_null(self.column(table, NODE_ID)?)?;
        let parents = self.column(table, NODE_PARENT_ID)?.values();
        let keys = self.non_null(self.column(table, SORT_KEY)?)?;
        Ok(nodes
            .into_iter()
            .zip(parents)
            .zip(keys)
            .map(|((node, parent), sort_key)| TreeRow {
                node: NodeId(node),
                parent: parent.map(NodeId),
                sort_key,
            })
            .collect())
    }
}

fn parent_table(rows: &[ParentRow]) -> Result<Table> {
    Table::from_columns(vec![
        Column::non_null(NODE_ID, rows.iter().map(|r| r.node.as_i64())),
        Column::new(
            PARENT_NODE_ID,
            rows.iter().map(|r| r.parent.map(NodeId::as_i64)).collect(),
        ),
    ])
}

fn sibling_table(rows: &[SiblingRow]) -> Result<Table> {
    Table::from_columns(vec![
        Column::non_null(NODE_ID, rows.iter().map(|r| r.node.as_i64())),
        Column::new(
            NEXT_NODE_ID,
            rows.iter().map(|r| r.next.map(NodeId::as_i64)).collect(),
        ),
    ])
}

const EDGE_COLUMNS: &[&str] = &[SOURCE_NODE_ID, DEST_NODE_ID];

/// `graph_reachable_dfs(edges, start)`: DFS spanning tree from one start node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReachableDfs;

impl ReachableDfs {
    const SIGNATURE: Signature = Signature {
        name: GRAPH_REACHABLE_DFS,
        parameters: &[
            Parameter {
                name: "edges",
                kind: ParameterKind::Table(EDGE_COLUMNS),
            },
            Parameter {
                name: "start_node_id",
                kind: ParameterKind::Scalar,
            },
        ],
        output: &[NODE_ID, PARENT_NODE_ID],
    };
}

impl TableFunction for ReachableDfs {
    fn signature(&self) -> &'static Signature {
        &Self::SIGNATURE
    }

    fn invoke(&self, args: &[Argument<'_>]) -> Result<Table> {
        let binder = Binder::bind(self.signature(), args)?;
        let start = binder.scalar(1)?.as_i64().map(NodeId);

        let adjacency = Adjacency::from_edges(binder.edges(0)?);
        parent_table(&dfs::reachable_dfs(&adjacency, start))
    }
}

/// `graph_reachable_dfs_multiroot(edges, roots)`: DFS spanning forest from
/// every `node_id` in `roots`, in row order. NULL roots are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReachableDfsMultiroot;

impl ReachableDfsMultiroot {
    const SIGNATURE: Signature = Signature {
        name: GRAPH_REACHABLE_DFS_MULTIROOT,
        parameters: &[
            Parameter {
                name: "edges",
                kind: ParameterKind::Table(EDGE_COLUMNS),
            },
            Parameter {
                name: "roots",
                kind: ParameterKind::Table(&[NODE_ID]),
            },
        ],
        output: &[NODE_ID, PARENT_NODE_ID],
    };
}

impl TableFunction for ReachableDfsMultiroot {
    fn signature(&self) -> &'static Signature {
        &Self::SIGNATURE
    }

    fn invoke(&self, args: &[Argument<'_>]) -> Result<Table> {
        let binder = Binder::bind(self.signature(), args)?;
        let adjacency = Adjacency::from_edges(binder.edges(0)?);
        let roots = binder
            .column(binder.table(1)?, NODE_ID)?
            .values()
            .iter()
            .filter_map(|root| root.map(NodeId));
        parent_table(&dfs::reachable_dfs_multiroot(&adjacency, roots))
    }
}

/// `graph_next_sibling(tree)`: next sibling of every node under its parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextSibling;

impl NextSibling {
    const SIGNATURE: Signature = Signature {
        name: GRAPH_NEXT_SIBLING,
        parameters: &[Parameter {
            name: "tree",
            kind: ParameterKind::Table(&[NODE_ID, NODE_PARENT_ID, SORT_KEY]),
        }],
        output: &[NODE_ID, NEXT_NODE_ID],
    };
}

impl TableFunction for NextSibling {
    fn signature(&self) -> &'static Signature {
        &Self::SIGNATURE
    }

    fn invoke(&self, args: &[Argument<'_>]) -> Result<Table> {
        let binder = Binder::bind(self.signature(), args)?;
        let groups = SiblingGroups::from_rows(binder.tree_rows(0)?);
        sibling_table(&sibling::next_sibling(&groups))
    }
}

/// Table functions by name.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<&'static str, Box<dyn TableFunction>>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FunctionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in function.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut functions: BTreeMap<&'static str, Box<dyn TableFunction>> = BTreeMap::new();
        let builtins: [Box<dyn TableFunction>; 3] = [
            Box::new(ReachableDfs),
            Box::new(ReachableDfsMultiroot),
            Box::new(NextSibling),
        ];
        for function in builtins {
            functions.insert(function.name(), function);
        }
        Self { functions }
    }

    /// Add a function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFunction`] if the name is taken.
    pub fn register(&mut self, function: Box<dyn TableFunction>) -> Result<()> {
        let name = function.name();
        if self.functions.contains_key(name) {
            return Err(Error::DuplicateFunction(name.to_string()));
        }
        self.functions.insert(name, function);
        Ok(())
    }

    /// Look up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn TableFunction> {
        self.functions.get(name).map(|function| function.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    /// Signatures of every registered function, sorted by name.
    pub fn signatures(&self) -> impl Iterator<Item = &'static Signature> + '_ {
        self.functions.values().map(|f| f.signature())
    }

    /// Resolve `name` and invoke it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFunction`] for an unregistered name, otherwise
    /// whatever the function's binding reports.
    pub fn invoke(&self, name: &str, args: &[Argument<'_>]) -> Result<Table> {
        let function = self
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        let result = function.invoke(args)?;
        debug!(function = name, rows = result.row_count(), "table function returned");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(raw: &[(i64, i64)]) -> Table {
        Table::from_columns(vec![
            Column::non_null(SOURCE_NODE_ID, raw.iter().map(|e| e.0)),
            Column::non_null(DEST_NODE_ID, raw.iter().map(|e| e.1)),
        ])
        .unwrap()
    }

    #[test]
    fn builtins_are_registered_in_name_order() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![GRAPH_NEXT_SIBLING, GRAPH_REACHABLE_DFS, GRAPH_REACHABLE_DFS_MULTIROOT]
        );
    }

    #[test]
    fn signature_display_lists_columns() {
        let shown = ReachableDfs.signature().to_string();
        assert_eq!(
            shown,
            "graph_reachable_dfs(edges TABLE(source_node_id, dest_node_id), start_node_id INTEGER) -> TABLE(node_id, parent_node_id)"
        );
    }

    #[test]
    fn table_columns_per_parameter() {
        let signature = ReachableDfsMultiroot.signature();
        assert_eq!(
            signature.table_columns(0),
            Some(&[SOURCE_NODE_ID, DEST_NODE_ID][..])
        );
        assert_eq!(signature.table_columns(1), Some(&[NODE_ID][..]));
        assert_eq!(ReachableDfs.signature().table_columns(1), None);
        assert_eq!(signature.table_columns(2), None);
    }

    #[test]
    fn unknown_function_is_rejected() {
        let err = FunctionRegistry::with_builtins()
            .invoke("graph_reachable_bfs", &[])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFunction(ref name) if name == "graph_reachable_bfs"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = FunctionRegistry::with_builtins();
        let err = registry.register(Box::new(NextSibling)).unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction(_)));
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        let table = edges(&[(1, 2)]);
        let err = ReachableDfs.invoke(&[Argument::Table(&table)]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArgumentCount {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn scalar_in_table_position_is_rejected() {
        let err = ReachableDfs
            .invoke(&[Argument::Scalar(Value::Integer(1)), Argument::Scalar(Value::Null)])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ArgumentKind {
                index: 0,
                expected: "table",
                ..
            }
        ));
    }

    #[test]
    fn missing_column_is_rejected() {
        let table = Table::from_columns(vec![Column::non_null(SOURCE_NODE_ID, [1])]).unwrap();
        let err = ReachableDfs
            .invoke(&[Argument::Table(&table), Argument::Scalar(Value::Integer(1))])
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == DEST_NODE_ID));
    }

    #[test]
    fn null_edge_endpoint_is_rejected() {
        let table = Table::from_columns(vec![
            Column::non_null(SOURCE_NODE_ID, [1, 2]),
            Column::new(DEST_NODE_ID, vec![Some(2), None]),
        ])
        .unwrap();
        let err = ReachableDfs
            .invoke(&[Argument::Table(&table), Argument::Scalar(Value::Integer(1))])
            .unwrap_err();
        assert!(matches!(err, Error::NullValue { row: 1, .. }));
    }

    #[test]
    fn empty_result_keeps_output_schema() {
        let table = edges(&[]);
        let result = ReachableDfs
            .invoke(&[Argument::Table(&table), Argument::Scalar(Value::Null)])
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(
            result.column_names().collect::<Vec<_>>(),
            vec![NODE_ID, PARENT_NODE_ID]
        );
    }

    #[test]
    fn extra_input_columns_are_ignored() {
        let table = Table::from_columns(vec![
            Column::non_null("weight", [9]),
            Column::non_null(SOURCE_NODE_ID, [1]),
            Column::non_null(DEST_NODE_ID, [2]),
        ])
        .unwrap();
        let result = ReachableDfs
            .invoke(&[Argument::Table(&table), Argument::Scalar(Value::Integer(1))])
            .unwrap();
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn multiroot_ignores_null_roots() {
        let graph = edges(&[(1, 2), (3, 4)]);
        let roots = Table::from_columns(vec![Column::new(NODE_ID, vec![None, Some(3)])]).unwrap();
        let result = ReachableDfsMultiroot
            .invoke(&[Argument::Table(&graph), Argument::Table(&roots)])
            .unwrap();
        assert_eq!(result.column(NODE_ID).unwrap().values(), &[Some(3), Some(4)]);
        assert_eq!(result.column(PARENT_NODE_ID).unwrap().values(), &[None, Some(3)]);
    }

    #[test]
    fn next_sibling_accepts_null_parents() {
        let tree = Table::from_columns(vec![
            Column::non_null(NODE_ID, [1, 2]),
            Column::new(NODE_PARENT_ID, vec![None, None]),
            Column::non_null(SORT_KEY, [2, 1]),
        ])
        .unwrap();
        let result = NextSibling.invoke(&[Argument::Table(&tree)]).unwrap();
        assert_eq!(result.column(NODE_ID).unwrap().values(), &[Some(2), Some(1)]);
        assert_eq!(result.column(NEXT_NODE_ID).unwrap().values(), &[Some(1), None]);
    }

    #[test]
    fn next_sibling_rejects_null_sort_key() {
        let tree = Table::from_columns(vec![
            Column::non_null(NODE_ID, [1]),
            Column::non_null(NODE_PARENT_ID, [0]),
            Column::new(SORT_KEY, vec![None]),
        ])
        .unwrap();
        let err = NextSibling.invoke(&[Argument::Table(&tree)]).unwrap_err();
        assert!(matches!(err, Error::NullValue { ref column, .. } if column == SORT_KEY));
    }
}
