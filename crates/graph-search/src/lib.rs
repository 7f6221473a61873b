//! Graph traversal table functions over columnar relations.
//!
//! Two stateless traversals, each building its adjacency index from the
//! input relation on every call:
//!
//! - [`dfs`]: reachability depth-first search producing a spanning-forest
//!   `(node_id, parent_node_id)` relation
//! - [`sibling`]: next-sibling resolution producing a
//!   `(node_id, next_node_id)` relation
//!
//! Both can be driven directly with typed rows, or through the
//! [`FunctionRegistry`] with [`Table`] arguments the way a query engine
//! would invoke them.
//!
//! ```
//! use graph_search::{Argument, Column, FunctionRegistry, Table, Value};
//!
//! let edges = Table::from_columns(vec![
//!     Column::non_null("source_node_id", [5, 10]),
//!     Column::non_null("dest_node_id", [10, 10]),
//! ])?;
//!
//! let registry = FunctionRegistry::with_builtins();
//! let result = registry.invoke(
//!     "graph_reachable_dfs",
//!     &[Argument::Table(&edges), Argument::Scalar(Value::Integer(5))],
//! )?;
//!
//! assert_eq!(result.column("node_id").unwrap().values(), &[Some(5), Some(10)]);
//! assert_eq!(result.column("parent_node_id").unwrap().values(), &[None, Some(5)]);
//! # Ok::<(), graph_search::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod adjacency;
pub mod dfs;
pub mod error;
pub mod function;
pub mod sibling;
pub mod table;
pub mod types;

pub use adjacency::{Adjacency, SiblingGroup, SiblingGroups};
pub use dfs::{reachable_dfs, reachable_dfs_multiroot};
pub use error::{Error, Result};
pub use function::{
    Argument, FunctionRegistry, NextSibling, Parameter, ParameterKind, ReachableDfs,
    ReachableDfsMultiroot, Signature, TableFunction, columns,
};
pub use sibling::next_sibling;
pub use table::{Column, Table, Value};
pub use types::{Edge, NodeId, ParentRow, SiblingRow, TreeRow};
