//! Log nodes and the trees they form
//!
//! A [`Log`] owns a whole tree of nodes in an arena and is bound to the
//! [`Logger`] that will dispatch it. Child nodes are reached through
//! [`NodeMut`] handles that borrow the tree. Only the root dispatches: its
//! terminal call consumes the `Log`, composes the tree and hands the entry to
//! the logger. Terminal calls on children just close them.

use super::composer;
use super::error::Result;
use super::exception::ExceptionRecord;
use super::field_value::FieldValue;
use super::log_context::ContextStore;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::logger::Logger;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Index of a node inside its [`LogTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a node. A closed node may be closed again (last call wins)
/// but never reopens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Open,
    Closed { level: LogLevel, message: String },
}

impl NodeState {
    pub fn is_closed(&self) -> bool {
        matches!(self, NodeState::Closed { .. })
    }

    pub fn level(&self) -> Option<LogLevel> {
        match self {
            NodeState::Open => None,
            NodeState::Closed { level, .. } => Some(*level),
        }
    }
}

/// One logical log statement
#[derive(Debug, Clone)]
pub struct LogNode {
    event: Option<String>,
    start_time: DateTime<Utc>,
    context: ContextStore,
    exception: Option<ExceptionRecord>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    state: NodeState,
}

impl LogNode {
    fn new(event: Option<String>, parent: Option<NodeId>) -> Self {
        Self {
            event,
            start_time: Utc::now(),
            context: ContextStore::new(),
            exception: None,
            children: Vec::new(),
            parent,
            state: NodeState::Open,
        }
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    pub fn exception(&self) -> Option<&ExceptionRecord> {
        self.exception.as_ref()
    }

    /// Child ids in chaining order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }
}

/// Arena holding every node of one log tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct LogTree {
    nodes: Vec<LogNode>,
}

impl LogTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(event: Option<String>) -> Self {
        Self {
            nodes: vec![LogNode::new(event, None)],
        }
    }

    pub fn root(&self) -> &LogNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&LogNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids handed out by this tree are always in range
    pub(crate) fn node(&self, id: NodeId) -> &LogNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut LogNode {
        &mut self.nodes[id.0]
    }

    fn push_child(&mut self, parent: NodeId, event: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(LogNode::new(Some(event), Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    fn attach<T: Serialize + ?Sized>(&mut self, id: NodeId, level: LogLevel, fields: &T) -> Result<()> {
        self.node_mut(id).context.attach(level, fields)
    }

    fn insert(&mut self, id: NodeId, level: LogLevel, key: String, value: FieldValue) {
        self.node_mut(id).context.insert(level, key, value);
    }

    fn set_exception(&mut self, id: NodeId, exception: ExceptionRecord) {
        self.node_mut(id).exception = Some(exception);
    }

    fn close(&mut self, id: NodeId, level: LogLevel, message: String) {
        self.node_mut(id).state = NodeState::Closed { level, message };
    }
}

/// Root of a log tree, bound to the logger that dispatches it.
///
/// ```
/// use rust_ctxlog::prelude::*;
///
/// let logger = Logger::builder().build();
/// let mut log = logger.log("checkout");
/// log.field(LogLevel::Info, "user_id", 42);
/// log.chain("charge_card").field(LogLevel::Debug, "gateway", "acme").info("charged");
///
/// let entry = log.compose();
/// assert_eq!(entry.children.len(), 1);
/// log.info("order placed");
/// ```
pub struct Log {
    logger: Logger,
    tree: LogTree,
}

impl Log {
    pub fn new(logger: Logger, event: Option<String>) -> Self {
        Self {
            logger,
            tree: LogTree::new(event),
        }
    }

    pub fn id(&self) -> NodeId {
        LogTree::ROOT
    }

    pub fn event(&self) -> Option<&str> {
        self.tree.root().event()
    }

    pub fn tree(&self) -> &LogTree {
        &self.tree
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Attach fields at `level`. A rejected call leaves the node unchanged.
    pub fn ctx<T: Serialize + ?Sized>(&mut self, level: LogLevel, fields: &T) -> Result<&mut Self> {
        self.tree.attach(LogTree::ROOT, level, fields)?;
        Ok(self)
    }

    pub fn debug_ctx<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<&mut Self> {
        self.ctx(LogLevel::Debug, fields)
    }

    pub fn error_ctx<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<&mut Self> {
        self.ctx(LogLevel::Error, fields)
    }

    pub fn field(
        &mut self,
        level: LogLevel,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> &mut Self {
        self.tree
            .insert(LogTree::ROOT, level, key.into(), value.into());
        self
    }

    /// Owned variant of [`Log::field`] for one-expression logging
    #[must_use]
    pub fn with_field(
        mut self,
        level: LogLevel,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.field(level, key, value);
        self
    }

    pub fn with_exception(&mut self, exception: ExceptionRecord) -> &mut Self {
        self.tree.set_exception(LogTree::ROOT, exception);
        self
    }

    pub fn exc<E: Error + ?Sized>(&mut self, err: &E) -> &mut Self {
        self.with_exception(ExceptionRecord::from_error(err))
    }

    /// Append a child node and return a handle to it
    pub fn chain(&mut self, event: impl Into<String>) -> NodeMut<'_> {
        let id = self.tree.push_child(LogTree::ROOT, event.into());
        NodeMut {
            tree: &mut self.tree,
            id,
        }
    }

    /// Re-borrow a child node. The root is only reachable through `self`.
    pub fn node(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if id == LogTree::ROOT || self.tree.get(id).is_none() {
            return None;
        }
        Some(NodeMut {
            tree: &mut self.tree,
            id,
        })
    }

    /// Render the tree without dispatching, at the default level.
    ///
    /// The root is always open here since emitting it consumes the `Log`.
    pub fn compose(&self) -> LogEntry {
        composer::compose(&self.tree, LogLevel::default())
    }

    /// Render the tree as it would be emitted at `ceiling`
    pub fn compose_at(&self, ceiling: LogLevel) -> LogEntry {
        composer::compose(&self.tree, ceiling)
    }

    /// Close the root, compose the tree at `level` and dispatch it
    pub fn emit(mut self, level: LogLevel, message: impl Into<String>) {
        self.tree.close(LogTree::ROOT, level, message.into());
        let entry = composer::compose(&self.tree, level);
        self.logger.dispatch(entry, level);
    }

    pub fn debug(self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message);
    }

    pub fn info(self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message);
    }

    pub fn warning(self, message: impl Into<String>) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message);
    }

    pub fn critical(self, message: impl Into<String>) {
        self.emit(LogLevel::Critical, message);
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("logger", &self.logger.name())
            .field("tree", &self.tree)
            .finish()
    }
}

/// Mutable handle to a child node.
///
/// Terminal calls close the node and return; the child is rendered when its
/// root is emitted.
pub struct NodeMut<'a> {
    tree: &'a mut LogTree,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &LogNode {
        self.tree.node(self.id)
    }

    pub fn ctx<T: Serialize + ?Sized>(&mut self, level: LogLevel, fields: &T) -> Result<&mut Self> {
        self.tree.attach(self.id, level, fields)?;
        Ok(self)
    }

    pub fn debug_ctx<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<&mut Self> {
        self.ctx(LogLevel::Debug, fields)
    }

    pub fn error_ctx<T: Serialize + ?Sized>(&mut self, fields: &T) -> Result<&mut Self> {
        self.ctx(LogLevel::Error, fields)
    }

    pub fn field(
        &mut self,
        level: LogLevel,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> &mut Self {
        self.tree.insert(self.id, level, key.into(), value.into());
        self
    }

    pub fn with_exception(&mut self, exception: ExceptionRecord) -> &mut Self {
        self.tree.set_exception(self.id, exception);
        self
    }

    pub fn exc<E: Error + ?Sized>(&mut self, err: &E) -> &mut Self {
        self.with_exception(ExceptionRecord::from_error(err))
    }

    /// Append a grandchild under this node
    pub fn chain(&mut self, event: impl Into<String>) -> NodeMut<'_> {
        let id = self.tree.push_child(self.id, event.into());
        NodeMut {
            tree: &mut *self.tree,
            id,
        }
    }

    pub fn emit(&mut self, level: LogLevel, message: impl Into<String>) {
        self.tree.close(self.id, level, message.into());
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message);
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.emit(LogLevel::Critical, message);
    }
}
