//! Entry composition
//!
//! Renders a log tree into a [`LogEntry`] at a ceiling level. Composition is
//! pure: the tree is only read, and composing twice yields equal entries.

use super::log_entry::{is_reserved_key, LogEntry};
use super::log_level::LogLevel;
use super::log_node::{LogTree, NodeId, NodeState};

/// Compose the whole tree, starting at its root
pub fn compose(tree: &LogTree, ceiling: LogLevel) -> LogEntry {
    render(tree, LogTree::ROOT, ceiling)
}

/// Compose the subtree under `id`.
///
/// Every descendant is rendered with the same `ceiling`, whatever level the
/// descendant itself was closed at. A node that was never closed reports the
/// ceiling as its level and carries no message. Returns `None` when `id`
/// does not belong to `tree`.
pub fn compose_node(tree: &LogTree, id: NodeId, ceiling: LogLevel) -> Option<LogEntry> {
    tree.get(id)?;
    Some(render(tree, id, ceiling))
}

fn render(tree: &LogTree, id: NodeId, ceiling: LogLevel) -> LogEntry {
    let node = tree.node(id);

    let (level, message) = match node.state() {
        NodeState::Closed { level, message } => (*level, non_empty(message)),
        NodeState::Open => (ceiling, None),
    };

    let mut entry = LogEntry::new(level, node.start_time());
    entry.event = node.event().and_then(non_empty);
    entry.message = message;
    entry.fields = node
        .context()
        .visible_at(ceiling)
        .into_iter()
        .filter(|(key, _)| !is_reserved_key(key))
        .collect();
    entry.exception = node.exception().cloned();
    entry.children = node
        .children()
        .iter()
        .map(|child| render(tree, *child, ceiling))
        .collect();
    entry
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exception::ExceptionRecord;
    use crate::core::field_value::FieldValue;
    use crate::core::logger::Logger;

    #[test]
    fn test_fields_filtered_by_ceiling() {
        let mut log = Logger::new().log("login");
        log.field(LogLevel::Info, "user_id", "u-1")
            .field(LogLevel::Debug, "session", "s-9")
            .field(LogLevel::Error, "stack", "deep");

        let at_info = compose(log.tree(), LogLevel::Info);
        assert_eq!(at_info.fields.len(), 2);
        assert!(at_info.field("stack").is_none());

        let at_debug = compose(log.tree(), LogLevel::Debug);
        assert_eq!(at_debug.fields.keys().collect::<Vec<_>>(), vec!["session"]);
    }

    #[test]
    fn test_children_use_root_ceiling() {
        let mut log = Logger::new().log("sync");
        log.chain("fetch")
            .field(LogLevel::Error, "raw_response", "<html>")
            .field(LogLevel::Info, "status", 200)
            .error("upstream failed");

        let entry = compose(log.tree(), LogLevel::Info);
        let child = &entry.children[0];
        assert_eq!(child.level, LogLevel::Error);
        assert_eq!(child.message.as_deref(), Some("upstream failed"));
        assert_eq!(child.field("status"), Some(&FieldValue::Int(200)));
        assert!(child.field("raw_response").is_none());
    }

    #[test]
    fn test_unclosed_child_takes_ceiling() {
        let mut log = Logger::new().log("deploy");
        log.chain("never_closed");

        let entry = compose(log.tree(), LogLevel::Warning);
        assert_eq!(entry.children[0].level, LogLevel::Warning);
        assert!(entry.children[0].message.is_none());
        assert_eq!(entry.children[0].event.as_deref(), Some("never_closed"));
    }

    #[test]
    fn test_reserved_keys_are_dropped() {
        let mut log = Logger::new().log("shadow");
        log.field(LogLevel::Info, "message", "not mine")
            .field(LogLevel::Info, "children", 3)
            .field(LogLevel::Info, "kept", true);

        let entry = compose(log.tree(), LogLevel::Info);
        assert_eq!(entry.fields.len(), 1);
        let json = entry.to_json().unwrap();
        assert_eq!(json.matches("\"message\"").count(), 0);
    }

    #[test]
    fn test_exception_and_empty_event() {
        let mut log = Logger::new().new_log();
        log.with_exception(ExceptionRecord::new("KeyError", "'sku'"));

        let entry = compose(log.tree(), LogLevel::Error);
        assert!(entry.event.is_none());
        assert_eq!(entry.exception.as_ref().map(|e| e.type_name.as_str()), Some("KeyError"));
        assert!(entry.timestamp.is_none());
    }

    #[test]
    fn test_compose_is_repeatable() {
        let mut log = Logger::new().log("idempotent");
        log.field(LogLevel::Info, "n", 1);
        log.chain("child").field(LogLevel::Debug, "m", 2).debug("done");

        assert_eq!(
            compose(log.tree(), LogLevel::Debug),
            compose(log.tree(), LogLevel::Debug)
        );
    }

    #[test]
    fn test_compose_subtree() {
        let mut log = Logger::new().log("root");
        let id = {
            let mut child = log.chain("child");
            child.chain("grandchild").info("leaf");
            child.id()
        };

        let entry = compose_node(log.tree(), id, LogLevel::Info).unwrap();
        assert_eq!(entry.event.as_deref(), Some("child"));
        assert_eq!(entry.count(), 2);
    }
}
