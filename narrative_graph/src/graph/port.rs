//! Ports - attachment points on nodes.

use serde::{Deserialize, Serialize};

use super::PortId;

/// What travels through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    /// Narrative/control order.
    #[default]
    Flow,
    /// Reserved for value ports. No variant uses it yet.
    Data,
}

/// Which of a node's two port lists a port belongs to.
///
/// This is derived from list membership and never stored on the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSide {
    Input,
    Output,
}

impl PortSide {
    pub fn opposite(&self) -> Self {
        match self {
            PortSide::Input => PortSide::Output,
            PortSide::Output => PortSide::Input,
        }
    }
}

/// A port on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,

    #[serde(default)]
    pub kind: PortKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Port {
    /// Create an unlabeled flow port.
    pub fn flow(id: impl Into<PortId>) -> Self {
        Self {
            id: id.into(),
            kind: PortKind::Flow,
            label: None,
        }
    }

    /// Set the port label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_record_shape() {
        let port = Port::flow("out").with_label("Next");
        let json = serde_json::to_value(&port).unwrap();
        assert_eq!(json, serde_json::json!({"id": "out", "kind": "flow", "label": "Next"}));

        let bare = serde_json::to_value(Port::flow("in")).unwrap();
        assert!(bare.get("label").is_none());
    }

    #[test]
    fn test_port_kind_defaults_to_flow() {
        let port: Port = serde_json::from_str(r#"{"id": "in"}"#).unwrap();
        assert_eq!(port.kind, PortKind::Flow);
    }
}
