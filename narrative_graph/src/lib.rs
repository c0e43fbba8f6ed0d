//! # Narrative Graph
//!
//! Editor core for branching, timed narrative content. Authors place typed
//! nodes (dialogue lines, choices, conditions, effects and timed events such
//! as emails or meetings) on a canvas and wire them into a directed flow
//! graph. This crate owns the graph and every rule that keeps it consistent;
//! drawing, persistence and property panels are host collaborators.
//!
//! ## Core Components
//!
//! - **graph**: Nodes, ports, connections and the [`GraphStore`], the only writer
//! - **nodes**: The closed set of node variants and their port generation rules
//! - **history**: Snapshot-based undo/redo
//! - **record**: The portable JSON record and import reporting
//! - **editor**: The [`Editor`] facade with gestures, quick-add, keyboard and selection
//! - **render**: Adapter drawing editor state onto a host [`DrawSurface`]
//!
//! ## Design Philosophy
//!
//! - **Single writer**: All mutations go through validated store operations
//! - **Explicit outcomes**: Operations return what happened; logging goes through `tracing`
//! - **Render-free model**: The graph never depends on a drawing context

pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod geometry;
pub mod graph;
pub mod history;
pub mod nodes;
pub mod record;
pub mod render;

pub use config::{EditorConfig, LayoutConfig, QuickAddConfig};
pub use editor::*;
pub use error::{ConfigError, GraphError, IntegrityError, RecordError, Result};
pub use events::*;
pub use graph::*;
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use nodes::*;
pub use record::*;
pub use render::{render_editor, DrawSurface, Tone};
