//! Hierarchical two-channel content accumulation for server-side rendering.
//!
//! A render builds a tree of [`Payload`] nodes, one per scope. Producers append
//! fragments or spawn children, possibly finishing asynchronously, and the root
//! is collected into a [`Rendered`] pair of `head` and `body` strings in
//! document order regardless of completion order.
//!
//! * [`Payload`]: tree node with append, spawn, compact, copy, and collection
//! * [`TreeState`]: id generator, style set, and [`TreeHeadState`] shared by a tree
//! * [`render`] / [`render_async`]: one-shot entry points

pub mod channel;
pub mod config;
pub mod error;
pub mod payload;
pub mod render;
pub mod state;

pub use channel::{Channel, Rendered};
pub use config::RenderOptions;
pub use error::{ConfigError, RenderError, Result};
pub use payload::{BranchLocal, Payload, Produced, Transformed};
pub use render::{RenderResult, render, render_async};
pub use state::{IdGenerator, StyleRecord, StyleSet, Title, TreeHeadState, TreeState};
