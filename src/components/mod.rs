//! UI components.

pub mod soul_tree;
