//! Prototype filter preparation.

pub mod polyphase;

pub use polyphase::{
    decompose, try_decompose, PolyphaseFilter, PolyphaseLayout, PolyphaseView, PolyphaseViewMut,
};
