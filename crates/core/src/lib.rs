// Core types shared by the engine, client and CLI

pub mod selection;

pub use selection::{CellPosition, CellSelection, Range};
