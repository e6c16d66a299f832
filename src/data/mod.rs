//! Data module - file loading, column extraction and selection

mod loader;
mod processor;
mod selection;

pub use loader::{DataLoader, FileFormat, LoaderError};
pub use processor::{AxisValues, DataProcessor, ProcessorError, ValueGroup};
pub use selection::{Axis, ColumnSelection, MAX_SELECTION};
