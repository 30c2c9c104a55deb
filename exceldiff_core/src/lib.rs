pub mod aggregator;
pub mod classifier;
pub mod comparator;
pub mod engine;
pub mod matcher;
pub mod normalize;
pub mod reader;
pub mod render;

pub use comparator::CellComparator;
pub use engine::WorksheetDiffEngine;
pub use matcher::{MatchDecision, RowMatcher};
#[cfg(feature = "excel")]
pub use reader::ExcelReader;
pub use reader::{CsvReader, LoadedSheet, ReaderRegistry, SheetReader};
#[cfg(feature = "excel")]
pub use render::XlsxRenderer;
pub use render::{CsvRenderer, TextRenderer};
