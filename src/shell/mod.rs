/// Shell integration module
///
/// Finds and parses shell history files.

pub mod history;
pub mod loader;
pub mod shells;

pub use history::{HistoryFormat, HistoryParser, HistoryRecord};
pub use loader::HistoryLoader;
pub use shells::Shell;
