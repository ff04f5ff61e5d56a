pub mod check_sheet;
pub mod ishikawa;
pub mod report;
pub mod store;

pub use check_sheet::CheckSheet;
pub use ishikawa::IshikawaDiagram;
pub use report::{ProjectInfo, ReportRequest, ReportSection};
pub use store::SheetStore;
