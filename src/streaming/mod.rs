pub mod update;
pub mod reader;
pub mod stats;
pub mod evaluation;
pub mod driver;

pub use update::EdgeUpdate;
pub use reader::EdgeStreamReader;
pub use stats::{RunStats, WindowStat, TSV_HEADER};
pub use evaluation::{local_error, LocalErrorReport};
pub use driver::{run_counting, run_local_evaluation, LocalErrorRow};
