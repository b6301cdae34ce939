pub mod finding;
pub mod scan_result;
pub mod history;

pub use finding::*;
pub use scan_result::*;
pub use history::*;
