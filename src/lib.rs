pub mod driver;
pub mod parser;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use parser::load_script;
pub use report::show_report;
pub use runner::run_conversation;
