//! Workflow layer between argument parsing and the library modules

pub mod orchestration;

pub use orchestration::BuildOrchestrator;
