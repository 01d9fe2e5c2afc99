mod loop_handler;

pub use loop_handler::{export_annotations, run, run_headless};
