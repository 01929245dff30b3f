pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod source;
pub mod text_metrics;
pub mod view_state;
pub mod visitor;

pub use ast::Node;
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, SizingConfig, load_config};
pub use layout::{FittedText, SizingPass, TextMeasure, fit_text, size_tree};
pub use source::{SourceGen, SourceModel};
