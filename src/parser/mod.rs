pub mod emphasis_parser;
pub mod line_classifier;
pub mod script_parser;

pub use emphasis_parser::{parse_emphasis, render_emphasis};
pub use line_classifier::LineClassifier;
pub use script_parser::{ParseOutput, ScriptParser};
