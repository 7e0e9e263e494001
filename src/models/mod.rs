pub mod conf;
pub mod line_type;
pub mod script_element;
pub mod section_plan;
pub mod title_block;

pub use conf::Conf;
pub use line_type::LineType;
pub use script_element::{EmphasisFlags, ScriptElement, TextRun};
pub use section_plan::SectionPlan;
pub use title_block::{TitleBlock, TitleEntry};
