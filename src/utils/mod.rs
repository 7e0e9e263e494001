pub mod fountain_constants;

pub use fountain_constants::{is_blank_line, normalize_style_name, to_points, FountainConstants};
