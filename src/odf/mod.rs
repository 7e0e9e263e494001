pub mod assembler;
pub mod document;
pub mod export;
pub mod style_table;

pub use assembler::assemble;
pub use document::{DocMeta, DocNode, DocParagraph, DocSection, MemoryDocument, PageSetup, Target};
pub use export::{convert_with_office, ExportFormat};
pub use style_table::{builtin_styles, resolve_style, ResolvedStyle, StyleDef, StyleTable};
