pub mod api;
pub mod error;
pub mod models;
pub mod odf;
pub mod parser;
pub mod reverse;
pub mod utils;

pub use error::{ConvertError, ConvertResult};

pub use models::{
    Conf,
    EmphasisFlags,
    LineType,
    ScriptElement,
    SectionPlan,
    TextRun,
    TitleBlock,
};

pub use parser::{
    parse_emphasis,
    render_emphasis,
    LineClassifier,
    ParseOutput,
    ScriptParser,
};

pub use odf::{
    assemble,
    builtin_styles,
    convert_with_office,
    DocParagraph,
    DocSection,
    ExportFormat,
    MemoryDocument,
    StyleDef,
    StyleTable,
    Target,
};

pub use reverse::{
    document_to_fountain,
    StyleClassifier,
};

pub use api::{
    convert_document_files,
    convert_fountain_files,
    parse_fountain_text,
    RunReport,
};

/// 解析 Fountain 格式文本
///
/// # Arguments
///
/// * `script` - Fountain 格式的剧本文本
/// * `config` - 配置对象
///
/// # Returns
///
/// 解析结果对象
pub fn parse(script: &str, config: &Conf) -> ParseOutput {
    let parser = ScriptParser::new(config);
    parser.parse(script)
}
