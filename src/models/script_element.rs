use serde::{Deserialize, Serialize};

use crate::models::LineType;

/// 强调标记组合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmphasisFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl EmphasisFlags {
    /// 无任何强调
    pub const PLAIN: EmphasisFlags = EmphasisFlags {
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

/// 共享同一种强调组合的连续文本片段
///
/// 既是强调解析器输出的跨度单位，也是文档段落中的运行单位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub emphasis: EmphasisFlags,
}

impl TextRun {
    pub fn new(text: impl Into<String>, emphasis: EmphasisFlags) -> Self {
        TextRun {
            text: text.into(),
            emphasis,
        }
    }

    /// 无强调的片段
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun::new(text, EmphasisFlags::PLAIN)
    }
}

/// 剧本的一个逻辑单元
///
/// 由正向的 ScriptParser 或反向的 StyleClassifier 创建，创建后不再修改，
/// 按值移交给 DocumentAssembler 消费。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptElement {
    /// 行类型
    pub line_type: LineType,
    /// 有序的文本片段，拼接后等于去除标记的行文本
    pub text_runs: Vec<TextRun>,
    /// 原始行，仅用于诊断输出
    pub raw_source_line: String,
}

impl ScriptElement {
    pub fn new(line_type: LineType, text_runs: Vec<TextRun>, raw_source_line: &str) -> Self {
        ScriptElement {
            line_type,
            text_runs,
            raw_source_line: raw_source_line.to_string(),
        }
    }

    /// 单个无强调片段构成的元素
    pub fn plain(line_type: LineType, text: &str, raw_source_line: &str) -> Self {
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::plain(text)]
        };
        ScriptElement::new(line_type, runs, raw_source_line)
    }

    /// 拼接全部片段（忽略强调）
    pub fn plain_text(&self) -> String {
        self.text_runs.iter().map(|r| r.text.as_str()).collect()
    }
}
