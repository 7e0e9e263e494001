//! 内存中的结构化文档模型
//!
//! 容器格式（ODF 的 zip/XML 封装）是外部协作者，这里只保留转换引擎
//! 需要的文档句柄操作：建段落、按名取节、追加、判空、读模板、保存。
//! 模型整体用 JSON 持久化，真正的容器后端在同一组操作后面替换。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConvertResult;
use crate::models::TextRun;
use crate::odf::style_table::StyleDef;

/// 文档段落：样式名加有序的文本运行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocParagraph {
    pub style_name: String,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl DocParagraph {
    pub fn new(style_name: impl Into<String>, runs: Vec<TextRun>) -> Self {
        DocParagraph {
            style_name: style_name.into(),
            runs,
        }
    }

    /// 空白分隔段落（单个空格，缺省样式）
    pub fn blank() -> Self {
        DocParagraph::new("Standard", vec![TextRun::plain(" ")])
    }

    /// 拼接全部运行的文本
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// 段首的空白字符
    pub fn leading_whitespace(&self) -> String {
        self.text().chars().take_while(|c| c.is_whitespace()).collect()
    }
}

/// 文档中一个命名的、可独立寻址的区域
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocSection {
    pub name: String,
    #[serde(default)]
    pub paragraphs: Vec<DocParagraph>,
}

impl DocSection {
    pub fn new(name: impl Into<String>) -> Self {
        DocSection {
            name: name.into(),
            paragraphs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn append(&mut self, paragraph: DocParagraph) {
        self.paragraphs.push(paragraph);
    }
}

/// 文档主体的顶层节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocNode {
    Paragraph(DocParagraph),
    Section(DocSection),
}

/// 页面设置（磅）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
    pub margin_top_pt: f32,
    pub margin_bottom_pt: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        // A4、标准剧本边距
        PageSetup {
            width_pt: 595.3,
            height_pt: 841.9,
            margin_left_pt: 108.0,
            margin_right_pt: 72.0,
            margin_top_pt: 56.7,
            margin_bottom_pt: 72.0,
        }
    }
}

/// 文档元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub generator: String,
    pub created: DateTime<Utc>,
}

impl Default for DocMeta {
    fn default() -> Self {
        DocMeta {
            generator: concat!("fountain-odf/", env!("CARGO_PKG_VERSION")).to_string(),
            created: Utc::now(),
        }
    }
}

/// 段落追加的目标：文档根或某个命名节
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Root,
    Section(String),
}

/// 一次运行期间存活的文档句柄，拥有全部段落与节
///
/// 单一所有者：DocumentAssembler 是唯一的修改方。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDocument {
    #[serde(default)]
    pub styles: HashMap<String, StyleDef>,
    #[serde(default)]
    pub body: Vec<DocNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSetup>,
    #[serde(default)]
    pub meta: DocMeta,
}

impl MemoryDocument {
    /// 新建空文档
    ///
    /// 与文字处理器新建的空文档一样含一个空段落，装配前按需删除。
    pub fn new() -> Self {
        let mut styles = HashMap::new();
        styles.insert("Standard".to_string(), StyleDef::default());
        MemoryDocument {
            styles,
            body: vec![DocNode::Paragraph(DocParagraph::blank())],
            page: None,
            meta: DocMeta::default(),
        }
    }

    /// 读取模板文档
    pub fn load_template(path: &Path) -> ConvertResult<MemoryDocument> {
        let content = fs::read_to_string(path)?;
        let doc = serde_json::from_str(&content)?;
        Ok(doc)
    }

    /// 保存文档，唯一的持久化提交点
    pub fn save(&self, path: &Path) -> ConvertResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 按名查找节，不存在时在文档末尾创建
    pub fn get_or_create_section(&mut self, name: &str) -> &mut DocSection {
        let pos = self.body.iter().position(|node| {
            matches!(node, DocNode::Section(section) if section.name == name)
        });
        let pos = match pos {
            Some(pos) => pos,
            None => {
                self.body.push(DocNode::Section(DocSection::new(name)));
                self.body.len() - 1
            }
        };
        match &mut self.body[pos] {
            DocNode::Section(section) => section,
            DocNode::Paragraph(_) => unreachable!("section position always holds a section"),
        }
    }

    pub fn section(&self, name: &str) -> Option<&DocSection> {
        self.body.iter().find_map(|node| match node {
            DocNode::Section(section) if section.name == name => Some(section),
            _ => None,
        })
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut DocSection> {
        self.body.iter_mut().find_map(|node| match node {
            DocNode::Section(section) if section.name == name => Some(section),
            _ => None,
        })
    }

    /// 目标中当前的段落（根目标只数顶层段落）
    pub fn target_paragraphs(&self, target: &Target) -> Vec<&DocParagraph> {
        match target {
            Target::Root => self
                .body
                .iter()
                .filter_map(|node| match node {
                    DocNode::Paragraph(p) => Some(p),
                    DocNode::Section(_) => None,
                })
                .collect(),
            Target::Section(name) => self
                .section(name)
                .map(|s| s.paragraphs.iter().collect())
                .unwrap_or_default(),
        }
    }

    /// 目标的现有内容只是一个空白段落时，先删掉它
    pub fn remove_single_blank_paragraph(&mut self, target: &Target) {
        match target {
            Target::Root => {
                let paragraphs: Vec<usize> = self
                    .body
                    .iter()
                    .enumerate()
                    .filter_map(|(i, node)| match node {
                        DocNode::Paragraph(_) => Some(i),
                        DocNode::Section(_) => None,
                    })
                    .collect();
                if paragraphs.len() == 1 {
                    if let DocNode::Paragraph(p) = &self.body[paragraphs[0]] {
                        if p.is_blank() {
                            self.body.remove(paragraphs[0]);
                        }
                    }
                }
            }
            Target::Section(name) => {
                if let Some(section) = self.section_mut(name) {
                    if section.paragraphs.len() == 1 && section.paragraphs[0].is_blank() {
                        section.paragraphs.clear();
                    }
                }
            }
        }
    }

    /// 向目标追加一个段落
    pub fn append_paragraph(&mut self, target: &Target, paragraph: DocParagraph) {
        match target {
            Target::Root => self.body.push(DocNode::Paragraph(paragraph)),
            Target::Section(name) => self.get_or_create_section(name).append(paragraph),
        }
    }

    /// 节之间的根级空白分隔段落，方便后续手工编辑
    pub fn append_root_separator(&mut self) {
        self.body.push(DocNode::Paragraph(DocParagraph::blank()));
    }

    /// 全部段落按文档顺序展开（节内段落就地展开）
    pub fn all_paragraphs(&self) -> Vec<&DocParagraph> {
        let mut out = Vec::new();
        for node in &self.body {
            match node {
                DocNode::Paragraph(p) => out.push(p),
                DocNode::Section(s) => out.extend(s.paragraphs.iter()),
            }
        }
        out
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}
