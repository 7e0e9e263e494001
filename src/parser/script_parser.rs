use serde::Serialize;

use crate::models::{Conf, LineType, ScriptElement, TextRun, TitleBlock};
use crate::parser::emphasis_parser::parse_emphasis;
use crate::parser::line_classifier::LineClassifier;
use crate::utils::fountain_constants::LINE_REGEX;
use crate::utils::is_blank_line;

/// 单个输入剧本的解析结果
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    /// 正文之前的标题块
    pub title: TitleBlock,
    /// 有序的剧本元素
    pub elements: Vec<ScriptElement>,
}

/// 剧本文本解析器
///
/// 逐行驱动 LineClassifier，携带强调的行再经 EmphasisParser 拆成跨度。
/// 对畸形输入从不失败，最坏情况下所有行都成为 Action。
pub struct ScriptParser {
    classifier: LineClassifier,
}

impl ScriptParser {
    pub fn new(conf: &Conf) -> Self {
        ScriptParser {
            classifier: LineClassifier::from_conf(conf),
        }
    }

    pub fn parse(&self, text: &str) -> ParseOutput {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        let mut idx = 0;

        // 跳过文件开头的空行
        while idx < lines.len() && is_blank_line(lines[idx]) {
            idx += 1;
        }

        // 第一个非空行是 Key: Value 时进入标题块
        let mut title = TitleBlock::new();
        if idx < lines.len() && LINE_REGEX["title_pair"].is_match(lines[idx]) {
            idx = self.parse_title_block(&lines, idx, &mut title);
        }

        let mut elements: Vec<ScriptElement> = Vec::new();
        let mut prev_blank = true;
        while idx < lines.len() {
            let line = lines[idx];
            let next = lines.get(idx + 1).copied();
            let line_type = self.classifier.classify(line, prev_blank, next);
            match line_type {
                LineType::Blank => {
                    // 连续空行折叠成一个
                    let last_blank = matches!(
                        elements.last(),
                        Some(e) if e.line_type == LineType::Blank
                    );
                    if !last_blank {
                        elements.push(ScriptElement::plain(LineType::Blank, "", line));
                    }
                    prev_blank = true;
                }
                LineType::PageBreak => {
                    elements.push(ScriptElement::plain(LineType::PageBreak, "", line));
                    prev_blank = true;
                }
                _ => {
                    let text = self.classifier.element_text(line_type, line);
                    let runs = if line_type.carries_emphasis() {
                        parse_emphasis(&text)
                    } else if text.is_empty() {
                        Vec::new()
                    } else {
                        vec![TextRun::plain(text.as_str())]
                    };
                    elements.push(ScriptElement::new(line_type, runs, line));
                    prev_blank = false;
                }
            }
            idx += 1;
        }

        ParseOutput { title, elements }
    }

    /// 提取标题块，返回正文开始的行号
    ///
    /// 标题块到第一个空行或第一个既不是键值对也不是缩进续行的行为止；
    /// 终止的空行被消费，非标题行留给正文。
    fn parse_title_block(&self, lines: &[&str], mut idx: usize, title: &mut TitleBlock) -> usize {
        while idx < lines.len() {
            let line = lines[idx];
            if is_blank_line(line) {
                idx += 1;
                break;
            }
            if let Some(caps) = LINE_REGEX["title_pair"].captures(line) {
                let key = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                title.push(key, value);
            } else if let Some(caps) = LINE_REGEX["title_continuation"].captures(line) {
                let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if !title.append_to_last(value) {
                    break;
                }
            } else {
                break;
            }
            idx += 1;
        }
        idx
    }
}
