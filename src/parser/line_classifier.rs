use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Conf, LineType};
use crate::utils::fountain_constants::LINE_REGEX;

/// 角色名行允许的最大长度（按字素计）
const CHARACTER_CUE_MAX: usize = 40;

/// 行分类器
///
/// 角色/对白的识别依赖上下文空行，这是交换格式规范继承下来的启发式，
/// 因此 classify 不是纯的逐行函数：需要上一行的空行状态和一行前瞻。
pub struct LineClassifier {
    extended_fountain: bool,
}

impl LineClassifier {
    pub fn new(extended_fountain: bool) -> Self {
        LineClassifier { extended_fountain }
    }

    pub fn from_conf(conf: &Conf) -> Self {
        LineClassifier::new(conf.extended_fountain)
    }

    /// 给一行正文指定语义类型，规则按优先级排列，先命中先生效
    pub fn classify(&self, line: &str, prev_blank: bool, next_line: Option<&str>) -> LineType {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineType::Blank;
        }

        // 1. 显式类型标记字符
        if let Some(line_type) = self.classify_prefix(trimmed) {
            return line_type;
        }

        // 2. 场景标题：强制点号，或 INT./EXT. 前缀且下一行为空
        if trimmed.starts_with('.') && !trimmed.starts_with("..") {
            return LineType::SceneHeading;
        }
        if LINE_REGEX["scene_prefix"].is_match(trimmed) && next_blank(next_line) {
            return LineType::SceneHeading;
        }

        // 3. 角色名：全大写短语，前后都是空行
        if prev_blank && next_blank(next_line) && is_character_cue(trimmed) {
            return LineType::Character;
        }

        // 4. 缩进行：按首字符细分对白与括号说明
        if LINE_REGEX["indent"].is_match(line) {
            return if trimmed.starts_with('(') {
                LineType::Parenthetical
            } else {
                LineType::Dialogue
            };
        }

        // 6. 转场：独立的全大写 TO: 结尾
        if prev_blank && next_blank(next_line) && trimmed.ends_with("TO:") && is_uppercase(trimmed)
        {
            return LineType::Transition;
        }

        // 7. 缺省
        LineType::Action
    }

    /// 显式标记字符的识别
    fn classify_prefix(&self, trimmed: &str) -> Option<LineType> {
        let first = trimmed.chars().next()?;
        match first {
            '!' => Some(LineType::Action),
            '@' => Some(LineType::Character),
            '~' => Some(LineType::Lyric),
            '#' => Some(LineType::Section),
            '=' => {
                if LINE_REGEX["page_break"].is_match(trimmed) {
                    Some(LineType::PageBreak)
                } else {
                    Some(LineType::Synopsis)
                }
            }
            '[' if trimmed.starts_with("[[") => Some(LineType::Note),
            '(' => Some(LineType::Parenthetical),
            '>' => {
                if trimmed.ends_with(':') {
                    Some(LineType::Transition)
                } else {
                    Some(LineType::Centered)
                }
            }
            // 非标准扩展：% 强制对白；以撇号开头的台词（'Tis 之类）
            '%' if self.extended_fountain => Some(LineType::Dialogue),
            '\'' if self.extended_fountain => Some(LineType::Dialogue),
            _ => None,
        }
    }

    /// 去掉类型标记后该元素实际携带的文本
    pub fn element_text(&self, line_type: LineType, line: &str) -> String {
        let trimmed = line.trim();
        match line_type {
            LineType::SceneHeading => {
                if trimmed.starts_with('.') && !trimmed.starts_with("..") {
                    trimmed[1..].trim().to_string()
                } else {
                    trimmed.to_string()
                }
            }
            LineType::Action => trimmed
                .strip_prefix('!')
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
            LineType::Character => trimmed
                .strip_prefix('@')
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
            LineType::Lyric => trimmed
                .strip_prefix('~')
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
            LineType::Dialogue => {
                if self.extended_fountain {
                    // 撇号开头的台词保留撇号
                    trimmed
                        .strip_prefix('%')
                        .unwrap_or(trimmed)
                        .trim()
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            }
            LineType::Transition => trimmed
                .strip_prefix('>')
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
            LineType::Centered => trimmed
                .strip_prefix('>')
                .unwrap_or(trimmed)
                .strip_suffix('<')
                .unwrap_or_else(|| trimmed.strip_prefix('>').unwrap_or(trimmed))
                .trim()
                .to_string(),
            LineType::Section => trimmed.trim_start_matches('#').trim().to_string(),
            LineType::Synopsis => trimmed
                .strip_prefix('=')
                .unwrap_or(trimmed)
                .trim()
                .to_string(),
            LineType::Note => {
                let inner = trimmed.strip_prefix("[[").unwrap_or(trimmed);
                match inner.find("]]") {
                    Some(pos) => inner[..pos].trim().to_string(),
                    None => inner.trim().to_string(),
                }
            }
            LineType::PageBreak | LineType::Blank => String::new(),
            LineType::Parenthetical => trimmed.to_string(),
        }
    }
}

fn next_blank(next_line: Option<&str>) -> bool {
    next_line.map_or(true, |l| l.trim().is_empty())
}

fn is_uppercase(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic()) && text.to_uppercase() == text
}

/// 是否符合角色名行的形态：全大写、无冒号、不以句点结尾、不过长
fn is_character_cue(text: &str) -> bool {
    is_uppercase(text)
        && !text.contains(':')
        && !text.ends_with('.')
        && text.graphemes(true).count() <= CHARACTER_CUE_MAX
}
