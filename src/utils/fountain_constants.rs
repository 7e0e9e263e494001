use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::LineType;

/// 强调标记字符
pub const MARKER_STAR: char = '*';
/// 下划线标记字符
pub const MARKER_UNDERSCORE: char = '_';
/// 转义字符
pub const MARKER_ESCAPE: char = '\\';

pub struct FountainConstants;

impl FountainConstants {
    /// 规范段落样式名到行类型的映射（反向推断用）
    ///
    /// 样式名在查询前先做 `_20_` 还原，见 normalize_style_name。
    pub fn style_to_type() -> HashMap<&'static str, LineType> {
        let mut map = HashMap::new();
        map.insert("Scene Heading", LineType::SceneHeading);
        map.insert("Scene", LineType::SceneHeading);
        map.insert("Action", LineType::Action);
        map.insert("Character", LineType::Character);
        map.insert("Parenthetical", LineType::Parenthetical);
        map.insert("Dialogue", LineType::Dialogue);
        map.insert("Transition", LineType::Transition);
        map.insert("Lyrics", LineType::Lyric);
        map.insert("Centered", LineType::Centered);
        map.insert("Notes", LineType::Note);
        map.insert("Section Heading", LineType::Section);
        map.insert("Synopsis", LineType::Synopsis);
        map
    }

    /// 标题块中渲染为居中样式的键
    pub fn centered_title_keys() -> [&'static str; 5] {
        ["title", "credit", "author", "authors", "source"]
    }
}

/// 把 ODF 内部样式名中的 `_20_` 还原为空格
///
/// 有的文档在段落引用里用显示名，有的用内部名，两种都要认。
pub fn normalize_style_name(name: &str) -> String {
    name.replace("_20_", " ")
}

/// 一行是否只含空白
pub fn is_blank_line(text: &str) -> bool {
    text.trim().is_empty()
}

/// 把 12pt / 2.54cm / 1.5in 之类的度量字符串换算成磅
///
/// 文档内部的度量单位并不统一，统一换算成最细的磅来比较。
pub fn to_points(value: &str) -> f32 {
    let trimmed = value.trim();
    let factor = match trimmed.get(trimmed.len().saturating_sub(2)..) {
        Some("pt") => 1.0,
        Some("pc") => 12.0,
        Some("in") => 72.0,
        Some("cm") => 28.3465,
        Some("mm") => 2.83465,
        _ => 1.0,
    };
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse::<f32>().unwrap_or(0.0) * factor
}

lazy_static! {
    /// 行级识别正则
    pub static ref LINE_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        // 标题块的 Key: Value 行
        map.insert("title_pair", Regex::new(r"^\s*([^\s:][^:]*):\s*(.*)$").unwrap());
        // 标题块里上一个键的缩进续行（制表符或 3 个以上空格）
        map.insert("title_continuation", Regex::new(r"^(?:\t+| {3,})(\S.*)$").unwrap());
        // 独立成行的分页符
        map.insert("page_break", Regex::new(r"^\s*={3,}\s*$").unwrap());
        // INT. / EXT. 场景标题前缀
        map.insert("scene_prefix", Regex::new(r"^(?:INT\.|EXT\.)\s").unwrap());
        // 对白 / 括号说明的缩进前缀
        map.insert("indent", Regex::new(r"^(?:\t+| {3,})\S").unwrap());
        map
    };
}
