use serde::{Deserialize, Serialize};

/// 剧本行的语义类型
///
/// 行类型集合由 Fountain 交换格式规定，是封闭的，
/// 因此用枚举而不是开放的类层次来表达。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// 场景标题
    SceneHeading,
    /// 动作描述
    Action,
    /// 角色名
    Character,
    /// 括号说明
    Parenthetical,
    /// 对白
    Dialogue,
    /// 转场
    Transition,
    /// 歌词
    Lyric,
    /// 居中文本
    Centered,
    /// 分页符
    PageBreak,
    /// 章节标题
    Section,
    /// 概要
    Synopsis,
    /// 注释
    Note,
    /// 空行
    Blank,
}

impl LineType {
    /// 该类型的文本是否携带强调标记
    pub fn carries_emphasis(&self) -> bool {
        matches!(
            self,
            LineType::Action | LineType::Dialogue | LineType::Character | LineType::Parenthetical
        )
    }

    /// 转换时使用的规范段落样式名
    ///
    /// PageBreak 与 Blank 不产生带样式的段落，返回 None。
    pub fn canonical_style_name(&self) -> Option<&'static str> {
        match self {
            LineType::SceneHeading => Some("Scene Heading"),
            LineType::Action => Some("Action"),
            LineType::Character => Some("Character"),
            LineType::Parenthetical => Some("Parenthetical"),
            LineType::Dialogue => Some("Dialogue"),
            LineType::Transition => Some("Transition"),
            LineType::Lyric => Some("Lyrics"),
            LineType::Centered => Some("Centered"),
            LineType::Section => Some("Section Heading"),
            LineType::Synopsis => Some("Synopsis"),
            LineType::Note => Some("Notes"),
            LineType::PageBreak | LineType::Blank => None,
        }
    }

    /// 记录为"上一个样式"时使用的类型
    ///
    /// Centered 实际是 Action 的特例，Lyric 是 Dialogue 的特例，
    /// 样式邻接关系按基础类型判断。
    pub fn recorded_type(&self) -> LineType {
        match self {
            LineType::Centered => LineType::Action,
            LineType::Lyric => LineType::Dialogue,
            other => *other,
        }
    }
}
