//! 反向：从段落样式回推行类型
//!
//! 样式名精确命中规范剧本样式名时直接定类型；否则退回启发式，
//! 按正向分类规则的相反方向读：大小写、缩进/左边距、对齐。

use std::collections::HashMap;

use crate::models::LineType;
use crate::odf::style_table::{resolve_style, ResolvedStyle, StyleDef};
use crate::utils::{normalize_style_name, FountainConstants};

/// 左边距超过该值（磅）按缩进行对待
const INDENT_MARGIN_PT: f32 = 25.0;

pub struct StyleClassifier<'a> {
    styles: &'a HashMap<String, StyleDef>,
}

impl<'a> StyleClassifier<'a> {
    pub fn new(styles: &'a HashMap<String, StyleDef>) -> Self {
        StyleClassifier { styles }
    }

    /// 沿父链展开样式
    pub fn resolved(&self, style_name: &str) -> ResolvedStyle {
        resolve_style(self.styles, style_name)
    }

    /// 标题类样式（进入标题区的状态机信号）
    pub fn is_title_style(&self, style_name: &str) -> bool {
        normalize_style_name(style_name)
            .to_uppercase()
            .contains("TITLE")
    }

    /// 该样式是否意味着段前分页
    pub fn starts_new_page(&self, style_name: &str) -> bool {
        self.resolved(style_name).break_before
    }

    /// 从样式名、文本与行首空白推断行类型
    pub fn infer_type(&self, style_name: &str, text: &str, leading_whitespace: &str) -> LineType {
        let normalized = normalize_style_name(style_name);

        // 规范样式名直接定类型；派生样式（PB、ATi 等变体和模板自定义
        // 样式）沿父链找到第一个规范名
        let canonical = FountainConstants::style_to_type();
        let mut current = Some(normalized.clone());
        let mut depth = 0;
        while let Some(name) = current {
            if let Some(line_type) = canonical.get(name.as_str()) {
                return *line_type;
            }
            depth += 1;
            if depth >= 16 {
                break;
            }
            current = self.styles.get(&name).and_then(|def| {
                def.parent
                    .as_ref()
                    .filter(|p| **p != name)
                    .map(|p| normalize_style_name(p))
            });
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return LineType::Blank;
        }
        let resolved = self.resolved(&normalized);

        // 大写 + TO: 结尾，或右对齐样式 → 转场
        let uppercase_text =
            trimmed.chars().any(|c| c.is_alphabetic()) && trimmed.to_uppercase() == trimmed;
        if (resolved.uppercase || uppercase_text) && trimmed.ends_with("TO:") {
            return LineType::Transition;
        }
        if resolved.align.as_deref() == Some("right") {
            return LineType::Transition;
        }

        // 大写样式或大写短语 → 角色名
        if (resolved.uppercase || uppercase_text)
            && !trimmed.contains(':')
            && !trimmed.ends_with('.')
        {
            return LineType::Character;
        }

        // 缩进或左边距 → 括号说明 / 对白
        let indented = leading_whitespace.contains('\t') || leading_whitespace.len() >= 3;
        let margined = resolved.margin_left.map_or(false, |m| m > INDENT_MARGIN_PT);
        if indented || margined {
            return if trimmed.starts_with('(') {
                LineType::Parenthetical
            } else {
                LineType::Dialogue
            };
        }

        if resolved.align.as_deref() == Some("center") {
            return LineType::Centered;
        }

        LineType::Action
    }
}
