//! 段落样式表
//!
//! 样式名到行类型的映射是显式传递的值，不走全局状态，多次运行或
//! 测试之间不会串模板配置。force_styles 是写时合并：模板样式与
//! 内置样式按名字合并出本次运行的样式表，内置样式在 force 时胜出，
//! 已加载的模板对象本身从不就地修改。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};
use crate::odf::document::MemoryDocument;
use crate::utils::normalize_style_name;

/// 父链解析的深度上限，防样式环
const RESOLVE_DEPTH: usize = 16;

/// 段落样式定义，只保留转换关心的属性
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uppercase: Option<bool>,
    /// left / center / right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    /// 边距，磅
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_before: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_after: Option<bool>,
}

/// 沿父链展开后的有效样式
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub uppercase: bool,
    pub align: Option<String>,
    pub margin_left: Option<f32>,
    pub margin_top: Option<f32>,
    pub margin_bottom: Option<f32>,
    pub break_before: bool,
    pub break_after: bool,
}

impl ResolvedStyle {
    /// 段前自带间距（分页或上边距超过 5 磅）时，不再需要空白段落
    pub fn is_space_before(&self) -> bool {
        self.break_before || self.margin_top.map_or(false, |m| m > 5.0)
    }

    pub fn is_space_after(&self) -> bool {
        self.break_after || self.margin_bottom.map_or(false, |m| m > 5.0)
    }
}

/// 本次运行的样式表
#[derive(Debug, Clone)]
pub struct StyleTable {
    pub styles: HashMap<String, StyleDef>,
}

impl StyleTable {
    /// 从模板与内置样式合并出运行样式表
    ///
    /// 无模板时直接使用内置样式集；有模板且未 force 时模板必须带全
    /// 必需样式，缺一个立即失败 —— 不在转换途中临时造样式。
    pub fn build(template: Option<&MemoryDocument>, force_styles: bool) -> ConvertResult<StyleTable> {
        let styles = match template {
            None => builtin_styles(),
            Some(doc) => {
                let mut merged: HashMap<String, StyleDef> = doc
                    .styles
                    .iter()
                    .map(|(name, def)| (normalize_style_name(name), def.clone()))
                    .collect();
                if force_styles {
                    for (name, def) in builtin_styles() {
                        merged.insert(name, def);
                    }
                } else {
                    for name in required_style_names() {
                        if !merged.contains_key(*name) {
                            return Err(ConvertError::TemplateStyleMissing(name.to_string()));
                        }
                    }
                }
                merged
            }
        };
        Ok(StyleTable { styles })
    }

    pub fn has(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// 有分页变体（`<样式名> PB`）时用变体，否则用基础样式
    pub fn page_break_variant(&self, base: &str) -> String {
        let variant = format!("{} PB", base);
        if self.has(&variant) {
            variant
        } else {
            base.to_string()
        }
    }

    /// 沿父链取第一个非空属性，得到有效样式
    pub fn resolved(&self, name: &str) -> ResolvedStyle {
        resolve_style(&self.styles, name)
    }
}

/// 沿父链展开样式
pub fn resolve_style(styles: &HashMap<String, StyleDef>, name: &str) -> ResolvedStyle {
    let mut bold = None;
    let mut italic = None;
    let mut underline = None;
    let mut uppercase = None;
    let mut break_before = None;
    let mut break_after = None;
    let mut align: Option<String> = None;
    let mut margin_left = None;
    let mut margin_top = None;
    let mut margin_bottom = None;

    let mut current = Some(normalize_style_name(name));
    let mut depth = 0;
    while let Some(style_name) = current {
        if depth >= RESOLVE_DEPTH {
            break;
        }
        depth += 1;
        let def = match styles.get(&style_name) {
            Some(def) => def,
            None => break,
        };
        bold = bold.or(def.bold);
        italic = italic.or(def.italic);
        underline = underline.or(def.underline);
        uppercase = uppercase.or(def.uppercase);
        break_before = break_before.or(def.break_before);
        break_after = break_after.or(def.break_after);
        align = align.or_else(|| def.align.clone());
        margin_left = margin_left.or(def.margin_left);
        margin_top = margin_top.or(def.margin_top);
        margin_bottom = margin_bottom.or(def.margin_bottom);

        current = match &def.parent {
            Some(parent) if *parent != style_name => Some(normalize_style_name(parent)),
            _ => None,
        };
    }

    ResolvedStyle {
        bold: bold.unwrap_or(false),
        italic: italic.unwrap_or(false),
        underline: underline.unwrap_or(false),
        uppercase: uppercase.unwrap_or(false),
        align,
        margin_left,
        margin_top,
        margin_bottom,
        break_before: break_before.unwrap_or(false),
        break_after: break_after.unwrap_or(false),
    }
}

/// 转换会用到的样式名，模板缺任何一个都算输入错误
pub fn required_style_names() -> &'static [&'static str] {
    &[
        "Standard",
        "Script Elements",
        "Scene Heading",
        "Action",
        "Character",
        "Parenthetical",
        "Dialogue",
        "Transition",
        "Lyrics",
        "Centered",
        "Notes",
        "Section Heading",
        "Synopsis",
        "Title",
        "Title Line",
        "Title Line Centered",
    ]
}

/// 内置样式集
///
/// 名称、父子关系和边距沿用剧本排版惯例；边距与断页属性会反过来
/// 驱动空行合成与反向推断，改动前先看两个方向的测试。
pub fn builtin_styles() -> HashMap<String, StyleDef> {
    let mut map = HashMap::new();

    map.insert("Standard".to_string(), StyleDef::default());
    map.insert(
        "Script Elements".to_string(),
        StyleDef {
            parent: Some("Standard".to_string()),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Title".to_string(),
        StyleDef {
            parent: Some("Standard".to_string()),
            bold: Some(true),
            align: Some("center".to_string()),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Scene Heading".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            uppercase: Some(true),
            margin_top: Some(10.0),
            margin_bottom: Some(10.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Action".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Character".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            uppercase: Some(true),
            margin_left: Some(158.5),
            margin_top: Some(10.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Dialogue".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            margin_left: Some(72.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Parenthetical".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            margin_left: Some(108.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Transition".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            uppercase: Some(true),
            align: Some("right".to_string()),
            margin_top: Some(10.0),
            margin_bottom: Some(10.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Lyrics".to_string(),
        StyleDef {
            parent: Some("Dialogue".to_string()),
            italic: Some(true),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Centered".to_string(),
        StyleDef {
            parent: Some("Action".to_string()),
            align: Some("center".to_string()),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Notes".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            italic: Some(true),
            margin_left: Some(36.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Section Heading".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            bold: Some(true),
            margin_top: Some(10.0),
            margin_bottom: Some(10.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Synopsis".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            italic: Some(true),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Title Line".to_string(),
        StyleDef {
            parent: Some("Script Elements".to_string()),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Title Line Centered".to_string(),
        StyleDef {
            parent: Some("Title Line".to_string()),
            margin_left: Some(144.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Title Ends".to_string(),
        StyleDef {
            parent: Some("Title Line".to_string()),
            break_after: Some(true),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Character AS".to_string(),
        StyleDef {
            parent: Some("Character".to_string()),
            margin_top: Some(0.0),
            ..StyleDef::default()
        },
    );
    // ATi 变体：紧跟标题块，去掉段前距并从这里翻开正文第一页
    map.insert(
        "Scene Heading ATi".to_string(),
        StyleDef {
            parent: Some("Scene Heading".to_string()),
            margin_top: Some(0.0),
            break_before: Some(true),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Scene Heading ATr".to_string(),
        StyleDef {
            parent: Some("Scene Heading".to_string()),
            margin_top: Some(0.0),
            ..StyleDef::default()
        },
    );
    map.insert(
        "Action ATi".to_string(),
        StyleDef {
            parent: Some("Action".to_string()),
            break_before: Some(true),
            ..StyleDef::default()
        },
    );

    // 分页变体
    for base in [
        "Scene Heading",
        "Character",
        "Action",
        "Notes",
        "Centered",
        "Parenthetical",
        "Transition",
        "Dialogue",
        "Lyrics",
    ] {
        map.insert(
            format!("{} PB", base),
            StyleDef {
                parent: Some(base.to_string()),
                break_before: Some(true),
                ..StyleDef::default()
            },
        );
    }

    map
}
