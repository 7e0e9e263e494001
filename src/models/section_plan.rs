use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

/// 一次运行中输出文档的命名节布局
///
/// 由节规则字符串解析一次得到，本次运行内不可变。
/// `titles` / `body` 为 None 时内容写入文档根。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPlan {
    pub front_matter: Vec<String>,
    pub titles: Option<String>,
    pub body: Option<String>,
    pub back_matter: Vec<String>,
}

impl SectionPlan {
    /// 解析节规则迷你语言（不区分大小写）：
    ///
    /// - `No`   -> 不创建任何节
    /// - `Yes`  -> 节名 `Titles` / `Body`
    /// - 单个名字          -> 该名字用于标题节，正文写入文档根
    /// - 两个逗号分隔的名字 -> 标题节,正文节
    /// - 三个及以上        -> 第一个为前置节，其后依次是标题节、正文节，
    ///                        剩余的是后置节
    pub fn resolve(rule: &str) -> ConvertResult<SectionPlan> {
        let trimmed = rule.trim();
        if trimmed.is_empty() {
            return Err(ConvertError::SectionRuleInvalid(rule.to_string()));
        }
        if trimmed.eq_ignore_ascii_case("no") {
            return Ok(SectionPlan::default());
        }
        if trimmed.eq_ignore_ascii_case("yes") {
            return Ok(SectionPlan {
                front_matter: Vec::new(),
                titles: Some("Titles".to_string()),
                body: Some("Body".to_string()),
                back_matter: Vec::new(),
            });
        }

        let names: Vec<String> = trimmed.split(',').map(|n| n.trim().to_string()).collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(ConvertError::SectionRuleInvalid(rule.to_string()));
        }

        let plan = match names.len() {
            1 => SectionPlan {
                front_matter: Vec::new(),
                titles: Some(names[0].clone()),
                body: None,
                back_matter: Vec::new(),
            },
            2 => SectionPlan {
                front_matter: Vec::new(),
                titles: Some(names[0].clone()),
                body: Some(names[1].clone()),
                back_matter: Vec::new(),
            },
            _ => SectionPlan {
                front_matter: vec![names[0].clone()],
                titles: Some(names[1].clone()),
                body: Some(names[2].clone()),
                back_matter: names[3..].to_vec(),
            },
        };
        Ok(plan)
    }

    /// 是否创建了任何命名节
    pub fn has_sections(&self) -> bool {
        self.titles.is_some()
            || self.body.is_some()
            || !self.front_matter.is_empty()
            || !self.back_matter.is_empty()
    }

    /// 计划中全部节名，按创建顺序
    pub fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for n in &self.front_matter {
            names.push(n);
        }
        if let Some(t) = &self.titles {
            names.push(t);
        }
        if let Some(b) = &self.body {
            names.push(b);
        }
        for n in &self.back_matter {
            names.push(n);
        }
        names
    }
}
