use serde::{Deserialize, Serialize};

/// 纸张大小选项
pub const PAPER_ASIS: &str = "asis";
/// 页边距选项
pub const MARGINS_ASIS: &str = "asis";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conf {
    /// 节规则字符串，见 SectionPlan::resolve
    pub sections: String,
    /// 用内置样式覆盖模板中的同名样式（只改内存，不改模板文件）
    pub force_styles: bool,
    /// 反向输出时每行写出显式类型标记字符
    pub force_types: bool,
    /// 启用非标准扩展标记（% 强制对白等）
    pub extended_fountain: bool,
    /// 纸张大小：a4 / us / letter / asis（asis 时模板设置优先）
    pub paper_size: String,
    /// 页边距：standard / asis
    pub margins: String,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            sections: "No".to_string(),
            force_styles: false,
            force_types: false,
            extended_fountain: false,
            paper_size: PAPER_ASIS.to_string(),
            margins: "standard".to_string(),
        }
    }
}

impl Conf {
    /// 是否覆盖模板的纸张大小
    pub fn overrides_paper_size(&self) -> bool {
        !self.paper_size.eq_ignore_ascii_case(PAPER_ASIS)
    }

    /// 是否覆盖模板的页边距
    pub fn overrides_margins(&self) -> bool {
        !self.margins.eq_ignore_ascii_case(MARGINS_ASIS)
    }
}
