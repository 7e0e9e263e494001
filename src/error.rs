use std::path::PathBuf;

use thiserror::Error;

/// 转换错误
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 输入文件缺失或不可读，仅对该文件致命，批处理继续
    #[error("输入文件不可读: {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 模板缺少必需样式且未指定 force_styles，整次运行在保存前中止
    #[error("模板缺少必需样式: {0}")]
    TemplateStyleMissing(String),

    /// 节规则字符串格式错误，启动时致命
    #[error("无效的节规则: {0:?}")]
    SectionRuleInvalid(String),

    /// 保留：强调解析器是全函数，目前不会产生该错误
    #[error("强调解析失败: {0}")]
    EmphasisFailure(String),

    /// 模板容器读取或解析失败
    #[error("模板文件错误: {0}")]
    Template(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 外部渲染器（headless office）以非零状态退出
    #[error("外部渲染器失败: {0}")]
    ExternalRenderer(String),
}

/// 转换结果
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// 错误是否在保存任何输出之前中止整次运行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::TemplateStyleMissing(_)
                | ConvertError::SectionRuleInvalid(_)
                | ConvertError::Template(_)
        )
    }
}
