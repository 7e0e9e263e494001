//! 保存后的外部格式导出
//!
//! 调用 headless 的 LibreOffice / OpenOffice 做实际转换，
//! 成败只看进程退出状态，不做重试。

use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{ConvertError, ConvertResult};

/// 外部渲染的目标格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// 用 headless office 把已保存的文档转换成目标格式
pub fn convert_with_office(saved: &Path, format: ExportFormat) -> ConvertResult<()> {
    let outdir = saved.parent().filter(|p| !p.as_os_str().is_empty());
    let mut command = Command::new("soffice");
    command
        .arg("--headless")
        .arg("--convert-to")
        .arg(format.as_str());
    if let Some(dir) = outdir {
        command.arg("--outdir").arg(dir);
    }
    let status = command.arg(saved).status()?;
    if status.success() {
        info!("已导出 {}: {}", format.as_str(), saved.display());
        Ok(())
    } else {
        Err(ConvertError::ExternalRenderer(format!(
            "soffice --convert-to {} 退出状态 {}",
            format.as_str(),
            status
        )))
    }
}
