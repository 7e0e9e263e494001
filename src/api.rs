//! 批处理转换入口
//!
//! 单次调用处理全部输入文件。解析可以并发（解析器之间没有共享状态），
//! 装配必须按命令行给出的顺序进行，追加顺序因此是确定的。
//! 单个文件的失败只记录不中断批处理，整体退出码反映最坏的失败。

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{ConvertError, ConvertResult};
use crate::models::{Conf, SectionPlan};
use crate::odf::assembler::assemble;
use crate::odf::document::MemoryDocument;
use crate::odf::export::{convert_with_office, ExportFormat};
use crate::odf::style_table::StyleTable;
use crate::parser::script_parser::{ParseOutput, ScriptParser};
use crate::reverse::fountain_writer::document_to_fountain;

/// 单个文件的失败记录
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ConvertError,
}

/// 一次批处理的结果
#[derive(Debug, Default)]
pub struct RunReport {
    pub converted: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    /// 退出码反映最坏的失败
    pub fn exit_code(&self) -> i32 {
        if self.failures.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Fountain 文本批量转换为结构化文档
///
/// 各输入并发读取解析，结果仍按输入顺序装配：A 文件的正文全部
/// 排在 B 文件之前。保存是唯一的持久化提交点，致命错误都在它之前。
pub async fn convert_fountain_files(
    files: &[PathBuf],
    output: &Path,
    template: Option<&Path>,
    conf: &Conf,
    exports: &[ExportFormat],
) -> ConvertResult<RunReport> {
    // 节规则在读任何文件之前解析，坏规则立即失败
    let plan = SectionPlan::resolve(&conf.sections)?;

    let mut doc = match template {
        Some(path) => MemoryDocument::load_template(path)?,
        None => MemoryDocument::new(),
    };
    // 必需样式缺失在任何保存之前失败
    let table = StyleTable::build(template.map(|_| &doc), conf.force_styles)?;

    let mut handles = Vec::new();
    for path in files {
        let path = path.clone();
        let conf = conf.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let result = std::fs::read_to_string(&path)
                .map_err(|e| ConvertError::InputNotFound {
                    path: path.clone(),
                    source: e,
                })
                .map(|content| ScriptParser::new(&conf).parse(&content));
            (path, result)
        }));
    }

    let mut report = RunReport::default();
    let mut parsed: Vec<ParseOutput> = Vec::new();
    for handle in handles {
        let (path, result) = handle
            .await
            .map_err(|e| ConvertError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        match result {
            Ok(parse_output) => {
                info!("已解析 {}", path.display());
                report.converted.push(path);
                parsed.push(parse_output);
            }
            Err(error) => {
                warn!("跳过 {}: {}", path.display(), error);
                report.failures.push(FileFailure { path, error });
            }
        }
    }

    assemble(parsed, &plan, &mut doc, &table, conf)?;
    doc.save(output)?;
    info!("已保存 {}", output.display());

    // 保存之后的外部渲染：只报告，不重试
    for format in exports {
        if let Err(error) = convert_with_office(output, *format) {
            warn!("{}", error);
            report.failures.push(FileFailure {
                path: output.to_path_buf(),
                error,
            });
        }
    }
    Ok(report)
}

/// 结构化文档批量转换回 Fountain 文本
///
/// `output` 只在单个输入时有意义；缺省输出为输入文件名换 .fountain 后缀。
pub async fn convert_document_files(
    files: &[PathBuf],
    output: Option<&Path>,
    conf: &Conf,
) -> ConvertResult<RunReport> {
    let mut report = RunReport::default();
    for path in files {
        let doc = match MemoryDocument::load_template(path) {
            Ok(doc) => doc,
            Err(error) => {
                warn!("跳过 {}: {}", path.display(), error);
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
                continue;
            }
        };
        let text = document_to_fountain(&doc, conf);
        let out_path = match output {
            Some(out) => out.to_path_buf(),
            None => path.with_extension("fountain"),
        };
        match std::fs::write(&out_path, text) {
            Ok(()) => {
                info!("已写出 {}", out_path.display());
                report.converted.push(path.clone());
            }
            Err(e) => {
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error: ConvertError::Io(e),
                });
            }
        }
    }
    Ok(report)
}

/// 解析 Fountain 文本，返回 JSON 结果
pub async fn parse_fountain_text(text: String, conf: Option<Conf>) -> String {
    let conf = conf.unwrap_or_default();
    let parser = ScriptParser::new(&conf);
    let result = parser.parse(&text);
    serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string())
}
