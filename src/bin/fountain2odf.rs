//! Fountain → 结构化文档 命令行入口

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, LevelFilter};

use fountain_odf::api::convert_fountain_files;
use fountain_odf::models::Conf;
use fountain_odf::odf::ExportFormat;

/// Fountain 到结构化文档转换器
#[derive(Parser, Debug)]
#[command(name = "fountain2odf", version, about = "Fountain 到结构化文档转换器")]
struct Args {
    /// 输入文件，空格分隔
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// 输出文件名，缺省取第一个输入换后缀
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 预装剧本样式的模板文档
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// 输出文档的节规则：No / Yes / 节名列表（如 Title,Body）
    #[arg(short = 'S', long, default_value = "No")]
    sections: String,

    /// 用内置样式覆盖模板中的同名样式（不改模板文件）
    #[arg(long = "forcestyles")]
    force_styles: bool,

    /// 保存后用 headless office 生成 PDF，需要 PATH 里有 soffice
    #[arg(long)]
    pdf: bool,

    /// 保存后用 headless office 生成 DOCX
    #[arg(long)]
    docx: bool,

    /// 纸张大小：a4 / us / letter / asis（asis 保留模板设置）
    #[arg(short, long, default_value = "asis")]
    papersize: String,

    /// 页边距：standard / asis
    #[arg(short, long, default_value = "standard")]
    margins: String,

    /// 输出开发调试信息
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let conf = Conf {
        sections: args.sections.clone(),
        force_styles: args.force_styles,
        paper_size: args.papersize.clone(),
        margins: args.margins.clone(),
        ..Conf::default()
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.files[0].with_extension("odf.json"));

    let mut exports = Vec::new();
    if args.pdf {
        exports.push(ExportFormat::Pdf);
    }
    if args.docx {
        exports.push(ExportFormat::Docx);
    }

    match convert_fountain_files(&args.files, &output, args.template.as_deref(), &conf, &exports)
        .await
    {
        Ok(report) => {
            for failure in &report.failures {
                error!("{}: {}", failure.path.display(), failure.error);
            }
            process::exit(report.exit_code());
        }
        Err(err) => {
            error!("{}", err);
            process::exit(2);
        }
    }
}
