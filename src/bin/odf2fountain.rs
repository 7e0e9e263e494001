//! 结构化文档 → Fountain 命令行入口

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, LevelFilter};

use fountain_odf::api::convert_document_files;
use fountain_odf::models::Conf;

/// 结构化文档到 Fountain 转换器
#[derive(Parser, Debug)]
#[command(name = "odf2fountain", version, about = "结构化文档到 Fountain 转换器")]
struct Args {
    /// 输入文件，空格分隔
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// 输出文件名，仅在单个输入时有效；缺省换 .fountain 后缀
    #[arg(long)]
    output: Option<PathBuf>,

    /// 每行写出显式类型标记字符，而不是依赖启发式判断
    #[arg(long = "forcetypes")]
    force_types: bool,

    /// 启用多数 Fountain 转换器不认识的扩展标记
    #[arg(long = "extendedfountain")]
    extended_fountain: bool,

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

    if args.output.is_some() && args.files.len() != 1 {
        error!("--output 只在指定单个输入文件时有效");
        process::exit(2);
    }

    let conf = Conf {
        force_types: args.force_types,
        extended_fountain: args.extended_fountain,
        ..Conf::default()
    };

    match convert_document_files(&args.files, args.output.as_deref(), &conf).await {
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
