//! 文档装配
//!
//! 把一个或多个解析结果按输入顺序追加进文档的命名节。文件 N 的正文
//! 严格排在文件 N-1 之后，不交错；文档句柄是唯一被修改的对象，
//! 文件系统不在这里碰。

use log::debug;

use crate::error::ConvertResult;
use crate::models::{Conf, LineType, ScriptElement, SectionPlan, TextRun, TitleBlock};
use crate::odf::document::{DocParagraph, MemoryDocument, Target};
use crate::odf::style_table::StyleTable;
use crate::parser::emphasis_parser::parse_emphasis;
use crate::parser::script_parser::ParseOutput;
use crate::utils::FountainConstants;

/// 样式邻接替换表
///
/// 紧跟在特定样式之后时用变体样式，去掉多余的段前距或补上分页。
fn style_replacement(last: &str, next: &str) -> Option<&'static str> {
    match (last, next) {
        ("Title Line", "Action") => Some("Action ATi"),
        ("Title Line", "Centered") => Some("Action ATi"),
        ("Title Line", "Scene Heading") => Some("Scene Heading ATi"),
        ("Transition", "Scene Heading") => Some("Scene Heading"),
        ("Scene Heading", "Character") => Some("Character"),
        _ => None,
    }
}

/// 把解析结果装配进文档
pub fn assemble(
    inputs: Vec<ParseOutput>,
    plan: &SectionPlan,
    doc: &mut MemoryDocument,
    table: &StyleTable,
    conf: &Conf,
) -> ConvertResult<()> {
    let mut assembler = DocumentAssembler::new(doc, table, plan, conf);
    for input in inputs {
        assembler.append_input(input);
    }
    assembler.finish(plan);
    Ok(())
}

struct DocumentAssembler<'a> {
    doc: &'a mut MemoryDocument,
    table: &'a StyleTable,
    titles_target: Target,
    body_target: Target,
    last_style: String,
    last_blank: bool,
    blank_pending: bool,
    page_break_required: bool,
}

impl<'a> DocumentAssembler<'a> {
    fn new(
        doc: &'a mut MemoryDocument,
        table: &'a StyleTable,
        plan: &SectionPlan,
        conf: &Conf,
    ) -> Self {
        // 新建的空文档带一个空段落，先清掉
        doc.remove_single_blank_paragraph(&Target::Root);

        // 按计划顺序建节；除了单独命名标题节的形式，每个节后面
        // 跟一个根级空白段落作分隔
        let separators = plan.body.is_some();
        for name in plan.all_names() {
            let target = Target::Section(name.to_string());
            doc.get_or_create_section(name);
            doc.remove_single_blank_paragraph(&target);
            if separators {
                doc.append_root_separator();
            }
        }

        let titles_target = match &plan.titles {
            Some(name) => Target::Section(name.clone()),
            None => Target::Root,
        };
        let body_target = match &plan.body {
            Some(name) => Target::Section(name.clone()),
            None => Target::Root,
        };

        apply_page_setup(doc, conf);
        // 本次运行的样式表随文档保存，输出文档自洽
        doc.styles = table.styles.clone();

        DocumentAssembler {
            doc,
            table,
            titles_target,
            body_target,
            last_style: String::new(),
            last_blank: true,
            blank_pending: false,
            page_break_required: false,
        }
    }

    /// 追加一个输入的标题块与正文，状态跨输入延续
    fn append_input(&mut self, input: ParseOutput) {
        self.append_title_block(&input.title);
        for element in input.elements {
            match element.line_type {
                LineType::Blank => self.process_blank(),
                LineType::PageBreak => self.page_break(),
                _ => self.append_element(element),
            }
        }
    }

    /// 标题块渲染进标题节
    fn append_title_block(&mut self, title: &TitleBlock) {
        if title.is_empty() {
            return;
        }
        let mut last_title_style = "Title Line Centered".to_string();
        for (index, entry) in title.entries.iter().enumerate() {
            if index == 0 {
                // 第一个键成为文档标题，标记字符剥掉
                let text = if entry.key.eq_ignore_ascii_case("title") {
                    entry.values.first().cloned().unwrap_or_default()
                } else {
                    render_pair(&entry.key, entry.values.first().map(String::as_str))
                };
                let runs: Vec<TextRun> = parse_emphasis(&text)
                    .into_iter()
                    .map(|run| TextRun::plain(run.text))
                    .collect();
                self.doc
                    .append_paragraph(&self.titles_target, DocParagraph::new("Title", runs));
            } else {
                let centered = FountainConstants::centered_title_keys()
                    .iter()
                    .any(|k| entry.key.eq_ignore_ascii_case(k));
                last_title_style = if centered {
                    "Title Line Centered".to_string()
                } else {
                    "Title Line".to_string()
                };
                let line = render_pair(&entry.key, entry.values.first().map(String::as_str));
                self.doc.append_paragraph(
                    &self.titles_target,
                    DocParagraph::new(last_title_style.clone(), parse_emphasis(&line)),
                );
            }
            // 缩进续行沿用上一个标题样式
            for value in entry.values.iter().skip(1) {
                let mut runs = vec![TextRun::plain("\t")];
                runs.extend(parse_emphasis(value));
                self.doc.append_paragraph(
                    &self.titles_target,
                    DocParagraph::new(last_title_style.clone(), runs),
                );
            }
        }
        self.page_break_required = true;
        self.last_style = "Title Line".to_string();
        self.last_blank = true;
        self.blank_pending = false;
    }

    fn process_blank(&mut self) {
        self.blank_pending = !self.last_blank;
        self.last_blank = true;
    }

    fn page_break(&mut self) {
        self.page_break_required = true;
        self.last_blank = true;
        self.blank_pending = false;
    }

    /// 正文元素落成一个段落
    fn append_element(&mut self, element: ScriptElement) {
        let base = element
            .line_type
            .canonical_style_name()
            .unwrap_or("Action")
            .to_string();
        let mut local = match style_replacement(&self.last_style, &base) {
            Some(replacement) => replacement.to_string(),
            None => {
                if self.page_break_required {
                    self.table.page_break_variant(&base)
                } else {
                    base.clone()
                }
            }
        };
        if !self.table.has(&local) {
            // 变体缺失时回退基础样式
            local = base.clone();
        }
        self.page_break_required = false;

        let resolved = self.table.resolved(&local);
        if self.blank_pending {
            if !resolved.is_space_before() {
                self.doc
                    .append_paragraph(&self.body_target, DocParagraph::blank());
            }
            self.blank_pending = false;
        }

        debug!(
            "append {:?} style={} text={:?}",
            element.line_type,
            local,
            element.plain_text()
        );
        let text_empty = element.plain_text().trim().is_empty();
        self.doc.append_paragraph(
            &self.body_target,
            DocParagraph::new(local, element.text_runs),
        );

        self.last_style = element
            .line_type
            .recorded_type()
            .canonical_style_name()
            .unwrap_or("Action")
            .to_string();
        self.last_blank = resolved.is_space_after() || text_empty;
    }

    /// 收尾：收到内容的节以恰好一个空白段落结尾
    fn finish(self, plan: &SectionPlan) {
        for name in plan.all_names() {
            if let Some(section) = self.doc.section_mut(name) {
                if section.paragraphs.is_empty() {
                    continue;
                }
                while section.paragraphs.len() >= 2
                    && section.paragraphs[section.paragraphs.len() - 1].is_blank()
                    && section.paragraphs[section.paragraphs.len() - 2].is_blank()
                {
                    section.paragraphs.pop();
                }
                if section
                    .paragraphs
                    .last()
                    .map_or(false, |p| !p.is_blank())
                {
                    section.append(DocParagraph::blank());
                }
            }
        }
    }
}

/// Key: Value 对还原成一行
fn render_pair(key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("{}: {}", key, v),
        _ => format!("{}:", key),
    }
}

/// 纸张与边距：asis 时模板设置优先，显式给出时覆盖
fn apply_page_setup(doc: &mut MemoryDocument, conf: &Conf) {
    if !conf.overrides_paper_size() && !conf.overrides_margins() {
        return;
    }
    let mut page = doc.page.clone().unwrap_or_default();
    if conf.overrides_paper_size() {
        let prefix: String = conf.paper_size.chars().take(2).collect::<String>().to_uppercase();
        let (width, height) = match prefix.as_str() {
            "A4" => (595.3, 841.9),
            // US Letter
            "US" | "LE" => (612.0, 792.0),
            _ => (page.width_pt, page.height_pt),
        };
        page.width_pt = width;
        page.height_pt = height;
    }
    if conf.overrides_margins() {
        page.margin_left_pt = 108.0;
        page.margin_right_pt = 72.0;
        page.margin_top_pt = 56.7;
        page.margin_bottom_pt = 72.0;
    }
    doc.page = Some(page);
}
