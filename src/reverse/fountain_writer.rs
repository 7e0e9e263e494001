//! 反向：把结构化文档写回剧本标记文本
//!
//! 三态区域机（起始 → 标题区 → 正文区）驱动：标题样式的段落进标题区，
//! 正文里的分页样式落成 `===`，其余按行类型规则还原前后缀与空行。
//! 空白段落只推动状态，不直接输出 —— 空行由类型规则重新合成。

use crate::models::{Conf, LineType};
use crate::odf::document::MemoryDocument;
use crate::parser::emphasis_parser::render_emphasis;
use crate::reverse::style_classifier::StyleClassifier;

/// 行类型的还原规则
struct TypeRule {
    prefix: &'static str,
    suffix: &'static str,
    blank_before: bool,
    blank_after: bool,
    /// 标记不可省略（没有标记就无法识别的类型）
    always_required: bool,
    /// 只能跟在这些类型之后
    require_before: &'static [LineType],
}

const NO_RULE: TypeRule = TypeRule {
    prefix: "",
    suffix: "",
    blank_before: false,
    blank_after: false,
    always_required: false,
    require_before: &[],
};

fn rule_for(line_type: LineType, extended_fountain: bool) -> TypeRule {
    match line_type {
        LineType::Action => TypeRule {
            prefix: "!",
            ..NO_RULE
        },
        LineType::Character => TypeRule {
            prefix: "@",
            blank_before: true,
            ..NO_RULE
        },
        LineType::Dialogue => TypeRule {
            prefix: if extended_fountain { "%" } else { "" },
            require_before: &[
                LineType::Character,
                LineType::Parenthetical,
                LineType::Dialogue,
            ],
            ..NO_RULE
        },
        LineType::Parenthetical => TypeRule {
            prefix: "(",
            suffix: ")",
            always_required: true,
            require_before: &[LineType::Character, LineType::Dialogue],
            ..NO_RULE
        },
        LineType::SceneHeading => TypeRule {
            prefix: ".",
            blank_before: true,
            blank_after: true,
            ..NO_RULE
        },
        LineType::Transition => TypeRule {
            prefix: ">",
            blank_before: true,
            blank_after: true,
            ..NO_RULE
        },
        LineType::Centered => TypeRule {
            prefix: ">",
            suffix: "<",
            always_required: true,
            ..NO_RULE
        },
        LineType::Lyric => TypeRule {
            prefix: "~",
            always_required: true,
            require_before: &[LineType::Character, LineType::Parenthetical],
            ..NO_RULE
        },
        LineType::Note => TypeRule {
            prefix: "[[",
            suffix: "]]",
            always_required: true,
            ..NO_RULE
        },
        LineType::Section => TypeRule {
            prefix: "# ",
            blank_before: true,
            blank_after: true,
            always_required: true,
            ..NO_RULE
        },
        LineType::Synopsis => TypeRule {
            prefix: "= ",
            always_required: true,
            ..NO_RULE
        },
        LineType::PageBreak | LineType::Blank => NO_RULE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Starting,
    Titles,
    Body,
}

/// 把文档按段落顺序还原成剧本标记文本
pub fn document_to_fountain(doc: &MemoryDocument, conf: &Conf) -> String {
    FountainWriter::new(doc, conf).write()
}

struct FountainWriter<'a> {
    doc: &'a MemoryDocument,
    conf: &'a Conf,
    classifier: StyleClassifier<'a>,
    titles: Vec<String>,
    body: Vec<String>,
    region: Region,
    last_blank: bool,
    last_type: Option<LineType>,
    last_character: String,
}

impl<'a> FountainWriter<'a> {
    fn new(doc: &'a MemoryDocument, conf: &'a Conf) -> Self {
        FountainWriter {
            doc,
            conf,
            classifier: StyleClassifier::new(&doc.styles),
            titles: Vec::new(),
            body: Vec::new(),
            region: Region::Starting,
            last_blank: false,
            last_type: None,
            last_character: String::new(),
        }
    }

    fn write(mut self) -> String {
        let doc = self.doc;
        for paragraph in doc.all_paragraphs() {
            let style_name = paragraph.style_name.clone();
            let resolved = self.classifier.resolved(&style_name);
            // 标记重建：按运行的强调组合重新插入标记字符
            let mut line = render_emphasis(&paragraph.runs);
            if resolved.uppercase {
                line = line.to_uppercase();
            }

            if self.classifier.is_title_style(&style_name) {
                self.region = Region::Titles;
            } else if self.classifier.starts_new_page(&style_name) {
                match self.region {
                    Region::Starting | Region::Titles => self.region = Region::Body,
                    Region::Body => {
                        if !self.body.is_empty() {
                            self.emit("===".to_string());
                        }
                    }
                }
            }

            let blank = line.trim().is_empty();
            if self.region == Region::Body {
                let line_type =
                    self.classifier
                        .infer_type(&style_name, &line, &paragraph.leading_whitespace());
                // 空白的角色段落也要走替换路径（沿用上一个说话人），
                // 其余空白段落只跳过，空行由类型规则重新合成
                if blank && line_type != LineType::Character {
                    continue;
                }
                self.output_part(line_type, line);
            } else if blank {
                if self.region != Region::Starting {
                    self.region = Region::Body;
                }
            } else {
                self.region = Region::Titles;
                self.emit_title_line(&style_name, line);
            }
        }

        let mut out = String::new();
        if !self.titles.is_empty() {
            out.push_str(&self.titles.join("\n"));
            out.push('\n');
        }
        out.push_str(&self.body.join("\n"));
        out.push('\n');
        out
    }

    /// 标题区的行：关键字缺失时补 Title:，缩进或宽边距的行补四格缩进
    fn emit_title_line(&mut self, style_name: &str, line: String) {
        let resolved = self.classifier.resolved(style_name);
        let margined = resolved.margin_left.map_or(false, |m| m > 25.0);
        let reconstructed = if line.starts_with('\t') || line.starts_with(' ') || margined {
            format!("    {}", line.trim())
        } else if line.contains(':') {
            line.trim().to_string()
        } else {
            format!("Title: {}", line.trim())
        };
        self.titles.push(reconstructed);
    }

    /// 正文行：必要时递归补前置类型，再按规则还原标记与空行
    fn output_part(&mut self, line_type: LineType, line: String) {
        let rule = rule_for(line_type, self.conf.extended_fountain);
        let mut line = line;

        // 角色名为空时沿用上一个角色（续说话人的惯例）
        if line_type == LineType::Character {
            line = line.trim().to_string();
            if line.is_empty() {
                line = self.last_character.clone();
            } else {
                self.last_character = line.clone();
            }
        }

        if (self.conf.force_types || rule.always_required)
            && !rule.prefix.is_empty()
            && !line.starts_with(rule.prefix)
        {
            line = format!("{}{}{}", rule.prefix, line.trim(), rule.suffix);
        }

        // 类型限定了能跟在谁后面，不满足时先补一个前置行
        if !rule.require_before.is_empty() {
            let satisfied = self
                .last_type
                .map_or(false, |t| rule.require_before.contains(&t));
            if !satisfied {
                self.output_part(rule.require_before[0], String::new());
            }
        }

        if rule.blank_before && !self.last_blank {
            self.emit(String::new());
        }
        self.last_type = Some(line_type);
        self.emit(line);
        if rule.blank_after {
            self.emit(String::new());
        }
    }

    fn emit(&mut self, line: String) {
        self.last_blank = line.trim().is_empty();
        self.body.push(line);
    }
}
