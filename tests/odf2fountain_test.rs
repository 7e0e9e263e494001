use fountain_odf::models::{Conf, LineType, SectionPlan, TextRun};
use fountain_odf::odf::{
    assemble, builtin_styles, DocParagraph, MemoryDocument, StyleDef, StyleTable, Target,
};
use fountain_odf::parser::ScriptParser;
use fountain_odf::reverse::{document_to_fountain, StyleClassifier};

fn parse_with(conf: &Conf, text: &str) -> fountain_odf::parser::ParseOutput {
    ScriptParser::new(conf).parse(text)
}

fn doc_with_builtin_styles() -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    doc.styles = builtin_styles();
    doc.body.clear();
    doc
}

fn push(doc: &mut MemoryDocument, style: &str, text: &str) {
    doc.append_paragraph(
        &Target::Root,
        DocParagraph::new(style, vec![TextRun::plain(text)]),
    );
}

#[test]
fn test_document_to_fountain_basic() {
    let mut doc = doc_with_builtin_styles();
    push(&mut doc, "Scene Heading PB", "INT. ROOM - DAY");
    push(&mut doc, "Character", "JOHN");
    push(&mut doc, "Dialogue", "Hello.");
    push(&mut doc, "Transition", "CUT TO:");

    let text = document_to_fountain(&doc, &Conf::default());
    println!("反向输出:\n{}", text);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec!["", "INT. ROOM - DAY", "", "JOHN", "Hello.", "", "CUT TO:", ""],
        "空行由类型规则重新合成"
    );
}

// 正文里的分页样式落成 ===
#[test]
fn test_page_break_becomes_marker() {
    let mut doc = doc_with_builtin_styles();
    push(&mut doc, "Scene Heading PB", "INT. A - DAY");
    push(&mut doc, "Action", "One.");
    push(&mut doc, "Action PB", "Two.");

    let text = document_to_fountain(&doc, &Conf::default());
    let lines: Vec<&str> = text.lines().collect();
    let pos_break = lines.iter().position(|l| *l == "===").expect("应输出 ===");
    let pos_two = lines.iter().position(|l| *l == "Two.").unwrap();
    assert!(pos_break < pos_two, "=== 应落在分页段落之前");
}

// 非规范样式走启发式：大写样式、左边距、行首空白、右对齐
#[test]
fn test_heuristic_inference() {
    let mut doc = doc_with_builtin_styles();
    doc.styles.insert(
        "Cue".to_string(),
        StyleDef {
            uppercase: Some(true),
            ..StyleDef::default()
        },
    );
    doc.styles.insert(
        "Speech".to_string(),
        StyleDef {
            margin_left: Some(80.0),
            ..StyleDef::default()
        },
    );
    doc.styles.insert(
        "Fade".to_string(),
        StyleDef {
            align: Some("right".to_string()),
            ..StyleDef::default()
        },
    );

    let classifier = StyleClassifier::new(&doc.styles);
    assert_eq!(classifier.infer_type("Cue", "JOHN", ""), LineType::Character);
    assert_eq!(
        classifier.infer_type("Speech", "Hello there.", ""),
        LineType::Dialogue
    );
    assert_eq!(
        classifier.infer_type("Speech", "(beat)", ""),
        LineType::Parenthetical
    );
    assert_eq!(
        classifier.infer_type("Standard", "   whispered words", "   "),
        LineType::Dialogue,
        "行首空白与左边距等价"
    );
    assert_eq!(
        classifier.infer_type("Fade", "DISSOLVE TO:", ""),
        LineType::Transition
    );
    assert_eq!(
        classifier.infer_type("Standard", "CUT TO:", ""),
        LineType::Transition,
        "大写 TO: 结尾的文本即使样式无信息也是转场"
    );
    assert_eq!(
        classifier.infer_type("Standard", "An ordinary line.", ""),
        LineType::Action
    );
}

// 派生样式沿父链找到规范名
#[test]
fn test_variant_styles_inherit_type() {
    let doc = {
        let mut doc = doc_with_builtin_styles();
        doc.styles.insert(
            "My Scene".to_string(),
            StyleDef {
                parent: Some("Scene Heading".to_string()),
                ..StyleDef::default()
            },
        );
        doc
    };
    let classifier = StyleClassifier::new(&doc.styles);
    assert_eq!(
        classifier.infer_type("Scene Heading ATi", "INT. A - DAY", ""),
        LineType::SceneHeading
    );
    assert_eq!(
        classifier.infer_type("Lyrics PB", "la la", ""),
        LineType::Lyric
    );
    assert_eq!(
        classifier.infer_type("My Scene", "INT. B - DAY", ""),
        LineType::SceneHeading
    );
}

// 标题区重建：缺关键字的行补 Title:，宽边距样式按缩进续行处理
#[test]
fn test_title_reconstruction() {
    let mut doc = doc_with_builtin_styles();
    push(&mut doc, "Title", "Moonrise");
    push(&mut doc, "Title Line", "Credit: Written by");
    push(&mut doc, "Title Line Centered", "Author: 林晚");
    push(&mut doc, "Scene Heading PB", "INT. A - DAY");

    let text = document_to_fountain(&doc, &Conf::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Title: Moonrise", "缺关键字的标题行补 Title:");
    assert_eq!(lines[1], "Credit: Written by");
    assert_eq!(
        lines[2],
        "    Author: 林晚",
        "宽左边距的标题样式按缩进续行还原"
    );
}

// 往返：良好嵌套的强调与常规元素，文档化后再推断应得到原序列
#[test]
fn test_element_round_trip() {
    let source = "Title: Remembrance\n\nINT. ROOM - DAY\n\nJOHN\n\n   (quietly)\n   Long time, **old** *friend*.\n\nCUT TO:\n\nEXT. STREET - NIGHT\n";
    let conf = Conf {
        sections: "Yes".to_string(),
        ..Conf::default()
    };
    let parsed = parse_with(&conf, source);
    let expected: Vec<_> = parsed
        .elements
        .iter()
        .filter(|e| e.line_type != LineType::Blank)
        .cloned()
        .collect();

    let mut doc = MemoryDocument::new();
    let plan = SectionPlan::resolve(&conf.sections).unwrap();
    let table = StyleTable::build(None, false).unwrap();
    assemble(vec![parsed], &plan, &mut doc, &table, &conf).unwrap();

    let classifier = StyleClassifier::new(&doc.styles);
    let body = doc.section("Body").expect("应有 Body 节");
    let reconstructed: Vec<(LineType, String, Vec<TextRun>)> = body
        .paragraphs
        .iter()
        .filter(|p| !p.is_blank())
        .map(|p| {
            (
                classifier.infer_type(&p.style_name, &p.text(), &p.leading_whitespace()),
                p.text(),
                p.runs.clone(),
            )
        })
        .collect();

    assert_eq!(reconstructed.len(), expected.len());
    for (got, want) in reconstructed.iter().zip(expected.iter()) {
        assert_eq!(got.0, want.line_type, "类型往返不变: {:?}", want);
        assert_eq!(got.1, want.plain_text(), "文本往返不变");
        assert_eq!(got.2, want.text_runs, "强调跨度往返不变");
    }
}

// 文本级往返：强制类型标记加扩展标记时，输出再解析得到相同元素序列
#[test]
fn test_forcetypes_text_round_trip() {
    let source = "Title: Echo\n\nINT. LAB - DAY\n\nJOHN\n\n   Results are in.\n\nCUT TO:\n\nEXT. YARD - NIGHT\n\nJANE\n\n~ la la la\n";
    let parse_conf = Conf {
        extended_fountain: true,
        sections: "Yes".to_string(),
        ..Conf::default()
    };
    let first = parse_with(&parse_conf, source);
    let expected: Vec<(LineType, String)> = first
        .elements
        .iter()
        .filter(|e| e.line_type != LineType::Blank)
        .map(|e| (e.line_type, e.plain_text()))
        .collect();

    let mut doc = MemoryDocument::new();
    let plan = SectionPlan::resolve("Yes").unwrap();
    let table = StyleTable::build(None, false).unwrap();
    assemble(vec![first], &plan, &mut doc, &table, &parse_conf).unwrap();

    let write_conf = Conf {
        force_types: true,
        extended_fountain: true,
        ..Conf::default()
    };
    let text = document_to_fountain(&doc, &write_conf);
    println!("强制标记输出:\n{}", text);

    let second = parse_with(&parse_conf, &text);
    let roundtripped: Vec<(LineType, String)> = second
        .elements
        .iter()
        .filter(|e| e.line_type != LineType::Blank)
        .map(|e| (e.line_type, e.plain_text()))
        .collect();
    assert_eq!(roundtripped, expected, "文本级往返应保持元素序列");
}

// 空角色段落沿用上一个说话人
#[test]
fn test_last_character_substitution() {
    let mut doc = doc_with_builtin_styles();
    push(&mut doc, "Scene Heading PB", "INT. A - DAY");
    push(&mut doc, "Character", "JOHN");
    push(&mut doc, "Dialogue", "First line.");
    push(&mut doc, "Character", "  ");
    push(&mut doc, "Dialogue", "Second line.");

    let text = document_to_fountain(&doc, &Conf::default());
    let johns = text.lines().filter(|l| l.trim() == "JOHN").count();
    assert_eq!(johns, 2, "空角色名应替换为上一个角色");
}

// 对白只能跟在角色/括号/对白之后，违反时自动补前置行
#[test]
fn test_require_before_inserts_cue() {
    let mut doc = doc_with_builtin_styles();
    push(&mut doc, "Scene Heading PB", "INT. A - DAY");
    push(&mut doc, "Character", "JOHN");
    push(&mut doc, "Dialogue", "Hi.");
    push(&mut doc, "Action", "He waves.");
    push(&mut doc, "Dialogue", "Bye.");

    let text = document_to_fountain(&doc, &Conf::default());
    let lines: Vec<&str> = text.lines().collect();
    let pos_bye = lines.iter().position(|l| *l == "Bye.").unwrap();
    assert_eq!(
        lines[pos_bye - 1], "JOHN",
        "动作之后的对白应先补回角色行"
    );
}
