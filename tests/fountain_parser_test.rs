use std::fs;
use std::path::Path;

use fountain_odf::models::{Conf, LineType};
use fountain_odf::parser::{LineClassifier, ScriptParser};

fn types(elements: &[fountain_odf::models::ScriptElement]) -> Vec<LineType> {
    elements
        .iter()
        .filter(|e| e.line_type != LineType::Blank)
        .map(|e| e.line_type)
        .collect()
}

#[test]
fn test_sample_script_parsing() {
    let script_path = Path::new("tests/test_data/sunset.fountain");
    let script = fs::read_to_string(script_path).expect("无法读取测试文件");

    let parser = ScriptParser::new(&Conf::default());
    let result = parser.parse(&script);

    println!("标题块: {:?}", result.title);
    for element in &result.elements {
        println!("- {:?}: {:?}", element.line_type, element.plain_text());
    }

    // 标题块
    assert_eq!(result.title.entries.len(), 5, "应解析出 5 个标题键");
    assert_eq!(result.title.entries[0].key, "Title");
    assert_eq!(result.title.entries[0].values, vec!["黄昏之约"]);
    let contact = result.title.get("contact").expect("应包含 Contact 键");
    assert_eq!(
        contact.values,
        vec!["", "producer@example.com", "香港干诺道中 200 号"],
        "缩进续行应归入上一个键"
    );

    // 正文类型序列
    assert_eq!(
        types(&result.elements),
        vec![
            LineType::Action,       // FADE IN:
            LineType::SceneHeading, // INT. TEAHOUSE - DAY
            LineType::Action,
            LineType::Character,    // JOHN
            LineType::Parenthetical,
            LineType::Dialogue,
            LineType::Character,    // @顾清
            LineType::Dialogue,
            LineType::Transition,   // CUT TO:
            LineType::SceneHeading, // EXT. HARBOUR - NIGHT
            LineType::Lyric,
            LineType::Note,
            LineType::PageBreak,    // ===
            LineType::Centered,     // > THE END <
        ]
    );

    // 标记字符已剥掉
    let character = result
        .elements
        .iter()
        .find(|e| e.line_type == LineType::Character && e.plain_text() == "顾清")
        .expect("应包含角色 '顾清'");
    assert_eq!(character.raw_source_line, "@顾清");

    // 强调跨度只出现在携带强调的类型里
    let action = result
        .elements
        .iter()
        .find(|e| e.plain_text().contains("ceiling fan"))
        .expect("应包含吊扇的动作行");
    assert!(
        action.text_runs.iter().any(|r| r.emphasis.italic),
        "动作行里的 *Steam* 应成为斜体跨度"
    );
    let dialogue = result
        .elements
        .iter()
        .find(|e| e.plain_text().contains("old friend"))
        .expect("应包含 JOHN 的对白");
    assert!(
        dialogue.text_runs.iter().any(|r| r.emphasis.bold),
        "对白里的 **old friend** 应成为粗体跨度"
    );

    // 居中行剥掉两侧标记
    let centered = result
        .elements
        .iter()
        .find(|e| e.line_type == LineType::Centered)
        .expect("应包含居中行");
    assert_eq!(centered.plain_text(), "THE END");
}

// 分类边界：全大写行前后都是空行才是角色名，
// 下一行非空时同样的文本是动作
#[test]
fn test_character_requires_following_blank() {
    let classifier = LineClassifier::new(false);
    assert_eq!(
        classifier.classify("MR SMITH", true, Some("")),
        LineType::Character
    );
    assert_eq!(
        classifier.classify("MR SMITH", true, None),
        LineType::Character
    );
    assert_eq!(
        classifier.classify("MR SMITH", true, Some("Hello there.")),
        LineType::Action
    );
    assert_eq!(
        classifier.classify("MR SMITH", false, Some("")),
        LineType::Action,
        "上一行非空时不是角色名"
    );
}

#[test]
fn test_scene_heading_rules() {
    let classifier = LineClassifier::new(false);
    assert_eq!(
        classifier.classify(".inside the garage", false, Some("x")),
        LineType::SceneHeading,
        "强制点号不要求空行上下文"
    );
    assert_eq!(
        classifier.classify("...an ellipsis line", true, Some("")),
        LineType::Action,
        "省略号不是场景标题"
    );
    assert_eq!(
        classifier.classify("INT. HOUSE - DAY", true, Some("")),
        LineType::SceneHeading
    );
    assert_eq!(
        classifier.classify("INT. HOUSE - DAY", true, Some("Some action.")),
        LineType::Action,
        "INT. 前缀要求下一行为空"
    );
}

#[test]
fn test_forced_prefixes() {
    let classifier = LineClassifier::new(false);
    assert_eq!(classifier.classify("!loud action", false, Some("x")), LineType::Action);
    assert_eq!(classifier.classify("@McAVOY", false, Some("x")), LineType::Character);
    assert_eq!(classifier.classify("~ la la la", false, Some("x")), LineType::Lyric);
    assert_eq!(classifier.classify("# Act One", false, Some("x")), LineType::Section);
    assert_eq!(classifier.classify("= wrap up the heist", false, Some("x")), LineType::Synopsis);
    assert_eq!(classifier.classify("===", false, Some("x")), LineType::PageBreak);
    assert_eq!(classifier.classify("=====", false, Some("x")), LineType::PageBreak);
    assert_eq!(classifier.classify("[[production note]]", false, Some("x")), LineType::Note);
    assert_eq!(classifier.classify("(beat)", false, Some("x")), LineType::Parenthetical);
    assert_eq!(classifier.classify("> FADE OUT:", false, Some("x")), LineType::Transition);
    assert_eq!(classifier.classify("> centered <", false, Some("x")), LineType::Centered);
}

#[test]
fn test_extended_prefixes_gated() {
    let standard = LineClassifier::new(false);
    let extended = LineClassifier::new(true);
    assert_eq!(standard.classify("%forced dialogue", false, Some("x")), LineType::Action);
    assert_eq!(extended.classify("%forced dialogue", false, Some("x")), LineType::Dialogue);
    assert_eq!(extended.classify("'Tis but a scratch.", false, Some("x")), LineType::Dialogue);
}

#[test]
fn test_indented_dialogue_and_parenthetical() {
    let classifier = LineClassifier::new(false);
    assert_eq!(classifier.classify("   hello there", false, Some("x")), LineType::Dialogue);
    assert_eq!(classifier.classify("\thello there", false, Some("x")), LineType::Dialogue);
    assert_eq!(classifier.classify("   (beat)", false, Some("x")), LineType::Parenthetical);
    assert_eq!(
        classifier.classify("  two spaces only", false, Some("x")),
        LineType::Action,
        "不足三个空格不算缩进"
    );
}

#[test]
fn test_transition_boundary() {
    let classifier = LineClassifier::new(false);
    assert_eq!(classifier.classify("CUT TO:", true, Some("")), LineType::Transition);
    assert_eq!(
        classifier.classify("cut to:", true, Some("")),
        LineType::Action,
        "转场必须全大写"
    );
    assert_eq!(
        classifier.classify("CUT TO:", false, Some("")),
        LineType::Action,
        "转场要求独立成段"
    );
}

// 没有标题块的文件直接进入正文
#[test]
fn test_missing_title_block() {
    let parser = ScriptParser::new(&Conf::default());
    let result = parser.parse("INT. ROOM - DAY\n\nAction here.\n");
    assert!(result.title.is_empty());
    assert_eq!(
        types(&result.elements),
        vec![LineType::SceneHeading, LineType::Action]
    );
}

// 畸形输入从不失败，最坏情况全部是 Action
#[test]
fn test_worst_case_is_action() {
    let parser = ScriptParser::new(&Conf::default());
    let result = parser.parse("}{|[;\nplain line\n\u{0}binary-ish\n");
    assert!(result
        .elements
        .iter()
        .filter(|e| e.line_type != LineType::Blank)
        .all(|e| e.line_type == LineType::Action));
}

#[test]
fn test_consecutive_blanks_collapse() {
    let parser = ScriptParser::new(&Conf::default());
    let result = parser.parse("one\n\n\n\ntwo\n");
    let blanks = result
        .elements
        .iter()
        .filter(|e| e.line_type == LineType::Blank)
        .count();
    assert_eq!(blanks, 1, "连续空行应折叠成一个");
}
