//! 行内强调解析
//!
//! 标记表：`*` 斜体、`**` 粗体、`***` 粗斜体、`_` 下划线，转义字符 `\`。
//! 解析器从左到右扫描，对每个标记类维护开/闭状态，贪心且不回溯。
//! 斜体已打开时遇到星号串，优先按一个字符闭合斜体，所以
//! `*italics **bold** end*` 这类交叠写法不会正确嵌套 —— 这是
//! 有意保留的限制，由回归测试固定，不要悄悄"修正"。

use crate::models::{EmphasisFlags, TextRun};
use crate::utils::fountain_constants::{MARKER_ESCAPE, MARKER_STAR, MARKER_UNDERSCORE};

/// 一个尚未闭合的标记
#[derive(Debug, Clone, Copy)]
struct OpenMarker {
    marker: char,
    len: usize,
    /// 标记第一个字符在行内的字符下标
    start: usize,
}

impl OpenMarker {
    fn flags(&self) -> EmphasisFlags {
        if self.marker == MARKER_UNDERSCORE {
            return EmphasisFlags {
                underline: true,
                ..EmphasisFlags::PLAIN
            };
        }
        match self.len {
            1 => EmphasisFlags {
                italic: true,
                ..EmphasisFlags::PLAIN
            },
            2 => EmphasisFlags {
                bold: true,
                ..EmphasisFlags::PLAIN
            },
            _ => EmphasisFlags {
                bold: true,
                italic: true,
                ..EmphasisFlags::PLAIN
            },
        }
    }
}

/// 当前打开的全部标记叠加出的强调组合
fn active_flags(open: &[OpenMarker]) -> EmphasisFlags {
    let mut flags = EmphasisFlags::PLAIN;
    for marker in open {
        let f = marker.flags();
        flags.bold |= f.bold;
        flags.italic |= f.italic;
        flags.underline |= f.underline;
    }
    flags
}

/// 把累积的文本落成一个跨度；与上一个同强调的跨度合并
fn flush(spans: &mut Vec<TextRun>, text: &mut String, flags: EmphasisFlags) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.emphasis == flags {
            last.text.push_str(text);
            text.clear();
            return;
        }
    }
    spans.push(TextRun::new(std::mem::take(text), flags));
}

/// 把一行文本解析成有序的强调跨度序列
///
/// 全函数：任何输入都会终止并返回结果，最坏情况下结果不直观但无损 ——
/// 跨度文本拼接起来等于去掉标记后的行文本。行尾仍未闭合的标记连同
/// 其后的内容按原样保留为普通文本，不丢字符。
pub fn parse_emphasis(line: &str) -> Vec<TextRun> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans: Vec<TextRun> = Vec::new();
    let mut text = String::new();
    let mut open: Vec<OpenMarker> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == MARKER_ESCAPE && i + 1 < chars.len() {
            let next = chars[i + 1];
            if next == MARKER_STAR || next == MARKER_UNDERSCORE || next == MARKER_ESCAPE {
                // 转义的标记按字面输出，不切换状态
                text.push(next);
                i += 2;
                continue;
            }
        }
        if c == MARKER_STAR {
            let mut run = 0;
            while i + run < chars.len() && chars[i + run] == MARKER_STAR {
                run += 1;
            }
            let mut rem = run;
            while rem > 0 {
                // 闭合优先：最近打开、标记长度放得下的星号类先闭合，
                // 否则按剩余长度（至多 3）打开新类
                if let Some(pos) = open
                    .iter()
                    .rposition(|o| o.marker == MARKER_STAR && o.len <= rem)
                {
                    flush(&mut spans, &mut text, active_flags(&open));
                    let closed = open.remove(pos);
                    rem -= closed.len;
                } else {
                    let len = rem.min(3);
                    flush(&mut spans, &mut text, active_flags(&open));
                    open.push(OpenMarker {
                        marker: MARKER_STAR,
                        len,
                        start: i + (run - rem),
                    });
                    rem -= len;
                }
            }
            i += run;
            continue;
        }
        if c == MARKER_UNDERSCORE {
            flush(&mut spans, &mut text, active_flags(&open));
            if let Some(pos) = open.iter().rposition(|o| o.marker == MARKER_UNDERSCORE) {
                open.remove(pos);
            } else {
                open.push(OpenMarker {
                    marker: MARKER_UNDERSCORE,
                    len: 1,
                    start: i,
                });
            }
            i += 1;
            continue;
        }
        text.push(c);
        i += 1;
    }
    flush(&mut spans, &mut text, active_flags(&open));

    if let Some(earliest) = open.iter().map(|o| o.start).min() {
        // 行尾有未闭合标记：从最早未闭合的标记处回退，其前缀重新解析，
        // 其后的内容（含标记字符）按原样作为普通文本保留
        let byte = line
            .char_indices()
            .nth(earliest)
            .map(|(b, _)| b)
            .unwrap_or(line.len());
        let mut spans = parse_emphasis(&line[..byte]);
        let tail = &line[byte..];
        if !tail.is_empty() {
            let merged = match spans.last_mut() {
                Some(last) if last.emphasis.is_plain() => {
                    last.text.push_str(tail);
                    true
                }
                _ => false,
            };
            if !merged {
                spans.push(TextRun::plain(tail));
            }
        }
        return spans;
    }
    spans
}

/// 按跨度重新插入强调标记，与解析方向互逆
///
/// 每个跨度独立包裹：打开顺序 `_` `**` `*`，闭合按相反顺序，
/// 即使源跨度没有良好嵌套，输出也是合法嵌套。跨度文本里的
/// 字面标记字符会被转义，保证再次解析得到相同的跨度序列。
pub fn render_emphasis(runs: &[TextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let mut opening = String::new();
        let mut closing = String::new();
        if run.emphasis.underline {
            opening.push(MARKER_UNDERSCORE);
            closing.push(MARKER_UNDERSCORE);
        }
        if run.emphasis.bold {
            opening.push_str("**");
            closing.insert_str(0, "**");
        }
        if run.emphasis.italic {
            opening.push(MARKER_STAR);
            closing.insert(0, MARKER_STAR);
        }
        out.push_str(&opening);
        for c in run.text.chars() {
            if c == MARKER_STAR || c == MARKER_UNDERSCORE || c == MARKER_ESCAPE {
                out.push(MARKER_ESCAPE);
            }
            out.push(c);
        }
        out.push_str(&closing);
    }
    out
}
