use serde::{Deserialize, Serialize};

/// 标题块中的一个键与它的一个或多个值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleEntry {
    pub key: String,
    pub values: Vec<String>,
}

/// 单个输入剧本正文之前的元数据块（标题、作者、联系方式等）
///
/// 键保持出现顺序，缩进的后续行作为上一个键的附加值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleBlock {
    pub entries: Vec<TitleEntry>,
}

impl TitleBlock {
    pub fn new() -> Self {
        TitleBlock::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加一个键值对
    ///
    /// 第一个值固定是键所在行的内联值（可以为空），缩进续行的值排在后面。
    pub fn push(&mut self, key: &str, value: &str) {
        self.entries.push(TitleEntry {
            key: key.to_string(),
            values: vec![value.to_string()],
        });
    }

    /// 把缩进的后续行追加到最后一个键；没有键时返回 false
    pub fn append_to_last(&mut self, value: &str) -> bool {
        match self.entries.last_mut() {
            Some(entry) => {
                entry.values.push(value.to_string());
                true
            }
            None => false,
        }
    }

    /// 按键查找（不区分大小写）
    pub fn get(&self, key: &str) -> Option<&TitleEntry> {
        self.entries
            .iter()
            .find(|e| e.key.eq_ignore_ascii_case(key))
    }
}
