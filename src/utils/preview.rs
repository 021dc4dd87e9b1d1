//! 日志预览工具
//! 将任意长文本压缩为单行预览，不额外分配

use std::fmt;

/// 单行预览：连续空白折叠为一个空格，超过 `max_chars` 个字符时截断并追加省略号
pub fn preview_compact(s: &str, max_chars: usize) -> impl fmt::Display + '_ {
    CompactPreview { source: s, max_chars }
}

struct CompactPreview<'a> {
    source: &'a str,
    max_chars: usize,
}

impl fmt::Display for CompactPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = 0;
        let mut in_whitespace = false;

        for ch in self.source.trim().chars() {
            let is_space = ch.is_whitespace();
            if is_space && in_whitespace {
                continue;
            }
            if written == self.max_chars {
                return f.write_str("…");
            }
            in_whitespace = is_space;
            if is_space {
                f.write_str(" ")?;
            } else {
                write!(f, "{}", ch)?;
            }
            written += 1;
        }
        Ok(())
    }
}
