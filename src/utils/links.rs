// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

/// 锚标签href属性匹配（大小写不敏感）
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<a[^>]+href=["'](.*?)["']"#).expect("valid link regex"));

/// 从标记文本中提取原始链接字符串
///
/// 尽力而为的模式匹配：不验证、不规范化，结果可能包含相对路径、
/// 协议相对链接、空字符串或畸形文本。畸形标记不会导致失败，只会
/// 产生空序列。已知局限：未加引号的href等非标准写法会被漏过。
pub fn extract_links(markup: &str) -> impl Iterator<Item = &str> {
    LINK_RE
        .captures_iter(markup)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_double_and_single_quotes() {
        let markup = r#"<a href="/a">A</a> <a href='/b'>B</a>"#;
        let links: Vec<&str> = extract_links(markup).collect();
        assert_eq!(links, vec!["/a", "/b"]);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let markup = r#"<A HREF="/upper">U</A>"#;
        let links: Vec<&str> = extract_links(markup).collect();
        assert_eq!(links, vec!["/upper"]);
    }

    #[test]
    fn test_extract_keeps_raw_values() {
        let markup = r#"<a class="x" href="../rel#frag">R</a><a href="">E</a>"#;
        let links: Vec<&str> = extract_links(markup).collect();
        assert_eq!(links, vec!["../rel#frag", ""]);
    }

    #[test]
    fn test_extract_from_malformed_markup() {
        let markup = "<a href=\"/ok\"><div><<<>>> <a nohref>none";
        let links: Vec<&str> = extract_links(markup).collect();
        assert_eq!(links, vec!["/ok"]);
    }

    #[test]
    fn test_extract_no_matches_is_empty() {
        assert_eq!(extract_links("<p>no links</p>").count(), 0);
    }

    #[test]
    fn test_extract_is_restartable() {
        let markup = r#"<a href="/a">A</a>"#;
        assert_eq!(extract_links(markup).count(), 1);
        assert_eq!(extract_links(markup).count(), 1);
    }
}
