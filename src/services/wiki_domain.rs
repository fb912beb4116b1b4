//! 站点域名解析 - 业务能力层
//!
//! 把内部站点标识（数据库名风格，如 `enwiki`、`zh_classicalwiki`）
//! 解析为公开域名，并拼接差异页 / 历史页链接。
//!
//! 纯函数，无 I/O：任何输入都返回一个格式合法的主机名，绝不 panic。
//! 无法识别的标识按默认规则兜底，产出的域名可能无意义但格式正确。

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use phf::phf_map;

/// 特殊站点覆盖表
///
/// 这些标识不符合"语言码 + 项目后缀"的规律，必须精确映射，
/// 且优先级高于后缀匹配和默认规则。
static SPECIAL_WIKIS: phf::Map<&'static str, &'static str> = phf_map! {
    "commonswiki" => "commons.wikimedia.org",
    "incubatorwiki" => "incubator.wikimedia.org",
    "mediawikiwiki" => "www.mediawiki.org",
    "metawiki" => "meta.wikimedia.org",
    "specieswiki" => "species.wikimedia.org",
    "wikidatawiki" => "www.wikidata.org",
    "wikifunctionswiki" => "www.wikifunctions.org",
    "wikimaniawiki" => "wikimania.wikimedia.org",
};

/// 姊妹项目后缀，按固定顺序匹配，先中先得
const MAIN_PROJECTS: [&str; 7] = [
    "wiktionary",
    "wikibooks",
    "wikinews",
    "wikiquote",
    "wikisource",
    "wikiversity",
    "wikivoyage",
];

/// 与 JS `encodeURIComponent` 等价的转义集合：
/// 字母数字和 `- _ . ! ~ * ' ( )` 之外全部转义
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 站点标识 → 公开域名
///
/// 匹配顺序：
/// 1. 特殊站点覆盖表（精确匹配）
/// 2. 姊妹项目后缀 → `<语言码>.<项目>.org`
/// 3. 默认规则：剥掉末尾 4 个字符（`wiki`），下划线换成连字符，
///    → `<语言码>.wikipedia.org`
pub fn wiki_domain(wiki: &str) -> String {
    if let Some(domain) = SPECIAL_WIKIS.get(wiki) {
        return (*domain).to_string();
    }

    for project in MAIN_PROJECTS {
        if let Some(lang) = wiki.strip_suffix(project) {
            return format!("{}.{}.org", lang, project);
        }
    }

    // 数据库名用下划线，公开子域名用连字符（如 zh_classicalwiki → zh-classical）
    let lang = wiki.get(..wiki.len().saturating_sub(4)).unwrap_or("");
    format!("{}.wikipedia.org", lang.replace('_', "-"))
}

/// 差异页链接
pub fn diff_url(wiki: &str, revid: u64) -> String {
    format!("https://{}/w/index.php?diff={}", wiki_domain(wiki), revid)
}

/// 页面历史链接
pub fn hist_url(wiki: &str, title: &str) -> String {
    format!(
        "https://{}/w/index.php?title={}&action=history",
        wiki_domain(wiki),
        utf8_percent_encode(title, URI_COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_wikis_take_precedence() {
        // 按默认规则 commonswiki 会得到 common.wikipedia.org，覆盖表必须优先
        assert_eq!(wiki_domain("commonswiki"), "commons.wikimedia.org");
        assert_eq!(wiki_domain("metawiki"), "meta.wikimedia.org");
        assert_eq!(wiki_domain("wikidatawiki"), "www.wikidata.org");
        assert_eq!(wiki_domain("wikifunctionswiki"), "www.wikifunctions.org");
        assert_eq!(wiki_domain("wikimaniawiki"), "wikimania.wikimedia.org");
    }

    #[test]
    fn sibling_project_suffix_match() {
        // 命中姊妹项目后缀时绝不落入默认的 wikipedia 规则
        assert_eq!(wiki_domain("enwiktionary"), "en.wiktionary.org");
        assert_eq!(wiki_domain("frwikisource"), "fr.wikisource.org");
        assert_eq!(wiki_domain("dewikivoyage"), "de.wikivoyage.org");
    }

    #[test]
    fn default_rule_strips_wiki_suffix() {
        assert_eq!(wiki_domain("enwiki"), "en.wikipedia.org");
        assert_eq!(wiki_domain("dewiki"), "de.wikipedia.org");
    }

    #[test]
    fn default_rule_normalizes_underscores() {
        assert_eq!(wiki_domain("zh_classicalwiki"), "zh-classical.wikipedia.org");
        assert_eq!(wiki_domain("zh_min_nanwiki"), "zh-min-nan.wikipedia.org");
    }

    #[test]
    fn total_on_arbitrary_input() {
        // 任何输入都得到非空的、格式合法的主机名，不 panic
        assert_eq!(wiki_domain(""), ".wikipedia.org");
        assert_eq!(wiki_domain("abc"), ".wikipedia.org");
        assert!(wiki_domain("nonsense_token").ends_with(".wikipedia.org"));
    }

    #[test]
    fn diff_url_format() {
        assert_eq!(
            diff_url("enwiki", 123456),
            "https://en.wikipedia.org/w/index.php?diff=123456"
        );
    }

    #[test]
    fn hist_url_percent_encodes_title() {
        assert_eq!(
            hist_url("enwiki", "Foo Bar"),
            "https://en.wikipedia.org/w/index.php?title=Foo%20Bar&action=history"
        );
        // encodeURIComponent 不转义 ! ' ( ) * - _ . ~
        assert_eq!(
            hist_url("enwiki", "A!(B)_c.~*'"),
            "https://en.wikipedia.org/w/index.php?title=A!(B)_c.~*'&action=history"
        );
        // 斜杠和问号必须转义
        assert!(hist_url("enwiki", "Talk:Foo/bar?").contains("Talk%3AFoo%2Fbar%3F"));
    }
}
