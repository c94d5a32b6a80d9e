use std::sync::OnceLock;

use regex::Regex;

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("must be valid regex"))
        }
    };
}

cached_regex!(heading_markers, r"(?m)^#{1,6}\s+");
cached_regex!(image_refs, r"!\[[^\]]*\]\([^)]*\)");
cached_regex!(links, r"\[([^\]]*)\]\([^)]*\)");
cached_regex!(bold, r"\*\*(.+?)\*\*");
cached_regex!(italic, r"\*([^*]+)\*");
cached_regex!(code_fences, r"(?s)```.*?```");
cached_regex!(horizontal_rules, r"(?m)^-{3,}\s*$");
cached_regex!(list_bullets, r"(?m)^\s*-\s+");
cached_regex!(blank_runs, r"\n\s*\n");

/// Strip markdown structure to obtain narration-ready plain text
///
/// Total and idempotent: applying it to its own output is a no-op.
/// Headings lose their markers, images vanish entirely, links keep
/// their label, emphasis keeps its inner text, fenced code blocks and
/// horizontal rules vanish, list bullets are dropped, and runs of
/// blank lines collapse to a single blank line.
pub fn extract_plain_text(markdown: &str) -> String {
    let text = heading_markers().replace_all(markdown, "");
    let text = image_refs().replace_all(&text, "");
    let text = links().replace_all(&text, "$1");
    let text = bold().replace_all(&text, "$1");
    let text = italic().replace_all(&text, "$1");
    let text = code_fences().replace_all(&text, "");
    let text = horizontal_rules().replace_all(&text, "");
    let text = list_bullets().replace_all(&text, "");
    let text = blank_runs().replace_all(&text, "\n\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = "# 恐龙的一天\n\n\
        **角色：**\n- **小恐龙** - 好奇的主角\n\n\
        ![第一幕](images/恐龙_scene_1.png)\n\n\
        小恐龙在*森林*里遇到了[朋友](friend.html)。\n\n\
        ---\n\n\
        ```\nsome code\n```\n\n\
        故事结束了。";

    #[test]
    fn strips_all_markup() {
        let plain = extract_plain_text(STORY);

        assert!(!plain.contains('#'));
        assert!(!plain.contains("!["));
        assert!(!plain.contains("**"));
        assert!(!plain.contains("```"));
        assert!(!plain.contains("---"));
        assert!(!plain.lines().any(|line| line.starts_with("- ")));
        assert!(plain.contains("恐龙的一天"));
        assert!(plain.contains("小恐龙在森林里遇到了朋友。"));
        assert!(plain.contains("故事结束了。"));
    }

    #[test]
    fn link_label_survives_link_target_does_not() {
        let plain = extract_plain_text("见[词汇表](glossary.md)。");
        assert_eq!(plain, "见词汇表。");
    }

    #[test]
    fn image_reference_removed_entirely() {
        let plain = extract_plain_text("前文\n\n![场景图](scene.png)\n\n后文");
        assert_eq!(plain, "前文\n\n后文");
    }

    #[test]
    fn blank_runs_collapse() {
        let plain = extract_plain_text("a\n\n\n\nb\n   \n\nc");
        assert_eq!(plain, "a\n\nb\n\nc");
    }

    #[test]
    fn idempotent_on_story() {
        let once = extract_plain_text(STORY);
        assert_eq!(extract_plain_text(&once), once);
    }

    #[test]
    fn idempotent_on_edge_inputs() {
        for input in ["", "   ", "plain text", "**bold** *and* [link](x) ![i](y)"] {
            let once = extract_plain_text(input);
            assert_eq!(extract_plain_text(&once), once, "input: {input:?}");
        }
    }
}
