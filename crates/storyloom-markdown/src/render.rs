use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

/// Marker the generator emits in front of the cast list
const CHARACTER_MARKER: &str = "**角色：**";
/// Marker the generator emits in front of vocabulary blocks
const VOCABULARY_MARKER: &str = "**词汇小课堂：**";

/// A term/definition pair from a cast or vocabulary list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub term: String,
    pub definition: String,
}

/// One display block of a rendered story
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Top-level story title
    Heading(String),
    /// Cast list, always rendered directly under the title
    CharacterList(Vec<ListEntry>),
    /// Vocabulary list
    VocabularyList(Vec<ListEntry>),
    /// Illustration with alt text and resolved location
    Image { alt: String, location: String },
    /// Prose paragraph with emphasis converted to inline HTML
    Paragraph(String),
    /// Horizontal rule
    Rule,
}

/// Ordered sequence of display blocks derived from one story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

fn heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s+(.+)").expect("must be valid regex"))
}

fn image_ref() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("must be valid regex"))
}

fn character_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-\s+\*\*(.+?)\*\*\s+-\s+(.*)$").expect("must be valid regex"))
}

fn vocabulary_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The generator is inconsistent about the colon: fullwidth with or
    // without a leading space, or a plain ASCII colon
    RE.get_or_init(|| Regex::new(r"^-\s+\*\*(.+?)\*\*\s*[：:]\s*(.*)$").expect("must be valid regex"))
}

fn bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("must be valid regex"))
}

fn italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("must be valid regex"))
}

/// Convert story markdown into ordered display blocks
///
/// Blocks split on blank lines. Emission order equals source order with
/// one exception: a cast list is relocated to sit directly under the
/// title heading wherever it appeared in the source. Every non-blank
/// input block produces exactly one output block.
///
/// `images` maps illustration basenames to their display locations;
/// image references whose basename is absent keep their literal path.
pub fn render(markdown: &str, images: &HashMap<String, String>) -> RenderedDocument {
    let paragraphs: Vec<&str> = markdown.split("\n\n").map(str::trim).collect();

    let title_index = paragraphs.iter().position(|p| heading().is_match(p));
    let character_index = paragraphs.iter().position(|p| p.starts_with(CHARACTER_MARKER));

    let mut blocks = Vec::new();

    for (i, paragraph) in paragraphs.iter().enumerate() {
        if paragraph.is_empty() {
            continue;
        }

        if let Some(captures) = heading().captures(paragraph) {
            blocks.push(Block::Heading(captures[1].trim().to_string()));

            // Relocate the cast list directly under the title
            if Some(i) == title_index
                && let Some(ci) = character_index
            {
                blocks.push(Block::CharacterList(parse_entries(paragraphs[ci], character_entry())));
            }
            continue;
        }

        // Original slot of a relocated cast list
        if Some(i) == character_index {
            if title_index.is_none() {
                blocks.push(Block::CharacterList(parse_entries(paragraph, character_entry())));
            }
            continue;
        }

        if paragraph.starts_with(VOCABULARY_MARKER) {
            blocks.push(Block::VocabularyList(parse_entries(paragraph, vocabulary_entry())));
            continue;
        }

        if *paragraph == "---" {
            blocks.push(Block::Rule);
            continue;
        }

        if paragraph.starts_with("![")
            && let Some(captures) = image_ref().captures(paragraph)
        {
            let alt = captures[1].to_string();
            let path = &captures[2];
            let basename = path.rsplit('/').next().unwrap_or(path);
            let location = images.get(basename).cloned().unwrap_or_else(|| path.to_string());
            blocks.push(Block::Image { alt, location });
            continue;
        }

        blocks.push(Block::Paragraph(inline_html(paragraph)));
    }

    RenderedDocument { blocks }
}

/// Convert `**bold**` then `*italic*` to inline HTML, leaving all other
/// characters verbatim
fn inline_html(text: &str) -> String {
    let text = bold().replace_all(text, "<strong>$1</strong>");
    italic().replace_all(&text, "<em>$1</em>").into_owned()
}

fn parse_entries(block: &str, entry: &Regex) -> Vec<ListEntry> {
    block
        .lines()
        .filter_map(|line| {
            entry.captures(line.trim()).map(|captures| ListEntry {
                term: captures[1].to_string(),
                definition: captures[2].trim().to_string(),
            })
        })
        .collect()
}

impl RenderedDocument {
    /// Render the document as the HTML fragment returned by the story
    /// endpoint
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"story-content\">");

        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    let _ = write!(html, "<h1>{text}</h1>");
                }
                Block::CharacterList(entries) => {
                    html.push_str("<div class=\"description\"><strong>角色：</strong>");
                    for entry in entries {
                        let _ = write!(
                            html,
                            "<div class=\"character\"><strong>{}</strong> - {}</div>",
                            entry.term, entry.definition
                        );
                    }
                    html.push_str("</div>");
                }
                Block::VocabularyList(entries) => {
                    html.push_str("<div class=\"description\"><strong>词汇小课堂：</strong>");
                    for entry in entries {
                        let _ = write!(
                            html,
                            "<div class=\"vocabulary\"><strong>{}</strong>：{}</div>",
                            entry.term, entry.definition
                        );
                    }
                    html.push_str("</div>");
                }
                Block::Image { alt, location } => {
                    let _ = write!(
                        html,
                        "<div class=\"image-container\"><img src=\"{location}\" alt=\"{alt}\" class=\"story-image\"></div>"
                    );
                }
                Block::Paragraph(text) => {
                    let _ = write!(html, "<p class=\"story-paragraph\">{text}</p>");
                }
                Block::Rule => html.push_str("<hr>"),
            }
        }

        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_images() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn cast_list_relocates_under_heading() {
        let markdown = "# Title\n\n**角色：** \n- **A** - desc\n\nPara one\n\n![s](img.png)\n\nPara two";
        let mut images = HashMap::new();
        images.insert("img.png".to_string(), "/view_image?path=/tmp/img.png".to_string());

        let doc = render(markdown, &images);

        assert_eq!(doc.blocks.len(), 5);
        assert_eq!(doc.blocks[0], Block::Heading("Title".to_string()));
        assert_eq!(
            doc.blocks[1],
            Block::CharacterList(vec![ListEntry {
                term: "A".to_string(),
                definition: "desc".to_string(),
            }])
        );
        assert_eq!(doc.blocks[2], Block::Paragraph("Para one".to_string()));
        assert_eq!(
            doc.blocks[3],
            Block::Image {
                alt: "s".to_string(),
                location: "/view_image?path=/tmp/img.png".to_string(),
            }
        );
        assert_eq!(doc.blocks[4], Block::Paragraph("Para two".to_string()));
    }

    #[test]
    fn cast_list_after_paragraphs_still_relocates() {
        let markdown = "# 标题\n\n正文第一段\n\n**角色：**\n- **小熊** - 主角";

        let doc = render(markdown, &no_images());

        assert_eq!(doc.blocks.len(), 3);
        assert!(matches!(doc.blocks[0], Block::Heading(_)));
        assert!(matches!(doc.blocks[1], Block::CharacterList(_)));
        assert_eq!(doc.blocks[2], Block::Paragraph("正文第一段".to_string()));
    }

    #[test]
    fn cast_list_without_heading_stays_in_place() {
        let markdown = "开场白\n\n**角色：**\n- **小熊** - 主角\n\n结尾";

        let doc = render(markdown, &no_images());

        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(doc.blocks[0], Block::Paragraph("开场白".to_string()));
        assert!(matches!(doc.blocks[1], Block::CharacterList(_)));
        assert_eq!(doc.blocks[2], Block::Paragraph("结尾".to_string()));
    }

    #[test]
    fn vocabulary_colon_variants_parse() {
        let markdown = "**词汇小课堂：**\n- **勇敢** ：不害怕\n- **友谊**：朋友之情\n- **探索**: to explore";

        let doc = render(markdown, &no_images());

        let Block::VocabularyList(entries) = &doc.blocks[0] else {
            panic!("expected vocabulary list, got {:?}", doc.blocks[0]);
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].term, "勇敢");
        assert_eq!(entries[0].definition, "不害怕");
        assert_eq!(entries[2].definition, "to explore");
    }

    #[test]
    fn unmapped_image_keeps_literal_path() {
        let doc = render("![alt](images/missing.png)", &no_images());

        assert_eq!(
            doc.blocks[0],
            Block::Image {
                alt: "alt".to_string(),
                location: "images/missing.png".to_string(),
            }
        );
    }

    #[test]
    fn rule_and_emphasis_blocks() {
        let doc = render("---\n\n这是**重点**和*语气*。", &no_images());

        assert_eq!(doc.blocks[0], Block::Rule);
        assert_eq!(
            doc.blocks[1],
            Block::Paragraph("这是<strong>重点</strong>和<em>语气</em>。".to_string())
        );
    }

    #[test]
    fn non_blank_blocks_map_one_to_one() {
        let markdown = "# T\n\n**角色：**\n- **A** - d\n\nP1\n\n---\n\n![a](b.png)\n\nP2";

        let doc = render(markdown, &no_images());

        // 6 non-blank input blocks, 6 output blocks
        assert_eq!(doc.blocks.len(), 6);
    }

    #[test]
    fn html_wraps_blocks_in_story_content() {
        let doc = render("# T\n\nhello", &no_images());
        let html = doc.to_html();

        assert!(html.starts_with("<div class=\"story-content\">"));
        assert!(html.contains("<h1>T</h1>"));
        assert!(html.contains("<p class=\"story-paragraph\">hello</p>"));
        assert!(html.ends_with("</div>"));
    }
}
