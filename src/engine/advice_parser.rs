/// A run of inline text; `strong` comes from `**...**`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub strong: bool,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceBlock {
    Heading { level: u8, spans: Vec<Span> },
    Bullet(Vec<Span>),
    Numbered { number: String, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    Rule,
}

/// Split coach advice (light markdown) into blocks for display.
/// Works line by line; blank lines only separate blocks.
pub fn parse_advice(advice: &str) -> Vec<AdviceBlock> {
    let mut blocks = Vec::new();

    for line in advice.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_rule(line) {
            blocks.push(AdviceBlock::Rule);
            continue;
        }

        // # Heading
        let hashes = line.chars().take_while(|c| *c == '#').count();
        if (1..=6).contains(&hashes) {
            if let Some(rest) = line[hashes..].strip_prefix(' ') {
                blocks.push(AdviceBlock::Heading {
                    level: hashes as u8,
                    spans: parse_inline(rest.trim()),
                });
                continue;
            }
        }

        // - bullet / * bullet / • bullet
        if let Some(rest) = ["- ", "* ", "• "]
            .iter()
            .find_map(|marker| line.strip_prefix(marker))
        {
            blocks.push(AdviceBlock::Bullet(parse_inline(rest.trim())));
            continue;
        }

        // 1. item / 1) item
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            let rest = &line[digits..];
            if let Some(text) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
                blocks.push(AdviceBlock::Numbered {
                    number: line[..digits].to_string(),
                    spans: parse_inline(text.trim()),
                });
                continue;
            }
        }

        blocks.push(AdviceBlock::Paragraph(parse_inline(line)));
    }

    blocks
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| line.chars().all(|c| c == *marker))
}

/// `**bold**` spans. An unmatched `**` is kept as literal text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let parts: Vec<&str> = text.split("**").collect();
    let balanced = parts.len() % 2 == 1;
    let last = parts.len() - 1;

    parts
        .iter()
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            let strong = i % 2 == 1;
            if strong && !balanced && i == last {
                Span::plain(format!("**{part}"))
            } else {
                Span {
                    text: part.to_string(),
                    strong,
                }
            }
        })
        .collect()
}
