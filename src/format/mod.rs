//! Presentation formatter
//!
//! Turns raw message text into [`Markup`]: a flat list of fragments the UI
//! styles when rendering. Rules run in a fixed order and each one only looks
//! at plain [`Fragment::Text`] left behind by the rules before it, so a link
//! is never re-scanned for keywords and a tool name is never re-linked.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));

static TOOL_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Calling tool (\w+) with args").expect("valid tool call regex"));

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Created|Saved|Reading|Writing|Fetching)\b").expect("valid keyword regex")
});

static TOKENS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:🔢 )?Tokens: (\d+)/(\d+) \(Total: (\d+)/(\d+)\)").expect("valid tokens regex")
});

static TOOL_PROGRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Calling tool (\w+) with args (.+)").expect("valid tool progress regex")
});

/// One styled piece of a formatted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    LineBreak,
    Link {
        url: String,
    },
    /// "Calling tool <name>" with the tool name highlighted
    ToolCall {
        name: String,
    },
    /// File-operation keyword (Created, Saved, ...)
    Keyword {
        word: String,
    },
    /// Per-request and cumulative token usage
    TokenSummary {
        input: u64,
        output: u64,
        total_input: u64,
        total_output: u64,
    },
}

/// Formatted message content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    fragments: Vec<Fragment>,
}

impl Markup {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Render back to unstyled text
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::LineBreak => out.push('\n'),
                Fragment::Link { url } => out.push_str(url),
                Fragment::ToolCall { name } => {
                    out.push_str("Calling tool ");
                    out.push_str(name);
                }
                Fragment::Keyword { word } => out.push_str(word),
                Fragment::TokenSummary {
                    input,
                    output,
                    total_input,
                    total_output,
                } => out.push_str(&format!(
                    "Tokens: {input}/{output} (Total: {total_input}/{total_output})"
                )),
            }
        }
        out
    }
}

/// Format chat message content.
pub fn format_message(content: &str) -> Markup {
    let fragments = split_lines(content);
    let fragments = replace_matches(fragments, &URL_RE, |caps| {
        vec![Fragment::Link {
            url: caps[0].to_string(),
        }]
    });
    let fragments = replace_matches(fragments, &TOOL_CALL_RE, |caps| {
        vec![
            Fragment::ToolCall {
                name: caps[1].to_string(),
            },
            Fragment::Text(" with args".to_string()),
        ]
    });
    let fragments = replace_matches(fragments, &KEYWORD_RE, |caps| {
        vec![Fragment::Keyword {
            word: caps[1].to_string(),
        }]
    });
    let fragments = replace_matches(fragments, &TOKENS_RE, token_summary);

    Markup {
        fragments: merge_text(fragments),
    }
}

/// Formatted tool-progress line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolProgressMarkup {
    Call { name: String, args: String },
    /// Message did not look like a tool call; shown unchanged
    Raw(String),
}

/// Extract tool name and arguments from a `Calling tool X with args Y` line.
pub fn format_tool_progress(message: &str) -> ToolProgressMarkup {
    match TOOL_PROGRESS_RE.captures(message) {
        Some(caps) => ToolProgressMarkup::Call {
            name: caps[1].to_string(),
            args: caps[2].to_string(),
        },
        None => ToolProgressMarkup::Raw(message.to_string()),
    }
}

fn split_lines(content: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for (i, line) in content.split('\n').enumerate() {
        if i > 0 {
            fragments.push(Fragment::LineBreak);
        }
        if !line.is_empty() {
            fragments.push(Fragment::Text(line.to_string()));
        }
    }
    fragments
}

fn token_summary(caps: &Captures<'_>) -> Vec<Fragment> {
    let parse = |i: usize| caps[i].parse::<u64>().ok();
    match (parse(1), parse(2), parse(3), parse(4)) {
        (Some(input), Some(output), Some(total_input), Some(total_output)) => {
            vec![Fragment::TokenSummary {
                input,
                output,
                total_input,
                total_output,
            }]
        }
        // Counts too large for u64: leave the text alone.
        _ => vec![Fragment::Text(caps[0].to_string())],
    }
}

/// Replace every match of `re` inside text fragments; other fragments pass through.
fn replace_matches<F>(fragments: Vec<Fragment>, re: &Regex, mut replace: F) -> Vec<Fragment>
where
    F: FnMut(&Captures<'_>) -> Vec<Fragment>,
{
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let Fragment::Text(text) = fragment else {
            out.push(fragment);
            continue;
        };

        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                out.push(Fragment::Text(text[last..whole.start()].to_string()));
            }
            out.extend(replace(&caps));
            last = whole.end();
        }
        if last < text.len() {
            out.push(Fragment::Text(text[last..].to_string()));
        }
    }
    out
}

fn merge_text(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut out: Vec<Fragment> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if let Fragment::Text(next) = &fragment {
            if let Some(Fragment::Text(prev)) = out.last_mut() {
                prev.push_str(next);
                continue;
            }
        }
        out.push(fragment);
    }
    out
}
