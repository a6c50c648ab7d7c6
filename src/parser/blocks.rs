//! Block tree construction.
//!
//! The configuration is scanned once with a brace-depth counter and turned into
//! a tree of named blocks. Each block keeps the byte range of its body so field
//! extractors can run against an isolated, fully nested region of the text.

use std::ops::Range;

use super::ParseError;

/// A named `{ ... }` region of the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statement text preceding the opening brace, whitespace-collapsed
    /// (e.g. "ge-0/0/0", "unit 0", "family inet")
    pub name: String,
    /// Byte offset of the opening brace
    pub open: usize,
    /// Byte range of the body, both braces excluded
    pub body: Range<usize>,
    pub children: Vec<Block>,
}

impl Block {
    /// Full body text including nested blocks
    pub fn body<'a>(&self, src: &'a str) -> &'a str {
        &src[self.body.clone()]
    }

    /// Body text with every nested block cut out, leaving only the statements
    /// that belong to this block directly
    pub fn own_statements(&self, src: &str) -> String {
        let mut out = String::new();
        let mut cursor = self.body.start;
        for child in &self.children {
            // The child's header text sits between the previous delimiter and its brace.
            let header_start = src[cursor..child.open]
                .rfind([';', '}'])
                .map(|i| cursor + i + 1)
                .unwrap_or(cursor);
            out.push_str(&src[cursor..header_start]);
            out.push(' ');
            cursor = child.body.end + 1;
        }
        out.push_str(&src[cursor..self.body.end]);
        out
    }

    /// Every nested block in document order, not including `self`
    pub fn descendants(&self) -> Vec<&Block> {
        let mut out = Vec::new();
        for child in &self.children {
            collect_all(child, &mut out);
        }
        out
    }
}

/// Build the block tree for a whole document.
///
/// Every `{` opens a block named by the statement text since the previous `;`,
/// `{` or `}`; the matching `}` is found by depth counting. Input that ends while
/// a block is still open fails with [`ParseError::MalformedBlock`]. A `}` with no
/// open block is ignored. Delimiters inside double-quoted strings are plain text.
pub fn build_tree(src: &str) -> Result<Vec<Block>, ParseError> {
    struct Open {
        name: String,
        open: usize,
        children: Vec<Block>,
    }

    let mut roots = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut stmt_start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, byte) in src.bytes().enumerate() {
        if quoted {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => quoted = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => quoted = true,
            b'{' => {
                stack.push(Open {
                    name: header_name(&src[stmt_start..i]),
                    open: i,
                    children: Vec::new(),
                });
                stmt_start = i + 1;
            }
            b'}' => {
                if let Some(frame) = stack.pop() {
                    let block = Block {
                        name: frame.name,
                        open: frame.open,
                        body: frame.open + 1..i,
                        children: frame.children,
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(block),
                        None => roots.push(block),
                    }
                }
                stmt_start = i + 1;
            }
            b';' => stmt_start = i + 1,
            _ => {}
        }
    }

    if let Some(unclosed) = stack.pop() {
        return Err(ParseError::malformed_block(src, &unclosed.name, unclosed.open));
    }

    Ok(roots)
}

/// Every block in the tree whose name satisfies `is_header`, in document order
pub fn find_blocks<'t>(tree: &'t [Block], is_header: impl Fn(&str) -> bool) -> Vec<&'t Block> {
    let mut all = Vec::new();
    for root in tree {
        collect_all(root, &mut all);
    }
    all.into_iter().filter(|b| is_header(&b.name)).collect()
}

/// Like [`find_blocks`] but does not look inside a block that already matched.
/// `is_header` receives the enclosing block's name (`None` at top level) and the
/// candidate's name.
pub fn find_outermost_blocks<'t>(
    tree: &'t [Block],
    is_header: impl Fn(Option<&str>, &str) -> bool,
) -> Vec<&'t Block> {
    type Header<'a> = &'a dyn Fn(Option<&str>, &str) -> bool;

    fn walk<'t>(block: &'t Block, parent: Option<&str>, is_header: Header, out: &mut Vec<&'t Block>) {
        if is_header(parent, &block.name) {
            out.push(block);
            return;
        }
        for child in &block.children {
            walk(child, Some(block.name.as_str()), is_header, out);
        }
    }

    let mut out = Vec::new();
    for root in tree {
        walk(root, None, &is_header, &mut out);
    }
    out
}

fn collect_all<'t>(block: &'t Block, out: &mut Vec<&'t Block>) {
    out.push(block);
    for child in &block.children {
        collect_all(child, out);
    }
}

/// Normalize the text preceding a brace into a block name.
/// Comment lines (`#`) and trailing `/* ... */` annotations are dropped.
fn header_name(raw: &str) -> String {
    let text: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect();
    let text = text.join(" ");
    let text = match text.rfind("*/") {
        Some(end) => &text[end + 2..],
        None => text.as_str(),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
