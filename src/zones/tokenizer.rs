//! Zone-file tokenizer (C5): a hand-rolled character-stream scanner that
//! turns zone-file text into logical lines of string tokens.
//!
//! A grammar crate fights the two pieces of state this format actually
//! needs: whether the *first column* of a physical line was whitespace
//! (signalling "inherit the previous owner"), and `(`/`)` continuation
//! folding, both of which cut across pest's automatic token/whitespace
//! boundaries. A single pass over the characters keeping both bits of
//! state explicit is simpler than fighting the grammar.

/// One logical line: its 1-based starting line number in the source text,
/// and its tokens. A leading empty-string token means "owner omitted,
/// inherit the previous one" (§4.4).
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub line: usize,
    pub tokens: Vec<String>,
}

pub fn tokenize(text: &str) -> Vec<Line> {
    let mut out = Vec::new();

    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_token = false;

    let mut quoted = false;
    let mut escape = false;
    let mut in_comment = false;
    let mut paren_depth: u32 = 0;
    let mut pending_owner_check = true;

    let mut line_no: usize = 1;
    let mut line_start_no: usize = 1;

    for c in text.chars() {
        if c == '\n' {
            line_no += 1;
            if paren_depth > 0 {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
                in_comment = false;
                continue;
            }
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            }
            let is_blank = tokens.is_empty() || (tokens.len() == 1 && tokens[0].is_empty());
            if !is_blank {
                out.push(Line {
                    line: line_start_no,
                    tokens: std::mem::take(&mut tokens),
                });
            } else {
                tokens.clear();
            }
            in_comment = false;
            pending_owner_check = true;
            line_start_no = line_no;
            continue;
        }

        if in_comment {
            continue;
        }

        if escape {
            current.push(c);
            in_token = true;
            escape = false;
            continue;
        }

        if pending_owner_check {
            pending_owner_check = false;
            if c == ' ' || c == '\t' || c == '\r' {
                tokens.push(String::new());
            }
        }

        match c {
            '\\' => escape = true,
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            ';' if !quoted => in_comment = true,
            '(' if !quoted => paren_depth += 1,
            ')' if !quoted => paren_depth = paren_depth.saturating_sub(1),
            ' ' | '\t' | '\r' if !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            _ => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(std::mem::take(&mut current));
    }
    let is_blank = tokens.is_empty() || (tokens.len() == 1 && tokens[0].is_empty());
    if !is_blank {
        out.push(Line {
            line: line_start_no,
            tokens,
        });
    }

    out
}
