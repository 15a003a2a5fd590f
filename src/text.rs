use crate::draw::{Color, PageBuffer, TextRun};
use crate::fonts::{ASCENDER_RATIO, FontStyle};
use crate::model::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug)]
pub(crate) struct WordChunk {
    pub(crate) font: FontStyle,
    pub(crate) text: String,
    pub(crate) x_offset: f32, // x relative to line start
    pub(crate) width: f32,
}

#[derive(Debug)]
pub(crate) struct TextLine {
    pub(crate) chunks: Vec<WordChunk>,
    pub(crate) total_width: f32,
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

fn font_for(span: &Span) -> FontStyle {
    if span.bold {
        FontStyle::Bold
    } else {
        FontStyle::Regular
    }
}

/// Greedy word wrap of styled spans into lines no wider than `max_width`.
/// No space is inserted between spans unless one side carries whitespace
/// ("bold" + ", " stays "bold,"). A single word wider than the line is kept
/// whole on its own line. Always returns at least one (possibly empty) line.
pub(crate) fn build_lines(spans: &[Span], font_size: f32, max_width: f32) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_chunks: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_with_ws = false;
    let mut prev_space_w: f32 = 0.0;

    for span in spans {
        let font = font_for(span);
        let space_w = font.space_width(font_size);
        let starts_with_ws = span.text.starts_with(char::is_whitespace);

        for (i, word) in span.text.split_whitespace().enumerate() {
            let ww = font.text_width(word, font_size);
            let need_space =
                !current_chunks.is_empty() && (i > 0 || starts_with_ws || prev_ended_with_ws);
            // The space belongs to whichever span owns the whitespace character.
            let effective_space_w = if i > 0 || starts_with_ws {
                space_w
            } else {
                prev_space_w
            };
            let proposed_x = if need_space {
                current_x + effective_space_w
            } else {
                current_x
            };

            if !current_chunks.is_empty() && proposed_x + ww > max_width {
                lines.push(finish_line(&mut current_chunks));
                current_x = 0.0;
            } else {
                current_x = proposed_x;
            }

            // Same-font words on one line share a chunk.
            match current_chunks.last_mut() {
                Some(last) if last.font == font => {
                    let gap = current_x - (last.x_offset + last.width);
                    if gap > 0.0 {
                        last.text.push(' ');
                    }
                    last.text.push_str(word);
                    last.width = current_x + ww - last.x_offset;
                }
                _ => current_chunks.push(WordChunk {
                    font,
                    text: word.to_string(),
                    x_offset: current_x,
                    width: ww,
                }),
            }
            current_x += ww;
        }

        if !span.text.is_empty() {
            prev_ended_with_ws = span.text.ends_with(char::is_whitespace);
            prev_space_w = space_w;
        }
    }

    if !current_chunks.is_empty() {
        lines.push(finish_line(&mut current_chunks));
    }

    if lines.is_empty() {
        lines.push(TextLine {
            chunks: vec![],
            total_width: 0.0,
        });
    }
    lines
}

/// Wrap single-style text; `\n` forces a line break.
pub(crate) fn wrap_text(text: &str, font: FontStyle, font_size: f32, max_width: f32) -> Vec<TextLine> {
    let bold = font == FontStyle::Bold;
    text.split('\n')
        .flat_map(|line| {
            let span = Span {
                text: line.to_string(),
                bold,
            };
            build_lines(std::slice::from_ref(&span), font_size, max_width)
        })
        .collect()
}

/// Baseline of the first line when the text box starts at `top`.
pub(crate) fn first_baseline(top: f32, font_size: f32) -> f32 {
    top - font_size * ASCENDER_RATIO
}

pub(crate) struct LinePlacement {
    pub(crate) x: f32,
    pub(crate) width: f32,
    pub(crate) first_baseline_y: f32,
    pub(crate) leading: f32,
    pub(crate) font_size: f32,
    pub(crate) alignment: Alignment,
    pub(crate) color: Color,
}

/// Emit pre-built lines as text runs, one per chunk.
pub(crate) fn render_lines(buf: &mut PageBuffer, lines: &[TextLine], at: &LinePlacement) {
    for (line_num, line) in lines.iter().enumerate() {
        let y = at.first_baseline_y - line_num as f32 * at.leading;
        let line_start_x = match at.alignment {
            Alignment::Left => at.x,
            Alignment::Center => at.x + (at.width - line.total_width) / 2.0,
            Alignment::Right => at.x + at.width - line.total_width,
        };
        for chunk in &line.chunks {
            buf.text(TextRun {
                x: line_start_x + chunk.x_offset,
                y,
                text: chunk.text.clone(),
                font: chunk.font,
                size: at.font_size,
                color: at.color,
            });
        }
    }
}
