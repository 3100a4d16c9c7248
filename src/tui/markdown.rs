use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Style on top of the stack, plain when the stack is empty
fn top(stack: &[Style]) -> Style {
    stack.last().copied().unwrap_or_default()
}

fn flush(lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}

/// Parse an agent answer into styled lines for the timeline
pub fn parse_markdown(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut style_stack = vec![Style::default()];
    let mut code_block: Option<String> = None;
    let mut list_depth: usize = 0;

    for event in Parser::new_ext(input, options) {
        match event {
            Event::Start(tag) => {
                let base = top(&style_stack);
                let style = match tag {
                    Tag::Heading { level, .. } => {
                        flush(&mut lines, &mut spans);
                        let color = match level {
                            HeadingLevel::H1 => Color::Cyan,
                            HeadingLevel::H2 => Color::Blue,
                            _ => Color::Green,
                        };
                        Style::default().fg(color).add_modifier(Modifier::BOLD)
                    }
                    Tag::Emphasis => base.add_modifier(Modifier::ITALIC),
                    Tag::Strong => base.add_modifier(Modifier::BOLD),
                    Tag::Strikethrough => base.add_modifier(Modifier::CROSSED_OUT),
                    Tag::CodeBlock(kind) => {
                        flush(&mut lines, &mut spans);
                        let lang = match kind {
                            CodeBlockKind::Fenced(lang) => lang.to_string(),
                            CodeBlockKind::Indented => String::new(),
                        };
                        lines.push(Line::from(vec![
                            Span::styled("```", Style::default().fg(Color::DarkGray)),
                            Span::styled(lang, Style::default().fg(Color::Magenta)),
                        ]));
                        code_block = Some(String::new());
                        Style::default().fg(Color::Gray)
                    }
                    Tag::List(_) => {
                        list_depth += 1;
                        flush(&mut lines, &mut spans);
                        base
                    }
                    Tag::Item => {
                        spans.push(Span::raw("  ".repeat(list_depth.saturating_sub(1))));
                        spans.push(Span::styled("• ", Style::default().fg(Color::Yellow)));
                        base
                    }
                    Tag::BlockQuote(_) => {
                        flush(&mut lines, &mut spans);
                        spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
                    }
                    Tag::Link { .. } => base.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                    _ => base,
                };
                style_stack.push(style);
            }
            Event::End(tag) => {
                style_stack.pop();
                match tag {
                    TagEnd::Heading(_)
                    | TagEnd::Paragraph
                    | TagEnd::Item
                    | TagEnd::BlockQuote(_) => flush(&mut lines, &mut spans),
                    TagEnd::CodeBlock => {
                        if let Some(code) = code_block.take() {
                            for line in code.lines() {
                                lines.push(Line::from(Span::styled(
                                    line.to_string(),
                                    Style::default().fg(Color::Gray),
                                )));
                            }
                        }
                        lines.push(Line::from(Span::styled(
                            "```",
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                    TagEnd::List(_) => list_depth = list_depth.saturating_sub(1),
                    _ => {}
                }
            }
            Event::Text(text) => match code_block.as_mut() {
                Some(code) => code.push_str(&text),
                None => spans.push(Span::styled(text.to_string(), top(&style_stack))),
            },
            Event::Code(code) => {
                spans.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak | Event::HardBreak => flush(&mut lines, &mut spans),
            _ => {}
        }
    }

    flush(&mut lines, &mut spans);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_paragraphs_and_emphasis() {
        let lines = parse_markdown("*System prompted:* I would like to know 'x'");
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "System prompted: I would like to know 'x'");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_lists_get_bullets() {
        let lines = parse_markdown("- Alice\n- Bob");
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["• Alice", "• Bob"]);
    }

    #[test]
    fn test_code_block_keeps_lines() {
        let lines = parse_markdown("```text\nline one\nline two\n```");
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["```text", "line one", "line two", "```"]);
    }
}
