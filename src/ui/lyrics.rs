use crate::layout::ContainerGeometry;
use crate::lrc::LyricLine;
use crate::ui::LyricsView;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

/// Geometry captured while drawing. Layout only settles after the draw, so
/// the host holds this until the next tick and feeds it back through
/// [`LyricsView::apply_measure`].
#[derive(Debug, Clone)]
pub struct Measurement {
    pub container: ContainerGeometry,
    pub line_tops: Vec<(usize, f64)>,
}

pub fn render(f: &mut Frame, area: Rect, view: &LyricsView) -> Measurement {
    let title = Line::from(Span::styled(
        " Lyrics ",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let container = ContainerGeometry {
        top: 0.0,
        height: inner.height as f64,
    };

    if view.lines().is_empty() {
        let empty = Paragraph::new(Text::styled(
            "\nNo Lyrics",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return Measurement {
            container,
            line_tops: Vec::new(),
        };
    }

    let width = inner.width.max(1) as usize;
    let spacer_top = (inner.height as f64 * view.space_top()).round() as usize;
    let spacer_bottom = (inner.height as f64 * (1.0 - view.space_top())).round() as usize;

    let active = view.active_index();
    let mut rows: Vec<Line> = Vec::with_capacity(view.lines().len() + spacer_top + spacer_bottom);
    rows.resize(spacer_top, Line::from(""));

    // Row positions must match the Paragraph's own wrapping, so advance by
    // each line's wrapped height rather than by one. Measure the rendered
    // line, not the raw text: the renderer may add a prefix or decoration.
    let mut top = spacer_top as f64;
    let mut line_tops = Vec::with_capacity(view.lines().len());
    for (index, line) in view.lines().iter().enumerate() {
        line_tops.push((index, top));
        let rendered = view.render_line(line, index, active == Some(index));
        let cells = rendered.width().max(1);
        rows.push(rendered);
        top += cells.div_ceil(width) as f64;
    }

    if view.space_top() > 0.0 {
        for _ in 0..spacer_bottom {
            rows.push(Line::from(""));
        }
    }

    let scroll = view.scroll_offset().max(0.0).round() as u16;
    // trim would strip the inactive lines' blank prefix and throw the
    // measured row positions off
    let paragraph = Paragraph::new(rows)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, inner);

    Measurement {
        container,
        line_tops,
    }
}

/// Default line renderer: centered text, active line marked and highlighted.
pub(crate) fn default_line(line: &LyricLine, active: bool) -> Line<'static> {
    let (prefix, style) = if active {
        (
            "● ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(Color::DarkGray))
    };

    Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(line.text.clone(), style),
    ])
    .alignment(Alignment::Center)
}
