pub mod layout;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};

use crate::{
    answer::{AnswerWidget, Feedback},
    app::{App, Screen},
    celebration::{Confetti, PALETTE},
    config::GameMode,
    dashboard::Step,
    game::GameSession,
    login::{Field, LOADING_TEXT},
    model::{AgeGroup, Level, Operation},
};
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "🧱 ¡Matemáticas con bloques!";
const SUBTITLE: &str = "¡Aprende matemáticas mientras te diviertes!";
const MAX_STARS: u32 = 3;

const RED: Color = Color::Rgb(0xFF, 0x6B, 0x6B);
const GREEN: Color = Color::Rgb(0x4C, 0xAF, 0x50);
const YELLOW: Color = Color::Rgb(0xFF, 0xD9, 0x3D);

fn age_group_color(group: AgeGroup) -> Color {
    match group {
        AgeGroup::Toddler => Color::Rgb(0xFF, 0x6B, 0x6B),
        AgeGroup::Child => Color::Rgb(0x4E, 0xCD, 0xC4),
        AgeGroup::Preteen => Color::Rgb(0x95, 0xE1, 0xD3),
    }
}

fn operation_color(op: Operation) -> Color {
    match op {
        Operation::Suma => Color::Rgb(0xFF, 0xD9, 0x3D),
        Operation::Resta => Color::Rgb(0x6B, 0xCB, 0x77),
        Operation::Multiplicacion => Color::Rgb(0xFF, 0x6B, 0x9D),
        Operation::Division => Color::Rgb(0xC6, 0x9F, 0xFF),
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Facil => Color::Rgb(0x4C, 0xAF, 0x50),
        Level::Intermedio => Color::Rgb(0xFF, 0x98, 0x00),
        Level::Dificil => Color::Rgb(0xF4, 0x43, 0x36),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Login => render_login(self, area, buf),
            Screen::Dashboard => render_dashboard(self, area, buf),
            Screen::Game => match &self.session {
                Some(session) => render_game(session, self.drag_pointer(), area, buf),
                None => centered_text("Cargando ejercicios...", area, buf),
            },
            Screen::Results => render_results(self, area, buf),
        }
        render_confetti(&self.confetti, area, buf);
    }
}

fn centered_text(text: &str, area: Rect, buf: &mut Buffer) {
    let y = area.y + area.height / 2;
    Paragraph::new(Span::styled(text.to_string(), bold()))
        .alignment(Alignment::Center)
        .render(Rect { y, height: area.height.min(1), ..area }, buf);
}

fn footer(hints: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(hints.to_string(), dim()))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// A colored brick with centered lines; the highlighted one gets a thick border
fn card(lines: Vec<Line>, color: Color, highlighted: bool, area: Rect, buf: &mut Buffer) {
    let border = if highlighted {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };
    let mut border_style = Style::default().fg(color);
    if highlighted {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border)
        .border_style(border_style);
    let inner = block.inner(area);
    block.render(area, buf);
    let text_style = if highlighted {
        bold().fg(Color::Black).bg(color)
    } else {
        bold().fg(color)
    };
    let top_pad = inner.height.saturating_sub(lines.len() as u16) / 2;
    Paragraph::new(lines)
        .style(text_style)
        .alignment(Alignment::Center)
        .render(
            Rect {
                y: inner.y + top_pad,
                height: inner.height - top_pad,
                ..inner
            },
            buf,
        );
}

fn star_line(stars: u32) -> Line<'static> {
    let spans: Vec<Span> = (0..MAX_STARS)
        .map(|i| {
            if i < stars {
                Span::styled("⭐ ", Style::default().fg(YELLOW))
            } else {
                Span::styled("☆ ", dim())
            }
        })
        .collect();
    Line::from(spans)
}

fn render_login(app: &App, area: Rect, buf: &mut Buffer) {
    let form = &app.login;
    let layout = layout::login(area);

    Paragraph::new(vec![
        Line::from(Span::styled(TITLE, bold().fg(RED))),
        Line::from(Span::styled(SUBTITLE, dim())),
    ])
    .alignment(Alignment::Center)
    .render(layout.title, buf);

    let field = |title: &'static str, value: &str, placeholder: &'static str, focused: bool| {
        let border = if focused {
            Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
        } else {
            dim()
        };
        let text = if value.is_empty() {
            Span::styled(placeholder, dim())
        } else if focused {
            Span::raw(format!("{value}▏"))
        } else {
            Span::raw(value.to_string())
        };
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(title),
        )
    };
    field(
        "¿Cómo te llamas?",
        &form.name,
        "Tu nombre",
        form.focus == Field::Name,
    )
    .render(layout.name, buf);
    field(
        "¿Cuántos años tienes?",
        &form.age,
        "Tu edad (3-12)",
        form.focus == Field::Age,
    )
    .render(layout.age, buf);

    let label = if form.is_loading() {
        LOADING_TEXT
    } else {
        "¡JUGAR!"
    };
    card(
        vec![Line::from(label)],
        RED,
        !form.is_loading(),
        layout.submit,
        buf,
    );

    if let Some(message) = form.message() {
        Paragraph::new(Span::styled(message.to_string(), bold().fg(Color::Red)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout.message, buf);
    }

    let [_, _, footer_area] = layout::frame(area);
    footer("Tab: cambiar campo · Enter: jugar · Esc: salir", footer_area, buf);
}

fn render_dashboard(app: &App, area: Rect, buf: &mut Buffer) {
    let dashboard = &app.dashboard;
    let step = dashboard.step();
    let layout = layout::dashboard(area, step.option_count());

    if let Some(user) = app.ctx.user() {
        Paragraph::new(vec![
            Line::from(Span::styled(format!("¡Hola, {}! 👋", user.name), bold())),
            Line::from(Span::styled(format!("{} años", user.age), dim())),
        ])
        .alignment(Alignment::Center)
        .render(layout.header, buf);
    }

    if step != Step::AgeGroup {
        Paragraph::new(Span::styled("← Volver", dim())).render(layout.back, buf);
    }

    Paragraph::new(Span::styled(step.title(), bold().fg(YELLOW)))
        .alignment(Alignment::Center)
        .render(layout.title, buf);

    let cards: Vec<(Vec<Line>, Color)> = match step {
        Step::AgeGroup => AgeGroup::ALL
            .iter()
            .map(|g| {
                (
                    vec![Line::from(g.icon()), Line::from(g.label())],
                    age_group_color(*g),
                )
            })
            .collect(),
        Step::Operation => Operation::ALL
            .iter()
            .map(|op| {
                (
                    vec![Line::from(op.symbol()), Line::from(op.label())],
                    operation_color(*op),
                )
            })
            .collect(),
        Step::Level => Level::ALL
            .iter()
            .map(|l| (vec![Line::from(l.label())], level_color(*l)))
            .collect(),
    };
    for (i, ((lines, color), rect)) in cards.into_iter().zip(&layout.cards).enumerate() {
        card(lines, color, i == dashboard.cursor(), *rect, buf);
    }

    if let Some(history) = dashboard.history() {
        Paragraph::new(Span::styled(
            format!(
                "Sesiones: {} · Mejor puntuación: {} · ⭐ {}",
                history.sessions, history.best_score, history.total_stars
            ),
            dim(),
        ))
        .alignment(Alignment::Center)
        .render(layout.history, buf);
    }

    footer(
        &format!(
            "←→: mover · Enter: elegir · b: volver · m: modo ({}) · Esc: salir",
            app.config.mode.label()
        ),
        layout.footer,
        buf,
    );

    if let Some(notice) = dashboard.notice() {
        render_notice(notice, area, buf);
    }
}

fn render_notice(text: &str, area: Rect, buf: &mut Buffer) {
    let width = (text.width() as u16 + 6).min(area.width);
    let height = area.height.min(5);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(text.to_string(), bold().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("Enter: aceptar", dim())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Red)),
    )
    .render(popup, buf);
}

fn render_game(session: &GameSession, pointer: Option<(u16, u16)>, area: Rect, buf: &mut Buffer) {
    let Some(widget) = session.widget() else {
        centered_text("Cargando ejercicios...", area, buf);
        return;
    };
    let layout = layout::game(area, widget.options().len(), session.mode());

    let mut header = vec![
        Span::styled(format!("🏆 {}", session.score()), bold().fg(YELLOW)),
        Span::raw("    "),
        Span::styled(
            format!("⏱️ {}s", session.time_left()),
            if session.time_left() <= 10 {
                bold().fg(Color::Red)
            } else {
                bold()
            },
        ),
        Span::raw("    "),
    ];
    header.extend(star_line(session.stars()).spans);
    Paragraph::new(Line::from(header))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM).border_style(dim()))
        .render(layout.header, buf);

    let ratio = if session.total() == 0 {
        0.0
    } else {
        session.current_index() as f64 / session.total() as f64
    };
    Gauge::default()
        .gauge_style(Style::default().fg(GREEN))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(session.progress_text())
        .render(Rect { height: layout.progress.height.min(1), ..layout.progress }, buf);

    if let Some(question) = session.question() {
        Paragraph::new(Span::styled(question, bold().add_modifier(Modifier::REVERSED)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Thick))
            .render(layout.question, buf);
    }

    let feedback = widget.feedback();
    if let Some(feedback) = feedback {
        let color = match feedback {
            Feedback::Correct => Color::Green,
            Feedback::Incorrect => Color::Red,
        };
        Paragraph::new(Span::styled(feedback.message(), bold().fg(color)))
            .alignment(Alignment::Center)
            .render(layout.feedback, buf);
    }

    let palette = PALETTE;
    match widget {
        AnswerWidget::Multiple(choice) => {
            for (i, (option, rect)) in choice.options().iter().zip(&layout.options).enumerate() {
                let color = match (choice.selected(), feedback) {
                    (Some(s), Some(Feedback::Correct)) if s == i => Color::Green,
                    (Some(s), Some(Feedback::Incorrect)) if s == i => Color::Red,
                    _ => palette[i % palette.len()],
                };
                card(
                    vec![Line::from(option.to_string())],
                    color,
                    i == session.cursor() || choice.selected() == Some(i),
                    *rect,
                    buf,
                );
            }
        }
        AnswerWidget::Drag(drag) => {
            if let Some(zone) = layout.drop_zone {
                let (text, color) = match (drag.dropped(), feedback) {
                    (Some(i), Some(Feedback::Correct)) => (drag.options()[i].to_string(), Color::Green),
                    (Some(i), _) => (drag.options()[i].to_string(), Color::Red),
                    (None, _) if drag.dragging().is_some() => ("Suelta aquí".to_string(), YELLOW),
                    (None, _) => ("Arrastra aquí".to_string(), Color::Gray),
                };
                Paragraph::new(Span::styled(text, bold().fg(color)))
                    .alignment(Alignment::Center)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Double)
                            .border_style(Style::default().fg(color)),
                    )
                    .render(zone, buf);
            }
            for (i, (option, rect)) in drag.options().iter().zip(&layout.options).enumerate() {
                let faded = drag.dropped() == Some(i) || drag.dragging() == Some(i);
                let color = if faded {
                    Color::DarkGray
                } else {
                    palette[i % palette.len()]
                };
                card(
                    vec![Line::from(option.to_string())],
                    color,
                    i == session.cursor(),
                    *rect,
                    buf,
                );
            }
            if let (Some(index), Some((x, y))) = (drag.dragging(), pointer) {
                let label = format!("[{}]", drag.options()[index]);
                if area.contains(Position::new(x, y)) {
                    let half = label.width() as u16 / 2;
                    let x = x.saturating_sub(half).max(area.x);
                    buf.set_string(x, y, label, bold().fg(Color::Black).bg(YELLOW));
                }
            }
        }
    }

    let hints = match session.mode() {
        GameMode::Multiple => "←→: mover · Enter: responder · 1-9: elegir · Esc: salir",
        GameMode::Drag => {
            "←→: mover · Espacio: tomar · Enter: soltar · 1-9: elegir · Esc: cancelar/salir"
        }
    };
    footer(hints, layout.footer, buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let outcome = &app.outcome;
    let layout = layout::results(area);

    Paragraph::new(Span::styled(outcome.performance_message(), bold().fg(YELLOW)))
        .alignment(Alignment::Center)
        .render(layout.title, buf);

    Paragraph::new(star_line(outcome.stars))
        .alignment(Alignment::Center)
        .render(layout.stars, buf);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label}: "), dim()),
            Span::styled(value, bold()),
        ])
    };
    Paragraph::new(vec![
        stat("Puntuación", outcome.score.to_string()),
        stat(
            "Ejercicios completados",
            format!("{} / {}", outcome.completed, outcome.total),
        ),
        stat("Precisión", format!("{}%", outcome.accuracy_percent())),
    ])
    .alignment(Alignment::Center)
    .render(layout.stats, buf);

    card(
        vec![Line::from("Jugar de nuevo")],
        GREEN,
        true,
        layout.buttons[0],
        buf,
    );
    card(vec![Line::from("Salir")], RED, false, layout.buttons[1], buf);

    footer("Enter: jugar de nuevo · Esc: salir · q: cerrar", layout.footer, buf);
}

fn render_confetti(confetti: &Confetti, area: Rect, buf: &mut Buffer) {
    for particle in confetti.particles.iter().filter(|p| p.is_visible()) {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.right() || y >= area.bottom() {
            continue;
        }
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_char(particle.symbol).set_fg(particle.color);
        }
    }
}
