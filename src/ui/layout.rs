//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

use crate::config::GameMode;

pub const HORIZONTAL_MARGIN: u16 = 2;
pub const CARD_HEIGHT: u16 = 5;
const BUTTON_HEIGHT: u16 = 3;
const FIELD_HEIGHT: u16 = 3;
const FORM_WIDTH: u16 = 40;

/// Index of the first rect containing the cell at (`column`, `row`)
pub fn hit(rects: &[Rect], column: u16, row: u16) -> Option<usize> {
    let position = Position::new(column, row);
    rects.iter().position(|r| r.contains(position))
}

/// Header, body and one-line footer with key hints
pub fn frame(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// `n` equal cards side by side, vertically centered in `area`
pub fn cards(area: Rect, n: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    let row = center_vertically(area, CARD_HEIGHT);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n as u32); n])
        .split(row)
        .iter()
        .copied()
        .collect()
}

fn center_vertically(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

fn center_horizontally(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginLayout {
    pub title: Rect,
    pub name: Rect,
    pub age: Rect,
    pub submit: Rect,
    pub message: Rect,
}

pub fn login(area: Rect) -> LoginLayout {
    let [_, body, _] = frame(area);
    let column = center_horizontally(body, FORM_WIDTH);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(column);
    LoginLayout {
        title: chunks[1],
        name: chunks[2],
        age: chunks[3],
        submit: chunks[4],
        message: chunks[5],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub back: Rect,
    pub title: Rect,
    pub cards: Vec<Rect>,
    pub history: Rect,
    pub footer: Rect,
}

pub fn dashboard(area: Rect, n_cards: usize) -> DashboardLayout {
    let [header, body, footer] = frame(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(body);
    DashboardLayout {
        header,
        back: Rect {
            width: chunks[0].width.min(12),
            ..chunks[0]
        },
        title: chunks[1],
        cards: cards(chunks[2], n_cards),
        history: chunks[3],
        footer,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    pub header: Rect,
    pub progress: Rect,
    pub question: Rect,
    pub drop_zone: Option<Rect>,
    pub feedback: Rect,
    pub options: Vec<Rect>,
    pub footer: Rect,
}

pub fn game(area: Rect, n_options: usize, mode: GameMode) -> GameLayout {
    let [header, body, footer] = frame(area);
    let drop_height = match mode {
        GameMode::Multiple => 0,
        GameMode::Drag => 3,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(drop_height),
            Constraint::Length(1),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Min(0),
        ])
        .split(body);
    GameLayout {
        header,
        progress: chunks[0],
        question: chunks[2],
        drop_zone: (drop_height > 0).then(|| center_horizontally(chunks[3], 20)),
        feedback: chunks[4],
        options: cards(chunks[5], n_options),
        footer,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsLayout {
    pub title: Rect,
    pub stars: Rect,
    pub stats: Rect,
    /// Play again, exit
    pub buttons: [Rect; 2],
    pub footer: Rect,
}

pub fn results(area: Rect) -> ResultsLayout {
    let [header, body, footer] = frame(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(BUTTON_HEIGHT),
        ])
        .split(body);
    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(center_horizontally(chunks[3], 2 * FORM_WIDTH));
    ResultsLayout {
        title: header,
        stars: chunks[1],
        stats: chunks[2],
        buttons: [buttons[0], buttons[1]],
        footer,
    }
}
