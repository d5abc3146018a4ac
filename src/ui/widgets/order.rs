use crate::view::{ItemsView, OrderView, Section, ITEM_COLUMNS};
use crate::viewer::{OrderViewer, Phase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const HELP: &str = "Enter: найти | ↑/↓: товары | Esc: выход";

/// Terminal rendering of the lookup screen: input line, status banner and
/// the result section.
#[derive(Debug, Default)]
pub struct OrderScreen {
    table_state: TableState,
}

impl OrderScreen {
    pub fn new() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self { table_state }
    }

    /// Back to the first row, for a fresh result.
    pub fn reset_scroll(&mut self) {
        self.table_state.select(Some(0));
    }

    pub fn scroll_up(&mut self) {
        if let Some(selected) = self.table_state.selected() {
            if selected > 0 {
                self.table_state.select(Some(selected - 1));
            }
        }
    }

    pub fn scroll_down(&mut self, row_count: usize) {
        if let Some(selected) = self.table_state.selected() {
            if selected < row_count.saturating_sub(1) {
                self.table_state.select(Some(selected + 1));
            }
        }
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn render(&self, frame: &mut Frame, viewer: &OrderViewer, input: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(frame.area());

        self.render_input(frame, chunks[0], input);
        self.render_status(frame, chunks[1], viewer);
        if let Some(view) = viewer.result() {
            self.render_result(frame, chunks[2], view);
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, input: &str) {
        let block = Block::default()
            .title(" ID заказа ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let line = Line::from(vec![
            Span::styled(input, Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, viewer: &OrderViewer) {
        let (text, color) = match viewer.phase() {
            Phase::Idle => (HELP, Color::DarkGray),
            Phase::Loading => ("Загрузка...", Color::Yellow),
            Phase::Error => (viewer.error().unwrap_or_default(), Color::Red),
            Phase::Success => (viewer.success().unwrap_or_default(), Color::Green),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let paragraph = Paragraph::new(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect, view: &OrderView) {
        // Payment has the most rows: eight fields plus borders.
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(3)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[0]);

        let header = Section::Fields(view.header.clone());
        render_section(frame, columns[0], " Заказ ", &header);
        render_section(frame, columns[1], " Доставка ", &view.delivery);
        render_section(frame, columns[2], " Оплата ", &view.payment);

        self.render_items(frame, chunks[1], &view.items);
    }

    fn render_items(&self, frame: &mut Frame, area: Rect, items: &ItemsView) {
        let block = Block::default()
            .title(" Товары ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let rows = match items {
            ItemsView::Rows(rows) => rows,
            ItemsView::Empty(message) => {
                let paragraph = Paragraph::new(*message)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block);
                frame.render_widget(paragraph, area);
                return;
            }
        };

        let header = Row::new(ITEM_COLUMNS.iter().map(|c| Cell::from(*c))).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let body: Vec<Row> = rows
            .iter()
            .map(|row| Row::new(row.cells().map(|c| Cell::from(c.to_string()))))
            .collect();

        let widths = [
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(8),
        ];

        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray));

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn render_section(frame: &mut Frame, area: Rect, title: &str, section: &Section) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let paragraph = Paragraph::new(section_lines(section))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn section_lines(section: &Section) -> Vec<Line<'_>> {
    match section {
        Section::Fields(fields) => fields
            .iter()
            .map(|field| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", field.label),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(field.value.as_str()),
                ])
            })
            .collect(),
        Section::Missing(message) => vec![Line::from(Span::styled(
            *message,
            Style::default().fg(Color::DarkGray),
        ))],
    }
}
