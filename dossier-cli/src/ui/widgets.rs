use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget,
    },
};

use crate::models::{Dossier, DossierStatus, DossierSummary, FormField, NewDossier};

/// Render title and greeting
pub fn render_header(area: Rect, buf: &mut Buffer, username: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📂 Dossiers ")
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    let greeting = if username.is_empty() {
        "Hello".to_string()
    } else {
        format!("Hello, {}", username)
    };

    let line = Line::from(vec![
        Span::styled(
            greeting,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "   [a] New dossier  [L] Log out",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    Paragraph::new(line).render(inner, buf);
}

/// Render the total / done / pending counters
pub fn render_summary(area: Rect, buf: &mut Buffer, summary: &DossierSummary) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let counters = [
        ("Total dossiers", summary.total, Color::White),
        ("Done", summary.done, Color::Green),
        ("Pending", summary.pending, Color::Yellow),
    ];

    for (column, (title, count, color)) in columns.iter().zip(counters) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .border_style(Style::default().fg(Color::Gray));

        let inner = block.inner(*column);
        block.render(*column, buf);

        Paragraph::new(Span::styled(
            count.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .render(inner, buf);
    }
}

/// Render the creation form with the focused field highlighted
pub fn render_form(area: Rect, buf: &mut Buffer, form: &NewDossier, focused: FormField) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ➕ New dossier (Enter to submit, Esc to close) ")
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    block.render(area, buf);

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let is_focused = *field == focused;
            let label_style = if is_focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let cursor = if is_focused { "▏" } else { "" };
            let required = if *field == FormField::Numero { "*" } else { " " };

            Line::from(vec![
                Span::styled(format!("{}{:<16}", required, field.label()), label_style),
                Span::styled(
                    format!("{}{}", form.field(*field), cursor),
                    Style::default().fg(Color::White),
                ),
            ])
        })
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

/// Render the dossier list
pub fn render_dossiers(
    area: Rect,
    buf: &mut Buffer,
    dossiers: &[Dossier],
    selected_index: usize,
    is_selected: bool,
) {
    let border_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 🗂  Dossiers ")
        .border_style(border_style);

    let inner = block.inner(area);
    block.render(area, buf);

    if dossiers.is_empty() {
        let empty_text = Paragraph::new("No dossiers yet.\nPress 'a' to create the first one!")
            .style(Style::default().fg(Color::Gray));
        empty_text.render(inner, buf);
        return;
    }

    let items: Vec<ListItem> = dossiers
        .iter()
        .enumerate()
        .map(|(idx, dossier)| {
            let (badge, badge_color) = match dossier.statut {
                DossierStatus::Done => ("✓ Done   ", Color::Green),
                DossierStatus::Pending => ("⏳ Pending", Color::Yellow),
            };

            let line_style = if is_selected && idx == selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let title = Line::from(vec![
                Span::styled(badge, Style::default().fg(badge_color)),
                Span::styled(format!(" {:<12}", dossier.numero), line_style),
                Span::styled(
                    format!(
                        " Type: {}  Owner: {}",
                        Dossier::display(&dossier.dostype),
                        Dossier::display(&dossier.responsable)
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]);

            let details = Line::from(Span::styled(
                format!(
                    "           Dosdef: {}  TEF: {}  Bon caisse: {}  Mandat: {}",
                    Dossier::display(&dossier.dosdef),
                    Dossier::display(&dossier.tef),
                    Dossier::display(&dossier.bon_caisse),
                    Dossier::display(&dossier.mandat_paiement)
                ),
                Style::default().fg(Color::Blue),
            ));

            ListItem::new(vec![title, details])
        })
        .collect();

    // The selection drives the scroll offset so it never leaves the viewport
    let selected = selected_index.min(dossiers.len() - 1);
    let mut state = ListState::default().with_selected(Some(selected));
    StatefulWidget::render(List::new(items), inner, buf, &mut state);
}

/// Render the delete confirmation popup
pub fn render_confirm_delete(area: Rect, buf: &mut Buffer, numero: &str) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Delete dossier ")
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let lines = vec![
        Line::from(format!("Really delete dossier {}?", numero)),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Yes   [any other key] No",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines).render(inner, buf);
}

/// Render help overlay
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ❓ Help ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Dossiers:", Style::default().fg(Color::Cyan))),
        Line::from("  ↑/k      - Move up"),
        Line::from("  ↓/j      - Move down"),
        Line::from("  a        - Show/hide the creation form"),
        Line::from("  d        - Delete selected dossier"),
        Line::from("  r        - Reload from server"),
        Line::from(""),
        Line::from(Span::styled("Form:", Style::default().fg(Color::Cyan))),
        Line::from("  Tab/↓    - Next field"),
        Line::from("  Shift+Tab/↑ - Previous field"),
        Line::from("  Enter    - Submit"),
        Line::from("  Esc      - Close form"),
        Line::from(""),
        Line::from(Span::styled("Other:", Style::default().fg(Color::Cyan))),
        Line::from("  L        - Log out"),
        Line::from("  ?        - Toggle this help"),
        Line::from("  q        - Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or ESC to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text);
    paragraph.render(inner, buf);
}

/// Render status bar at bottom
pub fn render_status_bar(area: Rect, buf: &mut Buffer, message: Option<&str>) {
    let mut spans = Vec::new();

    if let Some(message) = message {
        spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        " Press ? for help ",
        Style::default().fg(Color::Gray).bg(Color::DarkGray),
    ));

    Paragraph::new(Line::from(spans)).render(area, buf);
}
