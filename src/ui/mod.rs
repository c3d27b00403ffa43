use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};
use chrono::Month;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::grid::{GridDay, MonthGrid};
use crate::models::{FormField, InputMode, NavigateFocus};

pub mod color_parser;
pub mod components;
pub mod popups;
pub mod theme;

use components::truncate_to_width;
use popups::{render_alert_popup, render_delete_event_popup, render_help_popup};
use theme::ThemeTokens;

const FORM_HEIGHT: u16 = 8;
const LABEL_WIDTH: u16 = 10;

pub fn ui(f: &mut Frame, app: &mut App) {
    let tokens = ThemeTokens::from_theme(&app.config.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Recomputed every frame.
    let grid = app.grid();
    render_header(f, chunks[0], app, &grid, &tokens);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_grid(f, body[0], app, &grid, &tokens);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(1)])
        .split(body[1]);
    render_form(f, side[0], app, &tokens);
    render_day_panel(f, side[1], app, &tokens);

    render_status_bar(f, chunks[2], app, &tokens);

    if app.show_help_popup {
        render_help_popup(f, app, &tokens);
    }
    if app.delete_target.is_some() {
        render_delete_event_popup(f, app);
    }
    if app.alert_message.is_some() {
        render_alert_popup(f, app, &tokens);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, grid: &MonthGrid, tokens: &ThemeTokens) {
    let kb = &app.config.keybindings.global;
    let prev = kb.prev_month.first().map(String::as_str).unwrap_or("");
    let next = kb.next_month.first().map(String::as_str).unwrap_or("");
    let month_name = u8::try_from(grid.month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or_default();
    let title = format!("{month_name} {}", grid.year);

    let line = Line::from(vec![
        Span::styled(format!("← {prev}"), Style::default().fg(tokens.ui_muted)),
        Span::raw("   "),
        Span::styled(
            title,
            Style::default()
                .fg(tokens.ui_accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(format!("{next} →"), Style::default().fg(tokens.ui_muted)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(tokens.ui_border));
    f.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_grid(f: &mut Frame, area: Rect, app: &App, grid: &MonthGrid, tokens: &ThemeTokens) {
    let focused = app.input_mode == InputMode::Navigate && app.navigate_focus == NavigateFocus::Grid;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_for(focused)));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height < 2 || grid.weeks.is_empty() {
        return;
    }

    let mut rows = vec![Constraint::Length(1)];
    let week_count = grid.weeks.len() as u32;
    rows.extend((0..week_count).map(|_| Constraint::Ratio(1, week_count)));
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows)
        .split(inner);

    let column_constraints = [Constraint::Ratio(1, 7); 7];
    let header_cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(column_constraints)
        .split(row_areas[0]);
    let names = app.config.calendar.week_start.day_names();
    for (name, cell) in names.iter().zip(header_cells.iter()) {
        f.render_widget(
            Paragraph::new(*name)
                .alignment(Alignment::Center)
                .style(Style::default().fg(tokens.ui_accent).add_modifier(Modifier::BOLD)),
            *cell,
        );
    }

    for (week, row_area) in grid.weeks.iter().zip(row_areas.iter().skip(1)) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints)
            .split(*row_area);
        for (day, cell) in week.iter().zip(cells.iter()) {
            render_day_cell(f, *cell, app, day, tokens);
        }
    }
}

fn render_day_cell(f: &mut Frame, area: Rect, app: &App, day: &GridDay, tokens: &ThemeTokens) {
    let is_selected = day.date == app.selected_day;
    let mut number_style = Style::default();
    if !day.in_month {
        number_style = number_style.fg(tokens.day_dimmed);
    }
    if day.is_today {
        number_style = number_style
            .fg(tokens.day_today)
            .add_modifier(Modifier::BOLD);
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(day.date.format("%-d").to_string(), number_style));
    block = if is_selected {
        block
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(tokens.ui_border_focus))
    } else if day.in_month {
        block.border_style(Style::default().fg(tokens.ui_border))
    } else {
        block.border_style(Style::default().fg(tokens.day_dimmed))
    };
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let events = app.store.find_by_date(&day.iso());
    let width = inner.width as usize;
    let capacity = inner.height as usize;
    let event_style = if day.in_month {
        Style::default().fg(tokens.event_fg)
    } else {
        Style::default().fg(tokens.day_dimmed)
    };

    let mut lines: Vec<Line> = Vec::new();
    let overflow = events.len() > capacity;
    let shown = if overflow {
        capacity.saturating_sub(1)
    } else {
        events.len()
    };
    for (_, event) in events.iter().take(shown) {
        let label = format!("{} {}", event.time, event.title);
        lines.push(Line::from(Span::styled(
            truncate_to_width(&label, width),
            event_style,
        )));
    }
    if overflow {
        let more = format!("+{} more", events.len() - shown);
        lines.push(Line::from(Span::styled(
            truncate_to_width(&more, width),
            Style::default().fg(tokens.ui_muted),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_form(f: &mut Frame, area: Rect, app: &mut App, tokens: &ThemeTokens) {
    let focused = app.input_mode == InputMode::Editing;
    let title = if app.is_editing_event() {
        " Edit Event "
    } else {
        " New Event "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_for(focused)));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    for (field, row) in FormField::all().into_iter().zip(rows.iter()) {
        if row.height == 0 {
            continue;
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
            .split(*row);
        let is_active = focused && app.form.active == field;
        let label_style = if is_active {
            Style::default()
                .fg(tokens.ui_accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(tokens.ui_muted)
        };
        f.render_widget(
            Paragraph::new(field.label()).style(label_style),
            cols[0],
        );

        let textarea = app.form.area_mut(field);
        textarea.set_placeholder_style(Style::default().fg(tokens.ui_muted));
        textarea.set_cursor_style(if is_active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });
        f.render_widget(&*textarea, cols[1]);
    }

    let button_style = if focused {
        Style::default()
            .fg(tokens.ui_accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(tokens.ui_muted)
    };
    f.render_widget(
        Paragraph::new(format!("[ {} ]", app.submit_label()))
            .alignment(Alignment::Center)
            .style(button_style),
        rows[5],
    );
}

fn render_day_panel(f: &mut Frame, area: Rect, app: &mut App, tokens: &ThemeTokens) {
    let focused =
        app.input_mode == InputMode::Navigate && app.navigate_focus == NavigateFocus::DayEvents;
    let title = format!(" {} ", app.selected_day.format("%a %b %-d, %Y"));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_for(focused)));

    let kb = &app.config.keybindings.day;
    let hint = format!(
        "{}: Edit  {}: Delete",
        kb.edit.first().map(String::as_str).unwrap_or("-"),
        kb.delete.first().map(String::as_str).unwrap_or("-"),
    );
    let width = block.inner(area).width as usize;

    let events = app.selected_day_events();
    let items: Vec<ListItem> = if events.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No events",
            Style::default().fg(tokens.ui_muted),
        )))]
    } else {
        events
            .iter()
            .map(|(_, event)| {
                let summary = truncate_to_width(&event.summary(), width.saturating_sub(2));
                ListItem::new(vec![
                    Line::from(Span::styled(summary, Style::default().fg(tokens.event_fg))),
                    Line::from(Span::styled(
                        format!("  {hint}"),
                        Style::default().fg(tokens.ui_muted),
                    )),
                ])
            })
            .collect()
    };

    let highlight = Style::default()
        .bg(tokens.ui_selection_bg)
        .add_modifier(Modifier::BOLD);
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("▸ ");

    let mut state = if focused {
        app.day_events_state.clone()
    } else {
        Default::default()
    };
    f.render_stateful_widget(list, area, &mut state);
    if focused {
        app.day_events_state = state;
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, tokens: &ThemeTokens) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let mode_label = match app.input_mode {
        InputMode::Navigate => match app.navigate_focus {
            NavigateFocus::Grid => "CALENDAR",
            NavigateFocus::DayEvents => "DAY",
        },
        InputMode::Editing => {
            if app.is_editing_event() {
                "EDIT"
            } else {
                "NEW"
            }
        }
    };
    let left = Line::from(vec![
        Span::styled(
            format!(" {mode_label} "),
            Style::default()
                .fg(tokens.ui_accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{} events · {}", app.store.len(), app.store.location()),
            Style::default().fg(tokens.ui_muted),
        ),
    ]);

    let right_text = app
        .toast_message
        .clone()
        .unwrap_or_else(|| "? help".to_string());
    let right_width = (UnicodeWidthStr::width(right_text.as_str()) as u16 + 1)
        .min(area.width.saturating_sub(10));

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);
    f.render_widget(Paragraph::new(left), status_chunks[0]);
    f.render_widget(
        Paragraph::new(right_text)
            .style(Style::default().fg(tokens.ui_accent).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Right),
        status_chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::make_test_app;
    use crate::models::Event;
    use ratatui::{Terminal, backend::TestBackend};

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_month_title_weekdays_and_events() {
        let mut app = make_test_app();
        app.store
            .add(Event::new("Standup", "2024-03-12", "09:00", "30m"))
            .unwrap();
        let screen = render_to_string(&mut app, 160, 50);

        assert!(screen.contains("March 2024"));
        assert!(screen.contains("Sun"));
        assert!(screen.contains("Sat"));
        assert!(screen.contains("Standup"));
        assert!(screen.contains("[ Add Event ]"));
        assert!(screen.contains("09:00 - Standup (30m)"));
    }

    #[test]
    fn header_follows_the_displayed_month() {
        let mut app = make_test_app();
        for _ in 0..10 {
            app.next_month();
        }
        let screen = render_to_string(&mut app, 160, 50);
        assert!(screen.contains("January 2025"));
        assert!(!screen.contains("March 2024"));
    }

    #[test]
    fn submit_label_follows_edit_state() {
        let mut app = make_test_app();
        app.store
            .add(Event::new("Standup", "2024-03-12", "09:00", "30m"))
            .unwrap();
        app.begin_edit(0);
        let screen = render_to_string(&mut app, 160, 50);
        assert!(screen.contains("[ Update Event ]"));
        assert!(screen.contains("Edit Event"));
    }

    #[test]
    fn alert_popup_is_drawn_over_the_calendar() {
        let mut app = make_test_app();
        app.alert_message = Some(crate::app::MISSING_FIELDS_ALERT.to_string());
        let screen = render_to_string(&mut app, 120, 40);
        assert!(screen.contains("All fields required!"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = make_test_app();
        app.show_help_popup = true;
        render_to_string(&mut app, 10, 4);
    }
}
