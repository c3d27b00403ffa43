use super::components::centered_rect;
use crate::app::App;
use crate::config::KeyBindings;
use crate::ui::theme::ThemeTokens;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_alert_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let Some(message) = app.alert_message.as_deref() else {
        return;
    };
    let block = Block::default()
        .title(" Warning ")
        .borders(Borders::ALL)
        .style(Style::default().fg(tokens.alert_fg));
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .margin(2)
        .split(area);

    let body = Paragraph::new(message)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    let help_text =
        Paragraph::new("Enter/Esc: OK").style(Style::default().fg(Color::DarkGray));

    f.render_widget(body, text_area[0]);
    f.render_widget(help_text, text_area[1]);
}

pub fn render_delete_event_popup(f: &mut Frame, app: &App) {
    let title = app
        .delete_target
        .and_then(|id| app.store.position_of(id))
        .and_then(|position| app.store.get(position))
        .map(|event| event.title.clone())
        .unwrap_or_default();

    let block = Block::default()
        .title(" Delete this event? ")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::LightRed));
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .margin(2)
        .split(area);

    let body = Paragraph::new(format!("Delete \"{title}\"? (y)es / (n)o"))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    let help_text = Paragraph::new("Enter/y: delete  Esc/n: cancel")
        .style(Style::default().fg(Color::DarkGray));

    f.render_widget(body, text_area[0]);
    f.render_widget(help_text, text_area[1]);
}

fn fmt_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        "-".to_string()
    } else {
        keys.join(" / ")
    }
}

fn help_entries(kb: &KeyBindings) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    vec![
        (
            "Calendar",
            vec![
                ("Move day", format!("{} {}", fmt_keys(&kb.grid.left), fmt_keys(&kb.grid.right))),
                ("Move week", format!("{} {}", fmt_keys(&kb.grid.up), fmt_keys(&kb.grid.down))),
                ("Previous month", fmt_keys(&kb.global.prev_month)),
                ("Next month", fmt_keys(&kb.global.next_month)),
                ("Today", fmt_keys(&kb.global.today)),
                ("Open day", fmt_keys(&kb.grid.open_day)),
                ("New event", fmt_keys(&kb.global.add_event)),
                ("Quit", fmt_keys(&kb.global.quit)),
            ],
        ),
        (
            "Day events",
            vec![
                ("Select", format!("{} {}", fmt_keys(&kb.day.up), fmt_keys(&kb.day.down))),
                ("Edit", fmt_keys(&kb.day.edit)),
                ("Delete", fmt_keys(&kb.day.delete)),
                ("Back", fmt_keys(&kb.day.back)),
            ],
        ),
        (
            "Event form",
            vec![
                ("Submit", fmt_keys(&kb.form.submit)),
                ("Next field", fmt_keys(&kb.form.next_field)),
                ("Previous field", fmt_keys(&kb.form.prev_field)),
                ("Clear", fmt_keys(&kb.form.clear)),
                ("Leave form", fmt_keys(&kb.form.cancel)),
            ],
        ),
    ]
}

pub fn render_help_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.ui_border));
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .margin(2)
        .split(area);

    let header_style = Style::default()
        .fg(tokens.ui_accent)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(tokens.ui_accent);

    let sections = help_entries(&app.config.keybindings);
    let key_width = sections
        .iter()
        .flat_map(|(_, entries)| entries.iter())
        .map(|(_, keys)| keys.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (title, entries)) in sections.into_iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(title, header_style)));
        for (label, keys) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<key_width$}  "), key_style),
                Span::raw(label),
            ]));
        }
    }

    f.render_widget(Paragraph::new(Text::from(lines)), inner[0]);
    render_footer(f, inner[1], "Esc / ?: close", tokens);
}

fn render_footer(f: &mut Frame, area: Rect, text: &str, tokens: &ThemeTokens) {
    f.render_widget(
        Paragraph::new(text.to_string()).style(Style::default().fg(tokens.ui_muted)),
        area,
    );
}
