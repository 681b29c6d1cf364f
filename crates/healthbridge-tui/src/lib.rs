// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

//! Terminal presentation of the five screens. Pure view layer: reads the
//! session accessors, calls back only through `dispatch` and the field
//! setters.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use healthbridge_app::format::{format_distance, format_phone, format_rating};
use healthbridge_app::{
    Advisor, Benefit, INSURANCE_PLANS, NavigationStep, Provider, Role, SPECIALTIES, Session,
    SessionCommand,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use std::io::{Stdout, stdout};

const SEARCH_FIELDS: [&str; 3] = ["specialty", "insurance plan", "location"];
const INQUIRY_FIELDS: [&str; 4] = ["household size", "annual income", "current insurance", "location"];

pub fn run_app(session: &mut Session, advisor: &mut dyn Advisor) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, session, advisor);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).context("enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(out)).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

#[derive(Debug, Default)]
struct ViewState {
    search_focus: usize,
    inquiry_focus: usize,
    chat_input: String,
    quit: bool,
}

/// A submit that should show its loading frame before the blocking
/// dispatch runs.
struct PendingSubmit {
    command: SessionCommand,
    loading: &'static str,
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    advisor: &mut dyn Advisor,
) -> Result<()> {
    let mut view = ViewState::default();

    loop {
        terminal
            .draw(|frame| draw(frame.area(), frame.buffer_mut(), session, &view))
            .context("draw frame")?;

        let Event::Key(key) = event::read().context("read terminal event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let pending = handle_key(session, &mut view, key);
        if view.quit {
            return Ok(());
        }

        if let Some(submit) = pending {
            terminal
                .draw(|frame| {
                    draw_loading(frame.area(), frame.buffer_mut(), submit.loading);
                })
                .context("draw loading frame")?;
            session.dispatch(submit.command, advisor);
        }
    }
}

fn handle_key(session: &mut Session, view: &mut ViewState, key: KeyEvent) -> Option<PendingSubmit> {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        view.quit = true;
        return None;
    }
    if key.code == KeyCode::Esc && session.step() != NavigationStep::Home {
        navigate(session, NavigationStep::Home);
        return None;
    }

    match session.step() {
        NavigationStep::Home => handle_home_key(session, view, key),
        NavigationStep::ProviderSearch => return handle_search_key(session, view, key),
        NavigationStep::BenefitsCheck => return handle_inquiry_key(session, view, key),
        NavigationStep::AppointmentHelp => return handle_chat_key(session, view, key),
        NavigationStep::Results => handle_results_key(session, key),
    }
    None
}

fn handle_home_key(session: &mut Session, view: &mut ViewState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => view.quit = true,
        KeyCode::Char('1') => navigate(session, NavigationStep::ProviderSearch),
        KeyCode::Char('2') => navigate(session, NavigationStep::BenefitsCheck),
        KeyCode::Char('3') => navigate(session, NavigationStep::AppointmentHelp),
        KeyCode::Char('4') => navigate(session, NavigationStep::Results),
        _ => {}
    }
}

fn handle_search_key(
    session: &mut Session,
    view: &mut ViewState,
    key: KeyEvent,
) -> Option<PendingSubmit> {
    match key.code {
        KeyCode::Tab => view.search_focus = (view.search_focus + 1) % SEARCH_FIELDS.len(),
        KeyCode::BackTab => {
            view.search_focus = (view.search_focus + SEARCH_FIELDS.len() - 1) % SEARCH_FIELDS.len();
        }
        KeyCode::Enter => {
            if session.filters().is_search_ready() {
                return Some(PendingSubmit {
                    command: SessionCommand::SubmitProviderSearch,
                    loading: "Finding providers...",
                });
            }
        }
        KeyCode::Left | KeyCode::Right => {
            let forward = key.code == KeyCode::Right;
            match view.search_focus {
                0 => {
                    let next = cycle_option(&SPECIALTIES, &session.filters().specialty, forward);
                    session.set_specialty(next);
                }
                1 => {
                    let next =
                        cycle_option(&INSURANCE_PLANS, &session.filters().insurance_plan, forward);
                    session.set_insurance_plan(next);
                }
                _ => {}
            }
        }
        KeyCode::Char(ch) if view.search_focus == 2 => {
            let mut location = session.filters().location.clone();
            location.push(ch);
            session.set_search_location(&location);
        }
        KeyCode::Backspace if view.search_focus == 2 => {
            let mut location = session.filters().location.clone();
            location.pop();
            session.set_search_location(&location);
        }
        _ => {}
    }
    None
}

fn handle_inquiry_key(
    session: &mut Session,
    view: &mut ViewState,
    key: KeyEvent,
) -> Option<PendingSubmit> {
    match key.code {
        KeyCode::Tab => view.inquiry_focus = (view.inquiry_focus + 1) % INQUIRY_FIELDS.len(),
        KeyCode::BackTab => {
            view.inquiry_focus =
                (view.inquiry_focus + INQUIRY_FIELDS.len() - 1) % INQUIRY_FIELDS.len();
        }
        KeyCode::Enter => {
            if session.inquiry().is_submittable() {
                return Some(PendingSubmit {
                    command: SessionCommand::SubmitBenefitCheck,
                    loading: "Checking benefits...",
                });
            }
        }
        KeyCode::Up if view.inquiry_focus == 0 => {
            session.set_household_size(session.inquiry().household_size + 1);
        }
        KeyCode::Down if view.inquiry_focus == 0 => {
            session.set_household_size(session.inquiry().household_size - 1);
        }
        KeyCode::Left | KeyCode::Right if view.inquiry_focus == 2 => {
            let forward = key.code == KeyCode::Right;
            let next = cycle_option(
                &INSURANCE_PLANS,
                &session.inquiry().current_insurance,
                forward,
            );
            session.set_current_insurance(next);
        }
        KeyCode::Char(ch) => match view.inquiry_focus {
            1 => {
                if let Some(digit) = ch.to_digit(10) {
                    session.set_income(push_digit(session.inquiry().income, digit));
                }
            }
            3 => {
                let mut location = session.inquiry().location.clone();
                location.push(ch);
                session.set_inquiry_location(&location);
            }
            _ => {}
        },
        KeyCode::Backspace => match view.inquiry_focus {
            1 => session.set_income(pop_digit(session.inquiry().income)),
            3 => {
                let mut location = session.inquiry().location.clone();
                location.pop();
                session.set_inquiry_location(&location);
            }
            _ => {}
        },
        _ => {}
    }
    None
}

fn handle_chat_key(
    session: &mut Session,
    view: &mut ViewState,
    key: KeyEvent,
) -> Option<PendingSubmit> {
    match key.code {
        KeyCode::Enter => {
            if !view.chat_input.trim().is_empty() && !session.chat_busy() {
                let text = std::mem::take(&mut view.chat_input);
                return Some(PendingSubmit {
                    command: SessionCommand::SendChatMessage(text),
                    loading: "Thinking...",
                });
            }
        }
        KeyCode::Char(ch) => view.chat_input.push(ch),
        KeyCode::Backspace => {
            view.chat_input.pop();
        }
        _ => {}
    }
    None
}

fn handle_results_key(session: &mut Session, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => navigate(session, NavigationStep::ProviderSearch),
        KeyCode::Char('b') => navigate(session, NavigationStep::BenefitsCheck),
        _ => {}
    }
}

fn navigate(session: &mut Session, step: NavigationStep) {
    // The view never mutates state directly; even navigation goes through
    // dispatch. A no-op advisor is enough because Navigate never calls it.
    struct NoAdvisor;
    impl Advisor for NoAdvisor {
        fn advice(&mut self, _query: &str) -> Result<String> {
            anyhow::bail!("advisor is not available during navigation")
        }

        fn eligibility_analysis(
            &mut self,
            _inquiry: &healthbridge_app::InquiryDetails,
        ) -> Result<String> {
            anyhow::bail!("advisor is not available during navigation")
        }
    }
    session.dispatch(SessionCommand::Navigate(step), &mut NoAdvisor);
}

/// Cycles through a fixed option list. An unset or unknown current value
/// selects the first option.
fn cycle_option<'a>(options: &'a [&'a str], current: &str, forward: bool) -> &'a str {
    let Some(index) = options.iter().position(|option| *option == current) else {
        return options[0];
    };
    let len = options.len();
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    options[next]
}

/// Whole-dollar editing: appending a digit shifts the amount left.
fn push_digit(amount: f64, digit: u32) -> f64 {
    (amount * 10.0 + f64::from(digit)).min(99_999_999.0)
}

fn pop_digit(amount: f64) -> f64 {
    (amount / 10.0).floor()
}

fn draw(area: Rect, buffer: &mut ratatui::buffer::Buffer, session: &Session, view: &ViewState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "HealthBridge",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            session.step().label(),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::bordered());
    title.render(header, buffer);

    match session.step() {
        NavigationStep::Home => draw_home(body, buffer),
        NavigationStep::ProviderSearch => draw_search(body, buffer, session, view),
        NavigationStep::BenefitsCheck => draw_inquiry(body, buffer, session, view),
        NavigationStep::AppointmentHelp => draw_chat(body, buffer, session, view),
        NavigationStep::Results => draw_results(body, buffer, session),
    }

    let status = session.status_line().unwrap_or(
        "esc: home  tab: next field  enter: submit  ctrl-q: quit",
    );
    Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray))
        .render(footer, buffer);
}

fn draw_loading(area: Rect, buffer: &mut ratatui::buffer::Buffer, message: &str) {
    Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::bordered())
        .render(area, buffer);
}

fn draw_home(area: Rect, buffer: &mut ratatui::buffer::Buffer) {
    let lines = vec![
        Line::from("Navigate healthcare with confidence and ease"),
        Line::from(""),
        Line::from("  1  Find Providers      search for doctors who accept your insurance"),
        Line::from("  2  Check Benefits      discover benefits you may qualify for"),
        Line::from("  3  Appointment Help    scheduling and transportation assistance"),
        Line::from("  4  Results             revisit your latest results"),
        Line::from(""),
        Line::from("  q  Quit"),
    ];
    Paragraph::new(lines)
        .block(Block::bordered().title("welcome"))
        .render(area, buffer);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label}: "), style),
        Span::raw(value),
    ])
}

fn draw_search(area: Rect, buffer: &mut ratatui::buffer::Buffer, session: &Session, view: &ViewState) {
    let filters = session.filters();
    let lines = vec![
        Line::from("Search for doctors who accept your insurance plan"),
        Line::from(""),
        field_line(
            SEARCH_FIELDS[0],
            display_or_hint(&filters.specialty, "left/right to choose"),
            view.search_focus == 0,
        ),
        field_line(
            SEARCH_FIELDS[1],
            display_or_hint(&filters.insurance_plan, "left/right to choose"),
            view.search_focus == 1,
        ),
        field_line(
            SEARCH_FIELDS[2],
            display_or_hint(&filters.location, "type a ZIP code or city"),
            view.search_focus == 2,
        ),
        Line::from(""),
        Line::from(if filters.is_search_ready() {
            "enter: search providers"
        } else {
            "fill in all fields to search"
        }),
    ];
    Paragraph::new(lines)
        .block(Block::bordered().title("find providers"))
        .render(area, buffer);
}

fn draw_inquiry(area: Rect, buffer: &mut ratatui::buffer::Buffer, session: &Session, view: &ViewState) {
    let inquiry = session.inquiry();
    let income = if inquiry.income > 0.0 {
        format!("${:.0}", inquiry.income)
    } else {
        "type your annual income".to_owned()
    };
    let lines = vec![
        Line::from("Find additional healthcare benefits you may qualify for"),
        Line::from(""),
        field_line(
            INQUIRY_FIELDS[0],
            format!("{} (up/down)", inquiry.household_size),
            view.inquiry_focus == 0,
        ),
        field_line(INQUIRY_FIELDS[1], income, view.inquiry_focus == 1),
        field_line(
            INQUIRY_FIELDS[2],
            display_or_hint(&inquiry.current_insurance, "left/right to choose"),
            view.inquiry_focus == 2,
        ),
        field_line(
            INQUIRY_FIELDS[3],
            display_or_hint(&inquiry.location, "type a ZIP code or city"),
            view.inquiry_focus == 3,
        ),
        Line::from(""),
        Line::from(if inquiry.is_submittable() {
            "enter: check benefits"
        } else {
            "fill in income, insurance, and location to submit"
        }),
    ];
    Paragraph::new(lines)
        .block(Block::bordered().title("check benefits"))
        .render(area, buffer);
}

fn draw_chat(area: Rect, buffer: &mut ratatui::buffer::Buffer, session: &Session, view: &ViewState) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    let mut lines = vec![Line::from(
        "Ask about healthcare, benefits, or appointments.",
    )];
    for message in session.transcript() {
        let (label, color) = match message.role {
            Role::User => ("you", Color::Cyan),
            Role::Assistant => ("assistant", Color::Green),
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{label}:"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for part in message.content.lines() {
            lines.push(Line::from(format!("  {part}")));
        }
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title("appointment assistant"))
        .render(transcript_area, buffer);

    Paragraph::new(view.chat_input.as_str())
        .block(Block::bordered().title("message (enter to send)"))
        .render(input_area, buffer);
}

fn draw_results(area: Rect, buffer: &mut ratatui::buffer::Buffer, session: &Session) {
    let mut lines = Vec::new();

    if !session.providers().is_empty() {
        lines.push(Line::from(format!(
            "Found {} providers for {}",
            session.providers().len(),
            session.filters().specialty,
        )));
        for provider in session.providers() {
            lines.extend(provider_lines(provider));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("s: search again"));
    } else if !session.benefits().is_empty() {
        lines.push(Line::from(format!(
            "You may qualify for these {} benefits",
            session.benefits().len(),
        )));
        for benefit in session.benefits() {
            lines.extend(benefit_lines(benefit));
        }
        if let Some(note) = session.eligibility_note() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Eligibility analysis:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for part in note.lines() {
                lines.push(Line::from(format!("  {part}")));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from("b: check again"));
    } else {
        lines.push(Line::from("No results found. Please try again."));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title("results"))
        .render(area, buffer);
}

fn provider_lines(provider: &Provider) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            provider.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  {}", provider.specialty)),
        Line::from(format!("  {}", provider.address)),
        Line::from(format!("  {}", format_phone(&provider.phone))),
        Line::from(format!(
            "  rating {} ({} reviews)",
            format_rating(provider.rating),
            provider.review_count,
        )),
        Line::from(format!(
            "  accepts: {}",
            provider.accepted_insurance.join(", "),
        )),
    ];
    if let Some(distance) = provider.distance_miles {
        lines.push(Line::from(format!("  {}", format_distance(distance))));
    }
    if let Some(availability) = &provider.availability {
        lines.push(Line::from(format!("  {availability}")));
    }
    lines
}

fn benefit_lines(benefit: &Benefit) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} [{}]", benefit.name, benefit.category.as_str()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  {}", benefit.description)),
    ];
    for requirement in &benefit.eligibility_requirements {
        lines.push(Line::from(format!("  - {requirement}")));
    }
    lines.push(Line::from(format!("  apply: {}", benefit.application_process)));
    if let Some(savings) = benefit.estimated_savings {
        lines.push(Line::from(format!("  estimated savings: ${savings}/month")));
    }
    lines
}

fn display_or_hint(value: &str, hint: &str) -> String {
    if value.is_empty() {
        format!("({hint})")
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{cycle_option, display_or_hint, pop_digit, push_digit};
    use healthbridge_app::SPECIALTIES;

    #[test]
    fn cycle_option_wraps_both_directions() {
        assert_eq!(cycle_option(&SPECIALTIES, "Primary Care", true), "Pediatrics");
        assert_eq!(cycle_option(&SPECIALTIES, "Primary Care", false), "Other");
        assert_eq!(cycle_option(&SPECIALTIES, "Other", true), "Primary Care");
    }

    #[test]
    fn cycle_option_defaults_unknown_values_to_first() {
        assert_eq!(cycle_option(&SPECIALTIES, "", true), "Primary Care");
        assert_eq!(cycle_option(&SPECIALTIES, "Astrology", false), "Primary Care");
    }

    #[test]
    fn income_digit_editing() {
        let mut amount = 0.0;
        for digit in [2, 5, 0, 0, 0] {
            amount = push_digit(amount, digit);
        }
        assert_eq!(amount, 25_000.0);
        assert_eq!(pop_digit(amount), 2_500.0);
        assert_eq!(pop_digit(1.0), 0.0);
    }

    #[test]
    fn empty_fields_render_hints() {
        assert_eq!(display_or_hint("", "choose"), "(choose)");
        assert_eq!(display_or_hint("Medicaid", "choose"), "Medicaid");
    }
}
