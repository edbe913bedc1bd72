// SPDX-License-Identifier: PMPL-1.0-or-later

//! Interactive demo viewer: scroll the virtual page with the keyboard and
//! watch the protocol demo react.

use super::render::frame_lines;
use crate::view::SiteView;
use anyhow::Result;
use colored::*;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(100);

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Scroll(f64),
    Top,
    Bottom,
    Quit,
    None,
}

fn action_for(code: KeyCode, step: f64, page: f64) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::Scroll(step),
        KeyCode::Char('k') | KeyCode::Up => Action::Scroll(-step),
        KeyCode::PageDown | KeyCode::Char(' ') => Action::Scroll(page),
        KeyCode::PageUp => Action::Scroll(-page),
        KeyCode::Home | KeyCode::Char('g') => Action::Top,
        KeyCode::End | KeyCode::Char('G') => Action::Bottom,
        _ => Action::None,
    }
}

pub struct DemoTui;

impl DemoTui {
    pub fn run(view: &mut SiteView, step: f64) -> Result<()> {
        terminal::enable_raw_mode()?;
        let result = Self::run_inner(view, step);
        terminal::disable_raw_mode()?;
        result
    }

    fn run_inner(view: &mut SiteView, step: f64) -> Result<()> {
        let mut stdout = stdout();
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        let page = view.viewport().height * 0.8;
        if let Some(top) = view.layout().section_top(crate::site::layout::DEMO_ANCHOR) {
            view.scroll_to((top - view.viewport().height).max(0.0), Instant::now());
        }

        loop {
            view.tick(Instant::now());
            Self::render(&mut stdout, view)?;

            if event::poll(POLL)? {
                if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                    let now = Instant::now();
                    match action_for(code, step, page) {
                        Action::Quit => break,
                        Action::Scroll(delta) => {
                            view.scroll_by(delta, now);
                        }
                        Action::Top => {
                            view.scroll_to(0.0, now);
                        }
                        Action::Bottom => {
                            view.scroll_to(view.max_scroll(), now);
                        }
                        Action::None => {}
                    }
                }
            }
        }

        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(())
    }

    fn render(stdout: &mut impl Write, view: &SiteView) -> Result<()> {
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        write!(
            stdout,
            "{}  {}\r\n\r\n",
            "VERITAS PROTOCOL DEMO".bold().cyan(),
            format!(
                "scroll {:.0}/{:.0}",
                view.viewport().scroll_y,
                view.max_scroll()
            )
            .dimmed()
        )?;
        match view.demo_frame() {
            Some(frame) => {
                for line in frame_lines(&frame) {
                    write!(stdout, "{}\r\n", line)?;
                }
            }
            None => write!(stdout, "{}\r\n", "demo not mounted on this page".yellow())?,
        }
        write!(
            stdout,
            "\r\n{}\r\n",
            "Controls: [j/Down] Scroll, [k/Up] Back, [Space/PgDn] Page, [g/G] Top/Bottom, [q/Esc] Quit"
                .dimmed()
        )?;
        stdout.flush()?;
        Ok(())
    }
}
