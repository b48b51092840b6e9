use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use super::app::{Action, App};
use super::widgets;
use crate::api::ApiClient;

/// Dashboard manages the TUI lifecycle
pub struct Dashboard<'a> {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    client: &'a ApiClient,
    restored: bool,
}

impl<'a> Dashboard<'a> {
    /// Take over the terminal for an already mounted app
    pub fn new(app: App, client: &'a ApiClient) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            app,
            client,
            restored: false,
        })
    }

    /// Run the dashboard event loop; returns the final state
    pub async fn run(mut self) -> Result<App> {
        loop {
            let app = &self.app;
            self.terminal.draw(|f| ui(f, app))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = self.app.handle_key(key.code) {
                            self.perform(action).await?;
                        }
                    }
                }
            }

            if self.app.should_quit {
                break;
            }
        }

        self.cleanup()?;
        Ok(std::mem::replace(&mut self.app, App::new(String::new())))
    }

    async fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Submit => match self.app.submit_form(self.client).await {
                Ok(true) => self.app.message = Some("Dossier created".to_string()),
                Ok(false) => {}
                Err(e) => self.app.message = Some(e.to_string()),
            },
            Action::Delete(numero) => {
                if self.app.delete_dossier(self.client, &numero).await {
                    self.app.message = Some(format!("Dossier {} deleted", numero));
                }
            }
            Action::Reload => self.app.reload(self.client).await,
            Action::Logout => {
                self.client.logout()?;
                self.app.logged_out = true;
                self.app.should_quit = true;
            }
        }

        Ok(())
    }

    /// Restore the terminal
    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl Drop for Dashboard<'_> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the UI
fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    let form_height = if app.show_form { 8 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(form_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    widgets::render_header(chunks[0], f.buffer_mut(), &app.username);
    widgets::render_summary(chunks[1], f.buffer_mut(), &app.summary());

    if app.show_form {
        widgets::render_form(chunks[2], f.buffer_mut(), &app.form, app.focused());
    }

    widgets::render_dossiers(
        chunks[3],
        f.buffer_mut(),
        &app.dossiers,
        app.selected_index,
        !app.show_form,
    );

    widgets::render_status_bar(chunks[4], f.buffer_mut(), app.message.as_deref());

    if let Some(numero) = &app.pending_delete {
        let area = centered_rect(50, 20, size);
        widgets::render_confirm_delete(area, f.buffer_mut(), numero);
    }

    if app.show_help {
        let help_area = centered_rect(60, 70, size);
        widgets::render_help_overlay(help_area, f.buffer_mut());
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
