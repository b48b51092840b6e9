use anyhow::Result;
use crossterm::event::KeyCode;

use crate::api::{ApiClient, ApiError};
use crate::models::{Dossier, DossierSummary, FormField, NewDossier};

/// Work the dashboard loop has to hand to the API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit,
    Delete(String),
    Reload,
    Logout,
}

/// Dashboard state: the loaded dossiers plus what the user is doing with them
pub struct App {
    /// Name returned by the last token refresh, used as owner of new dossiers
    pub username: String,
    pub dossiers: Vec<Dossier>,
    /// Creation form visibility
    pub show_form: bool,
    pub form: NewDossier,
    pub focused_field: usize,
    /// Dossier waiting for a y/n confirmation
    pub pending_delete: Option<String>,
    pub selected_index: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub logged_out: bool,
    /// One-line feedback in the status bar
    pub message: Option<String>,
}

impl App {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            dossiers: Vec::new(),
            show_form: false,
            form: NewDossier::default(),
            focused_field: 0,
            pending_delete: None,
            selected_index: 0,
            show_help: false,
            should_quit: false,
            logged_out: false,
            message: None,
        }
    }

    /// Check the session and load the dossiers.
    ///
    /// A refresh that yields nothing logs the user out and fails with
    /// `ApiError::SessionExpired`.
    pub async fn mount(client: &ApiClient) -> Result<Self> {
        let Some(refreshed) = client.refresh_token().await else {
            tracing::info!("Session could not be refreshed, logging out");
            client.logout()?;
            return Err(ApiError::SessionExpired.into());
        };

        let mut app = Self::new(refreshed.username.unwrap_or_default());
        app.reload(client).await;
        Ok(app)
    }

    /// Fetch the list again; on failure the current list is kept
    pub async fn reload(&mut self, client: &ApiClient) {
        match client.list_dossiers().await {
            Ok(dossiers) => {
                self.dossiers = dossiers;
                self.clamp_selection();
            }
            Err(e) => tracing::error!("Failed to fetch dossiers: {:#}", e),
        }
    }

    pub fn summary(&self) -> DossierSummary {
        DossierSummary::from_dossiers(&self.dossiers)
    }

    pub fn selected_dossier(&self) -> Option<&Dossier> {
        self.dossiers.get(self.selected_index)
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focused_field % FormField::ALL.len()]
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
        self.focused_field = 0;
    }

    /// Create a dossier from `form`.
    ///
    /// Validation failures are returned; API failures are logged and give
    /// `Ok(false)`. On success the created record is appended to the list.
    pub async fn add_dossier(&mut self, client: &ApiClient, form: &NewDossier) -> Result<bool> {
        form.validate().map_err(ApiError::from)?;

        match client.create_dossier(form, &self.username).await {
            Ok(created) => {
                tracing::info!("Created dossier {}", created.numero);
                self.dossiers.push(created);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Failed to create dossier {}: {:#}", form.numero, e);
                Ok(false)
            }
        }
    }

    /// Submit the creation form; it is reset and hidden once the dossier exists
    pub async fn submit_form(&mut self, client: &ApiClient) -> Result<bool> {
        let form = self.form.clone();
        let created = self.add_dossier(client, &form).await?;

        if created {
            self.form = NewDossier::default();
            self.show_form = false;
            self.focused_field = 0;
        }

        Ok(created)
    }

    /// Delete a dossier; the local list only changes if the API call succeeded
    pub async fn delete_dossier(&mut self, client: &ApiClient, numero: &str) -> bool {
        match client.delete_dossier(numero).await {
            Ok(()) => {
                self.remove_local(numero);
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete dossier {}: {:#}", numero, e);
                false
            }
        }
    }

    fn remove_local(&mut self, numero: &str) {
        self.dossiers.retain(|d| d.numero != numero);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self
            .selected_index
            .min(self.dossiers.len().saturating_sub(1));
    }

    /// Handle keyboard input, returning the API work to do if any
    pub fn handle_key(&mut self, key: KeyCode) -> Option<Action> {
        // Help overlay takes precedence
        if self.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return None;
        }

        if let Some(numero) = self.pending_delete.take() {
            return match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Delete(numero)),
                _ => None,
            };
        }

        if self.show_form {
            return self.handle_form_key(key);
        }

        self.message = None;

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }

            KeyCode::Char('?') => {
                self.show_help = true;
            }

            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.toggle_form();
            }

            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                self.pending_delete = self.selected_dossier().map(|d| d.numero.clone());
            }

            KeyCode::Char('r') | KeyCode::Char('R') => return Some(Action::Reload),

            KeyCode::Char('L') => return Some(Action::Logout),

            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.dossiers.len() {
                    self.selected_index += 1;
                }
            }

            _ => {}
        }

        None
    }

    fn handle_form_key(&mut self, key: KeyCode) -> Option<Action> {
        let fields = FormField::ALL.len();

        match key {
            KeyCode::Esc => self.toggle_form(),
            KeyCode::Enter => return Some(Action::Submit),
            KeyCode::Tab | KeyCode::Down => {
                self.focused_field = (self.focused_field + 1) % fields;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused_field = (self.focused_field + fields - 1) % fields;
            }
            KeyCode::Backspace => {
                let field = self.focused();
                self.form.field_mut(field).pop();
            }
            KeyCode::Char(c) => {
                let field = self.focused();
                self.form.field_mut(field).push(c);
            }
            _ => {}
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DossierStatus;

    fn dossier(numero: &str) -> Dossier {
        Dossier {
            numero: numero.to_string(),
            dostype: "RH".to_string(),
            responsable: "alice".to_string(),
            dosdef: String::new(),
            tef: String::new(),
            bon_caisse: String::new(),
            mandat_paiement: String::new(),
            statut: DossierStatus::Pending,
        }
    }

    fn app_with(numeros: &[&str]) -> App {
        let mut app = App::new("alice");
        app.dossiers = numeros.iter().map(|n| dossier(n)).collect();
        app
    }

    #[test]
    fn test_form_toggle_and_typing() {
        let mut app = app_with(&[]);

        assert_eq!(app.handle_key(KeyCode::Char('a')), None);
        assert!(app.show_form);

        for c in "D7".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Tab);
        for c in "RHx".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Backspace);

        assert_eq!(app.form.numero, "D7");
        assert_eq!(app.form.dostype, "RH");
        assert_eq!(app.handle_key(KeyCode::Enter), Some(Action::Submit));

        app.handle_key(KeyCode::Esc);
        assert!(!app.show_form);
        // Form content survives hiding
        assert_eq!(app.form.numero, "D7");
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut app = app_with(&[]);
        app.toggle_form();

        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.focused(), FormField::MandatPaiement);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focused(), FormField::Numero);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app_with(&["D1", "D2"]);
        app.handle_key(KeyCode::Down);

        assert_eq!(app.handle_key(KeyCode::Char('d')), None);
        assert_eq!(app.pending_delete.as_deref(), Some("D2"));

        assert_eq!(
            app.handle_key(KeyCode::Char('y')),
            Some(Action::Delete("D2".to_string()))
        );
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_delete_cancelled() {
        let mut app = app_with(&["D1"]);
        app.handle_key(KeyCode::Char('d'));

        assert_eq!(app.handle_key(KeyCode::Char('n')), None);
        assert!(app.pending_delete.is_none());
        assert_eq!(app.dossiers.len(), 1);
    }

    #[test]
    fn test_delete_on_empty_list_does_nothing() {
        let mut app = app_with(&[]);
        app.handle_key(KeyCode::Char('d'));
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_remove_local_keeps_others() {
        let mut app = app_with(&["D1", "D2", "D3"]);
        app.selected_index = 2;

        app.remove_local("D3");

        let left: Vec<&str> = app.dossiers.iter().map(|d| d.numero.as_str()).collect();
        assert_eq!(left, vec!["D1", "D2"]);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut app = app_with(&["D1", "D2"]);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_index, 0);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app_with(&["D1"]);
        app.handle_key(KeyCode::Char('?'));
        assert!(app.show_help);

        assert_eq!(app.handle_key(KeyCode::Char('q')), None);
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn test_quit_reload_logout_keys() {
        let mut app = app_with(&[]);
        assert_eq!(app.handle_key(KeyCode::Char('r')), Some(Action::Reload));
        assert_eq!(app.handle_key(KeyCode::Char('L')), Some(Action::Logout));
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_summary_follows_list() {
        let mut app = app_with(&["D1", "D2"]);
        app.dossiers[0].statut = DossierStatus::Done;

        let summary = app.summary();
        assert_eq!((summary.total, summary.done, summary.pending), (2, 1, 1));

        app.remove_local("D1");
        assert_eq!(app.summary().done, 0);
    }
}
