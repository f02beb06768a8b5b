//! Implements InputPort. Inquire-based interactive prompts.
//!
//! One menu iteration per action; pending toasts are drained and rendered
//! between actions. The menu adapts to session state: login/sign-up while
//! logged out, upload/logout while logged in.

use crate::domain::{Identity, PendingUpload, RepositoryError, SessionError, Severity};
use crate::ports::InputPort;
use crate::usecases::{
    GalleryRepository, NotificationBus, SessionStore, UploadPipeline, UploadStage,
};
use async_trait::async_trait;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, InquireError, Password, Select, Text};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const MENU_BROWSE: &str = "Browse gallery";
const MENU_UPLOAD: &str = "Upload image";
const MENU_LOGIN: &str = "Login";
const MENU_SIGNUP: &str = "Sign up";
const MENU_LOGOUT: &str = "Logout";
const MENU_QUIT: &str = "Quit";

/// TUI adapter. Inquire prompts over the application use cases.
pub struct TuiInputPort {
    session: Arc<SessionStore>,
    repository: Arc<GalleryRepository>,
    uploads: Arc<UploadPipeline>,
    toasts: Arc<NotificationBus>,
}

impl TuiInputPort {
    pub fn new(
        session: Arc<SessionStore>,
        repository: Arc<GalleryRepository>,
        uploads: Arc<UploadPipeline>,
        toasts: Arc<NotificationBus>,
    ) -> Self {
        Self {
            session,
            repository,
            uploads,
            toasts,
        }
    }

    fn render_toasts(&self) {
        for toast in self.toasts.drain() {
            let line = match &toast.body {
                Some(body) => format!("{} {}", toast.title, body),
                None => toast.title.clone(),
            };
            match toast.severity {
                Severity::Success => println!("{}", format!("[ok] {line}").green()),
                Severity::Error => println!("{}", format!("[!!] {line}").red()),
                Severity::Info => println!("{}", format!("[..] {line}").grey()),
            }
        }
    }

    async fn browse(&self) -> anyhow::Result<()> {
        let items = match self.repository.list().await {
            Ok(items) => items,
            Err(e) => {
                self.toasts
                    .publish("Failed to load gallery", Some(&e.to_string()), Severity::Error);
                return Ok(());
            }
        };

        if items.is_empty() {
            println!("No images yet. Be the first to upload something!");
            return Ok(());
        }

        println!("{}", "Public Gallery".bold());
        for item in &items {
            println!(
                "  {}  @{}  {}  {}",
                item.title.clone().bold(),
                item.uploader_name,
                item.created_at.format("%Y-%m-%d"),
                item.image_url.clone().grey(),
            );
        }

        let Some(me) = self.session.current_identity() else {
            return Ok(());
        };
        let owned: Vec<_> = items.iter().filter(|i| i.is_owned_by(&me)).collect();
        if owned.is_empty() {
            return Ok(());
        }

        let mut options = vec!["Back".to_string()];
        options.extend(owned.iter().map(|i| format!("Delete \"{}\"", i.title)));
        let Some(choice) = prompt_or_cancel(Select::new("Your images:", options).prompt())?
        else {
            return Ok(());
        };
        let Some(target) = owned
            .iter()
            .find(|i| format!("Delete \"{}\"", i.title) == choice)
        else {
            return Ok(());
        };

        let confirmed = prompt_or_cancel(
            Confirm::new(&format!(
                "Delete \"{}\"? This action cannot be undone.",
                target.title
            ))
            .with_default(false)
            .prompt(),
        )?
        .unwrap_or(false);
        if !confirmed {
            return Ok(());
        }

        match self.repository.delete(&target.id, &me).await {
            // Already gone counts as deleted: the end state the user wanted.
            Ok(()) | Err(RepositoryError::NotFound) => {
                self.toasts.publish(
                    "Image deleted",
                    Some("It has been removed from the gallery."),
                    Severity::Success,
                );
            }
            Err(e) => {
                self.toasts
                    .publish("Delete failed", Some(&e.to_string()), Severity::Error);
            }
        }
        Ok(())
    }

    async fn upload(&self, me: &Identity) -> anyhow::Result<()> {
        let Some(title) = prompt_or_cancel(
            Text::new("Image title:")
                .with_placeholder("e.g. Sunset at the beach")
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(path) = prompt_or_cancel(Text::new("Path to image file:").prompt())? else {
            return Ok(());
        };

        let path = Path::new(path.trim());
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                self.toasts
                    .publish("Could not read file", Some(&e.to_string()), Severity::Error);
                return Ok(());
            }
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let pending = PendingUpload {
            content_type: content_type_for(&filename).to_string(),
            data,
            filename,
            declared_title: title,
        };

        // Spinner follows the pipeline stages; the pipeline result stays the
        // single authoritative outcome.
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        let mut stage_rx = self.uploads.subscribe_stage();
        let stage_bar = bar.clone();
        let stage_task = tokio::spawn(async move {
            while stage_rx.changed().await.is_ok() {
                let stage = *stage_rx.borrow();
                match stage {
                    UploadStage::Validating => stage_bar.set_message("Validating..."),
                    UploadStage::UploadingFile => stage_bar.set_message("Uploading file..."),
                    UploadStage::CreatingRecord => stage_bar.set_message("Creating record..."),
                    UploadStage::Done | UploadStage::Failed => break,
                    UploadStage::Idle => {}
                }
            }
        });

        let outcome = self.uploads.upload(pending, me).await;
        bar.finish_and_clear();
        stage_task.abort();

        match outcome {
            Ok(item) => {
                self.toasts.publish(
                    "Upload Successful",
                    Some(&format!("\"{}\" has been added to the gallery.", item.title)),
                    Severity::Success,
                );
            }
            Err(e) => {
                self.toasts
                    .publish("Upload Failed", Some(&e.to_string()), Severity::Error);
            }
        }
        Ok(())
    }

    async fn login(&self) -> anyhow::Result<()> {
        let Some(username) = prompt_or_cancel(Text::new("Username:").prompt())? else {
            return Ok(());
        };
        let Some(password) =
            prompt_or_cancel(Password::new("Password:").without_confirmation().prompt())?
        else {
            return Ok(());
        };

        match self.session.login(&username, &password).await {
            Ok(identity) => {
                self.toasts.publish(
                    "Welcome back",
                    Some(&format!("Logged in as {}.", identity.display_name)),
                    Severity::Success,
                );
            }
            Err(e) => {
                self.toasts
                    .publish("Login failed", Some(&e.to_string()), Severity::Error);
            }
        }
        Ok(())
    }

    async fn sign_up(&self) -> anyhow::Result<()> {
        let Some(username) = prompt_or_cancel(Text::new("Username:").prompt())? else {
            return Ok(());
        };
        let Some(email) = prompt_or_cancel(Text::new("Email:").prompt())? else {
            return Ok(());
        };
        // Password prompts for confirmation by default, mirroring the
        // confirm-password field of the web form.
        let Some(password) = prompt_or_cancel(Password::new("Password:").prompt())? else {
            return Ok(());
        };

        match self.session.sign_up(&username, &email, &password).await {
            Ok(_) => {
                self.toasts.publish(
                    "Account Created",
                    Some("You have successfully signed up!"),
                    Severity::Success,
                );
            }
            Err(e) => {
                self.toasts
                    .publish("Signup Failed", Some(&e.to_string()), Severity::Error);
            }
        }
        Ok(())
    }

    async fn logout(&self) -> anyhow::Result<()> {
        match self.session.logout().await {
            Ok(()) => {
                self.toasts
                    .publish("Logged out", None, Severity::Info);
            }
            Err(e) => {
                self.toasts
                    .publish("Logout failed", Some(&e.to_string()), Severity::Error);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> anyhow::Result<()> {
        // Pick up a session surviving from a previous run. Degraded mode is
        // reported once here instead of failing every menu entry silently.
        match self.session.refresh().await {
            Ok(Some(identity)) => {
                self.toasts.publish(
                    "Session restored",
                    Some(&format!("Logged in as {}.", identity.display_name)),
                    Severity::Info,
                );
            }
            Ok(None) => {}
            Err(SessionError::BackendUnavailable) => {
                self.toasts.publish(
                    "Backend not configured",
                    Some("Set PIXHIVE_APP_ID and PIXHIVE_CLIENT_KEY in .env."),
                    Severity::Error,
                );
            }
            Err(e) => {
                self.toasts
                    .publish("Session check failed", Some(&e.to_string()), Severity::Error);
            }
        }

        loop {
            self.render_toasts();

            let me = self.session.current_identity();
            let mut options = vec![MENU_BROWSE];
            match me {
                Some(_) => options.extend([MENU_UPLOAD, MENU_LOGOUT]),
                None => options.extend([MENU_LOGIN, MENU_SIGNUP]),
            }
            options.push(MENU_QUIT);

            let Some(choice) =
                prompt_or_cancel(Select::new("What would you like to do?", options).prompt())?
            else {
                break;
            };

            match choice {
                MENU_BROWSE => self.browse().await?,
                MENU_UPLOAD => {
                    if let Some(me) = self.session.current_identity() {
                        self.upload(&me).await?;
                    }
                }
                MENU_LOGIN => self.login().await?,
                MENU_SIGNUP => self.sign_up().await?,
                MENU_LOGOUT => self.logout().await?,
                MENU_QUIT => break,
                _ => {}
            }
        }

        self.render_toasts();
        Ok(())
    }
}

/// Ok(None) when the user cancelled the prompt (Esc / Ctrl-C).
fn prompt_or_cancel<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Declared media type from the filename extension. Unknown extensions pass
/// through as octet-stream and are rejected by upload validation.
fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("photo.png"), "image/png");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
