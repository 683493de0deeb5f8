use tera::Tera;
use tracing::info;

pub const CONFIRMATION_SUBJECT: &str = "☕ Welcome to Coffee & Rhythms!";

#[derive(Debug)]
pub struct TemplateManager {
    tera: Tera,
}

impl TemplateManager {
    /// Parses every template under `templates/`, relative to the working directory.
    pub fn init() -> Result<Self, tera::Error> {
        info!(
            "{:<20} - Initializing the Template manager",
            "templ manager"
        );
        let tera = Tera::new("templates/**/*")?;
        Ok(Self { tera })
    }

    /// Renders a template file from the 'email/' directory to String without `Context`
    pub fn render_email_to_string(&self, template_file: &str) -> Result<String, tera::Error> {
        let template = format!("email/{template_file}");
        self.tera.render(&template, &tera::Context::new())
    }

    /// Renders the welcome email that every new subscriber receives.
    pub fn confirmation_email(&self) -> Result<ConfirmationEmail, tera::Error> {
        Ok(ConfirmationEmail {
            subject: CONFIRMATION_SUBJECT.to_string(),
            html_body: self.render_email_to_string("confirmation.html")?,
            text_body: self.render_email_to_string("confirmation.txt")?,
        })
    }
}

/// Fixed content of the confirmation email. Only the recipient varies per send.
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}
