use tracing::{info, warn};

use super::{EmailMessage, Mailer, NotificationError};

pub const INVITATION_SUBJECT: &str = "Welcome to Timey";

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fixed invitation template with the account email, plaintext password and login link
pub fn render_invitation(email: &str, password: &str, display_name: &str, login_url: &str) -> String {
    let name = escape(display_name);
    let email = escape(email);
    let password = escape(password);
    let login_url = escape(login_url);

    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #1f2937;">
    <h2>Welcome to Timey, {name}!</h2>
    <p>An account has been created for you. Use these credentials to sign in:</p>
    <table style="border-collapse: collapse;">
      <tr><td style="padding: 4px 12px 4px 0;"><strong>Email</strong></td><td>{email}</td></tr>
      <tr><td style="padding: 4px 12px 4px 0;"><strong>Password</strong></td><td>{password}</td></tr>
    </table>
    <p><a href="{login_url}" style="color: #2563eb;">Sign in to Timey</a></p>
    <p style="font-size: 12px; color: #6b7280;">Please change your password after your first login.</p>
  </body>
</html>
"#
    )
}

/// Render and dispatch the invitation for a newly created employee
pub async fn send_invitation(
    mailer: &dyn Mailer,
    email: &str,
    password: &str,
    display_name: &str,
    login_url: &str,
) -> Result<(), NotificationError> {
    let message = EmailMessage {
        to: email.to_string(),
        subject: INVITATION_SUBJECT.to_string(),
        html: render_invitation(email, password, display_name, login_url),
    };

    match mailer.send(&message).await {
        Ok(()) => {
            info!(to = %email, "Invitation sent");
            Ok(())
        }
        Err(e) => {
            warn!(to = %email, error = %e, "Invitation failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingMailer;

    #[test]
    fn template_escapes_and_embeds_credentials() {
        let html = render_invitation(
            "ana@timey.test",
            "p<w>&1",
            "Ana <script>alert(1)</script>",
            "https://timey.test/",
        );
        assert!(html.contains("Ana &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("p&lt;w&gt;&amp;1"));
        assert!(html.contains(r#"href="https://timey.test/""#));
    }

    #[tokio::test]
    async fn sends_through_mailer() {
        let mailer = RecordingMailer::default();
        send_invitation(&mailer, "bo@timey.test", "pw", "Bo", "http://localhost:3000/")
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "bo@timey.test");
        assert_eq!(sent[0].subject, INVITATION_SUBJECT);
    }

    #[tokio::test]
    async fn failure_propagates() {
        let mailer = RecordingMailer::failing();
        let result = send_invitation(&mailer, "bo@timey.test", "pw", "Bo", "/").await;
        assert!(matches!(result, Err(NotificationError::Provider(_))));
    }
}
