//! Signature-request email content.

use crate::EmailMessage;

/// Rendered subject/body pair for one signature request.
pub struct SignatureRequestEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl SignatureRequestEmail {
    pub fn new(
        attendee_name: &str,
        attendee_role: &str,
        meeting_title: &str,
        meeting_date: &str,
        signing_url: &str,
    ) -> Self {
        Self {
            subject: format!("Signature requested - minutes: {meeting_title}"),
            text: Self::text_template(
                attendee_name,
                attendee_role,
                meeting_title,
                meeting_date,
                signing_url,
            ),
            html: Self::html_template(
                attendee_name,
                attendee_role,
                meeting_title,
                meeting_date,
                signing_url,
            ),
        }
    }

    /// Address the rendered content to an attendee.
    pub fn into_message(self, to: impl Into<String>) -> EmailMessage {
        EmailMessage {
            to: to.into(),
            subject: self.subject,
            html: self.html,
            text: self.text,
        }
    }

    fn text_template(
        attendee_name: &str,
        attendee_role: &str,
        meeting_title: &str,
        meeting_date: &str,
        signing_url: &str,
    ) -> String {
        format!(
            r#"Dear {attendee_name},

Your signature is required on the minutes of the meeting "{meeting_title}" held on {meeting_date}.

Your role: {attendee_role}

To review and sign, visit: {signing_url}

This is an automated message. Please do not reply to this email."#
        )
    }

    fn html_template(
        attendee_name: &str,
        attendee_role: &str,
        meeting_title: &str,
        meeting_date: &str,
        signing_url: &str,
    ) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: #2563eb; color: white; padding: 20px; text-align: center; border-radius: 8px 8px 0 0; }}
        .content {{ background: #f9fafb; padding: 30px; border: 1px solid #e5e7eb; }}
        .button {{ display: inline-block; background: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin: 20px 0; }}
        .footer {{ text-align: center; padding: 20px; font-size: 12px; color: #6b7280; }}
        .info-box {{ background: white; padding: 15px; border-radius: 6px; margin: 15px 0; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Signature Request</h1>
        </div>
        <div class="content">
            <p>Dear <strong>{attendee_name}</strong>,</p>

            <p>Your signature is required on the minutes of the following meeting:</p>

            <div class="info-box">
                <p><strong>Meeting:</strong> {meeting_title}</p>
                <p><strong>Date:</strong> {meeting_date}</p>
                <p><strong>Your role:</strong> {attendee_role}</p>
            </div>

            <p>Please click the button below to review and sign the minutes:</p>

            <p style="text-align: center;">
                <a href="{signing_url}" class="button">Sign Minutes</a>
            </p>

            <p style="font-size: 12px; color: #6b7280;">
                If the button does not work, copy this link into your browser:<br>
                <a href="{signing_url}">{signing_url}</a>
            </p>
        </div>
        <div class="footer">
            <p>This is an automated message. Please do not reply to this email.</p>
            <p>Actas - Meeting Minutes Service</p>
        </div>
    </div>
</body>
</html>"#
        )
    }
}
