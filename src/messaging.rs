//! Outbound chat deep links
//!
//! Links have the shape `https://<host>/<recipient>?text=<encoded>`. Nothing
//! is sent from here; the visitor's browser opens the link.

use crate::config::ContactConfig;
use crate::forms::{Field, FormData};

/// Link that opens a chat with the business, without a prefilled text
pub fn chat_link(contact: &ContactConfig) -> String {
    format!("https://{}/{}", contact.messaging_host, contact.recipient_id)
}

/// Message body built from a contact record
pub fn contact_message(contact: &ContactConfig, record: &FormData) -> String {
    let phone = match record.get(Field::Phone).trim() {
        "" => "Not provided",
        phone => phone,
    };
    format!(
        "Hello {business}!\n\nName: {name}\nEmail: {email}\nPhone: {phone}\n\nMessage:\n{message}",
        business = contact.business_name,
        name = record.get(Field::Name).trim(),
        email = record.get(Field::Email).trim(),
        message = record.get(Field::Message).trim(),
    )
}

/// Link that opens a chat prefilled with `text`
pub fn prefilled_link(contact: &ContactConfig, text: &str) -> String {
    format!("{}?text={}", chat_link(contact), urlencoding::encode(text))
}
