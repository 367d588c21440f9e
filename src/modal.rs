//! Contact and booking modals
//!
//! A modal owns its form record while open. Submit either hands off to the
//! messaging service (contact) or confirms locally (booking); both then
//! clear the record and close. A failed submit changes nothing.

use serde::Serialize;
use tracing::{info, instrument};

use crate::WanderLensError;
use crate::config::ContactConfig;
use crate::forms::{self, Field, FormData, FormKind};
use crate::messaging;
use crate::models::TourPackage;

/// Successful contact submit: open `url` in a new browsing context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatHandoff {
    pub url: String,
    pub acknowledgment: String,
}

/// Successful booking submit. Nothing leaves the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub message: String,
}

fn closed() -> WanderLensError {
    WanderLensError::validation("the form is not open")
}

fn expect_kind(record: &FormData, kind: FormKind) -> Result<(), WanderLensError> {
    if record.kind() == kind {
        Ok(())
    } else {
        Err(WanderLensError::validation(format!(
            "a {:?} record cannot fill the {kind:?} form",
            record.kind()
        )))
    }
}

/// Header contact modal
#[derive(Debug, Clone, Default)]
pub struct ContactModal {
    form: Option<FormData>,
}

impl ContactModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with an empty record. Reopening keeps the current record.
    pub fn open(&mut self) {
        self.form
            .get_or_insert_with(|| FormData::new(FormKind::Contact));
    }

    /// Open with values already captured, e.g. from a posted form
    pub fn open_with(&mut self, record: FormData) -> Result<(), WanderLensError> {
        expect_kind(&record, FormKind::Contact)?;
        self.form = Some(record);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&FormData> {
        self.form.as_ref()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), WanderLensError> {
        self.form.as_mut().ok_or_else(closed)?.set_field(field, value)
    }

    /// Close and discard the record
    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Validate, then build the prefilled chat link and close.
    #[instrument(skip_all)]
    pub fn submit(&mut self, contact: &ContactConfig) -> Result<ChatHandoff, WanderLensError> {
        let form = self.form.as_ref().ok_or_else(closed)?;
        forms::validate(form, FormKind::Contact.required())?;

        let text = messaging::contact_message(contact, form);
        let url = messaging::prefilled_link(contact, &text);
        let acknowledgment = format!(
            "Thank you {}! Your message is ready to send. We'll get back to you soon.",
            form.get(Field::Name).trim()
        );
        info!(
            name = form.get(Field::Name),
            email = form.get(Field::Email),
            "Contact message handed off to messaging service"
        );

        self.form = None;
        Ok(ChatHandoff {
            url,
            acknowledgment,
        })
    }
}

#[derive(Debug, Clone)]
struct BookingSession {
    package: TourPackage,
    form: FormData,
}

/// Booking modal of the package catalog
#[derive(Debug, Clone, Default)]
pub struct BookingModal {
    session: Option<BookingSession>,
}

impl BookingModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open for `package` with an empty record
    pub fn open(&mut self, package: TourPackage) {
        self.session = Some(BookingSession {
            package,
            form: FormData::new(FormKind::Booking),
        });
    }

    /// Open for `package` with values already captured
    pub fn open_with(&mut self, package: TourPackage, record: FormData) -> Result<(), WanderLensError> {
        expect_kind(&record, FormKind::Booking)?;
        self.session = Some(BookingSession {
            package,
            form: record,
        });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn package(&self) -> Option<&TourPackage> {
        self.session.as_ref().map(|s| &s.package)
    }

    pub fn form(&self) -> Option<&FormData> {
        self.session.as_ref().map(|s| &s.form)
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), WanderLensError> {
        self.session
            .as_mut()
            .ok_or_else(closed)?
            .form
            .set_field(field, value)
    }

    /// Close and discard the record and the selected package
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Validate, log the request and close with a confirmation.
    #[instrument(skip_all)]
    pub fn submit(&mut self) -> Result<Confirmation, WanderLensError> {
        let session = self.session.as_ref().ok_or_else(closed)?;
        let form = &session.form;
        forms::validate(form, FormKind::Booking.required())?;

        info!(
            package = %session.package.title,
            price = %session.package.price,
            name = form.get(Field::Name),
            email = form.get(Field::Email),
            phone = form.get(Field::Phone),
            travelers = form.get(Field::Travelers),
            message = form.get(Field::Message),
            "Booking request received"
        );

        let message = format!(
            "Thank you {}! Your booking request for \"{}\" has been submitted. \
             We'll contact you shortly at {}.",
            form.get(Field::Name).trim(),
            session.package.title,
            form.get(Field::Email).trim()
        );

        self.session = None;
        Ok(Confirmation { message })
    }
}
