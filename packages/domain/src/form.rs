//! State of the add/edit client dialog.
//!
//! The dialog owns a local [`ClientDraft`]. Submitting hands the draft to the
//! caller and always closes and clears the dialog; whatever the caller does
//! with the draft never feeds back into the form.

use crate::models::{Client, ClientId, NewClient};

/// Form-local copy of a client being added or edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientDraft {
    /// Present when editing an existing row.
    pub id: Option<ClientId>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        Self {
            id: Some(client.id),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
        }
    }
}

impl ClientDraft {
    /// The payload to send to the backend. The id, if any, is not part of it.
    pub fn to_new_client(&self) -> NewClient {
        NewClient {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Editable inputs of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    open: bool,
    draft: ClientDraft,
}

impl FormState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &ClientDraft {
        &self.draft
    }

    /// Open the form, seeded from `initial` or with empty defaults.
    pub fn open(&mut self, initial: Option<&Client>) {
        self.draft = initial.map(ClientDraft::from).unwrap_or_default();
        self.open = true;
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.draft.name = value,
            Field::Email => self.draft.email = value,
            Field::Phone => self.draft.phone = value,
        }
    }

    /// Take the draft for submission, then close and reset.
    pub fn submit(&mut self) -> ClientDraft {
        self.open = false;
        std::mem::take(&mut self.draft)
    }

    /// Close without submitting. The draft is kept until the next `open`.
    pub fn cancel(&mut self) {
        self.open = false;
    }
}
