use dioxus::prelude::*;
use domain::{Client, ClientDraft, Field, FormState};

use crate::components::{Button, ButtonVariant, Input, Label};
use crate::views::ModalOverlay;

/// Add/edit dialog for a client.
///
/// The draft is seeded from `initial_data` every time `open` turns true.
/// Submitting hands the draft to `on_submit`, then closes and clears the
/// dialog whatever happens to the draft afterwards.
#[component]
pub fn ClientForm(
    open: bool,
    on_open_change: EventHandler<bool>,
    on_submit: EventHandler<ClientDraft>,
    initial_data: Option<Client>,
    #[props(default = "Add client".to_string())] title: String,
) -> Element {
    let mut form = use_signal(FormState::default);

    use_effect(use_reactive!(|(open, initial_data)| {
        if open {
            form.write().open(initial_data.as_ref());
        }
    }));

    let mut close = move || {
        form.write().cancel();
        on_open_change.call(false);
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let draft = form.write().submit();
        on_submit.call(draft);
        on_open_change.call(false);
    };

    if !open {
        return rsx! {};
    }

    let draft = form.read().draft().clone();

    rsx! {
        ModalOverlay {
            on_close: move |_| close(),
            form {
                class: "client-form",
                onsubmit: handle_submit,
                div {
                    class: "form-header",
                    h2 { "{title}" }
                    Button {
                        variant: ButtonVariant::Ghost,
                        r#type: "button",
                        aria_label: "Close",
                        onclick: move |_| close(),
                        "×"
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "client-name", "Name" }
                    Input {
                        id: "client-name",
                        r#type: "text",
                        required: true,
                        value: draft.name,
                        oninput: move |evt: FormEvent| form.write().set(Field::Name, evt.value()),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "client-email", "Email" }
                    Input {
                        id: "client-email",
                        r#type: "email",
                        required: true,
                        value: draft.email,
                        oninput: move |evt: FormEvent| form.write().set(Field::Email, evt.value()),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "client-phone", "Phone" }
                    Input {
                        id: "client-phone",
                        r#type: "tel",
                        value: draft.phone,
                        oninput: move |evt: FormEvent| form.write().set(Field::Phone, evt.value()),
                    }
                }

                div {
                    class: "form-actions",
                    Button {
                        variant: ButtonVariant::Primary,
                        r#type: "submit",
                        "Save"
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        r#type: "button",
                        onclick: move |_| close(),
                        "Cancel"
                    }
                }
            }
        }
    }
}
