//! Landing page: sign in, or create an account.

use dioxus::prelude::*;
use ui::components::{use_toast, Button, ButtonVariant, Input, Label};
use ui::{notify, use_session_store};

use crate::Route;

#[component]
pub fn Landing() -> Element {
    let store = use_session_store();
    let toasts = use_toast();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut signing_up = use_signal(|| false);
    let mut busy = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            busy.set(true);
            let outcome = if signing_up() {
                store.register(&email(), &password()).await
            } else {
                store.login(&email(), &password()).await
            };
            busy.set(false);

            if let Some(notice) = outcome.notice {
                notify(toasts, notice);
            }
            if let Some(destination) = outcome.redirect {
                nav.push(Route::from(destination));
            }
        });
    };

    let (heading, submit_label, switch_label) = if signing_up() {
        ("Create an account", "Sign up", "Already have an account? Sign in")
    } else {
        ("Sign in", "Sign in", "No account yet? Sign up")
    };

    rsx! {
        div {
            class: "landing",
            h1 { "Clientbook" }
            p { class: "muted", "Keep track of your clients in one place." }

            form {
                class: "auth-card",
                onsubmit: handle_submit,
                h2 { "{heading}" }

                div {
                    class: "form-field",
                    Label { html_for: "auth-email", "Email" }
                    Input {
                        id: "auth-email",
                        r#type: "email",
                        required: true,
                        autocomplete: "email",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "auth-password", "Password" }
                    Input {
                        id: "auth-password",
                        r#type: "password",
                        required: true,
                        autocomplete: if signing_up() { "new-password" } else { "current-password" },
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }

                div {
                    class: "form-actions",
                    Button {
                        variant: ButtonVariant::Primary,
                        r#type: "submit",
                        disabled: busy(),
                        if busy() { "Please wait..." } else { "{submit_label}" }
                    }
                    Button {
                        variant: ButtonVariant::Ghost,
                        r#type: "button",
                        onclick: move |_| signing_up.toggle(),
                        "{switch_label}"
                    }
                }
            }
        }
    }
}
