//! Toasts come from `dioxus-primitives`; the provider is wrapped so the
//! stylesheet ships with it.

use dioxus::prelude::*;
use dioxus_primitives::toast;

pub use dioxus_primitives::toast::{use_toast, ToastOptions, Toasts};

#[component]
pub fn ToastProvider(children: Element) -> Element {
    rsx! {
        document::Stylesheet { href: crate::COMPONENTS_CSS }
        toast::ToastProvider {
            {children}
        }
    }
}
