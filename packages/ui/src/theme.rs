//! Light/dark theme, persisted in `localStorage`.

use dioxus::prelude::*;

use crate::icons::{FaMoon, FaSun};
use crate::Icon;

/// Theme context: `None` follows the system, otherwise `"light"` or `"dark"`.
pub type ThemeSignal = Signal<Option<String>>;

const STORAGE_KEY: &str = "clientbook-theme";

/// Set the theme on the document root and remember it.
pub fn apply_theme(theme: Option<&str>) {
    let script = match theme {
        Some(theme) => format!(
            "document.documentElement.dataset.theme = {theme:?}; localStorage.setItem('{STORAGE_KEY}', {theme:?});"
        ),
        None => format!(
            "delete document.documentElement.dataset.theme; localStorage.removeItem('{STORAGE_KEY}');"
        ),
    };
    document::eval(&script);
}

/// Restore the theme saved by a previous visit, if any.
pub fn load_theme_from_storage(theme: &mut ThemeSignal) {
    let mut theme = *theme;
    spawn(async move {
        let stored = document::eval(&format!("return localStorage.getItem('{STORAGE_KEY}');"))
            .join::<Option<String>>()
            .await;
        match stored {
            Ok(Some(saved)) => {
                apply_theme(Some(&saved));
                theme.set(Some(saved));
            }
            Ok(None) => {}
            Err(e) => tracing::debug!(error = ?e, "could not read stored theme"),
        }
    });
}

/// Light/dark switch pinned to the top-right corner.
#[component]
pub fn ThemeToggle() -> Element {
    let mut theme = use_context::<ThemeSignal>();
    let dark = theme().as_deref() == Some("dark");

    rsx! {
        button {
            class: "theme-toggle",
            title: if dark { "Switch to light theme" } else { "Switch to dark theme" },
            onclick: move |_| {
                let next = if dark { "light" } else { "dark" };
                apply_theme(Some(next));
                theme.set(Some(next.to_string()));
            },
            if dark {
                Icon { icon: FaSun, width: 16, height: 16 }
            } else {
                Icon { icon: FaMoon, width: 16, height: 16 }
            }
        }
    }
}
