//! Styled building blocks shared by the views. Classes live in
//! `assets/components.css`.

mod button;
pub use button::{Button, ButtonVariant};

mod input;
pub use input::Input;

mod label;
pub use label::Label;

mod toast;
pub use toast::{use_toast, ToastOptions, ToastProvider, Toasts};
