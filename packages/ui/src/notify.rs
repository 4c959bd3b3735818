use domain::{Notice, NoticeVariant};

use crate::components::{ToastOptions, Toasts};

/// Show `notice` as a transient toast.
pub fn notify(toasts: Toasts, notice: Notice) {
    let mut options = ToastOptions::new();
    if let Some(description) = notice.description {
        options = options.description(description);
    }
    match notice.variant {
        NoticeVariant::Plain => toasts.info(notice.title, options),
        NoticeVariant::Success => toasts.success(notice.title, options),
        NoticeVariant::Destructive => toasts.error(notice.title, options),
    }
}
