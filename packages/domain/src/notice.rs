use serde::{Deserialize, Serialize};

/// Visual flavour of a notice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeVariant {
    #[default]
    Plain,
    Success,
    Destructive,
}

/// A transient user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub variant: NoticeVariant,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn plain(title: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Plain,
            title: title.into(),
            description: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Success,
            ..Self::plain(title)
        }
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            ..Self::plain(title)
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}
