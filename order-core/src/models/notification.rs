/// The single notification banner slot. At most one message is visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Notification {
    #[default]
    None,
    Success(String),
    Error(String),
}

impl Notification {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Success(text) | Self::Error(text) => Some(text),
        }
    }
}
