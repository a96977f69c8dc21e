/// Spending category derived from a transaction description.
///
/// Never stored on a [`super::Transaction`]; see [`crate::categorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Category {
    Housing,
    Food,
    Transport,
    Entertainment,
    Savings,
    Others,
}

impl Category {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Savings => "Savings",
            Self::Others => "Others",
        }
    }

    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Housing,
            Self::Food,
            Self::Transport,
            Self::Entertainment,
            Self::Savings,
            Self::Others,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
