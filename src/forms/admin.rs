use serde::Deserialize;

/// Query string of the admin users page.
#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    pub search: Option<String>,
}

impl UserSearchQuery {
    /// Search term with surrounding whitespace removed; blank means no filter.
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        let query = UserSearchQuery {
            search: Some("   ".into()),
        };
        assert_eq!(query.term(), None);
        assert_eq!(UserSearchQuery::default().term(), None);
    }

    #[test]
    fn search_is_trimmed() {
        let query = UserSearchQuery {
            search: Some(" ann ".into()),
        };
        assert_eq!(query.term(), Some("ann"));
    }
}
