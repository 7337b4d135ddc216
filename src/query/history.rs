/// Location bar the computer list mirrors its state into
///
/// Filter changes replace the current entry; they never push one, so back
/// and forward navigation skip filter churn.
pub trait History {
    /// Replace the current entry's query string (without the leading `?`)
    fn replace(&mut self, query: &str);
}

impl<H: History + ?Sized> History for &mut H {
    fn replace(&mut self, query: &str) {
        (**self).replace(query)
    }
}

/// In-memory history entry, used by the CLI and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    current: String,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            current: query.into(),
            replacements: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Number of times the entry has been replaced
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl History for MemoryHistory {
    fn replace(&mut self, query: &str) {
        self.current = query.to_string();
        self.replacements += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_twice<H: History>(mut history: H) {
        history.replace("hostname=a");
        history.replace("hostname=ab");
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let mut history = MemoryHistory::new("tab=users");
        write_twice(&mut history);

        assert_eq!(history.current(), "hostname=ab");
        assert_eq!(history.replacements(), 2);
    }
}
