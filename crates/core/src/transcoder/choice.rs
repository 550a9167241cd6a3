//! Exclusive choice among a fixed set of keys.

/// Exactly one of a fixed, non-empty set of options is selected at any time.
///
/// Behaves like a radio-button group: selecting an option deselects the
/// previous one, and unknown keys leave the selection untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveChoice<K> {
    options: Vec<K>,
    selected: usize,
}

impl<K: Copy + PartialEq> ExclusiveChoice<K> {
    /// Creates a choice with the first option selected.
    ///
    /// Returns `None` when `options` is empty. Duplicate options are dropped.
    pub fn new(options: impl IntoIterator<Item = K>) -> Option<Self> {
        let mut unique: Vec<K> = Vec::new();
        for option in options {
            if !unique.contains(&option) {
                unique.push(option);
            }
        }
        if unique.is_empty() {
            return None;
        }
        Some(Self {
            options: unique,
            selected: 0,
        })
    }

    /// Selects `key`. Returns false (selection unchanged) if it is not an option.
    pub fn select(&mut self, key: K) -> bool {
        match self.options.iter().position(|option| *option == key) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// The selected option.
    pub fn selected(&self) -> K {
        self.options[self.selected]
    }

    /// Position of the selected option in [`options`](Self::options).
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Whether `key` is one of the options.
    pub fn contains(&self, key: K) -> bool {
        self.options.contains(&key)
    }

    /// All options, in the order given at construction.
    pub fn options(&self) -> &[K] {
        &self.options
    }
}
