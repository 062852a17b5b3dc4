//! Per-call conversion state.
//!
//! One `Session` is created for each top-level conversion call and threaded
//! through the normalizer and the emission engine by reference. It owns the
//! unique-name counters, the warning list and the recent-text-styles log, so
//! independent conversions never observe each other's state.

use crate::segments::TextSegment;
use crate::settings::Settings;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Ordered, de-duplicated warning messages.
#[derive(Debug, Default)]
pub struct Warnings(RefCell<Vec<String>>);

impl Warnings {
    pub fn add(&self, message: impl Into<String>) {
        let message = message.into();
        let mut list = self.0.borrow_mut();
        if !list.contains(&message) {
            log::debug!("warning: {message}");
            list.push(message);
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Conversion state scoped to one top-level call.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    warnings: Warnings,
    name_counters: RefCell<HashMap<String, u32>>,
    issued_names: RefCell<HashSet<String>>,
    text_styles: RefCell<Vec<TextSegment>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            warnings: Warnings::default(),
            name_counters: RefCell::new(HashMap::new()),
            issued_names: RefCell::new(HashSet::new()),
            text_styles: RefCell::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.warnings.add(message);
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.to_vec()
    }

    /// Disambiguate a layer name.
    ///
    /// The trimmed name is used verbatim the first time; later occurrences get
    /// `_01`, `_02`, … appended. A suffixed candidate that collides with a
    /// literal layer name already issued is skipped.
    pub fn unique_name(&self, name: &str) -> String {
        let clean = name.trim();
        let mut counters = self.name_counters.borrow_mut();
        let mut issued = self.issued_names.borrow_mut();
        let count = counters.entry(clean.to_string()).or_insert(0);
        loop {
            let candidate = if *count == 0 {
                clean.to_string()
            } else {
                format!("{clean}_{count:02}")
            };
            *count += 1;
            if issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Clear the per-call tables. Warnings are kept.
    pub fn reset(&self) {
        self.name_counters.borrow_mut().clear();
        self.issued_names.borrow_mut().clear();
        self.text_styles.borrow_mut().clear();
    }

    pub fn record_text_styles(&self, segments: &[TextSegment]) {
        self.text_styles.borrow_mut().extend_from_slice(segments);
    }

    /// Text segments resolved so far, in emission order.
    pub fn text_styles(&self) -> Vec<TextSegment> {
        self.text_styles.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_get_two_digit_suffixes() {
        let session = Session::new(Settings::default());
        assert_eq!(session.unique_name(" Button "), "Button");
        assert_eq!(session.unique_name("Button"), "Button_01");
        assert_eq!(session.unique_name("Button"), "Button_02");
        assert_eq!(session.unique_name("Icon"), "Icon");
    }

    #[test]
    fn suffix_skips_names_taken_verbatim() {
        let session = Session::new(Settings::default());
        assert_eq!(session.unique_name("Row_01"), "Row_01");
        assert_eq!(session.unique_name("Row"), "Row");
        assert_eq!(session.unique_name("Row"), "Row_02");
    }

    #[test]
    fn reset_restarts_name_counters() {
        let session = Session::new(Settings::default());
        session.unique_name("Card");
        session.reset();
        assert_eq!(session.unique_name("Card"), "Card");
    }

    #[test]
    fn warnings_keep_first_occurrence_order() {
        let session = Session::new(Settings::default());
        session.warn("b");
        session.warn("a");
        session.warn("b");
        assert_eq!(session.warnings(), vec!["b".to_string(), "a".to_string()]);
    }
}
