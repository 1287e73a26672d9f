//! Compiler options
//!
//! Options are passed explicitly to every phase; nothing reads global state.

use serde::{Deserialize, Serialize};

/// Options controlling how a component is compiled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Development build: attach names to runtime calls for better errors
    pub dev: bool,
    /// Compile as a custom element (reserves `$$host`)
    pub custom_element: bool,
    /// Force the runes dialect on or off. `None` infers it from the script.
    pub runes: Option<bool>,
    /// Assume objects are never mutated in place (legacy dialect)
    pub immutable: bool,
    /// Expose props as accessors on the component instance
    pub accessors: bool,
}

impl CompileOptions {
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn with_custom_element(mut self, custom_element: bool) -> Self {
        self.custom_element = custom_element;
        self
    }

    pub fn with_runes(mut self, runes: bool) -> Self {
        self.runes = Some(runes);
        self
    }

    pub fn with_immutable(mut self, immutable: bool) -> Self {
        self.immutable = immutable;
        self
    }

    pub fn with_accessors(mut self, accessors: bool) -> Self {
        self.accessors = accessors;
        self
    }

    /// Parse options from their JSON form; missing fields take defaults
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::default();
        assert!(!options.dev);
        assert!(!options.immutable);
        assert_eq!(options.runes, None);
    }

    #[test]
    fn test_builder() {
        let options = CompileOptions::default().with_dev(true).with_runes(false);
        assert!(options.dev);
        assert_eq!(options.runes, Some(false));
    }

    #[test]
    fn test_from_json_partial() {
        let options = CompileOptions::from_json(r#"{ "customElement": true, "runes": true }"#).unwrap();
        assert!(options.custom_element);
        assert_eq!(options.runes, Some(true));
        assert!(!options.accessors);
    }
}
