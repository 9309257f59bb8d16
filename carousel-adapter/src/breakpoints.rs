use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use carousel::Settings;

type Patch = Box<dyn Fn(&mut Settings)>;

/// Responsive settings: patches keyed by a maximum viewport width.
///
/// For a given width, the rule with the smallest `max_width >= width` applies on top of the
/// base settings. Widths above every rule use the base settings unchanged.
#[derive(Default)]
pub struct Breakpoints {
    rules: Vec<(f32, Patch)>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, max_width: f32, patch: impl Fn(&mut Settings) + 'static) -> Self {
        self.push(max_width, patch);
        self
    }

    /// Adds a rule. A rule for a width that already has one replaces it.
    pub fn push(&mut self, max_width: f32, patch: impl Fn(&mut Settings) + 'static) {
        let patch: Patch = Box::new(patch);
        match self
            .rules
            .binary_search_by(|(w, _)| w.total_cmp(&max_width))
        {
            Ok(pos) => self.rules[pos].1 = patch,
            Err(pos) => self.rules.insert(pos, (max_width, patch)),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The `max_width` of the rule matching `viewport_width`, if any.
    pub fn matching(&self, viewport_width: f32) -> Option<f32> {
        self.rules
            .iter()
            .map(|(w, _)| *w)
            .find(|w| *w >= viewport_width)
    }

    /// `base` with the matching rule (if any) applied.
    pub fn resolve(&self, base: &Settings, viewport_width: f32) -> Settings {
        let mut settings = base.clone();
        if let Some((_, patch)) = self.rules.iter().find(|(w, _)| *w >= viewport_width) {
            patch(&mut settings);
        }
        settings
    }
}

impl fmt::Debug for Breakpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breakpoints")
            .field("max_widths", &self.rules.iter().map(|(w, _)| *w).collect::<Vec<_>>())
            .finish()
    }
}
