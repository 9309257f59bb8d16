//! Translate transforms.
//!
//! A movement value (`item_width * index`, minus any drag nudge) goes through an ordered chain of
//! pure stages before it is applied to the track:
//!
//! 1. [`Gap`] 2. [`Grow`] 3. [`PeekInset`] 4. [`FocusAlign`] 5. caller stages 6. [`Mirror`]
//!
//! Order matters. [`Mirror`] in particular must run last so that every other stage works in the
//! same, direction-agnostic coordinate space.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::{Error, Geometry, Settings};

/// Read-only view of the carousel handed to every stage.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub geometry: Geometry,
    pub index: usize,
    pub count: usize,
}

/// A pure `translate -> translate` transform.
pub trait TransformStage {
    /// Name used in warnings.
    fn name(&self) -> &'static str;

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32;
}

/// Compensates for the gaps crossed by whole-item steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gap;

impl TransformStage for Gap {
    fn name(&self) -> &'static str {
        "gap"
    }

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32 {
        let width = cx.geometry.item_width;
        if width <= 0.0 {
            return translate;
        }
        let multiplier = (translate / width).floor();
        translate + cx.geometry.gap * multiplier
    }
}

/// Skips the leading clone block so index 0 lands on the first real item.
#[derive(Clone, Copy, Debug, Default)]
pub struct Grow;

impl TransformStage for Grow {
    fn name(&self) -> &'static str {
        "grow"
    }

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32 {
        translate + cx.geometry.clone_grow / 2.0
    }
}

/// Shifts the track by the leading peek inset.
///
/// Only numeric focus positions peek; a centered item already shows both neighbours.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeekInset;

impl TransformStage for PeekInset {
    fn name(&self) -> &'static str {
        "peek"
    }

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32 {
        match cx.settings.focus_at {
            crate::Focus::Index(_) => translate - cx.settings.peek.before(),
            crate::Focus::Center => translate,
        }
    }
}

/// Aligns the current item with the focus position.
#[derive(Clone, Copy, Debug, Default)]
pub struct FocusAlign;

impl TransformStage for FocusAlign {
    fn name(&self) -> &'static str {
        "focus"
    }

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32 {
        let g = cx.geometry;
        match cx.settings.focus_at {
            crate::Focus::Center => translate - (g.viewport_width - g.item_width) / 2.0,
            crate::Focus::Index(k) => translate - k as f32 * (g.item_width + g.gap),
        }
    }
}

/// Mirrors the value for right-to-left tracks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mirror;

impl TransformStage for Mirror {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32 {
        if cx.settings.direction.is_rtl() {
            -translate
        } else {
            translate
        }
    }
}

/// Wraps a closure as a stage.
pub struct FnStage<F> {
    name: &'static str,
    f: F,
}

impl<F> FnStage<F>
where
    F: Fn(f32, &Context<'_>) -> f32,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> TransformStage for FnStage<F>
where
    F: Fn(f32, &Context<'_>) -> f32,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn modify(&self, translate: f32, cx: &Context<'_>) -> f32 {
        (self.f)(translate, cx)
    }
}

impl<F> fmt::Debug for FnStage<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage").field("name", &self.name).finish()
    }
}

/// The transform chain.
///
/// Caller stages added with [`Pipeline::push`] always run before the trailing stages (the
/// [`Mirror`] in the standard chain).
pub struct Pipeline {
    leading: Vec<Box<dyn TransformStage>>,
    custom: Vec<Box<dyn TransformStage>>,
    trailing: Vec<Box<dyn TransformStage>>,
}

impl Pipeline {
    /// Gap, Grow, PeekInset, FocusAlign, then Mirror.
    pub fn standard() -> Self {
        Self {
            leading: alloc::vec![
                Box::new(Gap) as Box<dyn TransformStage>,
                Box::new(Grow),
                Box::new(PeekInset),
                Box::new(FocusAlign),
            ],
            custom: Vec::new(),
            trailing: alloc::vec![Box::new(Mirror) as Box<dyn TransformStage>],
        }
    }

    /// The standard chain with `custom` spliced in before the mirror.
    pub fn with_transformers(custom: Vec<Box<dyn TransformStage>>) -> Self {
        Self {
            custom,
            ..Self::standard()
        }
    }

    /// A chain in exactly the given order, with no trailing stage.
    pub fn from_stages(stages: Vec<Box<dyn TransformStage>>) -> Self {
        Self {
            leading: stages,
            custom: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn push(&mut self, stage: impl TransformStage + 'static) {
        self.custom.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.leading.len() + self.custom.len() + self.trailing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages().map(|stage| stage.name()).collect()
    }

    fn stages(&self) -> impl Iterator<Item = &(dyn TransformStage + 'static)> {
        self.leading
            .iter()
            .chain(&self.custom)
            .chain(&self.trailing)
            .map(Box::as_ref)
    }

    /// Runs `translate` through every stage.
    ///
    /// A stage that produces NaN or an infinite value is skipped: the value it received is
    /// passed on unchanged.
    pub fn mutate(&self, translate: f32, cx: &Context<'_>) -> f32 {
        let mut value = translate;
        for stage in self.stages() {
            let next = stage.modify(value, cx);
            if next.is_finite() {
                value = next;
            } else {
                cwarn!(
                    stage = stage.name(),
                    input = value,
                    "transform stage produced a non-finite translate, skipping"
                );
            }
        }
        value
    }

    /// Like [`Pipeline::mutate`], but fails on the first non-finite stage output.
    pub fn try_mutate(&self, translate: f32, cx: &Context<'_>) -> Result<f32, Error> {
        self.stages().try_fold(translate, |value, stage| {
            let next = stage.modify(value, cx);
            if next.is_finite() {
                Ok(next)
            } else {
                Err(Error::NonFiniteStage {
                    stage: stage.name(),
                })
            }
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.names())
            .finish()
    }
}
