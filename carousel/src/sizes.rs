use crate::Settings;

/// Read-only pixel facts the offset pipeline needs.
///
/// These are normally produced by the embedding layer after it measured the viewport
/// ([`Geometry::measure`] does the arithmetic) and are handed to
/// [`crate::Carousel::set_geometry`] on every resize.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    /// Width of a single item (excludes `gap`).
    pub item_width: f32,
    /// Width of the visible area.
    pub viewport_width: f32,
    /// Space between items.
    pub gap: f32,
    /// Total width of the clone padding on both sides of the track (carousel mode only).
    pub clone_grow: f32,
}

impl Geometry {
    /// Derives item width and clone padding from the viewport width.
    ///
    /// The viewport is split into `per_view` items; the peek inset and the gaps between the
    /// visible items are taken out of each item's share.
    pub fn measure(viewport_width: f32, item_count: usize, settings: &Settings) -> Self {
        let per_view = settings.view_size() as f32;
        let gap = settings.gap;

        let peek_reductor = settings.peek.reductor() / per_view;
        let gap_reductor = gap * (per_view - 1.0) / per_view;
        let item_width = (viewport_width / per_view - peek_reductor - gap_reductor).max(0.0);

        let clones = if settings.is_carousel() {
            2 * clones_per_side(item_count, settings)
        } else {
            0
        };

        Self {
            item_width,
            viewport_width,
            gap,
            clone_grow: (item_width + gap) * clones as f32,
        }
    }

    /// Width of one step along the track.
    pub fn stride(&self) -> f32 {
        self.item_width + self.gap
    }

    /// Width of the whole track: items, the gaps between them and the clone padding.
    pub fn track_width(&self, item_count: usize) -> f32 {
        let gaps = self.gap * item_count.saturating_sub(1) as f32;
        self.item_width * item_count as f32 + gaps + self.clone_grow
    }
}

/// Number of clones placed before (and, symmetrically, after) the real items in carousel mode.
///
/// Enough clones are needed to fill a view plus half a view on either side, one more when a
/// peek reveals the neighbours; the set is repeated at least `cloning_ratio` times.
pub fn clones_per_side(item_count: usize, settings: &Settings) -> usize {
    if item_count == 0 {
        return 0;
    }
    let per_view = settings.view_size();
    let peek = usize::from(!settings.peek.is_zero());
    let clone_count = per_view + peek + per_view.div_ceil(2);

    let unique = clone_count.min(item_count);
    let repeats = settings.cloning_ratio.max(clone_count / item_count);
    unique * repeats
}
