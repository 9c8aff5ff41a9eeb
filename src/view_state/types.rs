//! Core view-state types

/// Visible container size in host layout units (pixels, or terminal cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportDimensions {
    /// Container width.
    pub width: usize,
    /// Container height.
    pub height: usize,
}

impl ViewportDimensions {
    /// Create new viewport dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Direction of the most recent scroll, inferred from consecutive offsets.
///
/// `Neutral` marks a programmatic jump (or no movement) so that edge
/// pagination is not triggered by the engine's own re-anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Offset increased (towards newer rows).
    Forward,
    /// Offset decreased (towards older rows).
    Backward,
    /// Programmatic jump or no movement.
    #[default]
    Neutral,
}

impl ScrollDirection {
    /// Infer a direction from the previous and the new offset.
    ///
    /// With no previous offset (first observation after a jump) the
    /// direction is `Neutral`.
    pub fn infer(previous: Option<usize>, current: usize) -> Self {
        match previous {
            Some(prev) if current > prev => ScrollDirection::Forward,
            Some(prev) if current < prev => ScrollDirection::Backward,
            _ => ScrollDirection::Neutral,
        }
    }
}

/// Where a row should land when scrolling to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Row's top edge at the viewport top.
    #[default]
    Start,
    /// Row centered in the viewport.
    Center,
    /// Row's bottom edge at the viewport bottom.
    End,
}
