//! Default layout settings (dots unless noted otherwise)

/// Thickest bar tried first, borders included.
pub const MAX_BAR_THICKNESS: usize = 9;
/// Top border, one fill row, bottom border.
pub const MIN_BAR_THICKNESS: usize = 3;
/// Gap between bars of the same group.
pub const BAR_PADDING: usize = 1;
/// Gap above every group.
pub const GROUP_PADDING: usize = 3;
/// Cells between the caption column and the bar area.
pub const CAPTION_PADDING: usize = 1;
/// Lines the title may occupy.
pub const MAX_TITLE_HEIGHT: usize = 3;
/// Dots per x-axis step.
pub const UNIT_SIZE: usize = 2;
/// Axis steps between two labelled ticks.
pub const TICK_INTERVAL: usize = 5;
/// Shortest gap bridged with a dashed helper line.
pub const HELPER_LINE_MIN_GAP: usize = 4;
/// Cell rows of the x-axis region (line with ticks, then labels).
pub const X_AXIS_HEIGHT: usize = 2;
/// Drawn instead of a bar when a series has no value in a group.
pub const MISSING_PLACEHOLDER: &str = "n/a";
/// Width of a legend texture swatch, in cells.
pub const SWATCH_WIDTH: usize = 3;
