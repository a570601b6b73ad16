//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Whether `(width, height)` already satisfies a `(max_width, max_height)` box.
pub fn fits_within(dims: (u32, u32), bounds: (u32, u32)) -> bool {
    dims.0 <= bounds.0 && dims.1 <= bounds.1
}

/// Whether either edge of `dims` is strictly longer than `edge`.
pub fn exceeds_edge(dims: (u32, u32), edge: u32) -> bool {
    dims.0 > edge || dims.1 > edge
}

/// Calculate aspect-preserving dimensions that fit inside a bounding box.
///
/// Never upscales: a source already inside the box is returned unchanged.
/// Each output edge is at least 1px.
///
/// # Examples
/// ```
/// # use inline_imaging::imaging::calculate_fit_dimensions;
/// // 1600x1200 into 1200x1200 → 1200x900
/// assert_eq!(calculate_fit_dimensions((1600, 1200), (1200, 1200)), (1200, 900));
///
/// // Already small → untouched
/// assert_eq!(calculate_fit_dimensions((200, 100), (300, 300)), (200, 100));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 || fits_within(source, bounds) {
        return source;
    }

    let ratio_w = bounds.0 as f64 / src_w as f64;
    let ratio_h = bounds.1 as f64 / src_h as f64;
    let ratio = ratio_w.min(ratio_h);

    let w = ((src_w as f64 * ratio).round() as u32).clamp(1, bounds.0.max(1));
    let h = ((src_h as f64 * ratio).round() as u32).clamp(1, bounds.1.max(1));
    (w, h)
}

/// Centered window of `source`, in source pixels, with the aspect ratio of
/// `target`. Returned as `(x, y, width, height)`.
///
/// Cover-cropping crops this window first and then scales it to `target`, so
/// the working surface is never larger than the source or the target.
///
/// # Examples
/// ```
/// # use inline_imaging::imaging::cover_crop_window;
/// // 4:3 source into a square: trim the sides
/// assert_eq!(cover_crop_window((800, 600), (123, 123)), (100, 0, 600, 600));
///
/// // A sliver keeps one pixel instead of being stretched first
/// assert_eq!(cover_crop_window((20000, 1), (123, 123)), (9999, 0, 1, 1));
/// ```
pub fn cover_crop_window(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    if src_w == 0 || src_h == 0 || tgt_w == 0 || tgt_h == 0 {
        return (0, 0, src_w, src_h);
    }

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: keep full height, trim the sides
        let w = ((src_h as f64 * tgt_aspect).round() as u32).clamp(1, src_w);
        ((src_w - w) / 2, 0, w, src_h)
    } else {
        // Source is taller: keep full width, trim top and bottom
        let h = ((src_w as f64 / tgt_aspect).round() as u32).clamp(1, src_h);
        (0, (src_h - h) / 2, src_w, h)
    }
}
