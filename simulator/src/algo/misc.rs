//! Miscellaneous geometric utilities.
//!
//! Closed-form areas for the disk arithmetic used by the transit projector:
//!
//! - **Circle area**: area of a single disk
//! - **Lens area**: area shared by two overlapping disks
//! - **Occluded area**: area of a disk covered by the union of several disks
//!   centred on the same line
//!
//! All accept degenerate zero radii and return zero area for them.

use std::f64::consts::PI;

/// Area of a disk of radius `radius`.
pub fn circle_area(radius: f64) -> f64 {
    PI * radius * radius
}

/// Area of the intersection of two disks whose centres are `distance` apart.
///
/// Uses the standard circular-segment decomposition:
///
/// ```text
/// A = r₁² acos((d² + r₁² - r₂²) / 2dr₁)
///   + r₂² acos((d² + r₂² - r₁²) / 2dr₂)
///   - ½ √((-d + r₁ + r₂)(d + r₁ - r₂)(d - r₁ + r₂)(d + r₁ + r₂))
/// ```
///
/// Disjoint disks share no area; a disk fully inside the other contributes
/// its whole area.
///
/// # Examples
///
/// ```rust
/// use transit_simulator::algo::misc::{circle_area, lens_area};
///
/// assert_eq!(lens_area(10.0, 2.0, 50.0), 0.0);
/// assert_eq!(lens_area(10.0, 2.0, 3.0), circle_area(2.0));
/// ```
pub fn lens_area(r1: f64, r2: f64, distance: f64) -> f64 {
    let d = distance.abs();
    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        return circle_area(r1.min(r2));
    }

    let alpha = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0);
    let beta = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0);
    let kite = (-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2);

    r1 * r1 * alpha.acos() + r2 * r2 * beta.acos() - 0.5 * kite.max(0.0).sqrt()
}

/// Half-height of a disk's vertical chord at `x`, zero outside the disk.
fn half_chord(center: f64, radius: f64, x: f64) -> f64 {
    let u = x - center;
    (radius * radius - u * u).max(0.0).sqrt()
}

/// Exact area of the disk strip `a <= x <= b`: `∫ 2·half_chord dx`.
fn chord_integral(center: f64, radius: f64, a: f64, b: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    let antiderivative = |x: f64| {
        let u = (x - center).clamp(-radius, radius);
        u * (radius * radius - u * u).max(0.0).sqrt()
            + radius * radius * (u / radius).clamp(-1.0, 1.0).asin()
    };
    antiderivative(b) - antiderivative(a)
}

/// Area of the target disk covered by the union of `occluders`.
///
/// Every disk is centred on the same horizontal line, given by its centre
/// coordinate along that line. Where occluders overlap each other their
/// coverage is counted once, and coverage spilling past the target's limb is
/// dropped, so the result never exceeds the target's area.
///
/// Because all chords are symmetric about the shared line, the covered height
/// at each `x` is `2·min(h_target, max h_occluder)`. The integrand follows a
/// single circle between consecutive disk edges and chord-equality points,
/// so the integral is evaluated exactly piece by piece.
///
/// # Arguments
/// * `target_center` - Centre coordinate of the covered disk
/// * `target_radius` - Radius of the covered disk
/// * `occluders` - `(center, radius)` pairs of the covering disks
///
/// # Returns
/// Covered area in the squared units of the inputs
///
/// # Examples
///
/// ```rust
/// use transit_simulator::algo::misc::{circle_area, occluded_area};
///
/// // The second disk lies inside the first and adds nothing
/// let covered = occluded_area(0.0, 100.0, &[(0.0, 20.0), (5.0, 10.0)]);
/// assert!((covered - circle_area(20.0)).abs() < 1e-9);
/// ```
pub fn occluded_area(target_center: f64, target_radius: f64, occluders: &[(f64, f64)]) -> f64 {
    if target_radius.is_nan() || target_radius <= 0.0 {
        return 0.0;
    }
    let occluders: Vec<(f64, f64)> = occluders
        .iter()
        .copied()
        .filter(|&(c, r)| {
            r > 0.0 && c.is_finite() && (c - target_center).abs() < target_radius + r
        })
        .collect();
    if occluders.is_empty() {
        return 0.0;
    }
    if occluders
        .iter()
        .any(|&(c, r)| (c - target_center).abs() + target_radius <= r)
    {
        return circle_area(target_radius);
    }

    let left = target_center - target_radius;
    let right = target_center + target_radius;

    let mut disks = Vec::with_capacity(occluders.len() + 1);
    disks.push((target_center, target_radius));
    disks.extend_from_slice(&occluders);

    let mut breaks = vec![left, right];
    for (i, &(ci, ri)) in disks.iter().enumerate() {
        breaks.push(ci - ri);
        breaks.push(ci + ri);
        for &(cj, rj) in &disks[i + 1..] {
            // Equal chords: ri² - (x - ci)² = rj² - (x - cj)²
            if ci != cj {
                breaks.push((ri * ri - rj * rj + cj * cj - ci * ci) / (2.0 * (cj - ci)));
            }
        }
    }
    breaks.retain(|x| x.is_finite() && *x >= left && *x <= right);
    breaks.sort_by(|a, b| a.total_cmp(b));
    breaks.dedup();

    let mut covered = 0.0;
    for pair in breaks.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b <= a {
            continue;
        }
        let mid = 0.5 * (a + b);
        let (cover_center, cover_radius, cover_height) = occluders
            .iter()
            .map(|&(c, r)| (c, r, half_chord(c, r, mid)))
            .fold((0.0, 0.0, 0.0), |best, item| {
                if item.2 > best.2 {
                    item
                } else {
                    best
                }
            });
        if cover_height <= 0.0 {
            continue;
        }
        covered += if half_chord(target_center, target_radius, mid) <= cover_height {
            chord_integral(target_center, target_radius, a, b)
        } else {
            chord_integral(cover_center, cover_radius, a, b)
        };
    }

    covered.clamp(0.0, circle_area(target_radius))
}
