//! Light curve output: CSV tables and plots

use plotters::prelude::*;
use std::io::Write;
use std::path::Path;

/// Write `frame,intensity,relative_brightness` rows.
///
/// # Arguments
/// * `writer` - Destination, flushed once all rows are written
/// * `intensities` - Raw per-frame intensities
/// * `relative` - Normalised brightness; rows stop at the shorter slice
pub fn write_light_curve_csv<W: Write>(
    mut writer: W,
    intensities: &[f64],
    relative: &[f64],
) -> std::io::Result<()> {
    writeln!(writer, "frame,intensity,relative_brightness")?;
    for (frame, (intensity, brightness)) in intensities.iter().zip(relative).enumerate() {
        writeln!(writer, "{frame},{intensity:.6},{brightness:.6}")?;
    }
    writer.flush()
}

/// Plot relative brightness against frame number as a PNG.
pub fn plot_light_curve<P: AsRef<Path>>(
    relative: &[f64],
    save_path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(save_path.as_ref(), (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_min = relative.iter().copied().fold(1.0, f64::min);
    // Leave headroom so a flat curve is still visible
    let y_floor = (y_min - 0.1 * (1.0 - y_min).max(0.01)).max(0.0);
    let x_max = relative.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Relative Brightness vs. Time",
            ("sans-serif", 28).into_font().color(&BLACK),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, y_floor..1.01)?;

    chart
        .configure_mesh()
        .x_desc("Frame")
        .y_desc("Relative Brightness")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 14))
        .draw()?;

    chart
        .draw_series(DashedLineSeries::new(
            relative
                .iter()
                .enumerate()
                .map(|(frame, &brightness)| (frame as f64, brightness)),
            8,
            4,
            RED.stroke_width(2),
        ))?
        .label("Relative Brightness")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperMiddle)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .label_font(("sans-serif", 16))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_light_curve_csv(&mut out, &[40.0, 20.0], &[1.0, 0.5]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frame,intensity,relative_brightness");
        assert_eq!(lines[1], "0,40.000000,1.000000");
        assert_eq!(lines[2], "1,20.000000,0.500000");
        assert_eq!(lines.len(), 3);
    }
}
