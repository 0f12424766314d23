use plotters::prelude::*;

use crate::data::NUM_CLASSES;
use crate::export::LatentProjection;

/// Viridis colormap - maps value in [0, 1] to RGB
fn viridis_color(t: f64) -> RGBColor {
    // Viridis colormap approximation (purple → cyan → yellow)
    // Based on matplotlib's viridis
    let r = (0.267 + t * (0.329 - 0.267 + t * (0.984 - 0.329))) * 255.0;
    let g = (0.005 + t * (0.569 - 0.005 + t * (0.906 - 0.569))) * 255.0;
    let b = (0.329 + t * (0.758 - 0.329 - t * (0.758 - 0.121))) * 255.0;

    RGBColor(
        r.min(255.0).max(0.0) as u8,
        g.min(255.0).max(0.0) as u8,
        b.min(255.0).max(0.0) as u8,
    )
}

/// Map digit label (0-9) to viridis color
fn digit_color(label: u8) -> RGBColor {
    let t = label as f64 / (NUM_CLASSES - 1) as f64;
    viridis_color(t)
}

/// Render the latent cloud as a single 3D scatter figure, one series per
/// digit class so the legend carries the label coloring.
pub fn plot_latent_scatter_3d(
    projection: &LatentProjection,
    output_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(output_path, (1200, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    // symmetric axis bounds covering the whole cloud
    let mut bound = 0.0f64;
    for code in &projection.codes {
        for &component in code.iter().take(3) {
            bound = bound.max((component as f64).abs());
        }
    }
    let bound = (bound * 1.05).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Latent Space (test split)", ("sans-serif", 50).into_font())
        .margin(20)
        .build_cartesian_3d(-bound..bound, -bound..bound, -bound..bound)?;

    chart.with_projection(|mut pb| {
        pb.pitch = 0.3;
        pb.yaw = 0.5;
        pb.scale = 0.9;
        pb.into_matrix()
    });

    chart.configure_axes().draw()?;

    for digit in 0..NUM_CLASSES as u8 {
        let color = digit_color(digit);
        chart
            .draw_series(
                projection
                    .codes
                    .iter()
                    .zip(projection.labels.iter())
                    .filter(|(_, &label)| label == digit)
                    .map(|(code, _)| {
                        Circle::new(
                            (code[0] as f64, code[1] as f64, code[2] as f64),
                            2,
                            color.filled(),
                        )
                    }),
            )?
            .label(format!("{}", digit))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("📊 Latent scatter saved to: {}", output_path);
    Ok(())
}
