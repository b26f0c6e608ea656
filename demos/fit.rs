//! Fits the reference arch of eight points and prints the resulting curves.
//!
//! Usage:
//! ```text
//! cargo run --example fit                 # precision 5.0
//! cargo run --example fit -- 0.5          # custom precision
//! RUST_LOG=bezier_approx=trace cargo run --example fit
//! ```

use bezier_approx::tessellation::{TessellateFit, TessellationParams};
use bezier_approx::{fit_segment, fit_sequence, BezierApproxError, CubicBezier, Point2};

fn main() -> Result<(), BezierApproxError> {
    // Default: WARN for everything, INFO for bezier_approx.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("fit=info".parse().unwrap_or_default())
        .add_directive("bezier_approx=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let precision = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(5.0);

    let arch = CubicBezier::new(
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 2.0),
        Point2::new(2.0, 2.0),
        Point2::new(3.0, 0.0),
    );
    let mid = arch.evaluate(0.5);
    println!("arch(0.5) = ({:.4}, {:.4})", mid.x, mid.y);

    let points = [
        Point2::new(50.0, 300.0),
        Point2::new(65.0, 240.12),
        Point2::new(110.0, 139.60),
        Point2::new(170.0, 132.80),
        Point2::new(230.0, 181.20),
        Point2::new(290.0, 186.40),
        Point2::new(335.0, 102.76),
        Point2::new(350.0, 50.0),
    ];

    let single = fit_segment(&points, 0, points.len() - 1)?;
    println!(
        "single curve: max error {:.3} at point {}",
        single.max_error, single.max_error_index
    );
    print_curve(&single.curve);

    let result = fit_sequence(&points, precision)?;
    println!("{} curve(s) at precision {precision}:", result.len());
    for curve in &result {
        print_curve(curve);
    }

    let polyline = TessellateFit::new(&result, TessellationParams::default()).execute()?;
    println!("tessellated into {} points", polyline.points.len());
    Ok(())
}

fn print_curve(curve: &CubicBezier) {
    let [p0, p1, p2, p3] = curve.control_points();
    println!(
        "  ({:.2}, {:.2}) ({:.2}, {:.2}) ({:.2}, {:.2}) ({:.2}, {:.2})",
        p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
    );
}
