use transit_simulator::{BodyConfig, Scene, SimulationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Eccentric Transit Demonstration");
    println!("===============================");
    println!();

    let mut planet = BodyConfig::planet("eccentric", 220.0, 12.0);
    planet.periapsis = Some(90.0);

    let config = SimulationConfig {
        frames: 1200,
        method: transit_simulator::ProjectionMethod::Analytic,
        bodies: vec![planet, BodyConfig::moon("companion", 20.0, 3.0, "eccentric")],
        ..Default::default()
    };

    let mut scene = Scene::from_config(&config)?;
    let elements = *scene.system().planets()[0].elements();
    println!("Orbit:");
    println!("  Apoapsis: {:.1}", elements.apoapsis());
    println!("  Periapsis: {:.1}", elements.periapsis());
    println!("  Eccentricity: {:.4}", elements.eccentricity());
    println!();

    let relative = scene.run()?;

    // Frames where any shadow is on the star
    let dimmed: Vec<usize> = relative
        .iter()
        .enumerate()
        .filter(|(_, b)| **b < 1.0)
        .map(|(i, _)| i)
        .collect();

    println!("Light curve:");
    println!("  Frames: {}", relative.len());
    println!("  Dimmed frames: {}", dimmed.len());
    if let (Some(first), Some(last)) = (dimmed.first(), dimmed.last()) {
        println!("  First dimmed frame: {first}");
        println!("  Last dimmed frame: {last}");
    }
    println!(
        "  Transit depth: {:.5}",
        scene.recorder().transit_depth()?
    );

    Ok(())
}
