use std::time::{Duration, Instant};

use profile_cloud_rs::logger;
use profile_cloud_rs::point_pipeline::SensorRig;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting profile-cloud...");

    let mut args = std::env::args().skip(1);
    let (Some(first), Some(second)) = (args.next(), args.next()) else {
        error!("Usage: profile-cloud-rs <sensor1-image> <sensor2-image>");
        std::process::exit(2);
    };

    let mut rig = SensorRig::new();

    match rig.ingest_pair(&first, &second) {
        Ok(()) => info!("Paired capture ingested"),
        Err(e) => {
            error!("Ingestion failed: {}", e);
            std::process::exit(1);
        }
    }

    info!(
        "Sensor 1: {} points, sensor 2: {} points",
        rig.sensor1().reference_cloud().map_or(0, |c| c.len()),
        rig.sensor2().reference_cloud().map_or(0, |c| c.len())
    );

    // Colormaps are computed off the control path; give the workers a
    // moment before reporting the committed frames.
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        let done1 = rig.sensor1().latest_frame().is_some();
        let done2 = rig.sensor2().latest_frame().is_some();
        if done1 && done2 {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    for sensor in [rig.sensor1(), rig.sensor2()] {
        match sensor.latest_frame() {
            Some(frame) => info!(
                "{}: committed frame generation {} with {} colors",
                sensor.name(),
                frame.generation,
                frame.colors.len()
            ),
            None => error!("{}: no frame committed", sensor.name()),
        }
    }

    Ok(())
}
