use mission_clock::logging::init_tracing;
use mission_clock::{ClockCommand, MissionClock, MissionClockConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    // A 25 minute mission in Oslo with a battery that lasts 30 minutes
    let config = MissionClockConfig::builder()
        .title("Scripted SAR mission")
        .latitude(59.91)
        .longitude(10.75)
        .mission_duration(Duration::from_secs(25 * 60))
        .battery_depletion_minutes(30)
        .build();

    let clock = MissionClock::new(config);
    let (sender, receiver) = mpsc::channel();

    // Fast-forward the mission: one simulated minute per second, with a
    // waypoint dropped on the ring now and then.
    thread::spawn(move || {
        let mut rng = rand::rng();
        if sender.send(ClockCommand::Start).is_err() {
            return;
        }
        for minute in 0..=60u32 {
            let mut commands = vec![ClockCommand::OverrideElapsed(minute.to_string())];
            if rng.random_bool(0.2) {
                let angle: f64 = rng.random_range(0.0..std::f64::consts::TAU);
                commands.push(ClockCommand::Click {
                    x: 300.0 + 250.0 * angle.cos(),
                    y: 300.0 + 250.0 * angle.sin(),
                });
            }
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }
            thread::sleep(Duration::from_secs(1));
        }
    });

    println!("Fast-forwarding a mission at one minute per second.");
    println!("Watch the arc blink at 20 and 30 minutes. Close the window to exit.");

    clock.show_with_commands(receiver)?;
    Ok(())
}
