//! Probe service liveness and readiness.
//!
//! Run with: cargo run --example health

use soil::{SoilClient, SoilError};

fn main() -> Result<(), SoilError> {
    let client = SoilClient::from_env()?;

    println!("{}", client.liveness()?.message);

    let readiness = client.readiness()?;
    println!("Status: {}", readiness.status);
    for check in readiness.failed_checks() {
        println!("  {}: {}", check.checker, check.output);
    }

    Ok(())
}
