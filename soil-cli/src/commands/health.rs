use anyhow::{bail, Context, Result};
use soil::Readiness;

use super::{print_json, ClientOptions};

pub fn liveness(options: &ClientOptions, json: bool) -> Result<()> {
    let client = options.connect()?;
    let liveness = client.liveness().context("Liveness check failed")?;

    if json {
        print_json(&liveness)
    } else {
        println!("{}", liveness.message);
        Ok(())
    }
}

/// Prints the readiness status; fails when the service is not ready.
pub fn readiness(options: &ClientOptions, json: bool) -> Result<()> {
    let client = options.connect()?;
    let readiness = client.readiness().context("Readiness check failed")?;

    if json {
        print_json(&readiness)?;
    } else {
        for line in format_lines(&readiness) {
            println!("{}", line);
        }
    }

    if !readiness.is_ready() {
        bail!("Service is not ready (status: {})", readiness.status);
    }
    Ok(())
}

fn format_lines(readiness: &Readiness) -> Vec<String> {
    let mut lines = vec![format!("Status: {}", readiness.status)];
    for check in readiness.failed_checks() {
        lines.push(format!("  Failed check: {} ({})", check.checker, check.output));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ready() {
        let readiness: Readiness = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert_eq!(format_lines(&readiness), vec!["Status: success"]);
    }

    #[test]
    fn test_format_not_ready() {
        let readiness: Readiness = serde_json::from_str(
            r#"{"status": "failure", "results": [
                {"checker": "soilgrids", "output": "timeout", "passed": false},
                {"checker": "disk", "output": "", "passed": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            format_lines(&readiness),
            vec!["Status: failure", "  Failed check: soilgrids (timeout)"]
        );
    }
}
