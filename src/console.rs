use crate::cloudflare::ZeroTrustApi;
use crate::cloudflare::domain::Device;
use crate::lookup::{LookupReport, lookup_active_device};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::info;

const PROMPT: &str = "Enter the user's email address: ";
const NOT_AVAILABLE: &str = "Not available";

/// Asks for an email, looks up the active device and prints the report or the reason it failed.
pub async fn run(api: &ZeroTrustApi, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<ExitCode> {
    let email = prompt_email(input, output)?;

    match lookup_active_device(api, &email).await {
        Ok(report) => {
            print_report(&report, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            info!("Lookup failed: {:?}", e);
            writeln!(output, "{}", e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

pub fn prompt_email(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<String> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn print_report(report: &LookupReport, output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "User found: {}", report.user.email)?;
    writeln!(output, "Active Device ID: {}", report.active_device_id)?;

    print_device_details(&report.device_details.device, output)?;

    writeln!(output)?;
    writeln!(output, "Fleet Status:")?;
    for (name, value) in report.fleet_status.metrics() {
        writeln!(output, "{}: {}", name, display_value(value))?;
    }
    Ok(())
}

fn print_device_details(device: &Device, output: &mut impl Write) -> io::Result<()> {
    let or_not_available = |field: &Option<String>| field.as_deref().unwrap_or(NOT_AVAILABLE).to_string();

    writeln!(output)?;
    writeln!(output, "Device Details:")?;
    writeln!(output, "ID: {}", device.id)?;
    writeln!(output, "Name: {}", or_not_available(&device.name))?;
    writeln!(output, "OS: {}", or_not_available(&device.device_type))?;
    writeln!(output, "Status: {}", or_not_available(&device.status))?;
    writeln!(output, "Tunnel Type: {}", or_not_available(&device.tunnel_type))?;
    writeln!(output, "Last Seen: {}", or_not_available(&device.last_seen))?;
    writeln!(output, "User Email: {}", device.user_email().unwrap_or(NOT_AVAILABLE))
}

// Strings without their JSON quotes, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudflare::domain::{DeviceDetails, FleetStatus, User};
    use crate::lookup::tests::{Bodies, EMPTY_LIST, mock_cloudflare};
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};
    use test_log::test;

    fn report() -> Result<LookupReport, serde_json::Error> {
        Ok(LookupReport {
            user_email: "a@x.com".to_string(),
            user: User {
                email: "a@x.com".to_string(),
                other: Map::new(),
            },
            active_device_id: "d1".to_string(),
            device_details: DeviceDetails::from_raw(
                json!({
                    "id": "d1",
                    "name": "ada-laptop",
                    "device_type": "mac",
                    "status": null,
                    "tunnel_type": "masque",
                    "last_seen": "2024-06-11T07:45:12Z",
                    "user": { "email": "a@x.com" }
                })
                .as_object()
                .cloned()
                .unwrap_or_default(),
            )?,
            fleet_status: serde_json::from_value::<FleetStatus>(json!({
                "colo": "AMS",
                "alwaysOn": true,
                "cpuPct": 12.5
            }))?,
        })
    }

    #[test]
    fn prints_the_device_details_and_fleet_status() -> Result<(), Box<dyn std::error::Error>> {
        let mut output = Vec::new();

        print_report(&report()?, &mut output)?;

        assert_eq!(
            String::from_utf8(output)?,
            "User found: a@x.com\n\
             Active Device ID: d1\n\
             \n\
             Device Details:\n\
             ID: d1\n\
             Name: ada-laptop\n\
             OS: mac\n\
             Status: Not available\n\
             Tunnel Type: masque\n\
             Last Seen: 2024-06-11T07:45:12Z\n\
             User Email: a@x.com\n\
             \n\
             Fleet Status:\n\
             colo: AMS\n\
             alwaysOn: true\n\
             cpuPct: 12.5\n"
        );
        Ok(())
    }

    #[test]
    fn prompt_email_trims_the_answer() -> io::Result<()> {
        let mut input = io::Cursor::new("  a@x.com \n");
        let mut output = Vec::new();

        let email = prompt_email(&mut input, &mut output)?;

        assert_eq!(email, "a@x.com");
        assert_eq!(output, PROMPT.as_bytes());
        Ok(())
    }

    #[test]
    fn prompt_email_returns_an_empty_string_at_end_of_input() -> io::Result<()> {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();

        assert_eq!(prompt_email(&mut input, &mut output)?, "");
        Ok(())
    }

    #[test(tokio::test)]
    async fn run_prints_the_report_of_the_active_device() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let mocks = mock_cloudflare(&mut server, Bodies::default(), [1, 1, 1, 1]).await;
        let api = ZeroTrustApi::for_server(server.url());
        let mut input = io::Cursor::new("a@x.com\n");
        let mut output = Vec::new();

        let exit_code = run(&api, &mut input, &mut output).await?;

        mocks.assert();
        assert_eq!(exit_code, ExitCode::SUCCESS);
        let printed = String::from_utf8(output)?;
        assert!(printed.starts_with(&format!("{}User found: a@x.com\nActive Device ID: d1\n", PROMPT)));
        assert!(printed.contains("\nDevice Details:\nID: d1\nName: ada-laptop\n"));
        assert!(printed.ends_with("\nFleet Status:\ndeviceId: d1\ncolo: AMS\nmode: warp\nplatform: mac\nstatus: connected\ntimestamp: 2024-06-11T07:45:00Z\nversion: 2024.6.415.0\nalwaysOn: true\ncpuPct: 12.5\n"));
        Ok(())
    }

    #[test(tokio::test)]
    async fn run_stops_when_the_user_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new_async().await;
        let bodies = Bodies {
            users: EMPTY_LIST,
            ..Bodies::default()
        };
        let mocks = mock_cloudflare(&mut server, bodies, [1, 0, 0, 0]).await;
        let api = ZeroTrustApi::for_server(server.url());
        let mut input = io::Cursor::new("nobody@x.com\n");
        let mut output = Vec::new();

        let exit_code = run(&api, &mut input, &mut output).await?;

        mocks.assert();
        assert_eq!(exit_code, ExitCode::FAILURE);
        assert_eq!(String::from_utf8(output)?, format!("{}No user found with that email address.\n", PROMPT));
        Ok(())
    }

    #[test(tokio::test)]
    async fn run_requires_an_email() -> Result<(), Box<dyn std::error::Error>> {
        let api = ZeroTrustApi::for_server("http://127.0.0.1:1".to_string());
        let mut input = io::Cursor::new("\n");
        let mut output = Vec::new();

        let exit_code = run(&api, &mut input, &mut output).await?;

        assert_eq!(exit_code, ExitCode::FAILURE);
        assert_eq!(String::from_utf8(output)?, format!("{}Email address is required.\n", PROMPT));
        Ok(())
    }
}
