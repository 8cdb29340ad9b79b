#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper struct to run scholardesk commands in an isolated temp directory
pub struct ScholarTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl ScholarTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        ScholarTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_scholardesk").to_string(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config").join("config.yaml")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("SCHOLARDESK_CONFIG", self.config_path())
            .env_remove("SCHOLARDESK_API_URL")
            .env_remove("SCHOLARDESK_API_TOKEN")
            .env_remove("SCHOLARDESK_LOG")
            .env_remove("FORCE_COLOR")
            .env_remove("CLICOLOR_FORCE")
            .output()
            .expect("Failed to execute scholardesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("Command output is not valid JSON")
    }

    /// Write a JSON fixture into the temp dir and return its path as a string
    pub fn write_fixture(&self, name: &str, value: &Value) -> String {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap())
            .expect("Failed to write fixture");
        path.to_string_lossy().to_string()
    }

    /// Write the standard records fixture covering every resource
    pub fn write_records(&self) -> String {
        self.write_fixture("records.json", &records_fixture())
    }
}

/// Twelve schools; three have "Caloocan" in their name and one has no city.
pub fn schools_fixture() -> Value {
    let schools = [
        ("Caloocan High School", Some("Caloocan"), "active", "secondary", 1200),
        ("North Caloocan Elementary", Some("Caloocan"), "active", "primary", 800),
        ("Caloocan City Science High", Some("Caloocan"), "inactive", "secondary", 600),
        ("Quezon City Polytechnic", Some("Quezon City"), "active", "tertiary", 3000),
        ("Tondo Elementary", Some("Manila"), "active", "primary", 950),
        ("Pasig Integrated School", Some("Pasig"), "active", "secondary", 1100),
        ("Makati Science High", Some("Makati"), "inactive", "secondary", 700),
        ("Taguig National High", Some("Taguig"), "active", "secondary", 1500),
        ("Marikina Elementary", Some("Marikina"), "active", "primary", 640),
        ("Pasay Technical College", Some("Pasay"), "active", "tertiary", 2100),
        ("Valenzuela Academy", Some("Valenzuela"), "pending", "secondary", 400),
        ("Unassigned Campus", None, "pending", "primary", 50),
    ];
    let records: Vec<Value> = schools
        .iter()
        .enumerate()
        .map(|(i, (name, city, status, level, students))| {
            json!({
                "id": i + 1,
                "name": name,
                "city": city,
                "region": "NCR",
                "status": status,
                "level": level,
                "category": "public",
                "studentCount": students,
                "partnershipDate": format!("2023-{:02}-15", i + 1),
            })
        })
        .collect();
    Value::Array(records)
}

/// `count` applications submitted on consecutive days; every fourth one is
/// approved, the rest pending.
pub fn applications_fixture(count: usize) -> Value {
    let records: Vec<Value> = (1..=count)
        .map(|i| {
            let submitted = jiff::civil::date(2024, 1, 1)
                .checked_add(jiff::Span::new().days(i as i64))
                .unwrap();
            json!({
                "id": i,
                "name": format!("Applicant {i:02}"),
                "studentId": format!("2024-{i:04}"),
                "school": if i % 2 == 0 { "Tondo Elementary" } else { "Caloocan High School" },
                "program": "Merit Scholarship",
                "category": if i % 3 == 0 { "need-based" } else { "merit" },
                "level": "college",
                "status": if i % 4 == 0 { "approved" } else { "pending" },
                "submittedDate": submitted.to_string(),
                "generalWeightedAverage": format!("{:.2}", 1.0 + (i % 10) as f64 * 0.25),
            })
        })
        .collect();
    json!({ "data": records })
}

pub fn records_fixture() -> Value {
    json!({
        "schools": schools_fixture(),
        "applications": applications_fixture(25),
        "documents": [
            {"id": "d1", "name": "transcript.pdf", "studentName": "Ana Cruz", "category": "transcript", "status": "verified", "fileType": "pdf", "fileSize": 20480, "uploadedDate": "2024-02-01"},
            {"id": "d2", "name": "id-card.png", "studentName": "Ben Reyes", "category": "identification", "status": "pending", "fileType": "png", "fileSize": 5120, "uploadedDate": "2024-02-03"}
        ],
    })
}
