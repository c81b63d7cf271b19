//! The `streamwise init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("streamwise.toml").exists() {
        println!("streamwise.toml already exists, skipping.");
    } else {
        std::fs::write("streamwise.toml", SAMPLE_CONFIG)?;
        println!("Created streamwise.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point api_base_url at your scoring backend");
    println!("  2. Run: streamwise validate");
    println!("  3. Run: streamwise assess");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# streamwise configuration

api_base_url = "https://academy-backend-skp6.onrender.com"
timeout_secs = 30
page_size = 10

# questions_path = "questions.json"
# admin_password = "${STREAMWISE_ADMIN_PASSWORD}"
"#;
