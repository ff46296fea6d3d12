use anyhow::Result;

fn main() -> Result<()> {
    vibe_audit::cli::run()
}
