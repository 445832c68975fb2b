use anyhow::Result;

fn main() -> Result<()> {
    inspector_cli::main_entry()
}
