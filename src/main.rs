use anyhow::Result;

fn main() -> Result<()> {
    wormfarm::app::run()
}
