mod rsa;

pub use crate::rsa::*;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let rsa = MiniRsa::parse();
    env_logger::builder()
        .filter_level(rsa.log_level())
        .parse_default_env()
        .init();
    log::debug!("run args: {:?}", rsa);
    rsa.run()
}
