use crate::console::{self, ConsoleLinkBuilder, FederationClient};
use crate::credentials::CredentialBroker;
use crate::error::Result;

pub fn execute(
    broker: &CredentialBroker,
    account: &str,
    destination: &str,
    duration_secs: u32,
    open: bool,
) -> Result<()> {
    let builder = ConsoleLinkBuilder::new(FederationClient::default());
    let url = builder.sign_in(broker, account, destination, duration_secs)?;

    println!("{}", url);

    if open {
        console::open_in_browser(&url)?;
    }

    Ok(())
}
