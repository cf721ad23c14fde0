//! Session command handlers.
//!
//! These share the session store with the dashboard, so a login here is
//! picked up by the next `globedash` launch and vice versa.

use anyhow::Result;
use globedash_core::config::Config;
use globedash_core::session::{AuthContext, FileStore};

pub(crate) fn auth_context(config: &Config) -> AuthContext<FileStore> {
    let mut auth = AuthContext::new(FileStore::default_location(), config.restore_identity);
    auth.restore();
    auth
}

pub fn login(config: &Config, email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        anyhow::bail!("Email must not be empty");
    }

    let mut auth = auth_context(config);
    let session = auth.login(email, password);
    println!("Logged in as {}", session.identity);
    Ok(())
}

pub fn logout(config: &Config) {
    let mut auth = auth_context(config);
    if auth.is_authenticated() {
        auth.logout();
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
}

pub fn whoami(config: &Config) {
    let auth = auth_context(config);
    match auth.identity() {
        Some(identity) => println!("{identity}"),
        None => println!("Not logged in"),
    }
}
