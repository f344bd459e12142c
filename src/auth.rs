use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const PASSPHRASE_ENV: &str = "ZKV_PASSPHRASE";

/// Reads the passphrase from the environment, falling back to a TTY prompt.
///
/// stdin is reserved for values, so a piped passphrase is not supported.
pub fn read_passphrase(confirm: bool) -> Result<Zeroizing<String>> {
    //  Environment Variable (or .env)
    //  ZKV_PASSPHRASE="sixteen-byte-pw!" zkv encrypt db-password
    //  An empty value is passed on so validation reports it.
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        return Ok(Zeroizing::new(pw));
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Passphrase: ")?);
        if pw.is_empty() {
            bail!("passphrase cannot be empty");
        }

        if confirm {
            let again = Zeroizing::new(rpassword::prompt_password("Confirm passphrase: ")?);
            if *pw != *again {
                bail!("passphrases do not match");
            }
        }

        return Ok(pw);
    }

    bail!("no passphrase provided (set {PASSPHRASE_ENV})")
}
