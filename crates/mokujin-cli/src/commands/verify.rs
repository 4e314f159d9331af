use colored::Colorize;

use mokujin_core::verify_hmac;

pub fn run(key: &str, message: &str, digest: &str) -> Result<(), String> {
    if verify_hmac(key, message, digest) {
        println!("  {} '{message}'", "Verified".green().bold());
        Ok(())
    } else {
        println!("  {} '{message}'", "Not verified".red().bold());
        Err("digest does not match".into())
    }
}
