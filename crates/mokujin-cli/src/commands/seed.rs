use rand::RngCore;

use mokujin_core::advance_seed;

pub fn run() -> Result<(), String> {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let seed = hex::encode(bytes);

    println!("  server seed: {seed}");
    println!("  next seed:   {}", advance_seed(&seed));
    println!("  Keep the server seed secret until its rolls are revealed.");

    Ok(())
}
