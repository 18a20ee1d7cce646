//! Walkthrough of the hybrid encryption pipeline.
//!
//! Run with: `cargo run --example kem-demo`

use pq_envelope::HybridEncryptionService;

fn main() -> Result<(), pq_envelope::EnvelopeError> {
    println!("ML-KEM-768 + AES-256-CBC Hybrid Encryption Demo");
    println!("{}", "=".repeat(50));

    let service = HybridEncryptionService::new();

    println!("\nStep 1: Generating key pair...");
    let pair = service.generate_key_pair_hex();
    println!("  Public key:  {} hex chars", pair.public_key.len());
    println!("  Secret key:  {} hex chars", pair.secret_key.len());

    println!("\nStep 2: Key information:");
    let info = service.key_info();
    println!("  Algorithm:      {}", info.algorithm);
    println!("  Security level: {}", info.security_level);
    println!("  Has key pair:   {}", info.has_key_pair);

    let message = "This message is protected by quantum-resistant cryptography!";
    println!("\nStep 3: Encrypting...");
    println!("  Original: \"{message}\"");
    let encrypted = service.encrypt_hex(message)?;
    println!("  Ciphertext:    {} hex chars", encrypted.ciphertext.len());
    println!("  Encapsulation: {} hex chars", encrypted.encapsulation.len());
    println!("  IV:            {} hex chars", encrypted.iv.len());

    println!("\nStep 4: Decrypting...");
    let decrypted = service.decrypt_hex(
        &encrypted.ciphertext,
        &encrypted.encapsulation,
        &encrypted.iv,
    )?;
    println!("  Decrypted: \"{decrypted}\"");

    println!("\nStep 5: Verification:");
    if decrypted == message {
        println!("  OK — round trip succeeded");
    } else {
        println!("  FAILED — messages do not match");
    }

    Ok(())
}
