use otp_core::{Algorithm, Secret, HOTP, TOTP};

fn main() {
    // create a TOTP from a base32 secret, as typed in by a user
    let secret_b32 = Secret::Encoded(String::from("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"));
    let totp = TOTP::new(Algorithm::SHA1, 6, 30, secret_b32.to_bytes().unwrap()).unwrap();

    println!(
        "base32 {} ; raw {}",
        secret_b32,
        secret_b32.to_raw().unwrap()
    );
    println!("code from base32:\t{}", totp.generate().unwrap());

    // create a HOTP from raw binary value
    let secret_raw = Secret::Raw(b"12345678901234567890".to_vec());
    let mut hotp = HOTP::new(Algorithm::SHA1, 6, secret_raw.to_bytes().unwrap(), 0, 0).unwrap();

    println!("raw {} ; base32 {}", secret_raw, secret_raw.to_encoded());
    println!("first code from raw secret:\t{}", hotp.generate().unwrap());
}
