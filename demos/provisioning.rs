use otp_core::{Algorithm, KeyUri, HOTP, TOTP};

fn main() {
    let totp = TOTP::new(Algorithm::SHA1, 6, 30, "supersecret".to_string().into_bytes()).unwrap();
    let url = totp.get_url("account:example", "my-org.com");
    println!("{}", url);
    println!("{}", totp.generate().unwrap());

    let hotp = HOTP::new(Algorithm::SHA256, 8, b"supersecret".to_vec(), 7, 0).unwrap();
    let url = hotp.get_url("account:example", "my-org.com");
    println!("{}", url);

    let key = KeyUri::parse(&url).unwrap();
    println!("{:?} label={} issuer={:?}", key.kind, key.label, key.issuer);
    let restored = key.into_hotp(2).unwrap();
    println!("{}", restored);
}
