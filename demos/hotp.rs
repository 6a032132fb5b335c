use otp_core::{HotpConfig, HOTP};

fn main() {
    let mut config = HotpConfig::new(b"12345678901234567890".to_vec()).unwrap();
    config.sync_window(3);

    let mut client = HOTP::from_config(config.clone()).unwrap();
    let mut server = HOTP::from_config(config).unwrap();

    // two codes are generated but never submitted
    client.generate().unwrap();
    client.generate().unwrap();

    let code = client.generate().unwrap();
    let valid = server.validate(&code).unwrap();
    println!(
        "code {} valid: {}\t server counter: {}\t client counter: {}",
        code,
        valid,
        server.counter(),
        client.counter()
    );

    // persist the resynchronized counter
    let saved = server.to_config();
    println!("{}", HOTP::from_config(saved).unwrap());
}
