use otp_core::{Algorithm, TOTP};

fn main() {
    let totp = TOTP::new(Algorithm::SHA1, 6, 30, "my-secret".to_string()).unwrap();

    loop {
        println!(
            "code {}\t ttl {}\t valid until: {}",
            totp.generate().unwrap(),
            totp.ttl().unwrap(),
            totp.next_step_current().unwrap()
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}
