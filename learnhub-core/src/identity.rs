//! Generated identifiers handed to newly enrolled students.

use chrono::{Datelike, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;

pub const DEFAULT_PASSWORD_LEN: usize = 8;

/// `STU-<year>-<NNNN>` with a random number in `1000..=9999`.
pub fn generate_student_id() -> String {
    let year = Utc::now().year();
    let serial = rand::rng().random_range(1000..=9999);
    format!("STU-{year}-{serial}")
}

/// Random ASCII alphanumeric password of `len` characters.
pub fn generate_password(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_id_shape() {
        let id = generate_student_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "STU");
        assert_eq!(parts[1], Utc::now().year().to_string());
        let serial: u32 = parts[2].parse().unwrap();
        assert!((1000..=9999).contains(&serial));
    }

    #[test]
    fn passwords_are_alphanumeric() {
        let password = generate_password(DEFAULT_PASSWORD_LEN);
        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(generate_password(0), "");
    }
}
