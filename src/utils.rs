// src/utils.rs
use std::time::Duration;
use rand::Rng;

pub const MIN_ROTATION_SECS: u64 = 3;
pub const MAX_ROTATION_SECS: u64 = 120;

/// Inserts a space before every capital letter that is not the first character,
/// e.g. `SandySunset` becomes `Sandy Sunset`.
pub fn camel_to_spaced(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase() {
            if let Some(p) = prev {
                if !p.is_whitespace() {
                    spaced.push(' ');
                }
            }
        }
        spaced.push(c);
        prev = Some(c);
    }
    spaced
}

pub fn clamp_rotation_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_ROTATION_SECS, MAX_ROTATION_SECS))
}

/// Adds up to `max_jitter` of random delay on top of `base`.
pub fn with_jitter(base: Duration, max_jitter: Duration) -> Duration {
    if max_jitter.is_zero() {
        return base;
    }
    let extra = rand::thread_rng().gen_range(0..=max_jitter.as_millis() as u64);
    base + Duration::from_millis(extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_internal_capitals() {
        assert_eq!(camel_to_spaced("SandySunset"), "Sandy Sunset");
        assert_eq!(camel_to_spaced("WineParadise"), "Wine Paradise");
        assert_eq!(camel_to_spaced("Azagor"), "Azagor");
        assert_eq!(camel_to_spaced("Old District"), "Old District");
        assert_eq!(camel_to_spaced(""), "");
    }

    #[test]
    fn rotation_interval_is_clamped() {
        assert_eq!(clamp_rotation_interval(0), Duration::from_secs(3));
        assert_eq!(clamp_rotation_interval(20), Duration::from_secs(20));
        assert_eq!(clamp_rotation_interval(600), Duration::from_secs(120));
    }

    #[test]
    fn jitter_stays_in_range() {
        let base = Duration::from_secs(20);
        assert_eq!(with_jitter(base, Duration::ZERO), base);
        for _ in 0..100 {
            let d = with_jitter(base, Duration::from_millis(500));
            assert!(d >= base && d <= base + Duration::from_millis(500));
        }
    }
}
