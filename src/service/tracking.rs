use rand::Rng;

// ============================================================================
// Tracking Number Generator
// ============================================================================

pub const TRACKING_PREFIX: &str = "ALY";

/// Produces shipment identifiers shaped `ALY-DDDDDD-LLL`: six digits uniform
/// in [100000, 999999] and three uppercase letters. Purely random — there is
/// no uniqueness check against existing tracking numbers, so collisions are
/// possible and go undetected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingNumberGenerator;

impl TrackingNumberGenerator {
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let digits: u32 = rng.gen_range(100_000..=999_999);
        let letters: String = (0..3)
            .map(|_| rng.gen_range(b'A'..=b'Z') as char)
            .collect();

        format!("{TRACKING_PREFIX}-{digits}-{letters}")
    }
}
