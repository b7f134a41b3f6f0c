// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Short pseudo-random identifiers for local tie-breaking.

use rand::Rng;

const HEX: &[u8; 16] = b"0123456789abcdef";
const ID_PATTERN: &str = "xxxx-xxxxxxx";

/// Create a random 12-character identifier matching `xxxx-xxxxxxx`.
///
/// Not guaranteed globally unique; intended only for local tie-breaking
/// identifiers.
pub fn random_id() -> String {
    render_pattern(ID_PATTERN, &mut rand::thread_rng())
}

/// Render an id pattern: each `x` becomes a uniform random hex digit, each
/// `y` a hex digit with the high bits forced to `10` (one of `8 9 a b`, the
/// UUIDv4 variant-nibble trick); every other character is copied through.
fn render_pattern<R: Rng>(pattern: &str, rng: &mut R) -> String {
    pattern
        .chars()
        .map(|c| match c {
            'x' => HEX[rng.gen_range(0..16)] as char,
            'y' => HEX[rng.gen_range(8..12)] as char,
            other => other,
        })
        .collect()
}
