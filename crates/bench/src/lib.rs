use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use num_bigint::{BigInt, BigUint, Sign};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 800;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1500;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Signed integer whose magnitude has exactly `bits` significant bits.
pub fn random_bigint_with_bits<R: Rng + ?Sized>(rng: &mut R, bits: u32) -> BigInt {
    if bits == 0 {
        return BigInt::ZERO;
    }

    let words = bits.div_ceil(32) as usize;
    let mut digits = (0..words).map(|_| rng.random::<u32>()).collect::<Vec<_>>();
    let top_bits = bits - 32 * (words as u32 - 1);
    let top = &mut digits[words - 1];
    if top_bits < 32 {
        *top &= (1_u32 << top_bits) - 1;
    }
    *top |= 1_u32 << (top_bits - 1);

    let sign = if rng.random::<bool>() {
        Sign::Plus
    } else {
        Sign::Minus
    };
    BigInt::from_biguint(sign, BigUint::new(digits))
}

pub fn random_bigints<R: Rng + ?Sized>(rng: &mut R, len: usize, bits: u32) -> Vec<BigInt> {
    (0..len)
        .map(|_| random_bigint_with_bits(rng, bits))
        .collect()
}
