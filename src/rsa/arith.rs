/// Multiplicative inverse of `a` modulo `n` by the extended Euclidean algorithm.
///
/// Returns `None` when `gcd(a, n) != 1`. The result is normalised into `[0, n)`,
/// so `Some(0)` is a real answer (only possible for `n == 1`).
pub fn modular_inverse(a: u64, n: u64) -> Option<u64> {
    let (mut t, mut newt): (i128, i128) = (0, 1);
    let (mut r, mut newr): (u64, u64) = (n, a);
    while newr != 0 {
        let quotient = r / newr;
        (t, newt) = (newt, t - quotient as i128 * newt);
        (r, newr) = (newr, r - quotient * newr);
        log::trace!("quotient: {quotient}, t: {t}, newt: {newt}, r: {r}, newr: {newr}");
    }
    if r > 1 {
        return None;
    }
    if t < 0 {
        t += n as i128;
    }
    Some(t as u64)
}

/// `a * b mod m` without overflowing the 64-bit range.
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// `base ^ exponent mod modulus` by square-and-multiply.
///
/// A table of `base ^ (2 ^ i) mod modulus` is built for every bit of `exponent`,
/// then the entries for set bits are folded in from the most significant bit down.
/// The result is always `< modulus`; `exponent == 0` yields `1 % modulus`.
///
/// # Panics
/// If `modulus` is zero.
pub fn mod_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    assert_ne!(modulus, 0, "mod_pow with zero modulus");
    if exponent == 0 {
        return 1 % modulus;
    }
    let bits = (u64::BITS - exponent.leading_zeros()) as usize;
    let mut mods = Vec::with_capacity(bits);
    mods.push(base % modulus);
    for i in 1..bits {
        let prev = mods[i - 1];
        mods.push(mul_mod(prev, prev, modulus));
    }
    let mut val = 1 % modulus;
    for i in (0..bits).rev() {
        if (exponent >> i) & 1 == 1 {
            val = mul_mod(val, mods[i], modulus);
        }
    }
    log::trace!("{base} ^ {exponent} mod {modulus} = {val}");
    val
}

#[cfg(test)]
mod tests {
    use num::Integer;
    use num_bigint::BigUint;
    use super::*;

    #[test]
    fn test_mod_reverse() {
        for n in [2u64, 10, 3120, 65536, 4294836225, u64::MAX] {
            for a in 1..200u64 {
                match modular_inverse(a, n) {
                    Some(t) => {
                        assert_eq!(a.gcd(&n), 1, "a={a}, n={n}");
                        assert!(t < n);
                        assert_eq!((a as u128 * t as u128) % n as u128, 1, "a={a}, n={n}, t={t}");
                    }
                    None => assert_ne!(a.gcd(&n), 1, "a={a}, n={n}"),
                }
            }
        }
    }

    #[test]
    fn test_mod_reverse_textbook() {
        assert_eq!(modular_inverse(7, 3120), Some(1783));
        assert_eq!(modular_inverse(17, 3120), Some(2753));
        assert_eq!(modular_inverse(3, 3120), None);
        assert_eq!(modular_inverse(6, 9), None);
    }

    #[test]
    fn test_mod_reverse_zero_is_not_failure() {
        assert_eq!(modular_inverse(5, 1), Some(0));
    }

    #[test]
    fn test_zero_exponent() {
        for x in 2..50u64 {
            for z in 2..50u64 {
                assert_eq!(mod_pow(x, 0, z), 1);
            }
        }
        assert_eq!(mod_pow(7, 0, 1), 0);
    }

    #[test]
    fn test_result_below_modulus() {
        for x in [0u64, 1, 2, 3233, 65, u32::MAX as u64, u64::MAX] {
            for y in [1u64, 2, 7, 1783, 1 << 40, u64::MAX] {
                for z in [1u64, 2, 3233, 4295098403, u64::MAX] {
                    assert!(mod_pow(x, y, z) < z, "x={x}, y={y}, z={z}");
                }
            }
        }
    }

    #[test]
    fn test_fast_modular_exponent_against_bigint() {
        let cases = [
            (65u64, 7u64, 3233u64),
            (1317, 1783, 3233),
            (0x48692121, 5, 4295098403),
            (u64::MAX - 1, u64::MAX - 2, u64::MAX),
            (123456789, 987654321, 1_000_000_007),
        ];
        for (x, y, z) in cases {
            let expect = BigUint::from(x).modpow(&BigUint::from(y), &BigUint::from(z));
            assert_eq!(BigUint::from(mod_pow(x, y, z)), expect, "x={x}, y={y}, z={z}");
        }
    }

    #[test]
    fn test_simple_data() {
        let c = mod_pow(65, 7, 3233);
        assert_eq!(c, 1317);
        assert_eq!(mod_pow(c, 1783, 3233), 65);
    }
}
