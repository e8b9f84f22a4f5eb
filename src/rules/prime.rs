//! Primality of numbers embedded in message text.
//!
//! A message "contains a prime" when any maximal run of decimal digits,
//! read as an integer with leading zeros ignored, is prime. Every Unicode
//! decimal digit (general category Nd) counts: ASCII, full-width `０`-`９`,
//! Arabic-Indic `٧`, Devanagari `७` and the rest.
//!
//! ## Bounded cost
//!
//! Checking by trial division up to `n` takes time proportional to the
//! embedded value, so a single long number could stall the server. Runs
//! of up to [`MAX_EXACT_DIGITS`] significant digits are tested instead:
//!
//! - below [`MR_EXACT_LIMIT`]: Miller-Rabin with the first 13 prime bases,
//!   which is exact in that range
//! - above it: Baillie-PSW (the same Miller-Rabin, which includes base 2,
//!   plus a strong Lucas test), which has no known counterexample
//!
//! Longer runs are treated as not prime.

/// Longest digit run (after stripping leading zeros) that is tested for primality.
pub const MAX_EXACT_DIGITS: usize = 38;

/// Witnesses for Miller-Rabin.
const WITNESSES: [u128; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Smallest strong pseudoprime to all 13 witnesses (psi_13). Below it
/// Miller-Rabin alone is exact.
pub const MR_EXACT_LIMIT: u128 = 3_317_044_064_679_887_385_961_981;

/// Code points of the digit zero of every Unicode Nd block, ascending.
/// Each block holds the digits 0-9 contiguously.
const DIGIT_ZEROS: [u32; 68] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6,
    0x0C66, 0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0,
    0x1810, 0x1946, 0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620,
    0xA8D0, 0xA900, 0xA9D0, 0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066,
    0x110F0, 0x11136, 0x111D0, 0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0,
    0x11950, 0x11C50, 0x11D50, 0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8,
    0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Value of a decimal digit character, if it is one.
#[must_use]
pub fn decimal_digit(c: char) -> Option<u8> {
    let code = c as u32;
    let block = DIGIT_ZEROS.partition_point(|&zero| zero <= code);
    let zero = DIGIT_ZEROS[block.checked_sub(1)?];
    let value = code - zero;
    (value < 10).then_some(value as u8)
}

/// Split `text` into maximal runs of decimal digits, as digit values.
pub fn digit_runs(text: &str) -> impl Iterator<Item = Vec<u8>> + '_ {
    let mut chars = text.chars().peekable();
    std::iter::from_fn(move || {
        // Skip to the next digit
        while let Some(&c) = chars.peek() {
            if decimal_digit(c).is_some() {
                break;
            }
            chars.next();
        }

        let mut run = Vec::new();
        while let Some(d) = chars.peek().copied().and_then(decimal_digit) {
            run.push(d);
            chars.next();
        }

        if run.is_empty() {
            None
        } else {
            Some(run)
        }
    })
}

/// Interpret a digit run as a number, or `None` if it is too long to test.
#[must_use]
pub fn run_value(run: &[u8]) -> Option<u128> {
    let start = run.iter().position(|&d| d != 0).unwrap_or(run.len());
    let significant = &run[start..];
    if significant.len() > MAX_EXACT_DIGITS {
        return None;
    }
    Some(
        significant
            .iter()
            .fold(0u128, |acc, &d| acc * 10 + u128::from(d)),
    )
}

/// True if any digit run in `text` is a prime number.
#[must_use]
pub fn contains_prime(text: &str) -> bool {
    digit_runs(text)
        .filter_map(|run| run_value(&run))
        .any(is_prime)
}

/// Primality test for `u128`.
#[must_use]
pub fn is_prime(n: u128) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &WITNESSES {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    if !miller_rabin(n) {
        return false;
    }
    n < MR_EXACT_LIMIT || strong_lucas(n)
}

// n odd, n > 41
fn miller_rabin(n: u128) -> bool {
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in &WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Strong Lucas probable-prime test with Selfridge's parameters (P = 1).
// n odd, n > 41
fn strong_lucas(n: u128) -> bool {
    if is_square(n) {
        return false;
    }

    // First D in 5, -7, 9, -11, ... with Jacobi(D/n) = -1
    let mut d: i128 = 5;
    loop {
        match jacobi(signed_mod(d, n), n) {
            -1 => break,
            0 if d.unsigned_abs() < n => return false,
            _ => d = if d > 0 { -(d + 2) } else { -d + 2 },
        }
    }
    let d_mod = signed_mod(d, n);
    let q_mod = signed_mod((1 - d) / 4, n);
    let shared = gcd(q_mod, n);
    if shared != 1 && shared != n {
        return false;
    }

    // n + 1 = k * 2^s, k odd
    let mut k = n + 1;
    let mut s = 0u32;
    while k % 2 == 0 {
        k /= 2;
        s += 1;
    }

    // U_1 = 1, V_1 = P = 1, Q^1
    let (mut u, mut v, mut qk) = (1u128, 1u128, q_mod);
    for bit in (0..(127 - k.leading_zeros())).rev() {
        // double
        u = mul_mod(u, v, n);
        v = sub_mod(mul_mod(v, v, n), add_mod(qk, qk, n), n);
        qk = mul_mod(qk, qk, n);
        if (k >> bit) & 1 == 1 {
            // add one
            let u_next = half_mod(add_mod(u, v, n), n);
            v = half_mod(add_mod(mul_mod(d_mod, u, n), v, n), n);
            u = u_next;
            qk = mul_mod(qk, q_mod, n);
        }
    }

    if u == 0 || v == 0 {
        return true;
    }
    for _ in 1..s {
        v = sub_mod(mul_mod(v, v, n), add_mod(qk, qk, n), n);
        qk = mul_mod(qk, qk, n);
        if v == 0 {
            return true;
        }
    }
    false
}

/// Jacobi symbol (a/n) for odd n.
fn jacobi(a: u128, n: u128) -> i32 {
    let mut a = a % n;
    let mut n = n;
    let mut result = 1;
    while a != 0 {
        while a % 2 == 0 {
            a /= 2;
            if n % 8 == 3 || n % 8 == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if a % 4 == 3 && n % 4 == 3 {
            result = -result;
        }
        a %= n;
    }
    if n == 1 {
        result
    } else {
        0
    }
}

// x mod m, in 0..m
fn signed_mod(x: i128, m: u128) -> u128 {
    let r = x.unsigned_abs() % m;
    if x < 0 && r != 0 {
        m - r
    } else {
        r
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn is_square(n: u128) -> bool {
    let root = isqrt(n);
    root * root == n
}

fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = 1u128 << ((128 - n.leading_zeros()).div_ceil(2));
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

// a, b < m
fn sub_mod(a: u128, b: u128, m: u128) -> u128 {
    if a >= b {
        a - b
    } else {
        m - (b - a)
    }
}

// x / 2 mod m, for x < m and m odd
fn half_mod(x: u128, m: u128) -> u128 {
    if x % 2 == 0 {
        x / 2
    } else {
        x / 2 + m / 2 + 1
    }
}

// a, b < m
fn add_mod(a: u128, b: u128, m: u128) -> u128 {
    if a >= m - b {
        a - (m - b)
    } else {
        a + b
    }
}

fn mul_mod(a: u128, b: u128, m: u128) -> u128 {
    if m <= u128::from(u64::MAX) {
        return (a % m) * (b % m) % m;
    }

    let mut a = a % m;
    let mut b = b % m;
    let mut result = 0;
    while b > 0 {
        if b & 1 == 1 {
            result = add_mod(result, a, m);
        }
        a = add_mod(a, a, m);
        b >>= 1;
    }
    result
}

fn pow_mod(base: u128, mut exp: u128, m: u128) -> u128 {
    let mut base = base % m;
    let mut result = 1 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}
