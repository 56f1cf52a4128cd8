//! GF(256) arithmetic: the field context behind the codec.
//!
//! Scalar element math comes from a custom [`gf256`] field type over the
//! polynomial `0x14d`. Bulk memory routines are table-driven, with SIMD
//! kernels (SSSE3/AVX2 on x86-64, NEON on AArch64) behind the `simd` cargo
//! feature and compile-time target features.
//!
//! All tables are `static` const-evaluated data, so the field context is
//! immutable and shareable across threads with no setup call. [`init`] runs a
//! one-shot consistency check between the tables and the element type.

use std::sync::OnceLock;

use gf256::gf::gf;

/// GF(256) element.
///
/// Irreducible polynomial `0x14d` (`x^8 + x^6 + x^3 + x^2 + 1`); the
/// generator `0x02` is primitive for it. The polynomial is part of the
/// block format: changing it changes every recovery byte.
#[gf(polynomial = 0x14d, generator = 0x2)]
pub type Gf256;

/// 0x14d with the x^8 term dropped: x^6 + x^3 + x^2 + 1.
const POLY_LOW_BITS: u8 = 0x4d;

/// Carry-less multiply with reduction, usable in const context.
const fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let overflow = a & 0x80;
        a <<= 1;
        if overflow != 0 {
            a ^= POLY_LOW_BITS;
        }
        b >>= 1;
    }
    product
}

const fn build_mul_table() -> [[u8; 256]; 256] {
    let mut table = [[0u8; 256]; 256];
    let mut c = 0usize;
    while c < 256 {
        let mut x = 0usize;
        while x < 256 {
            table[c][x] = gf_mul(x as u8, c as u8);
            x += 1;
        }
        c += 1;
    }
    table
}

const fn build_nibble_lo() -> [[u8; 16]; 256] {
    let mut table = [[0u8; 16]; 256];
    let mut c = 0usize;
    while c < 256 {
        let mut x = 0usize;
        while x < 16 {
            table[c][x] = gf_mul(x as u8, c as u8);
            x += 1;
        }
        c += 1;
    }
    table
}

const fn build_nibble_hi() -> [[u8; 16]; 256] {
    let mut table = [[0u8; 16]; 256];
    let mut c = 0usize;
    while c < 256 {
        let mut x = 0usize;
        while x < 16 {
            table[c][x] = gf_mul((x << 4) as u8, c as u8);
            x += 1;
        }
        c += 1;
    }
    table
}

/// `MUL_TABLE[c][x] = c * x`. 64 KiB, built at compile time.
static MUL_TABLE: [[u8; 256]; 256] = build_mul_table();

/// Per-coefficient nibble tables for shuffle-based SIMD multiplication:
/// `c * x = NIB_LO[c][x & 0x0f] ^ NIB_HI[c][x >> 4]`.
static NIB_LO: [[u8; 16]; 256] = build_nibble_lo();
static NIB_HI: [[u8; 16]; 256] = build_nibble_hi();

static FIELD_CHECK: OnceLock<bool> = OnceLock::new();

/// One-shot field self-check: the const tables must agree with the `Gf256`
/// operator implementations, and every nonzero probe must satisfy
/// `a * a^-1 = 1`. Returns the cached verdict on repeat calls.
pub fn init() -> bool {
    *FIELD_CHECK.get_or_init(|| {
        let probes = [0x01u8, 0x02, 0x03, 0x53, 0x8e, 0xca, 0xff];
        for &a in &probes {
            for &b in &probes {
                let want = (Gf256(a) * Gf256(b)).0;
                if MUL_TABLE[a as usize][b as usize] != want {
                    return false;
                }
                let split = NIB_LO[a as usize][(b & 0x0f) as usize]
                    ^ NIB_HI[a as usize][(b >> 4) as usize];
                if split != want {
                    return false;
                }
            }
            if (Gf256(a) * (Gf256(1) / Gf256(a))).0 != 1 {
                return false;
            }
        }
        true
    })
}

// =============================================================================
// Bulk XOR
// =============================================================================

/// `dst[i] ^= src[i]`, eight bytes at a time.
#[inline]
pub fn add_mem(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());

    let len = dst.len();
    let chunks = len / 8;
    for i in 0..chunks {
        let base = i * 8;
        let v = u64::from_ne_bytes(dst[base..base + 8].try_into().unwrap())
            ^ u64::from_ne_bytes(src[base..base + 8].try_into().unwrap());
        dst[base..base + 8].copy_from_slice(&v.to_ne_bytes());
    }
    for i in chunks * 8..len {
        dst[i] ^= src[i];
    }
}

/// `dst[i] ^= a[i] ^ b[i]`, folding two sources in one pass.
#[inline]
pub fn add2_mem(dst: &mut [u8], a: &[u8], b: &[u8]) {
    debug_assert_eq!(dst.len(), a.len());
    debug_assert_eq!(dst.len(), b.len());

    let len = dst.len();
    let chunks = len / 8;
    for i in 0..chunks {
        let base = i * 8;
        let v = u64::from_ne_bytes(dst[base..base + 8].try_into().unwrap())
            ^ u64::from_ne_bytes(a[base..base + 8].try_into().unwrap())
            ^ u64::from_ne_bytes(b[base..base + 8].try_into().unwrap());
        dst[base..base + 8].copy_from_slice(&v.to_ne_bytes());
    }
    for i in chunks * 8..len {
        dst[i] ^= a[i] ^ b[i];
    }
}

/// `dst[i] = a[i] ^ b[i]`.
#[inline]
pub fn addset_mem(dst: &mut [u8], a: &[u8], b: &[u8]) {
    debug_assert_eq!(dst.len(), a.len());
    debug_assert_eq!(dst.len(), b.len());

    let len = dst.len();
    let chunks = len / 8;
    for i in 0..chunks {
        let base = i * 8;
        let v = u64::from_ne_bytes(a[base..base + 8].try_into().unwrap())
            ^ u64::from_ne_bytes(b[base..base + 8].try_into().unwrap());
        dst[base..base + 8].copy_from_slice(&v.to_ne_bytes());
    }
    for i in chunks * 8..len {
        dst[i] = a[i] ^ b[i];
    }
}

// =============================================================================
// Bulk multiply
// =============================================================================

/// `dst[i] = c * src[i]`.
#[inline]
pub fn mul_mem(dst: &mut [u8], src: &[u8], c: Gf256) {
    debug_assert_eq!(dst.len(), src.len());

    if c.0 == 0 {
        dst.fill(0);
        return;
    }
    if c.0 == 1 {
        dst.copy_from_slice(src);
        return;
    }

    #[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "ssse3"))]
    {
        unsafe { simd_x86::mul_mem(dst, src, c.0) };
        return;
    }

    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    {
        unsafe { simd_neon::mul_mem(dst, src, c.0) };
        return;
    }

    #[cfg(not(all(
        feature = "simd",
        any(
            all(target_arch = "x86_64", target_feature = "ssse3"),
            target_arch = "aarch64"
        )
    )))]
    scalar_mul(dst, src, c.0, 0);
}

/// `dst[i] ^= c * src[i]`.
#[inline]
pub fn muladd_mem(dst: &mut [u8], c: Gf256, src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());

    if c.0 == 0 {
        return;
    }
    if c.0 == 1 {
        add_mem(dst, src);
        return;
    }

    #[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "ssse3"))]
    {
        unsafe { simd_x86::muladd_mem(dst, src, c.0) };
        return;
    }

    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    {
        unsafe { simd_neon::muladd_mem(dst, src, c.0) };
        return;
    }

    #[cfg(not(all(
        feature = "simd",
        any(
            all(target_arch = "x86_64", target_feature = "ssse3"),
            target_arch = "aarch64"
        )
    )))]
    scalar_muladd(dst, src, c.0, 0);
}

/// `dst[i] = c * dst[i]`.
#[inline]
pub fn mul_mem_inplace(dst: &mut [u8], c: Gf256) {
    if c.0 == 0 {
        dst.fill(0);
        return;
    }
    if c.0 == 1 {
        return;
    }

    #[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "ssse3"))]
    {
        unsafe { simd_x86::mul_mem_inplace(dst, c.0) };
        return;
    }

    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    {
        unsafe { simd_neon::mul_mem_inplace(dst, c.0) };
        return;
    }

    #[cfg(not(all(
        feature = "simd",
        any(
            all(target_arch = "x86_64", target_feature = "ssse3"),
            target_arch = "aarch64"
        )
    )))]
    scalar_mul_inplace(dst, c.0, 0);
}

/// Table lookup for `dst[from..] = c * src[from..]`; tail path for the SIMD
/// kernels and the whole path without them.
#[inline]
fn scalar_mul(dst: &mut [u8], src: &[u8], c: u8, from: usize) {
    let table = &MUL_TABLE[c as usize];
    for i in from..dst.len() {
        dst[i] = table[src[i] as usize];
    }
}

#[inline]
fn scalar_muladd(dst: &mut [u8], src: &[u8], c: u8, from: usize) {
    let table = &MUL_TABLE[c as usize];
    for i in from..dst.len() {
        dst[i] ^= table[src[i] as usize];
    }
}

#[inline]
fn scalar_mul_inplace(dst: &mut [u8], c: u8, from: usize) {
    let table = &MUL_TABLE[c as usize];
    for i in from..dst.len() {
        dst[i] = table[dst[i] as usize];
    }
}

// =============================================================================
// SIMD kernels: x86-64
// =============================================================================

#[cfg(all(feature = "simd", target_arch = "x86_64", target_feature = "ssse3"))]
mod simd_x86 {
    use std::arch::x86_64::*;

    use super::{scalar_mul, scalar_mul_inplace, scalar_muladd, NIB_HI, NIB_LO};

    #[cfg(not(target_feature = "avx2"))]
    #[inline(always)]
    unsafe fn coeff_tables(c: u8) -> (__m128i, __m128i, __m128i) {
        let lo = _mm_loadu_si128(NIB_LO[c as usize].as_ptr() as *const __m128i);
        let hi = _mm_loadu_si128(NIB_HI[c as usize].as_ptr() as *const __m128i);
        (lo, hi, _mm_set1_epi8(0x0f))
    }

    /// 16 products via two pshufb lookups, one per nibble.
    #[cfg(not(target_feature = "avx2"))]
    #[inline(always)]
    unsafe fn product16(src: *const u8, lo: __m128i, hi: __m128i, mask: __m128i) -> __m128i {
        let data = _mm_loadu_si128(src as *const __m128i);
        let l = _mm_shuffle_epi8(lo, _mm_and_si128(data, mask));
        let h = _mm_shuffle_epi8(hi, _mm_and_si128(_mm_srli_epi64::<4>(data), mask));
        _mm_xor_si128(l, h)
    }

    #[cfg(target_feature = "avx2")]
    #[inline(always)]
    unsafe fn coeff_tables_256(c: u8) -> (__m256i, __m256i, __m256i) {
        let lo = _mm_loadu_si128(NIB_LO[c as usize].as_ptr() as *const __m128i);
        let hi = _mm_loadu_si128(NIB_HI[c as usize].as_ptr() as *const __m128i);
        (
            _mm256_broadcastsi128_si256(lo),
            _mm256_broadcastsi128_si256(hi),
            _mm256_set1_epi8(0x0f),
        )
    }

    #[cfg(target_feature = "avx2")]
    #[inline(always)]
    unsafe fn product32(src: *const u8, lo: __m256i, hi: __m256i, mask: __m256i) -> __m256i {
        let data = _mm256_loadu_si256(src as *const __m256i);
        let l = _mm256_shuffle_epi8(lo, _mm256_and_si256(data, mask));
        let h = _mm256_shuffle_epi8(hi, _mm256_and_si256(_mm256_srli_epi64::<4>(data), mask));
        _mm256_xor_si256(l, h)
    }

    #[cfg(not(target_feature = "avx2"))]
    #[target_feature(enable = "ssse3")]
    pub unsafe fn mul_mem(dst: &mut [u8], src: &[u8], c: u8) {
        let (lo, hi, mask) = coeff_tables(c);
        let len = dst.len();
        let mut off = 0;
        while off + 64 <= len {
            let r0 = product16(src.as_ptr().add(off), lo, hi, mask);
            let r1 = product16(src.as_ptr().add(off + 16), lo, hi, mask);
            let r2 = product16(src.as_ptr().add(off + 32), lo, hi, mask);
            let r3 = product16(src.as_ptr().add(off + 48), lo, hi, mask);
            _mm_storeu_si128(dst.as_mut_ptr().add(off) as *mut __m128i, r0);
            _mm_storeu_si128(dst.as_mut_ptr().add(off + 16) as *mut __m128i, r1);
            _mm_storeu_si128(dst.as_mut_ptr().add(off + 32) as *mut __m128i, r2);
            _mm_storeu_si128(dst.as_mut_ptr().add(off + 48) as *mut __m128i, r3);
            off += 64;
        }
        while off + 16 <= len {
            let r = product16(src.as_ptr().add(off), lo, hi, mask);
            _mm_storeu_si128(dst.as_mut_ptr().add(off) as *mut __m128i, r);
            off += 16;
        }
        scalar_mul(dst, src, c, off);
    }

    #[cfg(target_feature = "avx2")]
    #[target_feature(enable = "avx2")]
    pub unsafe fn mul_mem(dst: &mut [u8], src: &[u8], c: u8) {
        let (lo, hi, mask) = coeff_tables_256(c);
        let len = dst.len();
        let mut off = 0;
        while off + 128 <= len {
            let r0 = product32(src.as_ptr().add(off), lo, hi, mask);
            let r1 = product32(src.as_ptr().add(off + 32), lo, hi, mask);
            let r2 = product32(src.as_ptr().add(off + 64), lo, hi, mask);
            let r3 = product32(src.as_ptr().add(off + 96), lo, hi, mask);
            _mm256_storeu_si256(dst.as_mut_ptr().add(off) as *mut __m256i, r0);
            _mm256_storeu_si256(dst.as_mut_ptr().add(off + 32) as *mut __m256i, r1);
            _mm256_storeu_si256(dst.as_mut_ptr().add(off + 64) as *mut __m256i, r2);
            _mm256_storeu_si256(dst.as_mut_ptr().add(off + 96) as *mut __m256i, r3);
            off += 128;
        }
        while off + 32 <= len {
            let r = product32(src.as_ptr().add(off), lo, hi, mask);
            _mm256_storeu_si256(dst.as_mut_ptr().add(off) as *mut __m256i, r);
            off += 32;
        }
        scalar_mul(dst, src, c, off);
    }

    #[cfg(not(target_feature = "avx2"))]
    #[target_feature(enable = "ssse3")]
    pub unsafe fn muladd_mem(dst: &mut [u8], src: &[u8], c: u8) {
        let (lo, hi, mask) = coeff_tables(c);
        let len = dst.len();
        let mut off = 0;
        while off + 64 <= len {
            let p0 = product16(src.as_ptr().add(off), lo, hi, mask);
            let p1 = product16(src.as_ptr().add(off + 16), lo, hi, mask);
            let p2 = product16(src.as_ptr().add(off + 32), lo, hi, mask);
            let p3 = product16(src.as_ptr().add(off + 48), lo, hi, mask);
            let c0 = _mm_loadu_si128(dst.as_ptr().add(off) as *const __m128i);
            let c1 = _mm_loadu_si128(dst.as_ptr().add(off + 16) as *const __m128i);
            let c2 = _mm_loadu_si128(dst.as_ptr().add(off + 32) as *const __m128i);
            let c3 = _mm_loadu_si128(dst.as_ptr().add(off + 48) as *const __m128i);
            _mm_storeu_si128(dst.as_mut_ptr().add(off) as *mut __m128i, _mm_xor_si128(c0, p0));
            _mm_storeu_si128(
                dst.as_mut_ptr().add(off + 16) as *mut __m128i,
                _mm_xor_si128(c1, p1),
            );
            _mm_storeu_si128(
                dst.as_mut_ptr().add(off + 32) as *mut __m128i,
                _mm_xor_si128(c2, p2),
            );
            _mm_storeu_si128(
                dst.as_mut_ptr().add(off + 48) as *mut __m128i,
                _mm_xor_si128(c3, p3),
            );
            off += 64;
        }
        while off + 16 <= len {
            let p = product16(src.as_ptr().add(off), lo, hi, mask);
            let cur = _mm_loadu_si128(dst.as_ptr().add(off) as *const __m128i);
            _mm_storeu_si128(dst.as_mut_ptr().add(off) as *mut __m128i, _mm_xor_si128(cur, p));
            off += 16;
        }
        scalar_muladd(dst, src, c, off);
    }

    #[cfg(target_feature = "avx2")]
    #[target_feature(enable = "avx2")]
    pub unsafe fn muladd_mem(dst: &mut [u8], src: &[u8], c: u8) {
        let (lo, hi, mask) = coeff_tables_256(c);
        let len = dst.len();
        let mut off = 0;
        while off + 64 <= len {
            let p0 = product32(src.as_ptr().add(off), lo, hi, mask);
            let p1 = product32(src.as_ptr().add(off + 32), lo, hi, mask);
            let c0 = _mm256_loadu_si256(dst.as_ptr().add(off) as *const __m256i);
            let c1 = _mm256_loadu_si256(dst.as_ptr().add(off + 32) as *const __m256i);
            _mm256_storeu_si256(
                dst.as_mut_ptr().add(off) as *mut __m256i,
                _mm256_xor_si256(c0, p0),
            );
            _mm256_storeu_si256(
                dst.as_mut_ptr().add(off + 32) as *mut __m256i,
                _mm256_xor_si256(c1, p1),
            );
            off += 64;
        }
        while off + 32 <= len {
            let p = product32(src.as_ptr().add(off), lo, hi, mask);
            let cur = _mm256_loadu_si256(dst.as_ptr().add(off) as *const __m256i);
            _mm256_storeu_si256(
                dst.as_mut_ptr().add(off) as *mut __m256i,
                _mm256_xor_si256(cur, p),
            );
            off += 32;
        }
        scalar_muladd(dst, src, c, off);
    }

    #[cfg(not(target_feature = "avx2"))]
    #[target_feature(enable = "ssse3")]
    pub unsafe fn mul_mem_inplace(dst: &mut [u8], c: u8) {
        let (lo, hi, mask) = coeff_tables(c);
        let len = dst.len();
        let mut off = 0;
        while off + 16 <= len {
            let r = product16(dst.as_ptr().add(off), lo, hi, mask);
            _mm_storeu_si128(dst.as_mut_ptr().add(off) as *mut __m128i, r);
            off += 16;
        }
        scalar_mul_inplace(dst, c, off);
    }

    #[cfg(target_feature = "avx2")]
    #[target_feature(enable = "avx2")]
    pub unsafe fn mul_mem_inplace(dst: &mut [u8], c: u8) {
        let (lo, hi, mask) = coeff_tables_256(c);
        let len = dst.len();
        let mut off = 0;
        while off + 32 <= len {
            let r = product32(dst.as_ptr().add(off), lo, hi, mask);
            _mm256_storeu_si256(dst.as_mut_ptr().add(off) as *mut __m256i, r);
            off += 32;
        }
        scalar_mul_inplace(dst, c, off);
    }
}

// =============================================================================
// SIMD kernels: AArch64 NEON
// =============================================================================

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod simd_neon {
    use std::arch::aarch64::*;

    use super::{scalar_mul, scalar_mul_inplace, scalar_muladd, NIB_HI, NIB_LO};

    #[inline(always)]
    unsafe fn coeff_tables(c: u8) -> (uint8x16_t, uint8x16_t, uint8x16_t) {
        (
            vld1q_u8(NIB_LO[c as usize].as_ptr()),
            vld1q_u8(NIB_HI[c as usize].as_ptr()),
            vdupq_n_u8(0x0f),
        )
    }

    /// 16 products via two vtbl lookups, one per nibble.
    #[inline(always)]
    unsafe fn product16(
        src: *const u8,
        lo: uint8x16_t,
        hi: uint8x16_t,
        mask: uint8x16_t,
    ) -> uint8x16_t {
        let data = vld1q_u8(src);
        let l = vqtbl1q_u8(lo, vandq_u8(data, mask));
        let h = vqtbl1q_u8(hi, vandq_u8(vshrq_n_u8::<4>(data), mask));
        veorq_u8(l, h)
    }

    #[target_feature(enable = "neon")]
    pub unsafe fn mul_mem(dst: &mut [u8], src: &[u8], c: u8) {
        let (lo, hi, mask) = coeff_tables(c);
        let len = dst.len();
        let mut off = 0;
        while off + 64 <= len {
            let r0 = product16(src.as_ptr().add(off), lo, hi, mask);
            let r1 = product16(src.as_ptr().add(off + 16), lo, hi, mask);
            let r2 = product16(src.as_ptr().add(off + 32), lo, hi, mask);
            let r3 = product16(src.as_ptr().add(off + 48), lo, hi, mask);
            vst1q_u8(dst.as_mut_ptr().add(off), r0);
            vst1q_u8(dst.as_mut_ptr().add(off + 16), r1);
            vst1q_u8(dst.as_mut_ptr().add(off + 32), r2);
            vst1q_u8(dst.as_mut_ptr().add(off + 48), r3);
            off += 64;
        }
        while off + 16 <= len {
            let r = product16(src.as_ptr().add(off), lo, hi, mask);
            vst1q_u8(dst.as_mut_ptr().add(off), r);
            off += 16;
        }
        scalar_mul(dst, src, c, off);
    }

    #[target_feature(enable = "neon")]
    pub unsafe fn muladd_mem(dst: &mut [u8], src: &[u8], c: u8) {
        let (lo, hi, mask) = coeff_tables(c);
        let len = dst.len();
        let mut off = 0;
        while off + 64 <= len {
            let p0 = product16(src.as_ptr().add(off), lo, hi, mask);
            let p1 = product16(src.as_ptr().add(off + 16), lo, hi, mask);
            let p2 = product16(src.as_ptr().add(off + 32), lo, hi, mask);
            let p3 = product16(src.as_ptr().add(off + 48), lo, hi, mask);
            let c0 = vld1q_u8(dst.as_ptr().add(off));
            let c1 = vld1q_u8(dst.as_ptr().add(off + 16));
            let c2 = vld1q_u8(dst.as_ptr().add(off + 32));
            let c3 = vld1q_u8(dst.as_ptr().add(off + 48));
            vst1q_u8(dst.as_mut_ptr().add(off), veorq_u8(c0, p0));
            vst1q_u8(dst.as_mut_ptr().add(off + 16), veorq_u8(c1, p1));
            vst1q_u8(dst.as_mut_ptr().add(off + 32), veorq_u8(c2, p2));
            vst1q_u8(dst.as_mut_ptr().add(off + 48), veorq_u8(c3, p3));
            off += 64;
        }
        while off + 16 <= len {
            let p = product16(src.as_ptr().add(off), lo, hi, mask);
            let cur = vld1q_u8(dst.as_ptr().add(off));
            vst1q_u8(dst.as_mut_ptr().add(off), veorq_u8(cur, p));
            off += 16;
        }
        scalar_muladd(dst, src, c, off);
    }

    #[target_feature(enable = "neon")]
    pub unsafe fn mul_mem_inplace(dst: &mut [u8], c: u8) {
        let (lo, hi, mask) = coeff_tables(c);
        let len = dst.len();
        let mut off = 0;
        while off + 16 <= len {
            let r = product16(dst.as_ptr().add(off), lo, hi, mask);
            vst1q_u8(dst.as_mut_ptr().add(off), r);
            off += 16;
        }
        scalar_mul_inplace(dst, c, off);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_field_type() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(
                    MUL_TABLE[a as usize][b as usize],
                    (Gf256(a) * Gf256(b)).0,
                    "table mismatch at {a} * {b}"
                );
            }
        }
    }

    #[test]
    fn test_nibble_tables_split_products() {
        for c in 0..=255u8 {
            for x in 0..=255u8 {
                let split = NIB_LO[c as usize][(x & 0x0f) as usize]
                    ^ NIB_HI[c as usize][(x >> 4) as usize];
                assert_eq!(split, MUL_TABLE[c as usize][x as usize]);
            }
        }
    }

    #[test]
    fn test_inverse_law() {
        for a in 1..=255u8 {
            let inv = Gf256(1) / Gf256(a);
            assert_eq!((Gf256(a) * inv).0, 1, "a = {a}");
        }
    }

    #[test]
    fn test_init_self_check() {
        assert!(init());
        assert!(init());
    }

    // Lengths chosen to cover the SIMD main loops, the 16-byte loop,
    // and the scalar tail.
    const LENGTHS: &[usize] = &[0, 1, 7, 8, 15, 16, 31, 63, 64, 100, 129, 1000];

    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect()
    }

    #[test]
    fn test_xor_ops_match_reference() {
        for &len in LENGTHS {
            let a = pattern(len, 3);
            let b = pattern(len, 89);

            let mut dst = pattern(len, 200);
            let want: Vec<u8> = dst.iter().zip(&a).map(|(d, s)| d ^ s).collect();
            add_mem(&mut dst, &a);
            assert_eq!(dst, want);

            let mut dst = pattern(len, 200);
            let want: Vec<u8> = dst
                .iter()
                .zip(a.iter().zip(&b))
                .map(|(d, (x, y))| d ^ x ^ y)
                .collect();
            add2_mem(&mut dst, &a, &b);
            assert_eq!(dst, want);

            let mut dst = vec![0u8; len];
            let want: Vec<u8> = a.iter().zip(&b).map(|(x, y)| x ^ y).collect();
            addset_mem(&mut dst, &a, &b);
            assert_eq!(dst, want);
        }
    }

    #[test]
    fn test_mul_ops_match_reference() {
        for &len in LENGTHS {
            for c in [0u8, 1, 2, 0x53, 0x8e, 0xff] {
                let src = pattern(len, 17);
                let product: Vec<u8> = src.iter().map(|&s| (Gf256(c) * Gf256(s)).0).collect();

                let mut dst = vec![0xaa; len];
                mul_mem(&mut dst, &src, Gf256(c));
                assert_eq!(dst, product, "mul_mem len={len} c={c}");

                let mut dst = pattern(len, 111);
                let want: Vec<u8> = dst.iter().zip(&product).map(|(d, p)| d ^ p).collect();
                muladd_mem(&mut dst, Gf256(c), &src);
                assert_eq!(dst, want, "muladd_mem len={len} c={c}");

                let mut dst = src.clone();
                mul_mem_inplace(&mut dst, Gf256(c));
                assert_eq!(dst, product, "mul_mem_inplace len={len} c={c}");
            }
        }
    }
}
